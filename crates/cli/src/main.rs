//! Harafish CLI - browse the shop, manage the cart, and edit listings.
//!
//! # Usage
//!
//! ```bash
//! # Browse a category, revealing three pages
//! hf-cli books --category "ادب" --pages 3
//!
//! # Search titles and authors
//! hf-cli search "محفوظ"
//!
//! # Add a book to the cart and get the WhatsApp reservation link
//! hf-cli cart add -Nabc123
//! hf-cli cart checkout
//!
//! # Admin
//! hf-cli admin login -e admin@example.com -p secret
//! hf-cli admin toggle -Nabc123
//! ```
//!
//! # Commands
//!
//! - `books`, `latest`, `search`, `show` - Catalog browsing
//! - `cart` - Cart management and checkout
//! - `admin` - Login and listing mutations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harafish_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(author, version, about = "Harafish Books storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books, optionally in one category
    Books {
        /// Category label, or "all"
        #[arg(short, long)]
        category: Option<String>,

        /// Pages to reveal (16 books each)
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Most recently added books
    Latest {
        #[arg(short = 'n', long, default_value_t = 8)]
        count: usize,
    },
    /// Search titles and authors
    Search {
        query: String,

        /// Show live suggestions instead of full results
        #[arg(long)]
        suggest: bool,
    },
    /// Show one book
    Show { id: String },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Admin session and listing management
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a book
    Add { id: String },
    /// Remove a book
    Remove { id: String },
    /// Set the quantity of a book
    Qty { id: String, quantity: i64 },
    /// Empty the cart
    Clear,
    /// Print the WhatsApp reservation link
    Checkout,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Log in with the configured admin credentials
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// List every listing, newest first
    List {
        /// Filter by title, author or id
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a listing
    Add(BookArgs),
    /// Edit a listing; omitted fields keep their current value
    Edit {
        id: String,

        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a listing
    Delete { id: String },
    /// Flip a listing between available and sold
    Toggle { id: String },
}

/// Listing form fields.
#[derive(Args, Default)]
struct BookArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    translator: Option<String>,
    /// "عربي" or "مترجم"
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    pages: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// "available" or "sold"
    #[arg(long)]
    status: Option<String>,
    /// Manual order, 0 to 5
    #[arg(long)]
    order: Option<String>,
    /// Image files to upload
    #[arg(long = "image")]
    images: Vec<std::path::PathBuf>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "harafish_storefront=info,harafish_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let ctx = commands::Context::new(config);

    if let Err(e) = run(cli, &ctx).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, ctx: &commands::Context) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Books { category, pages } => {
            commands::browse::books(ctx, category.as_deref(), pages).await?;
        }
        Commands::Latest { count } => commands::browse::latest(ctx, count).await?,
        Commands::Search { query, suggest } => {
            commands::browse::search(ctx, &query, suggest).await?;
        }
        Commands::Show { id } => commands::browse::show(ctx, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add { id } => commands::cart::add(ctx, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(ctx, &id)?,
            CartAction::Qty { id, quantity } => commands::cart::set_quantity(ctx, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(ctx),
            CartAction::Checkout => commands::cart::checkout(ctx)?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Login { email, password } => {
                commands::admin::login(ctx, &email, &password)?;
            }
            AdminAction::Logout => commands::admin::logout(ctx)?,
            AdminAction::List { search } => {
                commands::admin::list(ctx, search.as_deref().unwrap_or_default()).await?;
            }
            AdminAction::Add(book) => commands::admin::add(ctx, book.into_form()).await?,
            AdminAction::Edit { id, book } => {
                commands::admin::edit(ctx, &id, book.into_form()).await?;
            }
            AdminAction::Delete { id } => commands::admin::delete(ctx, &id).await?,
            AdminAction::Toggle { id } => commands::admin::toggle(ctx, &id).await?,
        },
    }
    Ok(())
}

impl BookArgs {
    fn into_form(self) -> commands::admin::FormInput {
        commands::admin::FormInput {
            title: self.title,
            author: self.author,
            translator: self.translator,
            language: self.language,
            category: self.category,
            price: self.price,
            page_count: self.pages,
            description: self.description,
            status: self.status,
            order: self.order,
            images: self.images,
        }
    }
}
