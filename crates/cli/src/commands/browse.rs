//! Catalog browsing commands.

use harafish_core::CategorySelector;
use harafish_storefront::catalog::newest;
use harafish_storefront::checkout::ReservationDesk;
use harafish_storefront::error::StorefrontError;
use harafish_storefront::lifecycle::Liveness;
use harafish_storefront::loader::IncrementalLoader;
use harafish_storefront::search;

use super::{CommandError, Context, parse_id, print_book_line};

/// List a category, revealing up to `pages` pages.
///
/// Ctrl-C while a page is loading stops without revealing it.
#[allow(clippy::print_stdout)]
pub async fn books(ctx: &Context, category: Option<&str>, pages: usize) -> Result<(), CommandError> {
    let selector = CategorySelector::parse(category);
    let books = ctx.catalog.fetch_category(&selector).await?;

    let owner = Liveness::new();
    let mut loader = IncrementalLoader::new(books)
        .with_pacing(ctx.config.loader_pacing)
        .owned_by(owner.token());

    for _ in 1..pages.max(1) {
        tokio::select! {
            revealed = loader.load_more() => {
                if !revealed {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                owner.teardown();
                break;
            }
        }
    }

    println!("{selector}: showing {} of {}", loader.shown(), loader.total());
    for book in loader.visible() {
        print_book_line(book);
    }
    if loader.has_more() {
        println!("... use --pages {} to see more", pages.max(1) + 1);
    }
    Ok(())
}

/// Most recently added books.
pub async fn latest(ctx: &Context, count: usize) -> Result<(), CommandError> {
    let books = ctx.catalog.books_or_empty().await;
    for book in newest(&books, count) {
        print_book_line(&book);
    }
    Ok(())
}

/// Full results, or live-typing suggestions with `suggest`.
#[allow(clippy::print_stdout)]
pub async fn search(ctx: &Context, query: &str, suggest: bool) -> Result<(), CommandError> {
    let books = ctx.catalog.books_or_empty().await;

    let matches = if suggest {
        search::suggest(query, &books)
    } else {
        search::search(query, &books)?.books
    };

    if matches.is_empty() {
        println!("No books match \"{}\"", query.trim());
    }
    for book in &matches {
        print_book_line(book);
    }
    Ok(())
}

/// Details for one book, with the reservation link.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, raw_id: &str) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    let book = ctx
        .catalog
        .fetch_book(id.as_str())
        .await?
        .ok_or(StorefrontError::NotFound(id))?;

    println!("{}", book.title);
    println!("  Author:      {}", book.display_author());
    if let Some(translator) = &book.translator {
        println!("  Translator:  {translator}");
    }
    println!("  Language:    {}", book.language.as_str());
    if let Some(category) = book.category {
        println!("  Category:    {category}");
    }
    println!("  Price:       {} EGP", book.price.display());
    if let Some(pages) = &book.page_count {
        println!("  Pages:       {pages}");
    }
    println!("  Status:      {}", book.status);
    if let Some(added) = book.created_at.to_datetime() {
        println!("  Added:       {}", added.format("%Y-%m-%d"));
    }
    if let Some(description) = &book.description {
        println!();
        println!("{description}");
    }
    if let Some(cover) = book.cover() {
        println!("  Cover: {cover}");
    }
    for image in book.images.iter().skip(1) {
        println!("  Image: {image}");
    }

    if !book.is_sold() {
        let desk = ReservationDesk::from_config(&ctx.config);
        println!();
        println!("Reserve: {}", desk.book_inquiry_link(&book)?);
    }
    Ok(())
}
