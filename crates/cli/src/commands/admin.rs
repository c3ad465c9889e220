//! Admin commands.
//!
//! # Usage
//!
//! ```bash
//! hf-cli admin login -e admin@example.com -p secret
//! hf-cli admin add --title "الحرافيش" --author "نجيب محفوظ" --price 45 --image cover.jpg
//! hf-cli admin edit -Nabc123 --status sold
//! ```
//!
//! # Environment Variables
//!
//! - `HARAFISH_ADMIN_EMAIL` / `HARAFISH_ADMIN_PASSWORD` - Accepted login
//! - `CLOUDINARY_CLOUD_NAME` - Enables image uploads

use std::path::PathBuf;

use harafish_core::Book;
use harafish_storefront::admin::{AdminCatalog, AdminSession, BookFields};
use harafish_storefront::images::{CloudinaryHost, ImageFile, ImageHost, NoImageHost};
use harafish_storefront::storage::FileStorage;
use harafish_storefront::store::FirebaseStore;

use super::{CommandError, Context, parse_id, print_book_line};

/// Form values from the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct FormInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub translator: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub page_count: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub order: Option<String>,
    pub images: Vec<PathBuf>,
}

impl FormInput {
    /// Fill the form, taking missing values from `current` when editing.
    fn into_fields(self, current: Option<&Book>) -> BookFields {
        let keep = |given: Option<String>, existing: Option<String>| {
            given.or(existing).unwrap_or_default()
        };
        BookFields {
            title: keep(self.title, current.map(|b| b.title.clone())),
            author: keep(self.author, current.and_then(|b| b.author.clone())),
            translator: keep(self.translator, current.and_then(|b| b.translator.clone())),
            language: keep(
                self.language,
                current.map(|b| b.language.as_str().to_string()),
            ),
            category: keep(
                self.category,
                current.and_then(|b| b.category.map(|c| c.label().to_string())),
            ),
            price: keep(self.price, current.map(|b| b.price.to_string())),
            page_count: keep(self.page_count, current.and_then(|b| b.page_count.clone())),
            description: keep(self.description, current.and_then(|b| b.description.clone())),
            status: keep(self.status, current.map(|b| b.status.as_str().to_string())),
            order: self.order.unwrap_or_default(),
        }
    }
}

async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageFile>, CommandError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = ImageFile::from_path(path)
            .await
            .map_err(|source| CommandError::Image {
                path: path.clone(),
                source,
            })?;
        files.push(file);
    }
    Ok(files)
}

fn session(ctx: &Context) -> AdminSession<&FileStorage> {
    AdminSession::new(&ctx.storage)
}

/// Whichever image host is configured.
enum Uploader {
    Cloudinary(CloudinaryHost),
    Disabled,
}

impl ImageHost for Uploader {
    async fn upload(&self, files: Vec<ImageFile>) -> Vec<String> {
        match self {
            Self::Cloudinary(host) => host.upload(files).await,
            Self::Disabled => NoImageHost.upload(files).await,
        }
    }
}

async fn open(ctx: &Context) -> Result<AdminCatalog<FirebaseStore, Uploader>, CommandError> {
    let uploader = ctx
        .config
        .cloudinary
        .as_ref()
        .map_or(Uploader::Disabled, |c| Uploader::Cloudinary(CloudinaryHost::new(c)));
    let mut admin = AdminCatalog::open(&session(ctx), ctx.catalog.clone(), uploader)?;
    admin.refresh().await?;
    Ok(admin)
}

#[allow(clippy::print_stdout)]
pub fn login(ctx: &Context, email: &str, password: &str) -> Result<(), CommandError> {
    session(ctx).login(email, password, &ctx.config.admin)?;
    println!("Logged in");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    session(ctx).logout()?;
    Ok(())
}

pub async fn list(ctx: &Context, term: &str) -> Result<(), CommandError> {
    let admin = open(ctx).await?;
    for book in admin.search(term) {
        print_book_line(&book);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, input: FormInput) -> Result<(), CommandError> {
    let files = read_images(&input.images).await?;
    let form = input.into_fields(None);
    // Check the form before logging in to the store or uploading anything.
    form.validate()?;

    let mut admin = open(ctx).await?;
    let book = admin.create(&form, files).await?;
    println!("Created {}", book.id);
    print_book_line(&book);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn edit(ctx: &Context, raw_id: &str, input: FormInput) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    let files = read_images(&input.images).await?;

    let mut admin = open(ctx).await?;
    let form = input.into_fields(admin.find(&id));
    let book = admin.update(&id, &form, files).await?;
    print_book_line(&book);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(ctx: &Context, raw_id: &str) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    let mut admin = open(ctx).await?;
    admin.delete(&id).await?;
    println!("Deleted {id}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn toggle(ctx: &Context, raw_id: &str) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    let mut admin = open(ctx).await?;
    let status = admin.toggle_status(&id).await?;
    println!("{id} is now {status}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use harafish_core::{BookId, BookStatus, Price};

    use super::*;

    #[test]
    fn test_edit_keeps_unspecified_fields() {
        let current = Book {
            author: Some("نجيب محفوظ".to_string()),
            price: Price::parse("45").unwrap(),
            status: BookStatus::Sold,
            ..Book::new(BookId::parse("b1").unwrap(), "الحرافيش")
        };
        let input = FormInput {
            price: Some("50".to_string()),
            ..FormInput::default()
        };
        let fields = input.into_fields(Some(&current));
        assert_eq!(fields.title, "الحرافيش");
        assert_eq!(fields.price, "50");
        assert_eq!(fields.status, "sold");
        assert_eq!(fields.order, "");
    }

    #[test]
    fn test_add_without_current() {
        let fields = FormInput::default().into_fields(None);
        assert!(fields.validate().is_err());
    }
}
