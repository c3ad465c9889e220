//! Cart entries.

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::id::BookId;
use super::price::Price;

/// A book in the cart.
///
/// Display fields are copied when the book is added and are not refreshed
/// when the listing is edited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub book_id: BookId,
    pub quantity: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CartEntry {
    /// Snapshot a book with quantity one.
    #[must_use]
    pub fn snapshot(book: &Book) -> Self {
        Self {
            book_id: book.id.clone(),
            quantity: 1,
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price,
            images: book.images.clone(),
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_display_fields() {
        let mut book = Book::new(BookId::parse("b1").unwrap(), "Title");
        book.price = Price::parse("30").unwrap();
        book.images = vec!["a.jpg".to_string()];

        let entry = CartEntry::snapshot(&book);
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.images, vec!["a.jpg".to_string()]);

        book.title = "Edited".to_string();
        assert_eq!(entry.title, "Title");
    }

    #[test]
    fn test_line_total() {
        let book = Book {
            price: Price::parse("12.5").unwrap(),
            ..Book::new(BookId::parse("b1").unwrap(), "T")
        };
        let mut entry = CartEntry::snapshot(&book);
        entry.quantity = 3;
        assert_eq!(entry.line_total().display(), "37.50");
    }
}
