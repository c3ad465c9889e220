//! Category filtering.

use harafish_core::{Book, CategorySelector};

/// Books in `selector`, preserving input order.
///
/// `All` passes everything through; an unknown category label matches nothing.
#[must_use]
pub fn filter_by_category(books: &[Book], selector: &CategorySelector) -> Vec<Book> {
    books
        .iter()
        .filter(|book| selector.matches(book.category))
        .cloned()
        .collect()
}

/// The `limit` most recently created books, newest first.
#[must_use]
pub fn newest(books: &[Book], limit: usize) -> Vec<Book> {
    let mut latest = books.to_vec();
    latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    latest.truncate(limit);
    latest
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use harafish_core::{BookId, Category, Timestamp};

    use super::*;

    fn book(id: &str, category: Option<Category>, created: i64) -> Book {
        Book {
            category,
            created_at: Timestamp::from_millis(created),
            ..Book::new(BookId::parse(id).unwrap(), id)
        }
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("a", Some(Category::Literature), 1),
            book("b", Some(Category::PoetryTheater), 2),
            book("c", Some(Category::Literature), 3),
            book("d", None, 4),
        ]
    }

    #[test]
    fn test_filter_keeps_order() {
        let selector = CategorySelector::Only(Category::Literature);
        assert_eq!(ids(&filter_by_category(&shelf(), &selector)), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_all_and_unknown() {
        assert_eq!(filter_by_category(&shelf(), &CategorySelector::All).len(), 4);
        let unknown = CategorySelector::parse(Some("أدب"));
        assert!(filter_by_category(&shelf(), &unknown).is_empty());
    }

    #[test]
    fn test_newest() {
        assert_eq!(ids(&newest(&shelf(), 2)), vec!["d", "c"]);
        assert_eq!(newest(&shelf(), 10).len(), 4);
    }
}
