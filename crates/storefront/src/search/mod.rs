//! Title/author search over the in-memory catalog.
//!
//! Matching is plain substring containment on folded text (see [`arabic`]),
//! not tokenized or fuzzy. Matches keep the catalog's display priority.
//!
//! Records without an id never get here: the normalizer drops them.

pub mod arabic;

use harafish_core::{Book, ValidationError};
use tracing::instrument;

use crate::catalog::ordering::priority;

pub use arabic::normalize_arabic;

/// Maximum live-typing suggestions.
pub const SUGGESTION_LIMIT: usize = 6;

/// Results of a submitted search.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// The query as typed, trimmed.
    pub query: String,
    /// Matching books in display order.
    pub books: Vec<Book>,
}

/// A folded query, ready to match against books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    folded: String,
}

impl SearchQuery {
    /// Fold a raw query. `None` when nothing is left to search for.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let folded = normalize_arabic(raw);
        (!folded.is_empty()).then_some(Self { folded })
    }

    /// Whether the folded title or author contains the query.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        normalize_arabic(&book.title).contains(&self.folded)
            || book
                .author
                .as_deref()
                .is_some_and(|author| normalize_arabic(author).contains(&self.folded))
    }

    fn collect<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Vec<Book> {
        let mut matches: Vec<Book> = books
            .into_iter()
            .filter(|book| self.matches(book))
            .cloned()
            .collect();
        matches.sort_by(priority);
        matches
    }
}

/// Live suggestions while typing: at most [`SUGGESTION_LIMIT`], empty for a blank query.
#[must_use]
pub fn suggest(raw_query: &str, books: &[Book]) -> Vec<Book> {
    let Some(query) = SearchQuery::new(raw_query) else {
        return Vec::new();
    };
    let mut matches = query.collect(books);
    matches.truncate(SUGGESTION_LIMIT);
    matches
}

/// Submitted search: every match.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyQuery`] for a blank query.
#[instrument(skip(books), fields(catalog_size = books.len()))]
pub fn search(raw_query: &str, books: &[Book]) -> Result<SearchResults, ValidationError> {
    let query = SearchQuery::new(raw_query).ok_or(ValidationError::EmptyQuery)?;
    let books = query.collect(books);
    tracing::debug!(matches = books.len(), "Search complete");
    Ok(SearchResults {
        query: raw_query.trim().to_string(),
        books,
    })
}

/// Admin listing filter: case-insensitive containment over title, author and id.
///
/// A blank term returns the list unchanged. Order is preserved.
#[must_use]
pub fn admin_filter(term: &str, books: &[Book]) -> Vec<Book> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&term)
                || book
                    .author
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&term))
                || book.id.as_str().to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use harafish_core::{BookId, BookStatus, ManualOrder, Timestamp};

    use super::*;

    fn book(id: &str, title: &str, author: Option<&str>, order: u8) -> Book {
        Book {
            author: author.map(str::to_string),
            manual_order: ManualOrder::new(order).unwrap(),
            created_at: Timestamp::from_millis(1),
            ..Book::new(BookId::parse(id).unwrap(), title)
        }
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("a", "أولاد حارتنا", Some("نجيب محفوظ"), 3),
            book("b", "الحرافيش", Some("نجيب محفوظ"), 5),
            book("c", "موسم الهجرة إلى الشمال", Some("الطيب صالح"), 3),
            book("d", "The Prophet", None, 3),
        ]
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_hamza_insensitive_match() {
        let results = search("اولاد", &shelf()).unwrap();
        assert_eq!(ids(&results.books), vec!["a"]);
    }

    #[test]
    fn test_author_match_in_priority_order() {
        let results = search("محفوظ", &shelf()).unwrap();
        assert_eq!(ids(&results.books), vec!["b", "a"]);
    }

    #[test]
    fn test_latin_case_insensitive() {
        assert_eq!(ids(&suggest("prophet", &shelf())), vec!["d"]);
    }

    #[test]
    fn test_blank_submit_is_rejected() {
        assert_eq!(search("", &shelf()).unwrap_err(), ValidationError::EmptyQuery);
        assert_eq!(search("   ", &shelf()).unwrap_err(), ValidationError::EmptyQuery);
    }

    #[test]
    fn test_blank_suggest_is_empty() {
        assert!(suggest("  ", &shelf()).is_empty());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let many: Vec<Book> = (0..10)
            .map(|i| book(&format!("id{i}"), "كتاب", None, 3))
            .collect();
        assert_eq!(suggest("كتاب", &many).len(), SUGGESTION_LIMIT);
        assert_eq!(search("كتاب", &many).unwrap().books.len(), 10);
    }

    #[test]
    fn test_search_keeps_trimmed_query() {
        let results = search("  الحرافيش ", &shelf()).unwrap();
        assert_eq!(results.query, "الحرافيش");
    }

    #[test]
    fn test_sold_books_still_match() {
        let mut books = shelf();
        books[1].status = BookStatus::Sold;
        assert_eq!(ids(&search("الحرافيش", &books).unwrap().books), vec!["b"]);
    }

    #[test]
    fn test_admin_filter() {
        assert_eq!(ids(&admin_filter("PROPHET", &shelf())), vec!["d"]);
        assert_eq!(ids(&admin_filter("c", &shelf())), vec!["c"]);
        assert_eq!(admin_filter("", &shelf()).len(), 4);
    }
}
