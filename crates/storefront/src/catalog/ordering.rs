//! Display ordering for listings.
//!
//! Three keys, in precedence order:
//! 1. manual order, highest first
//! 2. available before sold
//! 3. newest `created_at` first
//!
//! The sort is stable. It runs whenever a collection is fetched fresh and is
//! deliberately not re-run after single-field edits, so a listing whose status
//! flips stays where the shopper last saw it.

use std::cmp::Ordering;

use harafish_core::{Book, BookStatus};

/// Compare two books by display priority.
#[must_use]
pub fn priority(a: &Book, b: &Book) -> Ordering {
    b.manual_order
        .cmp(&a.manual_order)
        .then_with(|| availability_rank(a.status).cmp(&availability_rank(b.status)))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

const fn availability_rank(status: BookStatus) -> u8 {
    match status {
        BookStatus::Available => 0,
        BookStatus::Sold => 1,
    }
}

/// Stable in-place sort by [`priority`].
pub fn sort_by_priority(books: &mut [Book]) {
    books.sort_by(priority);
}

/// Owned variant of [`sort_by_priority`].
#[must_use]
pub fn sorted_by_priority(mut books: Vec<Book>) -> Vec<Book> {
    sort_by_priority(&mut books);
    books
}
