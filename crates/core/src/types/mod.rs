//! Core types for Harafish.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod book;
pub mod cart;
pub mod category;
pub mod id;
pub mod price;
pub mod status;
pub mod validation;

pub use book::{Book, ManualOrder, Timestamp, UNKNOWN_AUTHOR};
pub use cart::CartEntry;
pub use category::{Category, CategorySelector};
pub use id::BookId;
pub use price::Price;
pub use status::*;
pub use validation::ValidationError;
