//! Harafish Core - Shared domain types.
//!
//! This crate provides the types used across all Harafish components:
//! - `storefront` - Catalog pipeline, cart and admin mutator
//! - `cli` - Command-line surface over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no remote store
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Book, cart entry, identifiers, prices, categories and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
