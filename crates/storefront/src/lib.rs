//! Harafish storefront library.
//!
//! The catalog pipeline behind the shop: raw listings from the document
//! store are normalized, ordered, filtered and searched, revealed page by
//! page, collected into a locally persisted cart, and edited by the admin.
//!
//! # Modules
//!
//! - [`catalog`] - Normalizer, priority ordering, category filter, cached reads
//! - [`search`] - Arabic-folding title/author search
//! - [`loader`] - Incremental reveal state machine
//! - [`cart`] - Cart ledger persisted to local storage
//! - [`checkout`] - WhatsApp reservation messages
//! - [`admin`] - Admin session and catalog mutations
//! - [`store`], [`images`], [`storage`] - Remote store, image host, local storage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod images;
pub mod lifecycle;
pub mod loader;
pub mod search;
pub mod storage;
pub mod store;
