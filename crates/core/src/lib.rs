//! Tiffin Core - Shared types library.
//!
//! This crate provides common types used across all Tiffin components:
//! - `storefront` - Catalog and cart state containers plus their plumbing
//! - `cli` - Command-line front end for browsing and cart management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! filesystem access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog entities, and the cart line item

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
