//! Core types for Tiffin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::CartItem;
pub use id::*;
pub use product::{Product, SellerRating, SellerSummary, Variant, VariantImage};
