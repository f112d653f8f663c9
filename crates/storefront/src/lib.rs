//! Tiffin storefront library.
//!
//! This crate provides the client-side state layer for the Tiffin
//! marketplace: the catalog and cart stores, the products API client they
//! fetch through, and the persistence that keeps the cart across sessions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod persist;
pub mod state;
pub mod stores;
