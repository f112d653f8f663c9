//! Client-side state containers.
//!
//! Each store owns one slice of application state behind an `Arc`-swapped
//! snapshot: readers grab a consistent point-in-time view and never block
//! writers for longer than a pointer clone. The stores take their
//! collaborators (products API, cart repository) as trait objects so tests
//! and alternative frontends can substitute their own.

mod cart;
mod catalog;
mod criteria;

pub use cart::{CartSnapshot, CartStore};
pub use catalog::{CatalogSnapshot, CatalogStore};
pub use criteria::{
    CategorySelection, CriteriaUpdate, DeliveryWindow, FilterCriteria, PriceRange, ViewMode,
};
