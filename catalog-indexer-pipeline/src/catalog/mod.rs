//! Catalog module for the catalog indexer pipeline.
//!
//! Decodes the category lookup file and the product file, joining every
//! product to its category.

mod categories;
mod products;
mod records;

pub use categories::{CategoryLoader, CategoryMap};
pub use products::{ProductLoad, ProductLoader};
