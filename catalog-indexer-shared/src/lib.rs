//! # Catalog Indexer Shared
//!
//! Types shared by every crate of the catalog indexer: the catalog records
//! that get indexed and the query parameters forwarded to the search engine.

mod product;
mod query;

pub use product::{Category, Product};
pub use query::SearchQuery;
