//! # Catalog Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine. It includes definitions for errors, interfaces, an index
//! handle, and a concrete implementation for OpenSearch.

pub mod client;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::IndexHandle;
pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchClient;
pub use types::{BulkIndexSummary, DocumentFailure};
