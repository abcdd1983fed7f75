//! Index handle implementation.
//!
//! This module provides a cheap, cloneable reference to one named index.
//! Application code uses it to probe, populate and query that index without
//! repeating the index name at every call site.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::BulkIndexSummary;
use catalog_indexer_shared::{Product, SearchQuery};

/// A search engine client bound to a single index name.
#[derive(Clone)]
pub struct IndexHandle {
    client: Arc<dyn SearchEngineClient>,
    name: Arc<str>,
}

impl IndexHandle {
    /// Reference the index `name` through `client`.
    ///
    /// This does not contact the engine; the index may not exist yet.
    pub fn new(client: Arc<dyn SearchEngineClient>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: Arc::from(name.into()),
        }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying client.
    pub fn client(&self) -> &Arc<dyn SearchEngineClient> {
        &self.client
    }

    /// Check whether the index exists.
    pub async fn exists(&self) -> Result<bool, SearchError> {
        self.client.index_exists(&self.name).await
    }

    /// Create the index if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<(), SearchError> {
        self.client.ensure_index(&self.name).await
    }

    /// Add or replace documents in the index.
    ///
    /// Fails if the engine rejects the request or any individual document.
    pub async fn add_documents(&self, products: &[Product]) -> Result<BulkIndexSummary, SearchError> {
        if products.is_empty() {
            return Ok(BulkIndexSummary::empty());
        }

        let summary = self.client.bulk_index(&self.name, products).await?;
        debug!(
            index = %self.name,
            total = summary.total,
            failed = summary.failed,
            took_ms = summary.took_ms,
            "Bulk request completed"
        );

        summary.into_result()
    }

    /// Query the index.
    pub async fn search(&self, query: &SearchQuery) -> Result<Value, SearchError> {
        self.client.search(&self.name, query).await
    }
}

impl fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexHandle").field("name", &self.name).finish()
    }
}
