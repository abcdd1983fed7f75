//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, test doubles, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BulkIndexSummary;
use catalog_indexer_shared::{Product, SearchQuery};

/// Abstract interface for search engine operations.
///
/// Every operation takes the target index name, so one client can serve any
/// number of indexes. Use [`crate::IndexHandle`] to bind a client to a
/// single index.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error handling.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is reachable but unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Check whether an index with the given name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index exists
    /// * `Ok(false)` - The engine positively reported the index as missing
    /// * `Err(SearchError::IndexLookupError)` - The probe itself failed; the
    ///   existence of the index is unknown
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create the index with product mappings if it does not exist yet.
    async fn ensure_index(&self, index: &str) -> Result<(), SearchError>;

    /// Index multiple products in a single bulk request.
    ///
    /// Documents are keyed by their ASIN, so re-sending a product replaces it.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkIndexSummary)` - The request was accepted; the summary
    ///   lists any individually rejected documents
    /// * `Err(SearchError::BulkIndexError)` - The request failed as a whole
    async fn bulk_index(
        &self,
        index: &str,
        products: &[Product],
    ) -> Result<BulkIndexSummary, SearchError>;

    /// Execute a search with highlighting on all fields.
    ///
    /// The engine's response body is returned unmodified.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = SearchQuery::new("suitcase").with_limit(5);
    /// let response = client.search("products", &query).await?;
    /// println!("{}", response["hits"]["total"]["value"]);
    /// ```
    async fn search(&self, index: &str, query: &SearchQuery) -> Result<Value, SearchError>;
}
