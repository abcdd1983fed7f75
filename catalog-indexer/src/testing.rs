//! Test doubles shared by the binary crate tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use catalog_indexer_repository::{BulkIndexSummary, SearchEngineClient, SearchError};
use catalog_indexer_shared::{Product, SearchQuery};

/// Mock search client recording the queries it receives.
pub(crate) struct MockSearchClient {
    pub healthy: AtomicBool,
    pub failing_search: bool,
    pub queries: Mutex<Vec<(String, SearchQuery)>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            failing_search: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failing_search(mut self) -> Self {
        self.failing_search = true;
        self
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn index_exists(&self, _index: &str) -> Result<bool, SearchError> {
        Ok(false)
    }

    async fn ensure_index(&self, _index: &str) -> Result<(), SearchError> {
        Ok(())
    }

    async fn bulk_index(
        &self,
        _index: &str,
        products: &[Product],
    ) -> Result<BulkIndexSummary, SearchError> {
        Ok(BulkIndexSummary {
            total: products.len(),
            succeeded: products.len(),
            ..Default::default()
        })
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> Result<Value, SearchError> {
        self.queries
            .lock()
            .await
            .push((index.to_string(), query.clone()));

        if self.failing_search {
            return Err(SearchError::query("index_not_found_exception"));
        }

        Ok(json!({
            "took": 3,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{ "_id": "B0001", "_source": { "title": "Kindle" } }]
            }
        }))
    }
}
