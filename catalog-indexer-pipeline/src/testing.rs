//! Test doubles shared by the pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use catalog_indexer_repository::{BulkIndexSummary, SearchEngineClient, SearchError};
use catalog_indexer_shared::{Product, SearchQuery};

/// Mock search client recording every bulk request.
pub(crate) struct MockSearchClient {
    existing_indexes: Vec<String>,
    failing_lookup: bool,
    failing_document: Option<String>,
    delay: Option<Duration>,
    pub bulk_calls: AtomicUsize,
    pub completed_calls: AtomicUsize,
    pub ensure_calls: AtomicUsize,
    pub indexed: Mutex<Vec<String>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            existing_indexes: Vec::new(),
            failing_lookup: false,
            failing_document: None,
            delay: None,
            bulk_calls: AtomicUsize::new(0),
            completed_calls: AtomicUsize::new(0),
            ensure_calls: AtomicUsize::new(0),
            indexed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_existing_index(mut self, index: &str) -> Self {
        self.existing_indexes.push(index.to_string());
        self
    }

    pub fn with_failing_lookup(mut self) -> Self {
        self.failing_lookup = true;
        self
    }

    /// Fail, without delay, any batch containing this ASIN.
    pub fn with_failing_document(mut self, asin: &str) -> Self {
        self.failing_document = Some(asin.to_string());
        self
    }

    /// Delay every batch that does not fail.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    pub fn completed_calls(&self) -> usize {
        self.completed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        if self.failing_lookup {
            return Err(SearchError::index_lookup("connection refused"));
        }
        Ok(self.existing_indexes.iter().any(|existing| existing == index))
    }

    async fn ensure_index(&self, _index: &str) -> Result<(), SearchError> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bulk_index(
        &self,
        _index: &str,
        products: &[Product],
    ) -> Result<BulkIndexSummary, SearchError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failing) = &self.failing_document {
            if products.iter().any(|p| &p.external_id == failing) {
                return Err(SearchError::bulk_index("status 429: too many requests"));
            }
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.indexed
            .lock()
            .await
            .extend(products.iter().map(|p| p.external_id.clone()));
        self.completed_calls.fetch_add(1, Ordering::SeqCst);

        Ok(BulkIndexSummary {
            total: products.len(),
            succeeded: products.len(),
            ..Default::default()
        })
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> Result<Value, SearchError> {
        Ok(json!({ "index": index, "query": query.query, "hits": [] }))
    }
}

/// `count` products with ASINs `P0000`, `P0001`, ...
pub(crate) fn products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| Product {
            external_id: format!("P{:04}", i),
            title: format!("Product {}", i),
            url: format!("https://www.amazon.com/dp/P{:04}", i),
            rating: 4.0,
            rating_count: i as i64,
            price: 10.0 + i as f64,
            list_price: 0.0,
            category_id: 1,
            category: None,
            is_featured: i % 7 == 0,
        })
        .collect()
}
