//! Index gate for the catalog indexer pipeline.
//!
//! Decides whether ingestion should run at all. An index that already
//! exists is taken as already ingested; its contents are not inspected.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use catalog_indexer_repository::{SearchEngineClient, SearchError};

/// Reports whether the target index is already present.
#[async_trait]
pub trait IndexGate: Send + Sync {
    /// * `Ok(true)` - The index exists; ingestion is skipped
    /// * `Ok(false)` - The index is absent; ingestion proceeds
    /// * `Err(SearchError)` - Existence is unknown; ingestion must not proceed
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;
}

/// Gate backed by the search engine's index lookup.
pub struct EngineIndexGate {
    client: Arc<dyn SearchEngineClient>,
}

impl EngineIndexGate {
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IndexGate for EngineIndexGate {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let exists = self.client.index_exists(index).await?;
        debug!(index = %index, exists = exists, "Checked index existence");
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearchClient;

    #[tokio::test]
    async fn test_engine_gate_reports_existing_index() {
        let client = Arc::new(MockSearchClient::new().with_existing_index("products"));
        let gate = EngineIndexGate::new(client);

        assert!(gate.index_exists("products").await.unwrap());
        assert!(!gate.index_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_engine_gate_propagates_probe_failure() {
        let client = Arc::new(MockSearchClient::new().with_failing_lookup());
        let gate = EngineIndexGate::new(client);

        let result = gate.index_exists("products").await;

        assert!(matches!(result, Err(SearchError::IndexLookupError(_))));
    }
}
