//! Dependency initialization and wiring for the catalog indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::IndexingError;
use catalog_indexer_pipeline::IngestionPipeline;
use catalog_indexer_repository::{IndexHandle, OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Handle to the target index, shared with the HTTP API.
    pub index: IndexHandle,
    /// The configured ingestion pipeline ready to run.
    pub pipeline: IngestionPipeline,
}

impl Dependencies {
    /// Initialize all dependencies from the application configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the search engine is unreachable or unhealthy
    pub async fn new(config: &AppConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index = %config.index_name,
            partitions = config.partitions.get(),
            "Initializing dependencies"
        );

        // Initialize OpenSearch client
        let search_client = OpenSearchClient::new(&config.opensearch_url)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        // Verify OpenSearch is reachable
        let healthy = search_client
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(Self::with_client(Arc::new(search_client), config))
    }

    /// Wire the pipeline and index handle around an existing client.
    pub fn with_client(client: Arc<dyn SearchEngineClient>, config: &AppConfig) -> Self {
        let index = IndexHandle::new(Arc::clone(&client), config.index_name.clone());
        let pipeline = IngestionPipeline::new(client, config.pipeline_config());

        Self { index, pipeline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearchClient;

    #[tokio::test]
    async fn test_with_client_targets_configured_index() {
        let config = AppConfig::from_lookup(|key| match key {
            "INDEX_NAME" => Some("catalog".to_string()),
            "CATEGORIES_PATH" => Some("/nonexistent/c.csv".to_string()),
            _ => None,
        })
        .unwrap();

        let deps = Dependencies::with_client(Arc::new(MockSearchClient::new()), &config);

        assert_eq!(deps.index.name(), "catalog");
        assert_eq!(deps.pipeline.index().name(), "catalog");
        assert!(deps.pipeline.run().await.is_err());
    }
}
