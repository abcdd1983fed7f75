//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use ::opensearch::{
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch, SearchParts,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::get_index_settings;
use crate::opensearch::queries::{
    build_bulk_body, build_search_query, is_healthy_status, parse_bulk_response,
};
use crate::types::BulkIndexSummary;
use catalog_indexer_shared::{Product, SearchQuery};

/// OpenSearch client implementation.
///
/// Provides full-text search and bulk indexing using OpenSearch as the backend.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// if !client.index_exists("products").await? {
///     client.ensure_index("products").await?;
///     client.bulk_index("products", &products).await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// No request is made; call [`SearchEngineClient::health_check`] to verify
    /// the cluster is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub async fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            warn!(status = %response.status_code(), "Cluster health request failed");
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        debug!(status = ?body.get("status"), "Cluster health");
        Ok(is_healthy_status(&body))
    }

    /// A 404 means absent; any other non-success status or a transport failure
    /// is reported as `IndexLookupError` instead of being read as absent.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::index_lookup(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => {
                error!(index = %index, status = %status, "Index existence check failed");
                Err(SearchError::index_lookup(format!(
                    "Unexpected status {} checking index {}",
                    status, index
                )))
            }
        }
    }

    async fn ensure_index(&self, index: &str) -> Result<(), SearchError> {
        if self.index_exists(index).await? {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another writer may have created it between the check and the create.
            if error_body.contains("resource_already_exists_exception") {
                debug!(index = %index, "Index created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchError::index_creation(format!(
                "Create index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn bulk_index(
        &self,
        index: &str,
        products: &[Product],
    ) -> Result<BulkIndexSummary, SearchError> {
        let body: Vec<JsonBody<Value>> = build_bulk_body(index, products)?
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        parse_bulk_response(&response_body, products.len())
    }

    #[instrument(skip(self, query), fields(query = %query.query, page = query.page, limit = query.limit))]
    async fn search(&self, index: &str, query: &SearchQuery) -> Result<Value, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(build_search_query(query))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }
}
