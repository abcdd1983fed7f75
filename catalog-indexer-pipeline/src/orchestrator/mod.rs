//! Orchestrator module for the catalog indexer pipeline.
//!
//! Coordinates the gate, catalog loaders, partitioner and coordinator.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::catalog::{CategoryLoader, CategoryMap, ProductLoad, ProductLoader};
use crate::coordinator::{CoordinatorConfig, IngestionCoordinator};
use crate::errors::PipelineError;
use crate::gate::{EngineIndexGate, IndexGate};
use crate::partitioner::Partitioner;
use catalog_indexer_repository::{IndexHandle, SearchEngineClient};
use catalog_indexer_shared::Product;

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Target index name.
    pub index_name: String,
    /// Category lookup CSV.
    pub categories_path: PathBuf,
    /// Product CSV.
    pub products_path: PathBuf,
    /// Number of concurrent bulk requests.
    pub partitions: NonZeroUsize,
    /// Deadline for each bulk request.
    pub request_timeout: Option<Duration>,
    /// Products to pre-allocate room for.
    pub capacity_hint: usize,
    /// Hard limit on the number of products.
    pub max_records: Option<usize>,
    /// Number of sample products logged after loading.
    pub sample_size: usize,
}

impl PipelineConfig {
    /// Create a configuration with one partition per available processor.
    pub fn new(
        index_name: impl Into<String>,
        categories_path: impl Into<PathBuf>,
        products_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            categories_path: categories_path.into(),
            products_path: products_path.into(),
            partitions: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            request_timeout: None,
            capacity_hint: 0,
            max_records: None,
            sample_size: 5,
        }
    }

    pub fn with_partitions(mut self, partitions: NonZeroUsize) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// Counts from a completed ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub categories: usize,
    pub products: usize,
    pub unresolved_categories: usize,
    pub chunks: usize,
    pub documents: usize,
}

/// What a pipeline run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// The index already existed; nothing was loaded or sent.
    Skipped,
    /// The catalog was loaded and dumped.
    Completed(IngestionSummary),
}

/// Pipeline that loads the catalog and dumps it into the search index.
///
/// The pipeline:
/// - Skips everything when the target index already exists
/// - Loads categories, then products joined to them
/// - Creates the index with product mappings
/// - Splits the products into chunks and dumps them concurrently
pub struct IngestionPipeline {
    gate: Arc<dyn IndexGate>,
    index: IndexHandle,
    coordinator: IngestionCoordinator,
    config: PipelineConfig,
}

impl IngestionPipeline {
    /// Create a pipeline gated on the engine's own index lookup.
    pub fn new(client: Arc<dyn SearchEngineClient>, config: PipelineConfig) -> Self {
        let gate = Arc::new(EngineIndexGate::new(Arc::clone(&client)));
        Self::with_gate(client, gate, config)
    }

    /// Create a pipeline with a custom gate.
    pub fn with_gate(
        client: Arc<dyn SearchEngineClient>,
        gate: Arc<dyn IndexGate>,
        config: PipelineConfig,
    ) -> Self {
        let index = IndexHandle::new(client, config.index_name.clone());
        let coordinator = IngestionCoordinator::with_config(CoordinatorConfig {
            request_timeout: config.request_timeout,
        });

        Self {
            gate,
            index,
            coordinator,
            config,
        }
    }

    /// The target index.
    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Run the pipeline to completion.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn run(&self) -> Result<IngestionOutcome, PipelineError> {
        let exists = self
            .gate
            .index_exists(self.index.name())
            .await
            .map_err(PipelineError::IndexCheck)?;
        if exists {
            info!("Index already exists, skipping ingestion");
            return Ok(IngestionOutcome::Skipped);
        }

        info!("Loading products and categories...");
        let (categories, load) = self.load().await?;
        log_samples(&load.products, self.config.sample_size);

        self.index
            .ensure_exists()
            .await
            .map_err(PipelineError::IndexSetup)?;

        let products = load.products.len();
        let dataset: Arc<[Product]> = load.products.into();
        let chunks = Partitioner::new(self.config.partitions).chunks(dataset);
        info!(
            products = products,
            chunks = chunks.len(),
            partitions = self.config.partitions.get(),
            "Partitioned products"
        );

        let report = self.coordinator.dispatch(&self.index, chunks).await?;

        Ok(IngestionOutcome::Completed(IngestionSummary {
            categories: categories.len(),
            products,
            unresolved_categories: load.unresolved_categories,
            chunks: report.chunks,
            documents: report.documents,
        }))
    }

    /// Run the pipeline as a background task.
    ///
    /// The task never terminates the process; its result is handed back
    /// through the join handle.
    pub fn spawn(self) -> JoinHandle<Result<IngestionOutcome, PipelineError>> {
        tokio::spawn(async move {
            let result = self.run().await;
            if let Err(e) = &result {
                error!(error = %e, "Ingestion failed");
            }
            result
        })
    }

    /// Decode both files on the blocking pool.
    async fn load(&self) -> Result<(CategoryMap, ProductLoad), PipelineError> {
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let categories = CategoryLoader::new().load(&config.categories_path)?;

            let mut loader =
                ProductLoader::new(&categories).with_capacity_hint(config.capacity_hint);
            if let Some(max_records) = config.max_records {
                loader = loader.with_max_records(max_records);
            }
            let load = loader.load(&config.products_path)?;

            Ok::<_, PipelineError>((categories, load))
        })
        .await
        .map_err(|e| PipelineError::task(format!("Catalog load task failed: {}", e)))?
    }
}

/// Log up to `count` evenly spaced products.
fn log_samples(products: &[Product], count: usize) {
    if products.is_empty() || count == 0 {
        return;
    }

    let step = (products.len() / count).max(1);
    for position in (0..products.len()).step_by(step).take(count) {
        let product = &products[position];
        info!(
            position = position,
            asin = %product.external_id,
            title = %product.title,
            price = product.price,
            category = product.category_name().unwrap_or("<none>"),
            "Sample product"
        );
    }
}
