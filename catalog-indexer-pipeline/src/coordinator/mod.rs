//! Ingestion coordinator for the catalog indexer pipeline.
//!
//! Dumps chunks into the search index with one concurrent bulk request per
//! chunk, and waits for every request before returning.

use std::ops::Range;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use crate::errors::{ChunkError, ChunkFailure, DumpError};
use crate::partitioner::Chunk;
use catalog_indexer_repository::{BulkIndexSummary, IndexHandle};
use catalog_indexer_shared::Product;

/// Configuration for the ingestion coordinator.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Deadline for each bulk request. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl CoordinatorConfig {
    pub fn with_request_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout: Some(request_timeout),
        }
    }
}

/// Outcome of a fully successful dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// Number of bulk requests issued.
    pub chunks: usize,
    /// Number of documents the engine accepted.
    pub documents: usize,
}

/// Result of one chunk task.
struct ChunkOutcome {
    chunk: usize,
    range: Range<usize>,
    result: Result<BulkIndexSummary, ChunkError>,
}

/// Coordinator that dispatches chunks concurrently.
///
/// On the first failed chunk every sibling still in flight is cancelled.
/// The coordinator still waits for all tasks to settle, then reports every
/// failure together. No chunk is retried.
#[derive(Debug, Clone, Default)]
pub struct IngestionCoordinator {
    config: CoordinatorConfig,
}

impl IngestionCoordinator {
    /// Create a coordinator with no request deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coordinator with custom configuration.
    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Issue one bulk request per chunk and wait for all of them.
    ///
    /// # Returns
    ///
    /// * `Ok(DumpReport)` - Every chunk was accepted
    /// * `Err(DumpError)` - At least one chunk failed; the error lists each
    ///   failure and how many siblings were cancelled
    #[instrument(skip_all, fields(index = %index.name(), chunks = chunks.len()))]
    pub async fn dispatch(
        &self,
        index: &IndexHandle,
        chunks: Vec<Chunk<Product>>,
    ) -> Result<DumpReport, DumpError> {
        let total_chunks = chunks.len();
        let mut tasks = JoinSet::new();

        for chunk in chunks {
            let index = index.clone();
            let request_timeout = self.config.request_timeout;

            tasks.spawn(async move {
                info!(
                    chunk = chunk.index(),
                    documents = chunk.len(),
                    "Dumping chunk into index"
                );

                let request = index.add_documents(&chunk);
                let result = match request_timeout {
                    Some(limit) => match tokio::time::timeout(limit, request).await {
                        Ok(result) => result.map_err(ChunkError::from),
                        Err(_) => Err(ChunkError::TimedOut(limit)),
                    },
                    None => request.await.map_err(ChunkError::from),
                };

                ChunkOutcome {
                    chunk: chunk.index(),
                    range: chunk.range(),
                    result,
                }
            });
        }

        let mut documents = 0usize;
        let mut failures = Vec::new();
        let mut cancelled = 0usize;
        let mut panicked = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(ChunkOutcome {
                    chunk,
                    result: Ok(summary),
                    ..
                }) => {
                    documents += summary.succeeded;
                    info!(
                        chunk = chunk,
                        documents = summary.succeeded,
                        took_ms = summary.took_ms,
                        "Chunk dumped"
                    );
                }
                Ok(ChunkOutcome {
                    chunk,
                    range,
                    result: Err(error),
                }) => {
                    error!(chunk = chunk, error = %error, "Failed to dump chunk");
                    if failures.is_empty() && panicked == 0 {
                        warn!(outstanding = tasks.len(), "Cancelling outstanding chunks");
                    }
                    tasks.abort_all();
                    failures.push(ChunkFailure {
                        chunk,
                        range,
                        error,
                    });
                }
                Err(join_error) if join_error.is_cancelled() => {
                    cancelled += 1;
                }
                Err(join_error) => {
                    error!(error = %join_error, "Chunk task panicked");
                    tasks.abort_all();
                    panicked += 1;
                }
            }
        }

        if failures.is_empty() && cancelled == 0 && panicked == 0 {
            info!(chunks = total_chunks, documents = documents, "Dump complete");
            return Ok(DumpReport {
                chunks: total_chunks,
                documents,
            });
        }

        Err(DumpError {
            total_chunks,
            failures,
            cancelled,
            panicked,
        })
    }
}
