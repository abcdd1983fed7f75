//! Error types for the catalog indexer pipeline.

use std::io;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use catalog_indexer_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the catalog indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A source file is missing or unreadable.
    #[error("Failed to open {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A malformed record in a source file. The whole load is aborted.
    #[error("Failed decoding {origin} at line {line}: {source}")]
    Decode {
        origin: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// More records were decoded than the configured limit allows.
    #[error("Record limit of {limit} exceeded")]
    CapacityExceeded { limit: usize },

    /// Probing the engine for the target index failed.
    #[error("Index existence check failed: {0}")]
    IndexCheck(#[source] SearchError),

    /// Creating the target index failed.
    #[error("Index setup failed: {0}")]
    IndexSetup(#[source] SearchError),

    /// One or more bulk requests failed.
    #[error("Dump error: {0}")]
    Dump(#[from] DumpError),

    /// A pipeline task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

impl PipelineError {
    /// Create a file access error.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a decode error, taking the line from the CSV error when known.
    pub fn decode(origin: impl Into<String>, source: csv::Error) -> Self {
        let line = source.position().map(|p| p.line()).unwrap_or(0);
        Self::Decode {
            origin: origin.into(),
            line,
            source,
        }
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}

/// Why a single chunk failed.
#[derive(Error, Debug, Clone)]
pub enum ChunkError {
    /// The engine rejected or failed the bulk request.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The request did not finish before its deadline.
    #[error("Bulk request timed out after {0:?}")]
    TimedOut(Duration),
}

/// A failed chunk and the dataset positions it covered.
#[derive(Debug, Clone)]
pub struct ChunkFailure {
    /// Position of the chunk in dispatch order.
    pub chunk: usize,
    /// Dataset positions covered by the chunk.
    pub range: Range<usize>,
    pub error: ChunkError,
}

/// Aggregate of every failure observed while dumping chunks.
///
/// Chunks that were still in flight when the first failure arrived are
/// cancelled and counted in `cancelled`.
#[derive(Error, Debug, Clone)]
#[error(
    "{} of {total_chunks} chunks failed, {cancelled} cancelled, {panicked} panicked",
    .failures.len()
)]
pub struct DumpError {
    pub total_chunks: usize,
    pub failures: Vec<ChunkFailure>,
    pub cancelled: usize,
    pub panicked: usize,
}

impl DumpError {
    /// The first failure observed, if any chunk failed (rather than panicked).
    pub fn first_failure(&self) -> Option<&ChunkFailure> {
        self.failures.first()
    }
}
