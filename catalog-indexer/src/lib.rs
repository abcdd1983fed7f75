//! # Catalog Indexer
//!
//! Main library for the catalog indexer.
//!
//! This crate provides the entry point, configuration and HTTP search API
//! around the catalog ingestion pipeline.

pub mod config;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, Dependencies, LogFormat};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] catalog_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] catalog_indexer_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
