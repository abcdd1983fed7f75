//! # Catalog Indexer Pipeline
//!
//! This crate provides the pipeline components for loading the product
//! catalog from CSV files and dumping it into the search index.
//!
//! ## Architecture
//!
//! The pipeline runs once per process:
//!
//! 1. **Gate**: Skips ingestion when the target index already exists
//! 2. **Catalog**: Loads categories, then products joined to them
//! 3. **Partitioner**: Splits the products into contiguous chunks
//! 4. **Coordinator**: Dumps every chunk concurrently and waits for all of them
//! 5. **Orchestrator**: Coordinates the pipeline flow

pub mod catalog;
pub mod coordinator;
pub mod errors;
pub mod gate;
pub mod orchestrator;
pub mod partitioner;

#[cfg(test)]
mod testing;

pub use catalog::{CategoryLoader, CategoryMap, ProductLoad, ProductLoader};
pub use coordinator::{CoordinatorConfig, DumpReport, IngestionCoordinator};
pub use errors::{ChunkError, ChunkFailure, DumpError, PipelineError};
pub use gate::{EngineIndexGate, IndexGate};
pub use orchestrator::{IngestionOutcome, IngestionPipeline, IngestionSummary, PipelineConfig};
pub use partitioner::{Chunk, Partitioner};
