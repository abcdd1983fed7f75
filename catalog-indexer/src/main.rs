//! Catalog indexer entry point.
//!
//! Starts the ingestion pipeline in the background and serves the search
//! API until Ctrl-C or SIGTERM.

use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_indexer::{server, AppConfig, Dependencies, IndexingError, LogFormat};
use catalog_indexer_pipeline::{IngestionOutcome, PipelineError};

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    info!(
        app = %config.app_name,
        environment = %config.environment,
        "Starting catalog indexer"
    );

    let deps = Dependencies::new(&config).await?;

    let ingestion = deps.pipeline.spawn();
    let ingestion_abort = ingestion.abort_handle();
    tokio::spawn(supervise(ingestion));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "HTTP server listening");

    let result = server::serve(listener, server::router(deps.index), server::shutdown_signal()).await;

    ingestion_abort.abort();
    info!("Catalog indexer stopped");
    result
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Log how ingestion ended. The server keeps running either way.
async fn supervise(handle: JoinHandle<Result<IngestionOutcome, PipelineError>>) {
    match handle.await {
        Ok(Ok(IngestionOutcome::Skipped)) => {
            info!("Index already populated, ingestion skipped");
        }
        Ok(Ok(IngestionOutcome::Completed(summary))) => {
            info!(
                categories = summary.categories,
                products = summary.products,
                unresolved_categories = summary.unresolved_categories,
                chunks = summary.chunks,
                documents = summary.documents,
                "Ingestion complete"
            );
        }
        Ok(Err(e)) => {
            error!(error = %e, "Ingestion failed, serving a possibly incomplete index");
        }
        Err(e) if e.is_cancelled() => {
            info!("Ingestion cancelled");
        }
        Err(e) => {
            error!(error = %e, "Ingestion task panicked");
        }
    }
}
