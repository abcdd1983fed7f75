//! Process configuration read from the environment.

use std::env;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use catalog_indexer_pipeline::PipelineConfig;

use crate::IndexingError;

/// Default application name.
const DEFAULT_APP_NAME: &str = "catalog-indexer";

/// Default bind host.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
const DEFAULT_PORT: u16 = 9000;

/// Default deployment environment.
const DEFAULT_ENVIRONMENT: &str = "development";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default target index.
const DEFAULT_INDEX_NAME: &str = "products";

/// Default category lookup file.
const DEFAULT_CATEGORIES_PATH: &str = "data/amazon_categories.csv";

/// Default product file.
const DEFAULT_PRODUCTS_PATH: &str = "data/amazon_products.csv";

/// Rows in the reference product dump.
const DEFAULT_PRODUCT_CAPACITY_HINT: usize = 1_426_337;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Application configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub opensearch_url: String,
    pub index_name: String,
    pub categories_path: PathBuf,
    pub products_path: PathBuf,
    pub partitions: NonZeroUsize,
    pub request_timeout: Option<Duration>,
    pub capacity_hint: usize,
    pub max_products: Option<usize>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APP_NAME`: Application name (default: catalog-indexer)
    /// - `HOST`: Bind host (default: 0.0.0.0)
    /// - `PORT`: Bind port (default: 9000)
    /// - `ENVIRONMENT`: Deployment environment (default: development)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_NAME`: Target index (default: products)
    /// - `CATEGORIES_PATH`: Category CSV (default: data/amazon_categories.csv)
    /// - `PRODUCTS_PATH`: Product CSV (default: data/amazon_products.csv)
    /// - `INGEST_PARTITIONS`: Concurrent bulk requests (default: available parallelism)
    /// - `BULK_REQUEST_TIMEOUT_SECS`: Deadline per bulk request (default: none)
    /// - `PRODUCT_CAPACITY_HINT`: Products to pre-allocate room for (default: 1426337)
    /// - `MAX_PRODUCTS`: Hard limit on loaded products (default: none)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let partitions = match optional::<usize>(&lookup, "INGEST_PARTITIONS")? {
            Some(n) => NonZeroUsize::new(n)
                .ok_or_else(|| IndexingError::config("INGEST_PARTITIONS must be at least 1"))?,
            None => std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        };

        let request_timeout = match optional::<u64>(&lookup, "BULK_REQUEST_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(IndexingError::config(
                    "BULK_REQUEST_TIMEOUT_SECS must be at least 1",
                ))
            }
            other => other.map(Duration::from_secs),
        };

        Ok(Self {
            app_name: text("APP_NAME", DEFAULT_APP_NAME),
            host: text("HOST", DEFAULT_HOST),
            port: optional(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            environment: text("ENVIRONMENT", DEFAULT_ENVIRONMENT),
            opensearch_url: text("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            index_name: text("INDEX_NAME", DEFAULT_INDEX_NAME),
            categories_path: text("CATEGORIES_PATH", DEFAULT_CATEGORIES_PATH).into(),
            products_path: text("PRODUCTS_PATH", DEFAULT_PRODUCTS_PATH).into(),
            partitions,
            request_timeout,
            capacity_hint: optional(&lookup, "PRODUCT_CAPACITY_HINT")?
                .unwrap_or(DEFAULT_PRODUCT_CAPACITY_HINT),
            max_products: optional(&lookup, "MAX_PRODUCTS")?,
            log_format: optional(&lookup, "LOG_FORMAT")?.unwrap_or_default(),
        })
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pipeline settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(
            self.index_name.clone(),
            self.categories_path.clone(),
            self.products_path.clone(),
        )
        .with_partitions(self.partitions)
        .with_capacity_hint(self.capacity_hint);

        if let Some(timeout) = self.request_timeout {
            config = config.with_request_timeout(timeout);
        }
        if let Some(max_products) = self.max_products {
            config = config.with_max_records(max_products);
        }
        config
    }
}

/// Parse `key` if it is set to a non-blank value.
fn optional<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, IndexingError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| IndexingError::config(format!("Invalid {} '{}': {}", key, raw, e))),
        _ => Ok(None),
    }
}
