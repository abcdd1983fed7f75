//! Product loader and category join.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::catalog::categories::CategoryMap;
use crate::catalog::records::ProductRecord;
use crate::errors::PipelineError;
use catalog_indexer_shared::Product;

/// Result of loading the product file.
#[derive(Debug, Clone, Default)]
pub struct ProductLoad {
    /// Products in file order.
    pub products: Vec<Product>,
    /// Products whose `category_id` was not found in the category map.
    pub unresolved_categories: usize,
}

/// Loads the product file and joins every row to its category.
///
/// Products whose category id is unknown are kept with no category and
/// counted in [`ProductLoad::unresolved_categories`].
#[derive(Debug, Clone)]
pub struct ProductLoader<'a> {
    categories: &'a CategoryMap,
    capacity_hint: usize,
    max_records: Option<usize>,
}

impl<'a> ProductLoader<'a> {
    /// Create a loader joining against `categories`.
    pub fn new(categories: &'a CategoryMap) -> Self {
        Self {
            categories,
            capacity_hint: 0,
            max_records: None,
        }
    }

    /// Pre-allocate room for this many products. Not a limit.
    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    /// Fail the load if the file holds more than `max_records` products.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Load products from a CSV file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ProductLoad, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::file_access(path, e))?;
        self.from_reader(file, &path.display().to_string())
    }

    /// Load products from any CSV source. `origin` names the source in errors.
    pub fn from_reader<R: Read>(&self, reader: R, origin: &str) -> Result<ProductLoad, PipelineError> {
        let mut reader = csv::Reader::from_reader(reader);

        let capacity = match self.max_records {
            Some(max) => self.capacity_hint.min(max),
            None => self.capacity_hint,
        };
        let mut products = Vec::with_capacity(capacity);
        let mut unresolved_categories = 0usize;

        for record in reader.deserialize::<ProductRecord>() {
            let record = record.map_err(|e| PipelineError::decode(origin, e))?;

            if let Some(limit) = self.max_records {
                if products.len() >= limit {
                    return Err(PipelineError::CapacityExceeded { limit });
                }
            }

            let category = self.categories.get(&record.category_id).cloned();
            if category.is_none() {
                unresolved_categories += 1;
            }
            products.push(record.into_product(category));
        }

        if unresolved_categories > 0 {
            warn!(
                unresolved = unresolved_categories,
                total = products.len(),
                "Products reference unknown categories"
            );
        }
        info!(count = products.len(), "Loaded products");

        Ok(ProductLoad {
            products,
            unresolved_categories,
        })
    }
}
