//! Category lookup loader.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::catalog::records::CategoryRecord;
use crate::errors::PipelineError;
use catalog_indexer_shared::Category;

/// Categories keyed by id.
pub type CategoryMap = HashMap<i64, Arc<Category>>;

/// Loads the category lookup file into a [`CategoryMap`].
///
/// The first row seen for an id wins; later rows with the same id are
/// dropped. Any malformed row aborts the whole load.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryLoader;

impl CategoryLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load categories from a CSV file with an `id,category_name` header.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<CategoryMap, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::file_access(path, e))?;
        self.from_reader(file, &path.display().to_string())
    }

    /// Load categories from any CSV source. `origin` names the source in errors.
    pub fn from_reader<R: Read>(&self, reader: R, origin: &str) -> Result<CategoryMap, PipelineError> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut categories = CategoryMap::new();
        let mut duplicates = 0usize;

        for record in reader.deserialize::<CategoryRecord>() {
            let record = record.map_err(|e| PipelineError::decode(origin, e))?;

            match categories.entry(record.id) {
                Entry::Occupied(existing) => {
                    duplicates += 1;
                    debug!(
                        id = record.id,
                        kept = %existing.get().name,
                        dropped = %record.name,
                        "Dropping duplicate category"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(record.into()));
                }
            }
        }

        info!(
            count = categories.len(),
            duplicates = duplicates,
            "Loaded categories"
        );
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(csv: &str) -> Result<CategoryMap, PipelineError> {
        CategoryLoader::new().from_reader(csv.as_bytes(), "categories")
    }

    #[test]
    fn test_first_seen_wins() {
        let categories = load("id,category_name\n1,Books\n2,Toys\n1,Books-Dup\n").unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[&1].name, "Books");
        assert_eq!(categories[&2].name, "Toys");
    }

    #[test]
    fn test_quoted_names() {
        let categories = load("id,category_name\n3,\"Kids' Furniture, Décor & Storage\"\n").unwrap();

        assert_eq!(categories[&3].name, "Kids' Furniture, Décor & Storage");
    }

    #[test]
    fn test_header_only() {
        let categories = load("id,category_name\n").unwrap();
        assert!(categories.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let categories = load("").unwrap();
        assert!(categories.is_empty());
    }

    #[test]
    fn test_malformed_row_aborts() {
        let result = load("id,category_name\n1,Books\nnot-a-number,Toys\n");

        match result {
            Err(PipelineError::Decode { origin, line, .. }) => {
                assert_eq!(origin, "categories");
                assert_eq!(line, 3);
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,category_name\n10,Luggage\n").unwrap();

        let categories = CategoryLoader::new().load(file.path()).unwrap();

        assert_eq!(categories[&10].name, "Luggage");
    }

    #[test]
    fn test_missing_file() {
        let result = CategoryLoader::new().load("/nonexistent/categories.csv");
        assert!(matches!(result, Err(PipelineError::FileAccess { .. })));
    }
}
