//! Catalog record types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A product category from the lookup table.
///
/// Categories are immutable once loaded and shared between the category map
/// and every product that references them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier, unique within the lookup table.
    pub id: i64,
    /// Human readable category name.
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A catalog product, joined to its category at load time.
///
/// The serialized form is the document sent to the search engine; `asin`
/// doubles as the document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// External identifier (ASIN).
    #[serde(rename = "asin")]
    pub external_id: String,
    pub title: String,
    #[serde(rename = "product_url")]
    pub url: String,
    #[serde(rename = "stars")]
    pub rating: f64,
    #[serde(rename = "reviews")]
    pub rating_count: i64,
    pub price: f64,
    pub list_price: f64,
    pub category_id: i64,
    /// Category resolved from `category_id` when the product was loaded.
    ///
    /// `None` when the id was not present in the lookup table at that time.
    /// Later changes to the lookup table are not reflected here.
    pub category: Option<Arc<Category>>,
    #[serde(rename = "is_best_seller")]
    pub is_featured: bool,
}

impl Product {
    /// Document id used by the search engine.
    pub fn document_id(&self) -> &str {
        &self.external_id
    }

    /// Name of the resolved category, if any.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().map(|category| category.name.as_str())
    }
}
