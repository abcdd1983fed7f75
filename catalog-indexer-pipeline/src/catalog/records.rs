//! Row layouts of the catalog CSV files.

use serde::{de, Deserialize, Deserializer};

use catalog_indexer_shared::{Category, Product};
use std::sync::Arc;

/// One row of the category lookup file: `id,category_name`.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRecord {
    pub id: i64,
    #[serde(rename = "category_name")]
    pub name: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category::new(record.id, record.name)
    }
}

/// One row of the product file.
///
/// Columns not listed here (e.g. `imgUrl`, `boughtInLastMonth`) are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductRecord {
    pub asin: String,
    pub title: String,
    #[serde(rename = "productURL")]
    pub product_url: String,
    pub stars: f64,
    pub reviews: i64,
    pub price: f64,
    #[serde(rename = "listPrice")]
    pub list_price: f64,
    pub category_id: i64,
    #[serde(rename = "isBestSeller", deserialize_with = "deserialize_flag")]
    pub is_best_seller: bool,
}

impl ProductRecord {
    /// Build the product, attaching whatever category was resolved for it.
    pub fn into_product(self, category: Option<Arc<Category>>) -> Product {
        Product {
            external_id: self.asin,
            title: self.title,
            url: self.product_url,
            rating: self.stars,
            rating_count: self.reviews,
            price: self.price,
            list_price: self.list_price,
            category_id: self.category_id,
            category,
            is_featured: self.is_best_seller,
        }
    }
}

/// Parse the boolean spellings found in catalog exports.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean `{}`", raw)))
}
