//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product search index.

use serde_json::{json, Value};

/// The default name of the product index.
pub const DEFAULT_INDEX_NAME: &str = "products";

/// Get the index settings and mappings for the product search index.
///
/// The configuration includes:
/// - **text** fields for title and category name, with a `raw` keyword sub-field
/// - **keyword** fields for the ASIN and exact lookups
/// - numeric fields for rating, review count and prices
///
/// The product URL is stored but not indexed.
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "asin": {
                    "type": "keyword"
                },
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword",
                            "ignore_above": 512
                        }
                    }
                },
                "product_url": {
                    "type": "keyword",
                    "index": false
                },
                "stars": {
                    "type": "float"
                },
                "reviews": {
                    "type": "integer"
                },
                "price": {
                    "type": "float"
                },
                "list_price": {
                    "type": "float"
                },
                "category_id": {
                    "type": "integer"
                },
                "category": {
                    "properties": {
                        "id": {
                            "type": "integer"
                        },
                        "name": {
                            "type": "text",
                            "fields": {
                                "raw": {
                                    "type": "keyword"
                                }
                            }
                        }
                    }
                },
                "is_best_seller": {
                    "type": "boolean"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["asin"]["type"], "keyword");
        assert_eq!(properties["title"]["type"], "text");
        assert_eq!(properties["product_url"]["index"], false);
        assert_eq!(properties["category"]["properties"]["name"]["type"], "text");
        assert_eq!(properties["is_best_seller"]["type"], "boolean");
    }

    #[test]
    fn test_index_name() {
        assert_eq!(DEFAULT_INDEX_NAME, "products");
    }
}
