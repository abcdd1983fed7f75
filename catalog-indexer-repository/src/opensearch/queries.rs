//! OpenSearch query and request builders.
//!
//! This module provides functions to build OpenSearch request bodies from
//! search parameters and products, and to read the engine's responses.

use serde_json::{json, Value};

use crate::errors::SearchError;
use crate::types::{BulkIndexSummary, DocumentFailure};
use catalog_indexer_shared::{Product, SearchQuery};

/// Fields searched by free-text queries, with boosts.
const SEARCH_FIELDS: [&str; 3] = ["title^2", "category.name", "asin"];

/// Build an OpenSearch search body from a SearchQuery.
///
/// The body handles:
/// - `match_all` for blank queries
/// - `multi_match` over title, category name and ASIN with fuzzy matching
/// - page-based pagination translated to `from`/`size`
/// - highlighting on every field
pub fn build_search_query(query: &SearchQuery) -> Value {
    let text_query = if query.is_match_all() {
        json!({ "match_all": {} })
    } else {
        json!({
            "multi_match": {
                "query": query.query,
                "fields": SEARCH_FIELDS,
                "type": "best_fields",
                "fuzziness": "AUTO",
                "lenient": true
            }
        })
    };

    json!({
        "from": query.offset(),
        "size": query.limit,
        "query": text_query,
        "highlight": {
            "fields": {
                "*": {}
            }
        }
    })
}

/// Build the newline-delimited bulk body for a batch of products.
///
/// Each product becomes an `index` action keyed by its ASIN followed by the
/// document itself.
pub fn build_bulk_body(index: &str, products: &[Product]) -> Result<Vec<Value>, SearchError> {
    let mut body = Vec::with_capacity(products.len() * 2);

    for product in products {
        body.push(json!({ "index": { "_index": index, "_id": product.document_id() } }));
        body.push(
            serde_json::to_value(product)
                .map_err(|e| SearchError::serialization(e.to_string()))?,
        );
    }

    Ok(body)
}

/// Read a bulk response body into a summary.
///
/// `total` is the number of documents that were sent.
pub fn parse_bulk_response(body: &Value, total: usize) -> Result<BulkIndexSummary, SearchError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Bulk response has no items array"))?;

    let took_ms = body.get("took").and_then(Value::as_u64).unwrap_or(0);
    let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);

    let mut failures = Vec::new();
    if has_errors {
        for item in items {
            let Some(action) = item.get("index") else {
                continue;
            };
            if let Some(error) = action.get("error") {
                let document_id = action
                    .get("_id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let reason = error
                    .get("reason")
                    .and_then(Value::as_str)
                    .or_else(|| error.get("type").and_then(Value::as_str))
                    .unwrap_or("unknown")
                    .to_string();
                failures.push(DocumentFailure {
                    document_id,
                    reason,
                });
            }
        }
    }

    let failed = failures.len();
    Ok(BulkIndexSummary {
        total,
        succeeded: total.saturating_sub(failed),
        failed,
        took_ms,
        failures,
    })
}

/// Whether a cluster health body reports a usable cluster.
///
/// `green` and `yellow` are usable; `yellow` is normal for a single node.
pub fn is_healthy_status(body: &Value) -> bool {
    matches!(
        body.get("status").and_then(Value::as_str),
        Some("green") | Some("yellow")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(asin: &str) -> Product {
        Product {
            external_id: asin.to_string(),
            title: "Carry-On Luggage".to_string(),
            url: format!("https://www.amazon.com/dp/{}", asin),
            rating: 4.6,
            rating_count: 1200,
            price: 89.5,
            list_price: 99.0,
            category_id: 104,
            category: None,
            is_featured: true,
        }
    }

    #[test]
    fn test_blank_query_matches_all() {
        let body = build_search_query(&SearchQuery::default());

        assert!(body["query"]["match_all"].is_object());
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10);
        assert!(body["highlight"]["fields"]["*"].is_object());
    }

    #[test]
    fn test_text_query_pagination() {
        let query = SearchQuery::new("luggage").with_limit(20).with_page(3);
        let body = build_search_query(&query);

        assert_eq!(body["query"]["multi_match"]["query"], "luggage");
        assert_eq!(body["query"]["multi_match"]["fields"][0], "title^2");
        assert_eq!(body["from"], 40);
        assert_eq!(body["size"], 20);
    }

    #[test]
    fn test_bulk_body_pairs_actions_and_documents() {
        let body = build_bulk_body("products", &[product("A1"), product("A2")]).unwrap();

        assert_eq!(body.len(), 4);
        assert_eq!(body[0]["index"]["_index"], "products");
        assert_eq!(body[0]["index"]["_id"], "A1");
        assert_eq!(body[1]["asin"], "A1");
        assert_eq!(body[2]["index"]["_id"], "A2");
        assert_eq!(body[3]["is_best_seller"], true);
    }

    #[test]
    fn test_parse_bulk_response_success() {
        let body = json!({
            "took": 30,
            "errors": false,
            "items": [
                { "index": { "_id": "A1", "status": 201 } },
                { "index": { "_id": "A2", "status": 201 } }
            ]
        });

        let summary = parse_bulk_response(&body, 2).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.took_ms, 30);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_parse_bulk_response_with_rejections() {
        let body = json!({
            "took": 12,
            "errors": true,
            "items": [
                { "index": { "_id": "A1", "status": 201 } },
                { "index": {
                    "_id": "A2",
                    "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [stars]" }
                } }
            ]
        });

        let summary = parse_bulk_response(&body, 2).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].document_id, "A2");
        assert_eq!(summary.failures[0].reason, "failed to parse field [stars]");
    }

    #[test]
    fn test_parse_bulk_response_invalid() {
        let result = parse_bulk_response(&json!({ "error": "boom" }), 1);
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[test]
    fn test_health_status() {
        assert!(is_healthy_status(&json!({ "status": "green" })));
        assert!(is_healthy_status(&json!({ "status": "yellow" })));
        assert!(!is_healthy_status(&json!({ "status": "red" })));
        assert!(!is_healthy_status(&json!({})));
    }
}
