//! Search query parameters.

use serde::{Deserialize, Serialize};

/// Default number of hits per page.
pub const DEFAULT_LIMIT: usize = 10;

/// Default page, 1-based.
pub const DEFAULT_PAGE: usize = 1;

/// A full-text query with page-based pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text. Empty matches everything.
    pub query: String,
    /// Hits per page.
    pub limit: usize,
    /// 1-based page number.
    pub page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl SearchQuery {
    /// Create a query for the first page with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Number of hits to skip. Page 0 is treated as page 1.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit)
    }

    /// Whether the query text is blank.
    pub fn is_match_all(&self) -> bool {
        self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = SearchQuery::default();

        assert_eq!(query.query, "");
        assert_eq!(query.limit, 10);
        assert_eq!(query.page, 1);
        assert_eq!(query.offset(), 0);
        assert!(query.is_match_all());
    }

    #[test]
    fn test_offset() {
        assert_eq!(SearchQuery::new("lamp").with_page(3).offset(), 20);
        assert_eq!(SearchQuery::new("lamp").with_limit(25).with_page(2).offset(), 25);
        assert_eq!(SearchQuery::new("lamp").with_page(0).offset(), 0);
    }
}
