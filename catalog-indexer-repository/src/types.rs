//! Request and response types for search index operations.

use crate::errors::SearchError;

/// A document the engine rejected within an otherwise accepted bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// The document id (product ASIN).
    pub document_id: String,
    /// Engine-provided reason.
    pub reason: String,
}

/// Summary of a bulk index request.
///
/// A request can be accepted as a whole while individual documents are
/// rejected; `failures` lists those documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkIndexSummary {
    /// Number of documents sent.
    pub total: usize,
    /// Number of documents the engine accepted.
    pub succeeded: usize,
    /// Number of documents the engine rejected.
    pub failed: usize,
    /// Server-side processing time in milliseconds, when reported.
    pub took_ms: u64,
    /// Individual rejections.
    pub failures: Vec<DocumentFailure>,
}

impl BulkIndexSummary {
    /// Summary for a request with nothing to send.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every document was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }

    /// Turn partial rejections into an error.
    pub fn into_result(self) -> Result<Self, SearchError> {
        if self.failed == 0 {
            return Ok(self);
        }

        let first_reason = self
            .failures
            .first()
            .map(|failure| format!("{}: {}", failure.document_id, failure.reason))
            .unwrap_or_else(|| "no reason reported".to_string());

        Err(SearchError::bulk_index(format!(
            "{} of {} documents rejected (first: {})",
            self.failed, self.total, first_reason
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_summary_is_ok() {
        let summary = BulkIndexSummary {
            total: 3,
            succeeded: 3,
            ..Default::default()
        };

        assert!(summary.is_complete());
        assert_eq!(summary.clone().into_result().unwrap(), summary);
    }

    #[test]
    fn test_partial_rejection_is_error() {
        let summary = BulkIndexSummary {
            total: 2,
            succeeded: 1,
            failed: 1,
            took_ms: 4,
            failures: vec![DocumentFailure {
                document_id: "B000".to_string(),
                reason: "mapper_parsing_exception".to_string(),
            }],
        };

        assert!(!summary.is_complete());
        let err = summary.into_result().unwrap_err();
        assert!(matches!(err, SearchError::BulkIndexError(_)));
        assert!(err.to_string().contains("1 of 2 documents rejected"));
        assert!(err.to_string().contains("B000"));
    }
}
