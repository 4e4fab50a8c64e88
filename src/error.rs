use std::fmt;

use thiserror::Error;

/// A single data row that could not be turned into an `OrderRecord`.
///
/// `row` is the 0-based position among data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub row: usize,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl RowIssue {
    pub fn new(
        row: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} invalid {} {:?}: {}",
            self.row, self.field, self.value, self.reason
        )
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required column(s): {}", missing.join(", "))]
    DataFormat { missing: Vec<String> },

    #[error("{0}")]
    RowParse(RowIssue),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// The offending row, when the error is tied to one.
    pub fn row(&self) -> Option<usize> {
        match self {
            PipelineError::RowParse(issue) => Some(issue.row),
            _ => None,
        }
    }
}
