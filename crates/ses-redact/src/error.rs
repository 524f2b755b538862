//! Error types for payload transformation.

use serde_json::error::Category;
use thiserror::Error;

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors that fail a single record.
///
/// Anything else a payload might contain (missing keys, wrong types,
/// strings that only look like addresses) is tolerated and never surfaces
/// here.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The payload is not a JSON object (or `null`).
    #[error("failed to decode event payload: {0}")]
    Decode(JsonErrorSummary),

    /// The redacted document could not be serialized again.
    #[error("failed to encode redacted payload: {0}")]
    Encode(JsonErrorSummary),
}

impl TransformError {
    /// Short machine-readable kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::Decode(_) => "decode",
            TransformError::Encode(_) => "encode",
        }
    }
}

/// Where and how JSON handling failed, without any of the input.
///
/// `serde_json::Error` quotes offending values in its message, and those
/// values are payload content. Only the category and position are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonErrorSummary {
    category: Category,
    line: usize,
    column: usize,
}

impl JsonErrorSummary {
    pub fn category(&self) -> Category {
        self.category
    }

    /// 1-based line, or 0 when the error has no position.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl From<&serde_json::Error> for JsonErrorSummary {
    fn from(err: &serde_json::Error) -> Self {
        Self {
            category: err.classify(),
            line: err.line(),
            column: err.column(),
        }
    }
}

impl From<serde_json::Error> for JsonErrorSummary {
    fn from(err: serde_json::Error) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for JsonErrorSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.category {
            Category::Syntax => "invalid JSON syntax",
            Category::Eof => "unexpected end of input",
            Category::Data => "unexpected JSON structure",
            Category::Io => "I/O failure",
        };
        if self.line == 0 {
            write!(f, "{}", what)
        } else {
            write!(f, "{} at line {} column {}", what, self.line, self.column)
        }
    }
}
