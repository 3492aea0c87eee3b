//! TQL error types
//!
//! Every failure in the builder, macro expander, variable parser and container
//! extractor is fatal to the single statement being processed.

use thiserror::Error;

/// Errors that can occur while producing a TQL statement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TqlError {
    /// Malformed builder input (negative limit/offset, blank raw text, ...)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Unsupported or malformed `$griddb_*` variable definition
    #[error("Invalid variable query: {0}")]
    InvalidVariableQuery(String),

    /// Container name could not be recovered from raw TQL
    #[error("Unparseable query: {0}")]
    UnparseableQuery(String),

    /// Duration text has no recognizable unit
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// Result type for TQL operations
pub type TqlResult<T> = Result<T, TqlError>;
