//! Error types for the Permdex library.
//!
//! All errors are represented by the [`PermdexError`] enum. Recoverable
//! conditions (a document record without an identifier) are reported through
//! logging and counters rather than through this type; everything that does
//! reach a caller is meant to be surfaced, not retried.
//!
//! # Examples
//!
//! ```
//! use permdex::error::{PermdexError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PermdexError::invalid_query("a*b*c", "only one '*' wildcard is supported"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Permdex operations.
#[derive(Error, Debug)]
pub enum PermdexError {
    /// I/O errors (file operations, pipes, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TSV reading/writing errors
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A wildcard pattern that cannot be answered by a single rotation prefix.
    #[error("Invalid query '{pattern}': {reason}")]
    InvalidQuery { pattern: String, reason: String },

    /// A build record that cannot be indexed (missing document identifier).
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A term reached through the permuterm tree has no posting list.
    ///
    /// The tree is seeded from the index's own vocabulary, so this always
    /// indicates a construction bug.
    #[error("Vocabulary invariant violated: term '{term}' has no posting list")]
    MissingVocabulary { term: String },

    /// A structural invariant of an index or tree does not hold.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// A persisted index that parses but breaks the posting list laws.
    #[error("Format error: {0}")]
    Format(String),

    /// Analysis-related errors (tokenizer configuration)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PermdexError.
pub type Result<T> = std::result::Result<T, PermdexError>;

impl PermdexError {
    /// Create a new invalid query error.
    pub fn invalid_query<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Self {
        PermdexError::InvalidQuery {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a new malformed record error.
    pub fn malformed_record<S: Into<String>>(msg: S) -> Self {
        PermdexError::MalformedRecord(msg.into())
    }

    /// Create a new missing vocabulary error.
    pub fn missing_vocabulary<S: Into<String>>(term: S) -> Self {
        PermdexError::MissingVocabulary { term: term.into() }
    }

    /// Create a new invariant error.
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        PermdexError::Invariant(msg.into())
    }

    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        PermdexError::Format(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PermdexError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PermdexError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PermdexError::Other(msg.into())
    }

    /// Whether this error was caused by the caller's request rather than by
    /// the data or the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PermdexError::InvalidQuery { .. } | PermdexError::InvalidConfig(_)
        )
    }
}
