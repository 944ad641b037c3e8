//! # Permdex
//!
//! Single-wildcard term lookup over an inverted index, backed by a permuterm
//! index stored in a balanced 2-3 tree.
//!
//! ## Features
//!
//! - Inverted index construction from tokenized documents
//! - Permuterm rotations answering `pre*suf` as one prefix scan
//! - Balanced 2-3 tree with logarithmic height and ordered leaf traversal
//! - Text analysis with punctuation handling, apostrophe rule and stopwords
//! - TREC run output for query results
//!
//! ## Example
//!
//! ```
//! use permdex::document::DocumentRecord;
//! use permdex::lexical::InvertedIndex;
//! use permdex::permuterm::PermutermIndex;
//!
//! let index: InvertedIndex = vec![
//!     DocumentRecord::new("doc1", ["cat", "dog"]),
//!     DocumentRecord::new("doc2", ["dig"]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let permuterm = PermutermIndex::new(index, Default::default()).unwrap();
//! assert_eq!(permuterm.matching_terms("d*g").unwrap(), vec!["dig", "dog"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod lexical;
pub mod permuterm;

pub mod prelude {
    pub use crate::config::{PermdexConfig, PermutermConfig};
    pub use crate::document::DocumentRecord;
    pub use crate::error::{PermdexError, Result};
    pub use crate::lexical::{InvertedIndex, InvertedIndexBuilder};
    pub use crate::permuterm::{PermutermIndex, QueryHit};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
