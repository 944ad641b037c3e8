//! Lexical index structures.
//!
//! This module provides the inverted index (term to posting list), its
//! builder over tokenized documents, and the dense vocabulary used to
//! address terms from the permuterm tree.

// Core data structures
pub mod inverted_index;
pub mod posting;
pub mod vocabulary;

// Construction
pub mod builder;

pub use builder::InvertedIndexBuilder;
pub use inverted_index::{IndexStats, InvertedIndex};
pub use posting::PostingList;
pub use vocabulary::{TermId, Vocabulary};
