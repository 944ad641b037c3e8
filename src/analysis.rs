//! Text analysis for Permdex.
//!
//! Raw document text becomes index terms in three steps: punctuation-aware
//! tokenization with lowercasing, the apostrophe collapse rule, and stopword
//! removal.

pub mod analyzer;
pub mod stop;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use stop::StopWords;
pub use tokenizer::{ApostropheRule, PunctuationTokenizer, Tokenizer};
