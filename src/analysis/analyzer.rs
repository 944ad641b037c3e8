//! Analyzer: the full text-to-terms pipeline.
//!
//! Tokenize, apply the apostrophe rule, then drop stopwords and empty
//! tokens.
//!
//! # Examples
//!
//! ```
//! use permdex::analysis::analyzer::Analyzer;
//! use permdex::config::TokenizerConfig;
//!
//! let analyzer = Analyzer::from_config(&TokenizerConfig::default());
//! assert_eq!(analyzer.analyze("The cat's toys, and the dog."), vec!["cat", "toys", "dog"]);
//! ```

use std::sync::Arc;

use crate::analysis::stop::StopWords;
use crate::analysis::tokenizer::{ApostropheRule, PunctuationTokenizer, Tokenizer};
use crate::config::TokenizerConfig;
use crate::document::record::{DocumentRecord, DocumentText};

pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    apostrophes: ApostropheRule,
    stop_words: Option<Arc<StopWords>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("apostrophes", &self.apostrophes)
            .field("stop_words", &self.stop_words.as_ref().map(|s| s.len()))
            .finish()
    }
}

impl Analyzer {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        apostrophes: ApostropheRule,
        stop_words: Option<Arc<StopWords>>,
    ) -> Self {
        Analyzer {
            tokenizer,
            apostrophes,
            stop_words,
        }
    }

    /// Build the standard pipeline, sharing the English stopword set when
    /// stopwords are enabled.
    pub fn from_config(config: &TokenizerConfig) -> Self {
        let stop_words = config.stopwords.then(StopWords::english);
        Analyzer::new(
            Box::new(PunctuationTokenizer::new()),
            ApostropheRule::new(config.apostrophe_rule),
            stop_words,
        )
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .iter()
            .map(|token| self.apostrophes.apply(token))
            .filter(|token| !token.is_empty())
            .filter(|token| {
                self.stop_words
                    .as_ref()
                    .is_none_or(|stop| !stop.contains(token))
            })
            .collect()
    }

    pub fn analyze_document(&self, doc: &DocumentText) -> DocumentRecord {
        DocumentRecord::new(doc.doc_id.as_str(), self.analyze(&doc.text))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::from_config(&TokenizerConfig::default())
    }
}
