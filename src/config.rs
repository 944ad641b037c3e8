//! Configuration for index construction, permuterm lookup and result output.
//!
//! Every section has a `Default` matching the conventional tool chain
//! (`$` sentinel, `*` wildcard, `0 1 <doc> 0 1.0 <run>` output lines), so a
//! configuration file only needs to name the values it changes.
//!
//! # Example
//!
//! ```
//! use permdex::config::PermdexConfig;
//!
//! let config: PermdexConfig =
//!     serde_json::from_str(r#"{ "trec": { "run_label": "myrun" } }"#).unwrap();
//! assert_eq!(config.trec.run_label, "myrun");
//! assert_eq!(config.permuterm.sentinel, '$');
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PermdexError, Result};

/// Default sentinel marking the rotation boundary.
pub const DEFAULT_SENTINEL: char = '$';

/// Default wildcard marker accepted in query patterns.
pub const DEFAULT_WILDCARD: char = '*';

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermdexConfig {
    /// Rotation encoding settings.
    pub permuterm: PermutermConfig,
    /// Text analysis settings used by the `tokenize` step.
    pub tokenizer: TokenizerConfig,
    /// Result line layout.
    pub trec: TrecConfig,
}

impl PermdexConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PermdexConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.permuterm.validate()
    }
}

/// Characters used by the rotation encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutermConfig {
    /// Delimiter appended to every term before rotating. Must never occur
    /// inside a term.
    pub sentinel: char,
    /// Marker standing for "any (possibly empty) run of characters".
    pub wildcard: char,
}

impl Default for PermutermConfig {
    fn default() -> Self {
        PermutermConfig {
            sentinel: DEFAULT_SENTINEL,
            wildcard: DEFAULT_WILDCARD,
        }
    }
}

impl PermutermConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sentinel == self.wildcard {
            return Err(PermdexError::invalid_config(format!(
                "sentinel and wildcard must differ (both are '{}')",
                self.sentinel
            )));
        }
        Ok(())
    }
}

/// Settings for turning raw document fields into index terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Drop English stopwords.
    pub stopwords: bool,
    /// Collapse `<stem>'<letter>` tokens to their stem.
    pub apostrophe_rule: bool,
    /// Document fields whose text is analyzed, in order.
    pub fields: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            stopwords: true,
            apostrophe_rule: true,
            fields: vec![
                "headline".to_string(),
                "byline".to_string(),
                "text".to_string(),
            ],
        }
    }
}

/// Constant columns of a Boolean-retrieval result line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrecConfig {
    pub query_id: String,
    pub iteration: String,
    pub rank: String,
    /// Unranked relevance marker.
    pub score: f64,
    pub run_label: String,
}

impl Default for TrecConfig {
    fn default() -> Self {
        TrecConfig {
            query_id: "0".to_string(),
            iteration: "1".to_string(),
            rank: "0".to_string(),
            score: 1.0,
            run_label: "permdex".to_string(),
        }
    }
}
