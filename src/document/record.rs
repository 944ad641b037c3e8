//! Build-input records.

use serde::{Deserialize, Serialize};

/// One tokenized document: its identifier and its (possibly repeating)
/// tokens.
///
/// A record whose identifier is empty after trimming is not indexable; the
/// index builder skips it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub tokens: Vec<String>,
}

impl DocumentRecord {
    pub fn new<S, I, T>(doc_id: S, tokens: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        DocumentRecord {
            doc_id: doc_id.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// The identifier with surrounding whitespace removed, or `None` if
    /// nothing is left.
    pub fn id(&self) -> Option<&str> {
        let id = self.doc_id.trim();
        (!id.is_empty()).then_some(id)
    }
}

/// Raw text gathered from a document's fields, before analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    pub doc_id: String,
    pub text: String,
}
