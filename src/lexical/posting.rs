//! Posting lists.
//!
//! A posting list records which documents contain a term. Document
//! identifiers are opaque strings kept in strictly ascending byte order, and
//! the document frequency always equals the number of identifiers.

use serde::{Deserialize, Serialize};

use crate::error::{PermdexError, Result};

/// The documents containing one term.
///
/// Serialized as `{"df": <n>, "postings": [<doc id>, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    /// Number of distinct documents containing the term.
    #[serde(rename = "df")]
    pub doc_frequency: u64,
    /// Document identifiers, strictly ascending.
    pub postings: Vec<String>,
}

impl PostingList {
    /// Build a posting list from document identifiers in any order,
    /// dropping duplicates.
    pub fn from_unsorted<I, S>(doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut postings: Vec<String> = doc_ids.into_iter().map(Into::into).collect();
        postings.sort_unstable();
        postings.dedup();

        PostingList {
            doc_frequency: postings.len() as u64,
            postings,
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.postings.iter()
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.postings
            .binary_search_by(|p| p.as_str().cmp(doc_id))
            .is_ok()
    }

    /// Check the posting list laws: identifiers strictly ascending (hence
    /// duplicate-free) and `df` equal to their count.
    pub fn validate(&self, term: &str) -> Result<()> {
        if self.doc_frequency != self.postings.len() as u64 {
            return Err(PermdexError::format(format!(
                "term '{}': df is {} but {} postings are stored",
                term,
                self.doc_frequency,
                self.postings.len()
            )));
        }
        if let Some(pair) = self.postings.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(PermdexError::format(format!(
                "term '{}': postings not strictly ascending at '{}' -> '{}'",
                term, pair[0], pair[1]
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}
