//! The term -> posting list mapping and its JSON form.
//!
//! The persisted layout is a single JSON object keyed by term:
//!
//! ```json
//! { "bird": { "df": 1, "postings": ["doc2"] },
//!   "dog":  { "df": 2, "postings": ["doc1", "doc2"] } }
//! ```
//!
//! Terms are written in ascending order and postings keep their stored
//! order, so saving and loading reproduces the index exactly.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PermdexError, Result};
use crate::lexical::posting::PostingList;

/// Immutable mapping from term to [`PostingList`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    terms: BTreeMap<String, PostingList>,
}

/// Summary of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents that contributed to the index. Only known right after a
    /// build; `None` for an index loaded from disk.
    pub documents_indexed: Option<u64>,
    /// Records skipped because they had no identifier.
    pub records_skipped: u64,
    /// Distinct terms.
    pub unique_terms: u64,
    /// Sum of all document frequencies.
    pub total_postings: u64,
}

impl InvertedIndex {
    pub(crate) fn from_terms(terms: BTreeMap<String, PostingList>) -> Self {
        InvertedIndex { terms }
    }

    /// Posting list of `term`, if indexed.
    pub fn lookup(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Document frequency of `term`, 0 if not indexed.
    pub fn doc_frequency(&self, term: &str) -> u64 {
        self.lookup(term).map_or(0, |list| list.doc_frequency)
    }

    /// Terms in ascending order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// `(term, posting list)` pairs in ascending term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.terms.iter().map(|(term, list)| (term.as_str(), list))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents_indexed: None,
            records_skipped: 0,
            unique_terms: self.terms.len() as u64,
            total_postings: self.terms.values().map(|list| list.doc_frequency).sum(),
        }
    }

    /// Check every posting list against the posting list laws.
    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|(term, list)| list.validate(term))
    }

    /// Parse and validate an index from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let index: InvertedIndex = serde_json::from_reader(reader)?;
        index.validate()?;
        Ok(index)
    }

    /// Write the index as JSON, indented unless `compact`.
    pub fn to_writer<W: Write>(&self, writer: W, compact: bool) -> Result<()> {
        if compact {
            serde_json::to_writer(writer, self)?;
        } else {
            serde_json::to_writer_pretty(writer, self)?;
        }
        Ok(())
    }

    /// Load an index file written by [`InvertedIndex::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let index = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            PermdexError::Json(err) => {
                PermdexError::format(format!("{}: {}", path.display(), err))
            }
            other => other,
        })?;
        log::debug!("loaded {} terms from {}", index.len(), path.display());
        Ok(index)
    }

    /// Save the index, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P, compact: bool) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer, compact)?;
        writer.flush()?;
        Ok(())
    }
}
