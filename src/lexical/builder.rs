//! Inverted index construction.
//!
//! Each document's tokens are reduced to a set before being counted, so a
//! term repeated inside one document contributes a single posting. Document
//! sets are accumulated per term and turned into sorted posting lists once,
//! in [`InvertedIndexBuilder::build`].

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};

use crate::document::record::DocumentRecord;
use crate::error::{PermdexError, Result};
use crate::lexical::inverted_index::{IndexStats, InvertedIndex};
use crate::lexical::posting::PostingList;

/// Accumulates documents into an [`InvertedIndex`].
///
/// # Example
///
/// ```
/// use permdex::document::record::DocumentRecord;
/// use permdex::lexical::builder::InvertedIndexBuilder;
///
/// let mut builder = InvertedIndexBuilder::new();
/// builder.add_document(&DocumentRecord::new("doc1", ["cat", "dog"]));
/// builder.add_document(&DocumentRecord::new("doc2", ["dog", "bird"]));
///
/// let (index, stats) = builder.build();
/// assert_eq!(stats.documents_indexed, Some(2));
/// assert_eq!(index.lookup("dog").unwrap().postings, vec!["doc1", "doc2"]);
/// ```
#[derive(Debug, Default)]
pub struct InvertedIndexBuilder {
    accumulators: AHashMap<String, AHashSet<String>>,
    documents_indexed: u64,
    records_skipped: u64,
}

impl InvertedIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document. Returns `false` (and indexes nothing) if the record
    /// has no identifier.
    pub fn add_document(&mut self, record: &DocumentRecord) -> bool {
        let Some(doc_id) = record.id() else {
            self.records_skipped += 1;
            log::warn!(
                "{}",
                PermdexError::malformed_record(format!(
                    "record without document id skipped ({} tokens)",
                    record.tokens.len()
                ))
            );
            return false;
        };

        let distinct: AHashSet<&str> = record.tokens.iter().map(String::as_str).collect();
        for token in distinct {
            if let Some(docs) = self.accumulators.get_mut(token) {
                docs.insert(doc_id.to_string());
            } else {
                let mut docs = AHashSet::new();
                docs.insert(doc_id.to_string());
                self.accumulators.insert(token.to_string(), docs);
            }
        }

        self.documents_indexed += 1;
        true
    }

    /// Add every record of an infallible stream.
    pub fn add_documents<'a, I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a DocumentRecord>,
    {
        for record in records {
            self.add_document(record);
        }
        self
    }

    /// Add every record of a fallible stream (for example a file reader),
    /// stopping at the first error.
    pub fn try_add_documents<I>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Result<DocumentRecord>>,
    {
        for record in records {
            self.add_document(&record?);
        }
        Ok(self)
    }

    pub fn documents_indexed(&self) -> u64 {
        self.documents_indexed
    }

    /// Finalize: sort each term's documents into its posting list.
    pub fn build(self) -> (InvertedIndex, IndexStats) {
        let terms: BTreeMap<String, PostingList> = self
            .accumulators
            .into_iter()
            .map(|(term, docs)| (term, PostingList::from_unsorted(docs)))
            .collect();

        let index = InvertedIndex::from_terms(terms);
        let stats = IndexStats {
            documents_indexed: Some(self.documents_indexed),
            records_skipped: self.records_skipped,
            ..index.stats()
        };

        log::info!(
            "indexed {} documents ({} skipped), {} unique terms",
            stats.documents_indexed.unwrap_or(0),
            stats.records_skipped,
            stats.unique_terms
        );
        (index, stats)
    }
}

impl FromIterator<DocumentRecord> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = DocumentRecord>>(iter: I) -> Self {
        let mut builder = InvertedIndexBuilder::new();
        for record in iter {
            builder.add_document(&record);
        }
        builder.build().0
    }
}
