//! Wildcard lookup over an inverted index.
//!
//! [`PermutermIndex`] takes ownership of a built [`InvertedIndex`], indexes
//! every rotation of every vocabulary term in a [`TwoThreeTree`] in one pass,
//! and from then on only answers queries. Nothing is mutated after
//! construction, so a shared reference can be queried from several threads.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::PermutermConfig;
use crate::error::{PermdexError, Result};
use crate::lexical::inverted_index::InvertedIndex;
use crate::lexical::posting::PostingList;
use crate::lexical::vocabulary::{TermId, Vocabulary};
use crate::permuterm::rotation::{WildcardPattern, rotations, unrotate};
use crate::permuterm::tree::TwoThreeTree;

/// One `(term, document)` pair produced by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryHit<'a> {
    pub term: &'a str,
    pub doc_id: &'a str,
}

/// Size figures of a built [`PermutermIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermutermStats {
    pub terms: usize,
    pub rotations: usize,
    pub tree_height: usize,
    pub tree_nodes: usize,
}

/// An inverted index plus the permuterm tree over its vocabulary.
///
/// # Example
///
/// ```
/// use permdex::config::PermutermConfig;
/// use permdex::document::record::DocumentRecord;
/// use permdex::lexical::inverted_index::InvertedIndex;
/// use permdex::permuterm::index::PermutermIndex;
///
/// let index: InvertedIndex = vec![
///     DocumentRecord::new("doc1", ["cat", "dog"]),
///     DocumentRecord::new("doc2", ["dog", "bird"]),
/// ]
/// .into_iter()
/// .collect();
///
/// let permuterm = PermutermIndex::new(index, PermutermConfig::default()).unwrap();
/// let docs: Vec<&str> = permuterm.resolve("d*g").unwrap().iter().map(|h| h.doc_id).collect();
/// assert_eq!(docs, vec!["doc1", "doc2"]);
/// ```
#[derive(Debug, Clone)]
pub struct PermutermIndex {
    index: InvertedIndex,
    vocabulary: Vocabulary,
    tree: TwoThreeTree<TermId>,
    config: PermutermConfig,
}

impl PermutermIndex {
    /// Build the rotation tree over `index`'s vocabulary.
    ///
    /// Fails if the configuration is inconsistent or a term contains the
    /// sentinel, which would make its rotations ambiguous.
    pub fn new(index: InvertedIndex, config: PermutermConfig) -> Result<Self> {
        config.validate()?;
        let vocabulary = Vocabulary::from_index(&index);

        let mut tree = TwoThreeTree::new();
        for (id, term) in vocabulary.iter() {
            if term.contains(config.sentinel) {
                return Err(PermdexError::format(format!(
                    "term '{}' contains the sentinel '{}'",
                    term, config.sentinel
                )));
            }
            for rotation in rotations(term, config.sentinel) {
                tree.insert(rotation, id);
            }
        }

        log::info!(
            "permuterm tree built: {} terms, {} rotations, height {}",
            vocabulary.len(),
            tree.len(),
            tree.height()
        );

        Ok(PermutermIndex {
            index,
            vocabulary,
            tree,
            config,
        })
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tree(&self) -> &TwoThreeTree<TermId> {
        &self.tree
    }

    pub fn config(&self) -> &PermutermConfig {
        &self.config
    }

    pub fn stats(&self) -> PermutermStats {
        PermutermStats {
            terms: self.vocabulary.len(),
            rotations: self.tree.len(),
            tree_height: self.tree.height(),
            tree_nodes: self.tree.node_count(),
        }
    }

    /// Distinct vocabulary terms matching `pattern`, in ascending order.
    ///
    /// A pattern without a wildcard must equal a whole rotation, so `dog`
    /// finds `dog` but not `hotdog`.
    pub fn matching_terms(&self, pattern: &str) -> Result<Vec<&str>> {
        let parsed = WildcardPattern::parse(pattern, &self.config)?;
        let prefix = parsed.rotation_prefix(self.config.sentinel);

        let ids: BTreeSet<TermId> = if parsed.is_exact() {
            self.tree.get(&prefix).copied().into_iter().collect()
        } else {
            self.tree
                .search(&prefix)
                .into_iter()
                .map(|(rotation, &id)| {
                    debug_assert_eq!(
                        unrotate(rotation, self.config.sentinel).as_deref(),
                        self.vocabulary.get(id)
                    );
                    id
                })
                .collect()
        };
        log::debug!(
            "pattern '{}' -> prefix '{}': {} terms",
            pattern,
            prefix,
            ids.len()
        );

        ids.into_iter()
            .map(|id| {
                self.vocabulary
                    .get(id)
                    .ok_or_else(|| PermdexError::missing_vocabulary(format!("#{id}")))
            })
            .collect()
    }

    /// Posting lists of every term matching `pattern`.
    pub fn matching_postings(&self, pattern: &str) -> Result<Vec<(&str, &PostingList)>> {
        self.matching_terms(pattern)?
            .into_iter()
            .map(|term| {
                self.index
                    .lookup(term)
                    .map(|list| (term, list))
                    .ok_or_else(|| PermdexError::missing_vocabulary(term))
            })
            .collect()
    }

    /// One hit per `(matched term, document)`, terms ascending and each
    /// term's documents in posting order. No match is an empty result.
    pub fn resolve(&self, pattern: &str) -> Result<Vec<QueryHit<'_>>> {
        let hits: Vec<QueryHit<'_>> = self
            .matching_postings(pattern)?
            .into_iter()
            .flat_map(|(term, list)| {
                list.iter().map(move |doc_id| QueryHit {
                    term,
                    doc_id: doc_id.as_str(),
                })
            })
            .collect();
        log::debug!("pattern '{}' resolved to {} hits", pattern, hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::record::DocumentRecord;

    fn scenario() -> PermutermIndex {
        let index: InvertedIndex = vec![
            DocumentRecord::new("doc1", ["cat", "dog"]),
            DocumentRecord::new("doc2", ["dog", "bird"]),
        ]
        .into_iter()
        .collect();
        PermutermIndex::new(index, PermutermConfig::default()).unwrap()
    }

    #[test]
    fn test_tree_holds_every_rotation() {
        let permuterm = scenario();
        // bird(5) + cat(4) + dog(4)
        assert_eq!(permuterm.tree().len(), 13);
        permuterm.tree().check_invariants().unwrap();
        assert_eq!(permuterm.stats().terms, 3);
    }

    #[test]
    fn test_concrete_scenario() {
        let permuterm = scenario();
        let hits = permuterm.resolve("d*g").unwrap();
        assert_eq!(
            hits,
            vec![
                QueryHit {
                    term: "dog",
                    doc_id: "doc1"
                },
                QueryHit {
                    term: "dog",
                    doc_id: "doc2"
                },
            ]
        );
    }

    #[test]
    fn test_invalid_query() {
        let permuterm = scenario();
        assert!(matches!(
            permuterm.resolve("a*b*c"),
            Err(PermdexError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_exact_query_returns_stored_postings() {
        let permuterm = scenario();
        let postings = permuterm.matching_postings("dog").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].1, permuterm.inverted_index().lookup("dog").unwrap());

        assert!(permuterm.resolve("do").unwrap().is_empty());
        assert!(permuterm.resolve("").unwrap().is_empty());
    }

    #[test]
    fn test_exact_query_ignores_longer_terms() {
        let index: InvertedIndex = vec![DocumentRecord::new("d1", ["dog", "hotdog"])]
            .into_iter()
            .collect();
        let permuterm = PermutermIndex::new(index, PermutermConfig::default()).unwrap();
        assert_eq!(permuterm.matching_terms("dog").unwrap(), vec!["dog"]);
        assert_eq!(permuterm.matching_terms("*dog").unwrap(), vec!["dog", "hotdog"]);
    }

    #[test]
    fn test_open_ended_patterns() {
        let permuterm = scenario();
        assert_eq!(permuterm.matching_terms("*").unwrap(), vec!["bird", "cat", "dog"]);
        assert_eq!(permuterm.matching_terms("b*").unwrap(), vec!["bird"]);
        assert_eq!(permuterm.matching_terms("*t").unwrap(), vec!["cat"]);
        assert!(permuterm.matching_terms("z*").unwrap().is_empty());
    }

    #[test]
    fn test_sentinel_in_query_matches_nothing() {
        let permuterm = scenario();
        assert!(permuterm.resolve("do$").unwrap().is_empty());
        assert!(permuterm.resolve("dog$").unwrap().is_empty());
        assert!(permuterm.matching_terms("$*").unwrap().is_empty());
        assert!(permuterm.matching_terms("*$").unwrap().is_empty());
    }

    #[test]
    fn test_sentinel_in_vocabulary_rejected() {
        let index: InvertedIndex = vec![DocumentRecord::new("d1", ["us$"])].into_iter().collect();
        assert!(matches!(
            PermutermIndex::new(index, PermutermConfig::default()),
            Err(PermdexError::Format(_))
        ));
    }

    #[test]
    fn test_missing_posting_list_is_reported() {
        let mut permuterm = scenario();
        permuterm.index = InvertedIndex::default();
        assert!(matches!(
            permuterm.resolve("d*g"),
            Err(PermdexError::MissingVocabulary { .. })
        ));
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PermutermIndex>();

        let permuterm = scenario();
        std::thread::scope(|scope| {
            for pattern in ["d*", "*g", "c*t"] {
                let permuterm = &permuterm;
                scope.spawn(move || {
                    assert_eq!(permuterm.matching_terms(pattern).unwrap().len(), 1);
                });
            }
        });
    }
}
