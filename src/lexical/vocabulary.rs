//! Sorted, deduplicated term list drawn from an index.

use crate::lexical::inverted_index::InvertedIndex;

/// Dense handle of a term inside a [`Vocabulary`].
///
/// A plain position, so any vocabulary that fits in memory can be addressed.
pub type TermId = usize;

/// The universe of terms the permuterm tree is built over.
///
/// Terms are stored once, in ascending order, and referred to by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn from_index(index: &InvertedIndex) -> Self {
        // BTreeMap keys are already sorted and unique.
        Vocabulary {
            terms: index.terms().map(str::to_string).collect(),
        }
    }

    pub fn get(&self, id: TermId) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    /// `(id, term)` pairs in ascending term order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter().map(String::as_str).enumerate()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
