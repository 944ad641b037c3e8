//! Permuterm wildcard lookup.
//!
//! - [`rotation`] - rotations with a sentinel, and the reduction of a
//!   single-wildcard pattern to a rotation prefix
//! - [`tree`] - the balanced 2-3 tree the rotations are stored in
//! - [`index`] - the query facade joining tree matches with posting lists

pub mod index;
pub mod rotation;
pub mod tree;

pub use index::{PermutermIndex, PermutermStats, QueryHit};
pub use rotation::{WildcardPattern, rotations, wildcard_to_prefix};
pub use tree::TwoThreeTree;
