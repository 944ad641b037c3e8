//! Document records and their on-disk tab-separated form.
//!
//! # Core Components
//!
//! - [`record::DocumentRecord`] - a document id with its tokens, the build input
//! - [`record::DocumentText`] - a document id with raw field text, the analysis input
//! - [`trec`] - the SGML collection reader producing field rows
//! - [`tsv`] - readers and writers for token and field files

pub mod record;
pub mod trec;
pub mod tsv;

pub use record::{DocumentRecord, DocumentText};
pub use trec::{FIELDS, TrecDocument};
pub use tsv::{FieldTsvReader, FieldTsvWriter, TokenTsvReader, TokenTsvWriter};
