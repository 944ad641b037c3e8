//! TREC / Financial Times SGML collections.
//!
//! A collection file holds a run of `<DOC>` elements, each with tagged
//! fields:
//!
//! ```text
//! <DOC>
//! <DOCNO>FT911-1</DOCNO>
//! <HEADLINE>FT 14 MAY 91 / Markets rally</HEADLINE>
//! <TEXT>Shares rose ...</TEXT>
//! </DOC>
//! ```
//!
//! Each document becomes one [`TrecDocument`] holding the [`FIELDS`] values.
//! Documents without a `DOCNO` are dropped. Files are decoded as Latin-1,
//! which never fails and matches the collection's encoding.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{PermdexError, Result};

/// Field columns, in output order.
pub const FIELDS: [&str; 11] = [
    "docno", "profile", "date", "headline", "byline", "text", "pub", "page", "cn", "in", "tp",
];

/// Fields holding `;`-separated lists (countries, industries, topics).
const LIST_FIELDS: [&str; 3] = ["cn", "in", "tp"];

/// Characters trimmed from both ends of a list item.
const LIST_ITEM_TRIM: &[char] = &[' ', '.', ',', ':'];

fn field_index(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| *f == name)
}

/// One parsed document: a value (possibly empty) per [`FIELDS`] entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrecDocument {
    values: Vec<String>,
}

impl TrecDocument {
    pub fn docno(&self) -> &str {
        &self.values[0]
    }

    /// Value of `field`, or `None` if it is not one of [`FIELDS`].
    pub fn get(&self, field: &str) -> Option<&str> {
        field_index(field).map(|i| self.values[i].as_str())
    }

    /// Values in [`FIELDS`] order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

/// Text pieces collected for the fields of the document being read.
struct DocumentBuilder {
    pieces: Vec<Option<Vec<String>>>,
}

impl DocumentBuilder {
    fn new() -> Self {
        DocumentBuilder {
            pieces: vec![None; FIELDS.len()],
        }
    }

    fn seen(&self, field: usize) -> bool {
        self.pieces[field].is_some()
    }

    fn push(&mut self, field: usize, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.pieces[field].get_or_insert_with(Vec::new).push(text.to_string());
        }
    }

    fn open(&mut self, field: usize) {
        self.pieces[field].get_or_insert_with(Vec::new);
    }

    fn finish(self) -> TrecDocument {
        let values = self
            .pieces
            .into_iter()
            .zip(FIELDS)
            .map(|(pieces, name)| {
                let pieces = pieces.unwrap_or_default();
                if LIST_FIELDS.contains(&name) {
                    normalize_list(&pieces)
                } else {
                    pieces.join(" ")
                }
            })
            .collect();
        TrecDocument { values }
    }
}

/// Split list text on newlines and `;`, collapse inner whitespace, trim
/// ` .,:` from each item, and rejoin with `"; "`.
fn normalize_list(pieces: &[String]) -> String {
    pieces
        .iter()
        .flat_map(|piece| piece.lines())
        .flat_map(|line| line.split(';'))
        .map(|item| {
            item.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .trim_matches(LIST_ITEM_TRIM)
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse every `<DOC>` of a collection.
///
/// Returns the documents that carry a `DOCNO` and the number dropped for
/// lacking one. Only the first occurrence of each field inside a document
/// is kept; markup nested inside a field contributes its text.
pub fn parse_documents(content: &str) -> Result<(Vec<TrecDocument>, u64)> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut documents = Vec::new();
    let mut skipped = 0u64;

    let mut current: Option<DocumentBuilder> = None;
    // Field being captured and the element depth it was opened at.
    let mut capture: Option<(usize, usize)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if name == "doc" {
                    current = Some(DocumentBuilder::new());
                    capture = None;
                } else if let Some(doc) = current.as_mut() {
                    if capture.is_none() {
                        if let Some(field) = field_index(&name).filter(|&f| !doc.seen(f)) {
                            doc.open(field);
                            capture = Some((field, depth));
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if name == "doc" {
                    if let Some(doc) = current.take() {
                        let doc = doc.finish();
                        if doc.docno().is_empty() {
                            skipped += 1;
                        } else {
                            documents.push(doc);
                        }
                    }
                    capture = None;
                } else if capture.is_some_and(|(_, at)| at == depth) {
                    capture = None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if let (Some(doc), Some((field, _))) = (current.as_mut(), capture) {
                    let text = e
                        .unescape()
                        .map(|text| text.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    doc.push(field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(doc), Some((field, _))) = (current.as_mut(), capture) {
                    doc.push(field, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PermdexError::format(format!(
                    "malformed markup at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if skipped > 0 {
        log::debug!("{skipped} documents without DOCNO dropped");
    }
    Ok((documents, skipped))
}

/// Read and parse one collection file.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(Vec<TrecDocument>, u64)> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    // Latin-1 maps every byte to the code point of the same value.
    let content: String = bytes.iter().copied().map(char::from).collect();
    parse_documents(&content)
        .map_err(|e| PermdexError::format(format!("{}: {}", path.display(), e)))
}

/// Collection files under `input`: the file itself, or every file below a
/// directory (recursively, sorted by path), skipping dot-files.
pub fn collection_files<P: AsRef<Path>>(input: P) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut pending = vec![input.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if !path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'))
            {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = "<DOC>\n\
        <DOCNO> FT911-1 </DOCNO>\n\
        <PROFILE>_AN-BEOA7AAIFT</PROFILE>\n\
        <DATE>910514\n</DATE>\n\
        <HEADLINE>\nFT  14 MAY 91 / Markets rally &amp; recover\n</HEADLINE>\n\
        <BYLINE>By JOHN SMITH</BYLINE>\n\
        <TEXT>\nShares rose.\nBonds fell.\n</TEXT>\n\
        <PUB>The Financial Times</PUB>\n\
        <PAGE>London Page 1</PAGE>\n\
        <CN>UK;  US .\nDE:</CN>\n\
        <IN>P6000 Banks,</IN>\n\
        </DOC>\n\
        <DOC>\n\
        <HEADLINE>No identifier</HEADLINE>\n\
        <TEXT>Dropped.</TEXT>\n\
        </DOC>\n\
        <DOC>\n\
        <DOCNO>FT911-2</DOCNO>\n\
        <TEXT>Only text.</TEXT>\n\
        </DOC>\n";

    #[test]
    fn test_parse_collection() {
        let (docs, skipped) = parse_documents(COLLECTION).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(docs.len(), 2);

        let first = &docs[0];
        assert_eq!(first.docno(), "FT911-1");
        assert_eq!(first.get("date"), Some("910514"));
        assert_eq!(
            first.get("headline"),
            Some("FT  14 MAY 91 / Markets rally & recover")
        );
        assert_eq!(first.get("text"), Some("Shares rose.\nBonds fell."));
        assert_eq!(first.get("pub"), Some("The Financial Times"));
        assert_eq!(first.get("tp"), Some(""));
        assert_eq!(first.get("unknown"), None);

        assert_eq!(docs[1].docno(), "FT911-2");
        assert_eq!(docs[1].get("headline"), Some(""));
        assert_eq!(docs[1].values().count(), FIELDS.len());
    }

    #[test]
    fn test_list_fields_normalized() {
        let (docs, _) = parse_documents(COLLECTION).unwrap();
        assert_eq!(docs[0].get("cn"), Some("UK; US; DE"));
        assert_eq!(docs[0].get("in"), Some("P6000 Banks"));
    }

    #[test]
    fn test_first_field_occurrence_wins() {
        let content = "<DOC><DOCNO>D1</DOCNO><TEXT>one</TEXT><TEXT>two</TEXT></DOC>";
        let (docs, _) = parse_documents(content).unwrap();
        assert_eq!(docs[0].get("text"), Some("one"));
    }

    #[test]
    fn test_nested_markup_contributes_text() {
        let content = "<DOC><DOCNO>D1</DOCNO><TEXT><P>first</P> <P>second</P></TEXT></DOC>";
        let (docs, _) = parse_documents(content).unwrap();
        assert_eq!(docs[0].get("text"), Some("first second"));
    }

    #[test]
    fn test_lowercase_tags() {
        let content = "<doc><docno>d1</docno><headline>Hi</headline></doc>";
        let (docs, _) = parse_documents(content).unwrap();
        assert_eq!(docs[0].docno(), "d1");
        assert_eq!(docs[0].get("headline"), Some("Hi"));
    }

    #[test]
    fn test_read_latin1_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ft911_1");
        let mut bytes = b"<DOC><DOCNO>D1</DOCNO><TEXT>caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</TEXT></DOC>");
        fs::write(&path, bytes).unwrap();

        let (docs, _) = read_file(&path).unwrap();
        assert_eq!(docs[0].get("text"), Some("café"));
    }

    #[test]
    fn test_collection_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("ft911")).unwrap();
        fs::write(dir.path().join("ft911").join("ft911_2"), "").unwrap();
        fs::write(dir.path().join("ft911").join("ft911_1"), "").unwrap();
        fs::write(dir.path().join("ft921_1"), "").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();

        let files = collection_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                format!("ft911{}ft911_1", std::path::MAIN_SEPARATOR),
                format!("ft911{}ft911_2", std::path::MAIN_SEPARATOR),
                "ft921_1".to_string(),
            ]
        );

        let single = collection_files(dir.path().join("ft921_1")).unwrap();
        assert_eq!(single.len(), 1);
    }
}
