//! Tab-separated document files.
//!
//! Two layouts are understood, both with a header row:
//!
//! - token files: `docno<TAB>tokens`, tokens separated by single spaces;
//! - field files: `docno<TAB>headline<TAB>byline<TAB>text...`, any column
//!   order, from which selected fields are gathered as raw text. They are
//!   written from parsed collections in [`FIELDS`] order.
//!
//! Values never contain tabs or newlines, so no quoting is used in either
//! direction.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, StringRecordsIntoIter, WriterBuilder};

use crate::document::record::{DocumentRecord, DocumentText};
use crate::document::trec::{FIELDS, TrecDocument};
use crate::error::{PermdexError, Result};

/// Column holding the document identifier.
pub const DOCNO_COLUMN: &str = "docno";

/// Column holding the space-separated tokens.
pub const TOKENS_COLUMN: &str = "tokens";

fn tsv_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(input)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Streams [`DocumentRecord`]s out of a token file.
///
/// Rows lacking a `docno` value come out with an empty identifier so the
/// builder can count them as skipped.
pub struct TokenTsvReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    docno: usize,
    tokens: Option<usize>,
}

impl TokenTsvReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::open(path.as_ref())?)
    }
}

impl<R: Read> TokenTsvReader<R> {
    pub fn new(input: R) -> Result<Self> {
        let mut reader = tsv_reader(input);
        let headers = reader.headers()?.clone();

        let docno = column(&headers, DOCNO_COLUMN).ok_or_else(|| {
            PermdexError::format(format!("token file has no '{DOCNO_COLUMN}' column"))
        })?;
        let tokens = column(&headers, TOKENS_COLUMN);

        Ok(TokenTsvReader {
            records: reader.into_records(),
            docno,
            tokens,
        })
    }
}

impl<R: Read> Iterator for TokenTsvReader<R> {
    type Item = Result<DocumentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.records.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e.into())),
        };

        let doc_id = row.get(self.docno).unwrap_or("").trim();
        let tokens = self
            .tokens
            .and_then(|i| row.get(i))
            .unwrap_or("")
            .split_whitespace();

        Some(Ok(DocumentRecord::new(doc_id, tokens)))
    }
}

/// Writes [`DocumentRecord`]s as a token file.
pub struct TokenTsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TokenTsvWriter<W> {
    /// Create a writer and emit the header row.
    pub fn new(output: W) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .from_writer(output);
        writer.write_record([DOCNO_COLUMN, TOKENS_COLUMN])?;
        Ok(TokenTsvWriter { writer })
    }

    pub fn write(&mut self, record: &DocumentRecord) -> Result<()> {
        let tokens = record.tokens.join(" ");
        self.writer.write_record([record.doc_id.as_str(), tokens.as_str()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes [`TrecDocument`]s as a field file with a [`FIELDS`] header.
///
/// Tabs and newlines inside values become spaces, so every document stays
/// on one row.
pub struct FieldTsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> FieldTsvWriter<W> {
    pub fn new(output: W) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .from_writer(output);
        writer.write_record(FIELDS)?;
        Ok(FieldTsvWriter { writer })
    }

    pub fn write(&mut self, doc: &TrecDocument) -> Result<()> {
        let row: Vec<String> = doc
            .values()
            .map(|value| value.replace(['\t', '\n', '\r'], " ").trim().to_string())
            .collect();
        self.writer.write_record(&row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Streams [`DocumentText`]s out of a field file, joining the selected
/// fields with newlines. Fields absent from the header are ignored; rows
/// without a `docno` value are dropped.
pub struct FieldTsvReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    docno: usize,
    fields: Vec<usize>,
}

impl FieldTsvReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, fields: &[String]) -> Result<Self> {
        Self::new(File::open(path.as_ref())?, fields)
    }
}

impl<R: Read> FieldTsvReader<R> {
    pub fn new(input: R, fields: &[String]) -> Result<Self> {
        let mut reader = tsv_reader(input);
        let headers = reader.headers()?.clone();

        let docno = column(&headers, DOCNO_COLUMN).ok_or_else(|| {
            PermdexError::format(format!("field file has no '{DOCNO_COLUMN}' column"))
        })?;
        let fields = fields
            .iter()
            .filter_map(|name| {
                let found = column(&headers, name);
                if found.is_none() {
                    log::warn!("field '{name}' not present in input header");
                }
                found
            })
            .collect();

        Ok(FieldTsvReader {
            records: reader.into_records(),
            docno,
            fields,
        })
    }
}

impl<R: Read> Iterator for FieldTsvReader<R> {
    type Item = Result<DocumentText>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.records.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e.into())),
            };

            let doc_id = row.get(self.docno).unwrap_or("").trim();
            if doc_id.is_empty() {
                continue;
            }

            let text = self
                .fields
                .iter()
                .filter_map(|&i| row.get(i))
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join("\n");

            return Some(Ok(DocumentText {
                doc_id: doc_id.to_string(),
                text,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_token_file() {
        let data = "docno\ttokens\ndoc1\tcat dog cat\n\tlost token\ndoc2\tdog  bird\n";
        let records: Vec<DocumentRecord> = TokenTsvReader::new(data.as_bytes())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], DocumentRecord::new("doc1", ["cat", "dog", "cat"]));
        assert_eq!(records[1].id(), None);
        assert_eq!(records[2].tokens, vec!["dog", "bird"]);
    }

    #[test]
    fn test_token_file_without_tokens_column() {
        let data = "docno\ndoc1\n";
        let records: Vec<DocumentRecord> = TokenTsvReader::new(data.as_bytes())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records, vec![DocumentRecord::new("doc1", Vec::<String>::new())]);
    }

    #[test]
    fn test_missing_docno_column() {
        let data = "id\ttokens\ndoc1\tcat\n";
        assert!(matches!(
            TokenTsvReader::new(data.as_bytes()),
            Err(PermdexError::Format(_))
        ));
    }

    #[test]
    fn test_write_then_read_token_file() {
        let mut buffer = Vec::new();
        {
            let mut writer = TokenTsvWriter::new(&mut buffer).unwrap();
            writer
                .write(&DocumentRecord::new("doc1", ["cat", "dog"]))
                .unwrap();
            writer
                .write(&DocumentRecord::new("doc2", ["bird"]))
                .unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(
            String::from_utf8(buffer.clone()).unwrap(),
            "docno\ttokens\ndoc1\tcat dog\ndoc2\tbird\n"
        );

        let records: Vec<DocumentRecord> = TokenTsvReader::new(buffer.as_slice())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records[1], DocumentRecord::new("doc2", ["bird"]));
    }

    #[test]
    fn test_write_then_read_field_file() {
        let content = "<DOC><DOCNO>FT1</DOCNO><HEADLINE>Markets\trally</HEADLINE>\
                       <TEXT>Shares rose.\nBonds fell.</TEXT></DOC>";
        let (docs, _) = crate::document::trec::parse_documents(content).unwrap();

        let mut buffer = Vec::new();
        {
            let mut writer = FieldTsvWriter::new(&mut buffer).unwrap();
            for doc in &docs {
                writer.write(doc).unwrap();
            }
            writer.flush().unwrap();
        }
        let written = String::from_utf8(buffer.clone()).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(FIELDS.join("\t").as_str()));
        assert_eq!(
            lines.next(),
            Some("FT1\t\t\tMarkets rally\t\tShares rose. Bonds fell.\t\t\t\t\t")
        );

        let fields = vec!["headline".to_string(), "text".to_string()];
        let texts: Vec<DocumentText> = FieldTsvReader::new(buffer.as_slice(), &fields)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(texts[0].text, "Markets rally\nShares rose. Bonds fell.");
    }

    #[test]
    fn test_read_field_file() {
        let data = "docno\tdate\theadline\ttext\n\
                    FT1\t1991\tMarkets rally\tShares rose.\n\
                    \t1991\tNo id\tDropped\n\
                    FT2\t1992\t\tOnly text\n";
        let fields = vec!["headline".to_string(), "byline".to_string(), "text".to_string()];
        let docs: Vec<DocumentText> = FieldTsvReader::new(data.as_bytes(), &fields)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_id, "FT1");
        assert_eq!(docs[0].text, "Markets rally\nShares rose.");
        assert_eq!(docs[1].text, "Only text");
    }
}
