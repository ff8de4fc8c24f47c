// src/import/decoder.rs
//! Turns an uploaded CSV payload into header-keyed rows that remember the
//! line they came from.

use crate::import::{
    error::ImportError,
    report::{ErrorKind, ValidationError},
};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Header as spelled in the file, echoed back in error reports.
    pub header: String,
    /// Lower-cased header used for lookups.
    pub key: String,
    pub value: String,
}

/// One decoded record, not yet normalized or validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    line: u64,
    fields: Vec<RawField>,
}

impl RawRow {
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn fields(&self) -> &[RawField] {
        &self.fields
    }

    /// Value of the column whose lower-cased header is `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Same as `get`, with a missing column read as an empty value.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }
}

// Serialized as a JSON object in file column order
impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.header, &field.value)?;
        }
        map.end()
    }
}

/// A payload whose header line has been read. Rows are decoded on demand;
/// calling `rows()` again starts over from the first data line.
#[derive(Debug, Clone)]
pub struct Decoded<'a> {
    text: &'a str,
    headers: Vec<String>,
}

impl<'a> Decoded<'a> {
    pub fn decode(text: &'a str) -> Result<Self, ImportError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = reader_for(text);
        let headers = reader
            .headers()
            .map_err(|e| ImportError::Unreadable(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        Ok(Self { text, headers })
    }

    /// Headers in their original spelling.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Lower-cased headers, in file order.
    pub fn keys(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.to_lowercase()).collect()
    }

    pub fn rows(&self) -> Rows<'a> {
        Rows {
            text: self.text,
            records: reader_for(self.text).into_records(),
            headers: self.headers.clone(),
            keys: self.keys(),
            scanned: 0,
            line: 1,
        }
    }
}

fn reader_for(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes())
}

pub struct Rows<'a> {
    text: &'a str,
    records: StringRecordsIntoIter<&'a [u8]>,
    headers: Vec<String>,
    keys: Vec<String>,
    // Newlines counted in text[..scanned]; record offsets only move forward
    scanned: usize,
    line: u64,
}

impl Rows<'_> {
    /// Source line of the record the reader positioned at `offset`.
    /// The reader reports the offset before any skipped blank lines, so
    /// line breaks are stepped over first.
    fn line_at(&mut self, offset: Option<u64>) -> u64 {
        let bytes = self.text.as_bytes();
        let mut start = offset.map_or(self.scanned, |o| o as usize).min(bytes.len());
        while start < bytes.len() && matches!(bytes[start], b'\r' | b'\n') {
            start += 1;
        }
        if start > self.scanned {
            self.line += bytes[self.scanned..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count() as u64;
            self.scanned = start;
        }
        self.line
    }

    fn to_row(&self, line: u64, record: &StringRecord) -> RawRow {
        let mut fields: Vec<RawField> = self
            .headers
            .iter()
            .zip(&self.keys)
            .zip(record.iter())
            .map(|((header, key), value)| RawField {
                header: header.clone(),
                key: key.clone(),
                value: value.to_string(),
            })
            .collect();

        // Values past the last header keep their column position as a name
        for (offset, value) in record.iter().enumerate().skip(self.headers.len()) {
            let header = format!("#{}", offset + 1);
            fields.push(RawField {
                key: header.clone(),
                header,
                value: value.to_string(),
            });
        }

        RawRow { line, fields }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<RawRow, ValidationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;

        let item = match next {
            Ok(record) => {
                let line = self.line_at(record.position().map(|p| p.byte()));
                let row = self.to_row(line, &record);
                if record.len() == self.headers.len() {
                    Ok(row)
                } else {
                    Err(ValidationError {
                        line,
                        kind: ErrorKind::Malformed,
                        message: format!(
                            "malformed row: expected {} fields, found {}",
                            self.headers.len(),
                            record.len()
                        ),
                        row,
                    })
                }
            }
            Err(e) => {
                let line = self.line_at(e.position().map(|p| p.byte()));
                Err(ValidationError {
                    line,
                    kind: ErrorKind::Malformed,
                    message: format!("malformed row: {e}"),
                    row: RawRow {
                        line,
                        fields: Vec::new(),
                    },
                })
            }
        };
        Some(item)
    }
}
