use std::collections::HashMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no columns to parse")]
    Empty,
    #[error("content is binary, not delimited text")]
    Binary,
    #[error("expected {expected} fields in line {line}, saw {found}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("EOF inside string starting at line {line}")]
    UnterminatedQuote { line: u64 },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// An in-memory table: named columns and rows of string cells.
/// Every row has exactly one cell per column; an empty cell is a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Returns a new [`Table`]
    /// # Error
    /// Errors if any row does not have one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ParseError::Ragged {
                line: i as u64 + 2,
                expected: columns.len(),
                found: row.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Parses CSV text whose first record holds the column names.
    ///
    /// Blank lines are skipped and rows shorter than the header are padded with empty cells.
    /// Empty column names become `Unnamed: {position}` and repeated names get a `.{n}` suffix.
    /// # Error
    /// Errors if there is no header, the text contains NUL characters, a quoted field
    /// is never closed, or a row has more fields than the header
    pub fn from_csv(text: &str) -> Result<Self, ParseError> {
        if text.contains('\0') {
            return Err(ParseError::Binary);
        }
        if let Some(line) = unterminated_quote(text) {
            return Err(ParseError::UnterminatedQuote { line });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?;
        if headers.is_empty() {
            return Err(ParseError::Empty);
        }
        let columns = column_names(headers.iter());

        let rows = reader
            .records()
            .map(|record| {
                let record = record?;
                if record.len() > columns.len() {
                    return Err(ParseError::Ragged {
                        line: record.position().map(|p| p.line()).unwrap_or_default(),
                        expected: columns.len(),
                        found: record.len(),
                    });
                }
                let mut row = record.iter().map(str::to_string).collect::<Vec<_>>();
                row.resize(columns.len(), String::new());
                Ok(row)
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(Self { columns, rows })
    }

    /// Serializes the table to CSV, header first
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.into_inner().map_err(|e| e.into_error().into())
    }

    /// Deserializes every row into `D`, matching fields by column name
    pub fn deserialize<D: DeserializeOwned>(&self) -> Result<Vec<D>, csv::Error> {
        let headers = self.columns.iter().collect::<csv::StringRecord>();
        self.rows
            .iter()
            .map(|row| {
                let record = row.iter().collect::<csv::StringRecord>();
                record.deserialize(Some(&headers))
            })
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|row| row.as_slice())
    }

    /// Returns the cells of column `name`, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.position(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.position(column)?;
        self.rows.get(row).map(|row| row[index].as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// Returns the line of a quoted field still open at the end of `text`.
/// Only a quote at the start of a field opens one; `""` inside it is an escaped quote.
fn unterminated_quote(text: &str) -> Option<u64> {
    let mut line = 1;
    let mut field_start = true;
    let mut opened_at = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match (opened_at, c) {
            (Some(_), '"') if chars.peek() == Some(&'"') => {
                chars.next();
            }
            (Some(_), '"') => opened_at = None,
            (None, '"') if field_start => {
                opened_at = Some(line);
                field_start = false;
            }
            (_, '\n') => {
                line += 1;
                field_start = opened_at.is_none();
            }
            (None, ',' | '\r') => field_start = true,
            (None, _) => field_start = false,
            (Some(_), _) => {}
        }
    }
    opened_at
}

/// Names empty headers after their position and suffixes repeated ones
/// (`a`, `a.1`, `a.2`), skipping suffixed names that are already taken.
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts = HashMap::<String, usize>::new();
    headers
        .enumerate()
        .map(|(i, header)| {
            let mut name = if header.is_empty() {
                format!("Unnamed: {i}")
            } else {
                header.to_string()
            };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}
