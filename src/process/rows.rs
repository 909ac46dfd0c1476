// src/process/rows.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, path::Path};

/// One CSV line keyed by the file's headers, in file order.
pub type RawRow = Vec<(String, String)>;

/// Header-as-keys reader over a report file. Yields one `RawRow` per data
/// line, lazily; nothing is buffered beyond the record in flight.
pub struct RowReader {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
}

impl RowReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("opening data file {:?}", path.as_ref()))?;
        // flexible: short rows happen in the wild, zip just truncates them
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
        let mut headers: Vec<String> = reader
            .headers()
            .context("reading CSV header line")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        // Files exported on Windows carry a UTF-8 BOM on the first header.
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.trim().to_string();
            }
        }
        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RowReader {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(anyhow::Error::new(e).context("reading CSV record"))),
        };
        let row: RawRow = self
            .headers
            .iter()
            .cloned()
            .zip(record.iter().map(|value| value.trim().to_string()))
            .collect();
        Some(Ok(row))
    }
}
