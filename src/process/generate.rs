// src/process/generate.rs

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::IndexError;
use crate::process::dates;
use crate::process::rows::RawRow;
use crate::schema::Reconciler;

/// Canonical fields whose values are reformatted to `YYYY-MM-DD` so the
/// destination store recognizes them as dates.
const DATE_FIELDS: &[&str] = &["Last Update"];

/// Field stamped on every document with the date of its source file; many
/// files' documents share one index, this keeps them distinguishable.
pub const DATE_DATA_FILE: &str = "date_data_file";

/// An index-ready record: destination index plus canonical source fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_source")]
    pub fields: BTreeMap<String, String>,
}

/// Turns one file's raw rows into index-ready documents. Holds the file's
/// embedded date so it is computed once and reused for every row.
pub struct DocGenerator {
    file_date: String,
    index: String,
    day_first: bool,
}

impl DocGenerator {
    /// Fails when `file_name` carries no recognizable date; such a file
    /// cannot be ordered against its siblings or tagged.
    pub fn new(file_name: &str, index: &str, day_first: bool) -> Result<Self, IndexError> {
        let file_date = dates::date_from_filename(file_name, day_first)?;
        Ok(Self {
            file_date,
            index: index.to_string(),
            day_first,
        })
    }

    pub fn file_date(&self) -> &str {
        &self.file_date
    }

    /// Lazily map rows to documents: one document per row, same order. A
    /// pull from downstream drives exactly one row's transformation.
    pub fn generate<'a, I>(
        &'a self,
        reconciler: &'a mut Reconciler,
        rows: I,
    ) -> impl Iterator<Item = anyhow::Result<Document>> + 'a
    where
        I: Iterator<Item = anyhow::Result<RawRow>> + 'a,
    {
        rows.map(move |row| Ok(self.document_from(reconciler, row?)?))
    }

    fn document_from(
        &self,
        reconciler: &mut Reconciler,
        row: RawRow,
    ) -> Result<Document, IndexError> {
        let mut fields = BTreeMap::new();
        fields.insert(DATE_DATA_FILE.to_string(), self.file_date.clone());

        for (raw_name, value) in row {
            let canonical = reconciler.resolve(&raw_name)?;
            fields.insert(canonical, value);
        }

        for &field in DATE_FIELDS {
            let Some(value) = fields.get(field) else {
                continue;
            };
            match dates::normalize_field(field, value, self.day_first) {
                Ok(iso) => {
                    fields.insert(field.to_string(), iso);
                }
                Err(err) if err.is_recoverable() => {
                    warn!(%err, "keeping raw date value");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(Document {
            index: self.index.clone(),
            fields,
        })
    }
}
