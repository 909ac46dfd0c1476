// src/error.rs

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where a date string came from. The context decides whether a parse
/// failure aborts the run or degrades the single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateContext {
    /// Embedded in a data file's name. A file that cannot be dated cannot be
    /// ordered against its siblings or tagged into documents.
    FileName,
    /// A date-valued field inside a row.
    RowField { field: String },
}

impl fmt::Display for DateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateContext::FileName => write!(f, "file name"),
            DateContext::RowField { field } => write!(f, "field {field:?}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    /// No canonical field matched at any similarity tier. Schema drift that
    /// needs an operator: add an alias or extend the mapping declaration.
    #[error("no canonical field matches header {field:?}")]
    UnresolvedField { field: String },

    #[error("no date recognized in {value:?} ({context})")]
    DateParse { value: String, context: DateContext },

    #[error("no CSV data files in {dir:?}")]
    NoDataFiles { dir: PathBuf },

    #[error("data file {path:?} does not exist")]
    MissingFile { path: PathBuf },
}

impl IndexError {
    /// Recoverable errors are reported and the stream continues; everything
    /// else propagates and aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IndexError::DateParse {
                context: DateContext::RowField { .. },
                ..
            }
        )
    }
}
