// src/sink/mod.rs

pub mod bulk;

use anyhow::Result;
use tracing::info;

use crate::process::generate::Document;

pub use bulk::EsClient;

/// Destination for the document stream, selected by run configuration.
pub enum Sink {
    /// Bulk-index into the destination store.
    Bulk(EsClient),
    /// One JSON line per document on stdout.
    Console,
    /// Drain the stream without side effects, surfacing any reconciliation
    /// or date errors. Validation mode.
    Check,
}

impl Sink {
    /// Consume every document, returning how many were accepted. The pull
    /// here is what drives the upstream transformation, one row at a time.
    pub fn accept<I>(&mut self, docs: I) -> Result<u64>
    where
        I: Iterator<Item = Result<Document>>,
    {
        match self {
            Sink::Bulk(client) => client.bulk_index(docs),
            Sink::Console => {
                let mut accepted = 0;
                for doc in docs {
                    println!("{}", serde_json::to_string(&doc?)?);
                    accepted += 1;
                }
                Ok(accepted)
            }
            Sink::Check => {
                let mut accepted = 0;
                for doc in docs {
                    doc?;
                    accepted += 1;
                }
                info!(docs = accepted, "check passed");
                Ok(accepted)
            }
        }
    }
}
