// src/sink/bulk.rs

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::process::generate::Document;

/// Actions per bulk request.
const CHUNK_ACTIONS: usize = 500;

/// Connection handle for the destination store's HTTP API.
pub struct EsClient {
    http: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// Append one document as an action/source NDJSON pair.
fn append_action(body: &mut String, doc: &Document) -> Result<()> {
    body.push_str(&serde_json::to_string(
        &json!({ "index": { "_index": doc.index } }),
    )?);
    body.push('\n');
    body.push_str(&serde_json::to_string(&doc.fields)?);
    body.push('\n');
    Ok(())
}

impl EsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base =
            Url::parse(base_url).with_context(|| format!("parsing endpoint {base_url:?}"))?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    /// Stream documents into `_bulk`, flushing every `CHUNK_ACTIONS` docs.
    pub fn bulk_index<I>(&self, docs: I) -> Result<u64>
    where
        I: Iterator<Item = Result<Document>>,
    {
        let mut body = String::new();
        let mut pending = 0usize;
        let mut total = 0u64;

        for doc in docs {
            let doc = doc?;
            append_action(&mut body, &doc)?;
            pending += 1;
            total += 1;
            if pending >= CHUNK_ACTIONS {
                self.flush(&mut body, &mut pending)?;
            }
        }
        if pending > 0 {
            self.flush(&mut body, &mut pending)?;
        }

        info!(docs = total, "bulk indexing complete");
        Ok(total)
    }

    fn flush(&self, body: &mut String, pending: &mut usize) -> Result<()> {
        let url = self.base.join("_bulk").context("building _bulk URL")?;
        debug!(actions = *pending, "posting bulk chunk");

        let response = self
            .http
            .post(url.clone())
            .header("Content-Type", "application/x-ndjson")
            .body(std::mem::take(body))
            .send()
            .with_context(|| format!("POST {url}"))?
            .error_for_status()
            .context("bulk request rejected")?;

        let parsed: BulkResponse = response.json().context("decoding bulk response")?;
        if parsed.errors {
            let failed = parsed
                .items
                .iter()
                .filter(|item| {
                    item.get("index")
                        .and_then(|action| action.get("error"))
                        .is_some()
                })
                .count();
            bail!("bulk request reported {failed} failed actions");
        }

        *pending = 0;
        Ok(())
    }
}
