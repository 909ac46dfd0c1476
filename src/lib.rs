//! Reads dated CSV report files with a first line of headers and indexes
//! them to Elasticsearch, one line per document. Incoming headers drift
//! across report vintages; everything funnels through one canonical schema.

pub mod error;
pub mod files;
pub mod process;
pub mod schema;
pub mod sink;
