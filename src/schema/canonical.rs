// src/schema/canonical.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Index mapping declaration as deployed to the destination store. Only the
/// property names matter here; field types stay the store's concern.
#[derive(Debug, Deserialize)]
struct MappingFile {
    mappings: Mappings,
}

#[derive(Debug, Deserialize)]
struct Mappings {
    properties: serde_json::Map<String, serde_json::Value>,
}

/// The destination index's field names, fixed for the whole run. The single
/// source of truth for what a valid output field is.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    fields: Vec<String>,
}

impl CanonicalSchema {
    /// Load the field names found under `mappings.properties` of a JSON
    /// mapping declaration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading mapping declaration {:?}", path.as_ref()))?;
        let decl: MappingFile = serde_json::from_str(&text)
            .with_context(|| format!("parsing mapping declaration {:?}", path.as_ref()))?;
        let fields: Vec<String> = decl.mappings.properties.keys().cloned().collect();
        if fields.is_empty() {
            bail!(
                "mapping declaration {:?} defines no properties",
                path.as_ref()
            );
        }
        Ok(Self { fields })
    }

    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}
