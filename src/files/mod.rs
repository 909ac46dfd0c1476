// src/files/mod.rs

use anyhow::{Context, Result};
use glob::glob;
use std::{collections::BTreeMap, path::Path};

use crate::error::IndexError;
use crate::process::dates;

/// Map every report file in `dir` to the ISO date embedded in its name.
/// A candidate whose name carries no recognizable date fails the scan.
pub fn scan_directory<P: AsRef<Path>>(dir: P) -> Result<BTreeMap<String, String>> {
    let pattern = format!("{}/*.csv", dir.as_ref().display());
    let mut entries = BTreeMap::new();

    for path in glob(&pattern)
        .with_context(|| format!("globbing {pattern:?}"))?
        .filter_map(|entry| entry.ok())
    {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let date = dates::date_from_filename(name, false)?;
        entries.insert(name.to_string(), date);
    }

    if entries.is_empty() {
        return Err(IndexError::NoDataFiles {
            dir: dir.as_ref().to_path_buf(),
        }
        .into());
    }
    Ok(entries)
}

/// Name of the file whose embedded date is most recent.
pub fn latest_file<P: AsRef<Path>>(dir: P) -> Result<String> {
    let entries = scan_directory(&dir)?;
    let latest = entries
        .into_iter()
        // ISO dates order lexicographically
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(name, _)| name)
        .ok_or_else(|| IndexError::NoDataFiles {
            dir: dir.as_ref().to_path_buf(),
        })?;
    Ok(latest)
}
