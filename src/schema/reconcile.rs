// src/schema/reconcile.rs

use std::collections::HashMap;
use strsim::jaro_winkler;
use tracing::debug;

use crate::error::IndexError;
use crate::schema::CanonicalSchema;

/// Similarity cutoffs tried strictest-first when a header misses the alias
/// map. The first tier with any candidate wins.
pub const MATCH_TIERS: &[f64] = &[1.0, 0.8, 0.6];

/// Headers the report format is known to have used for canonical fields.
const SEED_ALIASES: &[(&str, &str)] = &[
    ("Province_State", "Province/State"),
    ("Country_Region", "Country/Region"),
    ("Last_Update", "Last Update"),
    ("Lat", "Latitude"),
    ("Long_", "Longitude"),
    ("Incident_Rate", "Incidence_Rate"),
];

/// Rank every name scoring at or above `threshold` against `candidate`,
/// best first.
pub fn close_matches<'a>(
    candidate: &str,
    names: &'a [String],
    threshold: f64,
) -> Vec<(&'a str, f64)> {
    let mut scored: Vec<(&str, f64)> = names
        .iter()
        .map(|name| (name.as_str(), jaro_winkler(candidate, name)))
        .filter(|(_, score)| *score >= threshold)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// One run's field-name session: the canonical schema plus the alias map
/// grown from fuzzy matches.
///
/// Not shareable across concurrent consumers; a run owns exactly one
/// `Reconciler` and feeds it files sequentially.
pub struct Reconciler {
    schema: CanonicalSchema,
    aliases: HashMap<String, String>,
}

impl Reconciler {
    /// Seed the alias map with every canonical name mapped to itself plus
    /// the historical renames that apply to this schema.
    pub fn new(schema: CanonicalSchema) -> Self {
        let mut aliases: HashMap<String, String> = schema
            .fields()
            .iter()
            .map(|field| (field.clone(), field.clone()))
            .collect();
        for (raw, canonical) in SEED_ALIASES {
            if schema.contains(canonical) {
                aliases.insert((*raw).to_string(), (*canonical).to_string());
            }
        }
        Self { schema, aliases }
    }

    /// Map a raw header to its canonical field name.
    ///
    /// Alias hits are O(1) and learn nothing. A fuzzy hit is cached so every
    /// later row of the same file takes the fast path; header drift repeats
    /// across a whole file's rows, so the fuzzy cost amortizes to once per
    /// distinct header per run. A header no tier can place aborts the run.
    pub fn resolve(&mut self, raw: &str) -> Result<String, IndexError> {
        if let Some(canonical) = self.aliases.get(raw) {
            return Ok(canonical.clone());
        }
        for &tier in MATCH_TIERS {
            let ranked = close_matches(raw, self.schema.fields(), tier);
            if let Some((name, score)) = ranked.first() {
                debug!(raw, canonical = *name, score, tier, "learned header alias");
                let canonical = (*name).to_string();
                self.aliases.insert(raw.to_string(), canonical.clone());
                return Ok(canonical);
            }
        }
        Err(IndexError::UnresolvedField {
            field: raw.to_string(),
        })
    }

    /// Number of alias entries, seeds and learned mappings together.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }
}
