// src/output.rs
//! Snippet JSON writer. Field presence is part of the contract: every
//! record carries all keys, with empty strings (never omitted keys) for
//! absent values. An empty run still writes a well-formed `[]`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::types::Snippet;

/// One serialized output record. Kept flat and stringly typed on purpose:
/// downstream consumers read this file, not the in-run `Snippet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub link: String,
    pub date: String,
    pub region: String,
}

impl From<&Snippet> for SnippetRecord {
    fn from(s: &Snippet) -> Self {
        Self {
            title: s.title.clone(),
            summary: s.summary.clone(),
            source: s.source.clone(),
            link: s.link.clone(),
            date: s.published_at.map(|ts| ts.to_rfc3339()).unwrap_or_default(),
            region: s.region.map(|r| r.as_str().to_string()).unwrap_or_default(),
        }
    }
}

/// Write the run's snippets, appending to an existing output file when it
/// already holds a valid record array. A corrupt existing file is logged
/// and overwritten fresh.
pub fn write_snippets(path: &Path, snippets: &[Snippet]) -> Result<()> {
    let mut records: Vec<SnippetRecord> = Vec::new();
    if path.exists() {
        let existing = fs::read_to_string(path)
            .with_context(|| format!("reading existing output {}", path.display()))?;
        match serde_json::from_str::<Vec<SnippetRecord>>(&existing) {
            Ok(prior) => records = prior,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "existing output unreadable; overwriting");
            }
        }
    }

    records.extend(snippets.iter().map(SnippetRecord::from));

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(path, json).with_context(|| format!("writing output {}", path.display()))
}
