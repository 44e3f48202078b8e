// src/dedup.rs
//! Batch deduplication over assembled snippets.

use std::collections::HashSet;

use crate::types::{fingerprint, Snippet};

/// Collapse near-identical snippets by content fingerprint, keeping the
/// first occurrence in input order. The fingerprint covers `title + link`
/// but not `source`, so the same story syndicated across outlets collapses
/// to whichever arrived first. O(n) time, O(n) extra space.
pub fn dedupe(snippets: Vec<Snippet>) -> Vec<Snippet> {
    let mut seen: HashSet<String> = HashSet::with_capacity(snippets.len());
    let mut out = Vec::with_capacity(snippets.len());
    for s in snippets {
        if seen.insert(fingerprint(&s.title, &s.link)) {
            out.push(s);
        }
    }
    out
}
