// src/select.rs
//! Recency windowing and per-source bounding of the final snippet set.
//!
//! Stale items (outside the trailing window) and items without a usable
//! publication date are dropped, never an error; then each source group is
//! ordered newest-first and capped so no single outlet dominates the output.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::types::Snippet;

#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Trailing window in days; snippets older than `now - window_days`
    /// are dropped.
    pub window_days: i64,
    /// Overall cap on the output list.
    pub max_total: usize,
    /// Cap per source group.
    pub max_per_source: usize,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            window_days: 7,
            max_total: 20,
            max_per_source: 5,
        }
    }
}

/// Bound and order the final set. Pure: for fixed inputs and `now`, the
/// result is identical across calls.
///
/// 1. Drop snippets outside the recency window (or without a date).
/// 2. Group by source; stable-sort each group by `published_at` descending
///    (ties keep input order); truncate each group to `max_per_source`.
/// 3. Concatenate groups in first-appearance order; truncate to `max_total`.
pub fn select(snippets: Vec<Snippet>, now: DateTime<Utc>, opts: &SelectOptions) -> Vec<Snippet> {
    let cutoff = now - Duration::days(opts.window_days);

    let fresh: Vec<Snippet> = snippets
        .into_iter()
        .filter(|s| s.published_at.map_or(false, |ts| ts >= cutoff))
        .collect();

    let mut source_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Snippet>> = HashMap::new();
    for s in fresh {
        if !groups.contains_key(&s.source) {
            source_order.push(s.source.clone());
        }
        groups.entry(s.source.clone()).or_default().push(s);
    }

    let mut out = Vec::new();
    for source in source_order {
        let mut group = groups.remove(&source).unwrap_or_default();
        // Stable sort: equal timestamps keep their arrival order.
        group.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        group.truncate(opts.max_per_source);
        out.extend(group);
    }

    out.truncate(opts.max_total);
    out
}
