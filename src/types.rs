// src/types.rs
//! Core data model: candidates in, snippets out, and the article fingerprint
//! used for identity across dedup and the cache store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Conflict region assigned by the classifier. Variants are referenced by
/// name from `config/classifier.toml`; file order there is the match
/// priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    MiddleEast,
    Africa,
    Asia,
    Europe,
    LatinAmerica,
    Global,
}

impl Region {
    /// Human-readable form used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::MiddleEast => "Middle East",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::LatinAmerica => "Latin America",
            Region::Global => "Global",
        }
    }
}

/// A raw article record handed over by an external fetcher, before
/// classification. `body_text` may be empty when the fetcher could not
/// extract full content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    #[serde(default)]
    pub body_text: String,
    pub link: String,
    pub source: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// The finalized output unit for one kept article. Never mutated after
/// assembly; `summary` is guaranteed non-empty by the fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub region: Option<Region>,
}

/// Stable content fingerprint: SHA-256 over `title + link` as provided
/// (case-sensitive), first 16 bytes as lowercase hex. Equal fingerprints
/// mean the same article regardless of which outlet carried it.
pub fn fingerprint(title: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(link.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_input_sensitive() {
        let a = fingerprint("Strikes hit Kharkiv", "https://example.test/a");
        let b = fingerprint("Strikes hit Kharkiv", "https://example.test/a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);

        let other_link = fingerprint("Strikes hit Kharkiv", "https://example.test/b");
        assert_ne!(a, other_link);

        // Case-sensitive on purpose: inputs are used as provided.
        let other_case = fingerprint("strikes hit kharkiv", "https://example.test/a");
        assert_ne!(a, other_case);
    }

    #[test]
    fn candidate_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "title": "Ceasefire talks stall",
            "link": "https://example.test/x",
            "source": "Reuters"
        }"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert!(c.body_text.is_empty());
        assert!(c.published_at.is_none());
    }
}
