// src/classify.rs
//! Relevance classifier: region detection, strong/supporting conflict
//! vocabulary tiers, and the U.S.-domestic exclusion gate.
//!
//! All keyword and region tables are configuration data (TOML), injected at
//! construction; the algorithm itself carries no vocabulary. Matching is
//! case-insensitive substring matching over `title + " " + body_text`, so
//! a candidate with an empty body degrades to title-only classification.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::types::Region;

// --- env defaults & names ---
pub const DEFAULT_CLASSIFIER_CONFIG_PATH: &str = "config/classifier.toml";
pub const ENV_CLASSIFIER_CONFIG_PATH: &str = "CLASSIFIER_CONFIG_PATH";

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierRoot {
    /// Region tables in priority order: the first region with any marker
    /// hit wins, so classification stays deterministic when several match.
    #[serde(default)]
    pub regions: Vec<RegionCfg>,
    #[serde(default)]
    pub categories: Vec<CategoryCfg>,
    #[serde(default)]
    pub domestic: DomesticCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionCfg {
    pub name: Region,
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCfg {
    pub name: String,
    pub strength: Strength,
    pub keywords: Vec<String>,
}

/// Evidentiary weight of a keyword category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Supporting,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomesticCfg {
    #[serde(default)]
    pub markers: Vec<String>,
    /// Marker occurrences beyond this count flag the article as
    /// U.S.-domestic-only. A low count is tolerated: international stories
    /// legitimately mention U.S. actors.
    #[serde(default = "default_domestic_max_hits")]
    pub max_hits: usize,
}

fn default_domestic_max_hits() -> usize {
    2
}

impl Default for DomesticCfg {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            max_hits: default_domestic_max_hits(),
        }
    }
}

/* ----------------------------
Classification result
---------------------------- */

/// Result of one classification. Derived, never stored; recomputed each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_relevant: bool,
    pub region: Option<Region>,
    pub is_us_domestic_only: bool,
}

impl Classification {
    /// A candidate survives only when it is conflict-relevant and not a
    /// purely domestic U.S. story.
    pub fn keep(&self) -> bool {
        self.is_relevant && !self.is_us_domestic_only
    }
}

/* ----------------------------
Compiled classifier
---------------------------- */

/// The classifier holds lowercased marker/keyword tables compiled from the
/// TOML config. `classify` is a pure function of its inputs.
#[derive(Debug)]
pub struct Classifier {
    pub cfg: ClassifierRoot,
    regions: Vec<(Region, Vec<String>)>,
    strong: Vec<String>,
    supporting: Vec<String>,
    domestic: Vec<String>,
}

impl Classifier {
    /// Load from a TOML file. Uses CLASSIFIER_CONFIG_PATH or defaults to
    /// "config/classifier.toml".
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CLASSIFIER_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CLASSIFIER_CONFIG_PATH));

        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read classifier config at {}: {}",
                path.display(),
                e
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: ClassifierRoot = toml::from_str(toml_str)?;

        let regions = cfg
            .regions
            .iter()
            .map(|r| (r.name, lowercase_all(&r.markers)))
            .collect();

        let mut strong = Vec::new();
        let mut supporting = Vec::new();
        for cat in &cfg.categories {
            let dst = match cat.strength {
                Strength::Strong => &mut strong,
                Strength::Supporting => &mut supporting,
            };
            dst.extend(lowercase_all(&cat.keywords));
        }

        let domestic = lowercase_all(&cfg.domestic.markers);

        Ok(Self {
            cfg,
            regions,
            strong,
            supporting,
            domestic,
        })
    }

    /// Classify one candidate. Pure and deterministic: same inputs and
    /// config always yield the same result.
    pub fn classify(&self, title: &str, body_text: &str) -> Classification {
        let combined = format!("{} {}", title, body_text).to_lowercase();

        let region = self
            .regions
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| combined.contains(m.as_str())))
            .map(|(r, _)| *r);

        let strong = occurrence_count(&combined, &self.strong);
        let supporting = occurrence_count(&combined, &self.supporting);

        // Two-tier threshold: a strong military/violence signal is required
        // alongside geographic specificity; generic political-crisis
        // language with no identifiable region never passes.
        let is_relevant =
            region.is_some() && (strong >= 2 || (strong >= 1 && supporting >= 2));

        let domestic_hits = occurrence_count(&combined, &self.domestic);
        let is_us_domestic_only = domestic_hits > self.cfg.domestic.max_hits;

        Classification {
            is_relevant,
            region,
            is_us_domestic_only,
        }
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Total substring occurrences of all `needles` in `haystack`.
fn occurrence_count(haystack: &str, needles: &[String]) -> usize {
    needles
        .iter()
        .map(|n| haystack.matches(n.as_str()).count())
        .sum()
}

/* ----------------------------
Tests
---------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal, deterministic config used only for tests. Keyword sets are
    // deliberately tiny and non-overlapping so counts are easy to reason
    // about.
    const TEST_TOML: &str = r#"
[[regions]]
name = "MiddleEast"
markers = ["gaza", "israel", "lebanon"]

[[regions]]
name = "Europe"
markers = ["ukraine", "kyiv", "kharkiv"]

[[categories]]
name = "military_actions"
strength = "strong"
keywords = ["airstrike", "shelling", "offensive"]

[[categories]]
name = "violence_and_casualties"
strength = "strong"
keywords = ["killed", "casualties"]

[[categories]]
name = "peace_and_diplomacy"
strength = "supporting"
keywords = ["ceasefire", "truce"]

[[categories]]
name = "weapons_and_security"
strength = "supporting"
keywords = ["sanctions", "blockade"]

[domestic]
markers = ["congress", "senate", "wall street"]
max_hits = 2
"#;

    fn clf() -> Classifier {
        Classifier::from_toml_str(TEST_TOML).expect("load test config")
    }

    #[test]
    fn two_strong_hits_with_region_pass() {
        let c = clf();
        let r = c.classify(
            "Airstrike kills dozens in Gaza",
            "The shelling continued overnight.",
        );
        assert_eq!(r.region, Some(Region::MiddleEast));
        assert!(r.is_relevant);
        assert!(r.keep());
    }

    #[test]
    fn one_strong_zero_supporting_fails_both_branches() {
        let c = clf();
        let r = c.classify("Airstrike reported near Kyiv", "");
        assert_eq!(r.region, Some(Region::Europe));
        assert!(!r.is_relevant, "strong=1, supporting=0 must be rejected");
    }

    #[test]
    fn one_strong_two_supporting_passes() {
        let c = clf();
        let r = c.classify(
            "Airstrike near Kharkiv as ceasefire talks stall",
            "New sanctions were announced in Ukraine.",
        );
        assert_eq!(r.region, Some(Region::Europe));
        assert!(r.is_relevant);
    }

    #[test]
    fn strong_signal_without_region_is_rejected() {
        let c = clf();
        let r = c.classify("Airstrike leaves many killed", "Shelling and casualties mounted.");
        assert_eq!(r.region, None);
        assert!(!r.is_relevant, "no region marker means no relevance");
    }

    #[test]
    fn region_priority_is_file_order() {
        let c = clf();
        // Both MiddleEast and Europe markers present; MiddleEast is listed
        // first, so it wins.
        let r = c.classify("Israel and Ukraine in focus", "");
        assert_eq!(r.region, Some(Region::MiddleEast));
    }

    #[test]
    fn domestic_markers_above_threshold_exclude() {
        let c = clf();
        let r = c.classify(
            "Congress and Senate spar over the budget",
            "Wall Street reacted as the Senate debate continued in Congress.",
        );
        // congress x2 + senate x2 + wall street x1 = 5 > 2
        assert!(r.is_us_domestic_only);
        assert!(!r.keep());
    }

    #[test]
    fn low_domestic_mention_count_is_tolerated() {
        let c = clf();
        let r = c.classify(
            "Airstrike hits Gaza as Congress weighs response",
            "Casualties mounted; the Senate scheduled a vote.",
        );
        // congress=1, senate=1 -> not domestic-only; strong=2 with region
        assert!(!r.is_us_domestic_only);
        assert!(r.keep());
    }

    #[test]
    fn empty_body_degrades_to_title_only() {
        let c = clf();
        let r = c.classify("Shelling and airstrike pound Gaza", "");
        assert!(r.is_relevant, "title-only matching must still work");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = clf();
        let r = c.classify("AIRSTRIKE IN GAZA", "SHELLING CONTINUED");
        assert!(r.is_relevant);
    }

    #[test]
    fn classify_is_deterministic() {
        let c = clf();
        let a = c.classify("Airstrike in Gaza", "Shelling continued overnight.");
        let b = c.classify("Airstrike in Gaza", "Shelling continued overnight.");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_config_classifies_everything_irrelevant() {
        let c = Classifier::from_toml_str("").expect("empty config is valid");
        let r = c.classify("Airstrike in Gaza", "Shelling continued.");
        assert_eq!(r.region, None);
        assert!(!r.is_relevant);
        assert!(!r.is_us_domestic_only);
    }
}
