// src/config.rs
//! Pipeline run configuration: bounds, file paths, fallback depth.
//! Loaded from TOML with an env-var path override and built-in defaults,
//! so the batch binary runs with no config file at all.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::RunOptions;
use crate::select::SelectOptions;

pub const DEFAULT_DIGEST_CONFIG_PATH: &str = "config/digest.toml";
pub const ENV_DIGEST_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_max_total")]
    pub max_total: usize,
    #[serde(default = "default_max_per_source")]
    pub max_per_source: usize,
    /// How many leading body sentences the summary fallback takes.
    #[serde(default = "default_fallback_sentences")]
    pub fallback_sentences: usize,
    #[serde(default = "default_candidates_path")]
    pub candidates_path: String,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_window_days() -> i64 {
    7
}
fn default_max_total() -> usize {
    20
}
fn default_max_per_source() -> usize {
    5
}
fn default_fallback_sentences() -> usize {
    3
}
fn default_candidates_path() -> String {
    "candidates.json".to_string()
}
fn default_cache_path() -> String {
    "article_cache.json".to_string()
}
fn default_output_path() -> String {
    "conflict_news.json".to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty config uses defaults")
    }
}

impl DigestConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $DIGEST_CONFIG_PATH (must exist)
    /// 2) config/digest.toml if present
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_DIGEST_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::from_path(&pb);
            }
            return Err(anyhow::anyhow!(
                "DIGEST_CONFIG_PATH points to non-existent path"
            ));
        }
        let default_p = PathBuf::from(DEFAULT_DIGEST_CONFIG_PATH);
        if default_p.exists() {
            return Self::from_path(&default_p);
        }
        Ok(Self::default())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            select: SelectOptions {
                window_days: self.window_days,
                max_total: self.max_total,
                max_per_source: self.max_per_source,
            },
            fallback_sentences: self.fallback_sentences,
        }
    }
}
