// src/pipeline.rs
//! Pipeline orchestration: collect candidates from each source in order,
//! assemble snippets per candidate (classify → summarize → cache), then
//! dedupe and apply the recency/bounding filter.
//!
//! Failure semantics: a failing source or a failing candidate is logged and
//! skipped; the run always terminates with a valid (possibly empty) snippet
//! list. There is no fatal error inside the pipeline.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, CacheStore};
use crate::classify::Classifier;
use crate::dedup::dedupe;
use crate::select::{select, SelectOptions};
use crate::summarize::{summary_or_fallback, title_or_paraphrase, Paraphraser, Summarizer};
use crate::text::normalize_text;
use crate::types::{fingerprint, Candidate, Snippet};

/// Seam to the out-of-scope fetchers: anything that can yield a batch of
/// candidates. Fetch order across sources is the tie-break order for dedup.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>>;
    fn name(&self) -> &str;
}

/// Candidate source backed by a JSON file (or an inline fixture): an array
/// of `Candidate` objects as produced by the external fetchers. Lets the
/// batch binary and the e2e tests run without any network.
pub struct JsonFileSource {
    name: String,
    content: String,
}

impl JsonFileSource {
    pub fn from_fixture(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn from_path(name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading candidates from {}", path.display()))?;
        Ok(Self {
            name: name.to_string(),
            content,
        })
    }
}

#[async_trait]
impl CandidateSource for JsonFileSource {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&self.content).context("parsing candidate json")?;

        // One malformed entry (bad date, wrong field type) loses that entry
        // only, never the batch.
        let mut out = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<Candidate>(value) {
                Ok(c) => out.push(c),
                Err(e) => {
                    warn!(error = %e, source = %self.name, "malformed candidate entry skipped");
                    counter!("digest_malformed_total").increment(1);
                }
            }
        }
        counter!("digest_candidates_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Per-run knobs handed to `run_once`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub select: SelectOptions,
    pub fallback_sentences: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            select: SelectOptions::default(),
            fallback_sentences: 3,
        }
    }
}

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_candidates_total",
            "Candidates received from sources."
        );
        describe_counter!(
            "digest_malformed_total",
            "Candidates dropped for missing title/link."
        );
        describe_counter!("digest_rejected_total", "Candidates rejected by the classifier.");
        describe_counter!("digest_kept_total", "Candidates kept for snippet assembly.");
        describe_counter!("digest_cache_hits_total", "Cache records reused for body text.");
        describe_counter!("digest_dedup_total", "Snippets removed by deduplication.");
        describe_counter!("digest_source_errors_total", "Source fetch/parse errors.");
        describe_gauge!("digest_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Run the full pipeline once over all sources.
pub async fn run_once(
    sources: &[Box<dyn CandidateSource>],
    classifier: &Classifier,
    summarizer: &dyn Summarizer,
    paraphraser: &dyn Paraphraser,
    cache: &dyn CacheStore,
    opts: &RunOptions,
) -> Vec<Snippet> {
    ensure_metrics_described();

    let mut candidates = Vec::new();
    for s in sources {
        match s.fetch_latest().await {
            Ok(mut v) => candidates.append(&mut v),
            Err(e) => {
                warn!(error = ?e, source = s.name(), "source error");
                counter!("digest_source_errors_total").increment(1);
            }
        }
    }

    let total = candidates.len();
    let snippets =
        process_candidates(candidates, classifier, summarizer, paraphraser, cache, opts).await;

    let assembled = snippets.len();
    let unique = dedupe(snippets);
    let dedup_dropped = assembled - unique.len();
    counter!("digest_dedup_total").increment(dedup_dropped as u64);

    let now = Utc::now();
    let out = select(unique, now, &opts.select);
    gauge!("digest_last_run_ts").set(now.timestamp().max(0) as f64);

    info!(
        candidates = total,
        assembled,
        dedup_dropped,
        selected = out.len(),
        "pipeline run complete"
    );
    out
}

/// Assemble snippets per candidate, in source-then-arrival order. One
/// failing candidate removes only that candidate from the output.
pub async fn process_candidates(
    candidates: Vec<Candidate>,
    classifier: &Classifier,
    summarizer: &dyn Summarizer,
    paraphraser: &dyn Paraphraser,
    cache: &dyn CacheStore,
    opts: &RunOptions,
) -> Vec<Snippet> {
    let mut out = Vec::with_capacity(candidates.len());

    for cand in candidates {
        let title = normalize_text(&cand.title);
        let mut body = normalize_text(&cand.body_text);

        // Fetchers guarantee non-empty title/link; guard anyway and count.
        if title.is_empty() || cand.link.is_empty() {
            counter!("digest_malformed_total").increment(1);
            debug!(link = %cand.link, "malformed candidate skipped");
            continue;
        }

        let fp = fingerprint(&title, &cand.link);

        // Reuse cached body text so an already-processed article does not
        // require a re-fetch.
        match cache.get(&fp) {
            Ok(Some(rec)) if body.is_empty() && !rec.body_text.is_empty() => {
                counter!("digest_cache_hits_total").increment(1);
                body = rec.body_text;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, fingerprint = %fp, "cache read failed; continuing without reuse");
            }
        }

        let cls = classifier.classify(&title, &body);
        if !cls.keep() {
            counter!("digest_rejected_total").increment(1);
            debug!(
                source = %cand.source,
                region = ?cls.region,
                domestic = cls.is_us_domestic_only,
                "candidate rejected"
            );
            continue;
        }
        counter!("digest_kept_total").increment(1);

        // Record the article as processed before summarizing; a cache write
        // failure costs only the rerun benefit, not the snippet.
        let record = CacheRecord {
            fingerprint: fp,
            source: cand.source.clone(),
            title: title.clone(),
            body_text: body.clone(),
            link: cand.link.clone(),
            processed_at: Utc::now(),
        };
        if let Err(e) = cache.upsert(record) {
            warn!(error = %e, "cache write failed; continuing");
        }

        let summary = summary_or_fallback(summarizer, &body, opts.fallback_sentences).await;
        let title = title_or_paraphrase(paraphraser, &title).await;

        out.push(Snippet {
            title,
            summary,
            source: cand.source,
            link: cand.link,
            published_at: cand.published_at,
            region: cls.region,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_source_parses_candidate_arrays() {
        let src = JsonFileSource::from_fixture(
            "fixture",
            r#"[{"title": "T", "link": "https://example.test/1", "source": "AP"}]"#,
        );
        let got = src.fetch_latest().await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].source, "AP");
    }

    #[tokio::test]
    async fn json_source_rejects_invalid_payloads() {
        let src = JsonFileSource::from_fixture("fixture", "not json");
        assert!(src.fetch_latest().await.is_err());
    }

    #[tokio::test]
    async fn json_source_skips_malformed_entries_only() {
        let src = JsonFileSource::from_fixture(
            "fixture",
            r#"[
                {"title": "Good", "link": "https://example.test/1", "source": "AP"},
                {"title": "Bad date", "link": "https://example.test/2", "source": "AP",
                 "published_at": "yesterday-ish"}
            ]"#,
        );
        let got = src.fetch_latest().await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Good");
    }
}
