// src/summarize.rs
//! Collaborator seams for summarization and headline paraphrasing, plus the
//! fallback chain the pipeline owns. The collaborators themselves (LLM or
//! extractive models) live outside this crate; an error and an empty success
//! are treated identically here.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::text::leading_sentences;

/// Sentinel summary used when both the collaborator and the body-text
/// fallback come up empty. A snippet's summary is never empty.
pub const NO_SUMMARY_SENTINEL: &str = "No summary available";

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait Paraphraser: Send + Sync {
    async fn paraphrase(&self, title: &str) -> Result<String>;
}

/// Default collaborator for the batch binary: always fails, so the
/// extractive fallback chain is the production path until a real model
/// client is wired in.
pub struct NullSummarizer;

#[async_trait]
impl Summarizer for NullSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String> {
        Err(anyhow!("no summarizer configured"))
    }
}

pub struct NullParaphraser;

#[async_trait]
impl Paraphraser for NullParaphraser {
    async fn paraphrase(&self, _title: &str) -> Result<String> {
        Err(anyhow!("no paraphraser configured"))
    }
}

/// Mandatory fallback chain: collaborator result, else the first
/// `fallback_sentences` sentences of the body, else the sentinel. The
/// returned summary is never empty.
pub async fn summary_or_fallback(
    summarizer: &dyn Summarizer,
    body_text: &str,
    fallback_sentences: usize,
) -> String {
    match summarizer.summarize(body_text).await {
        Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
        Ok(_) => fallback_summary(body_text, fallback_sentences),
        Err(e) => {
            warn!(error = %e, "summarizer failed; using extractive fallback");
            fallback_summary(body_text, fallback_sentences)
        }
    }
}

fn fallback_summary(body_text: &str, fallback_sentences: usize) -> String {
    let lead = leading_sentences(body_text, fallback_sentences);
    if lead.is_empty() {
        NO_SUMMARY_SENTINEL.to_string()
    } else {
        lead
    }
}

/// Paraphrase with keep-original fallback: a failing or empty paraphrase
/// never drops the snippet.
pub async fn title_or_paraphrase(paraphraser: &dyn Paraphraser, title: &str) -> String {
    match paraphraser.paraphrase(title).await {
        Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
        Ok(_) => title.to_string(),
        Err(e) => {
            warn!(error = %e, "paraphraser failed; keeping original title");
            title.to_string()
        }
    }
}
