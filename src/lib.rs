// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod cache;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod output;
pub mod pipeline;
pub mod select;
pub mod summarize;
pub mod text;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::cache::{CacheRecord, CacheStore, JsonFileCache, MemoryCache};
pub use crate::classify::{Classification, Classifier};
pub use crate::config::DigestConfig;
pub use crate::dedup::dedupe;
pub use crate::pipeline::{run_once, CandidateSource, JsonFileSource, RunOptions};
pub use crate::select::{select, SelectOptions};
pub use crate::summarize::{
    NullParaphraser, NullSummarizer, Paraphraser, Summarizer, NO_SUMMARY_SENTINEL,
};
pub use crate::types::{fingerprint, Candidate, Region, Snippet};
