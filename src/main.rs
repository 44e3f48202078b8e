//! Conflict News Digest — batch entrypoint.
//! Reads candidates (already-fetched article tuples) from a JSON file, runs
//! classify → dedupe → select once, and writes the snippet output file.

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use conflict_news_digest::output::write_snippets;
use conflict_news_digest::{
    run_once, CandidateSource, Classifier, DigestConfig, JsonFileCache, JsonFileSource,
    NullParaphraser, NullSummarizer,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere. Enables DIGEST_CONFIG_PATH /
    // CLASSIFIER_CONFIG_PATH overrides.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = DigestConfig::load_default()?;
    let classifier = Classifier::from_toml()?;
    let cache = JsonFileCache::open(&cfg.cache_path)?;

    let mut sources: Vec<Box<dyn CandidateSource>> = Vec::new();
    match JsonFileSource::from_path("candidates", &cfg.candidates_path) {
        Ok(s) => sources.push(Box::new(s)),
        // A missing candidate file is an empty run, not a failure.
        Err(e) => warn!(error = %e, path = %cfg.candidates_path, "no candidates to process"),
    }

    let snippets = run_once(
        &sources,
        &classifier,
        &NullSummarizer,
        &NullParaphraser,
        &cache,
        &cfg.run_options(),
    )
    .await;

    write_snippets(Path::new(&cfg.output_path), &snippets)?;
    info!(
        count = snippets.len(),
        output = %cfg.output_path,
        cached = cache.len(),
        "snippets written"
    );
    Ok(())
}
