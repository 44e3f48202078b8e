// src/text.rs
//! Text hygiene for fetcher output, plus the sentence segmentation used by
//! the summary fallback.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Upper bound on normalized body text; protects the classifier and the
/// cache file from pathological extractions.
const MAX_BODY_CHARS: usize = 4000;

/// Normalize fetcher-extracted text: decode HTML entities, strip residual
/// tags, fold curly quotes to ASCII, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > MAX_BODY_CHARS {
        out = out.chars().take(MAX_BODY_CHARS).collect();
    }

    out
}

/// First `n` sentences of `text`, joined with their original terminators.
/// Splits at sentence boundaries (`.`, `!`, `?` followed by whitespace or
/// end of input), never mid-sentence. Text without any terminator is
/// returned whole. Empty input yields an empty string.
pub fn leading_sentences(text: &str, n: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || n == 0 {
        return String::new();
    }

    static RE_SENT: OnceCell<Regex> = OnceCell::new();
    let re = RE_SENT.get_or_init(|| Regex::new(r"[^.!?]*[.!?]+(?:\s+|$)").unwrap());

    let mut out = String::new();
    let mut taken = 0usize;
    for m in re.find_iter(trimmed) {
        out.push_str(m.as_str());
        taken += 1;
        if taken == n {
            break;
        }
    }

    if taken == 0 {
        // No sentence terminator at all; the whole text is one fragment.
        return trimmed.to_string();
    }
    out.trim_end().to_string()
}
