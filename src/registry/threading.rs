//! Heuristic detection of multithreading support from package metadata
//!
//! Registries rarely state threading support as structured data, so this
//! scans free text for thread-related CLI flags and keywords. The result
//! is deliberately tri-state: "no text to scan" is not the same claim as
//! "scanned and found nothing".

use std::sync::LazyLock;

use regex::Regex;

use crate::search::types::ThreadingSupport;

const FLAG_KEYWORDS: &[&str] = &[
    "-t",
    "--threads",
    "-threads",
    "--thread",
    "-thread",
    "--nthreads",
    "-nthreads",
    "--num-threads",
    "--cores",
    "-cores",
    "--num-cores",
];

const THREADING_WORDS: &[&str] = &[
    "parallel",
    "multithread",
    "multi-thread",
    "multi thread",
    "concurrent",
    "cpu cores",
    "processor cores",
];

static FLAG_WITH_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:-t|--threads|--thread|--num-threads|--cores)\s*\d+")
        .expect("threading flag pattern is valid")
});

/// Scans description text (and any longer readme-like text) for threading
/// indicators, returning the classification plus the concrete flags found
pub fn detect_threading(
    description: &str,
    readme: Option<&str>,
) -> (ThreadingSupport, Vec<String>) {
    let text = format!("{} {}", description, readme.unwrap_or("")).to_lowercase();
    if text.trim().is_empty() {
        return (ThreadingSupport::Unknown, Vec::new());
    }

    let mut flags: Vec<String> = FLAG_KEYWORDS
        .iter()
        .filter(|kw| contains_flag(&text, kw))
        .map(|kw| kw.to_string())
        .collect();

    for m in FLAG_WITH_COUNT.find_iter(&text) {
        let found = m.as_str().to_string();
        if !flags.contains(&found) {
            flags.push(found);
        }
    }

    let has_keyword = THREADING_WORDS.iter().any(|w| text.contains(w));

    if has_keyword || !flags.is_empty() {
        (ThreadingSupport::Explicit, flags)
    } else {
        (ThreadingSupport::NotDetected, flags)
    }
}

/// Matches a flag only at a word boundary so `-t` doesn't fire inside
/// ordinary prose like "state-the-art"
fn contains_flag(text: &str, flag: &str) -> bool {
    text.match_indices(flag).any(|(start, _)| {
        let before_ok = start == 0
            || text[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == '(' || c == '[');
        let after = text[start + flag.len()..].chars().next();
        let after_ok = after.is_none_or(|c| !c.is_alphanumeric() || c.is_ascii_digit());
        before_ok && after_ok
    })
}
