//! Text normalization for menu input and program-name matching.
//!
//! User input and catalog names both pass through [`normalize`] before any
//! comparison, so `"Maestría"`, `"MAESTRIA"` and `" maestria "` are the
//! same string. [`tokenize`] feeds the matching engine; the stop-word list
//! mirrors the connective words that dominate program names in Spanish.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Stop words dropped during tokenization, in normalized form.
const STOP_WORDS: &[&str] = &[
    "en", "de", "del", "la", "el", "con", "y", "para", "los", "las", "por", "mencion",
];

/// Inputs counted as "yes" on confirmation nodes, in normalized form.
const AFFIRMATIVE: &[&str] = &["1", "si", "s", "y", "yes"];

/// Inputs counted as "no" on confirmation nodes, in normalized form.
const NEGATIVE: &[&str] = &["2", "no", "n", "nop"];

/// Canonicalize a string for comparison.
///
/// NFD decomposition with combining marks dropped (diacritic strip), the
/// U+FFFD replacement character removed (it leaks out of upstream copy that
/// went through a broken encoding step), lowercased, trimmed, and internal
/// whitespace runs collapsed to single spaces.
///
/// Idempotent: normalizing an already-normalized string is a no-op.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c) && *c != '\u{FFFD}')
        .collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split into meaningful tokens: normalized words minus stop words and
/// anything of two characters or fewer.
pub fn tokenize(raw: &str) -> Vec<String> {
    normalize(raw)
        .split_whitespace()
        .filter(|t| t.chars().count() > 2 && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Whether the input reads as "yes" (`1`, `si`, `sí`, `s`, `y`, `yes`).
pub fn is_affirmative(raw: &str) -> bool {
    AFFIRMATIVE.contains(&normalize(raw).as_str())
}

/// Whether the input reads as "no" (`2`, `no`, `n`, `nop`).
pub fn is_negative(raw: &str) -> bool {
    NEGATIVE.contains(&normalize(raw).as_str())
}
