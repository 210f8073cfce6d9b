//! Legal jargon to plain English.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Phrase substitutions. Multi-word phrases come first so "party of the first
/// part" is rewritten whole before any single-word rule could touch it.
const JARGON: [(&str, &str); 11] = [
    ("party of the first part", "first party"),
    ("party of the second part", "second party"),
    ("pursuant to", "according to"),
    ("notwithstanding", "despite"),
    ("whereas", "given that"),
    ("herein", "in this document"),
    ("thereof", "of it"),
    ("thereto", "to it"),
    ("therein", "in it"),
    ("shall", "must"),
    ("may", "can"),
];

/// Whole-word rules for the lower-case and sentence-initial spellings.
static RULES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    JARGON
        .iter()
        .flat_map(|(term, plain)| {
            [
                (word_regex(term), plain.to_string()),
                (word_regex(&capitalize(term)), capitalize(plain)),
            ]
        })
        .collect()
});

fn word_regex(term: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(term))).expect("valid jargon regex")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace legalese with everyday wording.
pub fn simplify(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, plain) in RULES.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, NoExpand(plain.as_str())).into_owned();
        }
    }
    out
}
