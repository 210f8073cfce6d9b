//! Detail extraction from clause text: durations, monetary amounts, jurisdictions.
//!
//! Each helper returns the first occurrence only. Shared by the explainer and
//! the summarizer so both phrase the same clause the same way.

use once_cell::sync::Lazy;
use regex::Regex;

/// Jurisdiction names are cut to this many characters.
pub const MAX_JURISDICTION_CHARS: usize = 50;

/// `<integer> <unit>`, tolerating a parenthesised numeral ("thirty (30) days").
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+)\)?[\s-]*(day|week|month|year)s?\b").expect("valid duration regex")
});

/// `$`-prefixed amount, or a bare number followed by a currency word.
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$\s?\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s+(?:dollars|usd|euros?|eur|pounds|gbp)\b",
    )
    .expect("valid amount regex")
});

/// "laws of [the] [State of] <Capitalized Words>".
static LAWS_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:laws\s+of)\s+(?:(?i:the)\s+)?(?:(?i:state|commonwealth|province)\s+of\s+)?([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)",
    )
    .expect("valid laws-of regex")
});

/// "governed by ... <Capitalized Words>" within one sentence.
static GOVERNED_BY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:governed\s+by)[^.]*?\b([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)")
        .expect("valid governed-by regex")
});

/// First `<n> <unit>` duration, normalised to "30 days" / "1 year".
///
/// Numbers too large for `u64` are skipped in favour of a later match.
pub fn extract_duration(text: &str) -> Option<String> {
    DURATION.captures_iter(text).find_map(|caps| {
        let n: u64 = caps[1].parse().ok()?;
        let unit = caps[2].to_lowercase();
        if n == 1 {
            Some(format!("{n} {unit}"))
        } else {
            Some(format!("{n} {unit}s"))
        }
    })
}

/// First monetary amount, as written ("$500", "$1,250.00", "2000 euros").
pub fn extract_amount(text: &str) -> Option<String> {
    AMOUNT.find(text).map(|m| m.as_str().trim().to_string())
}

/// First jurisdiction name, capped at [`MAX_JURISDICTION_CHARS`].
pub fn extract_jurisdiction(text: &str) -> Option<String> {
    let caps = LAWS_OF
        .captures(text)
        .or_else(|| GOVERNED_BY.captures(text))?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    Some(name.chars().take(MAX_JURISDICTION_CHARS).collect())
}
