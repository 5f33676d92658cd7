//! Cell text canonicalisation.
//!
//! PDF text runs carry full-width digits, ligatures, non-breaking spaces and
//! line breaks inside what is visually one cell. Every cell goes through
//! [`normalize`] once, when its table is built, so the CSV output and the
//! size filter see the same text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Any run of Unicode whitespace.
static RE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// NFKC-normalise `text`, collapse each whitespace run to one ASCII space and trim.
///
/// Total and idempotent.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    reduce_spaces(&composed)
}

/// Collapse runs of spaces of any kind (tabs, line breaks, ideographic spaces…)
/// to a single space and strip the ends.
fn reduce_spaces(text: &str) -> String {
    RE_SPACE.replace_all(text, " ").trim().to_string()
}
