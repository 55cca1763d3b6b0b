//! Book title -> file stem.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest stem we ever produce, in bytes, leaving room for `.txt` under a
/// 255-byte name limit.
pub const MAX_STEM_LEN: usize = 245;

static COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r" *: *").expect("colon pattern"));
static FIRST_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.+?)\)").expect("parens pattern"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s;,_-]+").expect("allowlist pattern"));
static EDGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\W+|\W+$").expect("edge pattern"));

/// Turn a free-form book title into a safe file stem.
///
/// `reserved_suffix_length` is subtracted from [`MAX_STEM_LEN`], normally the
/// byte length of the destination directory path. Truncation never splits a
/// character, so the stem is at most that many bytes and at most that many
/// characters. Only the first parenthesised
/// group is rewritten to `- inner`; any later brackets are simply stripped by
/// the allowlist step. The result may be empty when the title is all symbols.
pub fn sanitize(raw_title: &str, reserved_suffix_length: usize) -> String {
    let s = COLON.replace_all(raw_title, " - ");
    let s = s.replace('?', "").replace('&', "and");
    let s = FIRST_PARENS.replace(&s, "- ${1}");
    let s = DISALLOWED.replace_all(&s, "");
    let s = EDGES.replace_all(&s, "");

    let max_len = MAX_STEM_LEN.saturating_sub(reserved_suffix_length);
    truncate_at_char_boundary(&s, max_len).to_string()
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}
