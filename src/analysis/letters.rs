//! Letter counting
//!
//! Two counting policies over the same text, with two deliberately
//! distinct character-class inventories ported as literal code-point
//! sets. The raw count drops whitespace entirely; the normalized count
//! keeps it and replaces matched characters with their NFKC form,
//! returning the final character length. Unifying the two classes would
//! be a behavior change, not a cleanup.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Line terminators are stripped by both counting policies
static LINE_TERMINATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r]").expect("Invalid LINE_TERMINATOR_RE regex"));

/// Whitespace runs, stripped only by the raw policy
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid WHITESPACE_RE regex"));

/// Letter inventory of the raw count: Latin + Cyrillic plus extended
/// letters, case-insensitive
static RAW_LETTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-zñáéíóúüа-яёәңғүұқөһђѓєѕіїјљњћќўџґ]")
        .expect("Invalid RAW_LETTER_RE regex")
});

/// Letter-or-whitespace inventory of the normalized count; differs from
/// the raw inventory (ä/ö in, ó/ú out) and must stay separate
static NORM_LETTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-záäéíñóöúüа-яёәғѓґүұқөһңђєѕіїјљњћќўџ\s]")
        .expect("Invalid NORM_LETTER_RE regex")
});

/// Count letters with all whitespace stripped.
///
/// Line terminators are removed first, then remaining whitespace runs,
/// then every character matching the raw letter inventory is counted.
/// Empty or letter-free input yields 0.
pub fn raw_letter_count(text: &str) -> usize {
    let text = LINE_TERMINATOR_RE.replace_all(text, "");
    let text = WHITESPACE_RE.replace_all(&text, "");

    RAW_LETTER_RE.find_iter(&text).count()
}

/// Count characters after normalizing letters and spaces.
///
/// Line terminators are removed; every character matching the
/// normalized inventory is replaced by its NFKC form, all other
/// characters pass through untouched. The result is the character
/// length of the final string, so normalization-induced length changes
/// are reflected in the count.
pub fn normalized_letter_count(text: &str) -> usize {
    let text = LINE_TERMINATOR_RE.replace_all(text, "");

    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let s: &str = ch.encode_utf8(&mut buf);
        if NORM_LETTER_RE.is_match(s) {
            out.extend(s.nfkc());
        } else {
            out.push(ch);
        }
    }

    out.chars().count()
}
