//! `#tag` extraction and the comma-joined storage format.
//!
//! Matching is case-sensitive: `#Client` and `#client` are different tags.
//! The storage format does not escape commas, so a tag produced by other
//! means that contains one will not survive a round trip.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// All `#word` tokens in `text`, left to right, duplicates included.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Join well-formed tags (leading `#`, at least one more character) with commas.
pub fn to_storage_format<S: AsRef<str>>(tags: &[S]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag: &str = tag.as_ref();
        if tag.starts_with('#') && tag.len() > 1 {
            kept.push(tag);
        }
    }
    kept.join(",")
}

/// Split a stored tag string on commas, dropping empty segments.
pub fn from_storage_format(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct hashtags across all texts, sorted ascending.
pub fn unique_hashtags<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let set: BTreeSet<String> = texts.into_iter().flat_map(extract_hashtags).collect();
    set.into_iter().collect()
}
