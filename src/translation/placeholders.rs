/*!
 * Placeholder protection for ad copy translation.
 *
 * Ad bodies carry dynamic tokens such as `<product>` or `<discount>` that a
 * model would happily translate. Before a request each distinct tag is
 * swapped for a numbered `__PLACEHOLDER_{n}__` sentinel, and the sentinels
 * are swapped back in the reply.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Angle-bracket token without nested angle brackets
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]+>").expect("Invalid placeholder tag regex")
});

/// Numbered sentinel as sent to the model
static SENTINEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__PLACEHOLDER_(\d+)__").expect("Invalid placeholder sentinel regex")
});

/// Sentinel text for the n-th distinct tag
pub fn sentinel(index: usize) -> String {
    format!("__PLACEHOLDER_{}__", index)
}

/// All tags in `text`, left to right, repeats included
pub fn extract_placeholders(text: &str) -> Vec<String> {
    TAG_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Mapping between sentinels and the tags they stand for
///
/// Index `n` holds the tag behind `__PLACEHOLDER_{n}__`. Identical tags share
/// one index, so the map only grows with distinct tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    tags: Vec<String>,
}

impl PlaceholderMap {
    /// Replace every tag in `text` with its sentinel
    ///
    /// Returns the map needed to undo the replacement together with the
    /// protected text.
    pub fn protect(text: &str) -> (Self, String) {
        let mut tags: Vec<String> = Vec::new();
        let mut index_of: HashMap<String, usize> = HashMap::new();

        let protected = TAG_REGEX.replace_all(text, |caps: &Captures| {
            let tag = &caps[0];
            let index = *index_of.entry(tag.to_string()).or_insert_with(|| {
                tags.push(tag.to_string());
                tags.len() - 1
            });
            sentinel(index)
        });

        if !tags.is_empty() {
            debug!("Protected {} distinct placeholder(s)", tags.len());
        }

        (Self { tags }, protected.into_owned())
    }

    /// Put the original tags back in place of their sentinels
    ///
    /// Sentinels with an index this map does not know are left untouched.
    pub fn restore(&self, text: &str) -> String {
        if self.tags.is_empty() {
            return text.to_string();
        }

        SENTINEL_REGEX
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.tags.get(index))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Distinct tags in order of first appearance
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Sentinels that do not occur in `text`
    pub fn missing_sentinels(&self, text: &str) -> Vec<String> {
        (0..self.tags.len())
            .map(sentinel)
            .filter(|s| !text.contains(s.as_str()))
            .collect()
    }
}
