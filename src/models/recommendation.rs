use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Share of an excerpt's words that must occur in the content for a
/// paraphrased excerpt to count as drawn from it.
const NEAR_VERBATIM_OVERLAP: f64 = 0.8;
const NEAR_VERBATIM_MIN_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecommendation {
    #[serde(default)]
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<ContentRewrite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRewrite {
    pub original: String,
    pub improved: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("high") || lower == "critical" || lower == "urgent" {
            Ok(Priority::High)
        } else if lower.starts_with("med") {
            Ok(Priority::Medium)
        } else if lower.starts_with("low") {
            Ok(Priority::Low)
        } else {
            Err(format!("unknown priority '{}'", s))
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl ContentRecommendation {
    /// Drops rewrite examples whose `original` cannot be found in `content`.
    /// Returns how many were removed.
    pub fn retain_grounded_examples(&mut self, content: &str) -> usize {
        let before = self.examples.len();
        self.examples.retain(|example| example.is_grounded_in(content));
        before - self.examples.len()
    }
}

impl ContentRewrite {
    /// Whether `original` is a verbatim or near-verbatim excerpt of `content`.
    ///
    /// Matching ignores case, whitespace runs, typographic quotes and
    /// surrounding punctuation. Excerpts elided with "..." match when every
    /// fragment appears in order. Longer excerpts with small edits match when
    /// most of their words occur in the content.
    pub fn is_grounded_in(&self, content: &str) -> bool {
        let needle = normalize(&self.original);
        let needle = needle.trim_matches(|c: char| c.is_whitespace() || is_edge_punctuation(c));
        if needle.is_empty() {
            return false;
        }

        let haystack = normalize(content);
        if haystack.contains(needle) {
            return true;
        }

        let fragments: Vec<&str> = needle
            .split("...")
            .map(|f| f.trim_matches(|c: char| c.is_whitespace() || is_edge_punctuation(c)))
            .filter(|f| !f.is_empty())
            .collect();
        if fragments.len() > 1 && fragments_in_order(&fragments, &haystack) {
            return true;
        }

        word_overlap(needle, &haystack) >= NEAR_VERBATIM_OVERLAP
    }
}

fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{2033}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect::<String>()
        .replace('\u{2026}', "...")
        .to_lowercase();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_edge_punctuation(c: char) -> bool {
    matches!(c, '"' | '\'' | '.' | ',' | '!' | '?' | ';' | ':' | '`')
}

fn fragments_in_order(fragments: &[&str], haystack: &str) -> bool {
    let mut cursor = 0;
    for fragment in fragments {
        match haystack[cursor..].find(fragment) {
            Some(pos) => cursor += pos + fragment.len(),
            None => return false,
        }
    }
    true
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

fn word_overlap(needle: &str, haystack: &str) -> f64 {
    let needle_words = words(needle);
    if needle_words.len() < NEAR_VERBATIM_MIN_WORDS {
        return 0.0;
    }

    let vocabulary: HashSet<&str> = words(haystack).into_iter().collect();
    let found = needle_words
        .iter()
        .filter(|w| vocabulary.contains(*w))
        .count();

    found as f64 / needle_words.len() as f64
}
