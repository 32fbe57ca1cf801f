//! Recovers a JSON value from free-form completion text.
//!
//! Models wrap their JSON in prose, markdown fences, or both, and now and
//! then leave a trailing comma behind. Each [`ExtractionStrategy`] handles
//! one of those shapes; [`JsonExtractor`] runs them in order and stops at
//! the first success. [`JsonExtractor::extract_as`] keeps going past
//! values of the wrong shape.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BrandCheckError;

const FENCE: &str = "```";

pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the recovered value, or a short reason for the failure.
    fn extract(&self, raw: &str) -> Result<Value, String>;

    /// Every value this strategy can recover, in order of appearance.
    fn candidates(&self, raw: &str) -> Result<Vec<Value>, String> {
        self.extract(raw).map(|value| vec![value])
    }
}

fn first_candidate(candidates: Result<Vec<Value>, String>) -> Result<Value, String> {
    candidates.and_then(|values| {
        values
            .into_iter()
            .next()
            .ok_or_else(|| "no candidate".to_string())
    })
}

/// Parses each text in turn, keeping the values and the last parse error.
fn parse_all<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    mut last_error: String,
) -> Result<Vec<Value>, String> {
    let mut values = Vec::new();
    for text in texts {
        match serde_json::from_str(text) {
            Ok(value) => values.push(value),
            Err(e) => last_error = e.to_string(),
        }
    }
    if values.is_empty() {
        Err(last_error)
    } else {
        Ok(values)
    }
}

/// Parses the whole completion as JSON.
pub struct DirectParse;

impl ExtractionStrategy for DirectParse {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract(&self, raw: &str) -> Result<Value, String> {
        serde_json::from_str(raw.trim()).map_err(|e| e.to_string())
    }
}

/// Parses the body of each markdown code fence, in order of appearance.
pub struct FencedBlock;

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn extract(&self, raw: &str) -> Result<Value, String> {
        first_candidate(self.candidates(raw))
    }

    fn candidates(&self, raw: &str) -> Result<Vec<Value>, String> {
        parse_all(fenced_blocks(raw), "no fenced block".to_string())
    }
}

/// Scans for top-level balanced `{...}` / `[...]` spans and parses each
/// candidate.
pub struct BalancedSpan;

impl ExtractionStrategy for BalancedSpan {
    fn name(&self) -> &'static str {
        "balanced_span"
    }

    fn extract(&self, raw: &str) -> Result<Value, String> {
        first_candidate(self.candidates(raw))
    }

    fn candidates(&self, raw: &str) -> Result<Vec<Value>, String> {
        parse_all(balanced_spans(raw), "no balanced span".to_string())
    }
}

/// Removes trailing commas before `}` / `]` and retries every candidate
/// the other strategies would have looked at.
pub struct TrailingCommaRepair;

impl ExtractionStrategy for TrailingCommaRepair {
    fn name(&self) -> &'static str {
        "trailing_comma_repair"
    }

    fn extract(&self, raw: &str) -> Result<Value, String> {
        first_candidate(self.candidates(raw))
    }

    fn candidates(&self, raw: &str) -> Result<Vec<Value>, String> {
        let mut texts = vec![raw.trim()];
        texts.extend(fenced_blocks(raw));
        texts.extend(balanced_spans(raw));

        let values: Vec<Value> = texts
            .into_iter()
            .filter_map(|text| {
                let repaired = strip_trailing_commas(text);
                if repaired.len() == text.len() {
                    return None;
                }
                serde_json::from_str(&repaired).ok()
            })
            .collect();
        if values.is_empty() {
            Err("nothing to repair".to_string())
        } else {
            Ok(values)
        }
    }
}

pub struct JsonExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExtractor {
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(DirectParse),
            Box::new(FencedBlock),
            Box::new(BalancedSpan),
            Box::new(TrailingCommaRepair),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn push_strategy(mut self, strategy: Box<dyn ExtractionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, raw: &str) -> Result<Value, BrandCheckError> {
        if raw.trim().is_empty() {
            return Err(BrandCheckError::unparsable("empty completion", raw));
        }

        let mut failures = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.extract(raw) {
                Ok(value) => {
                    tracing::debug!(strategy = strategy.name(), "Extracted JSON from completion");
                    return Ok(value);
                }
                Err(reason) => failures.push(format!("{}: {}", strategy.name(), reason)),
            }
        }

        tracing::debug!(raw = %raw, "Completion contained no parsable JSON");
        Err(BrandCheckError::unparsable(
            format!("no JSON value found ({})", failures.join("; ")),
            raw,
        ))
    }

    /// Returns the first candidate, across all strategies, that
    /// deserializes into `T`. Values of the wrong shape are skipped and only
    /// reported when nothing fits.
    pub fn extract_as<T: DeserializeOwned>(&self, raw: &str) -> Result<T, BrandCheckError> {
        if raw.trim().is_empty() {
            return Err(BrandCheckError::unparsable("empty completion", raw));
        }

        let mut failures = Vec::new();
        for strategy in &self.strategies {
            let values = match strategy.candidates(raw) {
                Ok(values) => values,
                Err(reason) => {
                    failures.push(format!("{}: {}", strategy.name(), reason));
                    continue;
                }
            };

            for value in values {
                match serde_json::from_value(value) {
                    Ok(typed) => {
                        tracing::debug!(strategy = strategy.name(), "Extracted JSON from completion");
                        return Ok(typed);
                    }
                    Err(e) => failures.push(format!(
                        "{}: unexpected JSON shape: {}",
                        strategy.name(),
                        e
                    )),
                }
            }
        }

        tracing::debug!(raw = %raw, "Completion contained no JSON of the expected shape");
        Err(BrandCheckError::unparsable(
            format!("no usable JSON value found ({})", failures.join("; ")),
            raw,
        ))
    }
}

/// Convenience wrapper around the default strategy list.
pub fn extract_json(raw: &str) -> Result<Value, BrandCheckError> {
    JsonExtractor::new().extract(raw)
}

/// Bodies of every code fence. The info string (`json`, `JSON`, ...) is
/// skipped; an unterminated fence runs to the end of the text.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let tag_len = after_open
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(after_open.len());
        let body_and_rest = &after_open[tag_len..];

        match body_and_rest.find(FENCE) {
            Some(close) => {
                blocks.push(body_and_rest[..close].trim());
                rest = &body_and_rest[close + FENCE.len()..];
            }
            None => {
                blocks.push(body_and_rest.trim());
                break;
            }
        }
    }

    blocks.retain(|block| !block.is_empty());
    blocks
}

/// Top-level balanced bracket spans, in order. Brackets nested inside a
/// span are never candidates on their own, and an unclosed bracket ends the
/// scan since everything after it belongs to the truncated value.
fn balanced_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'{' && bytes[pos] != b'[' {
            pos += 1;
            continue;
        }
        match balanced_end(bytes, pos) {
            SpanEnd::Closed(end) => {
                spans.push(&text[pos..end]);
                pos = end;
            }
            SpanEnd::Mismatched(at) => pos = at + 1,
            SpanEnd::Unclosed => break,
        }
    }

    spans
}

#[derive(Debug, PartialEq)]
enum SpanEnd {
    /// Exclusive end of the span.
    Closed(usize),
    /// Offset of the closing bracket that did not match.
    Mismatched(usize),
    Unclosed,
}

/// Finds where the span opened at `start` ends, honouring string literals
/// and escapes.
fn balanced_end(bytes: &[u8], start: usize) -> SpanEnd {
    let mut expected = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => expected.push(b'}'),
            b'[' => expected.push(b']'),
            b'}' | b']' => {
                if expected.pop() != Some(b) {
                    return SpanEnd::Mismatched(start + offset);
                }
                if expected.is_empty() {
                    return SpanEnd::Closed(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    SpanEnd::Unclosed
}

fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
