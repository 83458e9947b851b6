#![allow(dead_code)]

//! Response interpretation — turns unreliable augmentation output into
//! structured data via an ordered chain of parser strategies.
//!
//! The augmentation collaborator is asked for JSON but routinely wraps it in
//! prose, markdown fences, or truncates it mid-object. Each strategy below is
//! an independently testable function; `parse_object` tries them in order and
//! the first success wins. Neither entry point ever fails: total failure
//! degrades to a best-effort fallback value.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

/// Key the fallback mapping uses to carry the unparsed text.
pub const RAW_RESPONSE_KEY: &str = "rawResponse";

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Extracts a JSON-shaped mapping from arbitrary text. Never fails.
///
/// Strategy order: whole-text parse → balanced-brace substring scan →
/// regex key/value salvage → `{"rawResponse": <text>}`.
pub fn parse_object(text: &str) -> Map<String, Value> {
    if let Some(map) = parse_whole_object(text) {
        return map;
    }
    if let Some(map) = scan_embedded_objects(text) {
        debug!("whole-text parse failed; recovered embedded JSON object");
        return map;
    }
    if let Some(map) = salvage_key_value_pairs(text) {
        debug!("no parseable JSON object; salvaged {} key/value pairs", map.len());
        return map;
    }

    let mut fallback = Map::new();
    fallback.insert(RAW_RESPONSE_KEY.to_string(), Value::String(text.to_string()));
    fallback
}

/// Extracts a sequence of JSON objects from arbitrary text. Never fails;
/// total failure yields an empty sequence.
pub fn parse_array(text: &str) -> Vec<Map<String, Value>> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text.trim()) {
        return objects_of(items);
    }

    for candidate in balanced_spans(text, '[', ']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(candidate) {
            let objects = objects_of(items);
            if !objects.is_empty() {
                return objects;
            }
        }
    }

    Vec::new()
}

fn objects_of(items: Vec<Value>) -> Vec<Map<String, Value>> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy 1: whole-text parse
// ────────────────────────────────────────────────────────────────────────────

/// Parses the entire trimmed text as a JSON object.
fn parse_whole_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy 2: balanced-brace substring scan
// ────────────────────────────────────────────────────────────────────────────

/// Scans for balanced `{...}` substrings and returns the first that parses
/// to a non-empty JSON object.
fn scan_embedded_objects(text: &str) -> Option<Map<String, Value>> {
    for candidate in balanced_spans(text, '{', '}') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            if !map.is_empty() {
                return Some(map);
            }
        }
    }
    None
}

/// Returns every top-level substring running from an opening delimiter to its
/// balancing close. Nested delimiters extend the current span; unclosed spans
/// are discarded.
fn balanced_spans(text: &str, open: char, close: char) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in text.char_indices() {
        if c == open {
            if depth == 0 {
                start = Some(i);
            }
            depth += 1;
        } else if c == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start.take() {
                    spans.push(&text[s..i + close.len_utf8()]);
                }
            }
        }
    }

    spans
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy 3: regex key/value salvage
// ────────────────────────────────────────────────────────────────────────────

static KEY_VALUE_RE: OnceLock<Regex> = OnceLock::new();

fn key_value_re() -> &'static Regex {
    KEY_VALUE_RE.get_or_init(|| {
        // "key": <quoted string | bracketed list | number | boolean | null>
        Regex::new(
            r#""([^"]+)"\s*:\s*("(?:[^"\\]|\\.)*"|\[[^\]]*\]|-?\d+(?:\.\d+)?|true|false|null)"#,
        )
        .expect("key/value salvage regex is valid")
    })
}

/// Pulls `"key": value` pairs straight out of broken text. List literals are
/// recorded as empty arrays rather than deep-parsed; the first occurrence of
/// a key wins.
fn salvage_key_value_pairs(text: &str) -> Option<Map<String, Value>> {
    let mut map = Map::new();

    for caps in key_value_re().captures_iter(text) {
        let key = caps[1].to_string();
        let raw = &caps[2];

        let value = if raw.starts_with('"') {
            serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.trim_matches('"').to_string()))
        } else if raw.starts_with('[') {
            Value::Array(Vec::new())
        } else {
            serde_json::from_str::<Value>(raw).unwrap_or(Value::Null)
        };

        map.entry(key).or_insert(value);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}
