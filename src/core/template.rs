//! Name tag template resolution
//!
//! Expands a display template against a connected player.
//!
//! # Pipeline
//!
//! 1. The external placeholder service translates the template.
//! 2. `{path}` tokens are looked up in the player's attribute tree. The token
//!    body is one or more ASCII word characters (`[A-Za-z0-9_]`); `_` splits
//!    it into path segments, so `{stats_level}` reads `stats.level`.
//! 3. The configured literal substitutions are applied in order.
//!
//! A token whose path does not resolve stays in the output exactly as
//! written. Only that token is affected: every other token in the same string
//! is still substituted.
//!
//! # Examples
//!
//! ```
//! use chat_bubble::core::template::substitute_paths;
//! use serde_json::json;
//!
//! let attrs = json!({"stats": {"level": 7}});
//! assert_eq!(substitute_paths("Lv.{stats_level} {stats_xp}", &attrs), "Lv.7 {stats_xp}");
//! ```

use serde_json::Value;

use super::error::TranslateError;
use super::substitutions::ApiSubstitutions;
use super::traits::{HostPlayer, PlaceholderTranslator};

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves templates with an injected placeholder service and substitutions
#[derive(Debug, Clone)]
pub struct TemplateResolver<T> {
    translator: T,
    substitutions: ApiSubstitutions,
}

impl<T: PlaceholderTranslator> TemplateResolver<T> {
    pub fn new(translator: T, substitutions: ApiSubstitutions) -> Self {
        Self {
            translator,
            substitutions,
        }
    }

    pub fn substitutions(&self) -> &ApiSubstitutions {
        &self.substitutions
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Fully expand `template` for `player`.
    ///
    /// Only the placeholder service can fail; path lookups never do.
    pub fn resolve(&self, template: &str, player: &dyn HostPlayer) -> Result<String, TranslateError> {
        let translated = self.translator.translate(template, player)?;
        let substituted = substitute_paths(&translated, player.attributes());
        Ok(self.substitutions.apply(&substituted))
    }
}

// =============================================================================
// PATH SUBSTITUTION
// =============================================================================

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of the `{word}` token starting at `start`, braces included
fn token_len(bytes: &[u8], start: usize) -> Option<usize> {
    let body = bytes[start + 1..]
        .iter()
        .take_while(|&&b| is_word_byte(b))
        .count();
    let close = start + 1 + body;
    (body > 0 && bytes.get(close) == Some(&b'}')).then_some(body + 2)
}

/// Replace every `{path}` token with the attribute it names.
///
/// Single left-to-right pass; substituted values are never rescanned.
/// Unresolvable tokens are copied through unchanged.
pub fn substitute_paths(text: &str, attributes: &Value) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        let Some(len) = token_len(bytes, i) else {
            i += 1;
            continue;
        };

        // Token delimiters and body are ASCII, so these are char boundaries
        let token = &text[i..i + len];
        let path = &token[1..len - 1];

        out.push_str(&text[literal_start..i]);
        match lookup_path(attributes, path) {
            Some(value) => out.push_str(&value),
            None => out.push_str(token),
        }

        i += len;
        literal_start = i;
    }

    out.push_str(&text[literal_start..]);
    out
}

/// Walk `_`-separated segments into the attribute tree.
///
/// Objects are indexed by key and arrays by decimal index. Returns `None`
/// when any segment is empty or missing, or when a scalar (including `null`)
/// is indexed into. A final `null` is a value and renders as `null`.
pub fn lookup_path(attributes: &Value, path: &str) -> Option<String> {
    let mut current = attributes;
    for segment in path.split('_') {
        if segment.is_empty() {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value_to_string(current))
}

/// Text form of a looked-up value.
///
/// Whole-number floats drop the fraction (`20.0` -> `20`), `null` is the
/// literal `null`, and arrays join their elements with `,` (null elements
/// become empty). Objects render as compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
