//! Recursive-descent readers for untyped schema.org JSON.
//!
//! Recipe nodes come from thousands of different site generators, so every
//! field may arrive as a string, an array, or an object. Each reader below
//! handles one field shape and treats anything unexpected as "not found".

use serde_json::Value;
use url::Url;

use crate::text::{normalize_text, split_instruction_text};

/// Keys that may carry the yield, in order of preference
pub const YIELD_KEYS: [&str; 4] = ["recipeYield", "yield", "recipeServings", "servings"];

/// Keys of an ImageObject that may carry its location, in order of preference
const IMAGE_KEYS: [&str; 3] = ["url", "contentUrl", "thumbnailUrl"];

/// Normalized text of a name/description style field.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(normalize_text(s)).filter(|t| !t.is_empty()),
        Value::Array(items) => items.iter().find_map(text_value),
        // {"@type": "TextObject", "text": ...} or a language-tagged {"@value": ...}
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("@value"))
            .and_then(text_value),
        _ => None,
    }
}

fn number_text(number: &serde_json::Number) -> Option<String> {
    if let Some(i) = number.as_i64() {
        return Some(i.to_string());
    }
    let f = number.as_f64()?;
    if f.fract() == 0.0 {
        Some(format!("{}", f as i64))
    } else {
        Some(f.to_string())
    }
}

/// First non-empty string or number, searching arrays depth-first.
pub fn first_scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => number_text(n),
        Value::Array(items) => items.iter().find_map(first_scalar_text),
        // QuantitativeValue
        Value::Object(map) => map.get("value").and_then(first_scalar_text),
        _ => None,
    }
}

/// Ingredient lines from `recipeIngredient`.
pub fn collect_ingredients(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    push_ingredients(value, &mut lines);
    lines.retain(|line| !line.is_empty());
    lines
}

fn push_ingredients(value: &Value, lines: &mut Vec<String>) {
    match value {
        Value::String(s) => lines.push(normalize_text(s)),
        Value::Number(n) => lines.extend(number_text(n)),
        Value::Array(items) => items.iter().for_each(|item| push_ingredients(item, lines)),
        Value::Object(map) => {
            let name = map.get("name").and_then(text_value);
            let amount = map.get("amount").and_then(first_scalar_text);
            match (amount, name) {
                (Some(amount), Some(name)) => lines.push(format!("{amount} {name}")),
                (None, Some(name)) => lines.push(name),
                _ => {}
            }
        }
        _ => {}
    }
}

/// Instruction steps from `recipeInstructions`, flattening step groups.
pub fn collect_steps(value: &Value) -> Vec<String> {
    let mut steps = Vec::new();
    push_steps(value, &mut steps);
    steps
}

fn push_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => steps.extend(split_instruction_text(s)),
        Value::Array(items) => items.iter().for_each(|item| push_steps(item, steps)),
        Value::Object(map) => {
            if let Some(items) = map.get("itemListElement") {
                // HowToSection: the section name is a heading, not a step
                push_steps(items, steps);
            } else if let Some(text) = map
                .get("text")
                .and_then(text_value)
                .or_else(|| map.get("name").and_then(text_value))
            {
                steps.push(text);
            }
        }
        _ => {}
    }
}

/// First usable absolute image URL in an `image` field.
pub fn resolve_image(value: &Value, base: &Url) -> Option<String> {
    match value {
        Value::String(s) => resolve_url(s, base),
        Value::Array(items) => items.iter().find_map(|item| resolve_image(item, base)),
        Value::Object(map) => IMAGE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|item| resolve_image(item, base)),
        _ => None,
    }
}

/// Resolve a possibly relative or protocol-relative URL against the page.
///
/// Returns `None` for anything that does not end up as an http(s) URL.
pub fn resolve_url(raw: &str, base: &Url) -> Option<String> {
    let raw = normalize_text(raw);
    if raw.is_empty() {
        return None;
    }

    let candidate = match raw.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => raw,
    };

    let resolved = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(&candidate).ok()?,
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
