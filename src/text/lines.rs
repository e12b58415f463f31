use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;
use serde_json::Value;

use crate::model::StoredLines;

static STEP_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:step\s*)?\d+\s*[).:\-]").unwrap());

static BULLET_GLYPH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[•▪●◦‣·]").unwrap());

/// A `1.` / `2)` bullet that follows the end of a sentence
static NUMBERED_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s+(\d{1,2}[.)]\s)").unwrap());

/// Decode HTML entities and collapse whitespace runs into single spaces.
pub fn normalize_text(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a multi-line blob into trimmed, non-empty lines.
pub fn normalize_text_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn a stored list value into clean ordered lines. Absent input yields
/// no lines.
pub fn normalize_lines(value: Option<&StoredLines>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(StoredLines::Text(text)) => normalize_text_lines(text),
        Some(StoredLines::Items(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.trim().to_string()),
                other => Some(other.to_string().trim().to_string()),
            })
            .filter(|line| !line.is_empty())
            .collect(),
    }
}

/// Split a single instruction blob into steps.
///
/// Steps are separated by newlines, bullet glyphs, or a numbered bullet
/// starting a new sentence. Each step is entity-decoded and
/// whitespace-collapsed; embedded numbering is kept.
pub fn split_instruction_text(text: &str) -> Vec<String> {
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    let bulleted = BULLET_GLYPH.replace_all(&decoded, "\n");
    let numbered = NUMBERED_BULLET.replace_all(&bulleted, "${1}\n${2}");

    normalize_text_lines(&numbered)
        .iter()
        .map(|line| normalize_text(line))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Remove a leading `1.`, `2)`, `Step 3:` style prefix so steps are not
/// numbered twice when rendered as an ordered list.
///
/// A separator followed by a digit is part of a quantity (`2-3 minutes`,
/// `1.5 cups`) and is kept. A dash counts as a range even with spaces
/// around it (`2 - 3 minutes`).
pub fn strip_leading_step_number(line: &str) -> String {
    if let Some(m) = STEP_NUMBER.find(line) {
        let rest = &line[m.end()..];
        let after_separator = if m.as_str().ends_with('-') {
            rest.trim_start()
        } else {
            rest
        };
        if !after_separator.starts_with(|c: char| c.is_ascii_digit()) {
            return rest.trim_start().to_string();
        }
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Mac &amp;   cheese\n"), "Mac & cheese");
        assert_eq!(normalize_text("Caf&amp;eacute;"), "Café");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_normalize_lines_from_list() {
        let stored = StoredLines::from(vec![
            "  a  ".to_string(),
            "".to_string(),
            "b".to_string(),
        ]);
        assert_eq!(normalize_lines(Some(&stored)), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_lines_from_blob() {
        let stored = StoredLines::from("a\r\nb\n\nc");
        assert_eq!(normalize_lines(Some(&stored)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_lines_stringifies_items() {
        let stored = StoredLines::Items(vec![
            Value::from(2),
            Value::Null,
            Value::from(" eggs "),
            Value::Bool(true),
        ]);
        assert_eq!(normalize_lines(Some(&stored)), vec!["2", "eggs", "true"]);
    }

    #[test]
    fn test_normalize_lines_absent() {
        assert!(normalize_lines(None).is_empty());
    }

    #[test]
    fn test_split_instruction_text() {
        assert_eq!(
            split_instruction_text("Preheat oven.\nMix &amp; stir.\r\n\r\nBake."),
            vec!["Preheat oven.", "Mix & stir.", "Bake."]
        );
        assert_eq!(
            split_instruction_text("1. Preheat oven. 2. Mix well. 3) Bake for 10. Then cool."),
            vec!["1. Preheat oven.", "2. Mix well.", "3) Bake for 10. Then cool."]
        );
        assert_eq!(
            split_instruction_text("• Chop • Fry  •Serve"),
            vec!["Chop", "Fry", "Serve"]
        );
        assert_eq!(
            split_instruction_text("Chop · Fry · Serve"),
            vec!["Chop", "Fry", "Serve"]
        );
    }

    #[test]
    fn test_strip_leading_step_number() {
        assert_eq!(strip_leading_step_number("1. Preheat oven"), "Preheat oven");
        assert_eq!(strip_leading_step_number("Preheat oven"), "Preheat oven");
        assert_eq!(strip_leading_step_number("2) Mix"), "Mix");
        assert_eq!(strip_leading_step_number("Step 3: Bake"), "Bake");
        assert_eq!(strip_leading_step_number("step 4 - Cool"), "Cool");
        assert_eq!(strip_leading_step_number("10.Serve"), "Serve");
    }

    #[test]
    fn test_strip_leading_step_number_keeps_quantities() {
        assert_eq!(strip_leading_step_number("2-3 minutes more"), "2-3 minutes more");
        assert_eq!(strip_leading_step_number("1.5 cups water"), "1.5 cups water");
        assert_eq!(strip_leading_step_number("350 degrees"), "350 degrees");
        assert_eq!(
            strip_leading_step_number("2 - 3 minutes per side"),
            "2 - 3 minutes per side"
        );
        assert_eq!(strip_leading_step_number("1) 2 cups flour"), "2 cups flour");
        assert_eq!(strip_leading_step_number("1. 2 eggs"), "2 eggs");
    }
}
