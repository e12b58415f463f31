//! Free-text quantity parsing and scaling.
//!
//! Ingredient lines are never parsed into `{quantity, unit, name}`; only a
//! leading number (or range of numbers) is located, scaled, and re-rendered.
//! Anything that does not start with a recognizable quantity is left alone.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One quantity token: mixed fraction, simple fraction, decimal or integer.
/// Alternatives are tried left to right, so the longest form wins.
const QUANTITY: &str = r"\d+\s+\d+/\d+|\d+/\d+|\d*\.\d+|\d+";

static MIXED_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\d+)/(\d+)").unwrap());

static SIMPLE_FRACTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)").unwrap());

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d*\.\d+|\d+)").unwrap());

/// quantity, optional range separator and second quantity, then the rest
static LEADING_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)^\s*({QUANTITY})(?:(?:\s*[-–]\s*|\s+(?i:to)\s+)({QUANTITY}))?(.*)$"
    ))
    .unwrap()
});

static ANY_QUANTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(QUANTITY).unwrap());

static SERVINGS_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bservings?\b").unwrap());

fn fraction_glyph(c: char) -> Option<&'static str> {
    let ascii = match c {
        '¼' => "1/4",
        '½' => "1/2",
        '¾' => "3/4",
        '⅐' => "1/7",
        '⅑' => "1/9",
        '⅒' => "1/10",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '⅕' => "1/5",
        '⅖' => "2/5",
        '⅗' => "3/5",
        '⅘' => "4/5",
        '⅙' => "1/6",
        '⅚' => "5/6",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    };
    Some(ascii)
}

/// Rewrite vulgar-fraction glyphs (`½`, `⅜`, ...) and the fraction slash to
/// ASCII `n/d` form, so `1½ cups` becomes `1 1/2 cups`.
///
/// Text without any glyph is returned as is.
pub fn normalize_fraction_glyphs(text: &str) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|c| c == '⁄' || fraction_glyph(c).is_some())
    {
        return Cow::Borrowed(text);
    }

    let mut spaced = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match fraction_glyph(c) {
            Some(ascii) => {
                spaced.push(' ');
                spaced.push_str(ascii);
                spaced.push(' ');
            }
            None if c == '⁄' => spaced.push('/'),
            None => spaced.push(c),
        }
    }

    Cow::Owned(spaced.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Parse the numeric quantity at the start of `token`.
///
/// Recognizes, in order: mixed fraction (`1 1/2`), simple fraction (`3/4`),
/// decimal or integer (`2.5`). Returns `None` when the text does not start
/// with a number or a fraction has a zero denominator.
pub fn parse_quantity(token: &str) -> Option<f64> {
    let normalized = normalize_fraction_glyphs(token);
    let text = normalized.trim_start();

    if let Some(caps) = MIXED_FRACTION.captures(text) {
        let whole: f64 = caps[1].parse().ok()?;
        return fraction(&caps[2], &caps[3]).map(|f| whole + f);
    }
    if let Some(caps) = SIMPLE_FRACTION.captures(text) {
        return fraction(&caps[1], &caps[2]);
    }
    DECIMAL
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn fraction(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Render a quantity the way a cook would write it.
///
/// Whole numbers print as integers, values within 0.02 of an eighth print as
/// a (mixed) fraction, anything else as a decimal with at most two places.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        // `{:.0}` of -0.0 is "-0"
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{rounded:.0}");
    }

    // Past 2^53 every f64 is whole, so the eighths below always fit an i64
    let eighths = (value * 8.0).round();
    if eighths > 0.0 && (value - eighths / 8.0).abs() <= 0.02 {
        let eighths = eighths as i64;
        let whole = eighths / 8;
        let rest = eighths % 8;
        if rest == 0 {
            return whole.to_string();
        }
        let divisor = gcd(rest, 8);
        let (numerator, denominator) = (rest / divisor, 8 / divisor);
        return if whole == 0 {
            format!("{numerator}/{denominator}")
        } else {
            format!("{whole} {numerator}/{denominator}")
        };
    }

    let decimal = format!("{value:.2}");
    decimal
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn is_identity(multiplier: f64) -> bool {
    multiplier == 1.0 || !multiplier.is_finite()
}

/// Scale the quantity (or `a-b` / `a to b` range) at the start of `line`.
///
/// Lines that do not start with a quantity come back verbatim, as does every
/// line when `multiplier` is exactly 1 or not finite.
pub fn scale_leading_quantity(line: &str, multiplier: f64) -> String {
    if is_identity(multiplier) {
        return line.to_string();
    }

    let normalized = normalize_fraction_glyphs(line);
    let Some(caps) = LEADING_QUANTITY.captures(&normalized) else {
        return line.to_string();
    };
    let Some(first) = parse_quantity(&caps[1]) else {
        return line.to_string();
    };
    let suffix = caps.get(3).map_or("", |m| m.as_str());

    match caps.get(2) {
        Some(second) => match parse_quantity(second.as_str()) {
            Some(second) => format!(
                "{} - {}{}",
                format_quantity(first * multiplier),
                format_quantity(second * multiplier),
                suffix
            ),
            // A half-understood range would lose information; keep the line.
            None => line.to_string(),
        },
        None => format!("{}{}", format_quantity(first * multiplier), suffix),
    }
}

/// Scale at most `limit` quantities anywhere in `text`
fn scale_quantities(text: &str, multiplier: f64, limit: usize) -> String {
    if is_identity(multiplier) {
        return text.to_string();
    }
    let normalized = normalize_fraction_glyphs(text);
    ANY_QUANTITY
        .replacen(&normalized, limit, |caps: &Captures| {
            parse_quantity(&caps[0])
                .map(|value| format_quantity(value * multiplier))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn tidy_label(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == ':' || c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}

fn label_servings(text: &str) -> String {
    let starts_with_digit = text.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !starts_with_digit && !SERVINGS_WORD.is_match(text) {
        return text.to_string();
    }

    let stripped = tidy_label(&SERVINGS_WORD.replace_all(text, ""));
    if stripped.is_empty() {
        return text.to_string();
    }
    format!("Serves {stripped}")
}

/// Build the "Serves ..." label for a recipe at the given multiplier.
///
/// Free text wins over the numeric field; within the text only the first two
/// quantities are scaled (enough for `4-6 servings`). Returns `None` when the
/// recipe has neither.
pub fn scale_servings_label(
    servings: Option<f64>,
    servings_text: Option<&str>,
    multiplier: f64,
) -> Option<String> {
    let text = servings_text.map(str::trim).filter(|t| !t.is_empty());

    match (text, servings) {
        (Some(text), _) => Some(label_servings(&scale_quantities(text, multiplier, 2))),
        (None, Some(servings)) => {
            let multiplier = if multiplier.is_finite() { multiplier } else { 1.0 };
            Some(format!("Serves {}", format_quantity(servings * multiplier)))
        }
        (None, None) => None,
    }
}
