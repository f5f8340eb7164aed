//! Recover a JSON payload from the provider's free-text answer
//!
//! Online models wrap their JSON in prose, fence it in markdown and write
//! follower counts the way a person would ("1.2 million", "650,000"). This
//! module isolates all of that tolerance: it finds the JSON span, applies a
//! fixed sequence of textual repairs and parses the result. Everything it
//! returns is [`Untrusted`] until the validator has looked at it.
//!
//! The repairs are pattern substitutions, not a parser. They are best-effort:
//! the number repairs only touch the `followers` field, while the
//! trailing-comma repair applies to the whole span, string contents included.

use crate::error::ResearchError;
use crate::validate::Untrusted;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

// A number as a person writes it: digits, optional grouping commas, optional fraction
const NUM: &str = r"\d[\d,]*(?:\.\d+)?";

static MILLIONS: LazyLock<Regex> = LazyLock::new(|| suffix_pattern("million|m"));
static THOUSANDS: LazyLock<Regex> = LazyLock::new(|| suffix_pattern("thousand|k"));

static QUOTED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"("followers"\s*:\s*)"\s*({NUM})\s*""#)).expect("valid regex")
});

static GROUPED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("followers"\s*:\s*)(\d{1,3}(?:,\d{3})+(?:\.\d+)?)"#).expect("valid regex")
});

// Not string-aware: `"refs [1,]"` inside a value also loses its comma
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

/// `"followers": 1.2 million`, `2 millions` or `"followers": "1.2M"`; the
/// closing quote is only consumed when an opening one was
fn suffix_pattern(suffixes: &str) -> Regex {
    Regex::new(&format!(
        r#"("followers"\s*:\s*)(?:"\s*({NUM})\s*(?i:{suffixes})s?\s*"|({NUM})\s*(?i:{suffixes})s?\b)"#
    ))
    .expect("valid regex")
}

/// Extract, repair and parse the JSON payload in a provider answer
///
/// # Errors
///
/// - [`ResearchError::Extraction`] if the text contains no `{ ... }` span
/// - [`ResearchError::Parse`] if the repaired span is not valid JSON; the
///   error carries the repaired text
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use verity_research::{extract, validate_influencer};
///
/// let text = r#"Here you go: {"name": "Dr. Health", "handle": "@drhealth",
///     "description": "", "followers": "650,000", "mainCategory": "Medicine"} Hope that helps!"#;
/// let influencer = validate_influencer(&extract(text).unwrap(), Utc::now()).unwrap();
/// assert_eq!(influencer.followers, 650_000);
/// ```
pub fn extract(text: &str) -> Result<Untrusted, ResearchError> {
    let trimmed = text.trim();

    if let Some(value) = leading_array(trimmed) {
        return Ok(Untrusted::from(value));
    }

    let span = object_span(trimmed)?;
    let repaired = repair(span);

    if repaired != span {
        debug!(before = span.len(), after = repaired.len(), "repaired provider JSON");
    }

    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => Ok(Untrusted::from(value)),
        Err(source) => Err(ResearchError::Parse {
            source,
            text: repaired,
        }),
    }
}

/// A bare array of objects at the start of the answer
///
/// Answers also open with citation markers like `[1]`, so the span up to the
/// last `]` is only taken when it parses to an array whose elements are all
/// objects. Anything else falls through to the object span.
fn leading_array(trimmed: &str) -> Option<Value> {
    if !trimmed.starts_with('[') {
        return None;
    }

    let end = trimmed.rfind(']')?;
    let value = serde_json::from_str::<Value>(&repair(&trimmed[..=end])).ok()?;
    let is_entity_list = value.as_array().is_some_and(|items| items.iter().all(Value::is_object));

    if !is_entity_list {
        debug!("leading '[' is not an entity list, using the object span");
        return None;
    }
    Some(value)
}

/// The span from the first `{` to the last `}`
fn object_span(trimmed: &str) -> Result<&str, ResearchError> {
    let start = trimmed
        .find('{')
        .ok_or_else(|| ResearchError::Extraction("no '{' found in provider response".to_string()))?;
    let end = trimmed
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| ResearchError::Extraction("no closing '}' found in provider response".to_string()))?;

    Ok(&trimmed[start..=end])
}

/// Apply the textual repairs in order: millions, thousands, grouped or quoted
/// numbers, trailing commas
pub(crate) fn repair(span: &str) -> String {
    let text = MILLIONS.replace_all(span, |caps: &Captures| scale(caps, 1_000_000.0));
    let text = THOUSANDS.replace_all(&text, |caps: &Captures| scale(caps, 1_000.0));
    let text = QUOTED_NUMBER.replace_all(&text, ungroup);
    let text = GROUPED_NUMBER.replace_all(&text, ungroup);
    TRAILING_COMMA.replace_all(&text, "$1").into_owned()
}

fn scale(caps: &Captures, factor: f64) -> String {
    let number = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
    match number.replace(',', "").parse::<f64>() {
        Ok(value) => format!("{}{:.0}", &caps[1], (value * factor).round()),
        Err(_) => caps[0].to_string(),
    }
}

fn ungroup(caps: &Captures) -> String {
    format!("{}{}", &caps[1], caps[2].replace(',', ""))
}
