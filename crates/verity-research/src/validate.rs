//! Schema validation: untrusted JSON in, domain records out
//!
//! [`Untrusted`] is the only way extracted JSON travels through the pipeline,
//! and the functions here are the only ones that look inside it. Each check
//! runs in a fixed field order and stops at the first failure, so a
//! [`ValidationError`] always names exactly one field.

use crate::error::ValidationError;
use crate::types::Rejected;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;
use verity_domain::{Claim, Influencer, TrustScore};

/// JSON that has been parsed but not yet checked against the record schema
#[derive(Debug, Clone, PartialEq)]
pub struct Untrusted(pub(crate) Value);

impl From<Value> for Untrusted {
    fn from(value: Value) -> Self {
        Untrusted(value)
    }
}

impl Untrusted {
    #[cfg(test)]
    pub(crate) fn peek(&self) -> &Value {
        &self.0
    }
}

const INFLUENCER: &str = "influencer";
const CLAIM: &str = "claim";
const DISCOVERY: &str = "discovery";

/// Validate an influencer payload
///
/// Checks `name`, `handle`, `description`, `followers`, `mainCategory` in that
/// order. Stats start at zero and `lastUpdated` is set to `now`. Nested claims,
/// if any, are ignored here; see [`claim_entries`].
pub fn validate_influencer(raw: &Untrusted, now: DateTime<Utc>) -> Result<Influencer, ValidationError> {
    let obj = object(INFLUENCER, &raw.0)?;

    let name = non_empty_string(INFLUENCER, obj, "name")?;
    let handle = non_empty_string(INFLUENCER, obj, "handle")?;
    let description = string(INFLUENCER, obj, "description")?;
    let followers = follower_count(obj)?;
    let main_category = string(INFLUENCER, obj, "mainCategory")?;

    Ok(Influencer::new(name, handle, description, followers, main_category, now))
}

/// Validate a claim payload
///
/// Checks `claim`, `trustScore`, `analysis`, `sources` in that order. The
/// `verified` flag is derived from the score; any value the provider sent is
/// ignored.
pub fn validate_claim(raw: &Untrusted, now: DateTime<Utc>) -> Result<Claim, ValidationError> {
    let obj = object(CLAIM, &raw.0)?;

    let statement = non_empty_string(CLAIM, obj, "claim")?;
    let trust_score = trust_score(obj)?;
    let analysis = string(CLAIM, obj, "analysis")?;
    let sources = sources(obj)?;

    Ok(Claim::new(statement, trust_score, analysis, sources, now))
}

/// The nested `claims` of an influencer payload
///
/// An absent (or null) field means no claims. Anything other than an array is
/// a top-level failure, since the payload as a whole is malformed.
pub fn claim_entries(raw: &Untrusted) -> Result<Vec<Untrusted>, ValidationError> {
    let obj = object(INFLUENCER, &raw.0)?;
    match obj.get("claims") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().cloned().map(Untrusted).collect()),
        Some(other) => Err(ValidationError::new(
            INFLUENCER,
            "claims",
            format!("must be an array, got {}", kind(other)),
        )),
    }
}

/// The influencer entries of a discovery payload
///
/// Accepts `{"influencers": [...]}` or a bare array.
pub fn discovery_entries(raw: &Untrusted) -> Result<Vec<Untrusted>, ValidationError> {
    let items = match &raw.0 {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("influencers") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ValidationError::new(
                    DISCOVERY,
                    "influencers",
                    format!("must be an array, got {}", kind(other)),
                ))
            }
            None => return Err(ValidationError::new(DISCOVERY, "influencers", "is missing")),
        },
        other => {
            return Err(ValidationError::new(
                DISCOVERY,
                "influencers",
                format!("expected an object or array, got {}", kind(other)),
            ))
        }
    };
    Ok(items.iter().cloned().map(Untrusted).collect())
}

/// Validate every item, keeping the valid ones and recording the rest
///
/// This is the list strategy: one bad element never fails the batch. Each
/// rejection is logged at `warn` and returned with its position.
pub fn collect_valid<T, F>(entity: &str, items: Vec<Untrusted>, mut validate: F) -> (Vec<T>, Vec<Rejected>)
where
    F: FnMut(&Untrusted) -> Result<T, ValidationError>,
{
    let mut valid = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match validate(item) {
            Ok(record) => valid.push(record),
            Err(error) => {
                warn!(entity, index, %error, "dropping invalid entry");
                rejected.push(Rejected { index, error });
            }
        }
    }

    (valid, rejected)
}

fn object<'a>(entity: &'static str, value: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(entity, "$", format!("expected an object, got {}", kind(value))))
}

// Null is treated as missing
fn present<'a>(
    entity: &'static str,
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(entity, field, "is missing")),
        Some(value) => Ok(value),
    }
}

fn string(entity: &'static str, obj: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match present(entity, obj, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(ValidationError::new(
            entity,
            field,
            format!("must be a string, got {}", kind(other)),
        )),
    }
}

fn non_empty_string(
    entity: &'static str,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let s = string(entity, obj, field)?;
    if s.trim().is_empty() {
        return Err(ValidationError::new(entity, field, "must not be empty"));
    }
    Ok(s)
}

fn follower_count(obj: &Map<String, Value>) -> Result<u64, ValidationError> {
    let value = present(INFLUENCER, obj, "followers")?;
    let n = value.as_f64().ok_or_else(|| {
        ValidationError::new(INFLUENCER, "followers", format!("must be a number, got {}", kind(value)))
    })?;
    if !n.is_finite() || n < 0.0 {
        return Err(ValidationError::new(
            INFLUENCER,
            "followers",
            format!("must be a non-negative number, got {n}"),
        ));
    }
    Ok(n.round() as u64)
}

fn trust_score(obj: &Map<String, Value>) -> Result<TrustScore, ValidationError> {
    let value = present(CLAIM, obj, "trustScore")?;
    let n = value.as_f64().ok_or_else(|| {
        ValidationError::new(CLAIM, "trustScore", format!("must be a number, got {}", kind(value)))
    })?;
    TrustScore::new(n).map_err(|e| ValidationError::new(CLAIM, "trustScore", e.to_string()))
}

fn sources(obj: &Map<String, Value>) -> Result<Vec<String>, ValidationError> {
    match present(CLAIM, obj, "sources")? {
        Value::Array(items) => Ok(items.iter().map(source_text).collect()),
        other => Err(ValidationError::new(
            CLAIM,
            "sources",
            format!("must be an array, got {}", kind(other)),
        )),
    }
}

fn source_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("url") {
            Some(Value::String(url)) => url.clone(),
            _ => item.to_string(),
        },
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
