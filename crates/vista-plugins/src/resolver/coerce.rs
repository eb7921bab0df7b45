//! Primitive coercions. Every string-producing path is sanitised here.

use crate::error::ResolveError;
use crate::param::PrimitiveType;
use crate::sanitize::{sanitize_html, sanitize_json};

use super::ResolvedValue;

const TRUTHY: &[&str] = &["true", "yes", "on", "1"];

pub(super) fn coerce(
    key: &str,
    primitive: PrimitiveType,
    raw: &str,
) -> Result<ResolvedValue, ResolveError> {
    let failure = |message: String| ResolveError::Coercion {
        key: key.to_owned(),
        value: sanitize_html(raw).into_owned(),
        expected: primitive,
        message,
    };
    let value = match primitive {
        PrimitiveType::String => ResolvedValue::Text(sanitize_html(raw).into_owned()),
        PrimitiveType::Bool => {
            let lowered = raw.trim().to_ascii_lowercase();
            ResolvedValue::Bool(TRUTHY.contains(&lowered.as_str()))
        }
        PrimitiveType::Int => raw
            .trim()
            .parse::<i64>()
            .map(ResolvedValue::Int)
            .map_err(|error| failure(error.to_string()))?,
        PrimitiveType::Float => raw
            .trim()
            .parse::<f64>()
            .map(ResolvedValue::Float)
            .map_err(|error| failure(error.to_string()))?,
        PrimitiveType::Json => {
            let mut parsed: serde_json::Value =
                serde_json::from_str(raw).map_err(|error| failure(error.to_string()))?;
            sanitize_json(&mut parsed);
            ResolvedValue::Json(parsed)
        }
    };
    Ok(value)
}
