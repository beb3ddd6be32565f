use bson::Bson;
use chrono::NaiveDateTime;

use crate::error::DecodeError;

/// Layout of `datetime'...'` literals: `YYYY-MM-DDTHH-MM-SS`, read as UTC.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H-%M-%S";

/// A typed filter literal.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Number(f64),
    DateTime(bson::DateTime),
}

impl QueryValue {
    /// Coerce a wire literal.
    ///
    /// - one trailing `'` is dropped
    /// - `datetime'<stamp>` parses `<stamp>` with [`TIMESTAMP_LAYOUT`]
    /// - anything not starting with `'` is a 64-bit float
    /// - otherwise the text after the leading `'`
    pub fn from_literal(literal: &str) -> Result<Self, DecodeError> {
        let literal = literal.strip_suffix('\'').unwrap_or(literal);

        if let Some(stamp) = literal.strip_prefix("datetime'") {
            let parsed = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_LAYOUT).map_err(
                |source| DecodeError::Date {
                    literal: stamp.to_string(),
                    source,
                },
            )?;
            let millis = parsed.and_utc().timestamp_millis();
            return Ok(QueryValue::DateTime(bson::DateTime::from_millis(millis)));
        }

        match literal.strip_prefix('\'') {
            Some(text) => Ok(QueryValue::String(text.to_string())),
            None => literal
                .parse::<f64>()
                .map(QueryValue::Number)
                .map_err(|source| DecodeError::Number {
                    literal: literal.to_string(),
                    source,
                }),
        }
    }

    /// Plain-text rendering, used where the engine expects a string pattern.
    pub fn to_text(&self) -> String {
        match self {
            QueryValue::String(s) => s.clone(),
            QueryValue::Number(n) => n.to_string(),
            QueryValue::DateTime(dt) => dt
                .try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        }
    }
}

impl From<QueryValue> for Bson {
    fn from(value: QueryValue) -> Self {
        match value {
            QueryValue::String(s) => Bson::String(s),
            QueryValue::Number(n) => Bson::Double(n),
            QueryValue::DateTime(dt) => Bson::DateTime(dt),
        }
    }
}
