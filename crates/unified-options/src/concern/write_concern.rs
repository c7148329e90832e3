use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::duration;
use crate::error::ConversionError;

/// The `w` field of a write concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Acknowledged by this many nodes.
    Nodes(u32),
    Majority,
}

impl TryFrom<&Value> for Acknowledgment {
    type Error = ConversionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) if s == "majority" => Ok(Acknowledgment::Majority),
            Value::String(s) => Err(ConversionError::InvalidWString(s.clone())),
            Value::Number(n) if n.is_f64() => Err(ConversionError::InvalidWType("double")),
            Value::Number(n) => n
                .as_u64()
                .and_then(|w| i32::try_from(w).ok())
                .map(|w| Acknowledgment::Nodes(w.unsigned_abs()))
                .ok_or_else(|| ConversionError::InvalidWNumber(n.to_string())),
            Value::Null => Err(ConversionError::InvalidWType("null")),
            Value::Bool(_) => Err(ConversionError::InvalidWType("boolean")),
            Value::Array(_) => Err(ConversionError::InvalidWType("array")),
            Value::Object(_) => Err(ConversionError::InvalidWType("document")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteConcern {
    pub w: Option<Acknowledgment>,
    pub journal: Option<bool>,
    pub w_timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct RawWriteConcern {
    w: Option<Value>,
    journal: Option<bool>,
    #[serde(rename = "wtimeoutMS", default, deserialize_with = "duration::millis")]
    w_timeout: Option<Duration>,
}

impl WriteConcern {
    pub fn majority() -> Self {
        Self {
            w: Some(Acknowledgment::Majority),
            ..Self::default()
        }
    }

    pub fn nodes(w: u32) -> Self {
        Self {
            w: Some(Acknowledgment::Nodes(w)),
            ..Self::default()
        }
    }

    /// Converts a `{w?, journal?, wtimeoutMS?}` sub-document.
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self, ConversionError> {
        let raw = RawWriteConcern::deserialize(doc)?;
        let w = raw.w.as_ref().map(Acknowledgment::try_from).transpose()?;
        Ok(Self {
            w,
            journal: raw.journal,
            w_timeout: raw.w_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(value: Value) -> Result<WriteConcern, ConversionError> {
        WriteConcern::from_document(value.as_object().unwrap())
    }

    #[test]
    fn w_values() {
        assert_eq!(convert(json!({"w": "majority"})).unwrap(), WriteConcern::majority());
        assert_eq!(convert(json!({"w": 1})).unwrap(), WriteConcern::nodes(1));
        assert_eq!(convert(json!({"w": 0})).unwrap(), WriteConcern::nodes(0));
        assert_eq!(convert(json!({})).unwrap(), WriteConcern::default());
    }

    #[test]
    fn journal_and_timeout() {
        let wc = convert(json!({"w": 2, "journal": true, "wtimeoutMS": 250})).unwrap();
        assert_eq!(wc.w, Some(Acknowledgment::Nodes(2)));
        assert_eq!(wc.journal, Some(true));
        assert_eq!(wc.w_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn invalid_w() {
        assert!(matches!(
            convert(json!({"w": "all"})),
            Err(ConversionError::InvalidWString(s)) if s == "all"
        ));
        assert!(matches!(
            convert(json!({"w": 1.5})),
            Err(ConversionError::InvalidWType("double"))
        ));
        assert!(matches!(
            convert(json!({"w": true})),
            Err(ConversionError::InvalidWType("boolean"))
        ));
        assert!(matches!(
            convert(json!({"w": -1})),
            Err(ConversionError::InvalidWNumber(_))
        ));
        assert!(matches!(
            convert(json!({"w": 3_000_000_000_u64})),
            Err(ConversionError::InvalidWNumber(_))
        ));
    }

    #[test]
    fn mistyped_journal_fails() {
        assert!(matches!(
            convert(json!({"journal": "yes"})),
            Err(ConversionError::Shape(_))
        ));
    }
}
