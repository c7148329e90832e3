use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConversionError;

/// Read isolation level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadConcernLevel {
    Local,
    Majority,
    Linearizable,
    Available,
    Snapshot,
    /// A level this crate does not know about, passed through verbatim.
    Custom(String),
}

impl ReadConcernLevel {
    pub fn from_str_lossless(level: &str) -> Self {
        match level {
            "local" => ReadConcernLevel::Local,
            "majority" => ReadConcernLevel::Majority,
            "linearizable" => ReadConcernLevel::Linearizable,
            "available" => ReadConcernLevel::Available,
            "snapshot" => ReadConcernLevel::Snapshot,
            other => ReadConcernLevel::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReadConcernLevel::Local => "local",
            ReadConcernLevel::Majority => "majority",
            ReadConcernLevel::Linearizable => "linearizable",
            ReadConcernLevel::Available => "available",
            ReadConcernLevel::Snapshot => "snapshot",
            ReadConcernLevel::Custom(level) => level,
        }
    }
}

impl fmt::Display for ReadConcernLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read concern. A `None` level defers to the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadConcern {
    pub level: Option<ReadConcernLevel>,
}

#[derive(Deserialize)]
struct RawReadConcern {
    level: Option<String>,
}

impl ReadConcern {
    pub fn new(level: ReadConcernLevel) -> Self {
        Self { level: Some(level) }
    }

    pub fn majority() -> Self {
        Self::new(ReadConcernLevel::Majority)
    }

    /// Converts a `{level: <string>}` sub-document.
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self, ConversionError> {
        let raw = RawReadConcern::deserialize(doc)?;
        let level = raw
            .level
            .filter(|level| !level.is_empty())
            .map(|level| ReadConcernLevel::from_str_lossless(&level));
        Ok(Self { level })
    }
}
