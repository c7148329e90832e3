use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::duration;
use crate::error::ConversionError;

/// One tag set: every tag must match for a server to be eligible.
pub type TagSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadPreferenceMode {
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadPreferenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadPreferenceMode::Primary => "primary",
            ReadPreferenceMode::PrimaryPreferred => "primaryPreferred",
            ReadPreferenceMode::Secondary => "secondary",
            ReadPreferenceMode::SecondaryPreferred => "secondaryPreferred",
            ReadPreferenceMode::Nearest => "nearest",
        }
    }
}

impl fmt::Display for ReadPreferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode names are matched case-insensitively.
impl FromStr for ReadPreferenceMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(ReadPreferenceMode::Primary),
            "primarypreferred" => Ok(ReadPreferenceMode::PrimaryPreferred),
            "secondary" => Ok(ReadPreferenceMode::Secondary),
            "secondarypreferred" => Ok(ReadPreferenceMode::SecondaryPreferred),
            "nearest" => Ok(ReadPreferenceMode::Nearest),
            _ => Err(ConversionError::InvalidReadPreferenceMode(s.to_string())),
        }
    }
}

/// Server selection preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPreference {
    pub mode: ReadPreferenceMode,
    pub tag_sets: Option<Vec<TagSet>>,
    pub max_staleness: Option<Duration>,
    pub hedge_enabled: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReadPreference {
    #[serde(default)]
    mode: String,
    tag_sets: Option<Vec<TagSet>>,
    #[serde(default, deserialize_with = "duration::seconds")]
    max_staleness_seconds: Option<Duration>,
    hedge: Option<Map<String, Value>>,
}

impl ReadPreference {
    pub fn new(mode: ReadPreferenceMode) -> Self {
        Self {
            mode,
            tag_sets: None,
            max_staleness: None,
            hedge_enabled: None,
        }
    }

    /// Converts a `{mode, tagSets?, maxStalenessSeconds?, hedge?}`
    /// sub-document.
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self, ConversionError> {
        let raw = RawReadPreference::deserialize(doc)?;
        let mode: ReadPreferenceMode = raw.mode.parse()?;

        let hedge_enabled = match raw.hedge {
            Some(hedge) => {
                if hedge.len() > 1 {
                    return Err(ConversionError::HedgeTooLarge(hedge.len()));
                }
                match hedge.get("enabled") {
                    Some(Value::Bool(enabled)) => Some(*enabled),
                    Some(_) => return Err(ConversionError::InvalidHedgeEnabled),
                    None => None,
                }
            }
            None => None,
        };

        let has_tags = raw.tag_sets.as_ref().is_some_and(|sets| !sets.is_empty());
        if mode == ReadPreferenceMode::Primary
            && (has_tags || raw.max_staleness_seconds.is_some() || hedge_enabled.is_some())
        {
            return Err(ConversionError::PrimaryWithOptions);
        }

        Ok(Self {
            mode,
            tag_sets: raw.tag_sets,
            max_staleness: raw.max_staleness_seconds,
            hedge_enabled,
        })
    }
}
