//! Decode error types.

use thiserror::Error;
use unified_options_bson::BsonError;

/// Failure of a single options decode call. Every variant is terminal: no
/// partially populated options value is ever returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input could not be read into the record of recognized fields.
    #[error("error unmarshalling to temporary {target} object: {source}")]
    MalformedInput {
        target: &'static str,
        #[source]
        source: MalformedSource,
    },
    /// Keys outside the recognized set, in document order.
    #[error("unrecognized fields for {target}: [{}]", .fields.join(", "))]
    UnrecognizedField {
        target: &'static str,
        fields: Vec<String>,
    },
    /// A recognized concern sub-document was rejected by its converter.
    #[error("error parsing {field} document: {source}")]
    Conversion {
        field: &'static str,
        #[source]
        source: ConversionError,
    },
}

impl DecodeError {
    pub(crate) fn malformed(target: &'static str, source: impl Into<MalformedSource>) -> Self {
        DecodeError::MalformedInput {
            target,
            source: source.into(),
        }
    }

    /// Offending keys for [`DecodeError::UnrecognizedField`], empty otherwise.
    pub fn unrecognized_fields(&self) -> &[String] {
        match self {
            DecodeError::UnrecognizedField { fields, .. } => fields,
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum MalformedSource {
    #[error("invalid BSON: {0}")]
    Bson(#[from] BsonError),
    #[error("{0}")]
    Shape(#[from] serde_json::Error),
    #[error("invalid type for field {field}: expected a document, found {found}")]
    ExpectedDocument { field: String, found: &'static str },
}

/// Errors raised by the read concern, read preference and write concern
/// converters.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{0}")]
    Shape(#[from] serde_json::Error),
    #[error("invalid read preference mode {0:?}")]
    InvalidReadPreferenceMode(String),
    #[error("can not specify tags, max staleness, or hedge with mode primary")]
    PrimaryWithOptions,
    #[error("invalid read preference hedge document: length cannot be greater than 1, found {0}")]
    HedgeTooLarge(usize),
    #[error("invalid read preference hedge document: 'enabled' must be a boolean")]
    InvalidHedgeEnabled,
    #[error("invalid write concern 'w' string value {0:?}")]
    InvalidWString(String),
    #[error("invalid write concern 'w' value {0}")]
    InvalidWNumber(String),
    #[error("invalid type for write concern 'w' field: {0}")]
    InvalidWType(&'static str),
}
