//! Strict decoders for the two option shapes.
//!
//! Each decoder reads its input into a private record of recognized fields
//! with a `#[serde(flatten)]` catch-all. A non-empty catch-all fails the
//! call before any field is applied.

mod session;
mod transaction;

pub use session::SessionOptionsDecoder;
pub use transaction::TransactionOptionsDecoder;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use unified_options_bson::{
    document_depth, document_to_json, BsonDecoder, BsonError, BsonValue, MAX_DEPTH,
};

use crate::error::{ConversionError, DecodeError, MalformedSource};

/// Decodes one option shape from BSON bytes, a BSON document or JSON.
///
/// Implementations are stateless; every call is independent.
pub trait OptionsDecoder {
    type Options;

    /// Name of the decoded shape, used as error context.
    const TARGET: &'static str;

    /// Keys whose value must be an embedded document when present.
    const DOCUMENT_KEYS: &'static [&'static str];

    fn decode_value(&self, value: &Value) -> Result<Self::Options, DecodeError>;

    /// Rejects BSON element types that the JSON projection would otherwise
    /// turn into objects, such as dates and object ids on sub-document keys.
    /// `null` and `undefined` read as absent.
    fn check_document(&self, document: &[(String, BsonValue)]) -> Result<(), DecodeError> {
        check_document_keys(Self::TARGET, Self::DOCUMENT_KEYS, document)
    }

    fn decode_document(
        &self,
        document: &[(String, BsonValue)],
    ) -> Result<Self::Options, DecodeError> {
        if document_depth(document) > MAX_DEPTH {
            return Err(DecodeError::malformed(Self::TARGET, BsonError::TooDeep(MAX_DEPTH)));
        }
        self.check_document(document)?;
        self.decode_value(&Value::Object(document_to_json(document)))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<Self::Options, DecodeError> {
        let document = BsonDecoder::new()
            .decode(bytes)
            .map_err(|e| DecodeError::malformed(Self::TARGET, e))?;
        self.decode_document(&document)
    }
}

fn check_document_keys(
    target: &'static str,
    keys: &[&str],
    document: &[(String, BsonValue)],
) -> Result<(), DecodeError> {
    for (key, value) in document {
        if !keys.contains(&key.as_str()) {
            continue;
        }
        match value {
            BsonValue::Document(_) | BsonValue::Null | BsonValue::Undefined => {}
            other => {
                tracing::debug!(
                    shape = target,
                    field = %key,
                    found = other.type_name(),
                    "rejecting non-document option value"
                );
                return Err(DecodeError::malformed(
                    target,
                    MalformedSource::ExpectedDocument {
                        field: key.clone(),
                        found: other.type_name(),
                    },
                ));
            }
        }
    }
    Ok(())
}

fn parse_record<R: DeserializeOwned>(
    target: &'static str,
    value: &Value,
) -> Result<R, DecodeError> {
    R::deserialize(value).map_err(|e| DecodeError::malformed(target, e))
}

fn reject_extra(target: &'static str, extra: &Map<String, Value>) -> Result<(), DecodeError> {
    if extra.is_empty() {
        return Ok(());
    }
    let fields: Vec<String> = extra.keys().cloned().collect();
    tracing::debug!(shape = target, ?fields, "rejecting unrecognized option fields");
    Err(DecodeError::UnrecognizedField { target, fields })
}

fn convert<T>(
    field: &'static str,
    doc: &Map<String, Value>,
    converter: fn(&Map<String, Value>) -> Result<T, ConversionError>,
) -> Result<T, DecodeError> {
    converter(doc).map_err(|source| {
        tracing::debug!(field, error = %source, "option sub-document conversion failed");
        DecodeError::Conversion { field, source }
    })
}
