use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use unified_options_bson::BsonValue;

use super::{
    check_document_keys, parse_record, reject_extra, OptionsDecoder, TransactionOptionsDecoder,
};
use crate::duration;
use crate::error::DecodeError;
use crate::options::SessionOptions;

/// Decodes `{causalConsistency?, maxCommitTimeMS?, defaultTransactionOptions?}`
/// into [`SessionOptions`].
///
/// Only the read concern, read preference and write concern of the nested
/// transaction options become session defaults. The nested
/// `maxCommitTimeMS` is validated but dropped; the session-level key is the
/// only source of `default_max_commit_time`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionOptionsDecoder;

const FIELDS: &[&str] = &["causalConsistency", "maxCommitTimeMS", "defaultTransactionOptions"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSessionOptions {
    causal_consistency: Option<bool>,
    #[serde(rename = "maxCommitTimeMS", default, deserialize_with = "duration::millis")]
    max_commit_time: Option<Duration>,
    default_transaction_options: Option<Map<String, Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl OptionsDecoder for SessionOptionsDecoder {
    type Options = SessionOptions;

    const TARGET: &'static str = "SessionOptions";

    const DOCUMENT_KEYS: &'static [&'static str] = &["defaultTransactionOptions"];

    fn check_document(&self, document: &[(String, BsonValue)]) -> Result<(), DecodeError> {
        check_document_keys(Self::TARGET, Self::DOCUMENT_KEYS, document)?;
        // Unrecognized session keys are reported before anything nested.
        if document.iter().any(|(key, _)| !FIELDS.contains(&key.as_str())) {
            return Ok(());
        }
        for (key, value) in document {
            if let ("defaultTransactionOptions", BsonValue::Document(nested)) =
                (key.as_str(), value)
            {
                TransactionOptionsDecoder.check_document(nested)?;
            }
        }
        Ok(())
    }

    fn decode_value(&self, value: &Value) -> Result<SessionOptions, DecodeError> {
        let raw: RawSessionOptions = parse_record(Self::TARGET, value)?;
        reject_extra(Self::TARGET, &raw.extra)?;

        // Nested failures propagate as-is; their own target names the shape.
        let txn = match raw.default_transaction_options {
            Some(doc) => Some(TransactionOptionsDecoder.decode_value(&Value::Object(doc))?),
            None => None,
        };

        let mut opts = SessionOptions::default();
        if let Some(causal) = raw.causal_consistency {
            opts.causal_consistency = Some(causal);
        }
        if let Some(max_commit_time) = raw.max_commit_time {
            opts.default_max_commit_time = Some(max_commit_time);
        }
        if let Some(txn) = txn {
            if let Some(rc) = txn.read_concern {
                opts.default_read_concern = Some(rc);
            }
            if let Some(rp) = txn.read_preference {
                opts.default_read_preference = Some(rp);
            }
            if let Some(wc) = txn.write_concern {
                opts.default_write_concern = Some(wc);
            }
        }

        tracing::trace!(options = ?opts, "decoded session options");
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concern::{ReadConcern, ReadPreference, ReadPreferenceMode, WriteConcern};
    use crate::error::MalformedSource;
    use serde_json::json;
    use unified_options_bson::BsonObjectId;

    fn decode(value: Value) -> Result<SessionOptions, DecodeError> {
        SessionOptionsDecoder.decode_value(&value)
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(decode(json!({})).unwrap(), SessionOptions::default());
    }

    #[test]
    fn causal_and_max_commit_time() {
        let opts = decode(json!({"causalConsistency": true, "maxCommitTimeMS": 500})).unwrap();
        assert_eq!(opts.causal_consistency, Some(true));
        assert_eq!(opts.default_max_commit_time, Some(Duration::from_millis(500)));
        assert!(opts.default_read_concern.is_none());
    }

    #[test]
    fn causal_false_is_kept() {
        let opts = decode(json!({"causalConsistency": false})).unwrap();
        assert_eq!(opts.causal_consistency, Some(false));
    }

    #[test]
    fn unrecognized_field() {
        let err = decode(json!({"foo": 1})).unwrap_err();
        assert!(matches!(
            &err,
            DecodeError::UnrecognizedField { target: "SessionOptions", .. }
        ));
        assert_eq!(err.unrecognized_fields(), ["foo"]);
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn nested_concerns_are_lifted() {
        let opts = decode(json!({
            "defaultTransactionOptions": {
                "readConcern": {"level": "majority"},
                "readPreference": {"mode": "nearest"},
                "writeConcern": {"w": 1},
            }
        }))
        .unwrap();
        assert_eq!(opts.default_read_concern, Some(ReadConcern::majority()));
        assert_eq!(
            opts.default_read_preference,
            Some(ReadPreference::new(ReadPreferenceMode::Nearest))
        );
        assert_eq!(opts.default_write_concern, Some(WriteConcern::nodes(1)));
        assert!(opts.default_max_commit_time.is_none());
    }

    #[test]
    fn nested_max_commit_time_is_not_lifted() {
        let opts = decode(json!({
            "defaultTransactionOptions": {"maxCommitTimeMS": 100}
        }))
        .unwrap();
        assert_eq!(opts, SessionOptions::default());

        let opts = decode(json!({
            "maxCommitTimeMS": 200,
            "defaultTransactionOptions": {"maxCommitTimeMS": 100}
        }))
        .unwrap();
        assert_eq!(opts.default_max_commit_time, Some(Duration::from_millis(200)));
    }

    #[test]
    fn nested_errors_propagate_unwrapped() {
        let err = decode(json!({
            "causalConsistency": true,
            "defaultTransactionOptions": {"readConcern": {"level": 7}}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Conversion {
                field: "readConcern",
                ..
            }
        ));

        let err = decode(json!({"defaultTransactionOptions": {"bogus": 1}})).unwrap_err();
        assert!(matches!(
            &err,
            DecodeError::UnrecognizedField { target: "TransactionOptions", .. }
        ));
        assert_eq!(err.unrecognized_fields(), ["bogus"]);
    }

    #[test]
    fn session_extras_win_over_nested_errors() {
        let err = decode(json!({
            "extra": 1,
            "defaultTransactionOptions": {"bogus": 1}
        }))
        .unwrap_err();
        assert!(matches!(
            &err,
            DecodeError::UnrecognizedField { target: "SessionOptions", .. }
        ));
    }

    #[test]
    fn wrong_types_are_malformed() {
        for doc in [
            json!({"causalConsistency": "yes"}),
            json!({"causalConsistency": 1}),
            json!({"maxCommitTimeMS": 1.5}),
            json!({"defaultTransactionOptions": 5}),
        ] {
            let err = decode(doc.clone()).unwrap_err();
            assert!(
                matches!(
                    err,
                    DecodeError::MalformedInput {
                        target: "SessionOptions",
                        source: MalformedSource::Shape(_),
                    }
                ),
                "unexpected {err:?} for {doc}"
            );
        }
    }

    #[test]
    fn object_id_default_transaction_options_is_malformed() {
        let doc = vec![(
            "defaultTransactionOptions".to_string(),
            BsonValue::ObjectId(BsonObjectId {
                timestamp: 0x650a_bcde,
                process: 1,
                counter: 2,
            }),
        )];
        let err = SessionOptionsDecoder.decode_document(&doc).unwrap_err();
        assert!(
            matches!(
                &err,
                DecodeError::MalformedInput {
                    target: "SessionOptions",
                    source: MalformedSource::ExpectedDocument { found: "objectId", .. },
                }
            ),
            "unexpected {err:?}"
        );
        assert!(err.unrecognized_fields().is_empty());
    }

    #[test]
    fn nested_bson_only_types_are_malformed_for_transaction_options() {
        let doc = vec![
            ("causalConsistency".to_string(), BsonValue::Boolean(true)),
            (
                "defaultTransactionOptions".to_string(),
                BsonValue::Document(vec![("readConcern".to_string(), BsonValue::DateTime(0))]),
            ),
        ];
        let err = SessionOptionsDecoder.decode_document(&doc).unwrap_err();
        assert!(
            matches!(
                &err,
                DecodeError::MalformedInput {
                    target: "TransactionOptions",
                    source: MalformedSource::ExpectedDocument { found: "date", .. },
                }
            ),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn session_extras_win_over_nested_bson_types() {
        let doc = vec![
            ("extra".to_string(), BsonValue::Int32(1)),
            (
                "defaultTransactionOptions".to_string(),
                BsonValue::Document(vec![("writeConcern".to_string(), BsonValue::MinKey)]),
            ),
        ];
        let err = SessionOptionsDecoder.decode_document(&doc).unwrap_err();
        assert_eq!(err.unrecognized_fields(), ["extra"]);
    }
}
