use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{convert, parse_record, reject_extra, OptionsDecoder};
use crate::concern::{ReadConcern, ReadPreference, WriteConcern};
use crate::duration;
use crate::error::DecodeError;
use crate::options::TransactionOptions;

/// Decodes `{readConcern?, readPreference?, writeConcern?, maxCommitTimeMS?}`
/// into [`TransactionOptions`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionOptionsDecoder;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransactionOptions {
    read_concern: Option<Map<String, Value>>,
    read_preference: Option<Map<String, Value>>,
    write_concern: Option<Map<String, Value>>,
    #[serde(rename = "maxCommitTimeMS", default, deserialize_with = "duration::millis")]
    max_commit_time: Option<Duration>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl OptionsDecoder for TransactionOptionsDecoder {
    type Options = TransactionOptions;

    const TARGET: &'static str = "TransactionOptions";

    const DOCUMENT_KEYS: &'static [&'static str] =
        &["readConcern", "readPreference", "writeConcern"];

    fn decode_value(&self, value: &Value) -> Result<TransactionOptions, DecodeError> {
        let raw: RawTransactionOptions = parse_record(Self::TARGET, value)?;
        reject_extra(Self::TARGET, &raw.extra)?;

        let mut opts = TransactionOptions::default();
        if let Some(max_commit_time) = raw.max_commit_time {
            opts.max_commit_time = Some(max_commit_time);
        }
        if let Some(doc) = &raw.read_concern {
            opts.read_concern = Some(convert("readConcern", doc, ReadConcern::from_document)?);
        }
        if let Some(doc) = &raw.read_preference {
            opts.read_preference = Some(convert(
                "readPreference",
                doc,
                ReadPreference::from_document,
            )?);
        }
        if let Some(doc) = &raw.write_concern {
            opts.write_concern = Some(convert("writeConcern", doc, WriteConcern::from_document)?);
        }

        tracing::trace!(options = ?opts, "decoded transaction options");
        Ok(opts)
    }
}
