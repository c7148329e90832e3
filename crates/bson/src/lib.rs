//! BSON (Binary JSON) encoding, decoding and JSON projection.
//!
//! Documents are kept as ordered `(key, value)` lists so that key order and
//! duplicate keys survive a decode. [`document_to_json`] projects a document
//! onto [`serde_json::Value`] for schema-driven consumers.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod values;

pub use decoder::{BsonDecoder, MAX_DEPTH};
pub use encoder::BsonEncoder;
pub use error::BsonError;
pub use json::{bson_to_json, document_to_json, json_to_bson, json_to_document};
pub use values::{
    document_depth, BsonBinary, BsonDbPointer, BsonDecimal128, BsonDocument, BsonJavascriptCode,
    BsonJavascriptCodeWithScope, BsonObjectId, BsonSymbol, BsonTimestamp, BsonValue,
};
