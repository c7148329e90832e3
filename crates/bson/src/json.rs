//! Projection between BSON values and `serde_json::Value`.
//!
//! Types JSON can carry natively map directly, integers stay integers.
//! BSON-only types become canonical extended JSON wrappers (`$oid`, `$date`,
//! `$binary`, ...), which never collide with plain option documents.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Number, Value};

use super::values::{hex, BsonDocument, BsonValue};

/// Converts one BSON value to JSON.
pub fn bson_to_json(value: &BsonValue) -> Value {
    match value {
        BsonValue::Float(f) => match Number::from_f64(*f) {
            Some(n) => Value::Number(n),
            None => json!({ "$numberDouble": non_finite_label(*f) }),
        },
        BsonValue::Str(s) => Value::String(s.clone()),
        BsonValue::Document(doc) => Value::Object(document_to_json(doc)),
        BsonValue::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        BsonValue::Binary(bin) => json!({
            "$binary": {
                "base64": STANDARD.encode(&bin.data),
                "subType": format!("{:02x}", bin.subtype),
            }
        }),
        BsonValue::Undefined | BsonValue::Null => Value::Null,
        BsonValue::ObjectId(id) => json!({ "$oid": id.to_hex() }),
        BsonValue::Boolean(b) => Value::Bool(*b),
        BsonValue::DateTime(ms) => json!({ "$date": { "$numberLong": ms.to_string() } }),
        BsonValue::Regex(pattern, flags) => json!({
            "$regularExpression": { "pattern": pattern, "options": flags }
        }),
        BsonValue::DbPointer(ptr) => json!({
            "$dbPointer": { "$ref": ptr.name, "$id": { "$oid": ptr.id.to_hex() } }
        }),
        BsonValue::JavaScriptCode(code) => json!({ "$code": code.code }),
        BsonValue::Symbol(sym) => json!({ "$symbol": sym.symbol }),
        BsonValue::JavaScriptCodeWithScope(cws) => json!({
            "$code": cws.code,
            "$scope": Value::Object(document_to_json(&cws.scope)),
        }),
        BsonValue::Int32(i) => Value::from(*i),
        BsonValue::Timestamp(ts) => json!({
            "$timestamp": { "t": ts.timestamp as u32, "i": ts.increment as u32 }
        }),
        BsonValue::Int64(i) => Value::from(*i),
        // Decimal strings are not rendered; the raw bytes keep the value lossless.
        BsonValue::Decimal128(dec) => json!({ "$decimal128Bytes": hex(&dec.data) }),
        BsonValue::MinKey => json!({ "$minKey": 1 }),
        BsonValue::MaxKey => json!({ "$maxKey": 1 }),
    }
}

fn non_finite_label(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

/// Converts a BSON document to a JSON object. On duplicate keys the last one
/// wins while keeping the position of the first.
pub fn document_to_json(doc: &[(String, BsonValue)]) -> Map<String, Value> {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc {
        map.insert(key.clone(), bson_to_json(value));
    }
    map
}

/// Converts plain JSON to BSON. Integers that fit 32 bits become `Int32`,
/// other integers `Int64`, everything else numeric a `Float`.
pub fn json_to_bson(value: &Value) -> BsonValue {
    match value {
        Value::Null => BsonValue::Null,
        Value::Bool(b) => BsonValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => BsonValue::Int32(small),
                    Err(_) => BsonValue::Int64(i),
                }
            } else {
                BsonValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => BsonValue::Str(s.clone()),
        Value::Array(items) => BsonValue::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => BsonValue::Document(json_to_document(map)),
    }
}

pub fn json_to_document(map: &Map<String, Value>) -> BsonDocument {
    map.iter()
        .map(|(k, v)| (k.clone(), json_to_bson(v)))
        .collect()
}
