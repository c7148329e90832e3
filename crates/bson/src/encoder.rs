//! BSON document encoder.

use super::values::{BsonDocument, BsonValue};

/// BSON document encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonEncoder;

impl BsonEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes `fields` as a top-level BSON document.
    pub fn encode(&self, fields: &[(String, BsonValue)]) -> Vec<u8> {
        let mut out = Vec::new();
        write_document(&mut out, fields);
        out
    }
}

fn write_document(out: &mut Vec<u8>, fields: &[(String, BsonValue)]) {
    let start = out.len();
    out.extend_from_slice(&[0, 0, 0, 0]);
    for (key, value) in fields {
        write_element(out, key, value);
    }
    out.push(0);
    patch_len(out, start);
}

/// Back-fills the i32 length prefix reserved at `start`.
fn patch_len(out: &mut [u8], start: usize) {
    let len = (out.len() - start) as i32;
    out[start..start + 4].copy_from_slice(&len.to_le_bytes());
}

fn write_cstring(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&((s.len() + 1) as i32).to_le_bytes());
    write_cstring(out, s);
}

fn write_element(out: &mut Vec<u8>, key: &str, value: &BsonValue) {
    out.push(value.element_type());
    write_cstring(out, key);
    match value {
        BsonValue::Float(f) => out.extend_from_slice(&f.to_le_bytes()),
        BsonValue::Str(s) => write_string(out, s),
        BsonValue::Document(doc) => write_document(out, doc),
        BsonValue::Array(items) => {
            let doc: BsonDocument = items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect();
            write_document(out, &doc);
        }
        BsonValue::Binary(bin) => {
            out.extend_from_slice(&(bin.data.len() as i32).to_le_bytes());
            out.push(bin.subtype);
            out.extend_from_slice(&bin.data);
        }
        BsonValue::Undefined | BsonValue::Null | BsonValue::MinKey | BsonValue::MaxKey => {}
        BsonValue::ObjectId(id) => out.extend_from_slice(&id.to_bytes()),
        BsonValue::Boolean(b) => out.push(u8::from(*b)),
        BsonValue::DateTime(ms) => out.extend_from_slice(&ms.to_le_bytes()),
        BsonValue::Regex(pattern, flags) => {
            write_cstring(out, pattern);
            write_cstring(out, flags);
        }
        BsonValue::DbPointer(ptr) => {
            write_string(out, &ptr.name);
            out.extend_from_slice(&ptr.id.to_bytes());
        }
        BsonValue::JavaScriptCode(code) => write_string(out, &code.code),
        BsonValue::Symbol(sym) => write_string(out, &sym.symbol),
        BsonValue::JavaScriptCodeWithScope(cws) => {
            let start = out.len();
            out.extend_from_slice(&[0, 0, 0, 0]);
            write_string(out, &cws.code);
            write_document(out, &cws.scope);
            patch_len(out, start);
        }
        BsonValue::Int32(i) => out.extend_from_slice(&i.to_le_bytes()),
        BsonValue::Timestamp(ts) => {
            out.extend_from_slice(&ts.increment.to_le_bytes());
            out.extend_from_slice(&ts.timestamp.to_le_bytes());
        }
        BsonValue::Int64(i) => out.extend_from_slice(&i.to_le_bytes()),
        BsonValue::Decimal128(dec) => {
            let mut data = [0u8; 16];
            let n = dec.data.len().min(16);
            data[..n].copy_from_slice(&dec.data[..n]);
            out.extend_from_slice(&data);
        }
    }
}
