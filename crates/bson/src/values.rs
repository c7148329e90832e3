//! BSON value types.

/// Ordered list of document fields. Duplicate keys are preserved as read.
pub type BsonDocument = Vec<(String, BsonValue)>;

/// 12-byte ObjectId split into its timestamp, process and counter parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonObjectId {
    pub timestamp: u32,
    /// 40-bit process identifier.
    pub process: u64,
    /// 24-bit counter.
    pub counter: u32,
}

impl BsonObjectId {
    /// Wire representation of the id.
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..4].copy_from_slice(&self.timestamp.to_be_bytes());
        let process = self.process.to_le_bytes();
        out[4..9].copy_from_slice(&process[0..5]);
        let counter = self.counter.to_be_bytes();
        out[9..12].copy_from_slice(&counter[1..4]);
        out
    }

    pub fn from_bytes(bytes: &[u8; 12]) -> Self {
        let timestamp = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let lo32 = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as u64;
        let hi8 = bytes[8] as u64;
        let counter = u32::from_be_bytes([0, bytes[9], bytes[10], bytes[11]]);
        Self {
            timestamp,
            process: lo32 | (hi8 << 32),
            counter,
        }
    }

    /// Lowercase 24-digit hex form, as used by extended JSON `$oid`.
    pub fn to_hex(&self) -> String {
        hex(&self.to_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonBinary {
    pub subtype: u8,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonDbPointer {
    pub name: String,
    pub id: BsonObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonJavascriptCode {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BsonJavascriptCodeWithScope {
    pub code: String,
    pub scope: BsonDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonSymbol {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonTimestamp {
    pub increment: i32,
    pub timestamp: i32,
}

/// Raw IEEE 754-2008 decimal128 bytes (little-endian, as on the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonDecimal128 {
    pub data: Vec<u8>,
}

/// A single BSON element value.
#[derive(Debug, Clone, PartialEq)]
pub enum BsonValue {
    Float(f64),
    Str(String),
    Document(BsonDocument),
    Array(Vec<BsonValue>),
    Binary(BsonBinary),
    Undefined,
    ObjectId(BsonObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Null,
    /// Pattern and flags.
    Regex(String, String),
    DbPointer(BsonDbPointer),
    JavaScriptCode(BsonJavascriptCode),
    Symbol(BsonSymbol),
    JavaScriptCodeWithScope(BsonJavascriptCodeWithScope),
    Int32(i32),
    Timestamp(BsonTimestamp),
    Int64(i64),
    Decimal128(BsonDecimal128),
    MinKey,
    MaxKey,
}

impl BsonValue {
    /// Type alias as used by the `$type` query operator.
    pub fn type_name(&self) -> &'static str {
        match self {
            BsonValue::Float(_) => "double",
            BsonValue::Str(_) => "string",
            BsonValue::Document(_) => "object",
            BsonValue::Array(_) => "array",
            BsonValue::Binary(_) => "binData",
            BsonValue::Undefined => "undefined",
            BsonValue::ObjectId(_) => "objectId",
            BsonValue::Boolean(_) => "bool",
            BsonValue::DateTime(_) => "date",
            BsonValue::Null => "null",
            BsonValue::Regex(_, _) => "regex",
            BsonValue::DbPointer(_) => "dbPointer",
            BsonValue::JavaScriptCode(_) => "javascript",
            BsonValue::Symbol(_) => "symbol",
            BsonValue::JavaScriptCodeWithScope(_) => "javascriptWithScope",
            BsonValue::Int32(_) => "int",
            BsonValue::Timestamp(_) => "timestamp",
            BsonValue::Int64(_) => "long",
            BsonValue::Decimal128(_) => "decimal",
            BsonValue::MinKey => "minKey",
            BsonValue::MaxKey => "maxKey",
        }
    }

    /// Element type byte used on the wire.
    pub fn element_type(&self) -> u8 {
        match self {
            BsonValue::Float(_) => 0x01,
            BsonValue::Str(_) => 0x02,
            BsonValue::Document(_) => 0x03,
            BsonValue::Array(_) => 0x04,
            BsonValue::Binary(_) => 0x05,
            BsonValue::Undefined => 0x06,
            BsonValue::ObjectId(_) => 0x07,
            BsonValue::Boolean(_) => 0x08,
            BsonValue::DateTime(_) => 0x09,
            BsonValue::Null => 0x0a,
            BsonValue::Regex(_, _) => 0x0b,
            BsonValue::DbPointer(_) => 0x0c,
            BsonValue::JavaScriptCode(_) => 0x0d,
            BsonValue::Symbol(_) => 0x0e,
            BsonValue::JavaScriptCodeWithScope(_) => 0x0f,
            BsonValue::Int32(_) => 0x10,
            BsonValue::Timestamp(_) => 0x11,
            BsonValue::Int64(_) => 0x12,
            BsonValue::Decimal128(_) => 0x13,
            BsonValue::MinKey => 0xff,
            BsonValue::MaxKey => 0x7f,
        }
    }
}

/// Nesting depth of `doc`, counting the document itself as 1 and every
/// embedded document, array and code scope as one more level.
///
/// Walks with an explicit stack, so arbitrarily deep values are safe to
/// measure before handing them to recursive code.
pub fn document_depth(doc: &[(String, BsonValue)]) -> usize {
    let mut max = 1;
    let mut stack: Vec<(&BsonValue, usize)> = doc.iter().map(|(_, v)| (v, 1)).collect();
    while let Some((value, depth)) = stack.pop() {
        match value {
            BsonValue::Document(fields)
            | BsonValue::JavaScriptCodeWithScope(BsonJavascriptCodeWithScope {
                scope: fields,
                ..
            }) => stack.extend(fields.iter().map(|(_, v)| (v, depth + 1))),
            BsonValue::Array(items) => stack.extend(items.iter().map(|v| (v, depth + 1))),
            _ => continue,
        }
        max = max.max(depth + 1);
    }
    max
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}
