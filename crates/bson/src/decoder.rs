//! BSON document decoder.
//!
//! BSON is a little-endian binary format. Every read is bounds checked, so
//! truncated or hostile input surfaces as a [`BsonError`] instead of a panic.
//! Nesting is capped at [`MAX_DEPTH`] documents so recursion stays bounded.

use super::error::BsonError;
use super::values::{
    BsonBinary, BsonDbPointer, BsonDecimal128, BsonDocument, BsonJavascriptCode,
    BsonJavascriptCodeWithScope, BsonObjectId, BsonSymbol, BsonTimestamp, BsonValue,
};

/// Default cap on nested documents, arrays and code scopes (top level is 1).
pub const MAX_DEPTH: usize = 100;

/// BSON document decoder.
pub struct BsonDecoder {
    data: Vec<u8>,
    x: usize,
    depth: usize,
    max_depth: usize,
}

impl Default for BsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            data: Vec::new(),
            x: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Decodes a single BSON document that must span all of `data`.
    pub fn decode(&mut self, data: &[u8]) -> Result<BsonDocument, BsonError> {
        self.data = data.to_vec();
        self.x = 0;
        self.depth = 0;
        let doc = self.read_document()?;
        if self.x != self.data.len() {
            return Err(BsonError::TrailingBytes(self.data.len() - self.x));
        }
        Ok(doc)
    }

    fn take(&mut self, n: usize) -> Result<&[u8], BsonError> {
        let end = self.x.checked_add(n).ok_or(BsonError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(BsonError::UnexpectedEof);
        }
        let slice = &self.data[self.x..end];
        self.x = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BsonError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, BsonError> {
        Ok(self.array::<1>()?[0])
    }

    fn i32_le(&mut self) -> Result<i32, BsonError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn i64_le(&mut self) -> Result<i64, BsonError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn f64_le(&mut self) -> Result<f64, BsonError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    fn buf(&mut self, n: usize) -> Result<Vec<u8>, BsonError> {
        Ok(self.take(n)?.to_vec())
    }

    /// Reads a length prefix, rejecting negative values.
    fn len_prefix(&mut self) -> Result<(i32, usize), BsonError> {
        let raw = self.i32_le()?;
        let len = usize::try_from(raw).map_err(|_| BsonError::InvalidSize(raw))?;
        Ok((raw, len))
    }

    fn read_document(&mut self) -> Result<BsonDocument, BsonError> {
        if self.depth >= self.max_depth {
            return Err(BsonError::TooDeep(self.max_depth));
        }
        self.depth += 1;
        let fields = self.read_document_body();
        self.depth -= 1;
        fields
    }

    fn read_document_body(&mut self) -> Result<BsonDocument, BsonError> {
        let start = self.x;
        let (raw_size, size) = self.len_prefix()?;
        if size < 5 {
            return Err(BsonError::InvalidSize(raw_size));
        }
        let end = start.checked_add(size).ok_or(BsonError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(BsonError::UnexpectedEof);
        }
        let mut fields = BsonDocument::new();
        loop {
            if self.x >= end {
                return Err(BsonError::InvalidSize(raw_size));
            }
            let element_type = self.u8()?;
            if element_type == 0 {
                break;
            }
            let key = self.read_cstring()?;
            let value = self.read_element_value(element_type)?;
            fields.push((key, value));
        }
        if self.x != end {
            return Err(BsonError::InvalidSize(raw_size));
        }
        Ok(fields)
    }

    fn read_cstring(&mut self) -> Result<String, BsonError> {
        let rest = self.data.get(self.x..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or(BsonError::UnexpectedEof)?;
        let bytes = self.buf(len)?;
        self.x += 1; // null terminator
        String::from_utf8(bytes).map_err(|_| BsonError::InvalidUtf8)
    }

    fn read_string(&mut self) -> Result<String, BsonError> {
        let (raw, length) = self.len_prefix()?;
        if length == 0 {
            return Err(BsonError::InvalidSize(raw));
        }
        let bytes = self.buf(length - 1)?; // length includes null terminator
        if self.u8()? != 0 {
            return Err(BsonError::InvalidSize(raw));
        }
        String::from_utf8(bytes).map_err(|_| BsonError::InvalidUtf8)
    }

    fn read_element_value(&mut self, typ: u8) -> Result<BsonValue, BsonError> {
        let value = match typ {
            0x01 => BsonValue::Float(self.f64_le()?),
            0x02 => BsonValue::Str(self.read_string()?),
            0x03 => BsonValue::Document(self.read_document()?),
            0x04 => BsonValue::Array(self.read_array()?),
            0x05 => self.read_binary()?,
            0x06 => BsonValue::Undefined,
            0x07 => BsonValue::ObjectId(self.read_object_id()?),
            0x08 => match self.u8()? {
                0 => BsonValue::Boolean(false),
                1 => BsonValue::Boolean(true),
                b => return Err(BsonError::InvalidBoolean(b)),
            },
            0x09 => BsonValue::DateTime(self.i64_le()?),
            0x0a => BsonValue::Null,
            0x0b => {
                let pattern = self.read_cstring()?;
                let flags = self.read_cstring()?;
                BsonValue::Regex(pattern, flags)
            }
            0x0c => {
                let name = self.read_string()?;
                let id = self.read_object_id()?;
                BsonValue::DbPointer(BsonDbPointer { name, id })
            }
            0x0d => BsonValue::JavaScriptCode(BsonJavascriptCode {
                code: self.read_string()?,
            }),
            0x0e => BsonValue::Symbol(BsonSymbol {
                symbol: self.read_string()?,
            }),
            0x0f => self.read_code_with_scope()?,
            0x10 => BsonValue::Int32(self.i32_le()?),
            0x11 => {
                let increment = self.i32_le()?;
                let timestamp = self.i32_le()?;
                BsonValue::Timestamp(BsonTimestamp {
                    increment,
                    timestamp,
                })
            }
            0x12 => BsonValue::Int64(self.i64_le()?),
            0x13 => BsonValue::Decimal128(BsonDecimal128 {
                data: self.buf(16)?,
            }),
            0xff => BsonValue::MinKey,
            0x7f => BsonValue::MaxKey,
            _ => return Err(BsonError::UnsupportedType(typ)),
        };
        Ok(value)
    }

    fn read_array(&mut self) -> Result<Vec<BsonValue>, BsonError> {
        let fields = self.read_document()?;
        // Sort by numeric key and extract values
        let mut indexed: Vec<(usize, BsonValue)> = fields
            .into_iter()
            .map(|(k, v)| (k.parse::<usize>().unwrap_or(0), v))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        Ok(indexed.into_iter().map(|(_, v)| v).collect())
    }

    fn read_binary(&mut self) -> Result<BsonValue, BsonError> {
        let (_, length) = self.len_prefix()?;
        let subtype = self.u8()?;
        let data = self.buf(length)?;
        Ok(BsonValue::Binary(BsonBinary { subtype, data }))
    }

    fn read_object_id(&mut self) -> Result<BsonObjectId, BsonError> {
        Ok(BsonObjectId::from_bytes(&self.array()?))
    }

    fn read_code_with_scope(&mut self) -> Result<BsonValue, BsonError> {
        let _total_len = self.i32_le()?;
        let code = self.read_string()?;
        let scope = self.read_document()?;
        Ok(BsonValue::JavaScriptCodeWithScope(
            BsonJavascriptCodeWithScope { code, scope },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document() {
        let mut decoder = BsonDecoder::new();
        assert_eq!(decoder.decode(&[5, 0, 0, 0, 0]).unwrap(), Vec::new());
    }

    #[test]
    fn int32_field() {
        let bytes = [
            12, 0, 0, 0, // doc len
            0x10, b'a', 0x00, // int32 "a"
            7, 0, 0, 0, // value
            0x00,
        ];
        let mut decoder = BsonDecoder::new();
        assert_eq!(
            decoder.decode(&bytes).unwrap(),
            vec![("a".to_string(), BsonValue::Int32(7))]
        );
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut decoder = BsonDecoder::new();
        assert_eq!(decoder.decode(&[5, 0, 0]), Err(BsonError::UnexpectedEof));
        assert_eq!(
            decoder.decode(&[12, 0, 0, 0, 0x10, b'a', 0x00, 7, 0]),
            Err(BsonError::UnexpectedEof)
        );
    }

    #[test]
    fn negative_and_tiny_sizes_are_rejected() {
        let mut decoder = BsonDecoder::new();
        assert_eq!(
            decoder.decode(&[0xff, 0xff, 0xff, 0xff, 0]),
            Err(BsonError::InvalidSize(-1))
        );
        assert_eq!(
            decoder.decode(&[4, 0, 0, 0]),
            Err(BsonError::InvalidSize(4))
        );
    }

    #[test]
    fn missing_terminator_is_rejected() {
        // Declared length stops right after the int32 value.
        let bytes = [11, 0, 0, 0, 0x10, b'a', 0x00, 7, 0, 0, 0];
        let mut decoder = BsonDecoder::new();
        assert_eq!(decoder.decode(&bytes), Err(BsonError::InvalidSize(11)));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut decoder = BsonDecoder::new();
        assert_eq!(
            decoder.decode(&[5, 0, 0, 0, 0, 0xaa]),
            Err(BsonError::TrailingBytes(1))
        );
    }

    #[test]
    fn boolean_bytes_other_than_zero_or_one_are_rejected() {
        let mut decoder = BsonDecoder::new();
        let mut bytes = vec![9, 0, 0, 0, 0x08, b'b', 0x00, 0x01, 0x00];
        assert_eq!(
            decoder.decode(&bytes).unwrap(),
            vec![("b".to_string(), BsonValue::Boolean(true))]
        );
        bytes[7] = 0x02;
        assert_eq!(decoder.decode(&bytes), Err(BsonError::InvalidBoolean(2)));
    }

    #[test]
    fn depth_limit_counts_every_nested_document() {
        // {a: {a: []}} is three documents deep.
        let bytes = [
            21, 0, 0, 0, 0x03, b'a', 0x00, 13, 0, 0, 0, 0x04, b'a', 0x00, 5, 0, 0, 0, 0x00,
            0x00, 0x00,
        ];
        assert!(BsonDecoder::with_max_depth(3).decode(&bytes).is_ok());
        assert_eq!(
            BsonDecoder::with_max_depth(2).decode(&bytes),
            Err(BsonError::TooDeep(2))
        );
    }

    #[test]
    fn decoder_is_reusable_after_error() {
        let mut decoder = BsonDecoder::new();
        assert!(decoder.decode(&[1, 2]).is_err());
        assert!(decoder.decode(&[5, 0, 0, 0, 0]).is_ok());
    }
}
