use byteorder::{BigEndian, ByteOrder};

use crate::tags;
use crate::types::{CodecError, DataType, Value};

/// A cursor-based reader over a path buffer.
///
/// Uses "sticky error" semantics: once an error occurs, all subsequent reads
/// return zero/default values. The error is checked after a frame has been read.
pub struct PathReader<'a> {
    data: &'a [u8],
    pos: usize,
    err: Option<CodecError>,
}

impl<'a> PathReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Creates a reader positioned at `pos` within `data`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
            err: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.err.is_some()
    }

    pub fn error(&self) -> Option<CodecError> {
        self.err
    }

    /// The offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn set_err(&mut self, err: CodecError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    fn ensure(&mut self, n: usize) -> bool {
        if self.err.is_some() {
            false
        } else if self.pos + n > self.data.len() {
            self.set_err(CodecError::UnexpectedEof);
            false
        } else {
            true
        }
    }

    fn read_bytes_slice(&mut self, n: usize) -> &'a [u8] {
        if !self.ensure(n) {
            return &[];
        }
        let start = self.pos;
        self.pos += n;
        &self.data[start..self.pos]
    }

    fn byte(&mut self) -> u8 {
        if !self.ensure(1) {
            return 0;
        }
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    fn be_u16(&mut self) -> u16 {
        let b = self.read_bytes_slice(2);
        if b.len() < 2 {
            return 0;
        }
        BigEndian::read_u16(b)
    }

    fn be_u32(&mut self) -> u32 {
        let b = self.read_bytes_slice(4);
        if b.len() < 4 {
            return 0;
        }
        BigEndian::read_u32(b)
    }

    fn be_u64(&mut self) -> u64 {
        let b = self.read_bytes_slice(8);
        if b.len() < 8 {
            return 0;
        }
        BigEndian::read_u64(b)
    }

    /// Returns the next tag byte without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        if self.err.is_some() {
            return None;
        }
        self.data.get(self.pos).copied()
    }

    /// Reads an integer of any encoded width, widened to i128 so that both
    /// the full u64 and i64 ranges are representable.
    fn integer(&mut self) -> i128 {
        let tag = self.byte();
        if self.err.is_some() {
            return 0;
        }
        match tag {
            0x00..=tags::POS_FIXINT_MAX => tag as i128,
            tags::NEG_FIXINT_MIN..=0xff => (tag as i8) as i128,
            tags::UINT8 => self.byte() as i128,
            tags::UINT16 => self.be_u16() as i128,
            tags::UINT32 => self.be_u32() as i128,
            tags::UINT64 => self.be_u64() as i128,
            tags::INT8 => (self.byte() as i8) as i128,
            tags::INT16 => (self.be_u16() as i16) as i128,
            tags::INT32 => (self.be_u32() as i32) as i128,
            tags::INT64 => (self.be_u64() as i64) as i128,
            other => {
                self.set_err(CodecError::InvalidTag(other));
                0
            }
        }
    }

    /// Reads a signed integer of any encoded width.
    pub fn int(&mut self) -> i64 {
        let v = self.integer();
        match i64::try_from(v) {
            Ok(v) => v,
            Err(_) => {
                self.set_err(CodecError::OutOfRange);
                0
            }
        }
    }

    /// Reads an unsigned integer of any encoded width.
    pub fn uint(&mut self) -> u64 {
        let v = self.integer();
        match u64::try_from(v) {
            Ok(v) => v,
            Err(_) => {
                self.set_err(CodecError::OutOfRange);
                0
            }
        }
    }

    /// Reads a double. Integers are widened, float32 values are promoted.
    pub fn double(&mut self) -> f64 {
        match self.peek_tag() {
            Some(tags::FLOAT64) => {
                self.pos += 1;
                f64::from_bits(self.be_u64())
            }
            Some(tags::FLOAT32) => {
                self.pos += 1;
                f32::from_bits(self.be_u32()) as f64
            }
            _ => self.int() as f64,
        }
    }

    /// Reads a boolean.
    pub fn bool_val(&mut self) -> bool {
        match self.byte() {
            tags::FALSE => false,
            tags::TRUE => true,
            other => {
                self.set_err(CodecError::InvalidTag(other));
                false
            }
        }
    }

    /// Reads a nil marker.
    pub fn nil(&mut self) {
        let tag = self.byte();
        if tag != tags::NIL {
            self.set_err(CodecError::InvalidTag(tag));
        }
    }

    fn raw_len(&mut self) -> usize {
        let tag = self.byte();
        if self.err.is_some() {
            return 0;
        }
        match tag {
            tags::FIXRAW_MIN..=tags::FIXRAW_MAX => (tag & 0x1f) as usize,
            tags::STR8 => self.byte() as usize,
            tags::RAW16 => self.be_u16() as usize,
            tags::RAW32 => self.be_u32() as usize,
            other => {
                self.set_err(CodecError::InvalidTag(other));
                0
            }
        }
    }

    /// Reads a length-prefixed raw value as a byte slice borrowed from the path.
    pub fn raw(&mut self) -> &'a [u8] {
        let len = self.raw_len();
        if len == 0 {
            return &[];
        }
        self.read_bytes_slice(len)
    }

    /// Reads a length-prefixed string into `out`, replacing its contents.
    /// Invalid UTF-8 is replaced. The existing allocation of `out` is reused.
    pub fn string_into(&mut self, out: &mut String) {
        out.clear();
        let bytes = self.raw();
        if self.err.is_some() {
            return;
        }
        match std::str::from_utf8(bytes) {
            Ok(s) => out.push_str(s),
            Err(_) => out.push_str(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Reads a length-prefixed string.
    pub fn string(&mut self) -> String {
        let mut s = String::new();
        self.string_into(&mut s);
        s
    }

    /// Reads a map header and returns the number of key/value pairs.
    pub fn map_header(&mut self) -> u32 {
        let tag = self.byte();
        if self.err.is_some() {
            return 0;
        }
        match tag {
            tags::FIXMAP_MIN..=tags::FIXMAP_MAX => (tag & 0x0f) as u32,
            tags::MAP16 => self.be_u16() as u32,
            tags::MAP32 => self.be_u32(),
            other => {
                self.set_err(CodecError::InvalidTag(other));
                0
            }
        }
    }

    /// Reads a value of the given type into `out`, reusing string storage
    /// when `out` already holds a string.
    ///
    /// `DataType::None` skips the value and leaves `out` untouched.
    pub fn value_into(&mut self, data_type: DataType, out: &mut Value) {
        match data_type {
            DataType::None => self.skip_value(),
            DataType::String => {
                if let Value::String(s) = out {
                    self.string_into(s);
                } else {
                    *out = Value::String(self.string());
                }
            }
            DataType::Int => *out = Value::Int(self.int()),
            DataType::Double => *out = Value::Double(self.double()),
            DataType::Boolean => *out = Value::Boolean(self.bool_val()),
        }
    }

    /// Reads a value of the given type.
    pub fn value(&mut self, data_type: DataType) -> Value {
        let mut v = Value::None;
        self.value_into(data_type, &mut v);
        v
    }

    /// Skips over a single value of any type, including nested containers.
    pub fn skip_value(&mut self) {
        let mut pending: u64 = 1;
        while pending > 0 {
            pending -= 1;
            let tag = self.byte();
            if self.err.is_some() {
                return;
            }
            match tag {
                0x00..=tags::POS_FIXINT_MAX
                | tags::NEG_FIXINT_MIN..=0xff
                | tags::NIL
                | tags::FALSE
                | tags::TRUE => {}
                tags::FIXMAP_MIN..=tags::FIXMAP_MAX => pending += 2 * (tag & 0x0f) as u64,
                tags::FIXARRAY_MIN..=tags::FIXARRAY_MAX => pending += (tag & 0x0f) as u64,
                tags::FIXRAW_MIN..=tags::FIXRAW_MAX => self.skip((tag & 0x1f) as usize),
                tags::UINT8 | tags::INT8 => self.skip(1),
                tags::UINT16 | tags::INT16 => self.skip(2),
                tags::UINT32 | tags::INT32 | tags::FLOAT32 => self.skip(4),
                tags::UINT64 | tags::INT64 | tags::FLOAT64 => self.skip(8),
                tags::STR8 => {
                    let n = self.byte() as usize;
                    self.skip(n)
                }
                tags::RAW16 => {
                    let n = self.be_u16() as usize;
                    self.skip(n)
                }
                tags::RAW32 => {
                    let n = self.be_u32() as usize;
                    self.skip(n)
                }
                tags::ARRAY16 => pending += self.be_u16() as u64,
                tags::ARRAY32 => pending += self.be_u32() as u64,
                tags::MAP16 => pending += 2 * self.be_u16() as u64,
                tags::MAP32 => pending += 2 * self.be_u32() as u64,
                other => {
                    self.set_err(CodecError::InvalidTag(other));
                    return;
                }
            }
            if self.err.is_some() {
                return;
            }
        }
    }

    /// Skips n bytes.
    pub fn skip(&mut self, n: usize) {
        if !self.ensure(n) {
            return;
        }
        self.pos += n;
    }
}
