use bytes::{BufMut, Bytes, BytesMut};

use crate::tags;
use crate::timestamp;
use crate::types::{ActionId, PropertyId, Value};

/// A buffer for encoding paths.
///
/// Integers are written in the smallest encoding that holds them, doubles
/// are always written as 8 bytes.
#[derive(Debug, Default)]
pub struct PathBuffer {
    buf: BytesMut,
}

impl AsRef<[u8]> for PathBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl PathBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(size: usize) -> Self {
        PathBuffer {
            buf: BytesMut::with_capacity(size),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Writes a single byte.
    #[inline]
    pub fn byte(&mut self, byte: u8) {
        self.buf.reserve(1);
        self.buf.put_u8(byte);
    }

    /// Writes an unsigned integer.
    #[inline]
    pub fn uint<U: Into<u64>>(&mut self, u: U) {
        let u: u64 = u.into();
        if u <= tags::POS_FIXINT_MAX as u64 {
            self.byte(u as u8);
        } else if u <= u8::MAX as u64 {
            self.buf.reserve(2);
            self.buf.put_u8(tags::UINT8);
            self.buf.put_u8(u as u8);
        } else if u <= u16::MAX as u64 {
            self.buf.reserve(3);
            self.buf.put_u8(tags::UINT16);
            self.buf.put_u16(u as u16);
        } else if u <= u32::MAX as u64 {
            self.buf.reserve(5);
            self.buf.put_u8(tags::UINT32);
            self.buf.put_u32(u as u32);
        } else {
            self.buf.reserve(9);
            self.buf.put_u8(tags::UINT64);
            self.buf.put_u64(u);
        }
    }

    /// Writes a signed integer.
    #[inline]
    pub fn int<I: Into<i64>>(&mut self, i: I) {
        let i: i64 = i.into();
        if i >= 0 {
            self.uint(i as u64);
        } else if i >= -32 {
            self.byte(i as i8 as u8);
        } else if i >= i8::MIN as i64 {
            self.buf.reserve(2);
            self.buf.put_u8(tags::INT8);
            self.buf.put_i8(i as i8);
        } else if i >= i16::MIN as i64 {
            self.buf.reserve(3);
            self.buf.put_u8(tags::INT16);
            self.buf.put_i16(i as i16);
        } else if i >= i32::MIN as i64 {
            self.buf.reserve(5);
            self.buf.put_u8(tags::INT32);
            self.buf.put_i32(i as i32);
        } else {
            self.buf.reserve(9);
            self.buf.put_u8(tags::INT64);
            self.buf.put_i64(i);
        }
    }

    /// Writes a double, always as 8 bytes.
    #[inline]
    pub fn double(&mut self, f: f64) {
        self.buf.reserve(9);
        self.buf.put_u8(tags::FLOAT64);
        self.buf.put_f64(f);
    }

    #[inline]
    pub fn bool(&mut self, b: bool) {
        self.byte(if b { tags::TRUE } else { tags::FALSE });
    }

    #[inline]
    pub fn nil(&mut self) {
        self.byte(tags::NIL);
    }

    /// Writes a length-prefixed string.
    #[inline]
    pub fn str<S: AsRef<str>>(&mut self, str: S) {
        self.raw(str.as_ref().as_bytes());
    }

    /// Writes a length-prefixed raw byte string.
    ///
    /// Input longer than the raw32 limit is cut at `u32::MAX` bytes.
    pub fn raw(&mut self, bytes: &[u8]) {
        let len = raw_len(bytes.len());
        let bytes = &bytes[..len as usize];
        self.buf.reserve(5 + bytes.len());
        if len <= 0x1f {
            self.buf.put_u8(tags::FIXRAW_MIN | len as u8);
        } else if len <= u16::MAX as u32 {
            self.buf.put_u8(tags::RAW16);
            self.buf.put_u16(len as u16);
        } else {
            self.buf.put_u8(tags::RAW32);
            self.buf.put_u32(len);
        }
        self.buf.put_slice(bytes);
    }

    /// Writes a map header for `count` key/value pairs.
    pub fn map_header(&mut self, count: u32) {
        if count <= 0x0f {
            self.byte(tags::FIXMAP_MIN | count as u8);
        } else if count <= u16::MAX as u32 {
            self.buf.reserve(3);
            self.buf.put_u8(tags::MAP16);
            self.buf.put_u16(count as u16);
        } else {
            self.buf.reserve(5);
            self.buf.put_u8(tags::MAP32);
            self.buf.put_u32(count);
        }
    }

    /// Writes a value using the encoding of its own type.
    pub fn value(&mut self, value: &Value) {
        match value {
            Value::None => self.nil(),
            Value::String(s) => self.str(s),
            Value::Int(i) => self.int(*i),
            Value::Double(d) => self.double(*d),
            Value::Boolean(b) => self.bool(*b),
        }
    }

    /// Appends one event frame to the path.
    ///
    /// `micros` is the sub-second part of the event time. Whole seconds in
    /// it are carried into `seconds`, so the frame always holds micros below
    /// one million.
    pub fn event(
        &mut self,
        seconds: i64,
        micros: u32,
        action_id: ActionId,
        properties: &[(PropertyId, Value)],
    ) {
        let seconds = seconds.saturating_add((micros / MICROS_PER_SECOND) as i64);
        let micros = micros % MICROS_PER_SECOND;
        self.int(seconds);
        self.uint(micros);
        self.uint(action_id);
        self.map_header(properties.len() as u32);
        for (id, value) in properties {
            self.int(*id);
            self.value(value);
        }
    }

    /// Appends one event frame whose time is given as a shifted timestamp.
    pub fn event_at(&mut self, ts: i64, action_id: ActionId, properties: &[(PropertyId, Value)]) {
        let (seconds, micros) = timestamp::split(ts);
        self.event(seconds, micros, action_id, properties);
    }
}

const MICROS_PER_SECOND: u32 = timestamp::MICROS_PER_SECOND as u32;

#[inline]
fn raw_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
