//! Value codec for Sky paths.
//!
//! A path is the full event history of one object, stored as a sequence of
//! event frames. Values inside a frame use a compact, self-describing
//! encoding (a subset of MessagePack, big-endian):
//!
//! | Tag          | Value                        |
//! |--------------|------------------------------|
//! | 0x00-0x7f    | positive fixint              |
//! | 0xe0-0xff    | negative fixint              |
//! | 0xcc-0xcf    | uint8 / 16 / 32 / 64         |
//! | 0xd0-0xd3    | int8 / 16 / 32 / 64          |
//! | 0xca, 0xcb   | float32, float64             |
//! | 0xc0         | nil                          |
//! | 0xc2, 0xc3   | false, true                  |
//! | 0xa0-0xbf    | fixraw (length in low 5 bits)|
//! | 0xd9-0xdb    | str8 / raw16 / raw32         |
//! | 0x80-0x8f    | fixmap                       |
//! | 0xde, 0xdf   | map16 / map32                |
//!
//! Each event frame is laid out as:
//!
//! ```text
//! [seconds: int][micros: uint][action id: uint][map header][(property id: int, value)]*
//! ```
//!
//! # Usage
//!
//! ```
//! use sky_pathcodec::{DataType, PathBuffer, PathReader, Value};
//!
//! let mut buf = PathBuffer::new();
//! buf.event(10, 0, 1, &[(1, Value::from("john doe"))]);
//! let path = buf.freeze();
//!
//! let mut r = PathReader::new(&path);
//! assert_eq!(r.int(), 10);
//! assert_eq!(r.uint(), 0);
//! assert_eq!(r.uint(), 1);
//! assert_eq!(r.map_header(), 1);
//! assert_eq!(r.int(), 1);
//! assert_eq!(r.value(DataType::String), Value::from("john doe"));
//! assert!(!r.has_error());
//! ```

mod reader;
mod tags;
pub mod timestamp;
pub mod types;
mod writer;

pub use reader::PathReader;
pub use types::{ActionId, CodecError, DataType, PropertyId, Value};
pub use writer::PathBuffer;
