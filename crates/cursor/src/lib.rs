//! Session-aware cursor over Sky paths.
//!
//! A path holds every event of one object. The cursor decodes the events in
//! order into an [`EventRecord`] whose layout is chosen at runtime by a
//! [`DataDescriptor`]:
//!
//! - object properties (positive ids) keep their value until overwritten,
//! - action properties (negative ids) are reset on every event and only set
//!   on events that carry an action,
//! - properties without a binding are decoded and dropped.
//!
//! Events are grouped into sessions: a new session starts whenever the gap
//! to the previous event exceeds the idle threshold.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sky_cursor::{DataDescriptor, SessionCursor};
//! use sky_pathcodec::{DataType, PathBuffer, Value};
//!
//! let mut descriptor = DataDescriptor::from_table([(1, 2, DataType::Int)]).unwrap();
//! descriptor.set_time(0, 1);
//!
//! let mut path = PathBuffer::new();
//! path.event(0, 0, 0, &[(1, Value::from(10i64))]);
//! path.event(5, 0, 0, &[(1, Value::from(20i64))]);
//!
//! let mut cursor = SessionCursor::new(Arc::new(descriptor), Some(60));
//! cursor.bind(path.freeze());
//! while cursor.next_session() {
//!     while cursor.next_event() {
//!         println!("{} {}", cursor.record().int(1), cursor.record().int(2));
//!     }
//! }
//! ```

mod catalog;
mod config;
mod decoder;
mod descriptor;
mod error;
mod iterator;
mod record;
mod session;
mod store;

pub use catalog::{Property, PropertyKind, PropertyTable};
pub use config::{CursorConfig, SESSION_IDLE_VAR};
pub use decoder::{DecodeMode, Decoded, EventHeader, PathDecoder};
pub use descriptor::{
    DataDescriptor, FieldBinding, ACTION_ID_SLOT, FIRST_PROPERTY_SLOT, PROPERTY_ID_COUNT,
    TIMESTAMP_SLOT, TS_SLOT,
};
pub use error::{CatalogError, ConfigError, CorruptPath, CorruptReason, DescriptorError};
pub use iterator::PathIterator;
pub use record::EventRecord;
pub use session::{CursorState, SessionCursor};
pub use store::{MemoryStore, PathStore};
