#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use sky_cursor::DataDescriptor;
use sky_pathcodec::{timestamp, DataType, PathBuffer, PropertyId, Value};

// Record slots of the test event layout.
pub const TS: usize = 0;
pub const TIMESTAMP: usize = 1;
pub const ACTION_ID: usize = 2;
pub const ACTION_STRING: usize = 3;
pub const ACTION_INT: usize = 4;
pub const ACTION_DOUBLE: usize = 5;
pub const ACTION_BOOLEAN: usize = 6;
pub const OBJECT_STRING: usize = 7;
pub const OBJECT_INT: usize = 8;
pub const OBJECT_DOUBLE: usize = 9;
pub const OBJECT_BOOLEAN: usize = 10;

/// A descriptor binding one action and one object property of every type.
pub fn full_descriptor() -> Arc<DataDescriptor> {
    let mut d = DataDescriptor::from_table([
        (-4, ACTION_BOOLEAN, DataType::Boolean),
        (-3, ACTION_DOUBLE, DataType::Double),
        (-2, ACTION_INT, DataType::Int),
        (-1, ACTION_STRING, DataType::String),
        (1, OBJECT_STRING, DataType::String),
        (2, OBJECT_INT, DataType::Int),
        (3, OBJECT_DOUBLE, DataType::Double),
        (4, OBJECT_BOOLEAN, DataType::Boolean),
    ])
    .unwrap();
    d.set_time(TS, TIMESTAMP);
    d.set_action(ACTION_ID);
    Arc::new(d)
}

/// A descriptor binding only the integer properties -1 and 1.
pub fn int_descriptor() -> Arc<DataDescriptor> {
    let mut d = DataDescriptor::from_table([
        (-1, ACTION_INT, DataType::Int),
        (1, OBJECT_INT, DataType::Int),
    ])
    .unwrap();
    d.set_time(TS, TIMESTAMP);
    d.set_action(ACTION_ID);
    Arc::new(d)
}

/// Builds a path from `(micros since epoch, action id, properties)` events.
pub fn path(events: &[(i64, u16, Vec<(PropertyId, Value)>)]) -> Bytes {
    let mut buf = PathBuffer::new();
    for (micros, action_id, properties) in events {
        buf.event_at(timestamp::shift(*micros), *action_id, properties);
    }
    buf.freeze()
}

pub fn secs(s: i64) -> i64 {
    s * timestamp::MICROS_PER_SECOND
}
