use sky_cursor::{EventRecord, SessionCursor};
use sky_pathcodec::{timestamp, Value};

use crate::common::*;

mod common;

struct Expected<'a> {
    ts: i64,
    action_id: i64,
    object_string: &'a str,
    object_int: i64,
    object_double: f64,
    object_boolean: bool,
    action_string: &'a str,
    action_int: i64,
    action_double: f64,
    action_boolean: bool,
}

fn assert_state(record: &EventRecord, e: Expected<'_>) {
    assert_eq!(record.int(TS), e.ts);
    assert_eq!(record.int(TIMESTAMP), timestamp::seconds(e.ts));
    assert_eq!(record.int(ACTION_ID), e.action_id);
    assert_eq!(record.string(OBJECT_STRING), e.object_string);
    assert_eq!(record.int(OBJECT_INT), e.object_int);
    assert!((record.double(OBJECT_DOUBLE) - e.object_double).abs() < 0.1);
    assert_eq!(record.boolean(OBJECT_BOOLEAN), e.object_boolean);
    assert_eq!(record.string(ACTION_STRING), e.action_string);
    assert_eq!(record.int(ACTION_INT), e.action_int);
    assert!((record.double(ACTION_DOUBLE) - e.action_double).abs() < 0.1);
    assert_eq!(record.boolean(ACTION_BOOLEAN), e.action_boolean);
}

fn set_data_path() -> bytes::Bytes {
    path(&[
        // Object data only.
        (
            0,
            0,
            vec![
                (1, Value::from("john doe")),
                (2, Value::from(1000i64)),
                (3, Value::from(100.2f64)),
                (4, Value::from(true)),
            ],
        ),
        // Action with action data.
        (
            1_000_000,
            1,
            vec![
                (-1, Value::from("super")),
                (-2, Value::from(21i64)),
                (-3, Value::from(2.5f64)),
                (-4, Value::from(true)),
            ],
        ),
        // Action only.
        (2_000_000, 2, vec![]),
        // Object data only, replacing the first values.
        (
            3_000_000,
            0,
            vec![
                (1, Value::from("frank sinatra")),
                (2, Value::from(20i64)),
                (3, Value::from(1.5f64)),
                (4, Value::from(false)),
            ],
        ),
    ])
}

#[test]
fn test_cursor_set_data() {
    let mut cursor = SessionCursor::new(full_descriptor(), None);
    cursor.bind(set_data_path());
    assert_state(
        cursor.record(),
        Expected {
            ts: 0,
            action_id: 0,
            object_string: "",
            object_int: 0,
            object_double: 0.0,
            object_boolean: false,
            action_string: "",
            action_int: 0,
            action_double: 0.0,
            action_boolean: false,
        },
    );
    assert!(cursor.next_session());

    // Event 1
    assert!(cursor.next_event());
    assert_state(
        cursor.record(),
        Expected {
            ts: 0,
            action_id: 0,
            object_string: "john doe",
            object_int: 1000,
            object_double: 100.2,
            object_boolean: true,
            action_string: "",
            action_int: 0,
            action_double: 0.0,
            action_boolean: false,
        },
    );

    // Event 2
    assert!(cursor.next_event());
    assert_state(
        cursor.record(),
        Expected {
            ts: timestamp::shift(1_000_000),
            action_id: 1,
            object_string: "john doe",
            object_int: 1000,
            object_double: 100.2,
            object_boolean: true,
            action_string: "super",
            action_int: 21,
            action_double: 2.5,
            action_boolean: true,
        },
    );

    // Event 3
    assert!(cursor.next_event());
    assert_state(
        cursor.record(),
        Expected {
            ts: timestamp::shift(2_000_000),
            action_id: 2,
            object_string: "john doe",
            object_int: 1000,
            object_double: 100.2,
            object_boolean: true,
            action_string: "",
            action_int: 0,
            action_double: 0.0,
            action_boolean: false,
        },
    );

    // Event 4
    assert!(cursor.next_event());
    let last = Expected {
        ts: timestamp::shift(3_000_000),
        action_id: 0,
        object_string: "frank sinatra",
        object_int: 20,
        object_double: 1.5,
        object_boolean: false,
        action_string: "",
        action_int: 0,
        action_double: 0.0,
        action_boolean: false,
    };
    assert_state(cursor.record(), last);

    // EOF
    assert!(!cursor.next_event());
    assert!(cursor.eof());
    assert!(!cursor.in_session());

    // Repeated calls stay false and leave the record alone.
    let snapshot = cursor.record().clone();
    assert!(!cursor.next_event());
    assert!(!cursor.next_event());
    assert_eq!(cursor.record(), &snapshot);
    assert!(cursor.corruption().is_none());
}

#[test]
fn test_bind_resets_object_state() {
    let mut cursor = SessionCursor::new(full_descriptor(), None);
    cursor.bind(set_data_path());
    assert!(cursor.next_session());
    while cursor.next_event() {}
    assert_eq!(cursor.record().string(OBJECT_STRING), "frank sinatra");

    cursor.bind(path(&[(secs(5), 3, vec![(2, Value::from(7i64))])]));
    assert_eq!(cursor.record().string(OBJECT_STRING), "");
    assert_eq!(cursor.record().int(OBJECT_INT), 0);
    assert!(cursor.next_session());
    assert!(cursor.next_event());
    assert_eq!(cursor.record().int(OBJECT_INT), 7);
    assert_eq!(cursor.record().string(OBJECT_STRING), "");
    assert_eq!(cursor.record().int(ACTION_ID), 3);
}

#[test]
fn test_unknown_properties_are_skipped() {
    let mut cursor = SessionCursor::new(int_descriptor(), None);
    cursor.bind(path(&[
        (
            0,
            1,
            vec![
                (9, Value::from("future object property")),
                (-9, Value::from(3.25f64)),
                (1, Value::from(42i64)),
                (-1, Value::from(7i64)),
            ],
        ),
        (secs(1), 0, vec![(100, Value::from(true))]),
    ]));
    assert!(cursor.next_session());
    assert!(cursor.next_event());
    assert_eq!(cursor.record().int(OBJECT_INT), 42);
    assert_eq!(cursor.record().int(ACTION_INT), 7);
    assert!(cursor.next_event());
    assert_eq!(cursor.record().int(OBJECT_INT), 42);
    assert_eq!(cursor.record().int(ACTION_INT), 0);
    assert!(!cursor.next_event());
    assert!(cursor.corruption().is_none());
}

#[test]
fn test_truncated_path_is_corrupt() {
    let data = set_data_path();
    let truncated = data.slice(..data.len() - 2);

    let mut cursor = SessionCursor::new(full_descriptor(), None);
    cursor.bind(truncated);
    assert!(cursor.next_session());
    let mut events = 0;
    while cursor.next_event() {
        events += 1;
    }
    assert_eq!(events, 3);
    assert!(cursor.eof());
    let corrupt = cursor.corruption().expect("path should be corrupt");
    assert!(corrupt.offset > 0);
    assert!(!cursor.next_session());
}
