use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sky_cursor::{CursorConfig, DataDescriptor, PathIterator, PathStore, SessionCursor};
use sky_pathcodec::timestamp;

/// Totals of a scan over every path of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub paths: u64,
    pub sessions: u64,
    pub events: u64,
    pub corrupt_paths: u64,
    pub objects: Vec<ObjectSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub id: String,
    pub sessions: u64,
    pub events: u64,
    /// Time of the last event read, if any.
    pub last_event: Option<DateTime<Utc>>,
}

/// Scans every path of `store`, counting sessions and events per object.
///
/// A corrupt path is counted and the scan moves on to the next one; the
/// events read before the corruption still count.
pub fn scan<S: PathStore + ?Sized>(
    store: &S,
    descriptor: Arc<DataDescriptor>,
    config: &CursorConfig,
) -> ScanReport {
    let ts_slot = descriptor.ts_slot();
    let cursor = SessionCursor::from_config(descriptor, config);
    let mut paths = PathIterator::new(store, cursor);
    let mut report = ScanReport::default();

    while let Some(id) = paths.next_path() {
        let mut summary = ObjectSummary {
            id: id.to_string(),
            sessions: 0,
            events: 0,
            last_event: None,
        };
        let cursor = paths.cursor_mut();
        while cursor.next_session() {
            summary.sessions += 1;
            while cursor.next_event() {
                summary.events += 1;
                if let Some(slot) = ts_slot {
                    summary.last_event = timestamp::to_datetime(cursor.record().int(slot));
                }
            }
        }
        if let Some(corrupt) = cursor.corruption() {
            log::warn!("object {}: {}", summary.id, corrupt);
            report.corrupt_paths += 1;
        }

        report.paths += 1;
        report.sessions += summary.sessions;
        report.events += summary.events;
        report.objects.push(summary);
    }
    log::info!(
        "scanned {} paths: {} sessions, {} events",
        report.paths,
        report.sessions,
        report.events
    );
    report
}
