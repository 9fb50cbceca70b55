use std::sync::Arc;

use bytes::Bytes;

use crate::config::CursorConfig;
use crate::decoder::{DecodeMode, Decoded, PathDecoder};
use crate::descriptor::DataDescriptor;
use crate::error::CorruptPath;
use crate::record::EventRecord;

/// The lifecycle of a [`SessionCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No path has been bound yet.
    Unbound,
    /// A path is bound but no session has been started.
    PreSession,
    /// Events of the current session can be read.
    InSession,
    /// The next event belongs to a new session.
    SessionExhausted,
    /// The path has been fully read, or is corrupt.
    Eof,
}

/// Iterates over the events of a path, split into sessions by idle gaps.
///
/// A cursor is created once per scan and bound to each path in turn. After
/// binding, [`next_session`](Self::next_session) must be called before
/// [`next_event`](Self::next_event) yields anything.
///
/// Without an idle threshold, or with a threshold of 0, the whole path is a
/// single session. With a threshold of `t` seconds, two consecutive events
/// belong to the same session if they are at most `t` seconds apart.
#[derive(Debug)]
pub struct SessionCursor {
    descriptor: Arc<DataDescriptor>,
    record: EventRecord,
    decoder: Option<PathDecoder>,
    state: CursorState,
    session_idle: Option<u32>,
    session_event_index: i64,
    last_seconds: Option<i64>,
    corruption: Option<CorruptPath>,
}

impl SessionCursor {
    pub fn new(descriptor: Arc<DataDescriptor>, session_idle: Option<u32>) -> Self {
        let record = descriptor.new_record();
        Self {
            descriptor,
            record,
            decoder: None,
            state: CursorState::Unbound,
            session_idle: idle_threshold(session_idle),
            session_event_index: -1,
            last_seconds: None,
            corruption: None,
        }
    }

    pub fn from_config(descriptor: Arc<DataDescriptor>, config: &CursorConfig) -> Self {
        Self::new(descriptor, config.session_idle_secs)
    }

    /// Sets the idle threshold in seconds. `None` and `Some(0)` disable
    /// sessions.
    pub fn set_session_idle(&mut self, session_idle: Option<u32>) {
        self.session_idle = idle_threshold(session_idle);
    }

    pub fn session_idle(&self) -> Option<u32> {
        self.session_idle
    }

    /// Binds a new path and resets the session and record state.
    pub fn bind(&mut self, path: Bytes) {
        log::debug!("binding path of {} bytes", path.len());
        self.decoder = Some(PathDecoder::new(path));
        self.state = CursorState::PreSession;
        self.session_event_index = -1;
        self.last_seconds = None;
        self.corruption = None;
        self.descriptor.reset_record(&mut self.record);
    }

    /// Starts the next session.
    ///
    /// Any unread events of the current session are skipped. Their object
    /// properties are still applied so the record stays current, their
    /// action properties are discarded.
    ///
    /// Returns false when the path has no more events.
    pub fn next_session(&mut self) -> bool {
        match self.state {
            CursorState::Unbound | CursorState::Eof => false,
            CursorState::PreSession | CursorState::SessionExhausted => self.begin_session(),
            CursorState::InSession => {
                if self.skip_session() {
                    self.begin_session()
                } else {
                    false
                }
            }
        }
    }

    /// Reads the next event of the current session into the record.
    ///
    /// Returns false at the end of the path, at a session boundary, and
    /// whenever no session is active. A boundary event is left unread so the
    /// following session starts with it.
    pub fn next_event(&mut self) -> bool {
        if self.state != CursorState::InSession {
            return false;
        }
        match self.peek_in_session() {
            Some(true) => {}
            Some(false) => {
                log::debug!(
                    "session boundary after {} events",
                    self.session_event_index + 1
                );
                self.state = CursorState::SessionExhausted;
                return false;
            }
            None => return false,
        }
        self.advance(DecodeMode::Full)
    }

    /// The decoded state of the most recently read event.
    ///
    /// After [`next_session`](Self::next_session) skips events, the record
    /// reflects the last skipped event with its action data dropped. A
    /// corrupt frame is never applied.
    pub fn record(&self) -> &EventRecord {
        &self.record
    }

    pub fn descriptor(&self) -> &Arc<DataDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn eof(&self) -> bool {
        self.state == CursorState::Eof
    }

    pub fn in_session(&self) -> bool {
        self.state == CursorState::InSession
    }

    /// Index of the last event read in the current session, or -1 if the
    /// session has not yielded an event yet.
    pub fn session_event_index(&self) -> i64 {
        self.session_event_index
    }

    /// The reason the bound path stopped decoding, if it is corrupt.
    pub fn corruption(&self) -> Option<&CorruptPath> {
        self.corruption.as_ref()
    }

    fn begin_session(&mut self) -> bool {
        let Some(decoder) = self.decoder.as_ref() else {
            return false;
        };
        match decoder.peek() {
            Decoded::Event(header) => {
                self.last_seconds = Some(header.seconds);
                self.session_event_index = -1;
                self.state = CursorState::InSession;
                true
            }
            Decoded::End => {
                self.finish();
                false
            }
            Decoded::Corrupt(corrupt) => {
                self.fail(corrupt);
                false
            }
        }
    }

    /// Consumes the rest of the current session. Returns true if another
    /// session follows.
    fn skip_session(&mut self) -> bool {
        loop {
            match self.peek_in_session() {
                Some(true) => {
                    if !self.advance(DecodeMode::ObjectOnly) {
                        return false;
                    }
                }
                Some(false) => return true,
                None => return false,
            }
        }
    }

    /// Checks whether the next event belongs to the current session.
    /// Returns `None` and moves to `Eof` if there is no next event.
    fn peek_in_session(&mut self) -> Option<bool> {
        let decoder = self.decoder.as_ref()?;
        match decoder.peek() {
            Decoded::Event(header) => Some(
                self.session_event_index < 0 || self.within_idle(header.seconds),
            ),
            Decoded::End => {
                self.finish();
                None
            }
            Decoded::Corrupt(corrupt) => {
                self.fail(corrupt);
                None
            }
        }
    }

    fn within_idle(&self, seconds: i64) -> bool {
        match (self.session_idle, self.last_seconds) {
            (Some(idle), Some(last)) => seconds - last <= idle as i64,
            _ => true,
        }
    }

    fn advance(&mut self, mode: DecodeMode) -> bool {
        let Some(decoder) = self.decoder.as_mut() else {
            return false;
        };
        match decoder.decode_next(&self.descriptor, &mut self.record, mode) {
            Decoded::Event(header) => {
                self.session_event_index += 1;
                self.last_seconds = Some(header.seconds);
                true
            }
            Decoded::End => {
                self.finish();
                false
            }
            Decoded::Corrupt(corrupt) => {
                self.fail(corrupt);
                false
            }
        }
    }

    fn finish(&mut self) {
        self.state = CursorState::Eof;
    }

    fn fail(&mut self, corrupt: CorruptPath) {
        log::warn!("aborting path: {}", corrupt);
        self.corruption = Some(corrupt);
        self.state = CursorState::Eof;
    }
}

/// A threshold of 0 means no sessions, the same as none at all.
fn idle_threshold(session_idle: Option<u32>) -> Option<u32> {
    session_idle.filter(|&secs| secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_pathcodec::{DataType, PathBuffer, Value};

    fn cursor(idle: Option<u32>) -> SessionCursor {
        let mut d = DataDescriptor::from_table([(1, 1, DataType::Int)]).unwrap();
        d.set_action(0);
        SessionCursor::new(Arc::new(d), idle)
    }

    fn path(times: &[i64]) -> Bytes {
        let mut buf = PathBuffer::new();
        for (i, t) in times.iter().enumerate() {
            buf.event(*t, 0, 1, &[(1, Value::from(i as i64))]);
        }
        buf.freeze()
    }

    #[test]
    fn test_unbound_cursor() {
        let mut c = cursor(None);
        assert_eq!(c.state(), CursorState::Unbound);
        assert!(!c.next_event());
        assert!(!c.next_session());
        assert!(!c.eof());
        assert!(!c.in_session());
    }

    #[test]
    fn test_requires_next_session() {
        let mut c = cursor(None);
        c.bind(path(&[1, 2]));
        assert!(!c.next_event());
        assert_eq!(c.session_event_index(), -1);
        assert!(c.next_session());
        assert!(c.next_event());
        assert_eq!(c.session_event_index(), 0);
    }

    #[test]
    fn test_empty_path() {
        let mut c = cursor(Some(10));
        c.bind(Bytes::new());
        assert!(!c.next_session());
        assert!(c.eof());
        assert!(!c.in_session());
    }

    #[test]
    fn test_sessionless_single_session() {
        let mut c = cursor(None);
        c.bind(path(&[0, 1000, 100_000]));
        assert!(c.next_session());
        let mut n = 0;
        while c.next_event() {
            n += 1;
        }
        assert_eq!(n, 3);
        assert!(c.eof());
        assert!(!c.next_session());
    }

    #[test]
    fn test_gap_equal_to_idle_stays_in_session() {
        let mut c = cursor(Some(10));
        c.bind(path(&[0, 10, 21]));
        assert!(c.next_session());
        assert!(c.next_event());
        assert!(c.next_event());
        assert_eq!(c.session_event_index(), 1);
        assert!(!c.next_event());
        assert_eq!(c.state(), CursorState::SessionExhausted);
    }

    fn count(c: &mut SessionCursor, times: &[i64]) -> (usize, usize) {
        c.bind(path(times));
        let (mut sessions, mut events) = (0, 0);
        while c.next_session() {
            sessions += 1;
            while c.next_event() {
                events += 1;
            }
        }
        (sessions, events)
    }

    #[test]
    fn test_zero_idle_is_sessionless() {
        let mut zero = cursor(Some(0));
        assert_eq!(zero.session_idle(), None);
        let mut unset = cursor(None);
        let times = [5, 5, 6, 100_000];
        assert_eq!(count(&mut zero, &times), (1, 4));
        assert_eq!(count(&mut zero, &times), count(&mut unset, &times));

        let mut c = cursor(Some(30));
        c.set_session_idle(Some(0));
        assert_eq!(c.session_idle(), None);
        assert_eq!(count(&mut c, &times), (1, 4));
    }

    #[test]
    fn test_skipped_events_update_builtins() {
        let mut c = cursor(Some(5));
        c.bind(path(&[0, 1, 2, 30]));
        assert!(c.next_session());
        assert!(c.next_session());
        // Slot 0 holds the action id of the last skipped event.
        assert_eq!(c.record().int(0), 1);
        assert_eq!(c.record().int(1), 2);
    }

    #[test]
    fn test_next_session_skips_unread_events() {
        let mut c = cursor(Some(5));
        c.bind(path(&[0, 1, 2, 30, 31]));
        assert!(c.next_session());
        assert!(c.next_event());
        assert!(c.next_session());
        assert_eq!(c.session_event_index(), -1);
        // Object state was carried through the skipped events.
        assert_eq!(c.record().int(1), 2);
        assert!(c.next_event());
        assert_eq!(c.record().int(1), 3);
        assert_eq!(c.session_event_index(), 0);
    }

    #[test]
    fn test_next_session_twice_skips_whole_session() {
        let mut c = cursor(Some(5));
        c.bind(path(&[0, 1, 30, 100]));
        assert!(c.next_session());
        assert!(c.next_session());
        assert!(c.next_event());
        assert_eq!(c.record().int(1), 2);
    }

    #[test]
    fn test_corrupt_path_stops_cursor() {
        let mut buf = PathBuffer::new();
        buf.event(10, 0, 0, &[]);
        buf.event(5, 0, 0, &[]);
        let mut c = cursor(None);
        c.bind(buf.freeze());
        assert!(c.next_session());
        assert!(c.next_event());
        assert!(!c.next_event());
        assert!(c.eof());
        assert!(c.corruption().is_some());

        // Rebinding clears the corruption.
        c.bind(path(&[1]));
        assert!(c.corruption().is_none());
        assert!(c.next_session());
        assert!(c.next_event());
    }
}
