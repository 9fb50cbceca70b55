use bytes::Bytes;
use sky_pathcodec::timestamp::{self, MICROS_PER_SECOND, SECONDS_BIT_OFFSET};
use sky_pathcodec::{ActionId, PathReader, PropertyId, Value};

use crate::descriptor::{DataDescriptor, FieldBinding};
use crate::error::{CorruptPath, CorruptReason};
use crate::record::EventRecord;

/// Largest magnitude of whole seconds that survives the timestamp shift.
const MAX_SECONDS: i64 = i64::MAX >> SECONDS_BIT_OFFSET;

/// The built-in fields of an event frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventHeader {
    /// The shifted timestamp.
    pub ts: i64,
    /// Whole seconds of the event time.
    pub seconds: i64,
    /// The action id, or 0 if the event carries no action.
    pub action_id: ActionId,
}

/// The outcome of decoding one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Event(EventHeader),
    End,
    Corrupt(CorruptPath),
}

/// Controls which parts of a frame are written to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Reset action slots, apply every bound property and the built-ins.
    Full,
    /// Like `Full`, but action properties are discarded. Used when events
    /// are skipped: object state and built-ins stay current, action slots
    /// hold their zero values.
    ObjectOnly,
}

/// Decodes the event frames of a single path.
#[derive(Debug, Clone)]
pub struct PathDecoder {
    path: Bytes,
    pos: usize,
    last_ts: Option<i64>,
    // Validation target, reused across frames.
    scratch: Value,
}

impl PathDecoder {
    pub fn new(path: Bytes) -> Self {
        Self {
            path,
            pos: 0,
            last_ts: None,
            scratch: Value::None,
        }
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.path.len()
    }

    /// The shifted timestamp of the last decoded frame.
    pub fn last_ts(&self) -> Option<i64> {
        self.last_ts
    }

    /// Reads the header of the next frame without consuming it.
    pub fn peek(&self) -> Decoded {
        if self.is_exhausted() {
            return Decoded::End;
        }
        let mut r = PathReader::at(&self.path, self.pos);
        match self.read_header(&mut r) {
            Ok(header) => Decoded::Event(header),
            Err(reason) => Decoded::Corrupt(self.corrupt(reason)),
        }
    }

    /// Decodes the next frame into `record` and advances past it.
    ///
    /// The whole frame is validated before the record is written, so on
    /// corruption the decoder does not advance and `record` is untouched.
    pub fn decode_next(
        &mut self,
        descriptor: &DataDescriptor,
        record: &mut EventRecord,
        mode: DecodeMode,
    ) -> Decoded {
        if self.is_exhausted() {
            return Decoded::End;
        }

        let mut r = PathReader::at(&self.path, self.pos);
        let header = match self.read_header(&mut r) {
            Ok(header) => header,
            Err(reason) => return Decoded::Corrupt(self.corrupt(reason)),
        };
        let body = r.position();

        let scratch = &mut self.scratch;
        let validated = read_properties(&mut r, &header, descriptor, mode, false, |r, binding| {
            r.value_into(binding.data_type, scratch)
        });
        if let Err(reason) = validated {
            return Decoded::Corrupt(self.corrupt(reason));
        }
        let end = r.position();

        for binding in descriptor.action_bindings() {
            if let Some(v) = record.slot_mut(binding.slot) {
                v.reset(binding.data_type);
            }
        }

        let mut r = PathReader::at(&self.path, body);
        let written = read_properties(&mut r, &header, descriptor, mode, true, |r, binding| {
            match record.slot_mut(binding.slot) {
                Some(v) => r.value_into(binding.data_type, v),
                None => r.skip_value(),
            }
        });
        if let Err(reason) = written {
            return Decoded::Corrupt(self.corrupt(reason));
        }

        if let Some(slot) = descriptor.ts_slot() {
            record.set(slot, Value::Int(header.ts));
        }
        if let Some(slot) = descriptor.timestamp_slot() {
            record.set(slot, Value::Int(header.seconds));
        }
        if let Some(slot) = descriptor.action_slot() {
            record.set(slot, Value::Int(header.action_id as i64));
        }

        self.pos = end;
        self.last_ts = Some(header.ts);
        Decoded::Event(header)
    }

    fn read_header(&self, r: &mut PathReader<'_>) -> Result<EventHeader, CorruptReason> {
        let seconds = r.int();
        let micros = r.uint();
        let action_id = r.uint();
        if let Some(err) = r.error() {
            return Err(err.into());
        }

        if !(-MAX_SECONDS..=MAX_SECONDS).contains(&seconds) {
            return Err(CorruptReason::SecondsOutOfRange(seconds));
        }
        if micros >= MICROS_PER_SECOND as u64 {
            return Err(CorruptReason::MicrosOutOfRange(micros));
        }
        let action_id =
            ActionId::try_from(action_id).map_err(|_| CorruptReason::ActionIdOutOfRange(action_id))?;

        let ts = timestamp::merge(seconds, micros as u32);
        if let Some(previous) = self.last_ts {
            if ts < previous {
                return Err(CorruptReason::NonMonotonicTime {
                    previous,
                    current: ts,
                });
            }
        }

        Ok(EventHeader {
            ts,
            seconds,
            action_id,
        })
    }

    fn corrupt(&self, reason: CorruptReason) -> CorruptPath {
        CorruptPath {
            offset: self.pos,
            reason,
        }
    }
}

/// Walks the property map of a frame. Values that belong in the record are
/// handed to `write`, everything else is skipped.
fn read_properties<F>(
    r: &mut PathReader<'_>,
    header: &EventHeader,
    descriptor: &DataDescriptor,
    mode: DecodeMode,
    trace: bool,
    mut write: F,
) -> Result<(), CorruptReason>
where
    F: FnMut(&mut PathReader<'_>, FieldBinding),
{
    let count = r.map_header();
    for _ in 0..count {
        let key = r.int();
        if r.has_error() {
            break;
        }
        let id =
            PropertyId::try_from(key).map_err(|_| CorruptReason::PropertyIdOutOfRange(key))?;

        let Some(binding) = descriptor.lookup(id) else {
            if trace {
                log::trace!("discarding unknown property {}", id);
            }
            r.skip_value();
            continue;
        };

        if id < 0 {
            if header.action_id == 0 {
                if trace {
                    log::trace!("ignoring action property {} on event without action", id);
                }
                r.skip_value();
                continue;
            }
            if mode == DecodeMode::ObjectOnly {
                r.skip_value();
                continue;
            }
        }

        write(r, binding);
    }

    match r.error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
