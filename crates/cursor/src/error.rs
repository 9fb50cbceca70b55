use sky_pathcodec::{CodecError, PropertyId};

/// A path that cannot be decoded any further.
///
/// Corruption is fatal to the path it was found in, but never to the scan:
/// the host is expected to move on to the next path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("corrupt path at byte {offset}: {reason}")]
pub struct CorruptPath {
    /// Byte offset of the event frame that failed to decode.
    pub offset: usize,
    pub reason: CorruptReason,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorruptReason {
    #[error("malformed value: {0}")]
    Malformed(#[from] CodecError),

    #[error("event time {current} is before the previous event time {previous}")]
    NonMonotonicTime { previous: i64, current: i64 },

    #[error("event seconds out of range: {0}")]
    SecondsOutOfRange(i64),

    #[error("sub-second micros out of range: {0}")]
    MicrosOutOfRange(u64),

    #[error("action id out of range: {0}")]
    ActionIdOutOfRange(u64),

    #[error("property id out of range: {0}")]
    PropertyIdOutOfRange(i64),
}

/// Errors raised while configuring a data descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("property id 0 is reserved for built-in fields")]
    ReservedPropertyId,
}

/// Errors raised by the property table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("property already exists: {0}")]
    DuplicateName(String),

    #[error("property id already in use: {0}")]
    DuplicateId(PropertyId),

    #[error("property id 0 is reserved for built-in fields")]
    ReservedPropertyId,

    #[error("no property ids left for {0} properties")]
    IdSpaceExhausted(&'static str),

    #[error("property not found: {0}")]
    NotFound(String),
}

/// Errors raised while loading cursor configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid session idle time {value:?}: expected whole seconds")]
    InvalidSessionIdle { value: String },
}
