//! Scenario entity list error types.

/// Errors raised while reading, validating or writing an entity list.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the entity file from disk.
    #[error("failed to read entity list: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the entity file to disk.
    #[error("failed to write entity list: {0}")]
    WriteError(#[source] std::io::Error),

    /// The entity file is not valid JSON for an entity list.
    #[error("failed to parse entity list: {0}")]
    ParseError(#[source] serde_json::Error),

    /// Failed to serialize the entity list.
    #[error("failed to serialize entity list: {0}")]
    SerializeError(#[source] serde_json::Error),

    /// A uid is not a non-negative integer.
    #[error("invalid entity uid {uid:?}")]
    InvalidUid {
        /// The uid as stored.
        uid: String,
    },

    /// A position coordinate is not a finite number.
    #[error("entity {uid} has invalid {axis} position {value:?}")]
    InvalidPosition {
        /// Uid of the offending entity.
        uid: String,
        /// `"x"` or `"z"`.
        axis: &'static str,
        /// The coordinate as stored.
        value: String,
    },

    /// Two entities share a uid.
    #[error("duplicate entity uid {0}")]
    DuplicateUid(u64),

    /// Every uid above the highest one in the list is taken.
    #[error("no entity uids left above {0}")]
    UidSpaceExhausted(u64),
}
