use thiserror::Error;

#[derive(Error, Debug)]
pub enum AfpError {
    #[error("{kind} is full: capacity of {capacity} entries reached")]
    MaxSizeExceeded { kind: &'static str, capacity: usize },
    #[error("Internal consistency error: a freshly opened {kind} rejected its first entry")]
    OverflowRetryFailed { kind: &'static str },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Unsupported rotation {0}; expected 0, 90, 180 or 270")]
    InvalidRotation(i32),
    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Value {value} for '{field}' does not fit its field (max {max})")]
    ValueOutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("Prerequisite not met: {0}")]
    PrerequisiteNotMet(&'static str),
    #[error("Malformed data stream: {0}")]
    Malformed(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
