use thiserror::Error;

/// Rejections raised by the label store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabelError {
    #[error("invalid interval [{start}, {end}) for a signal of {duration}s")]
    InvalidInterval { start: f64, end: f64, duration: f64 },
    #[error("label id '{0}' already exists")]
    DuplicateId(String),
    #[error("label '{0}' not found")]
    NotFound(String),
}

/// Raised when the time axis is configured with an unusable extent.
///
/// These indicate a malformed signal or surface, never a recoverable
/// runtime condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    #[error("duration must be positive, got {0}")]
    NonPositiveDuration(f64),
    #[error("axis width must be positive, got {0}")]
    NonPositiveWidth(f64),
    #[error("non-finite coordinate {0}")]
    NonFinite(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("signal '{0}' has no samples")]
    Empty(String),
    #[error("signal '{id}' sample {index} is out of order (time {time})")]
    UnorderedSamples { id: String, index: usize, time: f64 },
    #[error("signal '{id}' has invalid sample rate {rate}")]
    InvalidSampleRate { id: String, rate: f64 },
    #[error("signal '{id}' has invalid duration {duration}")]
    InvalidDuration { id: String, duration: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("playback speed must be positive, got {0}")]
    InvalidSpeed(f64),
}

/// Anything a session operation can reject.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error(transparent)]
    Mapper(#[from] MapperError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("no label category in slot {0}")]
    UnknownCategory(usize),
}
