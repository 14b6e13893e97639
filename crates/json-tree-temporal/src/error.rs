use thiserror::Error;

/// Errors produced while building temporal values from text.
///
/// The recognizer itself never surfaces these: a string that cannot be
/// turned into a timestamp is simply "not a date". They are returned by the
/// explicit constructors (`FixedTzOffset::parse`, `str::parse::<Timestamp>`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    #[error("invalid UTC offset {0:?}: expected ±HH:MM or ±HHMM")]
    InvalidOffset(String),

    #[error("UTC offset {0:?} must be strictly within ±24 hours")]
    OffsetOutOfRange(String),

    #[error("not an ISO date-time: {0:?}")]
    NotADateTime(String),
}
