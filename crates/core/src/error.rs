//! Error types for datetool-core.

/// Result type for time operations.
pub type TimeResult<T> = Result<T, TimeError>;

/// Errors raised while building time snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Offset does not fit in a fixed UTC offset.
    #[error("UTC offset out of range: {0} hours (expected -23..=23)")]
    InvalidOffset(i32),

    /// Shifted instant falls outside the representable range.
    #[error("Shifted time is out of range")]
    OutOfRange,
}
