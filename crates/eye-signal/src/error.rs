//! Signal Error Types

use thiserror::Error;

/// Errors while deriving a ratio sample from eye geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// A distance was NaN or infinite
    #[error("{field} distance is not finite: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Horizontal eye width must be strictly positive
    #[error("Horizontal eye distance must be positive, got {0}")]
    DegenerateWidth(f64),

    /// Vertical eye height cannot be negative
    #[error("Vertical eye distance cannot be negative, got {0}")]
    NegativeHeight(f64),
}
