use crate::target::TargetId;
use derive_more::Display;
use thiserror::Error;

/// Raised while building a [`TargetSpec`](crate::TargetSpec).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Target has no title")]
    MissingTitle,
    #[error("Target has no bounds resolver")]
    MissingBounds,
    #[error("Invalid {name} alpha {value}, expected a value in 0.0..=1.0")]
    InvalidAlpha { name: &'static str, value: f64 },
    #[error("Negative {name} text size {value}")]
    NegativeTextSize { name: &'static str, value: f64 },
    #[error("Negative {name} {value}")]
    NegativeDimension { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Position {
    #[display("target {_0}")]
    Id(TargetId),
    #[display("index {_0}")]
    Index(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("No {0} in the remaining sequence")]
    InvalidSequencePosition(Position),
}
