//! Error types for region-engine operations.

use std::fmt;

use thiserror::Error;

/// Which kind of identifier failed to resolve when building a [`crate::Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Calendar,
    TimeZone,
    Locale,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierKind::Calendar => "calendar",
            IdentifierKind::TimeZone => "timezone",
            IdentifierKind::Locale => "locale",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid identifier: unknown {kind} '{value}'")]
    InvalidIdentifier { kind: IdentifierKind, value: String },

    #[error("Invalid field combination: {0}")]
    InvalidFieldCombination(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid delta: {0}")]
    InvalidDelta(String),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn identifier(kind: IdentifierKind, value: &str) -> Self {
        EngineError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_message() {
        let err = EngineError::identifier(IdentifierKind::TimeZone, "Mars/Olympus");
        assert_eq!(
            err.to_string(),
            "Invalid identifier: unknown timezone 'Mars/Olympus'"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<EngineError>();
    }
}
