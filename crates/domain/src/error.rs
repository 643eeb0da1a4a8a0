//! Unified error types for the domain layer
//!
//! Domain operations reject bad input with a `DomainError` instead of
//! panicking. Invariant guards (double death, clamped HP, duplicate portals)
//! never surface here; they are absorbed by idempotent checks.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller supplied an identifier or value outside the accepted range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates an invalid-input error.
    ///
    /// Use this when a caller hands over something the domain cannot
    /// interpret:
    /// - Stat codes outside the known table
    /// - Ability slots outside the cooldown range
    /// - Unknown classification tiers
    ///
    /// # Example
    /// ```ignore
    /// if slot >= MAX_SLOTS {
    ///     return Err(DomainError::invalid_input(format!("slot {} out of range", slot)));
    /// }
    /// ```
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = DomainError::invalid_input("stat code 200 out of range");
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input: stat code 200 out of range");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Entity", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Entity"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown condition effect: Flying");
        assert_eq!(err.to_string(), "Parse error: Unknown condition effect: Flying");
    }
}
