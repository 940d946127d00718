//! Error categorization.
//!
//! Maps errors surfaced through `anyhow` chains onto `ErrorType` for statistics.

use anyhow::Error;

use super::types::{DamageError, ErrorType};

/// Extracts the error type from an error chain.
///
/// The first engine error found in the chain decides; I/O and JSON failures while
/// loading the cache count as cache read errors.
pub fn categorize_error(error: &Error) -> ErrorType {
    for cause in error.chain() {
        if let Some(damage_err) = cause.downcast_ref::<DamageError>() {
            return damage_err.error_type();
        }
        if cause.downcast_ref::<std::io::Error>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
        {
            return ErrorType::CacheReadError;
        }
    }
    ErrorType::ComputationFailed
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_damage_error_through_context() {
        let err: Result<(), DamageError> =
            Err(DamageError::InvalidBackgroundColor("xyz".to_string()));
        let err = err.context("Failed to read background hint").unwrap_err();
        assert_eq!(categorize_error(&err), ErrorType::InvalidBackgroundColor);
    }

    #[test]
    fn test_categorize_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::new(io).context("Failed to open generic log");
        assert_eq!(categorize_error(&err), ErrorType::CacheReadError);
    }

    #[test]
    fn test_categorize_other_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ErrorType::ComputationFailed);
    }
}
