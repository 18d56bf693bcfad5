//! Arbiter CLI — error types.

use arbiter_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or the tag rule file is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading stdin or the tag rule file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A domain operation failed outside a table line (e.g. ending the session).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A rejection could not be written as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON body written to stderr when a table line is rejected.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl From<&DomainError> for ErrorBody {
    fn from(err: &DomainError) -> Self {
        let error = match err {
            DomainError::NotFound(_) => "not_found",
            DomainError::Validation(_) => "validation_error",
            DomainError::LatchViolation(_) => "latch_violation",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::Infrastructure(_) => "infrastructure_error",
        };
        Self {
            error,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &DomainError) -> &'static str {
        ErrorBody::from(err).error
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        assert_eq!(code_of(&DomainError::NotFound("c1".into())), "not_found");
    }

    #[test]
    fn test_latch_violation_maps_to_latch_violation() {
        assert_eq!(
            code_of(&DomainError::LatchViolation("busy".into())),
            "latch_violation"
        );
    }

    #[test]
    fn test_validation_maps_to_validation_error() {
        assert_eq!(
            code_of(&DomainError::Validation("bad roll".into())),
            "validation_error"
        );
    }

    #[test]
    fn test_unauthorized_maps_to_unauthorized() {
        assert_eq!(
            code_of(&DomainError::Unauthorized("system".into())),
            "unauthorized"
        );
    }

    fn finish(result: Result<String, DomainError>) -> Result<String, AppError> {
        Ok(result?)
    }

    #[test]
    fn test_domain_error_propagates_as_app_error() {
        let err = finish(Err(DomainError::Unauthorized("system cannot end".into()))).unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Unauthorized(_))));
        assert_eq!(
            err.to_string(),
            DomainError::Unauthorized("system cannot end".into()).to_string()
        );
    }

    #[test]
    fn test_json_failure_converts_to_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        let err = AppError::from(json_err);

        assert!(matches!(err, AppError::Serialization(_)));
        assert!(err.to_string().starts_with("serialization error: "));
    }

    #[test]
    fn test_error_body_serializes_as_json() {
        let body = ErrorBody::from(&DomainError::Infrastructure("parser down".into()));

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "infrastructure_error");
        assert!(json["message"].as_str().unwrap().contains("parser down"));
    }
}
