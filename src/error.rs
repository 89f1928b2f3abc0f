//! Application error taxonomy
//!
//! Every failure a request can hit ends up here and is rendered as a
//! negative-code envelope by [`AppError::to_envelope`].

use thiserror::Error;

use crate::dispatch::Envelope;

/// Errors surfaced while serving a request
#[derive(Debug, Error)]
pub enum AppError {
    /// No route for the (method, selector) pair
    #[error("404 NOT FOUND")]
    RouteNotFound,

    /// Controller type or action could not be resolved
    #[error("route error: {0}")]
    HandlerResolution(String),

    /// Establishing the database connection failed
    #[error("connect error: {0}")]
    Connection(String),

    /// A statement failed to prepare or execute
    #[error("sql error: {0}")]
    StatementExecution(String),

    /// Handler-level input check failed
    #[error("{0}")]
    Validation(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StatementExecution(err.to_string())
    }
}

impl AppError {
    /// Render as `{code: -1, msg}`
    pub fn to_envelope(&self) -> Envelope {
        Envelope::error(self.to_string())
    }
}

/// Result alias used by handlers and the data-access layer
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_prefix() {
        assert_eq!(AppError::RouteNotFound.to_string(), "404 NOT FOUND");
        assert_eq!(
            AppError::Connection("unable to open database file".to_string()).to_string(),
            "connect error: unable to open database file"
        );
        assert_eq!(
            AppError::HandlerResolution("controller `foo` is not registered".to_string())
                .to_string(),
            "route error: controller `foo` is not registered"
        );
    }

    #[test]
    fn test_sqlite_error_maps_to_statement_failure() {
        let err: AppError = rusqlite::Error::InvalidParameterName(":nope".to_string()).into();
        assert!(matches!(err, AppError::StatementExecution(_)));
        assert!(err.to_string().starts_with("sql error: "));
    }

    #[test]
    fn test_envelope_has_no_data() {
        let env = AppError::Validation("content too long".to_string()).to_envelope();
        assert_eq!(env.code, -1);
        assert_eq!(env.msg.as_deref(), Some("content too long"));
        assert!(env.data.is_none());
    }
}
