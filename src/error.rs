//! Error types for togglop

use std::time::Duration;
use thiserror::Error;

use crate::client::models::TimeEntry;

/// Result type alias for togglop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the library and CLI
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    TimeEntry(#[from] TimeEntryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Run `togglop init` to set up your API token.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether a retry of the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimit(_) | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `togglop init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("API token not configured. Run `togglop init` or set TOGGL_API_TOKEN.")]
    MissingApiToken,

    #[error("Workspace not configured. Pass --workspace or set workspace_id in the config file.")]
    MissingWorkspace,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Time entry state and lifecycle errors
#[derive(Debug, Error)]
pub enum TimeEntryError {
    /// The operation is not valid for the entry's current running/stopped state.
    #[error("Invalid time entry state: {0}")]
    InvalidState(String),

    /// An unstop created its replacement entry but could not delete the original.
    ///
    /// The replacement exists remotely; retrying the whole unstop would create
    /// a duplicate. Only the delete of the original should be retried.
    #[error("Old entry {old_id} not deleted (replacement {} was created): {source}", .created.id)]
    OldEntryNotDeleted {
        old_id: i64,
        created: Box<TimeEntry>,
        #[source]
        source: Box<Error>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized_message() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("togglop init"));
    }

    #[test]
    fn test_api_error_not_found() {
        let err = ApiError::NotFound("project 42".to_string());
        assert!(err.to_string().contains("project 42"));
    }

    #[test]
    fn test_api_error_rate_limit() {
        let err = ApiError::RateLimit(Duration::from_secs(30));
        let msg = err.to_string();
        assert!(msg.contains("Rate limit"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_api_error_transient_classification() {
        assert!(ApiError::RateLimit(Duration::from_secs(1)).is_transient());
        assert!(ApiError::ServerError("boom".to_string()).is_transient());
        assert!(ApiError::Network("reset".to_string()).is_transient());
        assert!(!ApiError::Unauthorized.is_transient());
        assert!(!ApiError::BadRequest("bad".to_string()).is_transient());
        assert!(!ApiError::NotFound("x".to_string()).is_transient());
    }

    #[test]
    fn test_config_error_missing_token() {
        let err = ConfigError::MissingApiToken;
        assert!(err.to_string().contains("TOGGL_API_TOKEN"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }

    #[test]
    fn test_old_entry_not_deleted_mentions_both_entries() {
        let created = TimeEntry {
            id: 77,
            ..TimeEntry::default()
        };
        let err = TimeEntryError::OldEntryNotDeleted {
            old_id: 12,
            created: Box::new(created),
            source: Box::new(ApiError::ServerError("down".to_string()).into()),
        };

        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("77"));
        assert!(msg.contains("down"));
    }

    #[test]
    fn test_error_from_time_entry_error() {
        let err: Error = TimeEntryError::InvalidState("running".to_string()).into();

        match err {
            Error::TimeEntry(TimeEntryError::InvalidState(_)) => (),
            _ => panic!("Expected Error::TimeEntry(TimeEntryError::InvalidState)"),
        }
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::Unauthorized.into();

        match err {
            Error::Api(ApiError::Unauthorized) => (),
            _ => panic!("Expected Error::Api(ApiError::Unauthorized)"),
        }
    }
}
