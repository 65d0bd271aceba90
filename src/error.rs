//! Client error taxonomy
//!
//! Validation and authentication failures carry the exact message shown
//! to the user. Network and storage failures wrap their source.

use thiserror::Error;

/// Errors surfaced by the client core
#[derive(Error, Debug)]
pub enum ClientError {
    /// Empty or malformed form field
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not signed in")]
    NotAuthenticated,

    /// Media access refused by the OS
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Player error: {0}")]
    Player(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_messages_match_ui_copy() {
        assert_eq!(ClientError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(ClientError::UserExists.to_string(), "User already exists");
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = ClientError::validation("Task title is required");
        assert_eq!(err.to_string(), "Task title is required");
    }

    #[test]
    fn status_error_names_the_url() {
        let err = ClientError::Status {
            status: 500,
            url: "http://localhost:3000/users".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("/users"));
    }
}
