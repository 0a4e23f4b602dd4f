//! # Command Error Handling
//!
//! Converts library errors into user-facing messages for shayactl using the
//! handled crate.

use handled::Handle;

use crate::errors::{ApiError, HttpOperationError, ValidationError};
use crate::form::FormError;
use crate::page::PageError;
use crate::RecordError;

/// Hint shown whenever the session is missing or expired.
pub const LOGIN_HINT: &str = "Run `shayactl login <username> <password>` first";

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

fn status_hint(status: Option<u16>) -> Option<String> {
    match status {
        Some(401) => Some(LOGIN_HINT.to_string()),
        Some(403) => Some("This operation requires an administrator session".to_string()),
        Some(404) => Some("The record was not found. Check the ID and try again.".to_string()),
        Some(400) | Some(422) => {
            Some("Invalid request. Check your input data and try again.".to_string())
        }
        Some(500..=599) => {
            Some("Server error. The backend may be temporarily unavailable.".to_string())
        }
        _ => None,
    }
}

impl Handle<UserError> for HttpOperationError {
    fn handle(&self) -> Option<UserError> {
        let message = match self.status {
            Some(status) => format!("{} (HTTP {})", self.message(), status),
            None => self.message().to_string(),
        };
        Some(UserError {
            message,
            usage_hint: status_hint(self.status),
        })
    }
}

impl Handle<UserError> for ApiError {
    fn handle(&self) -> Option<UserError> {
        match self {
            Self::Http(e) => e.handle(),
            Self::Transport(_) => Some(UserError {
                message: self.to_string(),
                usage_hint: Some(
                    "Check that the backend is running and --base-url is correct".to_string(),
                ),
            }),
            Self::Record(e) => e.handle(),
            Self::Decode(_) | Self::MissingId => Some(UserError {
                message: self.to_string(),
                usage_hint: None,
            }),
        }
    }
}

impl Handle<UserError> for ValidationError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: None,
        })
    }
}

impl Handle<UserError> for RecordError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some(
                "Run `shayactl <resource> fields` to list the editable fields".to_string(),
            ),
        })
    }
}

impl Handle<UserError> for FormError {
    fn handle(&self) -> Option<UserError> {
        match self {
            Self::Validation(e) => e.handle(),
            Self::Record(e) => e.handle(),
        }
    }
}

impl Handle<UserError> for PageError {
    fn handle(&self) -> Option<UserError> {
        match self {
            Self::Api(e) => e.handle(),
            Self::Forbidden(_) => Some(UserError {
                message: self.to_string(),
                usage_hint: status_hint(Some(403)),
            }),
            Self::NotFound(_) => Some(UserError {
                message: self.to_string(),
                usage_hint: Some("Run `shayactl <resource> list` to see the IDs".to_string()),
            }),
            Self::NoModal => Some(UserError {
                message: self.to_string(),
                usage_hint: None,
            }),
        }
    }
}

impl Handle<UserError> for std::io::Error {
    fn handle(&self) -> Option<UserError> {
        let hint = match self.kind() {
            std::io::ErrorKind::PermissionDenied => {
                Some("Permission denied. Check the --session-file location.".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: format!("Session file error: {}", self),
            usage_hint: hint,
        })
    }
}

/// Formats an error the way shayactl prints it.
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        let mut output = format!("Error: {}", user_error.message);
        if let Some(hint) = user_error.usage_hint {
            output.push_str(&format!("\nHint: {}", hint));
        }
        output
    } else {
        format!("Error: {}", error)
    }
}
