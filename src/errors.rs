//! Error types for console operations.

use serde_json::Value;

use crate::RecordError;

/// A non-success response from the backend.
///
/// The message is the backend's `detail` when it sent one, otherwise the
/// generic description of the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOperationError {
    /// Generic description of the failed operation, e.g. "Failed to create customer".
    pub operation: String,
    /// The HTTP status code if available.
    pub status: Option<u16>,
    /// The backend's `detail`, if the body carried one.
    pub detail: Option<String>,
}

impl HttpOperationError {
    /// Creates an error from a status code and the raw response body.
    pub fn from_body(operation: &str, status: u16, body: &str) -> Self {
        Self {
            operation: operation.to_string(),
            status: Some(status),
            detail: extract_detail(body),
        }
    }

    /// The message to show the operator.
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.operation)
    }

    /// True for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl std::fmt::Display for HttpOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for HttpOperationError {}

/// Pulls the `detail` out of a FastAPI-style error body.
///
/// `detail` is either a string or a list of validation errors with `msg`
/// entries, which are joined with "; ".
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    Http(HttpOperationError),
    /// The request never produced a response.
    Transport(String),
    /// The response body could not be decoded.
    Decode(String),
    /// An update or delete was attempted on a record without an identifier.
    MissingId,
    /// A record could not be read or written by accessor.
    Record(RecordError),
}

impl ApiError {
    /// True when the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_unauthorized())
    }

    /// The HTTP status, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status,
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "{}", e),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Decode(msg) => write!(f, "Invalid response: {}", msg),
            Self::MissingId => write!(f, "Record has no identifier"),
            Self::Record(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<HttpOperationError> for ApiError {
    fn from(e: HttpOperationError) -> Self {
        Self::Http(e)
    }
}

impl From<RecordError> for ApiError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field name that failed validation.
    pub field: String,
    /// The value that was invalid.
    pub value: String,
    /// The reason why validation failed.
    pub reason: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid {}: '{}' - {}",
            self.field, self.value, self.reason
        )
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_wins_over_operation() {
        let e = HttpOperationError::from_body(
            "Failed to create customer",
            400,
            r#"{"detail":"El documento ya existe"}"#,
        );
        assert_eq!(e.message(), "El documento ya existe");
        assert_eq!(e.to_string(), "El documento ya existe");
    }

    #[test]
    fn missing_detail_falls_back_to_operation() {
        let e = HttpOperationError::from_body("Failed to delete farmer", 500, "Internal Server Error");
        assert_eq!(e.detail, None);
        assert_eq!(e.message(), "Failed to delete farmer");

        let e = HttpOperationError::from_body("Failed to list users", 404, r#"{"detail":""}"#);
        assert_eq!(e.message(), "Failed to list users");
    }

    #[test]
    fn validation_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","username"],"msg":"too short"},{"msg":"bad email"}]}"#;
        assert_eq!(
            extract_detail(body),
            Some("too short; bad email".to_string())
        );
    }

    #[test]
    fn unauthorized_is_detected() {
        let e: ApiError = HttpOperationError::from_body("Failed to load session", 401, "{}").into();
        assert!(e.is_unauthorized());
        assert_eq!(e.status(), Some(401));
        assert!(!ApiError::MissingId.is_unauthorized());
    }
}
