//! Cookie-based authentication against `/api/v1/auth`.

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ValidationError};
use crate::http_utils::ShayaClient;
use crate::session::SessionSource;
use crate::users::ADMIN_ROLE;

/// Shortest accepted username.
pub const MIN_USERNAME_LEN: usize = 4;
/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated operator, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// `user` or `admin`.
    pub role: String,
}

impl SessionUser {
    /// True for administrators.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Login form input, checked before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validates and wraps a username and password.
    pub fn new(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError {
                field: "username".to_string(),
                value: username.to_string(),
                reason: format!("must be at least {} characters", MIN_USERNAME_LEN),
            });
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError {
                field: "password".to_string(),
                value: "*".repeat(password.chars().count()),
                reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// The trimmed username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Acknowledgement returned by login and logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthMessage {
    /// Human-readable status from the backend.
    #[serde(default)]
    pub message: String,
}

/// Talks to the auth endpoints through the shared cookie jar.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: ShayaClient,
}

impl AuthClient {
    /// Wraps a shared HTTP client.
    pub fn new(client: ShayaClient) -> Self {
        Self { client }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &ShayaClient {
        &self.client
    }

    /// Posts the credentials; on success the backend sets the session cookie.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthMessage, ApiError> {
        let message = self
            .client
            .post("auth/login", credentials, "Failed to log in")
            .await?;
        tracing::info!(username = credentials.username(), "logged in");
        Ok(message)
    }

    /// Returns the operator owning the current session.
    pub async fn me(&self) -> Result<SessionUser, ApiError> {
        self.client
            .get("auth/me", &[], "Failed to load current user")
            .await
    }

    /// Ends the session.
    pub async fn logout(&self) -> Result<AuthMessage, ApiError> {
        let message = self
            .client
            .post_empty("auth/logout", "Failed to log out")
            .await?;
        tracing::info!("logged out");
        Ok(message)
    }
}

impl SessionSource for AuthClient {
    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        self.me().await
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        AuthClient::login(self, credentials).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        AuthClient::logout(self).await.map(|_| ())
    }
}
