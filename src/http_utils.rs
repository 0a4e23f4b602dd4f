use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::{ApiError, HttpOperationError};

/// The backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client for the Shaya REST API.
///
/// Every request goes through one cookie jar, so the session cookie set by
/// `POST /auth/login` is sent with all later calls.
#[derive(Debug, Clone)]
pub struct ShayaClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl ShayaClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Transport(format!("invalid base URL '{}': {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder().cookie_provider(jar.clone()).build()?;
        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    /// The backend root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}/api/v1/{}", base, path)
    }

    /// The cookies the jar would send to the backend, as a `Cookie` header value.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Loads cookies previously returned by [`Self::session_cookie`].
    pub fn restore_session_cookie(&self, cookie: &str) {
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    /// Makes a GET request with query parameters and handles the response
    pub async fn get<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let request = self.client.get(&url).query(query);
        let response = self.send("GET", &url, request).await?;
        Self::handle_response(response, operation).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B, operation: &str) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let request = self.client.post(&url).json(body);
        let response = self.send("POST", &url, request).await?;
        Self::handle_response(response, operation).await
    }

    /// Makes a POST request without body and handles the response
    pub async fn post_empty<T>(&self, path: &str, operation: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let request = self.client.post(&url);
        let response = self.send("POST", &url, request).await?;
        Self::handle_response(response, operation).await
    }

    /// Makes a PUT request with JSON body and handles the response
    pub async fn put<B, T>(&self, path: &str, body: &B, operation: &str) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let request = self.client.put(&url).json(body);
        let response = self.send("PUT", &url, request).await?;
        Self::handle_response(response, operation).await
    }

    /// Makes a DELETE request; any response body is ignored
    pub async fn delete(&self, path: &str, operation: &str) -> Result<(), ApiError> {
        let url = self.api_url(path);
        let request = self.client.delete(&url);
        let response = self.send("DELETE", &url, request).await?;
        Self::check_status(response, operation).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        tracing::debug!(method, url, "sending request");
        match request.send().await {
            Ok(response) => {
                tracing::debug!(method, url, status = response.status().as_u16(), "received response");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(method, url, error = %e, "request failed");
                Err(e.into())
            }
        }
    }

    async fn check_status(response: Response, operation: &str) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let error = HttpOperationError::from_body(operation, status, &body);
        tracing::warn!(status, message = error.message(), "{}", operation);
        Err(ApiError::Http(error))
    }

    /// Handles HTTP response, deserializing success or returning error
    async fn handle_response<T>(response: Response, operation: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = Self::check_status(response, operation).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
