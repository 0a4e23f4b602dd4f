//! Session state and the gate that protects every page.

use std::future::Future;

use crate::auth::{Credentials, SessionUser};
use crate::errors::ApiError;

/// Where unauthenticated operators are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Anything that can answer "who is logged in".
pub trait SessionSource {
    /// Fetches the operator owning the current session.
    fn current_user(&self) -> impl Future<Output = Result<SessionUser, ApiError>> + Send;

    /// Starts a session.
    fn login(&self, credentials: &Credentials)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Ends the session.
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// What the store knows about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The first check has not finished.
    Loading,
    /// A user is logged in.
    Authenticated(SessionUser),
    /// Nobody is logged in, or the session expired.
    Unauthenticated,
}

/// The decision a protected page makes from the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<'a> {
    /// Render nothing yet.
    Pending,
    /// Navigate to this route instead of rendering.
    Redirect(&'static str),
    /// Render the page for this user.
    Render(&'a SessionUser),
}

/// Holds the current session and keeps it in sync with the backend.
#[derive(Debug)]
pub struct SessionStore<S> {
    source: S,
    state: SessionState,
    last_error: Option<ApiError>,
}

impl<S: SessionSource> SessionStore<S> {
    /// A store that has not checked the session yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: SessionState::Loading,
            last_error: None,
        }
    }

    /// The underlying session source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The current state.
    pub fn get(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in user, if any.
    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Why the last refresh found no session, if it failed.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Asks the backend who is logged in. Any failure means nobody is.
    pub async fn refresh(&mut self) -> &SessionState {
        match self.source.current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "session active");
                self.state = SessionState::Authenticated(user);
                self.last_error = None;
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!(error = %e, "no active session");
                self.state = SessionState::Unauthenticated;
                self.last_error = Some(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "session check failed");
                self.state = SessionState::Unauthenticated;
                self.last_error = Some(e);
            }
        }
        &self.state
    }

    /// Forgets the current user without contacting the backend.
    pub fn clear(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.last_error = None;
    }

    /// Logs in and then reloads the user.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&SessionState, ApiError> {
        self.source.login(credentials).await?;
        Ok(self.refresh().await)
    }

    /// Logs out and clears the user.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        let result = self.source.logout().await;
        self.clear();
        result
    }

    /// True when an administrator is logged in.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(SessionUser::is_admin)
    }

    /// Decides what a protected page shows for the current state.
    pub fn gate(&self) -> Gate<'_> {
        match &self.state {
            SessionState::Loading => Gate::Pending,
            SessionState::Unauthenticated => Gate::Redirect(LOGIN_ROUTE),
            SessionState::Authenticated(user) => Gate::Render(user),
        }
    }
}
