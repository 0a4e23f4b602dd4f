//! # Shared Command Utilities
//!
//! Argument validation, error exits and session handling used by every
//! shayactl command.

use std::future::Future;

use handled::Handle;

use crate::auth::{AuthClient, SessionUser};
use crate::cli_utils;
use crate::commands::errors::{LOGIN_HINT, UserError, format_cli_error};
use crate::config::{self, ConsoleConfig};
use crate::errors::ApiError;
use crate::http_utils::ShayaClient;
use crate::session::{Gate, SessionStore};

/// Everything a command handler needs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// HTTP client carrying the session cookie.
    pub client: ShayaClient,
    /// Resolved command-line options.
    pub config: ConsoleConfig,
}

impl CommandContext {
    /// Builds the HTTP client and restores any stored session cookie.
    pub fn new(config: ConsoleConfig) -> Self {
        let client = ShayaClient::new(&config.base_url).unwrap_or_else(|e| exit_with(&e));
        match config::load_session(&config.session_file) {
            Ok(Some(cookie)) => client.restore_session_cookie(&cookie),
            Ok(None) => {}
            Err(e) => exit_with(&e),
        }
        Self { client, config }
    }

    /// An auth client sharing the session.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.client.clone())
    }
}

/// Prints `error` with its hint and exits.
pub fn exit_with<E>(error: &E) -> !
where
    E: Handle<UserError> + std::fmt::Display,
{
    eprintln!("{}", format_cli_error(error));
    std::process::exit(1);
}

/// Awaits `operation`, exiting with a friendly message on failure.
pub async fn execute_or_exit<T, E, Fut>(operation: Fut) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Handle<UserError> + std::fmt::Display,
{
    match operation.await {
        Ok(value) => value,
        Err(e) => exit_with(&e),
    }
}

/// Explains why no session is available.
///
/// A rejected session asks the operator to log in; any other failure keeps
/// its own message and hint.
pub fn session_failure(cause: Option<&ApiError>) -> UserError {
    match cause {
        Some(e) if !e.is_unauthorized() => e.handle().unwrap_or_else(|| UserError {
            message: e.to_string(),
            usage_hint: None,
        }),
        _ => UserError {
            message: "Not logged in".to_string(),
            usage_hint: Some(LOGIN_HINT.to_string()),
        },
    }
}

/// Returns the logged-in user or exits.
pub async fn require_session(ctx: &CommandContext) -> SessionUser {
    let mut store = SessionStore::new(ctx.auth());
    store.refresh().await;
    match store.gate() {
        Gate::Render(user) => user.clone(),
        Gate::Redirect(_) | Gate::Pending => exit_with(&session_failure(store.last_error())),
    }
}

/// Returns the logged-in administrator or exits.
pub async fn require_admin(ctx: &CommandContext, action: &str) -> SessionUser {
    let user = require_session(ctx).await;
    if !user.is_admin() {
        cli_utils::exit_with_error(&format!(
            "Only administrators may {} (logged in as {})",
            action, user.username
        ));
    }
    user
}

/// Parses a record identifier.
pub fn parse_id_or_exit(id: &str) -> i64 {
    id.trim().parse().unwrap_or_else(|_| {
        cli_utils::exit_with_usage_error(
            &format!("Invalid id '{}'", id),
            "Record ids are whole numbers as shown by `list`",
        )
    })
}

/// Splits `field=value` arguments at the first `=`.
pub fn parse_assignments(args: &[String]) -> Result<Vec<(String, String)>, UserError> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok((field.trim().to_string(), value.to_string()))
            }
            _ => Err(UserError {
                message: format!("Expected field=value, got '{}'", arg),
                usage_hint: Some("Example: name=\"Ana Ruiz\" phone=555-0101".to_string()),
            }),
        })
        .collect()
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if args.len() < min_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command requires more arguments", command),
            usage,
        );
    }
    if args.len() > max_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command has too many arguments", command),
            usage,
        );
    }
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $ctx:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $ctx).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;
