//! # Session Commands
//!
//! `login`, `logout` and `whoami`.

use crate::auth::Credentials;
use crate::cli_utils::{self, OutputFormat};
use crate::commands::shared::{
    CommandContext, execute_or_exit, exit_with, require_session, validate_args_count_or_exit,
};
use crate::config;
use crate::session::SessionStore;

const LOGIN_USAGE: &str = "Usage: shayactl login <username> <password>";

/// Logs in and stores the session cookie.
pub async fn handle_login_command(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 3, 3, "login", LOGIN_USAGE);
    let credentials = Credentials::new(&args[1], &args[2]).unwrap_or_else(|e| exit_with(&e));

    let mut store = SessionStore::new(ctx.auth());
    execute_or_exit(store.login(&credentials)).await;
    let Some(user) = store.user() else {
        cli_utils::exit_with_error("Login succeeded but the session could not be confirmed");
    };

    match ctx.client.session_cookie() {
        Some(cookie) => {
            if let Err(e) = config::save_session(&ctx.config.session_file, &cookie) {
                exit_with(&e);
            }
            tracing::debug!(path = %ctx.config.session_file.display(), "session stored");
        }
        None => tracing::warn!("backend did not set a session cookie"),
    }
    cli_utils::print_success(&format!("Logged in as {} ({})", user.username, user.role));
}

/// Ends the session and removes the stored cookie.
pub async fn handle_logout_command(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "logout", "Usage: shayactl logout");
    let mut store = SessionStore::new(ctx.auth());
    let result = store.logout().await;
    if let Err(e) = config::clear_session(&ctx.config.session_file) {
        exit_with(&e);
    }
    match result {
        Ok(()) => cli_utils::print_success("Logged out"),
        Err(e) if e.is_unauthorized() => cli_utils::print_success("No active session"),
        Err(e) => exit_with(&e),
    }
}

/// Shows the logged-in user.
pub async fn handle_whoami_command(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "whoami", "Usage: shayactl whoami");
    let user = require_session(ctx).await;
    match ctx.config.output {
        OutputFormat::Table => {
            cli_utils::print_success(&format!("{} ({}, id {})", user.username, user.role, user.id))
        }
        format => cli_utils::print_formatted_or_exit(&user, format, "user"),
    }
}
