use arrrg::CommandLine;

use shaya::{
    cli_utils,
    commands::{
        CommandContext, handle_customers_command, handle_login_command, handle_logout_command,
        handle_resource_command, handle_whoami_command, shared::exit_with,
    },
    config::{ConsoleConfig, ConsoleOptions},
    farmers::Farmers,
    logging,
    users::Users,
};

const USAGE: &str = r#"Usage: shayactl [options] <command> [args...]

Options:
  --base-url <url>        Base URL of the Shaya backend (default: http://localhost:8000)
  --session-file <path>   File holding the session cookie (default: .shayactl-session)
  --output <format>       Output format: table, json or yaml (default: table)
  --page <n>              Page to show, starting at 1 (default: 1)
  --page-size <n>         Rows per page (default: 30)
  --sort <column[:dir]>   Sort by a column, dir is asc or desc (default: unsorted)
  --search <text>         Free-text search filter for list
  --role <role>           Role filter for users list
  --verbose               Enable debug logging

Commands:
  login <username> <password>          Start a session
  logout                               End the session
  whoami                               Show the logged-in user
  <resource> list                      List records
  <resource> get <id>                  Show one record
  <resource> fields                    Show the editable fields
  <resource> create <field=value>...   Create a record (admin)
  <resource> update <id> <field=value>...
                                       Update a record (admin)
  <resource> delete <id>               Delete a record (admin)
  customers import <file.json>         Create customers from a JSON array (admin)

Resources: users, customers, farmers"#;

#[tokio::main]
async fn main() {
    let (options, free) =
        ConsoleOptions::from_command_line_relaxed("USAGE: shayactl [options] <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let config = ConsoleConfig::from_options(options).unwrap_or_else(|e| exit_with(&e));
    logging::init(config.verbose);
    tracing::debug!(base_url = %config.base_url, "starting");

    let ctx = CommandContext::new(config);
    match free[0].as_str() {
        "login" => handle_login_command(&free, &ctx).await,
        "logout" => handle_logout_command(&free, &ctx).await,
        "whoami" => handle_whoami_command(&free, &ctx).await,
        "users" => handle_resource_command::<Users>(&free[1..], &ctx).await,
        "customers" => handle_customers_command(&free[1..], &ctx).await,
        "farmers" => handle_resource_command::<Farmers>(&free[1..], &ctx).await,
        "help" => cli_utils::print_success(USAGE),
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: login, logout, whoami, users, customers, farmers",
                free[0]
            ));
        }
    }
}
