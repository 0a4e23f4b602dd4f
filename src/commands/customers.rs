//! # Customer Commands
//!
//! Customers accept every resource subcommand plus `import`, which sends a
//! JSON file of customers to the bulk endpoint.

use std::path::Path;

use crate::cli_utils;
use crate::commands::errors::UserError;
use crate::commands::resource::handle_resource_command;
use crate::commands::shared::{
    CommandContext, execute_or_exit, exit_with, require_admin, validate_args_count_or_exit,
};
use crate::customers::{Customer, Customers};
use crate::resource::ResourceClient;

const IMPORT_USAGE: &str = "Usage: shayactl customers import <file.json>";

/// Handles `shayactl customers ...`.
pub async fn handle_customers_command(args: &[String], ctx: &CommandContext) {
    match args.first().map(String::as_str) {
        Some("import") => handle_import(args, ctx).await,
        _ => handle_resource_command::<Customers>(args, ctx).await,
    }
}

/// Reads a JSON array of customers. Missing fields take their defaults.
pub fn read_customers(path: &Path) -> Result<Vec<Customer>, UserError> {
    let content = std::fs::read_to_string(path).map_err(|e| UserError {
        message: format!("Cannot read {}: {}", path.display(), e),
        usage_hint: Some(IMPORT_USAGE.to_string()),
    })?;
    serde_json::from_str(&content).map_err(|e| UserError {
        message: format!("Invalid customer file {}: {}", path.display(), e),
        usage_hint: Some(
            "Expected a JSON array such as [{\"name\": \"Tienda El Grano\", \"city\": \"Pitalito\"}]"
                .to_string(),
        ),
    })
}

async fn handle_import(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 2, 2, "import", IMPORT_USAGE);
    let customers = read_customers(Path::new(&args[1])).unwrap_or_else(|e| exit_with(&e));
    if customers.is_empty() {
        cli_utils::print_success("No customers to import");
        return;
    }
    require_admin(ctx, "import customers").await;
    let client = ResourceClient::<Customers>::new(ctx.client.clone());
    let created = execute_or_exit(client.create_bulk(&customers)).await;
    cli_utils::print_success(&format!(
        "Imported {} of {} customers",
        created.len(),
        customers.len()
    ));
}
