//! # Resource Command Handler
//!
//! One handler serves `users`, `customers` and `farmers`. Listing goes
//! through the table view so sorting and pagination match the console;
//! create and update go through the form modal so the same field and select
//! rules apply.

use serde::Serialize;

use crate::cli_utils::{self, OutputFormat};
use crate::commands::shared::{
    CommandContext, dispatch_command, execute_or_exit, exit_with, parse_assignments,
    parse_id_or_exit, require_admin, require_session, validate_args_count_or_exit,
};
use crate::form::FormModal;
use crate::page::CrudPage;
use crate::resource::Resource;
use crate::schema::{ColumnDescriptor, FieldDescriptor, FieldKind};

fn usage<R: Resource>() -> String {
    format!(
        "Usage: shayactl {} <list|get|fields|create|update|delete> [args...]",
        R::BASE_PATH
    )
}

/// Handles all commands for resource `R`.
pub async fn handle_resource_command<R: Resource>(args: &[String], ctx: &CommandContext) {
    let usage = usage::<R>();
    dispatch_command!(R::BASE_PATH, &usage, args, ctx, {
        "list" => handle_list::<R>,
        "get" => handle_get::<R>,
        "fields" => handle_fields::<R>,
        "create" => handle_create::<R>,
        "update" => handle_update::<R>,
        "delete" => handle_delete::<R>,
    });
}

fn apply_table_options<R: Resource>(page: &mut CrudPage<R>, ctx: &CommandContext) {
    let config = &ctx.config;
    page.table_mut().set_page_size(config.page_size);
    if let Some(sort) = &config.sort {
        let sortable = R::columns().iter().any(|c| {
            matches!(c, ColumnDescriptor::Data { .. }) && c.id() == sort.column
        });
        if !sortable {
            let columns: Vec<&str> = R::columns()
                .iter()
                .filter(|c| matches!(c, ColumnDescriptor::Data { .. }))
                .map(ColumnDescriptor::id)
                .collect();
            cli_utils::exit_with_usage_error(
                &format!("Cannot sort {} by '{}'", R::PLURAL, sort.column),
                &format!("Sortable columns: {}", columns.join(", ")),
            );
        }
        page.table_mut()
            .set_sort(&sort.column, Some(sort.direction));
    }
    page.table_mut().set_page_index(config.page_index);
}

async fn handle_list<R: Resource>(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "list", &format!("Usage: shayactl {} list", R::BASE_PATH));
    let user = require_session(ctx).await;
    let mut page = CrudPage::<R>::for_user(ctx.client.clone(), &user);
    page.set_search(ctx.config.search.as_deref());
    page.set_role(ctx.config.role.as_deref());
    execute_or_exit(page.load()).await;
    apply_table_options(&mut page, ctx);

    match ctx.config.output {
        OutputFormat::Table if page.table().is_empty() => {
            cli_utils::print_success(&format!("No {} found", R::PLURAL));
        }
        OutputFormat::Table => {
            println!("{}", cli_utils::format_table(&page.table().render()));
        }
        format => {
            let rows = page.table().page_rows();
            cli_utils::print_formatted_or_exit(&rows, format, R::PLURAL);
        }
    }
}

async fn handle_get<R: Resource>(args: &[String], ctx: &CommandContext) {
    let usage = format!("Usage: shayactl {} get <id>", R::BASE_PATH);
    validate_args_count_or_exit(args, 2, 2, "get", &usage);
    let id = parse_id_or_exit(&args[1]);
    let user = require_session(ctx).await;
    let page = CrudPage::<R>::for_user(ctx.client.clone(), &user);
    let record = execute_or_exit(page.fetch(id)).await;
    print_record::<R>(&record, ctx.config.output);
}

#[derive(Serialize)]
struct FieldRow<'a> {
    accessor: &'a str,
    header: &'a str,
    kind: &'static str,
    options: Vec<String>,
}

fn field_rows(fields: &[FieldDescriptor]) -> Vec<FieldRow<'_>> {
    fields
        .iter()
        .map(|field| FieldRow {
            accessor: field.accessor,
            header: field.header,
            kind: match field.kind {
                FieldKind::Text => "text",
                FieldKind::Password => "password",
                FieldKind::Select { .. } => "select",
                FieldKind::TextArea => "textarea",
            },
            options: field.options().iter().map(|o| o.value.to_string()).collect(),
        })
        .collect()
}

async fn handle_fields<R: Resource>(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "fields", &format!("Usage: shayactl {} fields", R::BASE_PATH));
    let fields = R::fields();
    let rows = field_rows(&fields);
    match ctx.config.output {
        OutputFormat::Table => {
            for row in rows {
                if row.options.is_empty() {
                    println!("{:<16} {:<10} {}", row.accessor, row.kind, row.header);
                } else {
                    println!(
                        "{:<16} {:<10} {} [{}]",
                        row.accessor,
                        row.kind,
                        row.header,
                        row.options.join("|")
                    );
                }
            }
        }
        format => cli_utils::print_formatted_or_exit(&fields, format, "fields"),
    }
}

fn apply_edits<R: Resource>(modal: &mut FormModal<R::Record>, args: &[String]) {
    let pairs = parse_assignments(args).unwrap_or_else(|e| exit_with(&e));
    for (field, value) in pairs {
        if let Err(e) = modal.edit(&field, &value) {
            exit_with(&e);
        }
    }
}

fn print_record<R: Resource>(record: &R::Record, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", cli_utils::format_record(record)),
        format => cli_utils::print_formatted_or_exit(record, format, R::SINGULAR),
    }
}

async fn handle_create<R: Resource>(args: &[String], ctx: &CommandContext) {
    let usage = format!("Usage: shayactl {} create <field=value>...", R::BASE_PATH);
    validate_args_count_or_exit(args, 2, usize::MAX, "create", &usage);
    let user = require_admin(ctx, &format!("create {}", R::PLURAL)).await;
    let mut page = CrudPage::<R>::for_user(ctx.client.clone(), &user);
    apply_edits::<R>(page.open_add(), &args[1..]);
    let created = execute_or_exit(page.save()).await;
    print_record::<R>(&created, ctx.config.output);
}

async fn handle_update<R: Resource>(args: &[String], ctx: &CommandContext) {
    let usage = format!("Usage: shayactl {} update <id> <field=value>...", R::BASE_PATH);
    validate_args_count_or_exit(args, 3, usize::MAX, "update", &usage);
    let id = parse_id_or_exit(&args[1]);
    let user = require_admin(ctx, &format!("update {}", R::PLURAL)).await;
    let mut page = CrudPage::<R>::for_user(ctx.client.clone(), &user);
    let modal = execute_or_exit(page.fetch_edit(id)).await;
    apply_edits::<R>(modal, &args[2..]);
    let updated = execute_or_exit(page.save()).await;
    print_record::<R>(&updated, ctx.config.output);
}

async fn handle_delete<R: Resource>(args: &[String], ctx: &CommandContext) {
    let usage = format!("Usage: shayactl {} delete <id>", R::BASE_PATH);
    validate_args_count_or_exit(args, 2, 2, "delete", &usage);
    let id = parse_id_or_exit(&args[1]);
    let user = require_admin(ctx, &format!("delete {}", R::PLURAL)).await;
    let mut page = CrudPage::<R>::for_user(ctx.client.clone(), &user);
    execute_or_exit(page.fetch_edit(id)).await;
    execute_or_exit(page.delete()).await;
    cli_utils::print_success(&format!("Deleted {} {}", R::SINGULAR, id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Users;

    #[test]
    fn field_rows_describe_kinds() {
        let fields = Users::fields();
        let rows = field_rows(&fields);
        let role = rows.iter().find(|r| r.accessor == "role").unwrap();
        assert_eq!(role.kind, "select");
        assert_eq!(role.options, vec!["user", "admin"]);
        let password = rows.iter().find(|r| r.accessor == "password").unwrap();
        assert_eq!(password.kind, "password");
        assert!(password.options.is_empty());
    }
}
