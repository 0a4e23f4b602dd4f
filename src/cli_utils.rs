use std::fmt;
use std::process;
use std::str::FromStr;

use serde::Serialize;

use crate::Record;
use crate::table::{Cell, RenderedTable};

/// How `shayactl` prints results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text columns.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!(
                "unknown output format '{}', expected table, json or yaml",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message and usage information
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", usage);
    process::exit(1);
}

/// Prints a formatted success message
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Prints `value` as JSON or YAML. Text tables are printed by the callers.
pub fn print_formatted<T>(value: &T, format: OutputFormat) -> Result<(), String>
where
    T: Serialize,
{
    let text = match format {
        OutputFormat::Json | OutputFormat::Table => {
            serde_json::to_string_pretty(value).map_err(|e| e.to_string())?
        }
        OutputFormat::Yaml => serde_yml::to_string(value).map_err(|e| e.to_string())?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

/// Prints `value` as JSON or YAML or exits with error
pub fn print_formatted_or_exit<T>(value: &T, format: OutputFormat, context: &str)
where
    T: Serialize,
{
    if let Err(e) = print_formatted(value, format) {
        exit_with_error(&format!("Failed to format {} as {}: {}", context, format, e));
    }
}

fn cell_text(cell: &Cell) -> &str {
    match cell {
        Cell::Text(text) => text,
        Cell::EditAction => "[editar]",
        Cell::Empty => "",
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Lays out a rendered table page as aligned text with a page footer.
pub fn format_table(table: &RenderedTable) -> String {
    let headers: Vec<String> = table
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(direction) => format!("{} {}", h.label, direction.marker()),
            None => h.label.to_string(),
        })
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_text(cell).chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, width)| pad(text, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    out.push_str(&line(headers.iter().map(String::as_str).collect()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row.iter().map(cell_text).collect()));
        out.push('\n');
    }
    out.push_str(&format!(
        "page {}/{} ({} rows)",
        table.page_index + 1,
        table.page_count,
        table.total_rows
    ));
    out
}

/// Lays out one record as `field: value` lines.
pub fn format_record<T: Record>(record: &T) -> String {
    let width = T::field_names()
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);
    T::field_names()
        .iter()
        .filter_map(|name| {
            let value = record.get(name)?;
            let label = format!("{}:", name);
            Some(format!("{} {}", pad(&label, width + 1), value).trim_end().to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
