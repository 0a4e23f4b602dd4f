//! Console configuration.
//!
//! `shayactl` options are parsed with arrrg into [`ConsoleOptions`] and folded
//! into a [`ConsoleConfig`] with defaults applied. The session cookie is kept
//! between invocations in a small file next to the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arrrg_derive::CommandLine;

use crate::cli_utils::OutputFormat;
use crate::errors::ValidationError;
use crate::http_utils::DEFAULT_BASE_URL;
use crate::table::{DEFAULT_PAGE_SIZE, SortDirection};

/// Where the session cookie is stored unless `--session-file` says otherwise.
pub const DEFAULT_SESSION_FILE: &str = ".shayactl-session";

/// Raw command-line options.
#[allow(missing_docs)]
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ConsoleOptions {
    #[arrrg(optional, "Base URL of the Shaya backend")]
    pub base_url: Option<String>,
    #[arrrg(optional, "File holding the session cookie between runs")]
    pub session_file: Option<String>,
    #[arrrg(optional, "Output format: table, json or yaml")]
    pub output: Option<String>,
    #[arrrg(optional, "Page to show, starting at 1")]
    pub page: Option<usize>,
    #[arrrg(optional, "Rows per page")]
    pub page_size: Option<usize>,
    #[arrrg(optional, "Column to sort by, with an optional :asc or :desc suffix")]
    pub sort: Option<String>,
    #[arrrg(optional, "Free-text search filter for list")]
    pub search: Option<String>,
    #[arrrg(optional, "Role filter for users list")]
    pub role: Option<String>,
    #[arrrg(flag, "Enable debug logging")]
    pub verbose: bool,
}

/// A column and direction requested with `--sort`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Column id.
    pub column: String,
    /// Requested direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parses `column`, `column:asc` or `column:desc`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError {
            field: "sort".to_string(),
            value: input.to_string(),
            reason: reason.to_string(),
        };
        let (column, direction) = match input.split_once(':') {
            Some((column, "asc")) => (column, SortDirection::Ascending),
            Some((column, "desc")) => (column, SortDirection::Descending),
            Some(_) => return Err(invalid("direction must be asc or desc")),
            None => (input, SortDirection::Ascending),
        };
        if column.trim().is_empty() {
            return Err(invalid("column is required"));
        }
        Ok(Self {
            column: column.trim().to_string(),
            direction,
        })
    }
}

/// Effective console settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend root URL.
    pub base_url: String,
    /// Where the session cookie is persisted.
    pub session_file: PathBuf,
    /// Output format for records.
    pub output: OutputFormat,
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Initial sort, if any.
    pub sort: Option<SortSpec>,
    /// Search filter.
    pub search: Option<String>,
    /// Role filter for users.
    pub role: Option<String>,
    /// Enables debug logging.
    pub verbose: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            output: OutputFormat::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            search: None,
            role: None,
            verbose: false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ConsoleConfig {
    /// Applies defaults to the parsed options.
    pub fn from_options(options: ConsoleOptions) -> Result<Self, ValidationError> {
        let defaults = Self::default();
        let output = match options.output.as_deref() {
            Some(output) => output.parse().map_err(|reason| ValidationError {
                field: "output".to_string(),
                value: output.to_string(),
                reason,
            })?,
            None => defaults.output,
        };
        let page_index = match options.page {
            Some(0) => {
                return Err(ValidationError {
                    field: "page".to_string(),
                    value: "0".to_string(),
                    reason: "pages start at 1".to_string(),
                });
            }
            Some(page) => page - 1,
            None => defaults.page_index,
        };
        let page_size = match options.page_size {
            Some(0) => {
                return Err(ValidationError {
                    field: "page-size".to_string(),
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            Some(size) => size,
            None => defaults.page_size,
        };
        let sort = non_empty(options.sort)
            .map(|s| SortSpec::parse(&s))
            .transpose()?;
        Ok(Self {
            base_url: non_empty(options.base_url).unwrap_or(defaults.base_url),
            session_file: non_empty(options.session_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            output,
            page_index,
            page_size,
            sort,
            search: non_empty(options.search),
            role: non_empty(options.role),
            verbose: options.verbose,
        })
    }
}

/// Reads a stored session cookie. A missing file means no session.
pub fn load_session(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(cookie) if cookie.trim().is_empty() => Ok(None),
        Ok(cookie) => Ok(Some(cookie.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Stores the session cookie.
pub fn save_session(path: &Path, cookie: &str) -> io::Result<()> {
    fs::write(path, format!("{}\n", cookie))
}

/// Forgets the stored session. A missing file is not an error.
pub fn clear_session(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}
