//! # Command Handlers
//!
//! Command handlers for the shayactl CLI application.
//!
//! ## Structure
//!
//! - `auth` - Session commands (login, logout, whoami)
//! - `customers` - Customer commands, adding bulk `import`
//! - `resource` - Entity commands (list, get, fields, create, update, delete) shared by
//!   users, customers and farmers
//! - `shared` - Argument validation, session gating and error exits
//! - `errors` - Conversion of library errors into user-facing messages

pub mod auth;
pub mod customers;
pub mod errors;
pub mod resource;
pub mod shared;

pub use auth::{handle_login_command, handle_logout_command, handle_whoami_command};
pub use customers::handle_customers_command;
pub use resource::handle_resource_command;
pub use shared::CommandContext;
