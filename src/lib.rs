//! # Shaya: Administrative Console for the Shaya Café Backend
//!
//! This crate is the client side of the Shaya back office. Operators log in
//! against the backend's cookie session, then list, search, sort, page, add,
//! edit and delete the business's users, customers and farmers.
//!
//! Everything is driven by declarative schemas rather than per-entity code:
//!
//! - **Records**: flat entity structs whose fields are addressable by name
//!   through the [`Record`] trait, implemented with `#[derive(shaya::Record)]`
//! - **Schemas**: [`schema::FieldDescriptor`]s drive the form modal and
//!   [`schema::ColumnDescriptor`]s drive the table
//! - **Table**: [`table::TableView`] sorts by any data column (ascending,
//!   descending, unsorted) and paginates locally
//! - **Form**: [`form::FormModal`] edits a working copy and returns intents;
//!   it performs no I/O
//! - **Resources**: one [`resource::ResourceClient`] serves every entity
//!   described by a [`resource::Resource`] implementation
//! - **Session**: [`session::SessionStore`] tracks the logged-in operator and
//!   gates every page
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ shayactl (arrrg options, commands)      │
//! ├─────────────────────────────────────────┤
//! │ CrudPage: table + filters + form modal  │
//! ├─────────────────────────────────────────┤
//! │ SessionStore gate   │ ResourceClient<R> │
//! ├─────────────────────────────────────────┤
//! │ ShayaClient (reqwest + cookie jar)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Sorting and Paging a Table
//!
//! ```rust
//! use shaya::schema::ColumnDescriptor;
//! use shaya::table::{Cell, SortDirection, TableView};
//!
//! #[derive(Clone, Debug, Default, PartialEq, shaya::Record)]
//! struct Lot {
//!     id: Option<i64>,
//!     origin: String,
//! }
//!
//! let mut table = TableView::new(vec![
//!     ColumnDescriptor::data("id", "ID"),
//!     ColumnDescriptor::data("origin", "Origen"),
//!     ColumnDescriptor::edit("Acciones"),
//! ])
//! .with_edit_action(true);
//! table.set_data(vec![
//!     Lot { id: Some(1), origin: "Huila".to_string() },
//!     Lot { id: Some(2), origin: "Cauca".to_string() },
//! ]);
//!
//! assert_eq!(
//!     table.toggle_sort("origin").map(|s| s.direction),
//!     Some(SortDirection::Ascending)
//! );
//! let page = table.render();
//! assert_eq!(page.rows[0][1], Cell::Text("Cauca".to_string()));
//! assert_eq!(page.rows[0][2], Cell::EditAction);
//! assert_eq!(page.page_count, 1);
//! ```
//!
//! ### Editing Through the Form Modal
//!
//! ```rust
//! use shaya::customers::{Customer, Customers};
//! use shaya::form::{FormAction, FormModal};
//! use shaya::resource::Resource;
//!
//! let mut modal = FormModal::<Customer>::add(Customers::fields());
//! modal.edit("name", "Tienda El Grano").unwrap();
//! modal.edit("customer_type", "Mayorista").unwrap();
//! assert!(modal.edit("customer_type", "Otro").is_err());
//!
//! match modal.save() {
//!     FormAction::Save(customer) => {
//!         let payload = Customers::create_payload(&customer);
//!         assert_eq!(payload.customer_type, "Mayorista");
//!         assert_eq!(payload.person.full_name, "Tienda El Grano");
//!     }
//!     _ => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]

extern crate self as shaya;

mod record;

/// Cookie-based login, logout and current-user lookup.
pub mod auth;

/// Command-line interface utilities for program termination and output formatting.
///
/// This module provides common CLI utilities for shayactl, including error
/// exits, JSON/YAML output and text rendering of tables and records.
pub mod cli_utils;

/// Command-line interface command handlers.
///
/// This module contains the command handlers for the shayactl CLI application.
pub mod commands;

/// Console configuration and session cookie persistence.
pub mod config;

/// Customers and their schema.
pub mod customers;

/// Error types for backend operations and input validation.
pub mod errors;

/// Farmers and their schema.
pub mod farmers;

/// The add/edit form modal.
pub mod form;

/// HTTP client utilities for interacting with the Shaya backend.
///
/// This module provides the cookie-carrying HTTP client shared by every
/// request, and the mapping of non-success responses to errors.
pub mod http_utils;

/// Tracing subscriber setup.
pub mod logging;

/// List-plus-modal page controller.
pub mod page;

/// Personal data nested under `person` by the backend.
pub mod person;

/// Generic CRUD resource abstraction.
pub mod resource;

/// Field and column descriptors.
pub mod schema;

/// Session state and the page gate.
pub mod session;

/// Sortable, paginated table model.
pub mod table;

/// Users and their schema.
pub mod users;

pub use errors::{ApiError, HttpOperationError, ValidationError};
pub use record::{FieldValue, FromFieldValue, Record, RecordError, ToFieldValue};
pub use shaya_derive::Record;
