//! System users: operators who can log into the console.

use serde::{Deserialize, Serialize};

use crate::person::{PersonFields, PersonPayload, PersonWire, person_payload};
use crate::resource::Resource;
use crate::schema::{ColumnDescriptor, FieldDescriptor, SelectOption};

/// Role assigned when the form leaves it blank.
pub const DEFAULT_ROLE: &str = "user";
/// Role allowed to create, update and delete records.
pub const ADMIN_ROLE: &str = "admin";

/// A user as shown in the console.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, shaya_derive::Record,
)]
pub struct User {
    /// Backend identifier; `None` while adding.
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Identity document number.
    pub document: String,
    /// Login name.
    pub username: String,
    /// New password. Only ever set from the form; never shown.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// `"user"` or `"admin"`.
    pub role: String,
    /// Free-form notes.
    pub observation: String,
}

/// A user as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserWire {
    /// Backend identifier.
    pub id: i64,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Role.
    #[serde(default)]
    pub role: Option<String>,
    /// Nested personal data.
    #[serde(default)]
    pub person: PersonWire,
}

/// Body of `POST /users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCreatePayload {
    /// Login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Role, defaulting to `"user"`.
    pub role: String,
    /// Nested personal data.
    pub person: PersonPayload,
}

/// Body of `PUT /users/update/{id}`; the password is omitted unless changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdatePayload {
    /// Login name.
    pub username: String,
    /// Role, defaulting to `"user"`.
    pub role: String,
    /// New password, only when the operator typed one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Nested personal data.
    pub person: PersonPayload,
}

/// The users resource.
#[derive(Debug, Clone, Copy)]
pub struct Users;

fn role_or_default(role: &str) -> String {
    if role.trim().is_empty() {
        DEFAULT_ROLE.to_string()
    } else {
        role.trim().to_string()
    }
}

fn person_of(user: &User) -> PersonPayload {
    person_payload(
        &user.name,
        &user.document,
        &user.email,
        &user.phone,
        &user.observation,
    )
}

impl Resource for Users {
    type Record = User;
    type Wire = UserWire;
    type CreatePayload = UserCreatePayload;
    type UpdatePayload = UserUpdatePayload;

    const BASE_PATH: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";
    const ROLE_FILTER: bool = true;

    fn from_wire(wire: UserWire) -> User {
        let person = PersonFields::from(wire.person);
        User {
            id: Some(wire.id),
            name: person.name,
            document: person.document,
            username: wire.username.unwrap_or_default(),
            password: None,
            email: person.email,
            phone: person.phone,
            role: wire.role.unwrap_or_default(),
            observation: person.observation,
        }
    }

    fn create_payload(user: &User) -> UserCreatePayload {
        UserCreatePayload {
            username: user.username.clone(),
            password: user.password.clone().unwrap_or_default(),
            role: role_or_default(&user.role),
            person: person_of(user),
        }
    }

    fn update_payload(user: &User) -> UserUpdatePayload {
        UserUpdatePayload {
            username: user.username.clone(),
            role: role_or_default(&user.role),
            password: user.password.clone().filter(|p| !p.is_empty()),
            person: person_of(user),
        }
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Nombre"),
            FieldDescriptor::text("document", "Documento"),
            FieldDescriptor::text("username", "Usuario"),
            FieldDescriptor::password("password", "Contraseña"),
            FieldDescriptor::text("email", "Correo"),
            FieldDescriptor::text("phone", "Teléfono"),
            FieldDescriptor::select(
                "role",
                "Rol",
                vec![
                    SelectOption::new("Usuario", DEFAULT_ROLE),
                    SelectOption::new("Administrador", ADMIN_ROLE),
                ],
            ),
            FieldDescriptor::textarea("observation", "Observación"),
        ]
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::data("id", "ID"),
            ColumnDescriptor::data("name", "Nombre"),
            ColumnDescriptor::data("username", "Usuario"),
            ColumnDescriptor::data("email", "Correo"),
            ColumnDescriptor::data("phone", "Teléfono"),
            ColumnDescriptor::data("role", "Rol"),
            ColumnDescriptor::data("observation", "Observaciones"),
            ColumnDescriptor::edit("Acciones"),
        ]
    }
}
