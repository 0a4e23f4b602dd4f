//! Personal data shared by users, customers and farmers.
//!
//! The backend nests these fields under a `person` object; the console keeps
//! them flat on each record.

use serde::{Deserialize, Serialize};

/// Shown when the backend sends no observation.
pub const MISSING_OBSERVATION: &str = "Sin observación";

/// The `person` object as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPayload {
    /// Full name.
    pub full_name: String,
    /// Identity document number.
    pub document: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Free-form notes.
    pub observation: Option<String>,
}

/// The `person` object as returned by the backend.
///
/// Every field may be absent; mappers substitute placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonWire {
    /// Backend identifier of the person row.
    #[serde(default)]
    pub id: Option<i64>,
    /// Full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Identity document number.
    #[serde(default)]
    pub document: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub observation: Option<String>,
}

/// The flat personal fields of a record, after mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    /// Full name.
    pub name: String,
    /// Identity document number.
    pub document: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Free-form notes, or [`MISSING_OBSERVATION`].
    pub observation: String,
}

impl From<PersonWire> for PersonFields {
    fn from(wire: PersonWire) -> Self {
        Self {
            name: wire.full_name.unwrap_or_default(),
            document: wire.document.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            phone: wire.phone.unwrap_or_default(),
            observation: wire
                .observation
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| MISSING_OBSERVATION.to_string()),
        }
    }
}

/// Builds the nested `person` object from flat record fields.
///
/// A blank observation, or the placeholder shown for a missing one, is sent
/// as `null`.
pub fn person_payload(
    name: &str,
    document: &str,
    email: &str,
    phone: &str,
    observation: &str,
) -> PersonPayload {
    let observation = observation.trim();
    PersonPayload {
        full_name: name.to_string(),
        document: document.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        observation: if observation.is_empty() || observation == MISSING_OBSERVATION {
            None
        } else {
            Some(observation.to_string())
        },
    }
}
