//! Farmers: coffee growers who supply the business.

use serde::{Deserialize, Serialize};

use crate::person::{PersonFields, PersonPayload, PersonWire, person_payload};
use crate::resource::Resource;
use crate::schema::{ColumnDescriptor, FieldDescriptor};

/// A farmer as shown in the console.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, shaya_derive::Record,
)]
pub struct Farmer {
    /// Backend identifier; `None` while adding.
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Identity document number.
    pub document: String,
    /// Email address.
    pub email: String,
    /// Name of the farm.
    pub farm_name: String,
    /// Where the farm is.
    pub farm_location: String,
    /// Contact phone.
    pub phone: String,
    /// Free-form notes.
    pub observation: String,
}

/// A farmer as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmerWire {
    /// Backend identifier.
    pub id: i64,
    /// Name of the farm.
    #[serde(default)]
    pub farm_name: Option<String>,
    /// Where the farm is.
    #[serde(default)]
    pub farm_location: Option<String>,
    /// Nested personal data.
    #[serde(default)]
    pub person: PersonWire,
}

/// Body of `POST /farmers/create` and `PUT /farmers/update/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmerPayload {
    /// Name of the farm.
    pub farm_name: String,
    /// Where the farm is.
    pub farm_location: String,
    /// Nested personal data.
    pub person: PersonPayload,
}

/// The farmers resource.
#[derive(Debug, Clone, Copy)]
pub struct Farmers;

impl Resource for Farmers {
    type Record = Farmer;
    type Wire = FarmerWire;
    type CreatePayload = FarmerPayload;
    type UpdatePayload = FarmerPayload;

    const BASE_PATH: &'static str = "farmers";
    const SINGULAR: &'static str = "farmer";
    const PLURAL: &'static str = "farmers";

    fn from_wire(wire: FarmerWire) -> Farmer {
        let person = PersonFields::from(wire.person);
        Farmer {
            id: Some(wire.id),
            name: person.name,
            document: person.document,
            email: person.email,
            farm_name: wire.farm_name.unwrap_or_default(),
            farm_location: wire.farm_location.unwrap_or_default(),
            phone: person.phone,
            observation: person.observation,
        }
    }

    fn create_payload(farmer: &Farmer) -> FarmerPayload {
        FarmerPayload {
            farm_name: farmer.farm_name.clone(),
            farm_location: farmer.farm_location.clone(),
            person: person_payload(
                &farmer.name,
                &farmer.document,
                &farmer.email,
                &farmer.phone,
                &farmer.observation,
            ),
        }
    }

    fn update_payload(farmer: &Farmer) -> FarmerPayload {
        Self::create_payload(farmer)
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Nombre"),
            FieldDescriptor::text("document", "Documento"),
            FieldDescriptor::text("farm_name", "Finca"),
            FieldDescriptor::text("farm_location", "Ubicación finca"),
            FieldDescriptor::text("email", "Correo"),
            FieldDescriptor::text("phone", "Teléfono"),
            FieldDescriptor::textarea("observation", "Observación"),
        ]
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::data("id", "ID"),
            ColumnDescriptor::data("name", "Nombre"),
            ColumnDescriptor::data("document", "Documento"),
            ColumnDescriptor::data("phone", "Teléfono"),
            ColumnDescriptor::data("email", "Correo"),
            ColumnDescriptor::data("farm_name", "Finca"),
            ColumnDescriptor::data("farm_location", "Ubicación finca"),
            ColumnDescriptor::data("observation", "Observaciones"),
            ColumnDescriptor::edit("Acciones"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate_columns, validate_fields};

    #[test]
    fn schema_accessors_exist() {
        validate_fields::<Farmer>(&Farmers::fields()).unwrap();
        validate_columns::<Farmer>(&Farmers::columns()).unwrap();
    }

    #[test]
    fn payload_nests_person() {
        let farmer = Farmer {
            id: Some(2),
            name: "Rosa Perdomo".to_string(),
            farm_name: "La Esperanza".to_string(),
            farm_location: "Vereda El Cedro".to_string(),
            ..Farmer::default()
        };
        let body = serde_json::to_value(Farmers::update_payload(&farmer)).unwrap();
        assert_eq!(body["farm_name"], "La Esperanza");
        assert_eq!(body["person"]["full_name"], "Rosa Perdomo");
        assert!(body.get("id").is_none());
        assert!(body["person"]["observation"].is_null());
    }
}
