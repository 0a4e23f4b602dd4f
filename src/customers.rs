//! Customers: buyers of the business, retail or wholesale.

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::person::{PersonFields, PersonPayload, PersonWire, person_payload};
use crate::resource::{Resource, ResourceClient};
use crate::schema::{ColumnDescriptor, FieldDescriptor, SelectOption};

/// Customer type sent when the form leaves it blank.
pub const DEFAULT_CUSTOMER_TYPE: &str = "Minorista";

/// A customer as shown in the console.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, shaya_derive::Record,
)]
#[serde(default)]
pub struct Customer {
    /// Backend identifier; `None` while adding.
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Identity document number.
    pub document: String,
    /// Email address.
    pub email: String,
    /// `"Minorista"` or `"Mayorista"`.
    pub customer_type: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Contact phone.
    pub phone: String,
    /// Free-form notes.
    pub observation: String,
}

/// A customer as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerWire {
    /// Backend identifier.
    pub id: i64,
    /// Customer type.
    #[serde(rename = "customerType", default)]
    pub customer_type: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Nested personal data.
    #[serde(default)]
    pub person: PersonWire,
}

/// Body of `POST /customers/create` and `PUT /customers/update/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPayload {
    /// Customer type, defaulting to `"Minorista"`.
    #[serde(rename = "customerType")]
    pub customer_type: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Nested personal data.
    pub person: PersonPayload,
}

/// The customers resource.
#[derive(Debug, Clone, Copy)]
pub struct Customers;

impl Resource for Customers {
    type Record = Customer;
    type Wire = CustomerWire;
    type CreatePayload = CustomerPayload;
    type UpdatePayload = CustomerPayload;

    const BASE_PATH: &'static str = "customers";
    const SINGULAR: &'static str = "customer";
    const PLURAL: &'static str = "customers";

    fn from_wire(wire: CustomerWire) -> Customer {
        let person = PersonFields::from(wire.person);
        Customer {
            id: Some(wire.id),
            name: person.name,
            document: person.document,
            email: person.email,
            customer_type: wire.customer_type.unwrap_or_default(),
            address: wire.address.unwrap_or_default(),
            city: wire.city.unwrap_or_default(),
            phone: person.phone,
            observation: person.observation,
        }
    }

    fn create_payload(customer: &Customer) -> CustomerPayload {
        let customer_type = customer.customer_type.trim();
        CustomerPayload {
            customer_type: if customer_type.is_empty() {
                DEFAULT_CUSTOMER_TYPE.to_string()
            } else {
                customer_type.to_string()
            },
            address: customer.address.clone(),
            city: customer.city.clone(),
            person: person_payload(
                &customer.name,
                &customer.document,
                &customer.email,
                &customer.phone,
                &customer.observation,
            ),
        }
    }

    fn update_payload(customer: &Customer) -> CustomerPayload {
        Self::create_payload(customer)
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Nombre"),
            FieldDescriptor::text("document", "Documento"),
            FieldDescriptor::select(
                "customer_type",
                "Tipo de cliente",
                vec![
                    SelectOption::new("Minorista", "Minorista"),
                    SelectOption::new("Mayorista", "Mayorista"),
                ],
            ),
            FieldDescriptor::text("address", "Direccion"),
            FieldDescriptor::text("city", "Ciudad"),
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
            ColumnDescriptor::data("customer_type", "Tipo de cliente"),
            ColumnDescriptor::data("address", "Direccion"),
            ColumnDescriptor::data("city", "Ciudad"),
            ColumnDescriptor::data("observation", "Observaciones"),
            ColumnDescriptor::edit("Acciones"),
        ]
    }
}

impl ResourceClient<Customers> {
    /// Creates many customers in one request.
    ///
    /// The backend skips entries it cannot store, so the result may be
    /// shorter than `customers`.
    pub async fn create_bulk(&self, customers: &[Customer]) -> Result<Vec<Customer>, ApiError> {
        let payload: Vec<CustomerPayload> =
            customers.iter().map(Customers::create_payload).collect();
        let wire: Vec<CustomerWire> = self
            .http()
            .post("customers/create-bulk", &payload, "Failed to import customers")
            .await?;
        let created: Vec<Customer> = wire.into_iter().map(Customers::from_wire).collect();
        if created.len() < customers.len() {
            tracing::warn!(
                requested = customers.len(),
                created = created.len(),
                "backend skipped some customers"
            );
        }
        Ok(created)
    }
}
