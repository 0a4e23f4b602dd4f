//! One CRUD client for every entity.
//!
//! Each entity implements [`Resource`] to describe its base path, wire shape,
//! payload builders and schema. [`ResourceClient`] turns that description
//! into the four REST operations:
//!
//! - `GET    /api/v1/{base}/get?search=&role=`
//! - `GET    /api/v1/{base}/get/{singular}/{id}`
//! - `POST   /api/v1/{base}/create`
//! - `PUT    /api/v1/{base}/update/{id}`
//! - `DELETE /api/v1/{base}/delete/{id}`

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;
use crate::http_utils::ShayaClient;
use crate::schema::{ColumnDescriptor, FieldDescriptor};
use crate::{FieldValue, Record};

/// Accessor holding a record's identifier unless configured otherwise.
pub const DEFAULT_ID_KEY: &str = "id";

/// Describes one entity type served by the backend.
pub trait Resource {
    /// The flat record the table and form work with.
    type Record: Record + Clone + Default + Debug + PartialEq + Serialize;
    /// The record as returned by the backend.
    type Wire: DeserializeOwned;
    /// The body of `POST /create`.
    type CreatePayload: Serialize;
    /// The body of `PUT /update/{id}`.
    type UpdatePayload: Serialize;

    /// Path segment under `/api/v1`, e.g. `"customers"`.
    const BASE_PATH: &'static str;
    /// Singular noun used in messages and in the get-by-id path.
    const SINGULAR: &'static str;
    /// Plural noun used in messages.
    const PLURAL: &'static str;
    /// Whether list requests accept a `role` filter.
    const ROLE_FILTER: bool = false;

    /// Flattens a backend record.
    fn from_wire(wire: Self::Wire) -> Self::Record;
    /// Builds the create body.
    fn create_payload(record: &Self::Record) -> Self::CreatePayload;
    /// Builds the update body.
    fn update_payload(record: &Self::Record) -> Self::UpdatePayload;
    /// Form fields, in display order.
    fn fields() -> Vec<FieldDescriptor>;
    /// Table columns, in display order.
    fn columns() -> Vec<ColumnDescriptor>;
}

/// Reads the identifier of `record` from its `id` field.
pub fn record_id<T: Record>(record: &T) -> Option<i64> {
    record.get(DEFAULT_ID_KEY).as_ref().and_then(FieldValue::as_id)
}

/// Filters for list requests. Empty filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Free-text search.
    pub search: Option<String>,
    /// Role filter; only sent for resources that support it.
    pub role: Option<String>,
}

impl ListQuery {
    /// A query with only a search term.
    pub fn search(search: &str) -> Self {
        Self {
            search: Some(search.to_string()),
            role: None,
        }
    }

    /// The query string pairs for a resource.
    pub fn pairs(&self, role_filter: bool) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search", search.to_string()));
        }
        if role_filter
            && let Some(role) = self.role.as_deref().map(str::trim)
            && !role.is_empty()
        {
            pairs.push(("role", role.to_string()));
        }
        pairs
    }
}

/// REST operations for one resource.
#[derive(Debug, Clone)]
pub struct ResourceClient<R> {
    client: ShayaClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    /// Wraps a shared HTTP client.
    pub fn new(client: ShayaClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Lists records matching `query`.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<R::Record>, ApiError> {
        let path = format!("{}/get", R::BASE_PATH);
        let operation = format!("Failed to list {}", R::PLURAL);
        let wire: Vec<R::Wire> = self
            .client
            .get(&path, &query.pairs(R::ROLE_FILTER), &operation)
            .await?;
        Ok(wire.into_iter().map(R::from_wire).collect())
    }

    /// The shared HTTP client.
    pub fn http(&self) -> &ShayaClient {
        &self.client
    }

    /// Fetches one record by identifier.
    pub async fn get(&self, id: i64) -> Result<R::Record, ApiError> {
        let path = format!("{}/get/{}/{}", R::BASE_PATH, R::SINGULAR, id);
        let operation = format!("Failed to load {}", R::SINGULAR);
        let wire: R::Wire = self.client.get(&path, &[], &operation).await?;
        Ok(R::from_wire(wire))
    }

    /// Creates `record` and returns the stored version.
    pub async fn create(&self, record: &R::Record) -> Result<R::Record, ApiError> {
        let path = format!("{}/create", R::BASE_PATH);
        let operation = format!("Failed to create {}", R::SINGULAR);
        let wire: R::Wire = self
            .client
            .post(&path, &R::create_payload(record), &operation)
            .await?;
        let created = R::from_wire(wire);
        tracing::info!(resource = R::PLURAL, id = ?record_id(&created), "created");
        Ok(created)
    }

    /// Updates the record identified by its `id` field.
    pub async fn update(&self, record: &R::Record) -> Result<R::Record, ApiError> {
        let id = record_id(record).ok_or(ApiError::MissingId)?;
        let path = format!("{}/update/{}", R::BASE_PATH, id);
        let operation = format!("Failed to update {}", R::SINGULAR);
        let wire: R::Wire = self
            .client
            .put(&path, &R::update_payload(record), &operation)
            .await?;
        tracing::info!(resource = R::PLURAL, id, "updated");
        Ok(R::from_wire(wire))
    }

    /// Deletes the record with identifier `id`.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/delete/{}", R::BASE_PATH, id);
        let operation = format!("Failed to delete {}", R::SINGULAR);
        self.client.delete(&path, &operation).await?;
        tracing::info!(resource = R::PLURAL, id, "deleted");
        Ok(())
    }
}
