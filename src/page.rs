//! The list-plus-modal page shared by every entity.
//!
//! A [`CrudPage`] owns the table buffer, the list filters and at most one open
//! [`FormModal`]. It turns the modal's [`FormAction`]s into API calls and
//! reloads the list after every mutation.

use crate::auth::SessionUser;
use crate::errors::ApiError;
use crate::form::{FormAction, FormMode, FormModal};
use crate::http_utils::ShayaClient;
use crate::resource::{ListQuery, Resource, ResourceClient, record_id};
use crate::table::TableView;

/// Why a page action did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The action needs an open modal.
    NoModal,
    /// No loaded record has this identifier.
    NotFound(i64),
    /// The session user may not perform the action.
    Forbidden(&'static str),
    /// The backend call failed.
    Api(ApiError),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoModal => write!(f, "No form is open"),
            Self::NotFound(id) => write!(f, "No record with id {}", id),
            Self::Forbidden(action) => write!(f, "Only administrators may {}", action),
            Self::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PageError {}

impl From<ApiError> for PageError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

/// Page state for one resource.
pub struct CrudPage<R: Resource> {
    client: ResourceClient<R>,
    table: TableView<R::Record>,
    query: ListQuery,
    modal: Option<FormModal<R::Record>>,
    admin: bool,
}

impl<R: Resource> CrudPage<R> {
    /// An empty page for a non-admin user.
    pub fn new(client: ShayaClient) -> Self {
        Self {
            client: ResourceClient::new(client),
            table: TableView::new(R::columns()),
            query: ListQuery::default(),
            modal: None,
            admin: false,
        }
    }

    /// A page configured for `user`.
    pub fn for_user(client: ShayaClient, user: &SessionUser) -> Self {
        Self::new(client).with_admin(user.is_admin())
    }

    /// Shows the edit action and allows deletes when `admin` is set.
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self.table.set_edit_action(admin);
        self
    }

    /// Whether edit and delete are allowed.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// The loaded records.
    pub fn table(&self) -> &TableView<R::Record> {
        &self.table
    }

    /// Mutable access for sorting and paging.
    pub fn table_mut(&mut self) -> &mut TableView<R::Record> {
        &mut self.table
    }

    /// The filters sent on the next load.
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Replaces the search filter; takes effect on the next load.
    pub fn set_search(&mut self, search: Option<&str>) {
        self.query.search = search.map(str::to_string);
    }

    /// Replaces the role filter; takes effect on the next load.
    pub fn set_role(&mut self, role: Option<&str>) {
        self.query.role = role.map(str::to_string);
    }

    /// The open form, if any.
    pub fn modal(&self) -> Option<&FormModal<R::Record>> {
        self.modal.as_ref()
    }

    /// Mutable access to the open form.
    pub fn modal_mut(&mut self) -> Option<&mut FormModal<R::Record>> {
        self.modal.as_mut()
    }

    /// Re-fetches the whole list with the current filters.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        let records = self.client.list(&self.query).await?;
        let count = records.len();
        self.table.set_data(records);
        tracing::debug!(resource = R::PLURAL, count, "loaded");
        Ok(count)
    }

    /// Opens the modal on an empty record.
    pub fn open_add(&mut self) -> &mut FormModal<R::Record> {
        self.modal.insert(FormModal::add(R::fields()))
    }

    /// Opens the modal on the loaded record with identifier `id`.
    pub fn open_edit(&mut self, id: i64) -> Result<&mut FormModal<R::Record>, PageError> {
        if !self.admin {
            return Err(PageError::Forbidden("edit records"));
        }
        let record = self
            .table
            .data()
            .iter()
            .find(|r| record_id(*r) == Some(id))
            .ok_or(PageError::NotFound(id))?;
        let modal = FormModal::edit_record(R::fields(), record).with_delete();
        Ok(self.modal.insert(modal))
    }

    /// Fetches the record with identifier `id` from the backend and opens
    /// the modal on it. The loaded list is not consulted.
    pub async fn fetch_edit(&mut self, id: i64) -> Result<&mut FormModal<R::Record>, PageError> {
        if !self.admin {
            return Err(PageError::Forbidden("edit records"));
        }
        let record = self.client.get(id).await?;
        let modal = FormModal::edit_record(R::fields(), &record).with_delete();
        Ok(self.modal.insert(modal))
    }

    /// Fetches one record without touching the list or the modal.
    pub async fn fetch(&self, id: i64) -> Result<R::Record, ApiError> {
        self.client.get(id).await
    }

    /// Closes the modal without saving.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Saves the modal: create or update, reload, close.
    ///
    /// On error the modal stays open with its buffer.
    pub async fn save(&mut self) -> Result<R::Record, PageError> {
        let modal = self.modal.as_ref().ok_or(PageError::NoModal)?;
        let mode = modal.mode();
        let FormAction::Save(record) = modal.save() else {
            return Err(PageError::NoModal);
        };
        let saved = match mode {
            FormMode::Add => self.client.create(&record).await?,
            FormMode::Edit => self.client.update(&record).await?,
        };
        self.load().await?;
        self.modal = None;
        Ok(saved)
    }

    /// Deletes the record in the modal, reloads, then closes.
    ///
    /// The modal closes even if the reload fails; a failed delete keeps it
    /// open.
    pub async fn delete(&mut self) -> Result<(), PageError> {
        if !self.admin {
            return Err(PageError::Forbidden("delete records"));
        }
        let modal = self.modal.as_ref().ok_or(PageError::NoModal)?;
        let Some(FormAction::Delete(id)) = modal.delete() else {
            return Err(PageError::Api(ApiError::MissingId));
        };
        let id = id.as_id().ok_or(ApiError::MissingId)?;
        self.client.delete(id).await?;
        if let Err(e) = self.load().await {
            tracing::warn!(resource = R::PLURAL, error = %e, "reload after delete failed");
        }
        self.modal = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farmers::Farmers;
    use crate::table::Cell;

    fn page(admin: bool) -> CrudPage<Farmers> {
        let client = ShayaClient::new("http://127.0.0.1:9").unwrap();
        CrudPage::new(client).with_admin(admin)
    }

    #[test]
    fn admin_sees_edit_action() {
        let mut admin = page(true);
        admin.table_mut().set_data(vec![Default::default()]);
        let rendered = admin.table().render();
        assert_eq!(rendered.rows[0].last(), Some(&Cell::EditAction));

        let mut viewer = page(false);
        viewer.table_mut().set_data(vec![Default::default()]);
        let rendered = viewer.table().render();
        assert_eq!(rendered.rows[0].last(), Some(&Cell::Empty));
    }

    #[test]
    fn edit_requires_admin_and_known_id() {
        let mut viewer = page(false);
        assert!(matches!(viewer.open_edit(1), Err(PageError::Forbidden(_))));

        let mut admin = page(true);
        assert!(matches!(admin.open_edit(1), Err(PageError::NotFound(1))));
    }

    #[test]
    fn add_and_close() {
        let mut page = page(false);
        assert_eq!(page.open_add().title(), "Agregar elemento");
        assert!(page.modal().is_some());
        page.close_modal();
        assert!(page.modal().is_none());
    }

    #[tokio::test]
    async fn save_without_modal_fails() {
        let mut page = page(true);
        assert_eq!(page.save().await.unwrap_err(), PageError::NoModal);
        assert_eq!(page.delete().await.unwrap_err(), PageError::NoModal);
    }
}
