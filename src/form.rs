//! The form modal used to add and edit records.
//!
//! A [`FormModal`] owns a working copy of one record and a list of field
//! descriptors. It never talks to the backend. Its terminal operations return
//! a [`FormAction`] that the owning page carries out.

use std::collections::BTreeSet;

use crate::errors::ValidationError;
use crate::resource::DEFAULT_ID_KEY;
use crate::schema::{FieldDescriptor, FieldKind, SelectOption};
use crate::{FieldValue, Record, RecordError};

/// Whether the modal creates or edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Adding a new record.
    Add,
    /// Editing an existing record.
    Edit,
}

/// What the operator asked the page to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction<T> {
    /// Persist the whole buffer.
    Save(T),
    /// Delete the record with this identifier.
    Delete(FieldValue),
    /// Dismiss the modal without saving.
    Close,
}

/// The input widget for one field, seeded from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Single-line text.
    TextInput,
    /// Password input; `masked` until visibility is toggled.
    PasswordInput {
        /// True while the characters are hidden.
        masked: bool,
    },
    /// Closed choice.
    Select {
        /// The allowed choices.
        options: Vec<SelectOption>,
    },
    /// Multi-line text.
    TextArea,
}

/// One rendered form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// The record field this control edits.
    pub accessor: &'static str,
    /// Label shown above the control.
    pub label: &'static str,
    /// Hint shown in the empty control.
    pub placeholder: String,
    /// The widget.
    pub kind: ControlKind,
    /// The current buffer value.
    pub value: FieldValue,
}

/// Working state of the add/edit modal.
#[derive(Debug, Clone)]
pub struct FormModal<T> {
    fields: Vec<FieldDescriptor>,
    mode: FormMode,
    seed: T,
    buffer: T,
    id_key: &'static str,
    delete_enabled: bool,
    revealed: BTreeSet<&'static str>,
}

impl<T: Record + Clone + Default + PartialEq> FormModal<T> {
    /// Opens the modal on an empty record.
    pub fn add(fields: Vec<FieldDescriptor>) -> Self {
        Self::open(fields, FormMode::Add, T::default())
    }

    /// Opens the modal on a copy of `record`.
    pub fn edit_record(fields: Vec<FieldDescriptor>, record: &T) -> Self {
        Self::open(fields, FormMode::Edit, record.clone())
    }

    fn open(fields: Vec<FieldDescriptor>, mode: FormMode, seed: T) -> Self {
        Self {
            fields,
            mode,
            buffer: seed.clone(),
            seed,
            id_key: DEFAULT_ID_KEY,
            delete_enabled: false,
            revealed: BTreeSet::new(),
        }
    }

    /// Offers the delete action in edit mode.
    pub fn with_delete(mut self) -> Self {
        self.delete_enabled = true;
        self
    }

    /// Reads the identifier from `id_key` instead of `"id"`.
    pub fn with_id_key(mut self, id_key: &'static str) -> Self {
        self.id_key = id_key;
        self
    }

    /// Add or edit.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The field schema.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The record as currently edited.
    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    /// "Editar elemento" or "Agregar elemento".
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Edit => "Editar elemento",
            FormMode::Add => "Agregar elemento",
        }
    }

    /// True when delete would produce an action.
    pub fn can_delete(&self) -> bool {
        self.mode == FormMode::Edit && self.delete_enabled
    }

    /// True when the buffer differs from what the modal opened with.
    pub fn is_dirty(&self) -> bool {
        self.buffer != self.seed
    }

    /// One control per field, in field order.
    pub fn controls(&self) -> Vec<Control> {
        self.fields
            .iter()
            .map(|field| Control {
                accessor: field.accessor,
                label: field.header,
                placeholder: format!("Ingrese {}", field.header.to_lowercase()),
                kind: match &field.kind {
                    FieldKind::Text => ControlKind::TextInput,
                    FieldKind::Password => ControlKind::PasswordInput {
                        masked: !self.revealed.contains(field.accessor),
                    },
                    FieldKind::Select { options } => ControlKind::Select {
                        options: options.clone(),
                    },
                    FieldKind::TextArea => ControlKind::TextArea,
                },
                value: self.buffer.get(field.accessor).unwrap_or(FieldValue::Null),
            })
            .collect()
    }

    /// Shows or hides the characters of a password field. Returns the new
    /// masked state, or `None` if `accessor` is not a password field.
    pub fn toggle_visibility(&mut self, accessor: &str) -> Option<bool> {
        let accessor = self
            .fields
            .iter()
            .find(|f| f.accessor == accessor && f.kind == FieldKind::Password)
            .map(|f| f.accessor)?;
        if self.revealed.remove(accessor) {
            Some(true)
        } else {
            self.revealed.insert(accessor);
            Some(false)
        }
    }

    /// Writes `input` into the buffer field `accessor`.
    pub fn edit(&mut self, accessor: &str, input: &str) -> Result<(), FormError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.accessor == accessor)
            .ok_or_else(|| RecordError::UnknownField(accessor.to_string()))?;
        let value = match &field.kind {
            FieldKind::Select { options } => options
                .iter()
                .find(|o| o.value.to_string() == input)
                .map(|o| o.value.clone())
                .ok_or_else(|| ValidationError {
                    field: accessor.to_string(),
                    value: input.to_string(),
                    reason: format!(
                        "expected one of: {}",
                        options
                            .iter()
                            .map(|o| o.value.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })?,
            _ => FieldValue::from(input),
        };
        self.buffer.set(accessor, value)?;
        Ok(())
    }

    /// Submits the whole buffer.
    pub fn save(&self) -> FormAction<T> {
        FormAction::Save(self.buffer.clone())
    }

    /// Requests deletion of the edited record, if allowed and it has an id.
    pub fn delete(&self) -> Option<FormAction<T>> {
        if !self.can_delete() {
            return None;
        }
        let id = self.seed.get(self.id_key)?;
        if id.is_blank() {
            return None;
        }
        Some(FormAction::Delete(id))
    }

    /// Dismisses the modal, dropping the buffer.
    pub fn close(self) -> FormAction<T> {
        FormAction::Close
    }
}

/// Why an edit was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The value is not allowed for the field.
    Validation(ValidationError),
    /// The accessor or value does not fit the record.
    Record(RecordError),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{}", e),
            Self::Record(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormError {}

impl From<ValidationError> for FormError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<RecordError> for FormError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, shaya_derive::Record)]
    struct Account {
        code: Option<i64>,
        name: String,
        secret: Option<String>,
        kind: String,
        notes: String,
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Nombre"),
            FieldDescriptor::password("secret", "Contraseña"),
            FieldDescriptor::select(
                "kind",
                "Tipo",
                vec![
                    SelectOption::new("Minorista", "Minorista"),
                    SelectOption::new("Mayorista", "Mayorista"),
                ],
            ),
            FieldDescriptor::textarea("notes", "Observación"),
        ]
    }

    fn existing() -> Account {
        Account {
            code: Some(12),
            name: "Ana".to_string(),
            kind: "Minorista".to_string(),
            ..Account::default()
        }
    }

    #[test]
    fn titles_follow_mode() {
        assert_eq!(FormModal::<Account>::add(fields()).title(), "Agregar elemento");
        assert_eq!(
            FormModal::edit_record(fields(), &existing()).title(),
            "Editar elemento"
        );
    }

    #[test]
    fn controls_carry_placeholders_and_kinds() {
        let modal = FormModal::edit_record(fields(), &existing());
        let controls = modal.controls();
        assert_eq!(controls.len(), 4);
        assert_eq!(controls[0].placeholder, "Ingrese nombre");
        assert_eq!(controls[0].value, FieldValue::from("Ana"));
        assert_eq!(controls[1].kind, ControlKind::PasswordInput { masked: true });
        assert!(matches!(controls[2].kind, ControlKind::Select { .. }));
        assert_eq!(controls[3].kind, ControlKind::TextArea);
        assert_eq!(controls[3].placeholder, "Ingrese observación");
    }

    #[test]
    fn password_visibility_toggles() {
        let mut modal = FormModal::<Account>::add(fields());
        assert_eq!(modal.toggle_visibility("secret"), Some(false));
        assert_eq!(
            modal.controls()[1].kind,
            ControlKind::PasswordInput { masked: false }
        );
        assert_eq!(modal.toggle_visibility("secret"), Some(true));
        assert_eq!(modal.toggle_visibility("name"), None);
    }

    #[test]
    fn edit_rejects_unknown_and_out_of_range() {
        let mut modal = FormModal::<Account>::add(fields());
        assert!(matches!(
            modal.edit("code", "3"),
            Err(FormError::Record(RecordError::UnknownField(_)))
        ));
        assert!(matches!(
            modal.edit("kind", "Mayoreo"),
            Err(FormError::Validation(_))
        ));
        modal.edit("kind", "Mayorista").unwrap();
        assert_eq!(modal.buffer().kind, "Mayorista");
    }

    #[test]
    fn save_submits_whole_buffer() {
        let mut modal = FormModal::edit_record(fields(), &existing());
        assert!(!modal.is_dirty());
        modal.edit("notes", "paga en efectivo").unwrap();
        assert!(modal.is_dirty());
        match modal.save() {
            FormAction::Save(account) => {
                assert_eq!(account.code, Some(12));
                assert_eq!(account.name, "Ana");
                assert_eq!(account.notes, "paga en efectivo");
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn delete_only_in_edit_mode_when_enabled() {
        assert_eq!(FormModal::<Account>::add(fields()).with_delete().delete(), None);
        assert_eq!(FormModal::edit_record(fields(), &existing()).delete(), None);

        let modal = FormModal::edit_record(fields(), &existing())
            .with_delete()
            .with_id_key("code");
        assert_eq!(modal.delete(), Some(FormAction::Delete(FieldValue::Number(12))));
    }

    #[test]
    fn close_discards() {
        let mut modal = FormModal::edit_record(fields(), &existing());
        modal.edit("name", "Otra").unwrap();
        assert_eq!(modal.close(), FormAction::Close);
    }
}
