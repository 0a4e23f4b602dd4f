//! Declarative field and column descriptors.
//!
//! Each entity ships two independent lists: the [`FieldDescriptor`]s that
//! drive its form modal and the [`ColumnDescriptor`]s that drive its table.
//! Both name record fields by accessor; [`validate_fields`] and
//! [`validate_columns`] check those names against the record type.

use serde::{Deserialize, Serialize};

use crate::{FieldValue, Record, RecordError};

/// The id of the synthetic column that hosts the row edit action.
pub const EDIT_COLUMN_ID: &str = "edit";

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the operator.
    pub label: String,
    /// Value stored in the record.
    pub value: FieldValue,
}

impl SelectOption {
    /// Creates an option whose value is text.
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: FieldValue::from(value),
        }
    }
}

/// The control kind of a form field.
///
/// Only `Select` carries data beyond the accessor and header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Masked input with a visibility toggle.
    Password,
    /// Closed choice among fixed options.
    Select {
        /// The allowed choices, in display order.
        options: Vec<SelectOption>,
    },
    /// Multi-line text input.
    TextArea,
}

/// Describes one editable field of an entity form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// The record field this input reads and writes.
    pub accessor: &'static str,
    /// The label shown next to the input.
    pub header: &'static str,
    /// How the field is rendered.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// A plain text field.
    pub fn text(accessor: &'static str, header: &'static str) -> Self {
        Self {
            accessor,
            header,
            kind: FieldKind::Text,
        }
    }

    /// A masked password field.
    pub fn password(accessor: &'static str, header: &'static str) -> Self {
        Self {
            accessor,
            header,
            kind: FieldKind::Password,
        }
    }

    /// A closed-choice field.
    pub fn select(
        accessor: &'static str,
        header: &'static str,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            accessor,
            header,
            kind: FieldKind::Select { options },
        }
    }

    /// A multi-line text field.
    pub fn textarea(accessor: &'static str, header: &'static str) -> Self {
        Self {
            accessor,
            header,
            kind: FieldKind::TextArea,
        }
    }

    /// The options of a select field, or an empty slice.
    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }
}

/// Describes one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescriptor {
    /// Shows the value of a record field.
    Data {
        /// The record field shown in this column.
        accessor: &'static str,
        /// The column title.
        header: &'static str,
    },
    /// Carries no data; hosts the row edit action.
    Edit {
        /// The column title.
        header: &'static str,
    },
}

impl ColumnDescriptor {
    /// A column showing the field `accessor`.
    pub fn data(accessor: &'static str, header: &'static str) -> Self {
        Self::Data { accessor, header }
    }

    /// The synthetic edit-action column.
    pub fn edit(header: &'static str) -> Self {
        Self::Edit { header }
    }

    /// The column id: the accessor for data columns, `"edit"` otherwise.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Data { accessor, .. } => *accessor,
            Self::Edit { .. } => EDIT_COLUMN_ID,
        }
    }

    /// The column title.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Data { header, .. } | Self::Edit { header } => *header,
        }
    }
}

/// Checks that every field accessor names a field of `T`.
pub fn validate_fields<T: Record>(fields: &[FieldDescriptor]) -> Result<(), RecordError> {
    for field in fields {
        if !T::has_field(field.accessor) {
            return Err(RecordError::UnknownField(field.accessor.to_string()));
        }
    }
    Ok(())
}

/// Checks that every data column accessor names a field of `T`.
pub fn validate_columns<T: Record>(columns: &[ColumnDescriptor]) -> Result<(), RecordError> {
    for column in columns {
        if let ColumnDescriptor::Data { accessor, .. } = column
            && !T::has_field(accessor)
        {
            return Err(RecordError::UnknownField(accessor.to_string()));
        }
    }
    Ok(())
}
