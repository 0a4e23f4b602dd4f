//! Generic table model with tri-state sorting and pagination.
//!
//! A [`TableView`] renders any [`Record`] type from an ordered list of
//! [`ColumnDescriptor`]s. Sort and pagination state live here and nowhere
//! else; replacing the data keeps the sort and clamps the page.

use serde::Serialize;

use crate::schema::{ColumnDescriptor, EDIT_COLUMN_ID};
use crate::{FieldValue, Record};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Marker used by text renderers.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The column the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Id of the sorted column.
    pub column: &'static str,
    /// Current direction.
    pub direction: SortDirection,
}

/// The content of one rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// A field value rendered as text.
    Text(String),
    /// The row edit action.
    EditAction,
    /// Nothing.
    Empty,
}

/// A rendered column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    /// Column id.
    pub id: &'static str,
    /// Column title.
    pub label: &'static str,
    /// Whether clicking the header toggles sorting.
    pub sortable: bool,
    /// The direction this column is currently sorted in.
    pub sort: Option<SortDirection>,
}

/// The visible page of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    /// One header per column.
    pub headers: Vec<HeaderCell>,
    /// One row of cells per record on the current page.
    pub rows: Vec<Vec<Cell>>,
    /// Zero-based index of the current page.
    pub page_index: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Number of records across all pages.
    pub total_rows: usize,
}

/// Paginated, sortable view over a list of records.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    columns: Vec<ColumnDescriptor>,
    data: Vec<T>,
    order: Vec<usize>,
    sort: Option<SortState>,
    page_index: usize,
    page_size: usize,
    edit_action: bool,
}

impl<T: Record> TableView<T> {
    /// Creates an empty table with the default page size.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            data: Vec::new(),
            order: Vec::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            edit_action: false,
        }
    }

    /// Shows the edit action in the edit column when `enabled`.
    pub fn with_edit_action(mut self, enabled: bool) -> Self {
        self.edit_action = enabled;
        self
    }

    /// Enables or disables the edit action.
    pub fn set_edit_action(&mut self, enabled: bool) {
        self.edit_action = enabled;
    }

    /// The column descriptors.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Replaces the records, keeping the sort and clamping the page index.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.resort();
        self.page_index = self.page_index.min(self.page_count() - 1);
    }

    /// The records in their original order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current sort, if any.
    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Cycles the sort of `column_id` through ascending, descending and
    /// unsorted. A different column starts at ascending. Unknown columns and
    /// the edit column are ignored. Returns the resulting sort.
    pub fn toggle_sort(&mut self, column_id: &str) -> Option<SortState> {
        let Some(column) = self.sortable_column(column_id) else {
            return self.sort;
        };
        self.sort = match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => Some(SortState {
                column,
                direction: SortDirection::Descending,
            }),
            Some(SortState {
                column: current,
                direction: SortDirection::Descending,
            }) if current == column => None,
            _ => Some(SortState {
                column,
                direction: SortDirection::Ascending,
            }),
        };
        self.page_index = 0;
        self.resort();
        self.sort
    }

    /// Sorts by `column_id` in `direction`, or clears the sort with `None`.
    pub fn set_sort(&mut self, column_id: &str, direction: Option<SortDirection>) {
        self.sort = match (self.sortable_column(column_id), direction) {
            (Some(column), Some(direction)) => Some(SortState { column, direction }),
            _ => None,
        };
        self.page_index = 0;
        self.resort();
    }

    fn sortable_column(&self, column_id: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|c| matches!(c, ColumnDescriptor::Data { .. }) && c.id() == column_id)
            .map(|c| c.id())
    }

    fn resort(&mut self) {
        self.order = (0..self.data.len()).collect();
        let Some(sort) = self.sort else {
            return;
        };
        let keys: Vec<FieldValue> = self
            .data
            .iter()
            .map(|record| record.get(sort.column).unwrap_or(FieldValue::Null))
            .collect();
        // sort_by is stable, so equal keys keep their original order.
        match sort.direction {
            SortDirection::Ascending => self.order.sort_by(|a, b| keys[*a].cmp(&keys[*b])),
            SortDirection::Descending => self.order.sort_by(|a, b| keys[*b].cmp(&keys[*a])),
        }
    }

    /// All records in display order.
    pub fn rows(&self) -> impl Iterator<Item = &T> {
        self.order.iter().map(|i| &self.data[*i])
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changes the page size, clamping the page index. Zero is rejected.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            return false;
        }
        self.page_size = page_size;
        self.page_index = self.page_index.min(self.page_count() - 1);
        true
    }

    /// Zero-based index of the current page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Number of pages; an empty table has one empty page.
    pub fn page_count(&self) -> usize {
        self.data.len().div_ceil(self.page_size).max(1)
    }

    /// Jumps to `page_index`, clamped to the last page.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index.min(self.page_count() - 1);
    }

    /// Whether a previous page exists.
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    /// Whether a next page exists.
    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Moves to the previous page; no-op on the first page.
    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.page_index -= 1;
        }
    }

    /// Moves to the next page; no-op on the last page.
    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.page_index += 1;
        }
    }

    /// Records on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&T> {
        self.rows()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Renders one cell.
    pub fn cell(&self, record: &T, column: &ColumnDescriptor) -> Cell {
        match column {
            ColumnDescriptor::Data { accessor, .. } => match record.get(accessor) {
                Some(value) => Cell::Text(value.to_string()),
                None => Cell::Empty,
            },
            ColumnDescriptor::Edit { .. } if self.edit_action => Cell::EditAction,
            ColumnDescriptor::Edit { .. } => Cell::Empty,
        }
    }

    /// Renders the headers and the current page.
    pub fn render(&self) -> RenderedTable {
        let headers = self
            .columns
            .iter()
            .map(|column| {
                let sortable = column.id() != EDIT_COLUMN_ID;
                HeaderCell {
                    id: column.id(),
                    label: column.header(),
                    sortable,
                    sort: self
                        .sort
                        .filter(|s| sortable && s.column == column.id())
                        .map(|s| s.direction),
                }
            })
            .collect();
        let rows = self
            .page_rows()
            .into_iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|column| self.cell(record, column))
                    .collect()
            })
            .collect();
        RenderedTable {
            headers,
            rows,
            page_index: self.page_index,
            page_count: self.page_count(),
            total_rows: self.data.len(),
        }
    }
}
