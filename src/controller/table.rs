//! Contract between a list controller and the table that renders it.
//!
//! The table owns presentation data only: columns with caller-supplied render
//! functions, per-row and bulk actions, and the row selection. User input is
//! turned into [`TableEvent`]s which map 1:1 onto controller operations.

use std::collections::BTreeSet;

use crate::controller::ListSnapshot;
use crate::domain::query::{FilterValue, Filters, Query};
use crate::domain::types::SortDirection;
use crate::pagination::page_window;

type RenderFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type RowActionsFn<T> = Box<dyn Fn(&T) -> Vec<RowAction> + Send + Sync>;

/// Input raised by the table, mirroring the controller's mutation operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    Search(String),
    Filters(Filters),
    Filter { key: String, value: FilterValue },
    ClearFilter(String),
    ToggleFilter { key: String, value: String },
    Sort { key: String, direction: SortDirection },
    ClearSort,
    Page(i64),
    PageSize(u32),
    Refresh,
}

pub struct Column<T> {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    render: RenderFn<T>,
}

impl<T> Column<T> {
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        render: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            render: Box::new(render),
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn render(&self, record: &T) -> String {
        (self.render)(record)
    }
}

pub struct RowAction {
    pub label: String,
    on_click: Box<dyn Fn() + Send + Sync>,
}

impl RowAction {
    pub fn new(label: impl Into<String>, on_click: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Box::new(on_click),
        }
    }

    pub fn click(&self) {
        (self.on_click)()
    }
}

pub struct BulkAction {
    pub label: String,
    on_click: Box<dyn Fn(&[String]) + Send + Sync>,
}

impl BulkAction {
    pub fn new(
        label: impl Into<String>,
        on_click: impl Fn(&[String]) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            on_click: Box::new(on_click),
        }
    }

    pub fn run(&self, selected_ids: &[String]) {
        (self.on_click)(selected_ids)
    }
}

/// Ids of the rows picked for a bulk action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    /// Selects `id`, or deselects it when already selected.
    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(ids.into_iter().map(Into::into));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    /// Direction when this column holds the active sort.
    pub sorted: Option<SortDirection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub actions: Vec<String>,
}

/// Everything a renderer needs to draw one frame of the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub page: u32,
    pub pages: Vec<Option<usize>>,
    pub total_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct Table<T> {
    columns: Vec<Column<T>>,
    row_id: RenderFn<T>,
    row_actions: Option<RowActionsFn<T>>,
    bulk_actions: Vec<BulkAction>,
}

impl<T> Table<T> {
    pub fn new(row_id: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            columns: Vec::new(),
            row_id: Box::new(row_id),
            row_actions: None,
            bulk_actions: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn row_actions(
        mut self,
        actions: impl Fn(&T) -> Vec<RowAction> + Send + Sync + 'static,
    ) -> Self {
        self.row_actions = Some(Box::new(actions));
        self
    }

    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn bulk_actions(&self) -> &[BulkAction] {
        &self.bulk_actions
    }

    pub fn row_id(&self, record: &T) -> String {
        (self.row_id)(record)
    }

    pub fn actions_for(&self, record: &T) -> Vec<RowAction> {
        self.row_actions
            .as_ref()
            .map(|actions| actions(record))
            .unwrap_or_default()
    }

    /// Sort event for a header click: ascending first, then flipping.
    /// Clicks on non-sortable or unknown columns raise nothing.
    pub fn header_clicked(&self, key: &str, query: &Query) -> Option<TableEvent> {
        let column = self.columns.iter().find(|c| c.key == key)?;
        if !column.sortable {
            return None;
        }
        let direction = match &query.sort {
            Some(sort) if sort.key == key => sort.direction.toggled(),
            _ => SortDirection::Asc,
        };
        Some(TableEvent::Sort {
            key: key.to_string(),
            direction,
        })
    }

    /// Runs the bulk action labelled `label` over the selected rows.
    ///
    /// Returns `false` when no such action exists or nothing is selected.
    pub fn run_bulk_action(&self, label: &str, selection: &Selection) -> bool {
        if selection.is_empty() {
            return false;
        }
        match self.bulk_actions.iter().find(|a| a.label == label) {
            Some(action) => {
                action.run(&selection.ids());
                true
            }
            None => false,
        }
    }

    pub fn view(&self, snapshot: &ListSnapshot<T>, selection: &Selection) -> TableView {
        let headers = self
            .columns
            .iter()
            .map(|column| HeaderView {
                key: column.key.clone(),
                header: column.header.clone(),
                sortable: column.sortable,
                sorted: snapshot
                    .query
                    .sort
                    .as_ref()
                    .filter(|sort| sort.key == column.key)
                    .map(|sort| sort.direction),
            })
            .collect();

        let rows = snapshot
            .items
            .iter()
            .map(|record| {
                let id = self.row_id(record);
                RowView {
                    cells: self.columns.iter().map(|c| c.render(record)).collect(),
                    selected: selection.contains(&id),
                    actions: self
                        .actions_for(record)
                        .into_iter()
                        .map(|action| action.label)
                        .collect(),
                    id,
                }
            })
            .collect();

        let page = snapshot.query.page.get();

        TableView {
            headers,
            rows,
            page,
            pages: page_window(snapshot.total_pages, page as usize),
            total_count: snapshot.total_count,
            loading: snapshot.loading,
            error: snapshot.error.as_ref().map(|e| e.message().to_string()),
        }
    }
}
