//! Filter, sort, pagination, and selection state for one table.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES};
use crate::models::PatientRecord;

/// Value a column contributes to sorting.
///
/// Text compares case-insensitively; the duration-derived session column
/// contributes numbers and compares by elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Empty,
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Less,
            (_, Self::Empty) => Ordering::Greater,
            // Mixed types compare by their textual form
            (Self::Number(a), Self::Text(b)) => a.to_string().to_lowercase().cmp(&b.to_lowercase()),
            (Self::Text(a), Self::Number(b)) => a.to_lowercase().cmp(&b.to_string().to_lowercase()),
        }
    }
}

/// A row the table can render: identity plus per-column values.
pub trait TableRow {
    fn row_id(&self) -> &str;

    /// Display text for a column key.
    fn cell_text(&self, key: &str) -> Option<String>;

    /// Sort key for a column; defaults to the display text.
    fn sort_value(&self, key: &str) -> SortValue {
        match self.cell_text(key) {
            Some(text) => SortValue::Text(text),
            None => SortValue::Empty,
        }
    }

    /// The status the exact-match status filter applies to.
    fn status_text(&self) -> Option<String> {
        None
    }
}

impl TableRow for PatientRecord {
    fn row_id(&self) -> &str {
        &self.patient_id
    }

    fn cell_text(&self, key: &str) -> Option<String> {
        self.field_text(key)
    }

    fn status_text(&self) -> Option<String> {
        Some(self.call_status.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// Header checkbox state for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSelection {
    None,
    /// Some but not all visible rows selected — rendered indeterminate.
    Some,
    All,
}

/// Client-side table state over an array of fetched records.
///
/// Selection is keyed by row id and persists across filter and page
/// changes until explicitly toggled off or cleared.
pub struct TableState<R: TableRow> {
    records: Vec<R>,
    name_key: String,
    name_filter: String,
    status_filter: Option<String>,
    sort: Option<SortState>,
    page_size: usize,
    page_index: usize,
    selected: HashSet<String>,
}

impl<R: TableRow + Clone> TableState<R> {
    /// `name_key` designates the column the substring filter matches.
    pub fn new(name_key: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            name_key: name_key.into(),
            name_filter: String::new(),
            status_filter: None,
            sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            selected: HashSet::new(),
        }
    }

    // ── Records ─────────────────────────────────────────────

    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.clamp_page_index();
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Mutable record access for status merges and optimistic flips.
    /// Views are computed on demand, so in-place edits stay consistent.
    pub fn records_mut(&mut self) -> &mut Vec<R> {
        &mut self.records
    }

    // ── Filters ─────────────────────────────────────────────

    /// Case-insensitive substring filter on the designated name column.
    /// Resets pagination to the first page.
    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
        self.page_index = 0;
    }

    /// Exact-match filter on the status column. Resets to the first page.
    pub fn set_status_filter(&mut self, status: Option<String>) {
        self.status_filter = status;
        self.page_index = 0;
    }

    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    // ── Sorting ─────────────────────────────────────────────

    /// Header click: cycle unsorted → ascending → descending → unsorted.
    /// Only one sort column is active at a time.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some(s) if s.key == key => match s.direction {
                SortDirection::Ascending => Some(SortState {
                    key: key.to_string(),
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortState {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    // ── Derived views ───────────────────────────────────────

    /// Records passing both filters, in sort order.
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.name_filter.trim().to_lowercase();
        let mut rows: Vec<&R> = self
            .records
            .iter()
            .filter(|r| {
                if !needle.is_empty() {
                    let hit = r
                        .cell_text(&self.name_key)
                        .map(|v| v.to_lowercase().contains(&needle))
                        .unwrap_or(false);
                    if !hit {
                        return false;
                    }
                }
                if let Some(status) = &self.status_filter {
                    return r.status_text().as_deref() == Some(status.as_str());
                }
                true
            })
            .collect();

        if let Some(sort) = &self.sort {
            // Stable sort: equal keys keep their fetched order, so three
            // toggles restore the original arrangement.
            rows.sort_by(|a, b| {
                let ord = a.sort_value(&sort.key).compare(&b.sort_value(&sort.key));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    // ── Pagination ──────────────────────────────────────────

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Switch page size; values outside the offered choices are ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if PAGE_SIZE_CHOICES.contains(&size) {
            self.page_size = size;
            self.clamp_page_index();
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page_index();
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    fn clamp_page_index(&mut self) {
        let max = self.page_count().saturating_sub(1);
        if self.page_index > max {
            self.page_index = max;
        }
    }

    /// The current page of the filtered, sorted records.
    pub fn page(&self) -> Vec<&R> {
        self.filtered()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    // ── Selection ───────────────────────────────────────────

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle_select(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Header checkbox: select every row on the current page, or clear
    /// them all when the page is already fully selected. Never touches
    /// rows on other pages.
    pub fn toggle_select_page(&mut self) {
        let page_ids: Vec<String> = self.page().iter().map(|r| r.row_id().to_string()).collect();
        if page_ids.is_empty() {
            return;
        }
        if page_ids.iter().all(|id| self.selected.contains(id)) {
            for id in &page_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(page_ids);
        }
    }

    pub fn header_selection(&self) -> HeaderSelection {
        let page = self.page();
        if page.is_empty() {
            return HeaderSelection::None;
        }
        let selected = page.iter().filter(|r| self.selected.contains(r.row_id())).count();
        if selected == 0 {
            HeaderSelection::None
        } else if selected == page.len() {
            HeaderSelection::All
        } else {
            HeaderSelection::Some
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Full record objects for the selection, in fetched order. Bulk
    /// actions take these, not bare ids.
    pub fn selected_records(&self) -> Vec<R> {
        self.records
            .iter()
            .filter(|r| self.selected.contains(r.row_id()))
            .cloned()
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}
