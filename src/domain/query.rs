//! The canonical description of which slice of a collection a list view shows.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::types::{Page, PageSize, SortDirection};

/// Value of a single filter dimension.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(BTreeSet<String>),
}

impl FilterValue {
    /// Returns `true` when `value` is selected by this filter.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            FilterValue::One(v) => v == value,
            FilterValue::Many(values) => values.contains(value),
        }
    }

    /// Iterates over every selected value.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let (one, many) = match self {
            FilterValue::One(v) => (Some(v.as_str()), None),
            FilterValue::Many(values) => (None, Some(values.iter().map(String::as_str))),
        };
        one.into_iter().chain(many.into_iter().flatten())
    }

    fn is_empty(&self) -> bool {
        match self {
            FilterValue::One(_) => false,
            FilterValue::Many(values) => values.is_empty(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

/// Active filters keyed by dimension. An absent key means no constraint.
pub type Filters = BTreeMap<String, FilterValue>;

/// The single active sort key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

/// Search, filters, sort and pagination of one list view.
///
/// Transitions are pure: each `with_*` method returns the next query and
/// enforces the page reset rules, so the controller only has to compare the
/// result with the current value to decide whether a fetch is needed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub filters: Filters,
    pub sort: Option<Sort>,
    pub page: Page,
    pub page_size: PageSize,
}

impl Query {
    /// Merges caller-supplied defaults over the built-in ones.
    pub fn from_initial(initial: InitialQuery) -> Self {
        let defaults = Query::default();
        let page = initial
            .page
            .and_then(|p| Page::new(p).ok())
            .unwrap_or(defaults.page);
        let page_size = match initial.page_size.map(PageSize::new) {
            Some(Ok(size)) => size,
            Some(Err(err)) => {
                log::warn!("Ignoring initial page size: {err}");
                defaults.page_size
            }
            None => defaults.page_size,
        };

        Self {
            search: initial.search.unwrap_or(defaults.search),
            filters: initial.filters.unwrap_or(defaults.filters),
            sort: initial.sort.or(defaults.sort),
            page,
            page_size,
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: Page::FIRST,
            ..self.clone()
        }
    }

    /// Replaces every filter. Multi-select filters with no values are dropped.
    pub fn with_filters(&self, filters: Filters) -> Self {
        Self {
            filters: filters.into_iter().filter(|(_, v)| !v.is_empty()).collect(),
            page: Page::FIRST,
            ..self.clone()
        }
    }

    pub fn with_filter(&self, key: impl Into<String>, value: FilterValue) -> Self {
        let mut filters = self.filters.clone();
        filters.insert(key.into(), value);
        self.with_filters(filters)
    }

    pub fn without_filter(&self, key: &str) -> Self {
        let mut filters = self.filters.clone();
        filters.remove(key);
        self.with_filters(filters)
    }

    /// Adds `value` to a multi-select filter, or removes it when present.
    pub fn with_filter_toggled(&self, key: &str, value: &str) -> Self {
        let mut selected: BTreeSet<String> = self
            .filters
            .get(key)
            .map(|v| v.values().map(str::to_string).collect())
            .unwrap_or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        let mut filters = self.filters.clone();
        filters.insert(key.to_string(), FilterValue::Many(selected));
        self.with_filters(filters)
    }

    pub fn with_sort(&self, sort: Option<Sort>) -> Self {
        Self {
            sort,
            page: Page::FIRST,
            ..self.clone()
        }
    }

    /// Moves to page `page`, clamping non-positive values to the first page.
    pub fn with_page(&self, page: i64) -> Self {
        Self {
            page: Page::clamped(page),
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, page_size: PageSize) -> Self {
        Self {
            page_size,
            page: Page::FIRST,
            ..self.clone()
        }
    }
}

/// Partial query supplied by a page on mount.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InitialQuery {
    pub search: Option<String>,
    pub filters: Option<Filters>,
    pub sort: Option<Sort>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
