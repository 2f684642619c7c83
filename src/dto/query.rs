//! Transport representation of a [`Query`].
//!
//! Scalars travel as plain values; `filters` and `sort` travel as JSON
//! strings under their own keys so the payload stays a flat set of string
//! pairs usable as a query string. An empty search is always sent as
//! `search=`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::query::{Filters, Query, Sort};
use crate::domain::types::{Page, PageSize, TypeConstraintError};

#[derive(Debug, Error)]
pub enum QueryCodecError {
    #[error("invalid json in `{field}`: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid query string: {0}")]
    Form(String),

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

/// Flat, transport-agnostic form of a [`Query`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializedQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "empty_filters")]
    pub filters: String,
}

fn default_page() -> u32 {
    Page::FIRST.get()
}

fn default_page_size() -> u32 {
    PageSize::default().get()
}

fn empty_filters() -> String {
    "{}".to_string()
}

impl SerializedQuery {
    pub fn encode(query: &Query) -> Result<Self, QueryCodecError> {
        let filters = serde_json::to_string(&query.filters)
            .map_err(|source| QueryCodecError::Json {
                field: "filters",
                source,
            })?;
        let sort = query
            .sort
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|source| QueryCodecError::Json {
                field: "sort",
                source,
            })?;

        Ok(Self {
            search: query.search.clone(),
            sort,
            page: query.page.get(),
            page_size: query.page_size.get(),
            filters,
        })
    }

    /// Rebuilds the [`Query`]. Only the shape is checked, not filter meaning.
    pub fn decode(&self) -> Result<Query, QueryCodecError> {
        let filters: Filters = if self.filters.trim().is_empty() {
            Filters::new()
        } else {
            serde_json::from_str(&self.filters).map_err(|source| QueryCodecError::Json {
                field: "filters",
                source,
            })?
        };
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") | Some("null") => None,
            Some(raw) => Some(serde_json::from_str::<Sort>(raw).map_err(|source| {
                QueryCodecError::Json {
                    field: "sort",
                    source,
                }
            })?),
        };

        Ok(Query {
            search: self.search.clone(),
            filters,
            sort,
            page: Page::new(self.page)?,
            page_size: PageSize::new(self.page_size)?,
        })
    }

    /// Key/value pairs in wire order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("search", self.search.clone())];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs.push(("filters", self.filters.clone()));
        pairs
    }

    pub fn to_query_string(&self) -> Result<String, QueryCodecError> {
        serde_html_form::to_string(self).map_err(|e| QueryCodecError::Form(e.to_string()))
    }

    pub fn from_query_string(raw: &str) -> Result<Self, QueryCodecError> {
        serde_html_form::from_str(raw).map_err(|e| QueryCodecError::Form(e.to_string()))
    }
}

impl TryFrom<&Query> for SerializedQuery {
    type Error = QueryCodecError;

    fn try_from(query: &Query) -> Result<Self, Self::Error> {
        Self::encode(query)
    }
}
