//! Data Transfer Objects
//!
//! Panel targets coming in from the dashboard and the TQL requests sent to
//! the GridDB web API. Both are serialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::macros::ALL;
use crate::query::QueryState;

// ============================================
// TARGET DTOs
// ============================================

/// GridDB container kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "COLLECTION", alias = "collection")]
    Collection,
    #[serde(rename = "TIME_SERIES", alias = "time_series")]
    TimeSeries,
}

/// One panel query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Editor state rendered into TQL
    #[serde(flatten)]
    pub query: QueryState,
    /// Hidden targets are never sent
    #[serde(default)]
    pub hide: bool,
    /// Display name for the resulting series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Columns returned to the panel
    #[serde(default)]
    pub view_columns: Vec<String>,
    /// Kind of the selected container, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<ContainerType>,
}

impl Target {
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn view_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn container_type(mut self, container_type: ContainerType) -> Self {
        self.container_type = Some(container_type);
        self
    }

    pub fn hidden(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }

    /// Whether the view columns ask for every column
    pub fn selects_all_columns(&self) -> bool {
        self.view_columns
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(ALL))
    }
}

// ============================================
// REQUEST DTOs
// ============================================

/// Body entry of the TQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TqlRequest {
    /// Container to run against
    pub name: String,
    /// Fully expanded TQL statement
    pub stmt: String,
    /// Columns to return; `null` for all
    pub columns: Option<Vec<String>>,
}

impl TqlRequest {
    pub fn new(name: impl Into<String>, stmt: impl Into<String>, columns: Option<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            stmt: stmt.into(),
            columns,
        }
    }
}
