//! Annotation queries
//!
//! A point annotation marks single instants read from one time column. A
//! region annotation spans a start column to an end column.

use serde::{Deserialize, Serialize};

use crate::error::{TqlError, TqlResult};

/// Annotation definition as saved on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotationQuery {
    /// TQL statement, may use macros
    pub query: String,
    /// Container the statement runs against
    pub container: String,
    /// Time column of point annotations
    pub time_column: String,
    /// Start column of region annotations
    pub start_time_column: String,
    /// End column of region annotations
    pub end_time_column: String,
    /// Column holding the annotation text
    pub text_column: String,
    /// Comma-separated tag columns
    pub tags_column: String,
    /// Region instead of point annotation
    #[serde(alias = "isRegionsAnnotation")]
    pub is_regions: bool,
}

impl AnnotationQuery {
    /// Reject definitions that cannot produce a request
    pub fn validate(&self) -> TqlResult<()> {
        if self.query.trim().is_empty() {
            return Err(missing("Query missing in annotation definition"));
        }
        if self.container.trim().is_empty() {
            return Err(missing("Query missing in container name"));
        }

        if !self.is_regions {
            if self.time_column.trim().is_empty() {
                return Err(missing("Query missing in time column"));
            }
            return Ok(());
        }

        if self.start_time_column.trim().is_empty() {
            return Err(missing("Query missing in start time column"));
        }
        if self.end_time_column.trim().is_empty() {
            return Err(missing("Query missing in end time column"));
        }
        if self.start_time_column.trim() == self.end_time_column.trim() {
            return Err(missing(
                "Start time column must be different from end time column",
            ));
        }
        Ok(())
    }

    /// Time columns handed to macro expansion
    pub fn time_columns(&self) -> Vec<String> {
        if self.is_regions {
            vec![
                self.start_time_column.trim().to_string(),
                self.end_time_column.trim().to_string(),
            ]
        } else {
            vec![self.time_column.trim().to_string()]
        }
    }

    /// Columns to request: time (or start), text, end, then tags
    pub fn selected_columns(&self) -> Vec<String> {
        let time = if self.is_regions {
            &self.start_time_column
        } else {
            &self.time_column
        };
        let end = if self.is_regions {
            self.end_time_column.as_str()
        } else {
            ""
        };

        let fixed = [time.as_str(), self.text_column.as_str(), end];
        let tags = self.tags_column.split(',');

        let mut columns: Vec<String> = Vec::new();
        for column in fixed.into_iter().chain(tags).map(str::trim) {
            if !column.is_empty() && !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
        columns
    }
}

fn missing(message: &str) -> TqlError {
    TqlError::InvalidQuery(message.to_string())
}
