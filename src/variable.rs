//! Variable query parsing
//!
//! Dashboard variables are populated by one of three queries:
//!
//! ```text
//! $griddb_container_list
//! $griddb_column_list(<container>)
//! $griddb_query_data(<container>, <col1>+<col2>+..., <tql>)
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{TqlError, TqlResult};

const CONTAINER_LIST: &str = "$griddb_container_list";

/// A parsed variable query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VariableQuery {
    /// All containers in the database
    #[serde(rename = "CONTAINERS")]
    ContainerList,
    /// All columns of one container
    #[serde(rename = "COLUMNS")]
    ColumnList { container: String },
    /// Selected columns of a TQL result
    #[serde(rename = "DATA")]
    DataQuery {
        container: String,
        columns: Vec<String>,
        tql: String,
    },
}

fn column_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$griddb_column_list\((\w*)\)$").expect("column list pattern compiles")
    })
}

fn query_data_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$griddb_query_data\(([^,]*),([^,]*),(.*)\)$")
            .expect("query data pattern compiles")
    })
}

/// Parse a variable query definition
pub fn parse_variable_query(text: &str) -> TqlResult<VariableQuery> {
    let query = text.trim();

    if query == CONTAINER_LIST {
        return Ok(VariableQuery::ContainerList);
    }

    if let Some(caps) = column_list_pattern().captures(query) {
        let container = caps[1].trim();
        if container.is_empty() {
            return Err(invalid("Container name must not be empty"));
        }
        return Ok(VariableQuery::ColumnList {
            container: container.to_string(),
        });
    }

    if let Some(caps) = query_data_pattern().captures(query) {
        let tql = caps[3].trim();
        if tql.is_empty() {
            return Err(invalid("TQL statement must not be empty"));
        }

        let container = caps[1].trim();
        if container.is_empty() {
            return Err(invalid("Container name must not be empty"));
        }

        let columns = parse_columns(&caps[2])?;
        return Ok(VariableQuery::DataQuery {
            container: container.to_string(),
            columns,
            tql: tql.to_string(),
        });
    }

    Err(invalid(
        "Query is wrong format. Please choose one of three formats below:\
         \n1. $griddb_container_list\
         \n2. $griddb_column_list({container name})\
         \n3. $griddb_query_data({container name}, {columns}, {TQL})",
    ))
}

/// Split `a+b+a` into `[a, b]`, keeping first-seen order
fn parse_columns(segment: &str) -> TqlResult<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();

    for column in segment.split('+').map(str::trim) {
        if column.is_empty() {
            return Err(invalid("Column name must not be empty"));
        }
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }

    Ok(columns)
}

fn invalid(message: &str) -> TqlError {
    TqlError::InvalidVariableQuery(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_list() {
        assert_eq!(
            parse_variable_query("  $griddb_container_list ").unwrap(),
            VariableQuery::ContainerList
        );
    }

    #[test]
    fn test_column_list() {
        assert_eq!(
            parse_variable_query("$griddb_column_list(mytable)").unwrap(),
            VariableQuery::ColumnList {
                container: "mytable".to_string()
            }
        );
    }

    #[test]
    fn test_column_list_empty_container() {
        let err = parse_variable_query("$griddb_column_list()").unwrap_err();
        assert_eq!(
            err,
            TqlError::InvalidVariableQuery("Container name must not be empty".to_string())
        );
    }

    #[test]
    fn test_query_data_dedupes_columns() {
        let parsed = parse_variable_query("$griddb_query_data(c1, colA+colB+colA, select *)").unwrap();
        assert_eq!(
            parsed,
            VariableQuery::DataQuery {
                container: "c1".to_string(),
                columns: vec!["colA".to_string(), "colB".to_string()],
                tql: "select *".to_string(),
            }
        );
    }

    #[test]
    fn test_query_data_tql_keeps_commas() {
        let parsed = parse_variable_query(
            "$griddb_query_data(c1, a, select * from c1 where x in (1, 2))",
        )
        .unwrap();
        match parsed {
            VariableQuery::DataQuery { tql, .. } => {
                assert_eq!(tql, "select * from c1 where x in (1, 2)")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_query_data_empty_parts() {
        for text in [
            "$griddb_query_data(c1, a+ +b, select *)",
            "$griddb_query_data(c1, , select *)",
            "$griddb_query_data( , a, select *)",
            "$griddb_query_data(c1, a,  )",
        ] {
            assert!(
                matches!(parse_variable_query(text), Err(TqlError::InvalidVariableQuery(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_unknown_form_lists_all_forms() {
        let err = parse_variable_query("select * from c1").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("$griddb_container_list"));
        assert!(message.contains("$griddb_column_list"));
        assert!(message.contains("$griddb_query_data"));

        assert!(parse_variable_query("$griddb_column_list(my table)").is_err());
    }

    #[test]
    fn test_variable_query_json() {
        let json = serde_json::to_string(&VariableQuery::ColumnList {
            container: "c1".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"COLUMNS","container":"c1"}"#);

        let parsed: VariableQuery = serde_json::from_str(r#"{"type":"CONTAINERS"}"#).unwrap();
        assert_eq!(parsed, VariableQuery::ContainerList);
    }
}
