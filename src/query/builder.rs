//! TQL rendering
//!
//! Turns a [`QueryState`] into TQL text. Clauses are produced in a fixed order:
//!
//! ```text
//! SELECT <cols> FROM <container>[ WHERE <conditions>[ AND <time bounds>]][ LIMIT n[ OFFSET m]]
//! ```
//!
//! Macros such as `$__timeFrom` are emitted unresolved; expansion happens
//! later in [`crate::macros::expand`].

use super::condition::render_condition;
use super::state::QueryState;
use crate::error::{TqlError, TqlResult};

/// Selection used when time sampling is enabled
const TIME_SAMPLING_SELECTION: &str = "$__timeSampling(*, $__interval)";

/// Render a query state into TQL
///
/// Raw-mode states return their text untouched.
pub fn render(state: &QueryState) -> TqlResult<String> {
    if state.raw_query {
        return Ok(state.raw_text.clone());
    }

    let limit = limit_clause(state)?;

    let mut tql = select_clause(state);
    tql.push_str(&where_clause(state));
    tql.push_str(&limit);

    tracing::trace!(tql = %tql, "Rendered builder query");
    Ok(tql)
}

fn select_clause(state: &QueryState) -> String {
    let selection = if state.time_sampling {
        TIME_SAMPLING_SELECTION
    } else {
        "*"
    };
    format!("SELECT {} FROM {}", selection, state.container.name())
}

fn where_clause(state: &QueryState) -> String {
    let mut clause = String::new();

    for (index, condition) in state.wheres.iter().enumerate() {
        if index == 0 {
            clause.push_str(" WHERE");
        } else {
            clause.push(' ');
            clause.push_str(&condition.connective.unwrap_or_default().to_string());
        }
        clause.push(' ');
        clause.push_str(&render_condition(condition));
    }

    if let Some(bounds) = time_bounds(state) {
        clause.push_str(if state.wheres.is_empty() { " WHERE " } else { " AND " });
        clause.push_str(&bounds);
    }

    clause
}

/// `(col > $__timeFrom AND col < $__timeTo)` for a chosen time column
///
/// The placeholder never produces bounds, so table panels without a time
/// column query the whole container.
fn time_bounds(state: &QueryState) -> Option<String> {
    state
        .time_column
        .as_ref()?
        .chosen()
        .map(|name| format!("({} > $__timeFrom AND {} < $__timeTo)", name, name))
}

fn limit_clause(state: &QueryState) -> TqlResult<String> {
    let limit = match state.limit {
        None => return Ok(String::new()),
        Some(n) if n < 0 => {
            return Err(TqlError::InvalidQuery(
                "Limit cannot be smaller than 0".to_string(),
            ))
        }
        Some(n) => n,
    };

    match state.offset {
        None => Ok(format!(" LIMIT {}", limit)),
        Some(n) if n < 0 => Err(TqlError::InvalidQuery(
            "Offset cannot be smaller than 0".to_string(),
        )),
        Some(n) => Ok(format!(" LIMIT {} OFFSET {}", limit, n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::state::{
        ComparisonOperator, Connective, QueryFormat, TimeColumn, WhereClause,
    };

    #[test]
    fn test_render_select_only() {
        let tql = render(&QueryState::new("sensors")).unwrap();
        assert_eq!(tql, "SELECT * FROM sensors");
    }

    #[test]
    fn test_render_time_sampling_selection() {
        let tql = render(&QueryState::new("sensors").time_sampling(true)).unwrap();
        assert_eq!(tql, "SELECT $__timeSampling(*, $__interval) FROM sensors");
    }

    #[test]
    fn test_render_unselected_container() {
        let tql = render(&QueryState::default()).unwrap();
        assert_eq!(tql, "SELECT * FROM ");
    }

    #[test]
    fn test_raw_query_bypasses_builder() {
        let mut state = QueryState::raw("select * from foo where $__timeFilter");
        state.limit = Some(-1);
        state.wheres.push(WhereClause::new("a", ComparisonOperator::Eq, "1"));
        state.time_column = Some(TimeColumn::new("ts"));

        assert_eq!(render(&state).unwrap(), "select * from foo where $__timeFilter");
    }

    #[test]
    fn test_render_where_connectives() {
        let state = QueryState::new("c1")
            .filter(WhereClause::new("a", ComparisonOperator::Eq, "1"))
            .filter(WhereClause::new("b", ComparisonOperator::Gt, "2").joined_by(Connective::Or))
            .filter(WhereClause::new("c", ComparisonOperator::Like, "'x%'").joined_by(Connective::XorNot));

        let tql = render(&state).unwrap();
        assert_eq!(tql, "SELECT * FROM c1 WHERE a = 1 OR b > 2 XOR NOT c LIKE 'x%'");

        let where_part = tql.split(" WHERE ").nth(1).unwrap();
        assert!(!where_part.starts_with("AND") && !where_part.starts_with("OR"));
    }

    #[test]
    fn test_first_clause_connective_is_ignored() {
        let state = QueryState::new("c1")
            .filter(WhereClause::new("a", ComparisonOperator::Eq, "1").joined_by(Connective::Or))
            .filter(WhereClause::new("b", ComparisonOperator::Eq, "2"));

        let tql = render(&state).unwrap();
        assert_eq!(tql, "SELECT * FROM c1 WHERE a = 1 AND b = 2");
    }

    #[test]
    fn test_render_boolean_and_null_values() {
        let state = QueryState::new("c1")
            .filter(WhereClause::new("a", ComparisonOperator::Eq, "null"))
            .filter(WhereClause::new("b", ComparisonOperator::Ne, "null").joined_by(Connective::And))
            .filter(WhereClause::new("c", ComparisonOperator::Eq, "true").joined_by(Connective::And))
            .filter(WhereClause::new("d", ComparisonOperator::Eq, "false").joined_by(Connective::Or));

        assert_eq!(
            render(&state).unwrap(),
            "SELECT * FROM c1 WHERE a IS null AND b IS NOT null AND c OR NOT d"
        );
    }

    #[test]
    fn test_time_bounds_without_conditions() {
        let state = QueryState::new("c1").time_column(TimeColumn::new("ts"));
        assert_eq!(
            render(&state).unwrap(),
            "SELECT * FROM c1 WHERE (ts > $__timeFrom AND ts < $__timeTo)"
        );
    }

    #[test]
    fn test_time_bounds_after_conditions() {
        let state = QueryState::new("c1")
            .filter(WhereClause::new("a", ComparisonOperator::Eq, "1"))
            .filter(WhereClause::new("b", ComparisonOperator::Ne, "true").joined_by(Connective::And))
            .time_column(TimeColumn::new("ts"))
            .limit(10);

        assert_eq!(
            render(&state).unwrap(),
            "SELECT * FROM c1 WHERE a = 1 AND NOT b AND (ts > $__timeFrom AND ts < $__timeTo) LIMIT 10"
        );
    }

    #[test]
    fn test_placeholder_time_column_in_table_format() {
        let state = QueryState::new("c1")
            .format(QueryFormat::Table)
            .time_column(TimeColumn::placeholder());
        assert_eq!(render(&state).unwrap(), "SELECT * FROM c1");

        let state = QueryState::new("c1")
            .format(QueryFormat::Table)
            .time_column(TimeColumn::new("ts"));
        assert_eq!(
            render(&state).unwrap(),
            "SELECT * FROM c1 WHERE (ts > $__timeFrom AND ts < $__timeTo)"
        );
    }

    #[test]
    fn test_placeholder_time_column_in_time_series_format() {
        let state = QueryState::new("c1")
            .format(QueryFormat::TimeSeries)
            .time_column(TimeColumn::placeholder());
        assert_eq!(render(&state).unwrap(), "SELECT * FROM c1");
    }

    #[test]
    fn test_limit_and_offset() {
        let state = QueryState::new("c1").limit(10).offset(5);
        assert_eq!(render(&state).unwrap(), "SELECT * FROM c1 LIMIT 10 OFFSET 5");

        let state = QueryState::new("c1").limit(0);
        assert_eq!(render(&state).unwrap(), "SELECT * FROM c1 LIMIT 0");

        // Offset alone is not rendered
        let state = QueryState::new("c1").offset(5);
        assert_eq!(render(&state).unwrap(), "SELECT * FROM c1");
    }

    #[test]
    fn test_negative_limit_is_invalid() {
        let err = render(&QueryState::new("c1").limit(-1)).unwrap_err();
        assert!(matches!(err, TqlError::InvalidQuery(_)));
    }

    #[test]
    fn test_negative_offset_is_invalid() {
        let err = render(&QueryState::new("c1").limit(10).offset(-1)).unwrap_err();
        assert!(matches!(err, TqlError::InvalidQuery(_)));
    }

    #[test]
    fn test_connective_count_matches_clause_count() {
        let mut state = QueryState::new("c1");
        for i in 0..5 {
            let clause = WhereClause::new(format!("k{}", i), ComparisonOperator::Eq, "1");
            state = state.filter(if i == 0 { clause } else { clause.joined_by(Connective::Or) });
        }

        let tql = render(&state).unwrap();
        let connectives = tql.matches(" OR ").count();
        assert_eq!(connectives + 1, state.wheres.len());
    }
}
