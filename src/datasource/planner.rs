//! Request planning
//!
//! Turns panel targets, annotations and variable queries into the requests
//! the GridDB web API expects. Nothing here performs I/O.

use super::annotation::AnnotationQuery;
use super::endpoint::ApiCall;
use super::request::{ContainerType, Target, TqlRequest};
use crate::error::{TqlError, TqlResult};
use crate::macros::{expand, MacroContext};
use crate::query::{extract_container, render, QueryFormat};
use crate::variable::VariableQuery;

/// Whether a target should be sent
///
/// Incomplete targets are skipped (`Ok(false)`). Time sampling on a
/// collection container is an error.
pub fn validate_target(target: &Target) -> TqlResult<bool> {
    if target.hide {
        return Ok(false);
    }

    let query = &target.query;

    if query.raw_query {
        return Ok(!query.raw_text.trim().is_empty());
    }

    if !query.container.is_selected() {
        return Ok(false);
    }

    if target.container_type == Some(ContainerType::Collection) && query.time_sampling {
        return Err(TqlError::InvalidQuery(
            "Time sampling not available with collection container".to_string(),
        ));
    }

    if query.format == QueryFormat::TimeSeries {
        let has_time_column = query
            .time_column
            .as_ref()
            .and_then(|c| c.chosen())
            .is_some();
        if !has_time_column || target.view_columns.is_empty() {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Build the TQL request for one target
///
/// `base` carries the interval settings, time range and variables shared by
/// every target of a panel; the target's time column is added here.
pub fn plan_target(target: &Target, base: &MacroContext<'_>) -> TqlResult<TqlRequest> {
    let query = &target.query;
    let time_column = if query.raw_query {
        None
    } else {
        query.time_column.as_ref().and_then(|c| c.chosen())
    };

    let ctx = base.clone().with_time_columns(time_column);
    let stmt = expand(&render(query)?, &ctx)?;

    let name = if query.raw_query {
        extract_container(&stmt)?
    } else {
        expand(query.container.name(), &ctx)?
    };

    let columns = if query.raw_query || target.selects_all_columns() {
        None
    } else {
        let mut columns = target.view_columns.clone();
        if let Some(time) = time_column {
            if query.format == QueryFormat::TimeSeries && !columns.iter().any(|c| c == time) {
                columns.push(time.to_string());
            }
        }
        Some(columns)
    };

    tracing::debug!(container = %name, stmt = %stmt, "Planned target");
    Ok(TqlRequest { name, stmt, columns })
}

/// Plan every sendable target, skipping incomplete ones
pub fn plan_targets(targets: &[Target], base: &MacroContext<'_>) -> TqlResult<Vec<TqlRequest>> {
    let mut requests = Vec::with_capacity(targets.len());

    for (index, target) in targets.iter().enumerate() {
        if !validate_target(target)? {
            tracing::warn!(index, "Skipping incomplete target");
            continue;
        }
        requests.push(plan_target(target, base)?);
    }

    Ok(requests)
}

/// Build the TQL request for an annotation
pub fn plan_annotation(
    annotation: &AnnotationQuery,
    base: &MacroContext<'_>,
) -> TqlResult<TqlRequest> {
    annotation.validate()?;

    let ctx = base.clone().with_time_columns(annotation.time_columns());
    let stmt = expand(&annotation.query, &ctx)?;

    tracing::debug!(container = %annotation.container, stmt = %stmt, "Planned annotation");
    Ok(TqlRequest {
        name: annotation.container.trim().to_string(),
        stmt,
        columns: Some(annotation.selected_columns()),
    })
}

/// Build the API call answering a variable query
pub fn plan_variable_query(query: &VariableQuery) -> ApiCall {
    let call = match query {
        VariableQuery::DataQuery {
            container,
            columns,
            tql,
        } => ApiCall::tql(vec![TqlRequest {
            name: container.clone(),
            stmt: tql.clone(),
            columns: Some(columns.clone()),
        }]),
        _ => ApiCall::get(query.endpoint()),
    };

    tracing::debug!(endpoint = ?call.endpoint, "Planned variable query");
    call
}
