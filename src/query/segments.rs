//! Interactive WHERE editing
//!
//! The editor keeps the WHERE clause as a flat list of tokens
//! (`key`, `operator`, `value`, `condition`, `key`, ...). These helpers fold
//! that token stream into [`WhereClause`]s and unfold it again when a saved
//! query is reopened.

use serde::{Deserialize, Serialize};

use super::state::{ComparisonOperator, Connective, WhereClause};

/// One token of the WHERE editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum WhereSegment {
    /// Connective starting a new condition
    Condition(Connective),
    /// Left-hand side of the current condition
    Key(String),
    /// Operator of the current condition
    Operator(ComparisonOperator),
    /// Right-hand side of the current condition
    Value(String),
}

/// Fold editor tokens into conditions
///
/// A `Condition` token opens a new clause; every other token fills in the
/// clause that is currently open. The first clause never keeps a connective.
pub fn rebuild_where_clauses(segments: &[WhereSegment]) -> Vec<WhereClause> {
    let mut clauses: Vec<WhereClause> = Vec::new();

    for segment in segments {
        if let WhereSegment::Condition(connective) = segment {
            clauses.push(WhereClause {
                connective: Some(*connective),
                ..WhereClause::default()
            });
            continue;
        }

        if clauses.is_empty() {
            clauses.push(WhereClause::default());
        }
        let Some(current) = clauses.last_mut() else {
            continue;
        };

        match segment {
            WhereSegment::Key(key) => current.key = key.clone(),
            WhereSegment::Operator(op) => current.operator = *op,
            WhereSegment::Value(value) => current.value = value.clone(),
            WhereSegment::Condition(_) => {}
        }
    }

    if let Some(first) = clauses.first_mut() {
        first.connective = None;
    }

    clauses
}

/// Unfold conditions into editor tokens
pub fn where_segments(clauses: &[WhereClause]) -> Vec<WhereSegment> {
    let mut segments = Vec::with_capacity(clauses.len() * 4);

    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            segments.push(WhereSegment::Condition(clause.connective.unwrap_or_default()));
        }
        segments.push(WhereSegment::Key(clause.key.clone()));
        segments.push(WhereSegment::Operator(clause.operator));
        segments.push(WhereSegment::Value(clause.value.clone()));
    }

    segments
}
