//! WHERE condition rendering
//!
//! Values that spell `null`, `true` or `false` are rewritten into TQL
//! predicates instead of being compared literally. The rules live in a single
//! lookup table keyed on (value kind, operator); anything not in the table is
//! rendered as `key op value`.

use super::state::{ComparisonOperator, WhereClause};

/// Classification of a condition's right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    True,
    False,
    Literal,
}

impl ValueKind {
    /// Classify trimmed value text, case-insensitively
    pub fn classify(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("null") {
            Self::Null
        } else if value.eq_ignore_ascii_case("true") {
            Self::True
        } else if value.eq_ignore_ascii_case("false") {
            Self::False
        } else {
            Self::Literal
        }
    }
}

/// Shape of the rendered predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    /// `key IS null`
    IsNull,
    /// `key IS NOT null`
    IsNotNull,
    /// `key`
    Bare,
    /// `NOT key`
    Negated,
    /// `key op value`
    Literal,
}

const REWRITES: &[(ValueKind, ComparisonOperator, Rewrite)] = &[
    (ValueKind::Null, ComparisonOperator::Eq, Rewrite::IsNull),
    (ValueKind::Null, ComparisonOperator::Ne, Rewrite::IsNotNull),
    (ValueKind::False, ComparisonOperator::Eq, Rewrite::Negated),
    (ValueKind::False, ComparisonOperator::Ne, Rewrite::Bare),
    (ValueKind::True, ComparisonOperator::Eq, Rewrite::Bare),
    (ValueKind::True, ComparisonOperator::Ne, Rewrite::Negated),
];

fn lookup(kind: ValueKind, operator: ComparisonOperator) -> Rewrite {
    REWRITES
        .iter()
        .find(|(k, op, _)| *k == kind && *op == operator)
        .map(|(_, _, rewrite)| *rewrite)
        .unwrap_or(Rewrite::Literal)
}

/// Render one condition without its connective
pub fn render_condition(clause: &WhereClause) -> String {
    let key = clause.key.trim();
    let value = clause.value.trim();

    match lookup(ValueKind::classify(value), clause.operator) {
        Rewrite::IsNull => format!("{} IS null", key),
        Rewrite::IsNotNull => format!("{} IS NOT null", key),
        Rewrite::Bare => key.to_string(),
        Rewrite::Negated => format!("NOT {}", key),
        Rewrite::Literal => format!("{} {} {}", key, clause.operator, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(key: &str, op: ComparisonOperator, value: &str) -> String {
        render_condition(&WhereClause::new(key, op, value))
    }

    #[test]
    fn test_null_rewrites() {
        assert_eq!(render("col", ComparisonOperator::Eq, "null"), "col IS null");
        assert_eq!(render("col", ComparisonOperator::Ne, " NULL "), "col IS NOT null");
    }

    #[test]
    fn test_boolean_rewrites() {
        assert_eq!(render("flag", ComparisonOperator::Eq, "true"), "flag");
        assert_eq!(render("flag", ComparisonOperator::Ne, "True"), "NOT flag");
        assert_eq!(render("flag", ComparisonOperator::Eq, "false"), "NOT flag");
        assert_eq!(render("flag", ComparisonOperator::Ne, "FALSE"), "flag");
    }

    #[test]
    fn test_other_operators_render_literally() {
        assert_eq!(render("flag", ComparisonOperator::Gt, "true"), "flag > true");
        assert_eq!(render("col", ComparisonOperator::Like, "null"), "col LIKE null");
        assert_eq!(render("name", ComparisonOperator::Like, "'abc%'"), "name LIKE 'abc%'");
    }

    #[test]
    fn test_key_and_value_are_trimmed() {
        assert_eq!(render("  temp ", ComparisonOperator::Gte, " 20.5 "), "temp >= 20.5");
    }

    #[test]
    fn test_classify() {
        assert_eq!(ValueKind::classify("Null"), ValueKind::Null);
        assert_eq!(ValueKind::classify("'true'"), ValueKind::Literal);
        assert_eq!(ValueKind::classify("1"), ValueKind::Literal);
    }
}
