//! Query builder state
//!
//! The structured description of a query as assembled by the interactive
//! editor: a container, an ordered list of WHERE conditions, an optional time
//! column, paging, and the raw-mode escape hatch.
//!
//! ```text
//! SELECT * FROM sensors WHERE temp > 20 AND NOT active LIMIT 100
//! SELECT $__timeSampling(*, $__interval) FROM sensors WHERE (ts > $__timeFrom AND ts < $__timeTo)
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Container referenced by the FROM clause
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Container {
    /// No container chosen yet
    #[default]
    Unselected,
    /// A concrete container (or a variable reference such as `$container`)
    Named(String),
}

impl Container {
    /// Create a named container reference
    pub fn named(name: impl Into<String>) -> Self {
        Self::from(Some(name.into()))
    }

    /// Text used in the FROM clause (empty when unselected)
    pub fn name(&self) -> &str {
        match self {
            Self::Unselected => "",
            Self::Named(name) => name,
        }
    }

    /// Whether a container has been chosen
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl From<Option<String>> for Container {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(name) if !name.trim().is_empty() => Self::Named(name),
            _ => Self::Unselected,
        }
    }
}

impl From<Container> for Option<String> {
    fn from(value: Container) -> Self {
        match value {
            Container::Unselected => None,
            Container::Named(name) => Some(name),
        }
    }
}

/// Time column of the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeColumn {
    /// Column name
    pub name: String,
    /// True when the editor shows its "no column chosen" sentinel
    #[serde(default)]
    pub placeholder: bool,
}

impl TimeColumn {
    /// A time column explicitly chosen by the user
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholder: false,
        }
    }

    /// The sentinel shown before any time column is chosen
    pub fn placeholder() -> Self {
        Self {
            name: "--select time column--".to_string(),
            placeholder: true,
        }
    }

    /// A chosen, non-empty column name
    pub fn chosen(&self) -> Option<&str> {
        let name = self.name.trim();
        if self.placeholder || name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Comparison operators offered by the WHERE editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal to
    #[default]
    #[serde(rename = "=")]
    Eq,
    /// Not equal to
    #[serde(rename = "<>")]
    Ne,
    /// Greater than
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal to
    #[serde(rename = ">=")]
    Gte,
    /// Less than
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal to
    #[serde(rename = "<=")]
    Lte,
    /// Pattern match
    #[serde(rename = "LIKE")]
    Like,
}

impl ComparisonOperator {
    /// Parse from the editor's operator text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "=" => Some(Self::Eq),
            "<>" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            op if op.eq_ignore_ascii_case("like") => Some(Self::Like),
            _ => None,
        }
    }

    /// All operators, in the order the editor lists them
    pub fn all() -> &'static [ComparisonOperator] {
        &[
            Self::Eq,
            Self::Gte,
            Self::Gt,
            Self::Lte,
            Self::Lt,
            Self::Ne,
            Self::Like,
        ]
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
        }
    }
}

/// Boolean joiner between two WHERE conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "XOR")]
    Xor,
    #[serde(rename = "AND NOT")]
    AndNot,
    #[serde(rename = "OR NOT")]
    OrNot,
    #[serde(rename = "XOR NOT")]
    XorNot,
}

impl Connective {
    /// Parse from the editor's connective text
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match normalized.as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "XOR" => Some(Self::Xor),
            "AND NOT" => Some(Self::AndNot),
            "OR NOT" => Some(Self::OrNot),
            "XOR NOT" => Some(Self::XorNot),
            _ => None,
        }
    }
}

impl std::fmt::Display for Connective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Xor => write!(f, "XOR"),
            Self::AndNot => write!(f, "AND NOT"),
            Self::OrNot => write!(f, "OR NOT"),
            Self::XorNot => write!(f, "XOR NOT"),
        }
    }
}

/// A single condition in the WHERE clause
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereClause {
    /// Left-hand side (usually a column)
    #[serde(default)]
    pub key: String,
    /// Comparison operator
    #[serde(default)]
    pub operator: ComparisonOperator,
    /// Right-hand side, kept as typed by the user
    #[serde(default)]
    pub value: String,
    /// Joiner to the previous condition; ignored on the first one
    #[serde(default, rename = "condition", skip_serializing_if = "Option::is_none")]
    pub connective: Option<Connective>,
}

impl WhereClause {
    /// Create a condition
    pub fn new(key: impl Into<String>, operator: ComparisonOperator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
            connective: None,
        }
    }

    /// Set the joiner to the previous condition
    pub fn joined_by(mut self, connective: Connective) -> Self {
        self.connective = Some(connective);
        self
    }
}

/// Output format requested by the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryFormat {
    #[serde(rename = "table")]
    Table,
    #[default]
    #[serde(rename = "time-series")]
    TimeSeries,
}

impl std::fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::TimeSeries => write!(f, "time-series"),
        }
    }
}

/// Complete builder state for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryState {
    /// Container in the FROM clause
    pub container: Container,
    /// WHERE conditions in editor order
    pub wheres: Vec<WhereClause>,
    /// Time column used for the time-range bounds
    pub time_column: Option<TimeColumn>,
    /// Row limit
    #[serde(deserialize_with = "lenient_integer")]
    pub limit: Option<i64>,
    /// Row offset, only rendered together with a limit
    #[serde(deserialize_with = "lenient_integer")]
    pub offset: Option<i64>,
    /// Wrap the selection in `$__timeSampling`
    #[serde(rename = "isTimeSampling")]
    pub time_sampling: bool,
    /// Panel format
    pub format: QueryFormat,
    /// Use `raw_text` verbatim instead of the builder
    pub raw_query: bool,
    /// Hand-written TQL
    pub raw_text: String,
}

impl QueryState {
    /// Start a builder-mode query against a container
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: Container::named(container),
            ..Self::default()
        }
    }

    /// Start a raw-mode query
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            raw_query: true,
            raw_text: text.into(),
            ..Self::default()
        }
    }

    /// Append a WHERE condition
    pub fn filter(mut self, clause: WhereClause) -> Self {
        self.wheres.push(clause);
        self
    }

    /// Set the time column
    pub fn time_column(mut self, column: TimeColumn) -> Self {
        self.time_column = Some(column);
        self
    }

    /// Set a row limit
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set a row offset
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Enable or disable time sampling
    pub fn time_sampling(mut self, enabled: bool) -> Self {
        self.time_sampling = enabled;
        self
    }

    /// Set the panel format
    pub fn format(mut self, format: QueryFormat) -> Self {
        self.format = format;
        self
    }
}

/// Accept numbers or numeric strings; anything unparseable counts as absent
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<Lenient>::deserialize(deserializer)?.and_then(|raw| match raw {
        Lenient::Int(n) => Some(n),
        Lenient::Float(f) if f.fract() == 0.0 => Some(f as i64),
        Lenient::Float(_) => None,
        Lenient::Text(s) => s.trim().parse().ok(),
    }))
}
