//! TQL Query Builder
//!
//! Renders structured editor state into TQL and recovers the container from
//! hand-written statements:
//!
//! - **State**: query state types (container, conditions, time column, paging)
//! - **Builder**: render state into `SELECT ... FROM ... WHERE ... LIMIT ...`
//! - **Condition**: null/boolean value rewriting
//! - **Segments**: WHERE editor token stream <-> conditions
//! - **Extractor**: container name from raw TQL
//!
//! # Examples
//!
//! ```rust
//! use griddb_tql::query::{render, ComparisonOperator, QueryState, TimeColumn, WhereClause};
//!
//! let state = QueryState::new("sensors")
//!     .filter(WhereClause::new("active", ComparisonOperator::Eq, "true"))
//!     .time_column(TimeColumn::new("ts"))
//!     .limit(100);
//!
//! assert_eq!(
//!     render(&state).unwrap(),
//!     "SELECT * FROM sensors WHERE active AND (ts > $__timeFrom AND ts < $__timeTo) LIMIT 100"
//! );
//! ```

mod builder;
mod condition;
mod extractor;
mod segments;
mod state;

pub use builder::render;
pub use condition::{render_condition, ValueKind};
pub use extractor::extract_container;
pub use segments::{rebuild_where_clauses, where_segments, WhereSegment};
pub use state::{
    ComparisonOperator, Connective, Container, QueryFormat, QueryState, TimeColumn, WhereClause,
};
