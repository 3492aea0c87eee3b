//! # griddb-tql
//!
//! TQL generation for GridDB dashboards: render structured query state into
//! TQL, expand dashboard macros, parse variable queries and plan the requests
//! sent to the GridDB web API.
//!
//! ## Modules
//!
//! - [`query`]: Query builder state, TQL rendering and container extraction
//! - [`macros`]: `$__` macro and template variable expansion
//! - [`variable`]: Variable query parsing
//! - [`datasource`]: Target validation and request planning
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use griddb_tql::{expand, render, MacroContext, QueryState, TimeColumn, TimeRange};
//!
//! let state = QueryState::new("sensors")
//!     .time_column(TimeColumn::new("ts"))
//!     .time_sampling(true);
//!
//! let range = TimeRange::from_millis(1_704_067_200_000, 1_704_070_800_000).unwrap();
//! let ctx = MacroContext::new()
//!     .with_time_column("ts")
//!     .with_interval_ms(60_000)
//!     .with_min_interval("1s")
//!     .with_range(range);
//!
//! let tql = expand(&render(&state)?, &ctx)?;
//! assert!(tql.starts_with("SELECT TIME_SAMPLING(*, TIMESTAMP('2024-01-01T00:00:00.000Z')"));
//! # Ok::<(), griddb_tql::TqlError>(())
//! ```

pub mod config;
pub mod datasource;
pub mod error;
pub mod macros;
pub mod query;
pub mod variable;

// Re-export top-level types for convenience
pub use error::{TqlError, TqlResult};

pub use query::{
    extract_container, rebuild_where_clauses, render, where_segments, ComparisonOperator,
    Connective, Container, QueryFormat, QueryState, TimeColumn, WhereClause, WhereSegment,
};

pub use macros::{
    expand, parse_duration, MacroContext, TemplateSubstitution, TemplateVariable, TimeRange,
    VariableTable, VariableValue,
};

pub use variable::{parse_variable_query, VariableQuery};

pub use datasource::{
    plan_annotation, plan_target, plan_targets, plan_variable_query, validate_target,
    AnnotationQuery, ApiCall, Endpoint, Target, TqlRequest,
};

pub use config::{generate_default_config, Config, ConfigError, DatasourceConfig, LoggingConfig};
