//! Macro Processor
//!
//! Expands `$__` macros and user variables in TQL text. Expansion runs a fixed
//! sequence of passes, each seeing the previous pass's output:
//!
//! 1. `$__timeFilter` / `$__timeColumn` (one time column)
//! 2. `$__rangeFilter` (start and end columns)
//! 3. `$__timeSampling(col, duration)`
//! 4. `$__interval`, `$__minInterval`, `$__timeFrom`, `$__timeTo`
//! 5. user template variables
//!
//! Macros a pass cannot resolve are left in place. The only failure is a
//! duration whose unit cannot be detected.

mod context;
mod duration;
mod passes;
mod variables;

pub use context::{MacroContext, TimeRange};
pub use duration::{parse_duration, Duration, DurationUnit, SamplingInterval, SamplingUnit};
pub use variables::{
    interpolate, InterpolateFn, TemplateSubstitution, TemplateVariable, VariableTable,
    VariableValue,
};

use crate::error::TqlResult;

pub const TIME_FILTER: &str = "$__timeFilter";
pub const RANGE_FILTER: &str = "$__rangeFilter";
pub const TIME_SAMPLING: &str = "$__timeSampling";
pub const INTERVAL: &str = "$__interval";
pub const MIN_INTERVAL: &str = "$__minInterval";
pub const TIME_COLUMN: &str = "$__timeColumn";
pub const TIME_FROM: &str = "$__timeFrom";
pub const TIME_TO: &str = "$__timeTo";
/// "All view columns" sentinel, matched case-insensitively
pub const ALL: &str = "$__all";

/// Expand every macro and variable in `text`
pub fn expand(text: &str, ctx: &MacroContext<'_>) -> TqlResult<String> {
    let out = passes::time_filter(text, ctx);
    tracing::debug!(tql = %out, "Expanded time filter");

    let out = passes::range_filter(&out, ctx);
    tracing::debug!(tql = %out, "Expanded range filter");

    let out = passes::time_sampling(&out)?;
    tracing::debug!(tql = %out, "Expanded time sampling");

    let out = passes::special_variables(&out, ctx)?;
    tracing::debug!(tql = %out, "Expanded special variables");

    let out = passes::user_variables(&out, ctx);
    tracing::debug!(tql = %out, "Expanded user variables");

    Ok(out)
}
