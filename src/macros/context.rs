//! Inputs to macro expansion

use chrono::{DateTime, TimeZone, Utc};

use super::variables::TemplateSubstitution;

/// Active dashboard time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Build from epoch milliseconds; `None` when either bound is out of range
    pub fn from_millis(from: i64, to: i64) -> Option<Self> {
        let from = Utc.timestamp_millis_opt(from).single()?;
        let to = Utc.timestamp_millis_opt(to).single()?;
        Some(Self { from, to })
    }
}

/// Everything a macro pass may read
///
/// Built once per statement and never mutated by expansion.
///
/// # Examples
///
/// ```rust
/// use griddb_tql::macros::{expand, MacroContext};
///
/// let ctx = MacroContext::new()
///     .with_time_column("ts")
///     .with_interval_ms(5_000)
///     .with_min_interval("10s");
///
/// assert_eq!(
///     expand("select * from c1 where $__timeFilter", &ctx).unwrap(),
///     "select * from c1 where (ts > $__timeFrom AND ts < $__timeTo)"
/// );
/// ```
#[derive(Clone, Default)]
pub struct MacroContext<'a> {
    time_columns: Vec<String>,
    interval_ms: Option<i64>,
    min_interval: Option<String>,
    range: Option<TimeRange>,
    variables: Option<&'a dyn TemplateSubstitution>,
}

impl<'a> MacroContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one active time column
    ///
    /// One column enables `$__timeFilter`; two (start, end) enable
    /// `$__rangeFilter`.
    pub fn with_time_column(mut self, column: impl Into<String>) -> Self {
        self.time_columns.push(column.into());
        self
    }

    /// Replace the active time columns
    pub fn with_time_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.time_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: i64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    /// Configured minimum interval, e.g. `"1s"`
    pub fn with_min_interval(mut self, min_interval: impl Into<String>) -> Self {
        self.min_interval = Some(min_interval.into());
        self
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_variables(mut self, variables: &'a dyn TemplateSubstitution) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn time_columns(&self) -> &[String] {
        &self.time_columns
    }

    pub fn interval_ms(&self) -> Option<i64> {
        self.interval_ms
    }

    pub fn min_interval(&self) -> Option<&str> {
        self.min_interval.as_deref()
    }

    pub fn range(&self) -> Option<&TimeRange> {
        self.range.as_ref()
    }

    pub fn variables(&self) -> Option<&'a dyn TemplateSubstitution> {
        self.variables
    }
}

impl std::fmt::Debug for MacroContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroContext")
            .field("time_columns", &self.time_columns)
            .field("interval_ms", &self.interval_ms)
            .field("min_interval", &self.min_interval)
            .field("range", &self.range)
            .field("variables", &self.variables.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_from_millis() {
        let range = TimeRange::from_millis(0, 1_000).unwrap();
        assert_eq!(range.from.timestamp_millis(), 0);
        assert_eq!(range.to.timestamp_millis(), 1_000);

        assert!(TimeRange::from_millis(i64::MAX, 0).is_none());
    }

    #[test]
    fn test_context_builders() {
        let ctx = MacroContext::new()
            .with_time_column("start")
            .with_time_column("end")
            .with_interval_ms(250)
            .with_min_interval("1s");

        assert_eq!(ctx.time_columns(), ["start", "end"]);
        assert_eq!(ctx.interval_ms(), Some(250));
        assert_eq!(ctx.min_interval(), Some("1s"));
        assert!(ctx.range().is_none());
        assert!(ctx.variables().is_none());

        let ctx = ctx.with_time_columns(["ts"]);
        assert_eq!(ctx.time_columns(), ["ts"]);
    }

    #[test]
    fn test_debug_hides_variable_table() {
        let ctx = MacroContext::new().with_time_column("ts");
        let debug = format!("{:?}", ctx);
        assert!(debug.contains("time_columns: [\"ts\"]"));
        assert!(debug.contains("variables: false"));
    }
}
