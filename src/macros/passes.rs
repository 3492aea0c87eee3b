//! Individual expansion passes
//!
//! Each pass is a pure `&str -> String` transform over the output of the
//! previous one.

use regex::Regex;
use std::sync::OnceLock;

use super::context::{MacroContext, TimeRange};
use super::duration::parse_duration;
use super::variables::interpolate;
use super::{INTERVAL, MIN_INTERVAL, RANGE_FILTER, TIME_COLUMN, TIME_FILTER, TIME_FROM, TIME_TO};
use crate::error::TqlResult;

fn time_sampling_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$__timeSampling\(([^(),]+),([^(),]+)\)").expect("time sampling pattern compiles")
    })
}

/// `$__timeFilter` and `$__timeColumn` for a single time column
pub(crate) fn time_filter(text: &str, ctx: &MacroContext<'_>) -> String {
    let column = match ctx.time_columns() {
        [column] if !column.trim().is_empty() => column.trim(),
        _ => return text.to_string(),
    };

    let filter = format!("({} > {} AND {} < {})", column, TIME_FROM, column, TIME_TO);
    text.replace(TIME_FILTER, &filter).replace(TIME_COLUMN, column)
}

/// `$__rangeFilter` for a (start, end) column pair
pub(crate) fn range_filter(text: &str, ctx: &MacroContext<'_>) -> String {
    let (start, end) = match ctx.time_columns() {
        [start, end] if !start.trim().is_empty() && !end.trim().is_empty() => {
            (start.trim(), end.trim())
        }
        _ => return text.to_string(),
    };

    let filter = format!(
        "(({s} >= {from} AND {s} <= {to}) OR ({e} >= {from} AND {e} <= {to}))",
        s = start,
        e = end,
        from = TIME_FROM,
        to = TIME_TO
    );
    text.replace(RANGE_FILTER, &filter)
}

/// Rewrite `$__timeSampling(col, duration)` into `TIME_SAMPLING(...)`
///
/// Rescans from the start after every replacement until no call is left.
pub(crate) fn time_sampling(text: &str) -> TqlResult<String> {
    let mut out = text.to_string();

    loop {
        let (range, column, duration) = match time_sampling_pattern().captures(&out) {
            Some(caps) => (
                caps.get(0).map(|m| m.range()).unwrap_or_default(),
                caps[1].trim().to_string(),
                caps[2].trim().to_string(),
            ),
            None => break,
        };

        let replacement = if duration == INTERVAL || duration == MIN_INTERVAL {
            format!("TIME_SAMPLING({}, {}, {}, {})", column, TIME_FROM, TIME_TO, duration)
        } else {
            let interval = parse_duration(&duration)?.to_sampling_interval();
            format!(
                "TIME_SAMPLING({}, {}, {}, {}, {})",
                column, TIME_FROM, TIME_TO, interval.value, interval.unit
            )
        };

        tracing::trace!(column = %column, duration = %duration, "Rewrote time sampling call");
        out.replace_range(range, &replacement);
    }

    Ok(out)
}

/// `$__interval`, `$__minInterval`, `$__timeFrom` and `$__timeTo`
pub(crate) fn special_variables(text: &str, ctx: &MacroContext<'_>) -> TqlResult<String> {
    let requested = ctx.interval_ms().unwrap_or(0);
    let min_interval = ctx
        .min_interval()
        .map(|d| parse_duration(d)?.to_millis())
        .transpose()?;

    let effective = match min_interval {
        Some(min) => requested.max(min),
        None => requested,
    };

    let mut out = text.replace(INTERVAL, &format!("{}, MILLISECOND", effective));
    if let Some(min) = min_interval {
        out = out.replace(MIN_INTERVAL, &format!("{}, MILLISECOND", min));
    }

    if let Some(TimeRange { from, to }) = ctx.range() {
        out = out
            .replace(TIME_FROM, &timestamp(from))
            .replace(TIME_TO, &timestamp(to));
    }

    Ok(out)
}

/// Host template variables
pub(crate) fn user_variables(text: &str, ctx: &MacroContext<'_>) -> String {
    match ctx.variables() {
        Some(table) => table.substitute(text, &interpolate),
        None => text.to_string(),
    }
}

fn timestamp(at: &chrono::DateTime<chrono::Utc>) -> String {
    format!("TIMESTAMP('{}')", at.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TqlError;

    #[test]
    fn test_time_filter_single_column() {
        let ctx = MacroContext::new().with_time_column("ts");
        assert_eq!(
            time_filter("where $__timeFilter order by $__timeColumn", &ctx),
            "where (ts > $__timeFrom AND ts < $__timeTo) order by ts"
        );
    }

    #[test]
    fn test_time_filter_needs_exactly_one_column() {
        let text = "where $__timeFilter";
        assert_eq!(time_filter(text, &MacroContext::new()), text);
        assert_eq!(time_filter(text, &MacroContext::new().with_time_column("  ")), text);
        assert_eq!(
            time_filter(text, &MacroContext::new().with_time_columns(["a", "b"])),
            text
        );
    }

    #[test]
    fn test_range_filter() {
        let ctx = MacroContext::new().with_time_columns(["s", "e"]);
        assert_eq!(
            range_filter("where $__rangeFilter", &ctx),
            "where ((s >= $__timeFrom AND s <= $__timeTo) OR (e >= $__timeFrom AND e <= $__timeTo))"
        );

        let ctx = MacroContext::new().with_time_columns(["s", ""]);
        assert_eq!(range_filter("$__rangeFilter", &ctx), "$__rangeFilter");
    }

    #[test]
    fn test_time_sampling_days() {
        assert_eq!(
            time_sampling("$__timeSampling(col1,3d)").unwrap(),
            "TIME_SAMPLING(col1, $__timeFrom, $__timeTo, 3, DAY)"
        );
    }

    #[test]
    fn test_time_sampling_trims_and_coarsens() {
        assert_eq!(
            time_sampling("select $__timeSampling( temp , 2w ) from c").unwrap(),
            "select TIME_SAMPLING(temp, $__timeFrom, $__timeTo, 14, DAY) from c"
        );
    }

    #[test]
    fn test_time_sampling_interval_passthrough() {
        assert_eq!(
            time_sampling("$__timeSampling(col1,$__interval)").unwrap(),
            "TIME_SAMPLING(col1, $__timeFrom, $__timeTo, $__interval)"
        );
        assert_eq!(
            time_sampling("$__timeSampling(col1, $__minInterval)").unwrap(),
            "TIME_SAMPLING(col1, $__timeFrom, $__timeTo, $__minInterval)"
        );
    }

    #[test]
    fn test_time_sampling_repeated_calls() {
        assert_eq!(
            time_sampling("$__timeSampling(a,1h) $__timeSampling(b,30ms)").unwrap(),
            "TIME_SAMPLING(a, $__timeFrom, $__timeTo, 1, HOUR) TIME_SAMPLING(b, $__timeFrom, $__timeTo, 30, MILLISECOND)"
        );
    }

    #[test]
    fn test_time_sampling_bad_unit() {
        let err = time_sampling("$__timeSampling(col1,3x)").unwrap_err();
        assert!(matches!(err, TqlError::InvalidDuration(_)));
    }

    #[test]
    fn test_time_sampling_nested_call_untouched() {
        let text = "$__timeSampling(max(a),1h)";
        assert_eq!(time_sampling(text).unwrap(), text);
    }

    #[test]
    fn test_special_interval_uses_larger_value() {
        let ctx = MacroContext::new().with_interval_ms(500).with_min_interval("1s");
        assert_eq!(
            special_variables("$__interval / $__minInterval", &ctx).unwrap(),
            "1000, MILLISECOND / 1000, MILLISECOND"
        );

        let ctx = MacroContext::new().with_interval_ms(60_000).with_min_interval("1s");
        assert_eq!(
            special_variables("$__interval", &ctx).unwrap(),
            "60000, MILLISECOND"
        );
    }

    #[test]
    fn test_special_without_min_interval() {
        let ctx = MacroContext::new();
        assert_eq!(
            special_variables("$__interval $__minInterval", &ctx).unwrap(),
            "0, MILLISECOND $__minInterval"
        );
    }

    #[test]
    fn test_special_min_interval_must_have_fixed_length() {
        let ctx = MacroContext::new().with_min_interval("1w");
        assert!(matches!(
            special_variables("x", &ctx),
            Err(TqlError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_special_time_range() {
        let range = TimeRange::from_millis(1_543_233_910_058, 1_543_276_800_000).unwrap();
        let ctx = MacroContext::new().with_range(range);

        assert_eq!(
            special_variables("ts > $__timeFrom AND ts < $__timeTo", &ctx).unwrap(),
            "ts > TIMESTAMP('2018-11-26T12:05:10.058Z') AND ts < TIMESTAMP('2018-11-27T00:00:00.000Z')"
        );
    }

    #[test]
    fn test_special_time_range_absent() {
        let text = "ts > $__timeFrom";
        assert_eq!(special_variables(text, &MacroContext::new()).unwrap(), text);
    }
}
