//! Dashboard duration parsing
//!
//! Durations are written as a number directly followed by a unit suffix:
//! `30ms`, `10s`, `5m`, `1h`, `3d`, `2w`, `6M`, `1y`. Units are tried in the
//! order `ms, s, m, h, d, w, M, y`, so `30ms` is thirty milliseconds and never
//! thirty seconds with a stray `m`.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize, value},
    sequence::pair,
    IResult,
};

use crate::error::{TqlError, TqlResult};

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Unit suffix of a dashboard duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    /// Suffix as written in a duration
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Millisecond => "ms",
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "M",
            Self::Year => "y",
        }
    }

    /// Fixed length in milliseconds; calendar units have none
    pub fn millis(&self) -> Option<i64> {
        match self {
            Self::Millisecond => Some(1),
            Self::Second => Some(SECOND_MS),
            Self::Minute => Some(MINUTE_MS),
            Self::Hour => Some(HOUR_MS),
            Self::Day => Some(DAY_MS),
            Self::Week | Self::Month | Self::Year => None,
        }
    }
}

/// Unit accepted by `TIME_SAMPLING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl std::fmt::Display for SamplingUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "DAY"),
            Self::Hour => write!(f, "HOUR"),
            Self::Minute => write!(f, "MINUTE"),
            Self::Second => write!(f, "SECOND"),
            Self::Millisecond => write!(f, "MILLISECOND"),
        }
    }
}

/// Interval argument of `TIME_SAMPLING`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingInterval {
    pub value: f64,
    pub unit: SamplingUnit,
}

/// A parsed dashboard duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duration {
    pub value: f64,
    pub unit: DurationUnit,
}

impl Duration {
    /// Length in milliseconds
    ///
    /// Weeks, months and years have no fixed length and fail here.
    pub fn to_millis(&self) -> TqlResult<i64> {
        let factor = self.unit.millis().ok_or_else(|| {
            TqlError::InvalidDuration(format!(
                "'{}{}' has no millisecond equivalent",
                self.value,
                self.unit.suffix()
            ))
        })?;
        Ok((self.value * factor as f64).round() as i64)
    }

    /// Convert to a `TIME_SAMPLING` interval
    ///
    /// Calendar units are coarsened to days: a year is 365 days, a month 30
    /// and a week 7.
    pub fn to_sampling_interval(&self) -> SamplingInterval {
        let (value, unit) = match self.unit {
            DurationUnit::Year => (self.value * 365.0, SamplingUnit::Day),
            DurationUnit::Month => (self.value * 30.0, SamplingUnit::Day),
            DurationUnit::Week => (self.value * 7.0, SamplingUnit::Day),
            DurationUnit::Day => (self.value, SamplingUnit::Day),
            DurationUnit::Hour => (self.value, SamplingUnit::Hour),
            DurationUnit::Minute => (self.value, SamplingUnit::Minute),
            DurationUnit::Second => (self.value, SamplingUnit::Second),
            DurationUnit::Millisecond => (self.value, SamplingUnit::Millisecond),
        };
        SamplingInterval { value, unit }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Parse a duration such as `30ms` or `3d`
pub fn parse_duration(text: &str) -> TqlResult<Duration> {
    let trimmed = text.trim();
    match all_consuming(duration)(trimmed) {
        Ok((_, parsed)) => Ok(parsed),
        Err(_) => Err(TqlError::InvalidDuration(format!(
            "Cannot detect unit of duration '{}', expected one of ms, s, m, h, d, w, M, y",
            trimmed
        ))),
    }
}

fn duration(input: &str) -> IResult<&str, Duration> {
    let (input, value) = number(input)?;
    let (input, unit) = unit(input)?;
    Ok((input, Duration { value, unit }))
}

fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Order matters: `ms` before `s` and `m`
fn unit(input: &str) -> IResult<&str, DurationUnit> {
    alt((
        value(DurationUnit::Millisecond, tag("ms")),
        value(DurationUnit::Second, tag("s")),
        value(DurationUnit::Minute, tag("m")),
        value(DurationUnit::Hour, tag("h")),
        value(DurationUnit::Day, tag("d")),
        value(DurationUnit::Week, tag("w")),
        value(DurationUnit::Month, tag("M")),
        value(DurationUnit::Year, tag("y")),
    ))(input)
}
