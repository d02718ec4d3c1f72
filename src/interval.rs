//! Interval qualifiers, the per-granularity literal grammar, and range checks
//!
//! An interval literal such as `INTERVAL '1 2:3:4' DAY TO SECOND` is checked
//! against one of thirteen fixed shapes determined solely by the qualifier's
//! (start, end) unit pair. Each captured field is then range checked: the
//! leading field against `10^leading_precision`, every secondary field
//! against its unit's natural modulus.

use crate::ast::Span;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Default leading-field precision when the qualifier does not spell one.
pub const DEFAULT_LEADING_PRECISION: u32 = 2;
/// Default fractional-seconds precision.
pub const DEFAULT_FRACTIONAL_PRECISION: u32 = 6;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// A unit of time granularity in an interval qualifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// The upper bound (exclusive) for this unit when it appears as a
    /// secondary field. Leading fields are bounded by precision instead.
    pub fn modulus(&self) -> Option<i64> {
        match self {
            TimeUnit::Year | TimeUnit::Day => None,
            TimeUnit::Month => Some(12),
            TimeUnit::Hour => Some(24),
            TimeUnit::Minute | TimeUnit::Second => Some(60),
        }
    }

    pub fn is_year_month(&self) -> bool {
        matches!(self, TimeUnit::Year | TimeUnit::Month)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Year => "YEAR",
            TimeUnit::Month => "MONTH",
            TimeUnit::Day => "DAY",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Second => "SECOND",
        };
        write!(f, "{}", name)
    }
}

/// An interval qualifier: start unit, optional end unit, optional explicit
/// precisions, e.g. `DAY TO SECOND` or `YEAR(3)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalQualifier {
    pub start: TimeUnit,
    pub end: Option<TimeUnit>,
    pub leading_precision: Option<u32>,
    pub fractional_precision: Option<u32>,
}

impl IntervalQualifier {
    pub fn new(start: TimeUnit, end: Option<TimeUnit>) -> Self {
        Self {
            start,
            end,
            leading_precision: None,
            fractional_precision: None,
        }
    }

    pub fn with_leading_precision(mut self, precision: u32) -> Self {
        self.leading_precision = Some(precision);
        self
    }

    pub fn with_fractional_precision(mut self, precision: u32) -> Self {
        self.fractional_precision = Some(precision);
        self
    }

    /// The trailing unit: the end unit, or the start unit for single-field
    /// qualifiers.
    pub fn trailing_unit(&self) -> TimeUnit {
        self.end.unwrap_or(self.start)
    }

    /// Whether this qualifier denotes a year-month interval (month
    /// magnitude) as opposed to a day-time interval (millisecond magnitude).
    pub fn is_year_month(&self) -> bool {
        self.start.is_year_month()
    }

    pub fn leading_precision_or_default(&self) -> u32 {
        self.leading_precision.unwrap_or(DEFAULT_LEADING_PRECISION)
    }

    pub fn fractional_precision_or_default(&self) -> u32 {
        self.fractional_precision
            .unwrap_or(DEFAULT_FRACTIONAL_PRECISION)
    }

    /// Validates raw literal text against this qualifier's shape and field
    /// ranges, producing the parsed fields.
    pub fn validate_literal(&self, text: &str, span: Span) -> Result<IntervalFields> {
        let (sign, body) = strip_sign(text);
        let shape = shape_for(self.start, self.trailing_unit()).ok_or_else(|| {
            Error::Internal(format!(
                "no interval shape for {} TO {}",
                self.start,
                self.trailing_unit()
            ))
        })?;

        let captures = shape.regex.captures(body).ok_or_else(|| {
            Error::InvalidIntervalLiteral {
                span,
                literal: text.to_string(),
                qualifier: self.to_string(),
            }
        })?;

        let mut fields = IntervalFields {
            sign,
            ..IntervalFields::default()
        };
        let limit = 10_i64
            .checked_pow(self.leading_precision_or_default())
            .unwrap_or(i64::MAX);

        for (i, unit) in shape.units.iter().enumerate() {
            let raw = captures
                .get(i + 1)
                .map(|m| m.as_str())
                .unwrap_or_default();
            let value: i64 =
                raw.parse()
                    .map_err(|_| Error::InvalidIntervalLiteral {
                        span,
                        literal: text.to_string(),
                        qualifier: self.to_string(),
                    })?;

            let in_range = if i == 0 {
                value < limit
            } else {
                match unit.modulus() {
                    Some(m) => value < m,
                    None => true,
                }
            };
            if !in_range {
                return Err(Error::IntervalFieldOverflow {
                    span,
                    unit: unit.to_string(),
                    value: raw.to_string(),
                    literal: text.to_string(),
                });
            }
            fields.set(*unit, value);
        }

        if shape.fraction {
            if let Some(frac) = captures.get(shape.units.len() + 1) {
                fields.millis = fraction_to_millis(frac.as_str());
            }
        }

        Ok(fields)
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        match (self.leading_precision, self.end, self.fractional_precision) {
            (Some(p), _, Some(frac)) if self.end.is_none() => {
                // SECOND(2, 6)
                write!(f, "({}, {})", p, frac)?;
            }
            (Some(p), _, _) => write!(f, "({})", p)?,
            _ => {}
        }
        if let Some(end) = self.end {
            write!(f, " TO {}", end)?;
            if end == TimeUnit::Second
                && let Some(frac) = self.fractional_precision
            {
                write!(f, "({})", frac)?;
            }
        }
        Ok(())
    }
}

/// The fields captured from a validated interval literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntervalFields {
    pub sign: i8,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millis: i64,
}

impl IntervalFields {
    fn set(&mut self, unit: TimeUnit, value: i64) {
        match unit {
            TimeUnit::Year => self.year = value,
            TimeUnit::Month => self.month = value,
            TimeUnit::Day => self.day = value,
            TimeUnit::Hour => self.hour = value,
            TimeUnit::Minute => self.minute = value,
            TimeUnit::Second => self.second = value,
        }
    }

    /// Total month magnitude, for year-month intervals.
    pub fn total_months(&self) -> i64 {
        self.year * 12 + self.month
    }

    /// Total millisecond magnitude, for day-time intervals.
    pub fn total_millis(&self) -> i64 {
        self.day * MILLIS_PER_DAY
            + self.hour * MILLIS_PER_HOUR
            + self.minute * MILLIS_PER_MINUTE
            + self.second * MILLIS_PER_SECOND
            + self.millis
    }
}

/// A validated interval constant: sign, magnitude (months for year-month
/// qualifiers, milliseconds otherwise), its qualifier, and the literal text
/// as written. Equality and hashing are over (text, sign, qualifier), not
/// the magnitude.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntervalValue {
    sign: i8,
    magnitude: i64,
    qualifier: IntervalQualifier,
    text: String,
}

impl IntervalValue {
    /// Validates `text` against `qualifier` and builds the value.
    pub fn parse(text: &str, qualifier: IntervalQualifier, span: Span) -> Result<Self> {
        let fields = qualifier.validate_literal(text, span)?;
        let magnitude = if qualifier.is_year_month() {
            fields.total_months()
        } else {
            fields.total_millis()
        };
        // `text` holds the unsigned body; the sign lives in `sign` and is
        // re-attached by Display, outside the quotes.
        let (_, body) = strip_sign(text);
        Ok(Self {
            sign: fields.sign,
            magnitude,
            qualifier,
            text: body.to_string(),
        })
    }

    pub fn sign(&self) -> i8 {
        self.sign
    }

    /// Months for year-month intervals, milliseconds for day-time intervals.
    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    pub fn qualifier(&self) -> &IntervalQualifier {
        &self.qualifier
    }

    /// The literal text as written in the source.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Regenerates canonical literal text from the magnitude. Trailing-zero
    /// milliseconds are stripped.
    pub fn canonical_text(&self) -> String {
        let mut out = String::new();
        if self.sign < 0 {
            out.push('-');
        }
        let q = &self.qualifier;
        if q.is_year_month() {
            let months = self.magnitude;
            match (q.start, q.trailing_unit()) {
                (TimeUnit::Year, TimeUnit::Year) => out.push_str(&(months / 12).to_string()),
                (TimeUnit::Year, TimeUnit::Month) => {
                    out.push_str(&format!("{}-{}", months / 12, months % 12))
                }
                _ => out.push_str(&months.to_string()),
            }
            return out;
        }

        let millis = self.magnitude;
        let (day, rest) = (millis / MILLIS_PER_DAY, millis % MILLIS_PER_DAY);
        let (hour, rest) = (rest / MILLIS_PER_HOUR, rest % MILLIS_PER_HOUR);
        let (minute, rest) = (rest / MILLIS_PER_MINUTE, rest % MILLIS_PER_MINUTE);
        let (second, ms) = (rest / MILLIS_PER_SECOND, rest % MILLIS_PER_SECOND);

        use TimeUnit::*;
        match (q.start, q.trailing_unit()) {
            (Day, Day) => out.push_str(&day.to_string()),
            (Day, Hour) => out.push_str(&format!("{} {}", day, hour)),
            (Day, Minute) => out.push_str(&format!("{} {}:{:02}", day, hour, minute)),
            (Day, Second) => {
                out.push_str(&format!("{} {}:{:02}:{:02}", day, hour, minute, second))
            }
            (Hour, Hour) => out.push_str(&(millis / MILLIS_PER_HOUR).to_string()),
            (Hour, Minute) => {
                out.push_str(&format!("{}:{:02}", millis / MILLIS_PER_HOUR, minute))
            }
            (Hour, Second) => out.push_str(&format!(
                "{}:{:02}:{:02}",
                millis / MILLIS_PER_HOUR,
                minute,
                second
            )),
            (Minute, Minute) => out.push_str(&(millis / MILLIS_PER_MINUTE).to_string()),
            (Minute, Second) => {
                out.push_str(&format!("{}:{:02}", millis / MILLIS_PER_MINUTE, second))
            }
            (Second, Second) => out.push_str(&(millis / MILLIS_PER_SECOND).to_string()),
            (start, end) => {
                // Year-month pairs are handled above; anything else here is
                // an impossible qualifier.
                unreachable!("invalid day-time qualifier {} TO {}", start, end)
            }
        }
        if ms != 0 {
            let frac = format!("{:03}", ms);
            out.push('.');
            out.push_str(frac.trim_end_matches('0'));
        }
        out
    }
}

impl PartialEq for IntervalValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.sign == other.sign && self.qualifier == other.qualifier
    }
}

impl Eq for IntervalValue {}

impl Hash for IntervalValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.sign.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for IntervalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign < 0 {
            write!(f, "-")?;
        }
        write!(f, "'{}' {}", self.text, self.qualifier)
    }
}

/// One of the thirteen literal shapes, keyed by (start, trailing) units.
struct Shape {
    regex: &'static Regex,
    units: &'static [TimeUnit],
    /// Whether the shape admits a fractional-seconds suffix.
    fraction: bool,
}

macro_rules! shape_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("valid interval shape regex"));
    };
}

shape_regex!(RE_SINGLE, r"^(\d+)$");
shape_regex!(RE_YEAR_MONTH, r"^(\d+)-(\d+)$");
shape_regex!(RE_DAY_HOUR, r"^(\d+) (\d+)$");
shape_regex!(RE_DAY_MINUTE, r"^(\d+) (\d+):(\d+)$");
shape_regex!(RE_DAY_SECOND, r"^(\d+) (\d+):(\d+):(\d+)(?:\.(\d+))?$");
shape_regex!(RE_HOUR_MINUTE, r"^(\d+):(\d+)$");
shape_regex!(RE_HOUR_SECOND, r"^(\d+):(\d+):(\d+)(?:\.(\d+))?$");
shape_regex!(RE_MINUTE_SECOND, r"^(\d+):(\d+)(?:\.(\d+))?$");
shape_regex!(RE_SECOND, r"^(\d+)(?:\.(\d+))?$");

fn shape_for(start: TimeUnit, trailing: TimeUnit) -> Option<Shape> {
    use TimeUnit::*;
    let shape = match (start, trailing) {
        (Year, Year) => Shape {
            regex: &RE_SINGLE,
            units: &[Year],
            fraction: false,
        },
        (Year, Month) => Shape {
            regex: &RE_YEAR_MONTH,
            units: &[Year, Month],
            fraction: false,
        },
        (Month, Month) => Shape {
            regex: &RE_SINGLE,
            units: &[Month],
            fraction: false,
        },
        (Day, Day) => Shape {
            regex: &RE_SINGLE,
            units: &[Day],
            fraction: false,
        },
        (Day, Hour) => Shape {
            regex: &RE_DAY_HOUR,
            units: &[Day, Hour],
            fraction: false,
        },
        (Day, Minute) => Shape {
            regex: &RE_DAY_MINUTE,
            units: &[Day, Hour, Minute],
            fraction: false,
        },
        (Day, Second) => Shape {
            regex: &RE_DAY_SECOND,
            units: &[Day, Hour, Minute, Second],
            fraction: true,
        },
        (Hour, Hour) => Shape {
            regex: &RE_SINGLE,
            units: &[Hour],
            fraction: false,
        },
        (Hour, Minute) => Shape {
            regex: &RE_HOUR_MINUTE,
            units: &[Hour, Minute],
            fraction: false,
        },
        (Hour, Second) => Shape {
            regex: &RE_HOUR_SECOND,
            units: &[Hour, Minute, Second],
            fraction: true,
        },
        (Minute, Minute) => Shape {
            regex: &RE_SINGLE,
            units: &[Minute],
            fraction: false,
        },
        (Minute, Second) => Shape {
            regex: &RE_MINUTE_SECOND,
            units: &[Minute, Second],
            fraction: true,
        },
        (Second, Second) => Shape {
            regex: &RE_SECOND,
            units: &[Second],
            fraction: true,
        },
        _ => return None,
    };
    Some(shape)
}

fn strip_sign(text: &str) -> (i8, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else {
        (1, text)
    }
}

/// Normalizes a fractional-seconds capture to milliseconds by left-padding
/// or truncating to three digits.
fn fraction_to_millis(frac: &str) -> i64 {
    let mut digits: String = frac.chars().take(3).collect();
    while digits.len() < 3 {
        digits.push('0');
    }
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualifier(start: TimeUnit, end: Option<TimeUnit>) -> IntervalQualifier {
        IntervalQualifier::new(start, end)
    }

    #[test]
    fn day_to_second_fields() {
        let q = qualifier(TimeUnit::Day, Some(TimeUnit::Second));
        let fields = q.validate_literal("1 2:3:4", Span::ZERO).unwrap();
        assert_eq!(fields.sign, 1);
        assert_eq!(fields.day, 1);
        assert_eq!(fields.hour, 2);
        assert_eq!(fields.minute, 3);
        assert_eq!(fields.second, 4);
        assert_eq!(fields.millis, 0);
    }

    #[test]
    fn negative_sign_stripped() {
        let q = qualifier(TimeUnit::Year, Some(TimeUnit::Month));
        let fields = q.validate_literal("-2-6", Span::ZERO).unwrap();
        assert_eq!(fields.sign, -1);
        assert_eq!(fields.year, 2);
        assert_eq!(fields.month, 6);
        assert_eq!(fields.total_months(), 30);
    }

    #[test]
    fn wrong_shape_fails() {
        let q = qualifier(TimeUnit::Hour, Some(TimeUnit::Minute));
        let err = q.validate_literal("1:2:3:4", Span::ZERO).unwrap_err();
        assert!(matches!(err, Error::InvalidIntervalLiteral { .. }));
    }

    #[test]
    fn hour_to_minute_leading_field_uses_precision() {
        // Default leading precision is 2, so 25 hours is in range (< 100)
        // while minute remains bounded by its modulus.
        let q = qualifier(TimeUnit::Hour, Some(TimeUnit::Minute));
        let fields = q.validate_literal("25:00", Span::ZERO).unwrap();
        assert_eq!(fields.hour, 25);

        let narrow = q.clone().with_leading_precision(1);
        let err = narrow.validate_literal("25:00", Span::ZERO).unwrap_err();
        assert!(matches!(err, Error::IntervalFieldOverflow { .. }));
    }

    #[test]
    fn secondary_field_modulus() {
        let q = qualifier(TimeUnit::Day, Some(TimeUnit::Hour));
        let err = q.validate_literal("1 24", Span::ZERO).unwrap_err();
        match err {
            Error::IntervalFieldOverflow { unit, value, .. } => {
                assert_eq!(unit, "HOUR");
                assert_eq!(value, "24");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let q = qualifier(TimeUnit::Minute, Some(TimeUnit::Second));
        assert!(q.validate_literal("5:60", Span::ZERO).is_err());
        assert!(q.validate_literal("5:59", Span::ZERO).is_ok());
    }

    #[test]
    fn fractional_seconds_normalize_to_millis() {
        let q = qualifier(TimeUnit::Second, None);
        assert_eq!(q.validate_literal("1.5", Span::ZERO).unwrap().millis, 500);
        assert_eq!(q.validate_literal("1.25", Span::ZERO).unwrap().millis, 250);
        assert_eq!(
            q.validate_literal("1.123456", Span::ZERO).unwrap().millis,
            123
        );
    }

    #[test]
    fn interval_value_magnitudes() {
        let q = qualifier(TimeUnit::Day, Some(TimeUnit::Second));
        let v = IntervalValue::parse("1 2:3:4", q, Span::ZERO).unwrap();
        assert_eq!(
            v.magnitude(),
            MILLIS_PER_DAY + 2 * MILLIS_PER_HOUR + 3 * MILLIS_PER_MINUTE + 4 * MILLIS_PER_SECOND
        );

        let q = qualifier(TimeUnit::Year, Some(TimeUnit::Month));
        let v = IntervalValue::parse("1-2", q, Span::ZERO).unwrap();
        assert_eq!(v.magnitude(), 14);
    }

    #[test]
    fn canonical_text_strips_trailing_zero_millis() {
        let q = qualifier(TimeUnit::Second, None);
        let v = IntervalValue::parse("1.500", q.clone(), Span::ZERO).unwrap();
        assert_eq!(v.canonical_text(), "1.5");

        let v = IntervalValue::parse("2.000", q, Span::ZERO).unwrap();
        assert_eq!(v.canonical_text(), "2");

        let q = qualifier(TimeUnit::Day, Some(TimeUnit::Second));
        let v = IntervalValue::parse("1 2:3:4", q, Span::ZERO).unwrap();
        assert_eq!(v.canonical_text(), "1 2:03:04");
    }

    #[test]
    fn equality_over_text_sign_qualifier() {
        let q = qualifier(TimeUnit::Minute, Some(TimeUnit::Second));
        let a = IntervalValue::parse("1:30", q.clone(), Span::ZERO).unwrap();
        let b = IntervalValue::parse("1:30", q.clone(), Span::ZERO).unwrap();
        // "90" seconds is a different qualifier, so never equal even though
        // the magnitude matches.
        let c =
            IntervalValue::parse("90", qualifier(TimeUnit::Second, None), Span::ZERO).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.magnitude(), c.magnitude());
        assert_ne!(a, c);
    }

    #[test]
    fn single_field_shapes() {
        for unit in [
            TimeUnit::Year,
            TimeUnit::Month,
            TimeUnit::Day,
            TimeUnit::Hour,
            TimeUnit::Minute,
        ] {
            let q = qualifier(unit, None);
            assert!(q.validate_literal("7", Span::ZERO).is_ok(), "{}", unit);
            assert!(q.validate_literal("7:1", Span::ZERO).is_err(), "{}", unit);
        }
    }

    #[test]
    fn qualifier_display() {
        let q = qualifier(TimeUnit::Day, Some(TimeUnit::Second));
        assert_eq!(q.to_string(), "DAY TO SECOND");
        let q = qualifier(TimeUnit::Year, None).with_leading_precision(3);
        assert_eq!(q.to_string(), "YEAR(3)");
        let q = qualifier(TimeUnit::Hour, Some(TimeUnit::Second)).with_fractional_precision(3);
        assert_eq!(q.to_string(), "HOUR TO SECOND(3)");
    }
}
