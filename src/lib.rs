//! calpat — calendar pattern calculator.
//!
//! Finds the nearest point in time, before or after a reference instant, at
//! which a set of independent calendar constraints ("patterns" — year,
//! month, day, day of week, hour, minute, second) all hold simultaneously,
//! honoring time-zone/DST rules and the representable range of year 1
//! through year 9999. This is the matching engine underneath cron-like
//! schedulers: "February AND day 29" must land on a leap year, which no
//! single constraint knows on its own.
//!
//! # Examples
//!
//! ```
//! use calpat::{Calculator, Pattern, RangeEdge};
//! use jiff::tz::TimeZone;
//!
//! let payday = [Pattern::day(28)?, Pattern::hour(9)?];
//! let now: jiff::Zoned = "2024-02-12T08:30:00[UTC]".parse()?;
//!
//! let next = Calculator::next_aligned(&payday, &now, &TimeZone::UTC, RangeEdge::Beginning)?;
//! assert_eq!(next.unwrap().to_string(), "2024-02-28T09:00:00+00:00[UTC]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod align;
pub mod bound;
pub mod calc;
pub mod component;
pub mod error;
pub mod pattern;

pub use align::{align_to_edge, RangeEdge};
pub use bound::Direction;
pub use calc::{Alternative, Calculator, IterationHook};
pub use component::{higher_ranked, lower_ranked, Component, ComponentSet};
pub use error::PatternError;
pub use pattern::Pattern;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wire shape for [`Pattern`]: a unit name and a numeric value. Day-of-week
/// values count Monday as 1 through Sunday as 7. Deserialization funnels
/// through the validating constructors, so out-of-domain values are rejected
/// the same way direct construction rejects them.
#[cfg(feature = "serde")]
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PatternRepr {
    unit: String,
    value: i16,
}

#[cfg(feature = "serde")]
impl From<Pattern> for PatternRepr {
    fn from(pattern: Pattern) -> Self {
        let (unit, value) = match pattern {
            Pattern::Year(year) => ("year", year),
            Pattern::Month(month) => ("month", i16::from(month)),
            Pattern::Day(day) => ("day", i16::from(day)),
            Pattern::DayOfWeek(weekday) => {
                ("day_of_week", i16::from(weekday.to_monday_one_offset()))
            }
            Pattern::Hour(hour) => ("hour", i16::from(hour)),
            Pattern::Minute(minute) => ("minute", i16::from(minute)),
            Pattern::Second(second) => ("second", i16::from(second)),
        };
        PatternRepr {
            unit: unit.to_string(),
            value,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<PatternRepr> for Pattern {
    type Error = PatternError;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        let narrow = |value: i16| -> Result<i8, PatternError> {
            i8::try_from(value)
                .map_err(|_| PatternError::range(format!("value out of range: {value}")))
        };
        match repr.unit.as_str() {
            "year" => Pattern::year(repr.value),
            "month" => Pattern::month(narrow(repr.value)?),
            "day" => Pattern::day(narrow(repr.value)?),
            "day_of_week" => jiff::civil::Weekday::from_monday_one_offset(narrow(repr.value)?)
                .map(Pattern::day_of_week)
                .map_err(|_| {
                    PatternError::range(format!(
                        "day of week must be in 1..=7, got {}",
                        repr.value
                    ))
                }),
            "hour" => Pattern::hour(narrow(repr.value)?),
            "minute" => Pattern::minute(narrow(repr.value)?),
            "second" => Pattern::second(narrow(repr.value)?),
            other => Err(PatternError::range(format!("unknown pattern unit '{other}'"))),
        }
    }
}
