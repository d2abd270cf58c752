use jiff::civil::{Date, DateTime, Weekday};
use jiff::tz::{AmbiguousOffset, TimeZone};
use jiff::{Span, Zoned};

use crate::bound::{
    complies_with_bound, complies_with_lower_bound, complies_with_upper_bound, Direction,
};
use crate::component::{component_value, Component, DT_MAX, DT_MIN, MAX_SUBSEC};
use crate::error::PatternError;

/// Hard cap on container rollover steps, derived from the representable year
/// span. A per-unit search never legitimately comes close; the cap keeps
/// termination independent of the bound check.
const ROLLOVER_LIMIT: u32 = 9999 * 12;

/// A single calendar constraint: one target value for one unit.
///
/// Patterns are immutable after construction and construction validates the
/// value against the unit's legal domain. A pattern on its own can answer
/// whether an instant matches ([`matches`](Pattern::matches)) and can find
/// the nearest instant at which its unit takes the target value
/// ([`next`](Pattern::next) / [`previous`](Pattern::previous)); combining
/// several patterns is the job of [`Calculator`](crate::Calculator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "crate::PatternRepr", into = "crate::PatternRepr")
)]
pub enum Pattern {
    /// A year A.D., 1..=9999.
    Year(i16),
    /// A month of the year, 1..=12.
    Month(i8),
    /// A day of the month, 1..=31.
    Day(i8),
    /// A day of the week.
    DayOfWeek(Weekday),
    /// An hour of the day, 0..=23.
    Hour(i8),
    /// A minute of the hour, 0..=59.
    Minute(i8),
    /// A second of the minute, 0..=59.
    Second(i8),
}

impl Pattern {
    /// A pattern matching one year A.D.
    pub fn year(year: i16) -> Result<Self, PatternError> {
        if !(1..=9999).contains(&year) {
            return Err(PatternError::range(format!(
                "year must be in 1..=9999, got {year}"
            )));
        }
        Ok(Pattern::Year(year))
    }

    /// A pattern matching one month of the year.
    pub fn month(month: i8) -> Result<Self, PatternError> {
        if !(1..=12).contains(&month) {
            return Err(PatternError::range(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Pattern::Month(month))
    }

    /// A pattern matching one day of the month.
    ///
    /// Days 29..=31 are legal and simply never match in months too short for
    /// them; the searches skip such months.
    pub fn day(day: i8) -> Result<Self, PatternError> {
        if !(1..=31).contains(&day) {
            return Err(PatternError::range(format!(
                "day must be in 1..=31, got {day}"
            )));
        }
        Ok(Pattern::Day(day))
    }

    /// A pattern matching one day of the week.
    pub fn day_of_week(weekday: Weekday) -> Self {
        Pattern::DayOfWeek(weekday)
    }

    /// A pattern matching one hour of the day.
    pub fn hour(hour: i8) -> Result<Self, PatternError> {
        if !(0..=23).contains(&hour) {
            return Err(PatternError::range(format!(
                "hour must be in 0..=23, got {hour}"
            )));
        }
        Ok(Pattern::Hour(hour))
    }

    /// A pattern matching one minute of the hour.
    pub fn minute(minute: i8) -> Result<Self, PatternError> {
        if !(0..=59).contains(&minute) {
            return Err(PatternError::range(format!(
                "minute must be in 0..=59, got {minute}"
            )));
        }
        Ok(Pattern::Minute(minute))
    }

    /// A pattern matching one second of the minute.
    pub fn second(second: i8) -> Result<Self, PatternError> {
        if !(0..=59).contains(&second) {
            return Err(PatternError::range(format!(
                "second must be in 0..=59, got {second}"
            )));
        }
        Ok(Pattern::Second(second))
    }

    /// The calendar rank this pattern constrains.
    ///
    /// A day-of-week pattern constrains the day rank.
    pub fn component(&self) -> Component {
        match self {
            Pattern::Year(_) => Component::Year,
            Pattern::Month(_) => Component::Month,
            Pattern::Day(_) | Pattern::DayOfWeek(_) => Component::Day,
            Pattern::Hour(_) => Component::Hour,
            Pattern::Minute(_) => Component::Minute,
            Pattern::Second(_) => Component::Second,
        }
    }

    /// Whether the instant's own rank equals the target value.
    ///
    /// The instant's wall clock is read as-is; it must already be in the
    /// time zone the caller cares about.
    pub fn matches(&self, instant: &Zoned) -> bool {
        let dt = instant.datetime();
        match *self {
            Pattern::Year(year) => dt.year() == year,
            Pattern::Month(month) => dt.month() == month,
            Pattern::Day(day) => dt.day() == day,
            Pattern::DayOfWeek(weekday) => dt.weekday() == weekday,
            Pattern::Hour(hour) => dt.hour() == hour,
            Pattern::Minute(minute) => dt.minute() == minute,
            Pattern::Second(second) => dt.second() == second,
        }
    }

    /// The nearest instant strictly after `after` (in whole-unit steps) at
    /// which this pattern's unit takes its target value, with every finer
    /// rank at its minimum.
    ///
    /// DST-invalid local times are skipped, as are months too short for a
    /// target day. Returns `None` when no occurrence exists within the
    /// representable range.
    pub fn next(&self, after: &Zoned, tz: &TimeZone) -> Option<Zoned> {
        self.search(after, tz, Direction::Next)
    }

    /// The nearest instant strictly before `before` (in whole-unit steps) at
    /// which this pattern's unit takes its target value, with every finer
    /// rank at its maximum (23:59:59.999999999 below a day target).
    ///
    /// Returns `None` when no occurrence exists within the representable
    /// range.
    pub fn previous(&self, before: &Zoned, tz: &TimeZone) -> Option<Zoned> {
        self.search(before, tz, Direction::Previous)
    }

    fn search(&self, reference: &Zoned, tz: &TimeZone, direction: Direction) -> Option<Zoned> {
        let local = reference.with_time_zone(tz.clone()).datetime();
        let result = match *self {
            Pattern::Year(year) => year_search(local, year, direction),
            Pattern::DayOfWeek(weekday) => weekday_search(local, weekday, direction),
            Pattern::Month(month) => {
                unit_search(local, tz, Component::Month, i64::from(month), direction)
            }
            Pattern::Day(day) => unit_search(local, tz, Component::Day, i64::from(day), direction),
            Pattern::Hour(hour) => {
                unit_search(local, tz, Component::Hour, i64::from(hour), direction)
            }
            Pattern::Minute(minute) => {
                unit_search(local, tz, Component::Minute, i64::from(minute), direction)
            }
            Pattern::Second(second) => {
                unit_search(local, tz, Component::Second, i64::from(second), direction)
            }
        };
        result?.to_zoned(tz.clone()).ok()
    }
}

/// Whether a wall-clock datetime does not exist in `tz` due to a forward
/// clock transition.
fn is_dst_gap(tz: &TimeZone, dt: DateTime) -> bool {
    matches!(
        tz.to_ambiguous_timestamp(dt).offset(),
        AmbiguousOffset::Gap { .. }
    )
}

/// The datetime with `component` set to `target` and every finer rank at its
/// minimum; coarser ranks are taken from `dt`. Fails for calendar-invalid
/// combinations such as a day target beyond the month's length.
fn unit_floor(dt: DateTime, component: Component, target: i64) -> Result<DateTime, jiff::Error> {
    match component {
        Component::Year => DateTime::new(target as i16, 1, 1, 0, 0, 0, 0),
        Component::Month => DateTime::new(dt.year(), target as i8, 1, 0, 0, 0, 0),
        Component::Day => DateTime::new(dt.year(), dt.month(), target as i8, 0, 0, 0, 0),
        Component::Hour => DateTime::new(dt.year(), dt.month(), dt.day(), target as i8, 0, 0, 0),
        Component::Minute => DateTime::new(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            target as i8,
            0,
            0,
        ),
        Component::Second => DateTime::new(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            target as i8,
            0,
        ),
        Component::Millisecond | Component::Nanosecond => {
            unreachable!("no pattern constrains sub-second ranks")
        }
    }
}

/// The datetime with `component` set to `target` and every finer rank at its
/// maximum, including the maximal sub-second remainder.
fn unit_ceiling(dt: DateTime, component: Component, target: i64) -> Result<DateTime, jiff::Error> {
    match component {
        Component::Year => DateTime::new(target as i16, 12, 31, 23, 59, 59, MAX_SUBSEC),
        Component::Month => {
            let first = Date::new(dt.year(), target as i8, 1)?;
            Ok(first.last_of_month().at(23, 59, 59, MAX_SUBSEC))
        }
        Component::Day => DateTime::new(
            dt.year(),
            dt.month(),
            target as i8,
            23,
            59,
            59,
            MAX_SUBSEC,
        ),
        Component::Hour => DateTime::new(
            dt.year(),
            dt.month(),
            dt.day(),
            target as i8,
            59,
            59,
            MAX_SUBSEC,
        ),
        Component::Minute => DateTime::new(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            target as i8,
            59,
            MAX_SUBSEC,
        ),
        Component::Second => DateTime::new(
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            target as i8,
            MAX_SUBSEC,
        ),
        Component::Millisecond | Component::Nanosecond => {
            unreachable!("no pattern constrains sub-second ranks")
        }
    }
}

/// One step of the next-coarser container: a year for a month search, a
/// month for a day search, then day, hour and minute for the time units.
fn step_container(
    dt: DateTime,
    component: Component,
    direction: Direction,
) -> Result<DateTime, jiff::Error> {
    let span = match component {
        Component::Month => Span::new().years(1),
        Component::Day => Span::new().months(1),
        Component::Hour => Span::new().days(1),
        Component::Minute => Span::new().hours(1),
        Component::Second => Span::new().minutes(1),
        Component::Year | Component::Millisecond | Component::Nanosecond => {
            unreachable!("no container exists for this rank")
        }
    };
    match direction {
        Direction::Next => dt.checked_add(span),
        Direction::Previous => dt.checked_sub(span),
    }
}

/// Shared search for the container-stepping units (month, day, hour, minute,
/// second).
///
/// Each iteration first proves the target can still land within the range
/// bound, then decides whether the candidate must roll to the next/previous
/// container: on the first iteration when merely writing the target would
/// not move time in the search direction, and on any iteration when the
/// target produces a calendar-invalid or DST-invalid local time. A container
/// step past the civil range ends the search with no result.
fn unit_search(
    start: DateTime,
    tz: &TimeZone,
    component: Component,
    target: i64,
    direction: Direction,
) -> Option<DateTime> {
    let bound = match direction {
        Direction::Next => DT_MAX,
        Direction::Previous => DT_MIN,
    };

    let mut candidate = start;
    let mut first_iteration = true;
    let mut steps = 0u32;

    loop {
        if !complies_with_bound(candidate, bound, component, target, direction) {
            return None;
        }

        let own = component_value(candidate, component);
        let satisfied_already = match direction {
            Direction::Next => own >= target,
            Direction::Previous => own <= target,
        };
        let invalid_here = match unit_floor(candidate, component, target) {
            Ok(trial) => is_dst_gap(tz, trial),
            // Calendar-invalid, e.g. day 30 in February.
            Err(_) => true,
        };

        if (first_iteration && satisfied_already) || invalid_here {
            first_iteration = false;
            steps += 1;
            if steps > ROLLOVER_LIMIT {
                return None;
            }
            candidate = step_container(candidate, component, direction).ok()?;
        } else {
            break;
        }
    }

    match direction {
        Direction::Next => unit_floor(candidate, component, target).ok(),
        Direction::Previous => unit_ceiling(candidate, component, target).ok(),
    }
}

/// Year has no coarser container to roll, so the search degenerates to a
/// direct comparison: the target year must lie strictly beyond the
/// reference's year in the search direction.
fn year_search(start: DateTime, target: i16, direction: Direction) -> Option<DateTime> {
    match direction {
        Direction::Next => {
            if !complies_with_bound(
                start,
                DT_MAX,
                Component::Year,
                i64::from(target),
                Direction::Next,
            ) || start.year() >= target
            {
                return None;
            }
            DateTime::new(target, 1, 1, 0, 0, 0, 0).ok()
        }
        Direction::Previous => {
            if !complies_with_bound(
                start,
                DT_MIN,
                Component::Year,
                i64::from(target),
                Direction::Previous,
            ) || start.year() <= target
            {
                return None;
            }
            DateTime::new(target, 12, 31, 23, 59, 59, MAX_SUBSEC).ok()
        }
    }
}

/// Day-of-week advances by a signed day delta of magnitude 1..=7, never 0:
/// a reference already on the target weekday moves a full week.
fn weekday_search(start: DateTime, target: Weekday, direction: Direction) -> Option<DateTime> {
    let target_number = i64::from(target.to_monday_one_offset());
    let start_number = i64::from(start.weekday().to_monday_one_offset());

    match direction {
        Direction::Next => {
            let mut days_to_add = target_number - start_number;
            if days_to_add <= 0 {
                days_to_add += 7;
            }
            if !complies_with_upper_bound(start, days_to_add, DT_MAX) {
                return None;
            }
            let advanced = start.checked_add(Span::new().days(days_to_add)).ok()?;
            DateTime::new(advanced.year(), advanced.month(), advanced.day(), 0, 0, 0, 0).ok()
        }
        Direction::Previous => {
            let mut days_to_subtract = start_number - target_number;
            if days_to_subtract <= 0 {
                days_to_subtract += 7;
            }
            if !complies_with_lower_bound(start, days_to_subtract, DT_MIN) {
                return None;
            }
            let retreated = start.checked_sub(Span::new().days(days_to_subtract)).ok()?;
            DateTime::new(
                retreated.year(),
                retreated.month(),
                retreated.day(),
                23,
                59,
                59,
                MAX_SUBSEC,
            )
            .ok()
        }
    }
}
