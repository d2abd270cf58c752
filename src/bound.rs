use jiff::civil::DateTime;
use jiff::Span;

use crate::component::{component_value, higher_ranked, Component, ComponentSet};

/// Which way a search moves through time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ahead, toward the future.
    Next,
    /// Back, toward the past.
    Previous,
}

/// Checks whether a search for `target` at `component` could still land
/// within `bound` when continuing from `dt` in `direction`.
///
/// The check works without constructing the candidate instant, which might
/// not be representable at all (Feb 31) or might overflow the range. It walks
/// every rank coarser than `component` from coarsest to finest: if `dt` is
/// strictly on the permitted side of `bound` at some rank there is room to
/// spare and the finer ranks are irrelevant; strictly on the forbidden side
/// means the bound is already passed. Only when all coarser ranks tie with
/// `bound` does the target value itself decide.
///
/// For pattern combinations more complex than a single target value per unit
/// this simple per-rank walk can report false positives; the per-unit
/// searches tolerate that by failing on construction instead.
pub(crate) fn complies_with_bound(
    dt: DateTime,
    bound: DateTime,
    component: Component,
    target: i64,
    direction: Direction,
) -> bool {
    for c in higher_ranked(ComponentSet::EMPTY.with(component)).iter() {
        let dt_value = component_value(dt, c);
        let bound_value = component_value(bound, c);
        match direction {
            Direction::Next => {
                if dt_value < bound_value {
                    return true;
                }
                if dt_value > bound_value {
                    return false;
                }
            }
            Direction::Previous => {
                if dt_value > bound_value {
                    return true;
                }
                if dt_value < bound_value {
                    return false;
                }
            }
        }
    }

    // All coarser ranks tie with the bound; the target value decides.
    match direction {
        Direction::Next => target <= component_value(bound, component),
        Direction::Previous => target >= component_value(bound, component),
    }
}

/// Checks whether `dt` plus `days_to_add` days (at most seven) stays at or
/// below `bound`.
///
/// When the addition stays within the same calendar year, or the year is not
/// the bound's extreme year, a direct datetime comparison is safe. Otherwise
/// a year overflow would be required, which the range cannot represent.
pub(crate) fn complies_with_upper_bound(dt: DateTime, days_to_add: i64, bound: DateTime) -> bool {
    if i64::from(dt.date().day_of_year()) + days_to_add <= i64::from(dt.date().days_in_year())
        || dt.year() < bound.year()
    {
        return dt
            .checked_add(Span::new().days(days_to_add))
            .is_ok_and(|advanced| advanced <= bound);
    }
    false
}

/// Checks whether `dt` minus `days_to_subtract` days (at most seven) stays at
/// or above `bound`.
pub(crate) fn complies_with_lower_bound(
    dt: DateTime,
    days_to_subtract: i64,
    bound: DateTime,
) -> bool {
    if i64::from(dt.date().day_of_year()) - days_to_subtract >= 1 || dt.year() > bound.year() {
        return dt
            .checked_sub(Span::new().days(days_to_subtract))
            .is_ok_and(|retreated| retreated >= bound);
    }
    false
}
