use jiff::civil::DateTime;
use jiff::Span;

use crate::component::{Component, ComponentSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which extreme of a range to align unconstrained ranks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RangeEdge {
    /// The beginning of a range, e.g. March 1st if the range is "March".
    Beginning,
    /// The end of a range, e.g. March 31st if the range is "March".
    End,
}

/// Rewrites each rank in `components` to its minimum (`Beginning`) or
/// maximum (`End`) legal value, leaving every other rank untouched.
///
/// Ranks are applied coarsest first regardless of how the set was built, so
/// the day maximum is taken from the possibly just-aligned year and month and
/// the set's construction order cannot affect the outcome. Year, month and
/// day rewrites use calendar span arithmetic, which constrains the
/// day-of-month the way the host calendar does (Feb 29 aligned to a
/// non-leap year lands on Feb 28).
///
/// The result is idempotent: aligning an already aligned datetime with the
/// same edge and set returns it unchanged.
pub fn align_to_edge(
    dt: DateTime,
    edge: RangeEdge,
    components: ComponentSet,
) -> Result<DateTime, jiff::Error> {
    let mut dt = dt;
    for c in components.iter() {
        dt = match c {
            Component::Year => {
                let target = match edge {
                    RangeEdge::Beginning => 1,
                    RangeEdge::End => 9999,
                };
                dt.checked_add(Span::new().years(target - i64::from(dt.year())))?
            }
            Component::Month => {
                let target = match edge {
                    RangeEdge::Beginning => 1,
                    RangeEdge::End => 12,
                };
                dt.checked_add(Span::new().months(target - i64::from(dt.month())))?
            }
            Component::Day => {
                let target = match edge {
                    RangeEdge::Beginning => 1,
                    RangeEdge::End => i64::from(dt.date().days_in_month()),
                };
                dt.checked_add(Span::new().days(target - i64::from(dt.day())))?
            }
            Component::Hour => match edge {
                RangeEdge::Beginning => dt.with().hour(0).build()?,
                RangeEdge::End => dt.with().hour(23).build()?,
            },
            Component::Minute => match edge {
                RangeEdge::Beginning => dt.with().minute(0).build()?,
                RangeEdge::End => dt.with().minute(59).build()?,
            },
            Component::Second => match edge {
                RangeEdge::Beginning => dt.with().second(0).build()?,
                RangeEdge::End => dt.with().second(59).build()?,
            },
            Component::Millisecond => match edge {
                RangeEdge::Beginning => dt.with().millisecond(0).build()?,
                RangeEdge::End => dt.with().millisecond(999).build()?,
            },
            Component::Nanosecond => match edge {
                RangeEdge::Beginning => dt.with().microsecond(0).nanosecond(0).build()?,
                RangeEdge::End => dt.with().microsecond(999).nanosecond(999).build()?,
            },
        };
    }
    Ok(dt)
}
