use jiff::civil::{self, DateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum instant the calculator operates on: 0001-01-01T00:00:00.0.
pub(crate) const DT_MIN: DateTime = civil::date(1, 1, 1).at(0, 0, 0, 0);

/// Maximum instant the calculator operates on: 9999-12-31T23:59:59.999999999.
pub(crate) const DT_MAX: DateTime = civil::date(9999, 12, 31).at(23, 59, 59, MAX_SUBSEC);

/// Maximum sub-second value, one whole second minus one nanosecond.
pub(crate) const MAX_SUBSEC: i32 = 999_999_999;

/// One rank of the calendar decomposition of an instant, ordered by
/// descending coarseness: `Year` is the coarsest rank, `Nanosecond` the
/// finest.
///
/// `Millisecond` covers the sub-second fraction (0..=999); `Nanosecond`
/// covers the remainder below one millisecond (0..=999_999 nanoseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Component {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Nanosecond,
}

impl Component {
    /// All ranks in descending coarseness, `Year` first.
    pub const ALL: [Component; 8] = [
        Component::Year,
        Component::Month,
        Component::Day,
        Component::Hour,
        Component::Minute,
        Component::Second,
        Component::Millisecond,
        Component::Nanosecond,
    ];

    /// Position in the rank order, 0 for `Year` through 7 for `Nanosecond`.
    pub fn rank(self) -> u8 {
        self as u8
    }

    fn bit(self) -> u8 {
        1 << self.rank()
    }
}

/// A set of [`Component`] ranks.
///
/// Empty is legal and means "no constraint". Iteration yields members in
/// descending coarseness, `Year` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentSet(u8);

impl ComponentSet {
    pub const EMPTY: ComponentSet = ComponentSet(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, component: Component) -> bool {
        self.0 & component.bit() != 0
    }

    pub fn insert(&mut self, component: Component) {
        self.0 |= component.bit();
    }

    #[must_use]
    pub fn with(mut self, component: Component) -> Self {
        self.insert(component);
        self
    }

    #[must_use]
    pub fn union(self, other: ComponentSet) -> Self {
        ComponentSet(self.0 | other.0)
    }

    /// Members in descending coarseness.
    pub fn iter(self) -> impl Iterator<Item = Component> {
        Component::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// The coarsest member, if any.
    pub fn coarsest(self) -> Option<Component> {
        self.iter().next()
    }

    /// The finest member, if any.
    pub fn finest(self) -> Option<Component> {
        self.iter().last()
    }
}

impl FromIterator<Component> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut set = ComponentSet::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}

/// Every rank strictly finer than the finest rank in `used`.
///
/// An empty `used` set means "no constraint" and yields all ranks.
pub fn lower_ranked(used: ComponentSet) -> ComponentSet {
    match used.finest() {
        Some(finest) => Component::ALL
            .into_iter()
            .filter(|c| c.rank() > finest.rank())
            .collect(),
        None => Component::ALL.into_iter().collect(),
    }
}

/// Every rank strictly coarser than the coarsest rank in `used`.
///
/// An empty `used` set means "no constraint" and yields all ranks.
pub fn higher_ranked(used: ComponentSet) -> ComponentSet {
    match used.coarsest() {
        Some(coarsest) => Component::ALL
            .into_iter()
            .filter(|c| c.rank() < coarsest.rank())
            .collect(),
        None => Component::ALL.into_iter().collect(),
    }
}

/// Extract the value of a single rank from a wall-clock datetime.
pub(crate) fn component_value(dt: DateTime, component: Component) -> i64 {
    match component {
        Component::Year => i64::from(dt.year()),
        Component::Month => i64::from(dt.month()),
        Component::Day => i64::from(dt.day()),
        Component::Hour => i64::from(dt.hour()),
        Component::Minute => i64::from(dt.minute()),
        Component::Second => i64::from(dt.second()),
        Component::Millisecond => i64::from(dt.millisecond()),
        Component::Nanosecond => i64::from(dt.subsec_nanosecond() % 1_000_000),
    }
}
