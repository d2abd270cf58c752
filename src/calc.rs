use jiff::tz::TimeZone;
use jiff::{SignedDuration, Zoned};

use crate::align::{align_to_edge, RangeEdge};
use crate::bound::Direction;
use crate::component::{lower_ranked, ComponentSet};
use crate::error::PatternError;
use crate::pattern::Pattern;

/// One pattern's proposal within a convergence round.
///
/// Surfaced only through the diagnostic hook; the engine never keeps
/// alternatives across rounds.
#[derive(Debug, Clone)]
pub struct Alternative {
    /// Position of the proposing pattern in the caller's slice.
    pub index: usize,
    /// The instant the pattern proposed, or `None` if it found no occurrence
    /// within the representable range.
    pub proposed: Option<Zoned>,
    /// Distance of the proposal from the round's reference instant, always
    /// non-negative in the search direction.
    pub distance: Option<SignedDuration>,
}

/// Observational hook invoked once per convergence round with the full list
/// of alternatives considered and the index (into that list) of the chosen
/// one. Must not influence the result.
pub type IterationHook<'a> = &'a mut dyn FnMut(&[Alternative], usize);

/// Finds the nearest instant at which a set of patterns all match
/// simultaneously.
///
/// The calculator holds no state; all entry points are associated functions.
///
/// The plain entry points leave ranks finer than each pattern's own exactly
/// as the last advancing pattern produced them, which aligns only that one
/// pattern's sub-range. The `_aligned` entry points additionally rewrite
/// every rank below the finest pattern-affected rank to the requested edge;
/// for pattern sets spanning several ranks the two give different results.
///
/// ```
/// use calpat::{Calculator, Pattern, RangeEdge};
/// use jiff::tz::TimeZone;
///
/// let patterns = [Pattern::month(2)?, Pattern::day(29)?];
/// let start: jiff::Zoned = "2020-02-29T00:00:00[UTC]".parse()?;
/// let next = Calculator::next_aligned(&patterns, &start, &TimeZone::UTC, RangeEdge::Beginning)?;
/// assert_eq!(next.unwrap().to_string(), "2024-02-29T00:00:00+00:00[UTC]");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    /// The nearest instant strictly after `start` at which every pattern
    /// matches, or `None` if no such instant exists within the representable
    /// range.
    ///
    /// Fails fast if `patterns` is empty.
    pub fn next(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Next, None, None)
    }

    /// Like [`next`](Calculator::next), additionally aligning every rank
    /// below the finest pattern-affected rank to `edge`.
    pub fn next_aligned(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
        edge: RangeEdge,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Next, Some(edge), None)
    }

    /// Like [`next`](Calculator::next) with an optional edge and a
    /// diagnostic hook observing each convergence round.
    pub fn next_with_hook(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
        edge: Option<RangeEdge>,
        hook: IterationHook<'_>,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Next, edge, Some(hook))
    }

    /// The nearest instant strictly before `start` at which every pattern
    /// matches, or `None` if no such instant exists within the representable
    /// range.
    ///
    /// Fails fast if `patterns` is empty.
    pub fn previous(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Previous, None, None)
    }

    /// Like [`previous`](Calculator::previous), additionally aligning every
    /// rank below the finest pattern-affected rank to `edge`.
    pub fn previous_aligned(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
        edge: RangeEdge,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Previous, Some(edge), None)
    }

    /// Like [`previous`](Calculator::previous) with an optional edge and a
    /// diagnostic hook observing each convergence round.
    pub fn previous_with_hook(
        patterns: &[Pattern],
        start: &Zoned,
        tz: &TimeZone,
        edge: Option<RangeEdge>,
        hook: IterationHook<'_>,
    ) -> Result<Option<Zoned>, PatternError> {
        converge(patterns, start, tz, Direction::Previous, edge, Some(hook))
    }
}

/// The fixed-point search: seed with every pattern forced to advance past
/// `start`, then repeatedly re-invoke only the patterns not matching the
/// working candidate until all match or the active subset proves there is no
/// occurrence. Each round moves the candidate strictly further in the search
/// direction and the range is finite, so the loop terminates.
fn converge(
    patterns: &[Pattern],
    start: &Zoned,
    tz: &TimeZone,
    direction: Direction,
    edge: Option<RangeEdge>,
    mut hook: Option<IterationHook<'_>>,
) -> Result<Option<Zoned>, PatternError> {
    if patterns.is_empty() {
        return Err(PatternError::argument("patterns must not be empty"));
    }

    let start = start.with_time_zone(tz.clone());

    // Seed round over every pattern, forcing the result past `start` even if
    // `start` already matches everything.
    let all: Vec<usize> = (0..patterns.len()).collect();
    let mut candidate = match advance_round(patterns, &all, &start, tz, direction, &mut hook) {
        Some(candidate) => candidate,
        None => return Ok(None),
    };

    loop {
        let pending: Vec<usize> = (0..patterns.len())
            .filter(|&i| !patterns[i].matches(&candidate))
            .collect();

        if pending.is_empty() {
            if let Some(edge) = edge {
                let used: ComponentSet = patterns.iter().map(|p| p.component()).collect();
                let aligned = align_to_edge(candidate.datetime(), edge, lower_ranked(used))
                    .map_err(|e| PatternError::argument(format!("edge alignment failed: {e}")))?;
                candidate = aligned
                    .to_zoned(tz.clone())
                    .map_err(|e| PatternError::argument(format!("edge alignment failed: {e}")))?;
            }
            return Ok(Some(candidate));
        }

        candidate = match advance_round(patterns, &pending, &candidate, tz, direction, &mut hook) {
            Some(candidate) => candidate,
            None => return Ok(None),
        };
    }
}

/// One round: gather every active pattern's proposal relative to `reference`
/// and pick the nearest. Ties keep the first proposer in the caller's
/// original order; the selection is a single strict-`<` scan, never a sort.
fn advance_round(
    patterns: &[Pattern],
    active: &[usize],
    reference: &Zoned,
    tz: &TimeZone,
    direction: Direction,
    hook: &mut Option<IterationHook<'_>>,
) -> Option<Zoned> {
    let mut alternatives = Vec::with_capacity(active.len());
    for &index in active {
        let proposed = match direction {
            Direction::Next => patterns[index].next(reference, tz),
            Direction::Previous => patterns[index].previous(reference, tz),
        };
        let distance = proposed.as_ref().map(|instant| match direction {
            Direction::Next => reference.duration_until(instant),
            Direction::Previous => instant.duration_until(reference),
        });
        alternatives.push(Alternative {
            index,
            proposed,
            distance,
        });
    }

    let mut best: Option<(usize, SignedDuration)> = None;
    for (i, alternative) in alternatives.iter().enumerate() {
        let Some(distance) = alternative.distance else {
            continue;
        };
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    let (chosen, _) = best?;
    if let Some(hook) = hook {
        hook(&alternatives, chosen);
    }
    alternatives[chosen].proposed.clone()
}
