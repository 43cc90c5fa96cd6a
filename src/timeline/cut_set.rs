/*!
 * Cut-range normalization.
 *
 * A `CutSet` is the read-only removal plan handed to the compactor. It is
 * built from raw `(start, end)` timestamp text, either supplied directly or
 * read line by line from a cut-range file, and is kept sorted ascending by
 * start. Overlapping or touching ranges are kept as given: the compactor
 * applies each range on its own, so overlapping ranges accumulate.
 */

use log::{debug, trace};

use crate::errors::{SubtitleError, SubtitleResult};
use super::{Interval, Timestamp};

/// Separator of the arrow form `start --> end`
const ARROW_SEPARATOR: &str = "-->";

/// Separator of the short form `start-end`
const DASH_SEPARATOR: char = '-';

/// Sorted cut intervals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutSet {
    intervals: Vec<Interval>,
}

impl CutSet {
    /// A cut set that removes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-validated intervals; the sort is stable
    pub fn from_intervals(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(|interval| interval.start());
        CutSet { intervals }
    }

    /// Parse and validate `(start_text, end_text)` pairs, then sort them
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, S)]) -> SubtitleResult<Self> {
        let intervals = pairs
            .iter()
            .map(|(start, end)| Interval::parse(start.as_ref(), end.as_ref()))
            .collect::<SubtitleResult<Vec<_>>>()?;

        debug!("Parsed {} cut range(s)", intervals.len());
        Ok(Self::from_intervals(intervals))
    }

    /// Parse the contents of a cut-range file, one range per line
    ///
    /// Blank lines are ignored. Each remaining line is `start --> end` or
    /// `start-end`.
    pub fn parse_cut_ranges(content: &str) -> SubtitleResult<Self> {
        let pairs = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(split_cut_line)
            .collect::<SubtitleResult<Vec<_>>>()?;

        Self::from_pairs(&pairs)
    }

    /// Reject cut sets containing ranges that overlap each other
    ///
    /// Touching ranges (one ends where the next starts) are accepted.
    pub fn ensure_disjoint(&self) -> SubtitleResult<()> {
        let mut widest: Option<&Interval> = None;

        for interval in &self.intervals {
            if let Some(previous) = widest {
                if previous.overlaps(interval) {
                    return Err(SubtitleError::OverlappingCuts {
                        first: *previous,
                        second: *interval,
                    });
                }
                if interval.end() > previous.end() {
                    widest = Some(interval);
                }
            } else {
                widest = Some(interval);
            }
        }

        Ok(())
    }

    /// Total removed milliseconds lying before `t`
    ///
    /// Every interval contributes its own prefix up to `t`, so overlapping
    /// intervals are counted once each.
    pub fn total_cut_duration_before(&self, t: Timestamp) -> u64 {
        let total = self
            .intervals
            .iter()
            .take_while(|interval| interval.start() < t)
            .map(|interval| interval.portion_before(t))
            .sum();

        trace!("Cut duration before {}: {}ms", t, total);
        total
    }

    /// Sum of all interval lengths
    pub fn total_duration_ms(&self) -> u64 {
        self.intervals.iter().map(Interval::duration_ms).sum()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// Split a cut-range line into its start and end text
pub fn split_cut_line(line: &str) -> SubtitleResult<(&str, &str)> {
    let (start, end) = line
        .split_once(ARROW_SEPARATOR)
        .or_else(|| line.split_once(DASH_SEPARATOR))
        .ok_or_else(|| SubtitleError::MalformedCutRange(line.to_string()))?;

    Ok((start.trim(), end.trim()))
}
