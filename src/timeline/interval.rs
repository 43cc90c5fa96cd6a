/*!
 * Closed time ranges used as cut ranges.
 */

use std::fmt;

use crate::errors::{SubtitleError, SubtitleResult};
use super::Timestamp;

/// A time range `[start, end]` with `end > start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Timestamp,
    end: Timestamp,
}

impl Interval {
    /// Create an interval, rejecting zero-length and inverted ranges
    pub fn new(start: Timestamp, end: Timestamp) -> SubtitleResult<Self> {
        if end <= start {
            return Err(SubtitleError::InvalidInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    /// Parse both endpoints and build the interval
    pub fn parse(start: &str, end: &str) -> SubtitleResult<Self> {
        Self::new(Timestamp::parse(start)?, Timestamp::parse(end)?)
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.duration_since(self.start)
    }

    /// True when the ranges share more than an endpoint
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// True when `inner` lies entirely within `self`, endpoints included
    pub fn contains(&self, inner: &Interval) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    /// Length of the part of this interval lying before `t`
    pub fn portion_before(&self, t: Timestamp) -> u64 {
        if self.start >= t {
            0
        } else {
            self.end.min(t).duration_since(self.start)
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.start, self.end)
    }
}
