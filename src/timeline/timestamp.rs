/*!
 * Millisecond-precision track timestamps.
 */

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SubtitleError, SubtitleResult};

// Applied after ',' has been normalized to '.'
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})\.(\d{3})$").unwrap()
});

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A non-negative offset from the start of a subtitle track, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Track start
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Parse `HH:MM:SS.mmm` or `HH:MM:SS,mmm`
    ///
    /// Hours may have any number of digits; minutes and seconds must be
    /// below 60 and milliseconds must have exactly three digits.
    pub fn parse(text: &str) -> SubtitleResult<Self> {
        let normalized = text.trim().replace(',', ".");
        let malformed = || SubtitleError::MalformedTimestamp(text.to_string());

        let caps = TIMESTAMP_REGEX.captures(&normalized).ok_or_else(malformed)?;
        let field = |idx: usize| -> SubtitleResult<u64> {
            caps[idx].parse::<u64>().map_err(|_| malformed())
        };

        let hours = field(1)?;
        let minutes = field(2)?;
        let seconds = field(3)?;
        let millis = field(4)?;

        if minutes >= 60 || seconds >= 60 {
            return Err(malformed());
        }

        hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
            .map(Timestamp)
            .ok_or_else(malformed)
    }

    /// Format as `HH:MM:SS.mmm`; hours are not wrapped at 24
    pub fn format(&self) -> String {
        self.format_with_separator('.')
    }

    /// Format with a custom decimal separator (`,` for SRT)
    pub fn format_with_separator(&self, separator: char) -> String {
        let hours = self.0 / MS_PER_HOUR;
        let minutes = (self.0 % MS_PER_HOUR) / MS_PER_MINUTE;
        let seconds = (self.0 % MS_PER_MINUTE) / MS_PER_SECOND;
        let millis = self.0 % MS_PER_SECOND;

        format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, separator, millis)
    }

    /// Add a signed millisecond delta, clamping at zero
    pub fn shifted_by(&self, delta_ms: i64) -> Self {
        if delta_ms >= 0 {
            Timestamp(self.0.saturating_add(delta_ms.unsigned_abs()))
        } else {
            Timestamp(self.0.saturating_sub(delta_ms.unsigned_abs()))
        }
    }

    pub fn saturating_add(&self, other: Timestamp) -> Self {
        Timestamp(self.0.saturating_add(other.0))
    }

    /// Subtract, yielding `Timestamp::ZERO` instead of a negative value
    pub fn saturating_sub(&self, other: Timestamp) -> Self {
        Timestamp(self.0.saturating_sub(other.0))
    }

    /// Milliseconds from `earlier` to `self`, zero if `earlier` is later
    pub fn duration_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl FromStr for Timestamp {
    type Err = SubtitleError;

    fn from_str(s: &str) -> SubtitleResult<Self> {
        Self::parse(s)
    }
}
