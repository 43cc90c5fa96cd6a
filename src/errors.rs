/*!
 * Error types for the subcut application.
 *
 * The timeline core and the subtitle readers return `SubtitleError`; the
 * application layer wraps them in `anyhow::Error` with context,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::timeline::{Interval, Timestamp};

/// Errors raised by timestamp parsing, interval construction, cut handling,
/// format adaptation and subtitle parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// Timestamp text does not match `HH:MM:SS.mmm` / `HH:MM:SS,mmm`
    #[error("Malformed timestamp: '{0}'")]
    MalformedTimestamp(String),

    /// Interval whose end does not come strictly after its start
    #[error("Invalid interval: end {end} must be after start {start}")]
    InvalidInterval {
        /// Interval start
        start: Timestamp,
        /// Interval end
        end: Timestamp,
    },

    /// Merge inputs of different lengths
    #[error("Caption count mismatch: timing source has {timing} captions, text source has {text}")]
    CountMismatch {
        /// Captions in the timing source
        timing: usize,
        /// Captions in the text source
        text: usize,
    },

    /// Operation requires at least one caption
    #[error("No captions to convert")]
    EmptySequence,

    /// Cut-range line without a `-->` or `-` separator
    #[error("Unknown cut range format: '{0}'")]
    MalformedCutRange(String),

    /// Two cut intervals overlap while strict cut checking is enabled
    #[error("Overlapping cut ranges: {first} and {second}")]
    OverlappingCuts {
        /// Earlier interval
        first: Interval,
        /// Interval that overlaps it
        second: Interval,
    },

    /// A caption without timing where timing is required
    #[error("Caption {index} has no timing information")]
    MissingTiming {
        /// Zero-based position in the sequence
        index: usize,
    },

    /// Structural problem in an SRT or WebVTT document
    #[error("Parse error at line {line}: {message}")]
    ParseError {
        /// One-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },
}

/// Result alias used throughout the timeline core
pub type SubtitleResult<T> = std::result::Result<T, SubtitleError>;
