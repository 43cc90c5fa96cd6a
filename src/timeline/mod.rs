/*!
 * Time-domain transforms for caption sequences.
 *
 * - `timestamp`: millisecond timestamps with text parsing and formatting
 * - `interval`: strictly ordered time ranges
 * - `cut_set`: sorted cut ranges and the cut-range file reader
 * - `compactor`: removal of cut ranges and re-timing of survivors
 * - `shift`: uniform signed time shift
 */

pub mod timestamp;
pub mod interval;
pub mod cut_set;
pub mod compactor;
pub mod shift;

// Re-export main types
pub use timestamp::Timestamp;
pub use interval::Interval;
pub use cut_set::CutSet;
pub use compactor::{TimelineCompactor, apply_cut_ranges};
pub use shift::{DegeneratePolicy, shift_captions, seconds_to_millis};
