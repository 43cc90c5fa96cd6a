/*!
 * Uniform time shift.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::{Caption, CaptionSequence};

/// What to do with a caption that a negative shift collapses to zero length
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Remove the caption from the output
    #[default]
    Drop,
    /// Keep it as a zero-length caption
    Keep,
}

/// Convert fractional seconds to whole milliseconds, rounding to nearest
pub fn seconds_to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

/// Shift every timed caption by `delta_ms`, clamping each endpoint at zero
///
/// Untimed captions pass through unchanged. Captions whose end clamps down
/// onto their start are handled according to `policy`.
pub fn shift_captions(sequence: CaptionSequence, delta_ms: i64, policy: DegeneratePolicy) -> CaptionSequence {
    if delta_ms == 0 {
        return sequence;
    }

    let input_count = sequence.len();
    let captions: Vec<Caption> = sequence
        .captions
        .into_iter()
        .filter_map(|mut caption| {
            let Some(timing) = caption.timing.as_mut() else {
                return Some(caption);
            };

            timing.start = timing.start.shifted_by(delta_ms);
            timing.end = timing.end.shifted_by(delta_ms);

            if timing.is_degenerate() && policy == DegeneratePolicy::Drop {
                trace!("Dropping caption collapsed by shift: '{}'", caption.text);
                return None;
            }
            Some(caption)
        })
        .collect();

    debug!(
        "Shifted captions by {}ms: kept {} of {}",
        delta_ms,
        captions.len(),
        input_count
    );

    CaptionSequence::new(sequence.format, captions)
}
