/*!
 * Timeline compaction.
 *
 * Removes every cut range from the global timeline and splices the rest
 * together. Each caption is examined against the cut set on its own:
 *
 * 1. A caption fully inside a cut is dropped.
 * 2. A cut starting inside the caption clips its tail to the cut start.
 * 3. Otherwise a cut ending inside the caption clips its head to the cut end.
 * 4. A caption clipped to zero length is dropped.
 * 5. Survivors move back by the total cut duration lying before their start,
 *    saturating at zero; a caption left with zero length is dropped.
 *
 * Shared endpoints never count as overlap, so a caption touching a cut is
 * only moved, not clipped. Output order is input order.
 */

use log::{debug, trace};

use crate::subtitle_processor::{Caption, CaptionSequence, CaptionTiming};
use super::{CutSet, Timestamp};

/// Applies a cut set to caption sequences
#[derive(Debug, Clone, Copy)]
pub struct TimelineCompactor<'a> {
    cuts: &'a CutSet,
}

impl<'a> TimelineCompactor<'a> {
    pub fn new(cuts: &'a CutSet) -> Self {
        TimelineCompactor { cuts }
    }

    /// Compact a whole sequence, dropping captions that do not survive
    ///
    /// Untimed captions pass through unchanged.
    pub fn compact(&self, sequence: CaptionSequence) -> CaptionSequence {
        if self.cuts.is_empty() {
            return sequence;
        }

        let input_count = sequence.len();
        let captions: Vec<Caption> = sequence
            .captions
            .into_iter()
            .filter_map(|caption| self.compact_caption(caption))
            .collect();

        debug!(
            "Applied {} cut range(s): kept {} of {} caption(s)",
            self.cuts.len(),
            captions.len(),
            input_count
        );

        CaptionSequence::new(sequence.format, captions)
    }

    /// Compact one caption, `None` when it is removed
    pub fn compact_caption(&self, caption: Caption) -> Option<Caption> {
        let Some(timing) = caption.timing else {
            return Some(caption);
        };

        match self.compact_timing(timing) {
            Some(compacted) => Some(Caption { timing: Some(compacted), ..caption }),
            None => {
                trace!("Dropping caption {} --> {}: '{}'", timing.start, timing.end, caption.text);
                None
            }
        }
    }

    /// Clip and re-time a single display interval
    pub fn compact_timing(&self, timing: CaptionTiming) -> Option<CaptionTiming> {
        let (mut t0, mut t1) = (timing.start, timing.end);

        for cut in self.cuts {
            let (cs, ce) = (cut.start(), cut.end());

            if cs <= t0 && t1 <= ce {
                return None;
            } else if t0 < cs && cs < t1 {
                t1 = cs;
            } else if t0 < ce && ce < t1 {
                t0 = ce;
            } else {
                continue;
            }

            if t1 <= t0 {
                return None;
            }
        }

        let shift = Timestamp::from_millis(self.cuts.total_cut_duration_before(t0));
        let compacted = CaptionTiming::new(t0.saturating_sub(shift), t1.saturating_sub(shift));

        // Additive overlapping cuts can push both ends onto zero
        if compacted.is_degenerate() {
            return None;
        }
        Some(compacted)
    }
}

/// Convenience wrapper around `TimelineCompactor::compact`
pub fn apply_cut_ranges(sequence: CaptionSequence, cuts: &CutSet) -> CaptionSequence {
    TimelineCompactor::new(cuts).compact(sequence)
}
