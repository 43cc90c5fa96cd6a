/*!
 * Conversion of caption sequences between subtitle formats.
 *
 * - Timed to timed keeps every `(start, end, text)` triple; only the
 *   rendering of the timestamps differs.
 * - Timed to text keeps the text and discards timing.
 * - Text to timed synthesizes back-to-back captions of a fixed duration
 *   starting at zero. This is a placeholder layout, not speech alignment.
 * - `merge` pairs the timing of one sequence with the text of another.
 */

use log::debug;

use crate::errors::{SubtitleError, SubtitleResult};
use crate::subtitle_processor::{Caption, CaptionSequence, CaptionTiming, SubtitleFormat};
use crate::timeline::Timestamp;

/// Default duration of a synthesized caption
pub const DEFAULT_CAPTION_DURATION_MS: u64 = 3_000;

/// Converts caption sequences into a target format
#[derive(Debug, Clone)]
pub struct FormatAdapter {
    caption_duration_ms: u64,
}

impl Default for FormatAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_DURATION_MS)
    }
}

impl FormatAdapter {
    /// Create an adapter synthesizing captions of `caption_duration_ms`
    pub fn new(caption_duration_ms: u64) -> Self {
        FormatAdapter { caption_duration_ms }
    }

    pub fn caption_duration_ms(&self) -> u64 {
        self.caption_duration_ms
    }

    /// Convert `sequence` to `target`
    pub fn convert(&self, sequence: CaptionSequence, target: SubtitleFormat) -> SubtitleResult<CaptionSequence> {
        debug!("Converting {} caption(s) from {} to {}", sequence.len(), sequence.format, target);

        if !target.is_timed() {
            return Ok(Self::strip_timing(sequence));
        }

        if sequence.format.is_timed() {
            // All timing must already be present
            sequence.timings()?;
            Ok(CaptionSequence::new(target, sequence.captions))
        } else {
            let mut timed = self.synthesize_timing(sequence)?;
            timed.format = target;
            Ok(timed)
        }
    }

    /// Give each caption a fixed-duration slot, back to back from zero
    ///
    /// Any existing timing is replaced. The result keeps the input format.
    pub fn synthesize_timing(&self, sequence: CaptionSequence) -> SubtitleResult<CaptionSequence> {
        if sequence.is_empty() {
            return Err(SubtitleError::EmptySequence);
        }

        let step = Timestamp::from_millis(self.caption_duration_ms);
        let mut start = Timestamp::ZERO;
        let captions = sequence
            .captions
            .into_iter()
            .map(|caption| {
                let end = start.saturating_add(step);
                let timed = Caption::new(CaptionTiming::new(start, end), caption.text);
                start = end;
                timed
            })
            .collect();

        Ok(CaptionSequence::new(sequence.format, captions))
    }

    /// Drop all timing and relabel the sequence as plain text
    ///
    /// Multi-line captions are joined with single spaces so that each caption
    /// stays on exactly one line of the text output.
    pub fn strip_timing(sequence: CaptionSequence) -> CaptionSequence {
        let captions = sequence
            .captions
            .into_iter()
            .map(|caption| Caption::untimed(single_line(&caption.text)))
            .collect();
        CaptionSequence::new(SubtitleFormat::Txt, captions)
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Zip timing from `timing_source` with text from `text_source`, by position
///
/// The result is in the timing source's format.
pub fn merge(timing_source: &CaptionSequence, text_source: CaptionSequence) -> SubtitleResult<CaptionSequence> {
    if timing_source.len() != text_source.len() {
        return Err(SubtitleError::CountMismatch {
            timing: timing_source.len(),
            text: text_source.len(),
        });
    }

    let captions = timing_source
        .timings()?
        .into_iter()
        .zip(text_source.captions)
        .map(|(timing, caption)| Caption::new(timing, caption.text))
        .collect();

    debug!("Merged {} caption(s)", timing_source.len());
    Ok(CaptionSequence::new(timing_source.format, captions))
}
