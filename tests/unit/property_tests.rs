/*!
 * Property-based tests for the timeline transforms
 */

use proptest::prelude::*;
use subcut::subtitle_processor::{Caption, CaptionSequence, SubtitleFormat};
use subcut::timeline::{
    apply_cut_ranges, shift_captions, CutSet, DegeneratePolicy, Interval, Timestamp,
};

fn caption_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..600_000, 1u64..10_000).prop_map(|(start, len)| (start, start + len))
}

fn sequence_from(ranges: &[(u64, u64)]) -> CaptionSequence {
    let captions = ranges
        .iter()
        .enumerate()
        .map(|(idx, &(start, end))| Caption::from_millis(start, end, idx.to_string()))
        .collect();
    CaptionSequence::new(SubtitleFormat::Srt, captions)
}

fn cut_set_from(ranges: &[(u64, u64)]) -> CutSet {
    CutSet::from_intervals(
        ranges
            .iter()
            .map(|&(start, end)| Interval::new(Timestamp::from_millis(start), Timestamp::from_millis(end)).unwrap())
            .collect(),
    )
}

fn labels(sequence: &CaptionSequence) -> Vec<usize> {
    sequence.iter().map(|caption| caption.text.parse().unwrap()).collect()
}

proptest! {
    /// Survivors keep their relative order and stay non-empty
    #[test]
    fn compaction_preserves_order_and_positive_length(
        captions in prop::collection::vec(caption_strategy(), 0..40),
        cuts in prop::collection::vec(caption_strategy(), 0..8),
    ) {
        let result = apply_cut_ranges(sequence_from(&captions), &cut_set_from(&cuts));

        let kept = labels(&result);
        prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(result.len() <= captions.len());

        for caption in result.iter() {
            let timing = caption.timing.unwrap();
            prop_assert!(timing.end > timing.start);
        }
    }

    /// Compaction never moves a caption later or makes it longer
    #[test]
    fn compaction_never_extends_captions(
        captions in prop::collection::vec(caption_strategy(), 1..40),
        cuts in prop::collection::vec(caption_strategy(), 1..8),
    ) {
        let result = apply_cut_ranges(sequence_from(&captions), &cut_set_from(&cuts));

        for caption in result.iter() {
            let idx: usize = caption.text.parse().unwrap();
            let (start, end) = captions[idx];
            let timing = caption.timing.unwrap();
            prop_assert!(timing.start.as_millis() <= start);
            prop_assert!(timing.end.as_millis() <= end);
            prop_assert!(timing.duration_ms() <= end - start);
        }
    }

    /// An empty cut set leaves every caption untouched
    #[test]
    fn compaction_with_no_cuts_is_identity(captions in prop::collection::vec(caption_strategy(), 0..40)) {
        let sequence = sequence_from(&captions);
        prop_assert_eq!(apply_cut_ranges(sequence.clone(), &CutSet::empty()), sequence);
    }

    /// Captions entirely after a single cut move back by its full length
    #[test]
    fn compaction_shifts_later_captions_by_cut_length(
        (cut_start, cut_len) in (0u64..100_000, 1u64..50_000),
        gap in 0u64..10_000,
        len in 1u64..10_000,
    ) {
        let start = cut_start + cut_len + gap;
        let result = apply_cut_ranges(
            sequence_from(&[(start, start + len)]),
            &cut_set_from(&[(cut_start, cut_start + cut_len)]),
        );

        prop_assert_eq!(
            result.captions,
            vec![Caption::from_millis(start - cut_len, start - cut_len + len, "0")]
        );
    }

    /// A forward shift followed by the same backward shift restores the input
    #[test]
    fn shift_round_trip_without_clamping_is_identity(
        captions in prop::collection::vec(caption_strategy(), 0..40),
        delta in 1i64..1_000_000,
    ) {
        let sequence = sequence_from(&captions);
        let forward = shift_captions(sequence.clone(), delta, DegeneratePolicy::Drop);
        let back = shift_captions(forward, -delta, DegeneratePolicy::Drop);
        prop_assert_eq!(back, sequence);
    }

    /// Large negative shifts clamp at zero; kept captions never invert
    #[test]
    fn shift_clamps_at_zero(
        captions in prop::collection::vec(caption_strategy(), 0..40),
        delta in -1_000_000i64..0,
    ) {
        let result = shift_captions(sequence_from(&captions), delta, DegeneratePolicy::Keep);
        prop_assert_eq!(result.len(), captions.len());

        for (caption, &(start, end)) in result.iter().zip(&captions) {
            let timing = caption.timing.unwrap();
            prop_assert_eq!(timing.start.as_millis(), start.saturating_sub(delta.unsigned_abs()));
            prop_assert_eq!(timing.end.as_millis(), end.saturating_sub(delta.unsigned_abs()));
            prop_assert!(timing.end >= timing.start);
        }
    }

    /// Removed time before a point never decreases as the point moves later
    #[test]
    fn cut_duration_before_is_monotonic(
        cuts in prop::collection::vec(caption_strategy(), 0..12),
        a in 0u64..700_000,
        b in 0u64..700_000,
    ) {
        let cut_set = cut_set_from(&cuts);
        let (t1, t2) = (Timestamp::from_millis(a.min(b)), Timestamp::from_millis(a.max(b)));

        let before_t1 = cut_set.total_cut_duration_before(t1);
        let before_t2 = cut_set.total_cut_duration_before(t2);
        prop_assert!(before_t1 <= before_t2);
        prop_assert!(before_t2 <= cut_set.total_duration_ms());
    }

    /// Formatting then parsing a timestamp gives the same value
    #[test]
    fn timestamp_format_parse_round_trip(ms in 0u64..400_000_000) {
        let ts = Timestamp::from_millis(ms);
        prop_assert_eq!(Timestamp::parse(&ts.format()).unwrap(), ts);
        prop_assert_eq!(Timestamp::parse(&ts.format_with_separator(',')).unwrap(), ts);
    }
}
