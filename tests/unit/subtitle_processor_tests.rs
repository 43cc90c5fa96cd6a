/*!
 * Tests for subtitle parsing, detection and rendering
 */

use std::path::Path;

use subcut::errors::SubtitleError;
use subcut::subtitle_processor::{Caption, CaptionSequence, SubtitleFormat};
use crate::common::{SAMPLE_SRT, SAMPLE_TXT, SAMPLE_VTT};

#[test]
fn test_parseSrt_withSample_shouldReadAllEntries() {
    let seq = CaptionSequence::parse(SAMPLE_SRT, SubtitleFormat::Srt).unwrap();

    assert_eq!(seq.len(), 3);
    assert_eq!(seq.captions[0], Caption::from_millis(1_000, 4_000, "This is a test subtitle."));
    assert_eq!(seq.captions[2], Caption::from_millis(10_000, 14_000, "For testing purposes."));
}

#[test]
fn test_parseSrt_withMissingTimingLine_shouldReportLine() {
    let content = "1\nnot a timing line\nText\n";
    let result = CaptionSequence::parse_srt_string(content);
    assert!(matches!(result, Err(SubtitleError::ParseError { line: 2, .. })));
}

#[test]
fn test_parseSrt_withBadTimestamp_shouldReportLine() {
    let content = "1\n00:00:01,000 --> 00:00:0x,000\nText\n";
    let result = CaptionSequence::parse_srt_string(content);
    assert!(matches!(result, Err(SubtitleError::ParseError { line: 2, .. })));
}

#[test]
fn test_parseSrt_withInvertedTiming_shouldSkipEntry() {
    let content = "1\n00:00:05,000 --> 00:00:04,000\nBackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nFine\n";
    let captions = CaptionSequence::parse_srt_string(content).unwrap();
    assert_eq!(captions, vec![Caption::from_millis(6_000, 7_000, "Fine")]);
}

#[test]
fn test_parseVtt_withSample_shouldMatchSrtSample() {
    let vtt = CaptionSequence::parse(SAMPLE_VTT, SubtitleFormat::Vtt).unwrap();
    let srt = CaptionSequence::parse(SAMPLE_SRT, SubtitleFormat::Srt).unwrap();
    assert_eq!(vtt.captions, srt.captions);
}

#[test]
fn test_parseVtt_withIdentifiersNotesAndSettings_shouldKeepOnlyCues() {
    let content = "WEBVTT - title\nKind: captions\n\nNOTE a comment\nspanning lines\n\nintro\n00:01.000 --> 00:02.500 align:start\nHello\nthere\n\n00:00:03.000 --> 00:00:04.000\nBye\n";
    let captions = CaptionSequence::parse_vtt_string(content).unwrap();

    assert_eq!(
        captions,
        vec![Caption::from_millis(1_000, 2_500, "Hello\nthere"), Caption::from_millis(3_000, 4_000, "Bye")]
    );
}

#[test]
fn test_parseVtt_withoutHeader_shouldFail() {
    let result = CaptionSequence::parse_vtt_string("00:00:01.000 --> 00:00:02.000\nHi\n");
    assert!(matches!(result, Err(SubtitleError::ParseError { line: 1, .. })));
}

#[test]
fn test_parseVtt_withCueDirectlyAfterHeader_shouldReportLine() {
    let content = "WEBVTT\n00:00:01.000 --> 00:00:02.000\nFirst\n\n00:00:03.000 --> 00:00:04.000\nSecond\n";
    let result = CaptionSequence::parse_vtt_string(content);
    assert!(matches!(result, Err(SubtitleError::ParseError { line: 2, .. })));
}

#[test]
fn test_parseVtt_withHeaderMetadataOnly_shouldKeepAllCues() {
    let content = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:01.000 --> 00:00:02.000\nFirst\n";
    let captions = CaptionSequence::parse_vtt_string(content).unwrap();
    assert_eq!(captions, vec![Caption::from_millis(1_000, 2_000, "First")]);
}

#[test]
fn test_parseTxt_withBlankLines_shouldSkipThem() {
    let captions = CaptionSequence::parse_txt_string("one\n\n  two  \n\n");
    assert_eq!(captions, vec![Caption::untimed("one"), Caption::untimed("two")]);
}

#[test]
fn test_renderSrt_shouldRenumberFromOne() {
    let seq = CaptionSequence::new(
        SubtitleFormat::Srt,
        vec![Caption::from_millis(0, 500, "a"), Caption::from_millis(61_000, 3_723_004, "b")],
    );
    assert_eq!(
        seq.render_srt().unwrap(),
        "1\n00:00:00,000 --> 00:00:00,500\na\n\n2\n00:01:01,000 --> 01:02:03,004\nb\n\n"
    );
}

#[test]
fn test_renderVtt_withUntimedCaption_shouldFail() {
    let seq = CaptionSequence::new(SubtitleFormat::Vtt, vec![Caption::untimed("x")]);
    assert_eq!(seq.render_vtt(), Err(SubtitleError::MissingTiming { index: 0 }));
}

#[test]
fn test_sniff_withVariousFirstLines_shouldPickFormat() {
    assert_eq!(SubtitleFormat::sniff(SAMPLE_SRT).unwrap(), SubtitleFormat::Srt);
    assert_eq!(SubtitleFormat::sniff(SAMPLE_VTT).unwrap(), SubtitleFormat::Vtt);
    assert_eq!(SubtitleFormat::sniff(SAMPLE_TXT).unwrap(), SubtitleFormat::Txt);
    assert_eq!(SubtitleFormat::sniff(""), Err(SubtitleError::EmptySequence));
}

#[test]
fn test_detect_withKnownExtension_shouldIgnoreContent() {
    let format = SubtitleFormat::detect(Path::new("movie.VTT"), SAMPLE_SRT).unwrap();
    assert_eq!(format, SubtitleFormat::Vtt);

    let sniffed = SubtitleFormat::detect(Path::new("movie.sub"), SAMPLE_SRT).unwrap();
    assert_eq!(sniffed, SubtitleFormat::Srt);
}

#[test]
fn test_fromStr_withValidAndInvalidNames_shouldParse() {
    assert_eq!("srt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
    assert_eq!(".vtt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Vtt);
    assert!("ass".parse::<SubtitleFormat>().is_err());
    assert!(SubtitleFormat::Srt.is_timed());
    assert!(!SubtitleFormat::Txt.is_timed());
}
