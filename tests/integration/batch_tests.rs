/*!
 * Tests for directory batch conversion
 */

use std::fs;

use subcut::app_config::Config;
use subcut::app_controller::{BatchRequest, Controller};
use subcut::subtitle_processor::{CaptionSequence, SubtitleFormat};
use crate::common;

fn batch_request(dir: &std::path::Path, target: SubtitleFormat) -> BatchRequest {
    BatchRequest {
        input_dir: dir.to_path_buf(),
        target,
        shift_ms: 0,
        cuts_path: None,
        force_overwrite: false,
    }
}

#[tokio::test]
async fn test_runFolder_withMixedFormats_shouldConvertEachFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "one.srt").unwrap();
    common::create_test_file(dir, "two.vtt", common::SAMPLE_VTT).unwrap();
    common::create_test_file(dir, "three.txt", common::SAMPLE_TXT).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller.run_folder(batch_request(dir, SubtitleFormat::Srt)).await.unwrap();

    assert_eq!(summary.converted, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);

    for name in ["one.converted.srt", "two.converted.srt", "three.converted.srt"] {
        let output = dir.join(name);
        assert!(output.exists(), "missing {}", name);
        assert_eq!(CaptionSequence::read_from_file(&output).unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_runFolder_withExistingOutputs_shouldSkipThemAndIgnorePriorResults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "one.srt").unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    let first = controller.run_folder(batch_request(dir, SubtitleFormat::Vtt)).await.unwrap();
    assert_eq!(first.converted, 1);

    // one.converted.vtt is a prior output and must not be picked up as input
    let second = controller.run_folder(batch_request(dir, SubtitleFormat::Vtt)).await.unwrap();
    assert_eq!(second.converted, 0);
    assert_eq!(second.skipped, 1);

    let mut forced = batch_request(dir, SubtitleFormat::Vtt);
    forced.force_overwrite = true;
    let third = controller.run_folder(forced).await.unwrap();
    assert_eq!(third.converted, 1);
}

#[tokio::test]
async fn test_runFolder_withBrokenFile_shouldCountFailureAndContinue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "good.srt").unwrap();
    common::create_test_file(dir, "bad.vtt", "not a webvtt file\n").unwrap();

    let controller = Controller::with_config(Config {
        batch_concurrency: 1,
        ..Config::default()
    })
    .unwrap();
    let summary = controller.run_folder(batch_request(dir, SubtitleFormat::Txt)).await.unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);
    assert!(dir.join("good.converted.txt").exists());
    assert!(!dir.join("bad.converted.txt").exists());
}

#[tokio::test]
async fn test_runFolder_withCutsFileInDirectory_shouldNotConvertIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "movie.srt").unwrap();
    let cuts = common::create_test_cuts(dir, "cuts.txt").unwrap();

    let mut request = batch_request(dir, SubtitleFormat::Srt);
    request.cuts_path = Some(cuts);

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller.run_folder(request).await.unwrap();

    assert_eq!(summary.converted, 1);
    assert!(!dir.join("cuts.converted.srt").exists());

    let written = fs::read_to_string(dir.join("movie.converted.srt")).unwrap();
    assert!(written.contains("00:00:04,500 --> 00:00:07,500"));
}

#[tokio::test]
async fn test_runFolder_withMissingDirectory_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller
        .run_folder(batch_request(&temp_dir.path().join("absent"), SubtitleFormat::Srt))
        .await;
    assert!(result.is_err());
}
