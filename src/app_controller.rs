use anyhow::{Result, Context, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{SubtitleError, SubtitleResult};
use crate::file_utils::FileManager;
use crate::format_adapter::{self, FormatAdapter};
use crate::subtitle_processor::{CaptionSequence, SubtitleFormat};
use crate::timeline::{CutSet, TimelineCompactor, shift_captions};

// @module: Application controller for subtitle conversion

/// A single-file conversion job
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Subtitle file to convert (the text source in merge mode)
    pub input: PathBuf,
    /// Destination file
    pub output: PathBuf,
    /// Output format
    pub target: SubtitleFormat,
    /// Signed shift applied before cutting, in milliseconds
    pub shift_ms: i64,
    /// Optional cut-range file
    pub cuts_path: Option<PathBuf>,
    /// Optional file whose timing replaces the input's
    pub timing_from: Option<PathBuf>,
    /// Replace an existing output file
    pub force_overwrite: bool,
}

impl ConversionRequest {
    /// Plain format conversion without shift, cuts or merge
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(input: P1, output: P2, target: SubtitleFormat) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            target,
            shift_ms: 0,
            cuts_path: None,
            timing_from: None,
            force_overwrite: false,
        }
    }
}

/// Outcome of a single conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source_format: SubtitleFormat,
    pub target_format: SubtitleFormat,
    pub input_count: usize,
    pub output_count: usize,
}

/// A folder conversion job
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Directory searched recursively for subtitle files
    pub input_dir: PathBuf,
    /// Output format
    pub target: SubtitleFormat,
    /// Signed shift applied before cutting, in milliseconds
    pub shift_ms: i64,
    /// Optional cut-range file applied to every input
    pub cuts_path: Option<PathBuf>,
    /// Replace existing output files
    pub force_overwrite: bool,
}

/// Counts from a folder conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle conversion
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn adapter(&self) -> FormatAdapter {
        FormatAdapter::new(self.config.default_caption_duration_ms)
    }

    /// Read and normalize a cut-range file
    pub fn load_cut_set<P: AsRef<Path>>(&self, path: P) -> Result<CutSet> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let cuts = CutSet::parse_cut_ranges(&content)
            .with_context(|| format!("Invalid cut range file: {}", path.display()))?;

        if self.config.strict_cuts {
            cuts.ensure_disjoint()
                .with_context(|| format!("Invalid cut range file: {}", path.display()))?;
        }

        debug!(
            "Loaded {} cut range(s) removing {} in total",
            cuts.len(),
            Self::format_duration(Duration::from_millis(cuts.total_duration_ms()))
        );
        Ok(cuts)
    }

    /// Apply the optional shift, then the optional cuts
    pub fn transform(&self, sequence: CaptionSequence, shift_ms: i64, cuts: Option<&CutSet>) -> CaptionSequence {
        let shifted = shift_captions(sequence, shift_ms, self.config.degenerate_shift_policy);
        match cuts {
            Some(cuts) => TimelineCompactor::new(cuts).compact(shifted),
            None => shifted,
        }
    }

    /// Transform a sequence and adapt it to `target`
    pub fn convert_sequence(
        &self,
        sequence: CaptionSequence,
        target: SubtitleFormat,
        shift_ms: i64,
        cuts: Option<&CutSet>,
    ) -> SubtitleResult<CaptionSequence> {
        if sequence.is_empty() {
            return Err(SubtitleError::EmptySequence);
        }

        let transformed = self.transform(sequence, shift_ms, cuts);
        if transformed.is_empty() {
            warn!("Every caption was removed by the shift or cut ranges");
            return Ok(CaptionSequence::new(target, Vec::new()));
        }

        self.adapter().convert(transformed, target)
    }

    /// Convert one file as described by `request`
    pub fn convert_file(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        if request.output.exists() && !request.force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                request.output
            ));
        }

        let cuts = request
            .cuts_path
            .as_deref()
            .map(|path| self.load_cut_set(path))
            .transpose()?;

        self.convert_paths(
            &request.input,
            &request.output,
            request.target,
            request.shift_ms,
            request.timing_from.as_deref(),
            cuts.as_ref(),
        )
    }

    fn convert_paths(
        &self,
        input: &Path,
        output: &Path,
        target: SubtitleFormat,
        shift_ms: i64,
        timing_from: Option<&Path>,
        cuts: Option<&CutSet>,
    ) -> Result<ConversionReport> {
        let sequence = Self::load_input(input, timing_from)?;
        let source_format = sequence.format;
        let input_count = sequence.len();
        info!("Detected source format: {} ({} captions)", source_format, input_count);

        let converted = self
            .convert_sequence(sequence, target, shift_ms, cuts)
            .with_context(|| format!("Failed to convert {:?}", input))?;

        converted.write_to_file(output)?;

        let report = ConversionReport {
            source_format,
            target_format: target,
            input_count,
            output_count: converted.len(),
        };
        info!(
            "Saved {:?} as {} ({} of {} captions)",
            output,
            target.extension().to_uppercase(),
            report.output_count,
            report.input_count
        );

        Ok(report)
    }

    /// Read the input, merging in external timing when requested
    fn load_input(input: &Path, timing_from: Option<&Path>) -> Result<CaptionSequence> {
        let text_source = CaptionSequence::read_from_file(input)?;
        if text_source.is_empty() {
            return Err(SubtitleError::EmptySequence)
                .with_context(|| format!("No captions found in {:?}", input));
        }

        let Some(timing_path) = timing_from else {
            return Ok(text_source);
        };

        let timing_source = CaptionSequence::read_from_file(timing_path)?;
        let merged = format_adapter::merge(&timing_source, text_source)
            .with_context(|| format!("Failed to merge timing from {:?} with text from {:?}", timing_path, input))?;
        info!("Merged timing from {:?}", timing_path);
        Ok(merged)
    }

    /// Convert every subtitle file below a directory
    ///
    /// Files are converted in parallel, each on its own blocking task. Outputs
    /// land next to their inputs as `<stem>.<suffix>.<ext>`.
    pub async fn run_folder(&self, request: BatchRequest) -> Result<BatchSummary> {
        // Start timing the process
        let start_time = Instant::now();

        if !FileManager::dir_exists(&request.input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", request.input_dir));
        }

        let cuts = request
            .cuts_path
            .as_deref()
            .map(|path| self.load_cut_set(path))
            .transpose()?
            .map(Arc::new);

        let mut files = FileManager::find_subtitle_files(&request.input_dir, &self.config.output_suffix)?;
        if let Some(cuts_path) = &request.cuts_path {
            files.retain(|file| !is_same_file(file, cuts_path));
        }

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", request.input_dir));
        }

        let progress = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress.set_message("Converting files");

        let mut summary = BatchSummary::default();
        let mut jobs = Vec::with_capacity(files.len());

        for input in files {
            let output_dir = input.parent().unwrap_or(request.input_dir.as_path()).to_path_buf();
            let output = FileManager::generate_output_path(
                &input,
                &output_dir,
                &self.config.output_suffix,
                request.target.extension(),
            );

            if output.exists() && !request.force_overwrite {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", input);
                summary.skipped += 1;
                progress.inc(1);
                continue;
            }

            jobs.push((input, output));
        }

        let results = stream::iter(jobs)
            .map(|(input, output)| {
                let controller = self.clone();
                let cuts = cuts.clone();
                let progress = progress.clone();
                let target = request.target;
                let shift_ms = request.shift_ms;

                async move {
                    let task_input = input.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        controller.convert_paths(&task_input, &output, target, shift_ms, None, cuts.as_deref())
                    })
                    .await
                    .map_err(|e| anyhow!("Conversion task failed: {}", e))
                    .and_then(|result| result);

                    progress.inc(1);
                    (input, result)
                }
            })
            .buffer_unordered(self.config.batch_concurrency)
            .collect::<Vec<_>>()
            .await;

        for (input, result) in results {
            match result {
                Ok(_) => summary.converted += 1,
                Err(e) => {
                    error!("Error converting {:?}: {:#}", input, e);
                    summary.failed += 1;
                }
            }
        }

        progress.finish_with_message("Done");
        info!(
            "Converted {} file(s), skipped {}, failed {} in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Format a duration as `XmYs` or `Y.Zs`
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m{}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
