// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subcut::app_config::{self, Config};
use subcut::app_controller::{BatchRequest, ConversionRequest, Controller};
use subcut::subtitle_processor::SubtitleFormat;
use subcut::timeline::seconds_to_millis;

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSubtitleFormat {
    Srt,
    Vtt,
    Txt,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
            CliSubtitleFormat::Vtt => SubtitleFormat::Vtt,
            CliSubtitleFormat::Txt => SubtitleFormat::Txt,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a single subtitle file
    Convert(ConvertArgs),

    /// Convert every subtitle file in a directory
    Batch(BatchArgs),

    /// Generate shell completions for subcut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by the conversion commands
#[derive(Args, Debug)]
struct CommonArgs {
    /// Target format
    #[arg(short = 't', long = "to", value_enum)]
    to: CliSubtitleFormat,

    /// Time shift in seconds, may be negative
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    shift: f64,

    /// File with cut ranges, one "start --> end" or "start-end" per line
    #[arg(long, value_name = "CUTS_FILE")]
    cuts: Option<PathBuf>,

    /// Reject cut ranges that overlap each other
    #[arg(long)]
    strict_cuts: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "subcut.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input subtitle file
    #[arg(short, long, value_name = "INPUT")]
    input: PathBuf,

    /// Output subtitle file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Take timing from this file and text from the input, paired by position
    #[arg(long, value_name = "TIMING_FILE")]
    timing_from: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory to search for .srt, .vtt and .txt files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

/// subcut - subtitle converter with cut-range timeline compaction
///
/// Converts subtitles between SRT, WebVTT and plain text, optionally shifting
/// them and removing cut ranges from the timeline.
#[derive(Parser, Debug)]
#[command(name = "subcut")]
#[command(version)]
#[command(about = "Subtitle converter with time shift and cut-range removal")]
#[command(long_about = "subcut converts subtitles between SRT, WebVTT and plain text.

EXAMPLES:
    subcut convert -i movie.srt -o movie.vtt -t vtt            # SRT to WebVTT
    subcut convert -i movie.vtt -o movie.srt -t srt --shift -2.5
    subcut convert -i movie.srt -o cut.srt -t srt --cuts cuts.txt
    subcut convert -i script.txt -o script.srt -t srt          # 3s per line
    subcut convert -i text.txt --timing-from movie.srt -o out.srt -t srt
    subcut batch ./subs -t vtt                                 # Whole directory
    subcut completions bash > subcut.bash

CUT FILES:
    One range per line, either '00:01:00.000 --> 00:01:30.000' or
    '00:01:00,000-00:01:30,000'. Captions inside a range are dropped,
    captions crossing one are clipped, and later captions move back.

CONFIGURATION:
    Settings are read from subcut.json by default (see -c/--config). If the file
    does not exist, default settings are used.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
// Filtering follows log::max_level so the level can change after init
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger);
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌"),
            Level::Warn => ("1;33", "⚠️"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍"),
            Level::Trace => ("1;35", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subcut", &mut std::io::stdout());
            Ok(())
        }
        Commands::Convert(args) => run_convert(args),
        Commands::Batch(args) => run_batch(args).await,
    }
}

/// Load the config, apply CLI overrides and set the log level
fn build_controller(common: &CommonArgs) -> Result<Controller> {
    if let Some(level) = common.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::from_file_or_default(&common.config_path)?;

    if let Some(level) = common.log_level {
        config.log_level = level.into();
    }
    if common.strict_cuts {
        config.strict_cuts = true;
    }

    log::set_max_level(config.log_level.to_level_filter());

    Controller::with_config(config)
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let controller = build_controller(&args.common)?;

    if !args.input.is_file() {
        return Err(anyhow!("Input file does not exist: {:?}", args.input));
    }

    let request = ConversionRequest {
        input: args.input,
        output: args.output,
        target: args.common.to.into(),
        shift_ms: seconds_to_millis(args.common.shift),
        cuts_path: args.common.cuts,
        timing_from: args.timing_from,
        force_overwrite: args.common.force_overwrite,
    };

    let report = controller.convert_file(&request)?;
    info!(
        "Converted {} to {}: {} of {} captions kept",
        report.source_format, report.target_format, report.output_count, report.input_count
    );

    Ok(())
}

async fn run_batch(args: BatchArgs) -> Result<()> {
    let controller = build_controller(&args.common)?;

    let request = BatchRequest {
        input_dir: args.input_dir,
        target: args.common.to.into(),
        shift_ms: seconds_to_millis(args.common.shift),
        cuts_path: args.common.cuts,
        force_overwrite: args.common.force_overwrite,
    };

    let summary = controller.run_folder(request).await?;
    if summary.failed > 0 {
        return Err(anyhow!("{} file(s) failed to convert", summary.failed));
    }

    Ok(())
}
