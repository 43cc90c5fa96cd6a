use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Result, Context, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{SubtitleError, SubtitleResult};
use crate::file_utils::FileManager;
use crate::timeline::Timestamp;

// @module: Caption model plus SRT, WebVTT and plain-text reading and writing

// @const: Cue timing line, shared by SRT and WebVTT ("start --> end [settings]")
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+?)\s*-->\s*(\S+)(?:\s+.*)?$").unwrap()
});

// @const: WebVTT short timestamp without hours (MM:SS.mmm)
static VTT_SHORT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}\.\d{3}$").unwrap()
});

const VTT_HEADER: &str = "WEBVTT";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Subtitle file representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    // @format: SubRip
    Srt,
    // @format: WebVTT
    Vtt,
    // @format: Plain text transcript, one caption per line
    Txt,
}

impl SubtitleFormat {
    /// All supported formats
    pub const ALL: [SubtitleFormat; 3] = [Self::Srt, Self::Vtt, Self::Txt];

    // @returns: File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Txt => "txt",
        }
    }

    // @returns: Whether captions in this format carry start/end times
    pub fn is_timed(&self) -> bool {
        !matches!(self, Self::Txt)
    }

    /// Look up a format by file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Guess the format from the first line of a document
    ///
    /// A purely numeric first line means SRT, a `WEBVTT` marker means WebVTT,
    /// anything else is treated as plain text.
    pub fn sniff(content: &str) -> SubtitleResult<Self> {
        let first_line = content
            .trim_start_matches(BYTE_ORDER_MARK)
            .lines()
            .next()
            .ok_or(SubtitleError::EmptySequence)?;

        let trimmed = first_line.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self::Srt)
        } else if first_line.starts_with(VTT_HEADER) {
            Ok(Self::Vtt)
        } else {
            Ok(Self::Txt)
        }
    }

    /// Detect the format of a file: extension first, then content sniffing
    pub fn detect(path: &Path, content: &str) -> SubtitleResult<Self> {
        if let Some(format) = path
            .extension()
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
        {
            return Ok(format);
        }

        let format = Self::sniff(content)?;
        debug!("Sniffed format {} for {:?}", format, path);
        Ok(format)
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| anyhow!("Invalid subtitle format: {}", s))
    }
}

/// Display interval of a caption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionTiming {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl CaptionTiming {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        CaptionTiming { start, end }
    }

    pub fn from_millis(start_ms: u64, end_ms: u64) -> Self {
        Self::new(Timestamp::from_millis(start_ms), Timestamp::from_millis(end_ms))
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.duration_since(self.start)
    }

    /// True for zero-length and inverted timings
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }
}

/// Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    // @field: Display interval, absent for plain-text input
    pub timing: Option<CaptionTiming>,

    // @field: Caption text, may span several lines
    pub text: String,
}

impl Caption {
    /// Creates a timed caption
    pub fn new(timing: CaptionTiming, text: impl Into<String>) -> Self {
        Caption {
            timing: Some(timing),
            text: text.into(),
        }
    }

    /// Creates a caption from millisecond bounds - used by tests and benches
    pub fn from_millis(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self::new(CaptionTiming::from_millis(start_ms, end_ms), text)
    }

    /// Creates a caption without timing
    pub fn untimed(text: impl Into<String>) -> Self {
        Caption {
            timing: None,
            text: text.into(),
        }
    }

    pub fn is_timed(&self) -> bool {
        self.timing.is_some()
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.timing.map(|timing| timing.start)
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.timing.map(|timing| timing.end)
    }
}

/// Ordered captions plus the format they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionSequence {
    /// Format of the captions
    pub format: SubtitleFormat,

    /// Captions in display order
    pub captions: Vec<Caption>,
}

impl CaptionSequence {
    /// Create a sequence
    pub fn new(format: SubtitleFormat, captions: Vec<Caption>) -> Self {
        CaptionSequence { format, captions }
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Caption> {
        self.captions.iter()
    }

    /// Timing of every caption, failing on the first untimed one
    pub fn timings(&self) -> SubtitleResult<Vec<CaptionTiming>> {
        self.captions
            .iter()
            .enumerate()
            .map(|(index, caption)| caption.timing.ok_or(SubtitleError::MissingTiming { index }))
            .collect()
    }

    /// Read and parse a subtitle file, detecting its format
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let format = SubtitleFormat::detect(path, &content)
            .with_context(|| format!("Failed to detect subtitle format: {}", path.display()))?;

        Self::parse(&content, format)
            .with_context(|| format!("Failed to parse {} file: {}", format, path.display()))
    }

    /// Render and write this sequence to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render()
            .with_context(|| format!("Failed to render {} output", self.format))?;
        FileManager::write_to_file(path, &rendered)
    }

    /// Parse a document in the given format
    pub fn parse(content: &str, format: SubtitleFormat) -> SubtitleResult<Self> {
        let content = content.trim_start_matches(BYTE_ORDER_MARK);
        let captions = match format {
            SubtitleFormat::Srt => Self::parse_srt_string(content)?,
            SubtitleFormat::Vtt => Self::parse_vtt_string(content)?,
            SubtitleFormat::Txt => Self::parse_txt_string(content),
        };

        debug!("Parsed {} caption(s) from {} content", captions.len(), format);
        Ok(Self::new(format, captions))
    }

    /// Parse SRT format string into captions
    pub fn parse_srt_string(content: &str) -> SubtitleResult<Vec<Caption>> {
        let mut captions = Vec::new();

        // State for the block being read
        let mut seq_num: Option<usize> = None;
        let mut timing: Option<CaptionTiming> = None;
        let mut text_lines: Vec<&str> = Vec::new();
        let mut block_line = 0;

        for (idx, line) in content.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let Some(found) = timing.take() {
                    push_caption(&mut captions, found, &text_lines, block_line);
                } else if seq_num.is_some() {
                    return Err(SubtitleError::ParseError {
                        line: line_num,
                        message: "expected timing line after subtitle index".to_string(),
                    });
                }
                seq_num = None;
                text_lines.clear();
                continue;
            }

            if timing.is_some() {
                text_lines.push(line.trim_end());
                continue;
            }

            if let Some(found) = parse_timing_line(line, line_num, Timestamp::parse)? {
                timing = Some(found);
                block_line = line_num;
                continue;
            }

            if seq_num.is_none() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    seq_num = Some(num);
                    continue;
                }
            }

            return Err(SubtitleError::ParseError {
                line: line_num,
                message: format!("expected subtitle index or timing line, found '{}'", trimmed),
            });
        }

        if let Some(found) = timing {
            push_caption(&mut captions, found, &text_lines, block_line);
        }

        Ok(captions)
    }

    /// Parse WebVTT format string into captions
    ///
    /// Header, NOTE, STYLE and REGION blocks are skipped; cue identifiers and
    /// cue settings are dropped.
    pub fn parse_vtt_string(content: &str) -> SubtitleResult<Vec<Caption>> {
        let mut lines = content.lines().enumerate().peekable();

        match lines.peek() {
            Some((_, first)) if first.starts_with(VTT_HEADER) => {}
            _ => {
                return Err(SubtitleError::ParseError {
                    line: 1,
                    message: format!("missing {} header", VTT_HEADER),
                });
            }
        }

        // Group the remaining lines into blank-separated blocks
        let mut blocks: Vec<Vec<(usize, &str)>> = Vec::new();
        let mut current: Vec<(usize, &str)> = Vec::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push((idx + 1, line));
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        // The first block is the header and its metadata; a cue there means
        // the blank line after the header is missing
        if let Some((line_num, _)) = blocks
            .first()
            .and_then(|header| header.iter().find(|(_, line)| line.contains("-->")))
        {
            return Err(SubtitleError::ParseError {
                line: *line_num,
                message: format!("expected blank line between {} header and first cue", VTT_HEADER),
            });
        }

        let mut captions = Vec::new();
        for block in blocks.into_iter().skip(1) {
            let (first_num, first_line) = block[0];
            if ["NOTE", "STYLE", "REGION"].iter().any(|kw| first_line.starts_with(kw)) {
                continue;
            }

            let timing_pos = if first_line.contains("-->") { 0 } else { 1 };
            let (line_num, timing_line) = block.get(timing_pos).copied().ok_or_else(|| {
                SubtitleError::ParseError {
                    line: first_num,
                    message: "cue identifier without timing line".to_string(),
                }
            })?;

            let timing = parse_timing_line(timing_line, line_num, parse_vtt_timestamp)?
                .ok_or_else(|| SubtitleError::ParseError {
                    line: line_num,
                    message: format!("expected cue timing line, found '{}'", timing_line.trim()),
                })?;

            let text_lines: Vec<&str> = block[timing_pos + 1..]
                .iter()
                .map(|(_, line)| line.trim_end())
                .collect();
            push_caption(&mut captions, timing, &text_lines, line_num);
        }

        Ok(captions)
    }

    /// Parse plain text, one caption per non-empty line
    pub fn parse_txt_string(content: &str) -> Vec<Caption> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Caption::untimed)
            .collect()
    }

    /// Render in this sequence's own format
    pub fn render(&self) -> SubtitleResult<String> {
        match self.format {
            SubtitleFormat::Srt => self.render_srt(),
            SubtitleFormat::Vtt => self.render_vtt(),
            SubtitleFormat::Txt => Ok(self.render_txt()),
        }
    }

    /// Render as SRT, renumbering from 1
    pub fn render_srt(&self) -> SubtitleResult<String> {
        let mut output = String::new();
        for (seq_num, (timing, caption)) in self.timings()?.iter().zip(&self.captions).enumerate() {
            output.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                seq_num + 1,
                timing.start.format_with_separator(','),
                timing.end.format_with_separator(','),
                caption.text
            ));
        }
        Ok(output)
    }

    /// Render as WebVTT
    pub fn render_vtt(&self) -> SubtitleResult<String> {
        let mut output = format!("{}\n\n", VTT_HEADER);
        for (timing, caption) in self.timings()?.iter().zip(&self.captions) {
            output.push_str(&format!("{} --> {}\n{}\n\n", timing.start, timing.end, caption.text));
        }
        Ok(output)
    }

    /// Render as plain text; timing is discarded
    pub fn render_txt(&self) -> String {
        self.captions
            .iter()
            .map(|caption| format!("{}\n", caption.text))
            .collect()
    }
}

impl fmt::Display for CaptionSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Caption Sequence")?;
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Captions: {}", self.captions.len())?;
        Ok(())
    }
}

/// Parse a cue timing line; `Ok(None)` when the line is not a timing line
fn parse_timing_line(
    line: &str,
    line_num: usize,
    parse_ts: fn(&str) -> SubtitleResult<Timestamp>,
) -> SubtitleResult<Option<CaptionTiming>> {
    let Some(caps) = TIMING_LINE_REGEX.captures(line) else {
        return Ok(None);
    };

    let to_parse_error = |e: SubtitleError| SubtitleError::ParseError {
        line: line_num,
        message: e.to_string(),
    };
    let start = parse_ts(&caps[1]).map_err(to_parse_error)?;
    let end = parse_ts(&caps[2]).map_err(to_parse_error)?;

    Ok(Some(CaptionTiming::new(start, end)))
}

/// WebVTT allows the hour field to be omitted
fn parse_vtt_timestamp(text: &str) -> SubtitleResult<Timestamp> {
    if VTT_SHORT_TIMESTAMP_REGEX.is_match(text) {
        Timestamp::parse(&format!("00:{}", text))
            .map_err(|_| SubtitleError::MalformedTimestamp(text.to_string()))
    } else {
        Timestamp::parse(text)
    }
}

fn push_caption(captions: &mut Vec<Caption>, timing: CaptionTiming, text_lines: &[&str], line_num: usize) {
    if text_lines.is_empty() {
        warn!("Skipping empty caption at line {}", line_num);
        return;
    }
    if timing.is_degenerate() {
        warn!(
            "Skipping caption at line {}: end {} is not after start {}",
            line_num, timing.end, timing.start
        );
        return;
    }
    captions.push(Caption::new(timing, text_lines.join("\n")));
}
