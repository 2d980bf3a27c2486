use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: SRT timeline model - parsing, splitting and regeneration

// @const: Strict SRT timestamp-range regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

// @const: Blank-line block separator
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{2,}").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Original sequence number from the file
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Caption text, newlines preserved
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        SubtitleEntry {
            index,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        ms_to_time(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        ms_to_time(self.end_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered sequence of subtitle entries for one recording.
///
/// Entries are kept in file order; the parser never re-sorts or renumbers.
/// Splitting produces new timelines and leaves the source untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTimeline {
    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,
}

/// Result of partitioning a timeline at a millisecond boundary.
///
/// Every `part1` entry starts strictly before `split_ms`, every `part2` entry
/// at or after it; together the parts contain every original entry exactly
/// once, relative order preserved.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Entries starting before the boundary
    pub part1: SubtitleTimeline,
    /// Entries starting at or after the boundary
    pub part2: SubtitleTimeline,
    /// The boundary itself in ms
    pub split_ms: u64,
}

impl SubtitleTimeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        SubtitleTimeline { entries: Vec::new() }
    }

    /// Parse an SRT document into a timeline.
    ///
    /// Blocks are separated by blank lines; each block is an index line, a
    /// strict `HH:MM:SS,mmm --> HH:MM:SS,mmm` line and zero or more text
    /// lines. A block whose index or timestamp line fails to parse is skipped
    /// silently. Parsing never fails - worst case the timeline is empty.
    pub fn parse(content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n");
        let mut entries = Vec::new();

        for block in BLOCK_SEPARATOR_REGEX.split(normalized.trim()) {
            let lines: Vec<&str> = block.lines().collect();
            if lines.len() < 2 {
                continue;
            }

            let index = match lines[0].trim().parse::<usize>() {
                Ok(index) => index,
                Err(_) => {
                    debug!("Skipping block with non-numeric index line: {}", lines[0]);
                    continue;
                }
            };

            let Some(caps) = TIMESTAMP_REGEX.captures(lines[1]) else {
                debug!("Skipping block {} with malformed timestamp line: {}", index, lines[1]);
                continue;
            };

            // Both capture groups already match the strict pattern
            let (Ok(start_ms), Ok(end_ms)) = (time_to_ms(&caps[1]), time_to_ms(&caps[2])) else {
                continue;
            };

            entries.push(SubtitleEntry {
                index,
                start_ms,
                end_ms,
                text: lines[2..].join("\n"),
            });
        }

        SubtitleTimeline { entries }
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read subtitle file: {}", path.as_ref().display()))?;
        Ok(Self::parse(&content))
    }

    /// Write the timeline to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// End time of the final entry, or 0 for an empty timeline
    pub fn total_duration_ms(&self) -> u64 {
        self.entries.last().map_or(0, |entry| entry.end_ms)
    }

    /// Partition the timeline at a millisecond boundary.
    ///
    /// A boundary of 0 or one past the final end time leaves one side empty;
    /// that is a legitimate result, not an error.
    pub fn split_by_time(&self, split_ms: u64) -> SplitResult {
        let (part1, part2) = self
            .entries
            .iter()
            .cloned()
            .partition(|entry| entry.start_ms < split_ms);

        SplitResult {
            part1: SubtitleTimeline { entries: part1 },
            part2: SubtitleTimeline { entries: part2 },
            split_ms,
        }
    }

    /// Partition at half of the final entry's end time.
    ///
    /// This is a time-based half, not a count-based one - with uneven talk
    /// density the two parts can hold very different entry counts.
    pub fn split_in_half(&self) -> SplitResult {
        let split_ms = self.total_duration_ms() / 2;
        self.split_by_time(split_ms)
    }

    /// Lazy iterator of `[HH:MM:SS] <text>` lines, one per entry.
    pub fn timestamped_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|entry| format!("[{}] {}", ms_to_chapter_time(entry.start_ms), entry.text))
    }

    /// Newline-joined `[HH:MM:SS] <text>` lines - the exact payload handed to
    /// the analysis provider so it can correlate topics to moments.
    pub fn extract_text_with_timestamp(&self) -> String {
        self.timestamped_lines().collect::<Vec<_>>().join("\n")
    }

    /// Text-only join, kept for callers that do not need timestamps
    pub fn extract_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SubtitleTimeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Timeline")?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        writeln!(f, "Duration: {}", format_duration(self.total_duration_ms()))?;
        Ok(())
    }
}

/// Parse a strict `HH:MM:SS,mmm` timestamp to milliseconds
pub fn time_to_ms(timestamp: &str) -> Result<u64> {
    let (hms, millis) = timestamp
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;

    let fields: Vec<&str> = hms.split(':').collect();
    if fields.len() != 3 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let hours: u64 = fields[0].parse().context("Failed to parse hours")?;
    let minutes: u64 = fields[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = fields[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = millis.parse().context("Failed to parse milliseconds")?;

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Format milliseconds as `HH:MM:SS,mmm`.
///
/// Hours are unconstrained above 24 - an 18-hour timeline plus offset renders
/// hours greater than 23 rather than wrapping.
pub fn ms_to_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format milliseconds as a chapter-style `HH:MM:SS` timestamp
pub fn ms_to_chapter_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a user-supplied `MM:SS` or `H:MM:SS` split time into milliseconds.
///
/// Malformed input is a value error so a mistyped split time surfaces as a
/// validation failure instead of a silent "no split".
pub fn parse_time_input(input: &str) -> Result<u64> {
    let fields: Vec<&str> = input.trim().split(':').collect();

    let parsed: Result<Vec<u64>> = fields
        .iter()
        .map(|field| {
            field
                .parse::<u64>()
                .map_err(|_| anyhow!("Invalid time field '{}' in '{}'", field, input))
        })
        .collect();
    let parsed = parsed?;

    match parsed.as_slice() {
        [minutes, seconds] => Ok(minutes * 60_000 + seconds * 1_000),
        [hours, minutes, seconds] => Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000),
        _ => Err(anyhow!(
            "Expected MM:SS or H:MM:SS time, got '{}'",
            input
        )),
    }
}

/// Lenient variant of [`parse_time_input`]: malformed input degrades to a
/// zero offset instead of failing.
pub fn parse_time_input_or_zero(input: &str) -> u64 {
    parse_time_input(input).unwrap_or(0)
}

/// Human-readable duration for status lines, e.g. "1時間23分"
pub fn format_duration(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;

    if hours > 0 {
        format!("{}時間{}分", hours, minutes)
    } else {
        format!("{}分", minutes)
    }
}
