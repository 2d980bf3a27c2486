// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::{Controller, SplitMode, TranscriptionBackend};
use crate::cancellation::CancellationToken;

mod app_config;
mod app_controller;
mod cancellation;
mod chapters;
mod errors;
mod file_utils;
mod providers;
mod subtitle_timeline;
mod timestamp_normalizer;
mod transcriber;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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

/// CLI Wrapper for the transcription backend
#[derive(Debug, Clone, ValueEnum)]
enum CliBackend {
    Remote,
    Local,
}

impl From<CliBackend> for TranscriptionBackend {
    fn from(backend: CliBackend) -> Self {
        match backend {
            CliBackend::Remote => TranscriptionBackend::Remote,
            CliBackend::Local => TranscriptionBackend::Local,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate YouTube chapter metadata from an SRT file
    Chapters(ChaptersArgs),

    /// Transcribe an audio recording into an SRT file
    Transcribe(TranscribeArgs),

    /// Repair malformed timestamp ranges in an SRT file, in place
    Fix(FixArgs),

    /// Generate shell completions for chapterize
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ChaptersArgs {
    /// Input SRT file
    #[arg(value_name = "SRT_FILE")]
    input_path: PathBuf,

    /// Split the recording at half of its total duration
    #[arg(long, conflicts_with = "split_at")]
    split_half: bool,

    /// Split the recording at an explicit MM:SS or H:MM:SS time
    #[arg(long, value_name = "TIME")]
    split_at: Option<String>,

    /// Directory for the generated files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Input audio file (mp3, wav, m4a, aac, ogg, flac)
    #[arg(value_name = "AUDIO_FILE")]
    input_path: PathBuf,

    /// Transcription backend to use
    #[arg(short, long, value_enum, default_value = "remote")]
    backend: CliBackend,

    /// Continue into chapter generation after transcription
    #[arg(long)]
    chapters: bool,
}

#[derive(Parser, Debug)]
struct FixArgs {
    /// SRT file to repair
    #[arg(value_name = "SRT_FILE")]
    input_path: PathBuf,
}

/// chapterize - Radio-show recordings to YouTube chapter metadata
///
/// Turns a radio-show audio recording (or an existing SRT subtitle file) into
/// YouTube chapter metadata: a topic list with timestamps, title candidates
/// and thumbnail caption variants.
#[derive(Parser, Debug)]
#[command(name = "chapterize")]
#[command(version = "1.0.0")]
#[command(about = "Radio-show recordings to YouTube chapter metadata")]
#[command(long_about = "chapterize transcribes radio-show audio and turns the subtitles into
YouTube chapter metadata using Gemini.

EXAMPLES:
    chapterize transcribe show.mp3              # Audio to SRT via Gemini
    chapterize transcribe -b local show.mp3     # Audio to SRT via local whisper
    chapterize transcribe --chapters show.mp3   # Straight through to chapters
    chapterize chapters show.srt                # Chapter metadata for one recording
    chapterize chapters --split-half show.srt   # Two-part upload, analyzed per half
    chapterize chapters --split-at 45:00 show.srt
    chapterize fix legacy.srt                   # Repair loose timestamps in place
    chapterize completions bash > chapterize.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The Gemini API key is read from the config
    file or the GEMINI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Gemini API key (overrides config and environment)
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "chapterize", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config = load_config(&cli)?;

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Chapters(args) => {
            let mode = if args.split_half {
                SplitMode::Half
            } else if let Some(time) = &args.split_at {
                let split_ms = subtitle_timeline::parse_time_input(time)
                    .context("Invalid --split-at time")?;
                SplitMode::AtMs(split_ms)
            } else {
                SplitMode::Whole
            };

            ensure_exists(&args.input_path)?;
            controller
                .run_chapters(&args.input_path, mode, args.output_dir.as_deref())
                .await
        }
        Commands::Transcribe(args) => {
            ensure_exists(&args.input_path)?;

            // Ctrl-C cancels the in-flight transcription and kills any subprocess
            let cancel = CancellationToken::new();
            let listener = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Cancellation requested");
                        cancel.cancel();
                    }
                })
            };

            let result = controller
                .run_transcription(
                    &args.input_path,
                    args.backend.into(),
                    args.chapters,
                    &cancel,
                )
                .await;

            listener.abort();
            result
        }
        Commands::Fix(args) => {
            ensure_exists(&args.input_path)?;
            controller.run_fix(&args.input_path)
        }
        Commands::Completions { .. } => unreachable!(),
    }
}

/// Load the config file, creating a default one when missing, and apply CLI
/// overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;

    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

/// Map the config log level onto the log crate's filter
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Fail early with a clear message for a missing input path
fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    }
    info!("Processing {:?}", path);
    Ok(())
}
