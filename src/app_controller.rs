use anyhow::{Result, anyhow};
use log::{warn, info, debug};
use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::app_config::Config;
use crate::cancellation::CancellationToken;
use crate::chapters::analysis::AnalysisService;
use crate::chapters::generator::{
    generate_chapter_srt, generate_split_chapter_srt, generate_split_text_report,
    generate_text_report,
};
use crate::file_utils::FileManager;
use crate::providers::gemini::GeminiClient;
use crate::subtitle_timeline::{SubtitleTimeline, format_duration};
use crate::timestamp_normalizer::normalize_timestamps;
use crate::transcriber::{ProgressUpdate, Transcriber};

// @module: Application controller for the chapter and transcription workflows

/// How the timeline is split before analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Analyze the whole recording as one
    Whole,
    /// Split at half of the total duration
    Half,
    /// Split at an explicit millisecond boundary
    AtMs(u64),
}

/// Which transcription backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionBackend {
    /// Provider File API upload + generation
    Remote,
    /// Local ffmpeg + whisper subprocesses
    Local,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Build a Gemini client for the given model, requiring an API key
    fn gemini_client(&self, model: &str) -> Result<GeminiClient> {
        let api_key = self.config.effective_api_key();
        if api_key.trim().is_empty() {
            return Err(anyhow!(
                "Gemini API key is not set. Add it to the config file or the GEMINI_API_KEY environment variable."
            ));
        }

        Ok(GeminiClient::new(api_key, self.config.endpoint.clone(), model))
    }

    /// Chapter workflow: parse the SRT, optionally split, analyze, write the
    /// chapter SRT and the text report next to the input.
    pub async fn run_chapters(
        &self,
        input_file: &Path,
        mode: SplitMode,
        output_dir: Option<&Path>,
    ) -> Result<()> {
        let timeline = SubtitleTimeline::from_file(input_file)?;
        if timeline.is_empty() {
            return Err(anyhow!(
                "No subtitle entries found in {}",
                input_file.display()
            ));
        }

        info!(
            "Loaded {} entries, about {}",
            timeline.len(),
            format_duration(timeline.total_duration_ms())
        );

        let client = self.gemini_client(&self.config.analysis.model)?;
        let service = AnalysisService::new(client, self.config.analysis.show_name.clone());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Analyzing topics...");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let (chapter_srt, report) = match mode {
            SplitMode::Whole => {
                let text = timeline.extract_text_with_timestamp();
                let result = service.analyze(&text).await?;
                debug!("Analysis produced {} topics", result.topics.len());
                (
                    generate_chapter_srt(result.topics.clone(), None),
                    generate_text_report(&result),
                )
            }
            SplitMode::Half | SplitMode::AtMs(_) => {
                let split = match mode {
                    SplitMode::Half => timeline.split_in_half(),
                    SplitMode::AtMs(ms) => timeline.split_by_time(ms),
                    SplitMode::Whole => unreachable!(),
                };

                if split.part1.is_empty() || split.part2.is_empty() {
                    warn!(
                        "Split at {} leaves one side empty ({} / {} entries)",
                        format_duration(split.split_ms),
                        split.part1.len(),
                        split.part2.len()
                    );
                }

                let text1 = split.part1.extract_text_with_timestamp();
                let text2 = split.part2.extract_text_with_timestamp();
                let analysis = service.analyze_split(&text1, &text2, split.split_ms).await?;

                (
                    generate_split_chapter_srt(
                        analysis.part1.topics.clone(),
                        analysis.part2.topics.clone(),
                    ),
                    generate_split_text_report(&analysis),
                )
            }
        };

        spinner.finish_and_clear();

        let (srt_path, txt_path) = FileManager::chapter_output_paths(input_file, output_dir);
        FileManager::write_to_file(&srt_path, &chapter_srt)?;
        FileManager::write_to_file(&txt_path, &report)?;

        info!("Chapter SRT written to {}", srt_path.display());
        info!("Text report written to {}", txt_path.display());

        Ok(())
    }

    /// Transcription workflow: audio in, SRT out, with progress reporting and
    /// cancellation. Optionally continues straight into chapter generation.
    pub async fn run_transcription(
        &self,
        audio_file: &Path,
        backend: TranscriptionBackend,
        generate_chapters: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let client = self.gemini_client(&self.config.transcription.model)?;
        let transcriber = Transcriber::new(client, self.config.transcription.clone());

        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("[{bar:30}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let progress_bar = bar.clone();
        let progress = move |update: ProgressUpdate| {
            progress_bar.set_position(u64::from(update.percentage));
            progress_bar.set_message(update.status);
        };

        let result = match backend {
            TranscriptionBackend::Remote => {
                transcriber.transcribe_remote(audio_file, &progress, cancel).await
            }
            TranscriptionBackend::Local => {
                transcriber.transcribe_local(audio_file, &progress, cancel).await
            }
        };

        let srt_content = match result {
            Ok(content) => content,
            Err(e) if e.is_cancellation() => {
                bar.abandon_with_message("Cancelled");
                warn!("Transcription cancelled by user");
                return Ok(());
            }
            Err(e) => {
                bar.abandon();
                return Err(anyhow!(e));
            }
        };

        let srt_path = FileManager::transcription_output_path(
            audio_file,
            self.config.transcription.output_dir.as_deref(),
        );
        FileManager::write_to_file(&srt_path, &srt_content)?;

        bar.set_position(100);
        bar.finish_with_message("Done");
        info!("Transcription written to {}", srt_path.display());

        if generate_chapters {
            self.run_chapters(&srt_path, SplitMode::Whole, None).await?;
        }

        Ok(())
    }

    /// Repair workflow: normalize loose timestamps in an SRT file in place
    /// and report what changed.
    pub fn run_fix(&self, input_file: &Path) -> Result<()> {
        let content = FileManager::read_to_string(input_file)?;
        let fixed = normalize_timestamps(&content);

        FileManager::write_to_file(input_file, &fixed)?;

        let timestamp_lines: Vec<&str> = fixed
            .lines()
            .filter(|line| line.contains("-->"))
            .collect();

        info!("Repaired timestamps in {}", input_file.display());
        info!("Total entries: {}", timestamp_lines.len());
        if let (Some(first), Some(last)) = (timestamp_lines.first(), timestamp_lines.last()) {
            info!("First: {}", first);
            info!("Last: {}", last);
        }

        Ok(())
    }
}
