/*!
 * # chapterize - Radio-show recordings to YouTube chapter metadata
 *
 * A Rust library for turning a radio-show audio recording (or an existing
 * SRT subtitle file) into YouTube chapter metadata.
 *
 * ## Features
 *
 * - Parse SRT subtitle documents into a timeline model
 * - Repair malformed timestamp ranges in legacy SRT files
 * - Split a timeline into two contiguous halves at a time boundary
 * - Analyze transcripts with Gemini into topic lists, title candidates and
 *   thumbnail caption variants
 * - Regenerate chapter-style SRT documents and plain-text reports
 * - Transcribe audio via the Gemini File API or a local whisper pipeline
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_timeline`: SRT timeline model (parse, split, serialize)
 * - `timestamp_normalizer`: Repair of loose timestamp ranges
 * - `chapters`: Chapter metadata generation:
 *   - `chapters::model`: Topic/title/thumbnail data model
 *   - `chapters::analysis`: Analysis service over the provider seam
 *   - `chapters::generator`: Chapter SRT and text-report regeneration
 * - `transcriber`: Audio-to-SRT transcription workflow
 * - `cancellation`: Cancellation token for long-running operations
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Mock provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cancellation;
pub mod chapters;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod subtitle_timeline;
pub mod timestamp_normalizer;
pub mod transcriber;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cancellation::CancellationToken;
pub use chapters::{AnalysisResult, AnalysisService, ChapterTopic, SplitAnalysis, TopicItem};
pub use errors::{AppError, ProviderError, TranscriptionError};
pub use subtitle_timeline::{SplitResult, SubtitleEntry, SubtitleTimeline};
pub use timestamp_normalizer::normalize_timestamps;
