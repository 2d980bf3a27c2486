/*!
 * Chapter metadata generation from subtitle timelines.
 *
 * This module turns a parsed timeline into YouTube-ready chapter metadata:
 *
 * - `model`: Topic/title/thumbnail data model with the shape-tolerant
 *   deserialization of provider responses
 * - `analysis`: Analysis service calling the provider, with the split
 *   (two-halves-in-parallel) flow and timestamp adjustment
 * - `generator`: Regeneration of synthetic chapter SRT documents and the
 *   plain-text report
 */

// Re-export main types for easier usage
pub use self::analysis::{AnalysisService, adjust_timestamp, scan_topic_lines};
pub use self::generator::{generate_chapter_srt, generate_split_chapter_srt};
pub use self::model::{AnalysisResult, ChapterTopic, SplitAnalysis, ThumbnailText, TopicItem, TopicList};

// Submodules
pub mod analysis;
pub mod generator;
pub mod model;
