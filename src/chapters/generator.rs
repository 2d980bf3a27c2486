use std::fmt::Write;

use crate::chapters::model::{AnalysisResult, ChapterTopic, SplitAnalysis, TopicList};
use crate::subtitle_timeline::ms_to_time;

// @module: Regeneration of chapter SRT documents and text reports

/// Fixed on-screen duration of each synthetic chapter entry
pub const TOPIC_DISPLAY_DURATION_MS: u64 = 5_000;

/// Heading for an unsplit topic list
pub const DEFAULT_HEADING: &str = "【今回の話題】";
/// Heading for the first-half topic block
pub const FIRST_HALF_HEADING: &str = "【前半の話題】";
/// Heading for the second-half topic block
pub const SECOND_HALF_HEADING: &str = "【後半の話題】";

/// Emit one SRT block and advance the running cursor by one display slot
fn push_entry(srt: &mut String, index: &mut usize, current_ms: &mut u64, text: &str) {
    let _ = writeln!(srt, "{}", index);
    let _ = writeln!(
        srt,
        "{} --> {}",
        ms_to_time(*current_ms),
        ms_to_time(*current_ms + TOPIC_DISPLAY_DURATION_MS)
    );
    let _ = writeln!(srt, "{}", text);
    let _ = writeln!(srt);

    *index += 1;
    *current_ms += TOPIC_DISPLAY_DURATION_MS;
}

/// Generate a synthetic SRT document from a topic list.
///
/// One heading entry followed by one entry per topic, each displayed for
/// 5 seconds, placed back-to-back starting at ms 0.
pub fn generate_chapter_srt(topics: impl Into<TopicList>, title: Option<&str>) -> String {
    let topics = topics.into().into_topics();
    let mut srt = String::new();
    let mut index = 1;
    let mut current_ms = 0;

    push_entry(&mut srt, &mut index, &mut current_ms, title.unwrap_or(DEFAULT_HEADING));

    for topic in &topics {
        push_entry(&mut srt, &mut index, &mut current_ms, &topic.display_line());
    }

    srt
}

/// Generate a synthetic SRT document from two half topic lists.
///
/// Two back-to-back blocks, each with its own heading, separated by one extra
/// 5-second gap between the blocks.
pub fn generate_split_chapter_srt(
    part1: impl Into<TopicList>,
    part2: impl Into<TopicList>,
) -> String {
    let part1 = part1.into().into_topics();
    let part2 = part2.into().into_topics();

    let mut srt = String::new();
    let mut index = 1;
    let mut current_ms = 0;

    push_entry(&mut srt, &mut index, &mut current_ms, FIRST_HALF_HEADING);
    for topic in &part1 {
        push_entry(&mut srt, &mut index, &mut current_ms, &topic.display_line());
    }

    // Gap between the two blocks
    current_ms += TOPIC_DISPLAY_DURATION_MS;

    push_entry(&mut srt, &mut index, &mut current_ms, SECOND_HALF_HEADING);
    for topic in &part2 {
        push_entry(&mut srt, &mut index, &mut current_ms, &topic.display_line());
    }

    srt
}

/// Append one titled section of candidates ("案1: ...") to a report
fn push_candidate_section(text: &mut String, heading: &str, candidates: &[String]) {
    let _ = writeln!(text, "{}", heading);
    for (i, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(text, "案{}: {}", i + 1, candidate);
    }
}

/// Render one analysis result as a plain-text report section
fn push_result_section(
    text: &mut String,
    result: &AnalysisResult,
    title_heading: &str,
    thumb_heading: &str,
    topic_heading: &str,
) {
    push_candidate_section(text, title_heading, &result.titles);

    let _ = writeln!(text, "\n{}", thumb_heading);
    for (i, thumb) in result.thumbnails.iter().enumerate() {
        let _ = writeln!(text, "案{}: メイン「{}」 サブ「{}」", i + 1, thumb.main, thumb.sub);
    }

    let _ = writeln!(text, "\n{}", topic_heading);
    let lines: Vec<String> = result.topics.iter().map(ChapterTopic::display_line).collect();
    let _ = write!(text, "{}", lines.join("\n"));
}

/// Plain-text report for an unsplit analysis: title candidates, thumbnail
/// caption variants and the topic list, ready to save or copy.
pub fn generate_text_report(result: &AnalysisResult) -> String {
    let mut text = String::new();
    push_result_section(
        &mut text,
        result,
        "【動画タイトル案】",
        "【サムネ文言案】",
        DEFAULT_HEADING,
    );
    text
}

/// Plain-text report for a split analysis, both halves divided by a rule
pub fn generate_split_text_report(analysis: &SplitAnalysis) -> String {
    let mut text = String::new();

    push_result_section(
        &mut text,
        &analysis.part1,
        "【前半タイトル案】",
        "【前半サムネ文言案】",
        FIRST_HALF_HEADING,
    );

    let _ = write!(text, "\n\n-------------------\n\n");

    push_result_section(
        &mut text,
        &analysis.part2,
        "【後半タイトル案】",
        "【後半サムネ文言案】",
        SECOND_HALF_HEADING,
    );

    text
}
