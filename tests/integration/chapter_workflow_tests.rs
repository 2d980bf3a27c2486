/*!
 * End-to-end chapter generation tests over the mock provider
 */

use anyhow::Result;
use chapterize::chapters::analysis::AnalysisService;
use chapterize::chapters::generator::{
    FIRST_HALF_HEADING, SECOND_HALF_HEADING, TOPIC_DISPLAY_DURATION_MS, generate_chapter_srt,
    generate_split_chapter_srt,
};
use chapterize::providers::mock::MockProvider;
use chapterize::subtitle_timeline::SubtitleTimeline;
use chapterize::timestamp_normalizer::normalize_timestamps;
use crate::common;

/// Whole-recording flow: parse, extract, analyze, regenerate, reparse
#[tokio::test]
async fn test_wholeRecordingFlow_shouldProduceParseableChapterSrt() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let srt_path = common::create_test_subtitle(&dir.path().to_path_buf(), "show.srt")?;

    let timeline = SubtitleTimeline::from_file(&srt_path)?;
    assert_eq!(timeline.len(), 3);

    let service = AnalysisService::new(MockProvider::working(), "テスト番組");
    let result = service.analyze(&timeline.extract_text_with_timestamp()).await?;

    let chapter_srt = generate_chapter_srt(result.topics.clone(), None);
    let chapters = SubtitleTimeline::parse(&chapter_srt);

    // Heading plus one entry per topic, each five seconds long
    assert_eq!(chapters.len(), result.topics.len() + 1);
    for entry in &chapters.entries {
        assert_eq!(entry.end_ms - entry.start_ms, TOPIC_DISPLAY_DURATION_MS);
    }

    Ok(())
}

/// Split flow: both halves analyzed, second half rebased, both blocks present
#[tokio::test]
async fn test_splitFlow_shouldAnalyzeBothHalvesAndRebase() -> Result<()> {
    let srt = common::build_srt(&[
        (0, 200_000, "前半の話です"),
        (250_000, 400_000, "まだ前半です"),
        (450_000, 600_000, "ここからは後半です"),
    ]);
    let timeline = SubtitleTimeline::parse(&srt);

    let split = timeline.split_in_half();
    assert_eq!(split.split_ms, 300_000);
    assert_eq!(split.part1.len(), 2);
    assert_eq!(split.part2.len(), 1);

    let provider = MockProvider::working();
    let service = AnalysisService::new(provider.clone(), "テスト番組");

    let analysis = service
        .analyze_split(
            &split.part1.extract_text_with_timestamp(),
            &split.part2.extract_text_with_timestamp(),
            split.split_ms,
        )
        .await?;
    assert_eq!(provider.request_count(), 2);

    let chapter_srt =
        generate_split_chapter_srt(analysis.part1.topics.clone(), analysis.part2.topics.clone());
    let chapters = SubtitleTimeline::parse(&chapter_srt);

    let texts: Vec<&str> = chapters.entries.iter().map(|e| e.text.as_str()).collect();
    assert!(texts.contains(&FIRST_HALF_HEADING));
    assert!(texts.contains(&SECOND_HALF_HEADING));

    Ok(())
}

/// A legacy file with loose timestamps becomes parseable after normalization
#[test]
fn test_fixThenParse_shouldRecoverLegacyFile() {
    let legacy = "1\n5,000 --> 8,000\n最初の発言\n\n2\n1:02,500 --> 1:06,000\n次の発言\n";

    // The strict parser drops both malformed blocks
    assert!(SubtitleTimeline::parse(legacy).is_empty());

    let fixed = normalize_timestamps(legacy);
    let timeline = SubtitleTimeline::parse(&fixed);

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.entries[0].start_ms, 5_000);
    assert_eq!(timeline.entries[1].start_ms, 62_500);
}

/// Analysis failures abort the flow instead of producing empty artifacts
#[tokio::test]
async fn test_wholeRecordingFlow_withFailingProvider_shouldAbort() {
    let timeline = SubtitleTimeline::parse(common::sample_srt());
    let service = AnalysisService::new(MockProvider::failing(), "テスト番組");

    let result = service.analyze(&timeline.extract_text_with_timestamp()).await;
    assert!(result.is_err());
}
