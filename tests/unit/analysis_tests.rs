/*!
 * Tests for analysis response normalization, timestamp adjustment and the
 * split analysis flow
 */

use chapterize::chapters::analysis::{
    AnalysisService, adjust_timestamp, parse_analysis_response, scan_topic_lines,
};
use chapterize::chapters::model::{
    ChapterTopic, PLACEHOLDER_THUMBNAIL_MAIN, PLACEHOLDER_TITLE, TopicItem,
};
use chapterize::providers::mock::MockProvider;

fn timed(time: &str, topic: &str) -> ChapterTopic {
    ChapterTopic::Timed(TopicItem {
        time: time.to_string(),
        topic: topic.to_string(),
    })
}

#[test]
fn test_parseResponse_withWellFormedJson_shouldKeepAllFields() {
    let raw = r#"{
        "titles": ["A", "B", "C"],
        "thumbnails": [{ "main": "M", "sub": "S" }],
        "topics": [{ "time": "00:01:00", "topic": "話題" }]
    }"#;

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(result.titles, vec!["A", "B", "C"]);
    assert_eq!(result.thumbnails.len(), 1);
    assert_eq!(result.topics, vec![timed("00:01:00", "話題")]);
}

/// Legacy responses carry a single `title` string instead of `titles`
#[test]
fn test_parseResponse_withLegacyTitle_shouldPromoteToTitlesArray() {
    let raw = r#"{ "title": "昔の形式", "topics": [] }"#;

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(result.titles, vec!["昔の形式"]);
}

#[test]
fn test_parseResponse_withMissingThumbnails_shouldSubstitutePlaceholders() {
    let raw = r#"{ "titles": ["T"], "topics": [] }"#;

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(result.thumbnails.len(), 3);
    assert!(result.thumbnails.iter().all(|t| t.main == PLACEHOLDER_THUMBNAIL_MAIN));
}

#[test]
fn test_parseResponse_withNoTitleAtAll_shouldUsePlaceholderTitle() {
    let raw = r#"{ "topics": [] }"#;

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(result.titles, vec![PLACEHOLDER_TITLE]);
}

#[test]
fn test_parseResponse_withBareStringTopics_shouldAcceptLegacyShape() {
    let raw = r#"{ "titles": ["T"], "topics": ["フリートーク", "告知"] }"#;

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(
        result.topics,
        vec![
            ChapterTopic::Plain("フリートーク".to_string()),
            ChapterTopic::Plain("告知".to_string())
        ]
    );
}

/// Non-JSON output falls back to a dated title and a topic line scan
#[test]
fn test_parseResponse_withProse_shouldFallBackToLineScan() {
    let raw = "今回の話題:\n- 00:10 オープニング\n・01:05:30 ゲスト登場\nただのテキスト";

    let result = parse_analysis_response(raw, "テスト番組", "1月15日");

    assert_eq!(result.titles, vec!["ラジオ書き起こし テスト番組 1月15日"]);
    assert_eq!(result.thumbnails.len(), 3);
    assert_eq!(
        result.topics,
        vec![timed("00:00:10", "オープニング"), timed("01:05:30", "ゲスト登場")]
    );
}

#[test]
fn test_scanTopicLines_withTwoFieldTimes_shouldPromoteToThreeFields() {
    let topics = scan_topic_lines("05:30 リスナーのメール");
    assert_eq!(topics, vec![timed("00:05:30", "リスナーのメール")]);
}

#[test]
fn test_scanTopicLines_withBulletVariants_shouldMatchAll() {
    let text = "- 00:00:10 ダッシュ\n・00:00:20 中黒\n* 00:00:30 アスタリスク\n● 00:00:40 丸";
    assert_eq!(scan_topic_lines(text).len(), 4);
}

#[test]
fn test_scanTopicLines_withNoTimestampLines_shouldReturnEmpty() {
    assert!(scan_topic_lines("話題のないテキスト\nもう一行").is_empty());
}

#[test]
fn test_adjustTimestamp_withOffsetInside_shouldSubtract() {
    assert_eq!(adjust_timestamp("01:10:00", 3_600_000), "00:10:00");
}

#[test]
fn test_adjustTimestamp_withOffsetPastTime_shouldClampToZero() {
    assert_eq!(adjust_timestamp("00:05:00", 3_600_000), "00:00:00");
}

#[test]
fn test_adjustTimestamp_withTwoFieldTime_shouldTreatAsMinutesSeconds() {
    assert_eq!(adjust_timestamp("10:30", 60_000), "00:09:30");
}

#[test]
fn test_adjustTimestamp_withUnparseableTime_shouldReturnInputUnchanged() {
    assert_eq!(adjust_timestamp("??:??", 1_000), "??:??");
}

#[tokio::test]
async fn test_analyze_withWorkingProvider_shouldReturnNormalizedResult() {
    let service = AnalysisService::new(MockProvider::working(), "テスト番組");

    let result = service.analyze("[00:00:01] こんにちは").await.unwrap();

    assert_eq!(result.titles.len(), 3);
    assert_eq!(result.thumbnails.len(), 3);
    assert_eq!(result.topics.len(), 2);
}

#[tokio::test]
async fn test_analyze_withFailingProvider_shouldPropagateError() {
    let service = AnalysisService::new(MockProvider::failing(), "テスト番組");

    assert!(service.analyze("[00:00:01] こんにちは").await.is_err());
}

#[tokio::test]
async fn test_analyzeSplit_shouldAdjustSecondHalfTimestamps() {
    let provider = MockProvider::working();
    let service = AnalysisService::new(provider.clone(), "テスト番組");

    // Canned topics are at 00:00:10 and 00:05:30; split at five minutes
    let analysis = service
        .analyze_split("[00:00:01] 前半", "[00:05:01] 後半", 300_000)
        .await
        .unwrap();

    // Both halves analyzed
    assert_eq!(provider.request_count(), 2);

    // First half untouched
    assert_eq!(
        analysis.part1.topics,
        vec![timed("00:00:10", "オープニング"), timed("00:05:30", "リスナーからのメール")]
    );

    // Second half offset back by the split boundary, clamped at zero
    assert_eq!(
        analysis.part2.topics,
        vec![timed("00:00:00", "オープニング"), timed("00:00:30", "リスナーからのメール")]
    );
}

#[tokio::test]
async fn test_analyzeSplit_withRawTextProvider_shouldStillAdjustScannedTopics() {
    let service = AnalysisService::new(MockProvider::raw_text(), "テスト番組");

    // Scanned topics: 00:00:10 and 01:05:30; split at one hour
    let analysis = service
        .analyze_split("前半", "後半", 3_600_000)
        .await
        .unwrap();

    assert_eq!(
        analysis.part2.topics,
        vec![timed("00:00:00", "オープニング"), timed("00:05:30", "ゲスト登場")]
    );
}
