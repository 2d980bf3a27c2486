use chrono::{Datelike, Local};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chapters::model::{
    AnalysisResult, ChapterTopic, RawAnalysisResponse, SplitAnalysis, TopicItem,
    default_thumbnails,
};
use crate::errors::ProviderError;
use crate::providers::{GenerationRequest, Provider};
use crate::subtitle_timeline::ms_to_chapter_time;

// @module: Topic/title analysis over the provider seam

// @const: Sampling temperature for analysis requests
const ANALYSIS_TEMPERATURE: f32 = 0.8;

// @const: Topic line pattern for the best-effort fallback scan
static TOPIC_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-・●•*]\s*)?(\d{1,2}:\d{2}(?::\d{2})?)\s+(.+)$").unwrap()
});

/// Analysis service: turns timestamped transcript text into titles,
/// thumbnail captions and a topic list via the provider.
#[derive(Debug)]
pub struct AnalysisService<P> {
    /// The generation provider
    provider: P,
    /// Show name woven into titles and fallbacks
    show_name: String,
}

impl<P: Provider> AnalysisService<P> {
    /// Create a new analysis service
    pub fn new(provider: P, show_name: impl Into<String>) -> Self {
        Self {
            provider,
            show_name: show_name.into(),
        }
    }

    /// Analyze one transcript and normalize the response shape
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, ProviderError> {
        let date_str = japanese_date();
        let prompt = build_analysis_prompt(text, &self.show_name, &date_str);

        let raw = self
            .provider
            .generate(GenerationRequest::json(prompt, ANALYSIS_TEMPERATURE))
            .await?;

        Ok(parse_analysis_response(&raw, &self.show_name, &date_str))
    }

    /// Analyze a split recording: both halves in parallel, then offset the
    /// second half's timestamps back by the split boundary so each half
    /// reports time-within-segment.
    pub async fn analyze_split(
        &self,
        text1: &str,
        text2: &str,
        split_ms: u64,
    ) -> Result<SplitAnalysis, ProviderError> {
        let (part1, mut part2) = tokio::try_join!(self.analyze(text1), self.analyze(text2))?;

        part2.topics = part2
            .topics
            .into_iter()
            .map(|topic| match topic {
                ChapterTopic::Timed(item) => ChapterTopic::Timed(TopicItem {
                    time: adjust_timestamp(&item.time, split_ms),
                    topic: item.topic,
                }),
                plain => plain,
            })
            .collect();

        Ok(SplitAnalysis { part1, part2 })
    }
}

/// Parse a provider response, tolerating legacy shapes.
///
/// Valid JSON goes through [`AnalysisResult::from_raw`]; anything else falls
/// back to a dated placeholder title, the placeholder thumbnails and a
/// best-effort line scan for topics.
pub fn parse_analysis_response(raw_text: &str, show_name: &str, date_str: &str) -> AnalysisResult {
    match serde_json::from_str::<RawAnalysisResponse>(raw_text) {
        Ok(raw) => AnalysisResult::from_raw(raw),
        Err(e) => {
            warn!("Analysis response was not valid JSON ({}), scanning topic lines instead", e);
            debug!("Raw analysis text: {}", raw_text);
            AnalysisResult {
                titles: vec![format!("ラジオ書き起こし {} {}", show_name, date_str)],
                thumbnails: default_thumbnails(),
                topics: scan_topic_lines(raw_text),
            }
        }
    }
}

/// Best-effort scan for `HH:MM:SS topic` or `MM:SS topic` lines, with or
/// without a leading bullet. `MM:SS` times are promoted to `00:MM:SS`.
pub fn scan_topic_lines(text: &str) -> Vec<ChapterTopic> {
    text.lines()
        .filter_map(|line| {
            let caps = TOPIC_LINE_REGEX.captures(line)?;
            let mut time = caps[1].to_string();
            let topic = caps[2].trim().to_string();

            if time.split(':').count() == 2 {
                time = format!("00:{}", time);
            }

            (!topic.is_empty()).then(|| ChapterTopic::Timed(TopicItem { time, topic }))
        })
        .collect()
}

/// Subtract a split boundary from a chapter timestamp, clamping at zero.
///
/// Accepts `HH:MM:SS` or `MM:SS`. A timestamp that does not parse is returned
/// unchanged so one bad topic line cannot poison the whole result.
pub fn adjust_timestamp(time_str: &str, subtract_ms: u64) -> String {
    let fields: Vec<Option<u64>> = time_str
        .split(':')
        .map(|field| field.parse::<u64>().ok())
        .collect();

    let total_ms = match fields.as_slice() {
        [Some(hours), Some(minutes), Some(seconds)] => {
            hours * 3_600_000 + minutes * 60_000 + seconds * 1_000
        }
        [Some(minutes), Some(seconds)] => minutes * 60_000 + seconds * 1_000,
        _ => {
            debug!("Leaving unparseable topic timestamp as-is: {}", time_str);
            return time_str.to_string();
        }
    };

    ms_to_chapter_time(total_ms.saturating_sub(subtract_ms))
}

/// Today's date in the `M月D日` form used in titles
fn japanese_date() -> String {
    let today = Local::now();
    format!("{}月{}日", today.month(), today.day())
}

/// Build the analysis prompt around the timestamped transcript
fn build_analysis_prompt(text: &str, show_name: &str, date_str: &str) -> String {
    format!(
        r#"以下は2人の話者によるラジオトークの書き起こしです。タイムスタンプ付きで記載されています。
会話の内容を分析して、話題リストとYouTube動画用タイトルを生成してください。

【重要：表現スタイル】
- 週刊誌や東スポの見出しのような、フランクでキャッチーな表現にしてください
- 大げさで面白い言い回しを使ってください
- 「〜か!?」「〜の真相」「衝撃の〜」「まさかの〜」など煽り系の表現OK
- 堅い表現はNG、くだけたノリで

【YouTubeタイトル生成ルール】
- **SEOを意識し、クリックしたくなるような強いパワーワード**を使ってください
- タイトルの末尾には必ず「{show_name} {date_str}」を含めてください
- **重要：タイトルの文字数は、末尾の「{show_name}...」を含めて「全角100文字以内」に必ず収めてください（YouTubeの制限）**
- **100文字を超えると投稿できません。短すぎてもOKなので、絶対に100文字を超えないでください**
- 内容を具体的に示唆しつつ、続きが気になるような書き方にしてください
- **YouTubeのABテスト用に、切り口を変えたタイトル案を3つ作成してください**
  1. インパクト重視（衝撃、まさか、など）
  2. 内容具体化重視（具体的なキーワード多め）
  3. 疑問・問いかけ重視（〜とは？、〜の真相、など）

【サムネイル用テキスト生成ルール】
- **画像に乗せるための、視認性が高くインパクトのある短いフレーズ**を作成してください
- タイトル案の3つの方向性（インパクト、具体化、疑問）に合わせて、それぞれサムネ文字も3パターン作成してください
- **メイン（中央にデカく）**：10文字前後、一番目立つパワーワード
- **サブ（上下に配置）**：15文字前後、内容を補足する煽り文句

【出力形式】
以下のJSON形式のみを出力してください。Markdownのコードブロックは不要です。
{{
  "titles": [
    "タイトル案1...",
    "タイトル案2...",
    "タイトル案3..."
  ],
  "thumbnails": [
    {{ "main": "メイン文言1", "sub": "サブ文言1" }},
    {{ "main": "メイン文言2", "sub": "サブ文言2" }},
    {{ "main": "メイン文言3", "sub": "サブ文言3" }}
  ],
  "topics": [
    {{ "time": "HH:MM:SS", "topic": "話題の内容（最大24文字）" }}
  ]
}}

【会話内容】
{text}"#
    )
}
