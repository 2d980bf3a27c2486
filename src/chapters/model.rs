use serde::{Deserialize, Serialize};

// @module: Chapter metadata data model and provider-response normalization

/// Placeholder main caption used when the provider omits thumbnails
pub const PLACEHOLDER_THUMBNAIL_MAIN: &str = "サムネ文言生成中";
/// Placeholder sub caption used when the provider omits thumbnails
pub const PLACEHOLDER_THUMBNAIL_SUB: &str = "手動で調整してください";
/// Placeholder title used when the provider returns neither `titles` nor `title`
pub const PLACEHOLDER_TITLE: &str = "（タイトルなし）";

/// One discussion segment: chapter timestamp plus topic text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicItem {
    /// Chapter-style `HH:MM:SS` timestamp
    pub time: String,

    /// Topic description
    pub topic: String,
}

/// One topic as it appears in a provider response.
///
/// Newer responses carry `{time, topic}` objects, older ones bare strings.
/// The ambiguity is resolved here, once, at the deserialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterTopic {
    /// Timestamped topic from the structured response shape
    Timed(TopicItem),
    /// Bare topic string from the legacy response shape
    Plain(String),
}

impl ChapterTopic {
    /// Render the topic as a single display line: `<time> <topic>` when
    /// structured, `・<topic>` when bare.
    pub fn display_line(&self) -> String {
        match self {
            ChapterTopic::Timed(item) => format!("{} {}", item.time, item.topic),
            ChapterTopic::Plain(topic) => format!("・{}", topic),
        }
    }
}

impl From<TopicItem> for ChapterTopic {
    fn from(item: TopicItem) -> Self {
        ChapterTopic::Timed(item)
    }
}

/// A topic list as callers may hand it over: a bare array or a wrapper
/// object exposing a `topics` field. Normalized via [`TopicList::into_topics`]
/// so downstream logic is single-shaped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TopicList {
    /// Bare array shape
    Bare(Vec<ChapterTopic>),
    /// Wrapper object shape
    Wrapped {
        /// The wrapped topic list
        topics: Vec<ChapterTopic>,
    },
}

impl TopicList {
    /// Resolve either shape into the canonical topic vector
    pub fn into_topics(self) -> Vec<ChapterTopic> {
        match self {
            TopicList::Bare(topics) => topics,
            TopicList::Wrapped { topics } => topics,
        }
    }
}

impl From<Vec<ChapterTopic>> for TopicList {
    fn from(topics: Vec<ChapterTopic>) -> Self {
        TopicList::Bare(topics)
    }
}

/// Thumbnail caption pair: a short main phrase and a supporting sub phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailText {
    /// Main caption, big and central
    pub main: String,

    /// Sub caption placed above or below
    pub sub: String,
}

impl ThumbnailText {
    /// The single canonical placeholder pair
    pub fn placeholder() -> Self {
        ThumbnailText {
            main: PLACEHOLDER_THUMBNAIL_MAIN.to_string(),
            sub: PLACEHOLDER_THUMBNAIL_SUB.to_string(),
        }
    }
}

/// Three placeholder caption pairs, matching the expected candidate count
pub fn default_thumbnails() -> Vec<ThumbnailText> {
    vec![ThumbnailText::placeholder(); 3]
}

/// Raw provider response shape, before normalization.
///
/// Tolerates the legacy single `title` string and entirely absent
/// `thumbnails`/`topics` fields.
#[derive(Debug, Deserialize)]
pub struct RawAnalysisResponse {
    /// Legacy single title
    #[serde(default)]
    pub title: Option<String>,

    /// Current title candidate list
    #[serde(default)]
    pub titles: Option<Vec<String>>,

    /// Thumbnail caption candidates
    #[serde(default)]
    pub thumbnails: Option<Vec<ThumbnailText>>,

    /// Topic list
    #[serde(default)]
    pub topics: Option<Vec<ChapterTopic>>,
}

/// Normalized analysis result: what the rest of the application works with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Title candidates, ordered
    pub titles: Vec<String>,

    /// Thumbnail caption candidates, ordered
    pub thumbnails: Vec<ThumbnailText>,

    /// Topics, ordered
    pub topics: Vec<ChapterTopic>,
}

impl AnalysisResult {
    /// Resolve a raw response into the canonical shape: legacy `title`
    /// becomes a one-element `titles`, missing thumbnails get the placeholder
    /// set, missing topics become empty.
    pub fn from_raw(raw: RawAnalysisResponse) -> Self {
        let titles = match (raw.titles, raw.title) {
            (Some(titles), _) if !titles.is_empty() => titles,
            (_, Some(title)) => vec![title],
            _ => vec![PLACEHOLDER_TITLE.to_string()],
        };

        AnalysisResult {
            titles,
            thumbnails: raw.thumbnails.unwrap_or_else(default_thumbnails),
            topics: raw.topics.unwrap_or_default(),
        }
    }
}

/// Result of analyzing a split recording: one analysis per half, with the
/// second half's timestamps already offset back by the split boundary.
#[derive(Debug, Clone, Serialize)]
pub struct SplitAnalysis {
    /// First-half analysis
    pub part1: AnalysisResult,

    /// Second-half analysis, timestamps relative to the split point
    pub part2: AnalysisResult,
}
