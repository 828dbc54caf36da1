use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://").expect("invalid url regex"));
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("invalid hashtag regex"));
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("invalid mention regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextFeatures {
    pub char_count: usize,
    pub urls: usize,
    pub hashtags: usize,
    pub mentions: usize,
    pub has_question: bool,
}

impl TextFeatures {
    pub fn has_link(&self) -> bool {
        self.urls > 0
    }
}

/// Counts the surface features the pipeline and the analyzer react to.
///
/// Length is measured in Unicode scalar values so that CJK posts are not
/// penalised for their UTF-8 width. Both the ASCII and the full-width
/// question mark count as a question.
pub fn extract_text_features(text: &str) -> TextFeatures {
    TextFeatures {
        char_count: text.chars().count(),
        urls: URL_RE.find_iter(text).count(),
        hashtags: HASHTAG_RE.find_iter(text).count(),
        mentions: MENTION_RE.find_iter(text).count(),
        has_question: text.contains('?') || text.contains('？'),
    }
}
