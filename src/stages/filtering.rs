use serde::{Deserialize, Serialize};

use crate::features::TextFeatures;
use crate::stages::StageResult;
use crate::PostCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub banned_keywords: Vec<String>,
    pub max_hashtags: usize,
    pub min_text_chars: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            banned_keywords: vec![
                "giveaway".to_string(),
                "dm me".to_string(),
                "稼げる".to_string(),
                "無料配布".to_string(),
            ],
            max_hashtags: 5,
            min_text_chars: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterStatus {
    Passed,
    Warning,
    Dropped,
}

impl FilterStatus {
    pub fn label(self) -> &'static str {
        match self {
            FilterStatus::Passed => "PASSED",
            FilterStatus::Warning => "WARNING",
            FilterStatus::Dropped => "DROPPED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRule {
    MutedKeyword,
    HashtagSpam,
    LowQuality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Warn(String),
    Drop(String),
}

type GuardCheck = fn(&FilterConfig, &PostCandidate, &TextFeatures) -> GuardDecision;

#[derive(Clone, Copy)]
pub struct FilterGuard {
    pub rule: FilterRule,
    check: GuardCheck,
}

impl std::fmt::Debug for FilterGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterGuard").field("rule", &self.rule).finish()
    }
}

impl FilterGuard {
    pub fn evaluate(
        &self,
        config: &FilterConfig,
        post: &PostCandidate,
        features: &TextFeatures,
    ) -> GuardDecision {
        (self.check)(config, post, features)
    }
}

fn muted_keyword(config: &FilterConfig, post: &PostCandidate, _: &TextFeatures) -> GuardDecision {
    let lowercase = post.text.to_lowercase();
    match config
        .banned_keywords
        .iter()
        .find(|word| lowercase.contains(&word.to_lowercase()))
    {
        Some(word) => GuardDecision::Drop(format!(
            "Muted keyword: contains \"{}\"; filtered as spam.",
            word
        )),
        None => GuardDecision::Continue,
    }
}

fn hashtag_spam(config: &FilterConfig, _: &PostCandidate, features: &TextFeatures) -> GuardDecision {
    if features.hashtags > config.max_hashtags {
        GuardDecision::Drop(format!(
            "Spam filter: too many hashtags ({}).",
            features.hashtags
        ))
    } else {
        GuardDecision::Continue
    }
}

fn low_quality(config: &FilterConfig, post: &PostCandidate, features: &TextFeatures) -> GuardDecision {
    if features.char_count < config.min_text_chars && !post.has_media {
        GuardDecision::Warn(
            "Low quality: text is very short and has no media; it may be treated as noise."
                .to_string(),
        )
    } else {
        GuardDecision::Continue
    }
}

/// Guards in priority order.
pub fn default_guards() -> Vec<FilterGuard> {
    vec![
        FilterGuard {
            rule: FilterRule::MutedKeyword,
            check: muted_keyword,
        },
        FilterGuard {
            rule: FilterRule::HashtagSpam,
            check: hashtag_spam,
        },
        FilterGuard {
            rule: FilterRule::LowQuality,
            check: low_quality,
        },
    ]
}

/// Stage 2: pre-scoring filtering. The payload is the rule that decided the
/// status, if any.
#[derive(Debug, Clone)]
pub struct PreScoringFilter {
    config: FilterConfig,
    guards: Vec<FilterGuard>,
}

impl PreScoringFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            guards: default_guards(),
        }
    }

    pub fn filter(
        &self,
        post: &PostCandidate,
        features: &TextFeatures,
    ) -> StageResult<FilterStatus, Option<FilterRule>> {
        let mut log = Vec::new();
        let mut warned = None;

        for guard in &self.guards {
            match guard.evaluate(&self.config, post, features) {
                GuardDecision::Continue => {}
                GuardDecision::Warn(message) => {
                    log.push(message);
                    warned.get_or_insert(guard.rule);
                }
                GuardDecision::Drop(message) => {
                    log.push(message);
                    return StageResult::new(FilterStatus::Dropped, log, Some(guard.rule));
                }
            }
        }

        match warned {
            Some(rule) => StageResult::new(FilterStatus::Warning, log, Some(rule)),
            None => {
                log.push("Filtering passed: no spam signals found.".to_string());
                StageResult::new(FilterStatus::Passed, log, None)
            }
        }
    }
}
