use serde::{Deserialize, Serialize};

use crate::stages::StageResult;
use crate::PostCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcingConfig {
    /// Follower count a non-premium author must exceed to be retrieved
    /// out-of-network.
    pub global_follower_threshold: u64,
}

impl Default for SourcingConfig {
    fn default() -> Self {
        Self {
            global_follower_threshold: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourcingStatus {
    Passed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Global,
    LocalOnly,
}

impl CandidateSource {
    pub fn label(self) -> &'static str {
        match self {
            CandidateSource::Global => "Global candidate (out-of-network retrieval)",
            CandidateSource::LocalOnly => "In-network only",
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, CandidateSource::Global)
    }
}

/// Stage 1: decides whether the post may be retrieved outside the author's
/// follower graph.
#[derive(Debug, Clone)]
pub struct CandidateSourcer {
    config: SourcingConfig,
}

impl CandidateSourcer {
    pub fn new(config: SourcingConfig) -> Self {
        Self { config }
    }

    pub fn source(&self, post: &PostCandidate) -> StageResult<SourcingStatus, CandidateSource> {
        let global =
            post.is_premium || post.follower_count > self.config.global_follower_threshold;

        if global {
            StageResult::new(
                SourcingStatus::Passed,
                vec!["Out-of-network retrieval: eligible for recommendation surfaces.".to_string()],
                CandidateSource::Global,
            )
        } else {
            StageResult::new(
                SourcingStatus::Passed,
                vec![format!(
                    "In-network only: {} followers and no premium badge; shown mainly to followers.",
                    post.follower_count
                )],
                CandidateSource::LocalOnly,
            )
        }
    }
}
