use serde::{Deserialize, Serialize};

use crate::EngagementCounts;

/// Per-action weights of the heavy ranker plus the content-feature constants
/// shared by the pipeline and the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub like: f64,
    pub reply: f64,
    pub repost: f64,
    pub image: f64,
    pub video: f64,
    pub link: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            like: 0.5,
            reply: 13.5,
            repost: 1.0,
            image: 2.0,
            video: 2.0,
            link: -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementBreakdown {
    pub like: f64,
    pub reply: f64,
    pub repost: f64,
}

impl EngagementBreakdown {
    pub fn total(&self) -> f64 {
        self.like + self.reply + self.repost
    }
}

#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: WeightTable,
}

impl WeightedScorer {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn score(&self, engagement: &EngagementCounts) -> EngagementBreakdown {
        EngagementBreakdown {
            like: engagement.likes as f64 * self.weights.like,
            reply: engagement.replies as f64 * self.weights.reply,
            repost: engagement.reposts as f64 * self.weights.repost,
        }
    }
}
