use serde::Serialize;

use crate::features::TextFeatures;
use crate::scoring::{
    base_potential, potential_modifiers, AppliedModifier, EngagementBreakdown, ModifierConfig,
    PotentialModifier, WeightTable, WeightedScorer,
};
use crate::stages::{ScoringStatus, StageResult};
use crate::{format_float, EngagementCounts, PostCandidate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base_potential: f64,
    pub modifiers: Vec<AppliedModifier>,
    pub engagement: EngagementBreakdown,
    pub engagement_score: f64,
    pub final_score: f64,
}

/// Stage 3: predicted-engagement scoring.
#[derive(Debug, Clone)]
pub struct HeavyRanker {
    weighted_scorer: WeightedScorer,
    modifiers: Vec<PotentialModifier>,
}

impl HeavyRanker {
    pub fn new(weights: WeightTable, config: &ModifierConfig) -> Self {
        let modifiers = potential_modifiers(&weights, config);
        Self {
            weighted_scorer: WeightedScorer::new(weights),
            modifiers,
        }
    }

    pub fn score(
        &self,
        post: &PostCandidate,
        features: &TextFeatures,
        engagement: &EngagementCounts,
    ) -> StageResult<ScoringStatus, ScoreBreakdown> {
        let mut log = Vec::new();
        for modifier in &self.modifiers {
            if modifier.applies(post, features) {
                log.push(modifier.describe());
            }
        }

        let (potential, applied) = base_potential(&self.modifiers, post, features);
        let engagement = self.weighted_scorer.score(engagement);
        let engagement_score = engagement.total();
        let final_score = engagement_score * potential;

        log.push(format!("Base potential: x{}", format_float(potential, 2)));
        log.push(format!(
            "Like score {} | reply score {} | repost score {}",
            format_float(engagement.like, 1),
            format_float(engagement.reply, 1),
            format_float(engagement.repost, 1)
        ));

        StageResult::new(
            ScoringStatus::Scored,
            log,
            ScoreBreakdown {
                base_potential: potential,
                modifiers: applied,
                engagement,
                engagement_score,
                final_score,
            },
        )
    }
}
