use serde::Serialize;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::features::{extract_text_features, TextFeatures};
use crate::scoring::{HeavyRanker, ScoreBreakdown};
use crate::stages::{
    CandidateSource, CandidateSourcer, FilterRule, FilterStatus, PreScoringFilter, RankTier,
    ScoringStatus, SourcingStatus, StageResult, Visibility, VisibilityFilter,
};
use crate::{stable_hash64, EngagementCounts, PostCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Sourcing,
    Filtering,
    Scoring,
    Visibility,
    Done,
    Dropped,
}

impl PipelineState {
    pub fn label(self) -> &'static str {
        match self {
            PipelineState::Sourcing => "SOURCING",
            PipelineState::Filtering => "FILTERING",
            PipelineState::Scoring => "SCORING",
            PipelineState::Visibility => "VISIBILITY",
            PipelineState::Done => "DONE",
            PipelineState::Dropped => "DROPPED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Dropped)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub post_id: String,
    pub features: TextFeatures,
    pub path: Vec<PipelineState>,
    pub sourcing: StageResult<SourcingStatus, CandidateSource>,
    pub filtering: StageResult<FilterStatus, Option<FilterRule>>,
    pub scoring: Option<StageResult<ScoringStatus, ScoreBreakdown>>,
    pub visibility: Option<StageResult<Visibility, RankTier>>,
}

impl PipelineReport {
    pub fn final_state(&self) -> PipelineState {
        self.path.last().copied().unwrap_or(PipelineState::Sourcing)
    }

    pub fn is_dropped(&self) -> bool {
        self.final_state() == PipelineState::Dropped
    }

    pub fn final_score(&self) -> Option<f64> {
        self.scoring.as_ref().map(|stage| stage.payload.final_score)
    }

    pub fn tier(&self) -> Option<RankTier> {
        self.visibility.as_ref().map(|stage| stage.payload)
    }
}

/// The four-stage feed pipeline. Built once from configuration and reused
/// for every run; a run never mutates it.
#[derive(Debug, Clone)]
pub struct FeedPipeline {
    sourcer: CandidateSourcer,
    filter: PreScoringFilter,
    ranker: HeavyRanker,
    visibility: VisibilityFilter,
}

impl FeedPipeline {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            sourcer: CandidateSourcer::new(config.sourcing.clone()),
            filter: PreScoringFilter::new(config.filtering.clone()),
            ranker: HeavyRanker::new(config.weights.clone(), &config.modifiers),
            visibility: VisibilityFilter::new(config.visibility.clone()),
        }
    }

    pub fn run(&self, post: &PostCandidate, engagement: &EngagementCounts) -> Result<PipelineReport> {
        if post.text.trim().is_empty() {
            return Err(SimError::MissingText);
        }

        let post_id = derive_post_id(post);
        let features = extract_text_features(&post.text);
        let mut path = vec![PipelineState::Sourcing];

        let sourcing = self.sourcer.source(post);
        advance(&post_id, &mut path, PipelineState::Filtering);

        let filtering = self.filter.filter(post, &features);
        if filtering.status == FilterStatus::Dropped {
            advance(&post_id, &mut path, PipelineState::Dropped);
            info!(post_id = %post_id, rule = ?filtering.payload, "post dropped before scoring");
            return Ok(PipelineReport {
                post_id,
                features,
                path,
                sourcing,
                filtering,
                scoring: None,
                visibility: None,
            });
        }
        advance(&post_id, &mut path, PipelineState::Scoring);

        let scoring = self.ranker.score(post, &features, engagement);
        advance(&post_id, &mut path, PipelineState::Visibility);

        let visibility = self.visibility.classify(scoring.payload.final_score);
        advance(&post_id, &mut path, PipelineState::Done);

        info!(
            post_id = %post_id,
            final_score = scoring.payload.final_score,
            visibility = visibility.status.label(),
            tier = visibility.payload.label(),
            "pipeline run complete"
        );

        Ok(PipelineReport {
            post_id,
            features,
            path,
            sourcing,
            filtering,
            scoring: Some(scoring),
            visibility: Some(visibility),
        })
    }
}

fn advance(post_id: &str, path: &mut Vec<PipelineState>, next: PipelineState) {
    debug!(post_id, from = ?path.last(), to = ?next, "pipeline transition");
    path.push(next);
}

fn derive_post_id(post: &PostCandidate) -> String {
    let payload = format!(
        "{}:{}:{}:{}",
        post.text, post.has_media, post.is_premium, post.follower_count
    );
    format!("post_{:x}", stable_hash64(&payload))
}
