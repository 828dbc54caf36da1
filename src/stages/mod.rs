pub mod filtering;
pub mod sourcing;
pub mod visibility;

use serde::Serialize;

pub use filtering::{FilterConfig, FilterGuard, FilterRule, FilterStatus, GuardDecision, PreScoringFilter};
pub use sourcing::{CandidateSource, CandidateSourcer, SourcingConfig, SourcingStatus};
pub use visibility::{RankTier, Visibility, VisibilityConfig, VisibilityFilter};

/// Output of one pipeline stage: a status, the log lines shown to the user and
/// a stage-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult<S, P> {
    pub status: S,
    pub log: Vec<String>,
    pub payload: P,
}

impl<S, P> StageResult<S, P> {
    pub fn new(status: S, log: Vec<String>, payload: P) -> Self {
        Self {
            status,
            log,
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringStatus {
    Scored,
}
