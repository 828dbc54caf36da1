use serde::{Deserialize, Serialize};

use crate::stages::StageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub limited_below: f64,
    pub high_above: f64,
    pub mid_above: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            limited_below: 10.0,
            high_above: 100.0,
            mid_above: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Show,
    Limited,
}

impl Visibility {
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Show => "SHOW",
            Visibility::Limited => "LIMITED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    High,
    Mid,
    Low,
}

impl RankTier {
    pub fn label(self) -> &'static str {
        match self {
            RankTier::High => "ranked high",
            RankTier::Mid => "ranked mid",
            RankTier::Low => "ranked low",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            RankTier::High => "likely near the top of recommended feeds",
            RankTier::Mid => "reliably reaches followers' timelines",
            RankTier::Low => "low priority; replies would lift it the most",
        }
    }
}

/// Stage 4: visibility filtering and presentation tier.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    config: VisibilityConfig,
}

impl VisibilityFilter {
    pub fn new(config: VisibilityConfig) -> Self {
        Self { config }
    }

    pub fn tier(&self, final_score: f64) -> RankTier {
        if final_score > self.config.high_above {
            RankTier::High
        } else if final_score > self.config.mid_above {
            RankTier::Mid
        } else {
            RankTier::Low
        }
    }

    pub fn classify(&self, final_score: f64) -> StageResult<Visibility, RankTier> {
        let tier = self.tier(final_score);
        let (status, first) = if final_score < self.config.limited_below {
            (
                Visibility::Limited,
                "Low score: delivery may be thinned out.".to_string(),
            )
        } else {
            (
                Visibility::Show,
                "High visibility: strong candidate for recommended feeds.".to_string(),
            )
        };
        let log = vec![first, format!("{}: {}.", tier.label(), tier.describe())];
        StageResult::new(status, log, tier)
    }
}
