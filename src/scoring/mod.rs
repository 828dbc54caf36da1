pub mod modifiers;
pub mod ranker;
pub mod weighted;

pub use modifiers::{
    base_potential, potential_modifiers, AppliedModifier, ModifierConfig, ModifierKind,
    PotentialModifier,
};
pub use ranker::{HeavyRanker, ScoreBreakdown};
pub use weighted::{EngagementBreakdown, WeightTable, WeightedScorer};
