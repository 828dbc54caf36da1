use serde::{Deserialize, Serialize};

use crate::features::TextFeatures;
use crate::scoring::WeightTable;
use crate::PostCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    pub link_factor: f64,
    pub question_factor: f64,
    pub longform_factor: f64,
    pub longform_min_chars: usize,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            link_factor: 0.5,
            question_factor: 1.2,
            longform_factor: 1.1,
            longform_min_chars: 140,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    MediaBoost,
    LinkPenalty,
    ConversationStarter,
    LongformBoost,
}

impl ModifierKind {
    pub fn label(self) -> &'static str {
        match self {
            ModifierKind::MediaBoost => "Media Boost",
            ModifierKind::LinkPenalty => "Link Penalty",
            ModifierKind::ConversationStarter => "Conversation Starter",
            ModifierKind::LongformBoost => "Longform Boost",
        }
    }

    fn explanation(self) -> &'static str {
        match self {
            ModifierKind::MediaBoost => "image or video attached",
            ModifierKind::LinkPenalty => {
                "external link in the body; impressions may be throttled"
            }
            ModifierKind::ConversationStarter => {
                "question detected; predicted reply rate goes up"
            }
            ModifierKind::LongformBoost => "long premium post; dwell time expected to rise",
        }
    }
}

/// A single named multiplier on the post's base potential.
#[derive(Debug, Clone, Copy)]
pub struct PotentialModifier {
    pub kind: ModifierKind,
    pub factor: f64,
    min_chars: usize,
}

impl PotentialModifier {
    pub fn applies(&self, post: &PostCandidate, features: &TextFeatures) -> bool {
        match self.kind {
            ModifierKind::MediaBoost => post.has_media,
            ModifierKind::LinkPenalty => features.has_link(),
            ModifierKind::ConversationStarter => features.has_question,
            ModifierKind::LongformBoost => {
                post.is_premium && features.char_count > self.min_chars
            }
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{}: {} (x{})",
            self.kind.label(),
            self.kind.explanation(),
            self.factor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifier {
    pub kind: ModifierKind,
    pub factor: f64,
}

/// Ordered modifier list. Each entry is guarded independently and can fire
/// at most once per post.
pub fn potential_modifiers(weights: &WeightTable, config: &ModifierConfig) -> Vec<PotentialModifier> {
    let modifier = |kind, factor| PotentialModifier {
        kind,
        factor,
        min_chars: config.longform_min_chars,
    };
    vec![
        modifier(ModifierKind::MediaBoost, weights.image),
        modifier(ModifierKind::LinkPenalty, config.link_factor),
        modifier(ModifierKind::ConversationStarter, config.question_factor),
        modifier(ModifierKind::LongformBoost, config.longform_factor),
    ]
}

pub fn base_potential(
    modifiers: &[PotentialModifier],
    post: &PostCandidate,
    features: &TextFeatures,
) -> (f64, Vec<AppliedModifier>) {
    modifiers
        .iter()
        .filter(|modifier| modifier.applies(post, features))
        .fold((1.0, Vec::new()), |(potential, mut applied), modifier| {
            applied.push(AppliedModifier {
                kind: modifier.kind,
                factor: modifier.factor,
            });
            (potential * modifier.factor, applied)
        })
}
