pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

pub use client::HttpClassifier;

/// Zero-shot image-text similarity model.
///
/// Implementations return one probability per prompt, in prompt order.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8], prompts: &[String]) -> Result<PromptScores, ClassifierError>;
}

/// A probability distribution over an ordered prompt list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptScores {
    entries: Vec<(String, f64)>,
}

const SUM_TOLERANCE: f64 = 0.01;

impl PromptScores {
    /// Validates raw model output against the prompts it was asked about.
    pub fn from_distribution(prompts: &[String], probabilities: Vec<f64>) -> Result<Self, ClassifierError> {
        if prompts.len() != probabilities.len() {
            return Err(ClassifierError::Malformed(format!(
                "expected {} probabilities, got {}",
                prompts.len(),
                probabilities.len()
            )));
        }
        if let Some(value) = probabilities
            .iter()
            .find(|value| !value.is_finite() || **value < 0.0 || **value > 1.0)
        {
            return Err(ClassifierError::Malformed(format!(
                "probability out of range: {}",
                value
            )));
        }
        let sum: f64 = probabilities.iter().sum();
        if !prompts.is_empty() && (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ClassifierError::Malformed(format!(
                "probabilities sum to {:.3}",
                sum
            )));
        }

        Ok(Self {
            entries: prompts.iter().cloned().zip(probabilities).collect(),
        })
    }

    pub fn get(&self, prompt: &str) -> f64 {
        self.entries
            .iter()
            .find(|(label, _)| label == prompt)
            .map(|(_, probability)| *probability)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyPrompts {
    pub unsafe_prompts: Vec<String>,
    pub safe_prompt: String,
}

impl Default for SafetyPrompts {
    fn default() -> Self {
        Self {
            unsafe_prompts: vec!["nsfw".to_string(), "explicit".to_string()],
            safe_prompt: "safe".to_string(),
        }
    }
}

impl SafetyPrompts {
    pub fn prompt_list(&self) -> Vec<String> {
        let mut prompts = self.unsafe_prompts.clone();
        prompts.push(self.safe_prompt.clone());
        prompts
    }

    /// Unsafe when the unsafe labels together outweigh the safe label.
    pub fn verdict(&self, scores: &PromptScores) -> SafetyVerdict {
        let unsafe_probability: f64 = self
            .unsafe_prompts
            .iter()
            .map(|prompt| scores.get(prompt))
            .sum();
        let safe_probability = scores.get(&self.safe_prompt);
        SafetyVerdict {
            unsafe_probability,
            safe_probability,
            is_unsafe: unsafe_probability > safe_probability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyVerdict {
    pub unsafe_probability: f64,
    pub safe_probability: f64,
    pub is_unsafe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetMatch {
    pub target: String,
    pub probability: f64,
    pub accepted: bool,
}

/// Picks the caller target with the highest probability. Ties keep the
/// earlier target. Prompts that are not targets (the background prompt) are
/// never selected.
pub fn best_target_match(scores: &PromptScores, targets: &[String], threshold: f64) -> Option<TargetMatch> {
    targets
        .iter()
        .map(|target| (target, scores.get(target)))
        .fold(None, |best: Option<(&String, f64)>, (target, probability)| match best {
            Some((_, best_probability)) if best_probability >= probability => best,
            _ => Some((target, probability)),
        })
        .map(|(target, probability)| TargetMatch {
            target: target.clone(),
            probability,
            accepted: probability >= threshold,
        })
}

/// Splits a comma-separated keyword list, dropping blanks and keeping order.
pub fn parse_targets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect()
}
