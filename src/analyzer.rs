use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::classifier::{
    best_target_match, ImageClassifier, PromptScores, SafetyPrompts, SafetyVerdict, TargetMatch,
};
use crate::config::SimConfig;
use crate::error::{ClassifierError, Result, SimError};
use crate::features::{extract_text_features, TextFeatures};
use crate::scoring::WeightTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub base_score: f64,
    pub question_bonus: f64,
    pub hashtag_bonus: f64,
    pub max_bonus_hashtags: usize,
    pub spam_hashtags: usize,
    pub hashtag_spam_penalty: f64,
    /// Points per unit of the link weight.
    pub link_scale: f64,
    pub sweet_spot_min_chars: usize,
    pub sweet_spot_max_chars: usize,
    pub sweet_spot_bonus: f64,
    pub short_text_chars: usize,
    pub short_text_penalty: f64,
    pub max_mentions: usize,
    pub mention_penalty: f64,
    pub media_bonus: f64,
    pub target_threshold: f64,
    pub target_bonus: f64,
    pub target_penalty: f64,
    pub background_prompt: String,
    pub safety: SafetyPrompts,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            question_bonus: 10.0,
            hashtag_bonus: 5.0,
            max_bonus_hashtags: 3,
            spam_hashtags: 5,
            hashtag_spam_penalty: -15.0,
            link_scale: 10.0,
            sweet_spot_min_chars: 50,
            sweet_spot_max_chars: 140,
            sweet_spot_bonus: 5.0,
            short_text_chars: 5,
            short_text_penalty: -10.0,
            max_mentions: 3,
            mention_penalty: -5.0,
            media_bonus: 10.0,
            target_threshold: 0.2,
            target_bonus: 15.0,
            target_penalty: -5.0,
            background_prompt: "something else".to_string(),
            safety: SafetyPrompts::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViralityTier {
    Restricted,
    Low,
    Moderate,
    High,
    Breakout,
}

impl ViralityTier {
    pub fn label(self) -> &'static str {
        match self {
            ViralityTier::Restricted => "Restricted",
            ViralityTier::Low => "Low",
            ViralityTier::Moderate => "Moderate",
            ViralityTier::High => "High",
            ViralityTier::Breakout => "Breakout",
        }
    }
}

fn tier_from_score(score: f64) -> ViralityTier {
    if score < 40.0 {
        ViralityTier::Low
    } else if score < 60.0 {
        ViralityTier::Moderate
    } else if score < 80.0 {
        ViralityTier::High
    } else {
        ViralityTier::Breakout
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub text: String,
    pub image: Option<Vec<u8>>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub label: String,
    pub points: f64,
}

impl ScoreAdjustment {
    fn new(label: impl Into<String>, points: f64) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageAnalysis {
    NotProvided,
    Skipped {
        reason: String,
    },
    Analyzed {
        safety: SafetyVerdict,
        target: Option<TargetMatch>,
    },
}

impl ImageAnalysis {
    pub fn is_unsafe(&self) -> bool {
        matches!(self, ImageAnalysis::Analyzed { safety, .. } if safety.is_unsafe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub score: f64,
    pub tier: ViralityTier,
    pub features: TextFeatures,
    pub adjustments: Vec<ScoreAdjustment>,
    pub image: ImageAnalysis,
}

/// Text heuristics plus zero-shot image checks, folded into a 0-100 score.
#[derive(Clone)]
pub struct PostAnalyzer {
    config: AnalyzerConfig,
    weights: WeightTable,
    classifier: Option<Arc<dyn ImageClassifier>>,
    timeout: Duration,
}

impl PostAnalyzer {
    pub fn new(config: &SimConfig, classifier: Option<Arc<dyn ImageClassifier>>) -> Self {
        Self {
            config: config.analyzer.clone(),
            weights: config.weights.clone(),
            classifier,
            timeout: Duration::from_millis(config.classifier.timeout_ms),
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        if request.text.trim().is_empty() && request.image.is_none() {
            return Err(SimError::MissingInput);
        }

        let features = extract_text_features(&request.text);
        let mut adjustments = text_adjustments(&self.config, &self.weights, &features);

        let image = match (&request.image, &self.classifier) {
            (None, _) => ImageAnalysis::NotProvided,
            (Some(_), None) => ImageAnalysis::Skipped {
                reason: "no image classifier configured".to_string(),
            },
            (Some(bytes), Some(classifier)) => {
                match self.classify_image(classifier.as_ref(), bytes, &request.targets).await {
                    Ok(analysis) => analysis,
                    Err(err) => {
                        warn!(error = %err, "image analysis skipped");
                        ImageAnalysis::Skipped {
                            reason: err.to_string(),
                        }
                    }
                }
            }
        };

        let (score, tier) = if image.is_unsafe() {
            adjustments.clear();
            adjustments.push(ScoreAdjustment::new(
                "Unsafe image: visibility filtered",
                -self.config.base_score,
            ));
            (0.0, ViralityTier::Restricted)
        } else {
            adjustments.extend(self.image_adjustments(&image));
            let total = adjustments
                .iter()
                .fold(self.config.base_score, |score, adjustment| score + adjustment.points);
            let score = total.clamp(0.0, 100.0);
            (score, tier_from_score(score))
        };

        info!(score, tier = tier.label(), "post analysis complete");

        Ok(AnalysisReport {
            score,
            tier,
            features,
            adjustments,
            image,
        })
    }

    async fn classify_image(
        &self,
        classifier: &dyn ImageClassifier,
        image: &[u8],
        targets: &[String],
    ) -> std::result::Result<ImageAnalysis, ClassifierError> {
        let safety_prompts = self.config.safety.prompt_list();
        let scores = self.timed(classifier.classify(image, &safety_prompts)).await?;
        let safety = self.config.safety.verdict(&scores);
        if safety.is_unsafe || targets.is_empty() {
            return Ok(ImageAnalysis::Analyzed {
                safety,
                target: None,
            });
        }

        let mut target_prompts = targets.to_vec();
        target_prompts.push(self.config.background_prompt.clone());
        let scores = self.timed(classifier.classify(image, &target_prompts)).await?;
        let target = best_target_match(&scores, targets, self.config.target_threshold);

        Ok(ImageAnalysis::Analyzed { safety, target })
    }

    async fn timed<F>(&self, call: F) -> std::result::Result<PromptScores, ClassifierError>
    where
        F: Future<Output = std::result::Result<PromptScores, ClassifierError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout.as_millis() as u64))?
    }

    fn image_adjustments(&self, image: &ImageAnalysis) -> Vec<ScoreAdjustment> {
        let ImageAnalysis::Analyzed { target, .. } = image else {
            return Vec::new();
        };

        let mut adjustments = vec![ScoreAdjustment::new("Media attached", self.config.media_bonus)];
        match target {
            Some(found) if found.accepted => adjustments.push(ScoreAdjustment::new(
                format!(
                    "Image matches \"{}\" ({:.0}%)",
                    found.target,
                    found.probability * 100.0
                ),
                self.config.target_bonus,
            )),
            Some(found) => adjustments.push(ScoreAdjustment::new(
                format!(
                    "Image does not clearly show \"{}\" ({:.0}%)",
                    found.target,
                    found.probability * 100.0
                ),
                self.config.target_penalty,
            )),
            None => {}
        }
        adjustments
    }
}

/// Additive text heuristics. The link term is independent of the pipeline's
/// multiplicative link penalty.
pub fn text_adjustments(
    config: &AnalyzerConfig,
    weights: &WeightTable,
    features: &TextFeatures,
) -> Vec<ScoreAdjustment> {
    let mut adjustments = Vec::new();

    if features.has_question {
        adjustments.push(ScoreAdjustment::new("Conversation starter", config.question_bonus));
    }

    if features.hashtags > config.spam_hashtags {
        adjustments.push(ScoreAdjustment::new(
            format!("Hashtag spam ({} tags)", features.hashtags),
            config.hashtag_spam_penalty,
        ));
    } else if (1..=config.max_bonus_hashtags).contains(&features.hashtags) {
        adjustments.push(ScoreAdjustment::new("Focused hashtags", config.hashtag_bonus));
    }

    if features.has_link() {
        adjustments.push(ScoreAdjustment::new(
            "External link",
            weights.link * config.link_scale,
        ));
    }

    if (config.sweet_spot_min_chars..=config.sweet_spot_max_chars).contains(&features.char_count) {
        adjustments.push(ScoreAdjustment::new("Readable length", config.sweet_spot_bonus));
    } else if features.char_count > 0 && features.char_count < config.short_text_chars {
        adjustments.push(ScoreAdjustment::new("Very short text", config.short_text_penalty));
    }

    if features.mentions > config.max_mentions {
        adjustments.push(ScoreAdjustment::new(
            format!("Too many mentions ({})", features.mentions),
            config.mention_penalty,
        ));
    }

    adjustments
}
