pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod scoring;
pub mod stages;

use serde::{Deserialize, Serialize};

pub use analyzer::{AnalysisReport, AnalysisRequest, ImageAnalysis, PostAnalyzer, ViralityTier};
pub use config::SimConfig;
pub use error::{ClassifierError, Result, SimError};
pub use features::{extract_text_features, TextFeatures};
pub use pipeline::{FeedPipeline, PipelineReport, PipelineState};

/// A hypothetical post as it enters the feed pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCandidate {
    pub text: String,
    pub has_media: bool,
    pub is_premium: bool,
    pub follower_count: u64,
}

impl PostCandidate {
    pub fn new(text: impl Into<String>, has_media: bool, is_premium: bool, follower_count: u64) -> Self {
        Self {
            text: text.into(),
            has_media,
            is_premium,
            follower_count,
        }
    }
}

/// Engagement the user expects the post to receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub likes: u64,
    pub replies: u64,
    pub reposts: u64,
}

impl EngagementCounts {
    pub fn new(likes: u64, replies: u64, reposts: u64) -> Self {
        Self {
            likes,
            replies,
            reposts,
        }
    }
}

pub(crate) fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
