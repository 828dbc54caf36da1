use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use feed_sim::classifier::parse_targets;
use serde::{Deserialize, Serialize};
use feed_sim::{
    AnalysisReport, AnalysisRequest, EngagementCounts, PipelineReport, PostCandidate, SimError,
};

#[derive(Debug, Deserialize)]
pub struct ApiPipelineRequest {
    pub text: Option<String>,
    pub has_media: Option<bool>,
    pub is_premium: Option<bool>,
    pub followers: Option<u64>,
    pub likes: Option<u64>,
    pub replies: Option<u64>,
    pub reposts: Option<u64>,
}

impl ApiPipelineRequest {
    pub fn into_input(self) -> Result<(PostCandidate, EngagementCounts), SimError> {
        let text = self.text.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(SimError::MissingText);
        }

        let post = PostCandidate::new(
            text,
            self.has_media.unwrap_or(true),
            self.is_premium.unwrap_or(false),
            self.followers.unwrap_or(500),
        );
        let engagement = EngagementCounts::new(
            self.likes.unwrap_or(10),
            self.replies.unwrap_or(0),
            self.reposts.unwrap_or(0),
        );
        Ok((post, engagement))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiPipelineResponse {
    pub final_state: String,
    pub source: String,
    pub filter_status: String,
    pub visibility: Option<String>,
    pub tier: Option<String>,
    pub final_score: Option<f64>,
    pub report: PipelineReport,
}

impl ApiPipelineResponse {
    pub fn from_report(report: PipelineReport) -> Self {
        Self {
            final_state: report.final_state().label().to_string(),
            source: report.sourcing.payload.label().to_string(),
            filter_status: report.filtering.status.label().to_string(),
            visibility: report
                .visibility
                .as_ref()
                .map(|stage| stage.status.label().to_string()),
            tier: report.tier().map(|tier| tier.label().to_string()),
            final_score: report.final_score(),
            report,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    pub text: Option<String>,
    pub image_base64: Option<String>,
    pub targets: Option<String>,
}

impl ApiAnalyzeRequest {
    pub fn into_request(self) -> Result<AnalysisRequest, SimError> {
        let image = match self.image_base64.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => Some(
                STANDARD
                    .decode(encoded)
                    .map_err(|err| SimError::InvalidInput(format!("invalid image encoding: {}", err)))?,
            ),
            _ => None,
        };

        Ok(AnalysisRequest {
            text: self.text.unwrap_or_default(),
            image,
            targets: self.targets.as_deref().map(parse_targets).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub score: f64,
    pub tier: String,
    pub report: AnalysisReport,
    pub warnings: Vec<String>,
}

impl ApiAnalyzeResponse {
    pub fn from_report(report: AnalysisReport, warnings: Vec<String>) -> Self {
        Self {
            score: report.score,
            tier: report.tier.label().to_string(),
            report,
            warnings,
        }
    }
}
