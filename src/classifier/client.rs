use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classifier::{ImageClassifier, PromptScores};
use crate::config::ClassifierConfig;
use crate::error::ClassifierError;

/// Client for a zero-shot inference server exposing `POST /classify`.
#[derive(Clone)]
pub struct HttpClassifier {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    image_base64: String,
    prompts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    probabilities: Vec<f64>,
}

impl HttpClassifier {
    /// Returns `None` when no endpoint is configured.
    pub fn from_config(config: &ClassifierConfig) -> Result<Option<Self>, ClassifierError> {
        let Some(endpoint) = config.endpoint.as_ref().filter(|value| !value.trim().is_empty()) else {
            return Ok(None);
        };
        let timeout = Duration::from_millis(config.timeout_ms);
        HttpClassifier::new(endpoint.clone(), timeout).map(Some)
    }

    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ClassifierError::Unavailable(format!("failed to build classifier client: {}", err))
            })?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl ImageClassifier for HttpClassifier {
    async fn classify(&self, image: &[u8], prompts: &[String]) -> Result<PromptScores, ClassifierError> {
        let url = format!("{}/classify", self.endpoint.trim_end_matches('/'));
        let request = ClassifyRequest {
            image_base64: STANDARD.encode(image),
            prompts,
        };

        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim();
            if detail.is_empty() {
                return Err(ClassifierError::Unavailable(format!("classifier error {}", status)));
            }
            return Err(ClassifierError::Unavailable(format!(
                "classifier error {}: {}",
                status, detail
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|err| ClassifierError::Malformed(format!("response parse failed: {}", err)))?;

        PromptScores::from_distribution(prompts, body.probabilities)
    }
}
