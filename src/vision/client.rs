//! OpenAI-compatible vision client. One blocking call per analyze
//! action; failures surface immediately with no automatic retry.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::VisionConfig;
use crate::error::AppError;

use super::estimate::parse_estimate;
use super::{NutritionEstimate, VisionEstimator};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;
/// Reply budget; the strict-JSON estimate fits well under this.
const MAX_COMPLETION_TOKENS: u32 = 350;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn prompt_for(user_label: Option<&str>) -> String {
    match user_label {
        Some(label) => format!(
            "You are a nutritionist. The user says the meal is '{label}'. \
             Confirm or correct that description, then estimate nutrition. \
             Respond ONLY as JSON with keys: meal_name (a short human-readable name), \
             calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g, serving."
        ),
        None => "Identify this meal and estimate its nutrition. \
                 Respond ONLY as JSON with keys: meal_name, calories, protein_g, \
                 carbs_g, fat_g, fiber_g, sugar_g, serving."
            .to_owned(),
    }
}

pub struct OpenAiVision {
    client: Client,
    config: VisionConfig,
}

impl OpenAiVision {
    pub fn new(config: VisionConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }
}

#[async_trait]
impl VisionEstimator for OpenAiVision {
    #[instrument(skip(self, image), fields(model = %self.config.model, image_len = image.len()))]
    async fn estimate(
        &self,
        image: Bytes,
        user_label: Option<&str>,
    ) -> Result<NutritionEstimate, AppError> {
        let data_uri = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&image)
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: vec![
                    ContentPart::Text {
                        text: prompt_for(user_label),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_uri },
                    },
                ],
            }],
            response_format: ResponseFormat {
                kind: "json_object".to_owned(),
            },
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "vision request failed to send");
                AppError::estimation(format!("vision request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::estimation(format!("failed to read vision response: {e}")))?;

        if !status.is_success() {
            error!(%status, body = %body.chars().take(200).collect::<String>(), "vision API error");
            return Err(AppError::estimation(format!(
                "vision API returned {status}"
            )));
        }

        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::estimation(format!("malformed vision response: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::estimation("vision API returned no content"))?;

        debug!(reply_len = content.len(), "vision reply received");
        parse_estimate(&content)
    }
}
