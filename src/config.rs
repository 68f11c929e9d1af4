use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub vision: VisionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://nutrition_log.db?mode=rwc".into());
        let vision = VisionConfig {
            api_key: std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY is not set; the vision estimator cannot run without it")?,
            base_url: std::env::var("VISION_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("VISION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };
        Ok(Self {
            database_url,
            vision,
        })
    }
}
