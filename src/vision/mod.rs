mod client;
mod estimate;

pub use client::OpenAiVision;
pub use estimate::{parse_estimate, NutritionEstimate};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AppError;

/// The external meal-recognition collaborator. Production talks to an
/// OpenAI-compatible endpoint; tests substitute scripted doubles.
#[async_trait]
pub trait VisionEstimator: Send + Sync {
    async fn estimate(
        &self,
        image: Bytes,
        user_label: Option<&str>,
    ) -> Result<NutritionEstimate, AppError>;
}
