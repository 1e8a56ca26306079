use async_trait::async_trait;

use crate::images::services::ImageUpload;

pub mod mock;

/// Nutrition estimate for one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
    pub confidence: u8,
}

impl AnalysisResult {
    /// Rejects results that must not become a meal record.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "estimator returned an empty name");
        anyhow::ensure!(
            self.confidence <= 100,
            "confidence {} out of range",
            self.confidence
        );
        Ok(())
    }
}

/// Turns an uploaded image into a nutrition estimate.
///
/// Each call resolves once, with either a result or an error, and must not
/// touch caller state.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn analyze(&self, image: &ImageUpload) -> anyhow::Result<AnalysisResult>;
}
