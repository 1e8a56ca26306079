use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::debug;

use super::{AnalysisGateway, AnalysisResult};
use crate::images::services::ImageUpload;

struct Canned {
    name: &'static str,
    calories: u32,
    protein: u32,
    carbs: u32,
    fats: u32,
    confidence: u8,
}

const CANNED: &[Canned] = &[
    Canned { name: "Caesar Salad with Grilled Chicken", calories: 420, protein: 28, carbs: 15, fats: 26, confidence: 92 },
    Canned { name: "Avocado Toast with Eggs", calories: 350, protein: 18, carbs: 28, fats: 20, confidence: 88 },
    Canned { name: "Protein Smoothie Bowl", calories: 380, protein: 25, carbs: 45, fats: 12, confidence: 85 },
    Canned { name: "Grilled Salmon with Vegetables", calories: 450, protein: 35, carbs: 12, fats: 28, confidence: 90 },
];

impl From<&Canned> for AnalysisResult {
    fn from(c: &Canned) -> Self {
        Self {
            name: c.name.to_string(),
            calories: c.calories,
            protein: c.protein,
            carbs: c.carbs,
            fats: c.fats,
            confidence: c.confidence,
        }
    }
}

/// Stand-in estimator: waits, then returns a random canned meal.
/// The image content is ignored.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AnalysisGateway for MockAnalyzer {
    async fn analyze(&self, image: &ImageUpload) -> anyhow::Result<AnalysisResult> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let picked = CANNED
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| anyhow::anyhow!("no canned results"))?;
        debug!(bytes = image.body.len(), meal = picked.name, "mock analysis done");
        Ok(picked.into())
    }
}
