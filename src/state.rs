use std::sync::Arc;

use bytes::Bytes;
use time::{macros::time, UtcOffset};
use tracing::{info, warn};

use crate::analysis::mock::MockAnalyzer;
use crate::analysis::{AnalysisGateway, AnalysisResult};
use crate::config::AppConfig;
use crate::meals::repo_types::{MealId, MealRecord};
use crate::storage::{MemoryStorage, StorageClient};
use crate::tracker::MealTracker;

pub const IMAGES_URL_PREFIX: &str = "/api/v1/images";
pub const SAMPLE_IMAGE_REF: &str = "sample/hero-meal.svg";

// Stand-in artwork for the seeded meal so its image link resolves.
const SAMPLE_IMAGE_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="240" viewBox="0 0 320 240">"##,
    r##"<rect width="320" height="240" fill="#f4efe6"/>"##,
    r##"<circle cx="160" cy="120" r="80" fill="#ffffff" stroke="#d8cbb5" stroke-width="6"/>"##,
    r##"<circle cx="135" cy="105" r="22" fill="#e0a458"/>"##,
    r##"<circle cx="185" cy="110" r="20" fill="#8cb369"/>"##,
    r##"<circle cx="160" cy="148" r="24" fill="#f2d0a4"/>"##,
    "</svg>"
);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tracker: Arc<MealTracker>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let gateway =
            Arc::new(MockAnalyzer::new(config.analysis.mock_delay())) as Arc<dyn AnalysisGateway>;
        Self::from_parts(config, gateway)
    }

    pub fn from_parts(config: AppConfig, gateway: Arc<dyn AnalysisGateway>) -> anyhow::Result<Self> {
        let utc_offset = UtcOffset::from_whole_seconds(config.utc_offset_minutes.saturating_mul(60))
            .map_err(|e| anyhow::anyhow!("UTC_OFFSET_MINUTES out of range: {e}"))?;
        let mut storage = MemoryStorage::new(IMAGES_URL_PREFIX);
        if config.seed_sample_meal {
            storage = storage.with_object(
                SAMPLE_IMAGE_REF,
                Bytes::from_static(SAMPLE_IMAGE_SVG.as_bytes()),
                "image/svg+xml",
            );
        }
        let storage = Arc::new(storage) as Arc<dyn StorageClient>;

        let tracker = MealTracker::new(
            gateway,
            storage,
            config.analysis.timeout(),
            utc_offset,
            config.notification_capacity,
        );
        if config.seed_sample_meal {
            seed_sample_meal(&tracker);
        }

        Ok(Self {
            config: Arc::new(config),
            tracker: Arc::new(tracker),
        })
    }

    /// Instant mock analysis, empty log.
    pub fn fake() -> Self {
        let config = AppConfig {
            analysis: crate::config::AnalysisConfig {
                timeout_secs: 5,
                mock_delay_ms: 0,
            },
            seed_sample_meal: false,
            ..AppConfig::default()
        };
        let gateway = Arc::new(MockAnalyzer::new(config.analysis.mock_delay())) as Arc<dyn AnalysisGateway>;
        Self::from_parts(config, gateway).expect("default config is valid")
    }
}

fn seed_sample_meal(tracker: &MealTracker) {
    let logged_at = tracker.now().replace_time(time!(12:30));
    let sample = MealRecord::from_analysis(
        MealId::new(),
        SAMPLE_IMAGE_REF.to_string(),
        AnalysisResult {
            name: "Grilled Chicken Quinoa Bowl".into(),
            calories: 485,
            protein: 32,
            carbs: 48,
            fats: 14,
            confidence: 87,
        },
        logged_at,
    );
    match tracker.insert(sample) {
        Ok(()) => info!("seeded sample meal"),
        Err(e) => warn!(error = %e, "could not seed sample meal"),
    }
}
