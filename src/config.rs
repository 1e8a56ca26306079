use std::time::Duration;

use crate::nutrition::DailyGoals;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub timeout_secs: u64,
    pub mock_delay_ms: u64,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub analysis: AnalysisConfig,
    pub goals: DailyGoals,
    pub max_upload_bytes: usize,
    pub utc_offset_minutes: i32,
    pub seed_sample_meal: bool,
    pub notification_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            analysis: AnalysisConfig {
                timeout_secs: 10,
                mock_delay_ms: 2000,
            },
            goals: DailyGoals::default(),
            max_upload_bytes: 20 * 1024 * 1024, // 20MB
            utc_offset_minutes: 0,
            seed_sample_meal: true,
            notification_capacity: 50,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let goals = DailyGoals {
            calories: env_or("GOAL_CALORIES", defaults.goals.calories),
            protein: env_or("GOAL_PROTEIN", defaults.goals.protein),
            carbs: env_or("GOAL_CARBS", defaults.goals.carbs),
            fats: env_or("GOAL_FATS", defaults.goals.fats),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port: env_or("APP_PORT", defaults.port),
            analysis: AnalysisConfig {
                timeout_secs: env_or("ANALYSIS_TIMEOUT_SECS", defaults.analysis.timeout_secs),
                mock_delay_ms: env_or("MOCK_ANALYSIS_DELAY_MS", defaults.analysis.mock_delay_ms),
            },
            goals,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            utc_offset_minutes: env_or("UTC_OFFSET_MINUTES", defaults.utc_offset_minutes),
            seed_sample_meal: env_or("SEED_SAMPLE_MEAL", defaults.seed_sample_meal),
            notification_capacity: env_or(
                "NOTIFICATION_CAPACITY",
                defaults.notification_capacity,
            ),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
