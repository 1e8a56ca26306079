use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::meals::repo_types::{ConfidenceBand, MealId, MealRecord};
use crate::nutrition::{DailyTotals, DayGroup};
use crate::storage::StorageClient;

/// A meal as shown to the client.
#[derive(Debug, Serialize)]
pub struct MealView {
    pub id: MealId,
    pub image_url: String,
    pub name: String,
    pub time: String,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
    pub confidence: u8,
    pub confidence_band: ConfidenceBand,
}

impl MealView {
    pub fn new(meal: MealRecord, storage: &dyn StorageClient) -> Self {
        Self {
            id: meal.id,
            image_url: storage.url_for(&meal.image_ref),
            confidence_band: meal.confidence_band(),
            name: meal.name,
            time: meal.time,
            logged_at: meal.logged_at,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fats: meal.fats,
            confidence: meal.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub count: usize,
    pub meals: Vec<MealView>,
}

#[derive(Debug, Serialize)]
pub struct DayGroupView {
    pub date: String,
    pub totals: DailyTotals,
    pub meals: Vec<MealView>,
}

impl DayGroupView {
    pub fn new(group: DayGroup, storage: &dyn StorageClient) -> Self {
        Self {
            date: group.date.to_string(),
            totals: group.totals,
            meals: group
                .meals
                .into_iter()
                .map(|m| MealView::new(m, storage))
                .collect(),
        }
    }
}

/// JSON upload; `image` may be a byte array or anything serde_bytes accepts.
#[derive(Debug, Deserialize)]
pub struct CreateMealBytesRequest {
    pub image: serde_bytes::ByteBuf,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}
fn default_content_type() -> String { "image/jpeg".into() }

/// Edit form payload. Fields stay raw JSON so bad input can be coerced
/// instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PutMealRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub calories: Option<Value>,
    #[serde(default)]
    pub protein: Option<Value>,
    #[serde(default)]
    pub carbs: Option<Value>,
    #[serde(default)]
    pub fats: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchQuery {
    /// Case-insensitive substring match on the meal name.
    pub fn matches(&self, meal: &MealRecord) -> bool {
        match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => meal.name.to_lowercase().contains(&q.to_lowercase()),
        }
    }
}
