use std::fmt;

use serde::Serialize;
use time::{macros::format_description, OffsetDateTime};
use uuid::Uuid;

use crate::analysis::AnalysisResult;

/// Opaque meal identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MealId(pub Uuid);

impl MealId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MealId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for MealId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// One logged meal.
///
/// `id`, `image_ref`, `time`, `logged_at` and `confidence` are fixed at
/// creation; `name` and the four nutrition fields are the editable part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealRecord {
    pub id: MealId,
    pub image_ref: String,
    pub name: String,
    pub time: String,
    pub logged_at: OffsetDateTime,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
    pub confidence: u8,
}

impl MealRecord {
    pub fn from_analysis(
        id: MealId,
        image_ref: String,
        result: AnalysisResult,
        logged_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            image_ref,
            name: result.name,
            time: display_time(logged_at),
            logged_at,
            calories: result.calories,
            protein: result.protein,
            carbs: result.carbs,
            fats: result.fats,
            confidence: result.confidence,
        }
    }

    /// Copy of `self` with the editable fields taken from `other`.
    pub fn with_fields_of(&self, other: &MealRecord) -> Self {
        Self {
            name: other.name.clone(),
            calories: other.calories,
            protein: other.protein,
            carbs: other.carbs,
            fats: other.fats,
            ..self.clone()
        }
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence)
    }
}

/// "hh:mm AM" rendering of a timestamp, in whatever offset it carries.
pub fn display_time(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour repr:12]:[minute] [period]"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::High,
            60..=79 => Self::Medium,
            _ => Self::Low,
        }
    }
}
