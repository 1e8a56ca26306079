use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, error, info, instrument, warn};

use crate::analysis::{AnalysisGateway, AnalysisResult};
use crate::error::AppError;
use crate::images::services::{store_meal_image, ImageUpload};
use crate::meals::repo::MealStore;
use crate::meals::repo_types::{MealId, MealRecord};
use crate::notifications::{Notification, NotificationFeed, NotificationKind};
use crate::nutrition::{aggregate, group_by_day, DailyTotals, DayGroup};
use crate::storage::StorageClient;

/// Upload pipeline state. At most one analysis runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Analyzing,
}

/// The meal log together with its upload pipeline.
///
/// Every mutation goes through here: new meals only come out of a successful
/// analysis, and every outcome leaves a notification behind.
pub struct MealTracker {
    store: Mutex<MealStore>,
    state: Arc<Mutex<PipelineState>>,
    notifications: Mutex<NotificationFeed>,
    gateway: Arc<dyn AnalysisGateway>,
    storage: Arc<dyn StorageClient>,
    analysis_timeout: Duration,
    utc_offset: UtcOffset,
}

impl MealTracker {
    pub fn new(
        gateway: Arc<dyn AnalysisGateway>,
        storage: Arc<dyn StorageClient>,
        analysis_timeout: Duration,
        utc_offset: UtcOffset,
        notification_capacity: usize,
    ) -> Self {
        Self {
            store: Mutex::new(MealStore::new()),
            state: Arc::new(Mutex::new(PipelineState::Idle)),
            notifications: Mutex::new(NotificationFeed::with_capacity(notification_capacity)),
            gateway,
            storage,
            analysis_timeout,
            utc_offset,
        }
    }

    /// Analyse `image` and log the result as the newest meal.
    ///
    /// On any failure the log is left untouched and the pipeline is back to
    /// `Idle`. Dropping the returned future has the same effect.
    #[instrument(skip(self, image), fields(bytes = image.body.len(), content_type = %image.content_type))]
    pub async fn upload(&self, image: ImageUpload) -> Result<MealRecord, AppError> {
        image.validate()?;
        let _analyzing = self.begin_analysis()?;

        match self.analyze_and_log(&image).await {
            Ok(record) => {
                info!(meal_id = %record.id, name = %record.name, calories = record.calories, "meal logged");
                self.notify(Notification::new(
                    NotificationKind::Success,
                    "Meal analyzed!",
                    format!("Found {} with {} calories", record.name, record.calories),
                ));
                Ok(record)
            }
            Err(e) => {
                error!(error = %e, "upload failed");
                let reason = match &e {
                    AppError::AnalysisFailed(reason) => reason.clone(),
                    AppError::Internal(inner) => format!("{inner:#}"),
                    other => other.to_string(),
                };
                self.notify(Notification::new(NotificationKind::Error, "Analysis failed", reason));
                Err(e)
            }
        }
    }

    // Nothing is logged unless every step succeeds.
    async fn analyze_and_log(&self, image: &ImageUpload) -> Result<MealRecord, AppError> {
        let result = self.run_gateway(image).await.map_err(AppError::AnalysisFailed)?;

        let id = MealId::new();
        let image_ref = store_meal_image(self.storage.as_ref(), id, image).await?;
        let record = MealRecord::from_analysis(id, image_ref, result, self.now());

        let added = lock(&self.store).add(record.clone());
        if let Err(e) = added {
            warn!(error = %e, meal_id = %id, "discarding analysed meal");
            self.discard_image(&record.image_ref).await;
            return Err(e);
        }
        Ok(record)
    }

    async fn run_gateway(&self, image: &ImageUpload) -> Result<AnalysisResult, String> {
        let result = tokio::time::timeout(self.analysis_timeout, self.gateway.analyze(image))
            .await
            .map_err(|_| format!("no result within {}s", self.analysis_timeout.as_secs_f32()))?
            .map_err(|e| format!("{e:#}"))?;
        result.validate().map_err(|e| e.to_string())?;
        Ok(result)
    }

    /// Apply an edit built by the caller. Unknown ids are reported and
    /// never create a meal.
    #[instrument(skip(self, record), fields(meal_id = %record.id))]
    pub fn update_meal(&self, record: &MealRecord) -> Result<MealRecord, AppError> {
        let outcome = lock(&self.store).update(record);
        let updated = match outcome {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "update ignored");
                return Err(e);
            }
        };
        debug!(calories = updated.calories, "meal updated");
        self.notify(Notification::new(
            NotificationKind::Success,
            "Meal updated",
            "Your meal information has been saved",
        ));
        Ok(updated)
    }

    /// Idempotent. Returns whether a meal was removed.
    #[instrument(skip(self))]
    pub async fn delete_meal(&self, id: MealId) -> bool {
        let removed = lock(&self.store).remove(id);
        let Some(meal) = removed else {
            debug!("delete of unknown meal ignored");
            return false;
        };
        self.discard_image(&meal.image_ref).await;
        info!(name = %meal.name, "meal deleted");
        self.notify(Notification::new(
            NotificationKind::Info,
            "Meal deleted",
            "Meal removed from your log",
        ));
        true
    }

    /// Log a record directly, bypassing analysis. Used for the seed meal.
    pub fn insert(&self, record: MealRecord) -> Result<(), AppError> {
        lock(&self.store).add(record)
    }

    pub fn get(&self, id: MealId) -> Option<MealRecord> {
        lock(&self.store).get(id)
    }

    pub fn meals(&self) -> Vec<MealRecord> {
        lock(&self.store).list()
    }

    /// Recomputed from the current log on every call.
    pub fn totals(&self) -> DailyTotals {
        aggregate(&self.meals())
    }

    pub fn history<F>(&self, keep: F) -> Vec<DayGroup>
    where
        F: Fn(&MealRecord) -> bool,
    {
        group_by_day(&self.meals(), self.utc_offset, keep)
    }

    pub fn state(&self) -> PipelineState {
        *lock(&self.state)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).list()
    }

    pub fn clear_notifications(&self) {
        lock(&self.notifications).clear();
    }

    pub fn storage(&self) -> &Arc<dyn StorageClient> {
        &self.storage
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.utc_offset)
    }

    fn begin_analysis(&self) -> Result<AnalyzingGuard, AppError> {
        let mut state = lock(&self.state);
        if *state == PipelineState::Analyzing {
            warn!("upload rejected, analysis already running");
            return Err(AppError::AnalysisInProgress);
        }
        *state = PipelineState::Analyzing;
        Ok(AnalyzingGuard {
            state: Arc::clone(&self.state),
        })
    }

    async fn discard_image(&self, key: &str) {
        if let Err(e) = self.storage.delete_object(key).await {
            warn!(error = %e, key, "failed to delete meal image");
        }
    }

    fn notify(&self, n: Notification) {
        lock(&self.notifications).push(n);
    }
}

/// Puts the pipeline back to `Idle` when dropped.
struct AnalyzingGuard {
    state: Arc<Mutex<PipelineState>>,
}

impl Drop for AnalyzingGuard {
    fn drop(&mut self) {
        *lock(&self.state) = PipelineState::Idle;
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
