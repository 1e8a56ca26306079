use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    images::services::ImageUpload,
    meals::{
        dto::{CreateMealBytesRequest, DayGroupView, MealListResponse, MealView, PutMealRequest, SearchQuery},
        repo_types::{MealId, MealRecord},
        services::apply_edit,
    },
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/history", get(meal_history))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal_multipart)) // multipart "file"
        .route("/meals/bytes", post(create_meal_bytes))
        .route("/meals/:id", put(update_meal).delete(delete_meal))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> Json<MealListResponse> {
    let storage = state.tracker.storage().as_ref();
    let meals: Vec<MealView> = state
        .tracker
        .meals()
        .into_iter()
        .filter(|m| search.matches(m))
        .map(|m| MealView::new(m, storage))
        .collect();
    Json(MealListResponse {
        count: meals.len(),
        meals,
    })
}

#[instrument(skip(state))]
pub async fn meal_history(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> Json<Vec<DayGroupView>> {
    let storage = state.tracker.storage().as_ref();
    let groups = state
        .tracker
        .history(|m| search.matches(m))
        .into_iter()
        .map(|g| DayGroupView::new(g, storage))
        .collect();
    Json(groups)
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealView>, AppError> {
    let id = MealId(id);
    let meal = state.tracker.get(id).ok_or(AppError::NotFound(id))?;
    Ok(Json(MealView::new(meal, state.tracker.storage().as_ref())))
}

/// POST /meals (multipart)
/// The first `file` (or `image`) field is analysed; other fields are ignored.
#[instrument(skip(state, mp))]
pub async fn create_meal_multipart(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<MealView>), AppError> {
    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.body_text()))?
    {
        if !matches!(field.name(), Some("file") | Some("image")) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        upload = Some(ImageUpload::new(data, content_type));
        break;
    }
    let Some(upload) = upload else {
        return Err(AppError::InvalidInput("file is required".into()));
    };

    let meal = state.tracker.upload(upload).await?;
    created(&state, meal)
}

/// POST /meals/bytes { image: [..], content_type?: "image/jpeg" }
#[instrument(skip(state, body))]
pub async fn create_meal_bytes(
    State(state): State<AppState>,
    Json(body): Json<CreateMealBytesRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealView>), AppError> {
    let upload = ImageUpload::new(Bytes::from(body.image.into_vec()), body.content_type);
    let meal = state.tracker.upload(upload).await?;
    created(&state, meal)
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PutMealRequest>,
) -> Result<Json<MealView>, AppError> {
    let id = MealId(id);
    let Some(existing) = state.tracker.get(id) else {
        warn!(meal_id = %id, "update for unknown meal");
        return Err(AppError::NotFound(id));
    };
    let edited = apply_edit(&existing, &body);
    let meal = state.tracker.update_meal(&edited)?;
    Ok(Json(MealView::new(meal, state.tracker.storage().as_ref())))
}

/// Always 204; deleting an absent meal is not an error.
#[instrument(skip(state))]
pub async fn delete_meal(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    state.tracker.delete_meal(MealId(id)).await;
    StatusCode::NO_CONTENT
}

fn created(
    state: &AppState,
    meal: MealRecord,
) -> Result<(StatusCode, HeaderMap, Json<MealView>), AppError> {
    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/meals/{}", meal.id))
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(axum::http::header::LOCATION, location);
    Ok((
        StatusCode::CREATED,
        headers,
        Json(MealView::new(meal, state.tracker.storage().as_ref())),
    ))
}
