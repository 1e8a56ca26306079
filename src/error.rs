use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::meals::repo_types::MealId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("meal {0} already exists")]
    IdCollision(MealId),

    #[error("meal {0} not found")]
    NotFound(MealId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("an analysis is already in progress")]
    AnalysisInProgress,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::IdCollision(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::AnalysisFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::AnalysisInProgress => StatusCode::CONFLICT,
            AppError::Internal(ref e) => {
                error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
