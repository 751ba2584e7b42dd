//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound => PricingErrorResponse {
                error_type: "NotFound".to_string(),
                message: "Record not found".to_string(),
                details: None,
            },
            AppError::BadRequest(message) => PricingErrorResponse {
                error_type: "BadRequest".to_string(),
                message: message.clone(),
                details: None,
            },
            AppError::Pricing(e) => PricingErrorResponse::from(e),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                internal("Database error")
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                internal("Template error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal("Internal error")
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal(message: &str) -> PricingErrorResponse {
    PricingErrorResponse {
        error_type: "Internal".to_string(),
        message: message.to_string(),
        details: None,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        let pricing = AppError::from(PricingError::InvalidGroupComposition {
            pax: 4,
            free_places: 4,
        });
        assert_eq!(pricing.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
