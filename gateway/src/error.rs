use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use services::ServiceError;
use thiserror::Error;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("invalid or missing session")]
    Unauthorized,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, status_text, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "invalid or missing session".to_string(),
            ),
            AppError::Service(service_err) => service_error_status(&service_err),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal error".to_string(),
            ),
        };

        let body = Json(json!({
            "status_text": status_text,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// No error kind ever surfaces its source string past this boundary except
/// the ones that are already user-facing by construction (`LoginTaken`,
/// `NotEnoughBalance`, ...) — `Transient` always collapses to a generic
/// "internal error" message.
fn service_error_status(err: &ServiceError) -> (StatusCode, &'static str, String) {
    match err {
        ServiceError::LoginTaken => (StatusCode::CONFLICT, "LOGIN_TAKEN", err.to_string()),
        ServiceError::WrongCredentials => (StatusCode::UNAUTHORIZED, "WRONG_CREDENTIALS", err.to_string()),
        ServiceError::UploadedByThisLogin => (StatusCode::OK, "ALREADY_UPLOADED", err.to_string()),
        ServiceError::UploadedByAnotherLogin => (StatusCode::CONFLICT, "UPLOADED_BY_ANOTHER_LOGIN", err.to_string()),
        ServiceError::InvalidOrderNumber => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_ORDER_NUMBER", err.to_string()),
        ServiceError::InvalidPassword => (StatusCode::BAD_REQUEST, "INVALID_PASSWORD", err.to_string()),
        ServiceError::NotEnoughBalance => (StatusCode::PAYMENT_REQUIRED, "NOT_ENOUGH_BALANCE", err.to_string()),
        ServiceError::NoContent => (StatusCode::NO_CONTENT, "NO_CONTENT", err.to_string()),
        ServiceError::Transient(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal error".to_string(),
        ),
    }
}
