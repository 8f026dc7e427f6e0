use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domain::order::OrderResponse;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/user/orders` takes a raw text body (the order number), not
/// JSON — matching the external order-upload contract.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: String,
) -> Result<StatusCode, AppError> {
    let number = body.trim();
    if number.is_empty() {
        return Err(AppError::BadRequest("order number must not be empty".to_string()));
    }

    let created = state.order_service.upload(&user.login, number).await?;
    if created {
        Ok(StatusCode::ACCEPTED)
    } else {
        Ok(StatusCode::OK)
    }
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.order_service.list_for_login(&user.login).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
