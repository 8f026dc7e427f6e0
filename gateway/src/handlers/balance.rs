use axum::extract::State;
use axum::Json;
use domain::balance::BalanceResponse;
use domain::withdrawal::{WithdrawRequest, WithdrawalResponse};

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>, user: AuthenticatedUser) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.balance_service.get(&user.login).await?;
    Ok(Json(BalanceResponse::from(balance)))
}

pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<WithdrawRequest>,
) -> Result<(), AppError> {
    if request.order.is_empty() {
        return Err(AppError::BadRequest("order number must not be empty".to_string()));
    }
    if request.sum.is_zero() {
        return Err(AppError::BadRequest("withdrawal sum must be greater than zero".to_string()));
    }

    state
        .balance_service
        .withdraw(&user.login, &request.order, request.sum)
        .await?;
    Ok(())
}

pub async fn withdrawals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<WithdrawalResponse>>, AppError> {
    let withdrawals = state.balance_service.withdrawals(&user.login).await?;
    Ok(Json(withdrawals.into_iter().map(WithdrawalResponse::from).collect()))
}
