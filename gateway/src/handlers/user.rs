use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use domain::user::Credentials;

use crate::auth;
use crate::error::AppError;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, CookieJar), AppError> {
    if credentials.login.is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest("login and password are required".to_string()));
    }

    state.user_service.register(&credentials).await?;
    // Second write of the registration sequence. A failure here leaves the
    // user without a balance row; `BalanceService::create` is a pass-through
    // to an idempotent `CREATE ... ON CONFLICT DO NOTHING`-style insert at
    // the store, so a retried registration (or first login) recovers.
    state.balance_service.create(&credentials.login).await?;

    let cookie = auth::issue_cookie(&credentials.login, &state.secret_key);
    Ok((StatusCode::OK, jar.add(cookie)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, CookieJar), AppError> {
    if credentials.login.is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest("login and password are required".to_string()));
    }

    state.user_service.login(&credentials).await?;

    let cookie = auth::issue_cookie(&credentials.login, &state.secret_key);
    Ok((StatusCode::OK, jar.add(cookie)))
}
