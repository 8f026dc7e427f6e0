use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::Cookie;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Cookie defaults as named constants rather than inline literals.
pub const COOKIE_NAME: &str = "jwt";
pub const COOKIE_PATH: &str = "/";
pub const COOKIE_MAX_AGE_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    login: String,
    exp: usize,
}

/// Builds the signed `jwt` cookie issued on successful register/login.
pub fn issue_cookie(login: &str, secret_key: &str) -> Cookie<'static> {
    let exp = (chrono::Utc::now() + chrono::Duration::seconds(COOKIE_MAX_AGE_SECS)).timestamp() as usize;
    let claims = Claims {
        login: login.to_string(),
        exp,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret_key.as_bytes()))
        .expect("HS256 encoding with a well-formed secret never fails");

    Cookie::build((COOKIE_NAME, token))
        .path(COOKIE_PATH)
        .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECS))
        .build()
}

/// The authenticated login, extracted from a verified `jwt` cookie.
///
/// Both signature and expiration are checked by `jsonwebtoken::decode`'s
/// default `Validation`, so a tampered or expired token is never accepted.
pub struct AuthenticatedUser {
    pub login: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    crate::state::AppState: axum::extract::FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = crate::state::AppState::from_ref(state);

        let cookie_header = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = find_cookie(cookie_header, COOKIE_NAME).ok_or(AppError::Unauthorized)?;

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(app_state.secret_key.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthenticatedUser {
            login: token_data.claims.login,
        })
    }
}

fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let part = part.trim();
        let (k, v) = part.split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_cookie_round_trips_through_find_cookie() {
        let cookie = issue_cookie("u1", "secret");
        let header = format!("{}={}", cookie.name(), cookie.value());
        let token = find_cookie(&header, COOKIE_NAME).unwrap();

        let claims = decode::<Claims>(&token, &DecodingKey::from_secret(b"secret"), &Validation::default()).unwrap();
        assert_eq!(claims.claims.login, "u1");
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let cookie = issue_cookie("u1", "secret");
        let result = decode::<Claims>(cookie.value(), &DecodingKey::from_secret(b"wrong"), &Validation::default());
        assert!(result.is_err());
    }

    #[test]
    fn find_cookie_handles_multiple_cookies() {
        let header = "a=1; jwt=abc123; b=2";
        assert_eq!(find_cookie(header, COOKIE_NAME), Some("abc123".to_string()));
    }

    #[test]
    fn find_cookie_returns_none_when_absent() {
        assert_eq!(find_cookie("a=1; b=2", COOKIE_NAME), None);
    }
}
