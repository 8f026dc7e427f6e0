use crate::handlers::{balance, orders, user};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login))
        .route("/user/orders", post(orders::upload).get(orders::list))
        .route("/user/balance", get(balance::get))
        .route("/user/balance/withdraw", post(balance::withdraw))
        .route("/user/withdrawals", get(balance::withdrawals));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
