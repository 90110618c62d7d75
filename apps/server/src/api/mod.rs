pub mod health;
pub mod holdings;
pub mod members;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::{self, require_jwt},
    config::Config,
    error::error_response,
    main_lib::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        members::list_members,
        members::leaderboard,
        auth::login,
        auth::change_password,
        holdings::handlers::search_tickers,
        holdings::handlers::ticker_history,
        holdings::handlers::list_open_holdings,
        holdings::handlers::list_closed_holdings,
        holdings::handlers::portfolio_history,
        holdings::handlers::add_holding,
        holdings::handlers::delete_holding,
        holdings::handlers::close_holding,
    ),
    tags((name = "alphasigma"))
)]
pub struct ApiDoc;

async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let allowed = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    layer.allow_origin(allowed)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route(
            "/auth/change-password",
            post(auth::change_password)
                .route_layer(from_fn_with_state(state.clone(), require_jwt)),
        );

    let api = Router::new()
        .merge(health::router())
        .merge(members::router())
        .merge(auth_routes)
        .merge(holdings::router(state.clone()))
        .route("/openapi.json", get(move || async move { Json(openapi) }))
        .fallback(route_not_found);

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(&config.cors_allow))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
