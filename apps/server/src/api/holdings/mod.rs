mod dto;
pub(crate) mod handlers;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{auth::require_jwt, main_lib::AppState};

/// Public reads plus JWT-guarded writes. `{id}` is a member id on GET and a
/// holding id on DELETE/PATCH.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = from_fn_with_state(state, require_jwt);

    Router::new()
        .route("/holdings/search", get(handlers::search_tickers))
        .route("/holdings/history", get(handlers::ticker_history))
        .route("/holdings/closed/{id}", get(handlers::list_closed_holdings))
        .route(
            "/holdings",
            post(handlers::add_holding).route_layer(auth.clone()),
        )
        .route(
            "/holdings/{id}",
            get(handlers::list_open_holdings)
                .merge(delete(handlers::delete_holding).route_layer(auth.clone())),
        )
        .route("/holdings/{id}/performance", get(handlers::portfolio_history))
        .route(
            "/holdings/{id}/close",
            patch(handlers::close_holding).route_layer(auth),
        )
}
