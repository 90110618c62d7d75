use std::sync::Arc;

use alphasigma_core::{members::Member, portfolio::leaderboard::LeaderboardEntry};
use axum::{extract::State, routing::get, Json, Router};

use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(get, path = "/api/members", responses((status = 200, description = "Roster members")))]
pub async fn list_members(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Member>>> {
    let members = state.member_service.list_members()?;
    Ok(Json(members))
}

/// Members ranked by the average total return of their open holdings.
#[utoipa::path(get, path = "/api/leaderboard", responses((status = 200, description = "Ranked members")))]
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let entries = state.leaderboard_service.leaderboard().await?;
    Ok(Json(entries))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", get(list_members))
        .route("/leaderboard", get(leaderboard))
}
