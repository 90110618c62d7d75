use std::collections::BTreeMap;
use std::sync::Arc;

use alphasigma_core::{
    portfolio::holdings::{
        ClosedHoldingView, Holding, NewHolding, OpenHoldingView, PortfolioPoint, TickerMatch,
    },
    quotes::MonthlyClose,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

use super::dto::{
    parse_months, CloseHoldingRequest, CreateHoldingRequest, MessageResponse, MonthsQuery,
    SearchQuery, TickerHistoryQuery,
};

fn parse_id(raw: &str, message: &str) -> ApiResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::BadRequest(message.to_string()))
}

fn user_id(raw: &str) -> ApiResult<i32> {
    parse_id(raw, "Invalid user ID")
}

fn holding_id(raw: &str) -> ApiResult<i32> {
    parse_id(raw, "Invalid holding ID")
}

#[utoipa::path(get, path = "/api/holdings/search", responses((status = 200, description = "Matching stocks and ETFs")))]
pub async fn search_tickers(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<TickerMatch>>> {
    let matches = state
        .holdings_service
        .search_tickers(q.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(matches))
}

#[utoipa::path(get, path = "/api/holdings/history", responses((status = 200, description = "Monthly closes per ticker")))]
pub async fn ticker_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TickerHistoryQuery>,
) -> ApiResult<Json<BTreeMap<String, Vec<MonthlyClose>>>> {
    let months = parse_months(q.months.as_deref())?;
    let history = state
        .holdings_service
        .ticker_history(&q.ticker_list(), months)
        .await?;
    Ok(Json(history))
}

#[utoipa::path(get, path = "/api/holdings/{id}", responses((status = 200, description = "Open holdings with live returns")))]
pub async fn list_open_holdings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<OpenHoldingView>>> {
    let holdings = state
        .holdings_service
        .list_open_holdings(user_id(&id)?)
        .await?;
    Ok(Json(holdings))
}

#[utoipa::path(get, path = "/api/holdings/closed/{id}", responses((status = 200, description = "Closed holdings with realized returns")))]
pub async fn list_closed_holdings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ClosedHoldingView>>> {
    let holdings = state.holdings_service.list_closed_holdings(user_id(&id)?)?;
    Ok(Json(holdings))
}

#[utoipa::path(get, path = "/api/holdings/{id}/performance", responses((status = 200, description = "Monthly average portfolio return")))]
pub async fn portfolio_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(q): Query<MonthsQuery>,
) -> ApiResult<Json<Vec<PortfolioPoint>>> {
    let user_id = user_id(&id)?;
    let months = parse_months(q.months.as_deref())?;
    let points = state
        .holdings_service
        .portfolio_history(user_id, months)
        .await?;
    Ok(Json(points))
}

#[utoipa::path(post, path = "/api/holdings", responses((status = 201, description = "Holding created"), (status = 401, description = "Unauthorized")))]
pub async fn add_holding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateHoldingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Holding>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let new_holding = NewHolding::try_from(payload)?;
    let holding = state
        .holdings_service
        .add_holding(user.id, new_holding)
        .await?;
    Ok((StatusCode::CREATED, Json(holding)))
}

#[utoipa::path(delete, path = "/api/holdings/{id}", responses((status = 200, description = "Holding deleted"), (status = 403, description = "Not the owner")))]
pub async fn delete_holding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .holdings_service
        .delete_holding(user.id, holding_id(&id)?)
        .await?;
    Ok(Json(MessageResponse {
        message: "Holding deleted successfully".to_string(),
    }))
}

#[utoipa::path(patch, path = "/api/holdings/{id}/close", responses((status = 200, description = "Holding closed"), (status = 403, description = "Not the owner"), (status = 409, description = "Already closed")))]
pub async fn close_holding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<CloseHoldingRequest>, JsonRejection>,
) -> ApiResult<Json<ClosedHoldingView>> {
    let holding_id = holding_id(&id)?;
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let closed = state
        .holdings_service
        .close_holding(user.id, holding_id, payload.price())
        .await?;
    Ok(Json(closed))
}
