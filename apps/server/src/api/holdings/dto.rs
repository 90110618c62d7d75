use std::str::FromStr;

use alphasigma_core::constants::DEFAULT_HISTORY_MONTHS;
use alphasigma_core::portfolio::holdings::{HoldingType, NewHolding, PositionSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

const MISSING_HOLDING_FIELDS: &str = "ticker, type, position, and purchase_price are required";
const MONTHS_OUT_OF_RANGE: &str = "months must be between 1 and 60";

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct TickerHistoryQuery {
    pub tickers: Option<String>,
    pub months: Option<String>,
}

impl TickerHistoryQuery {
    pub fn ticker_list(&self) -> Vec<String> {
        self.tickers
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize)]
pub struct MonthsQuery {
    pub months: Option<String>,
}

/// `months` query value; absent means the default window.
pub fn parse_months(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_HISTORY_MONTHS),
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| ApiError::BadRequest(MONTHS_OUT_OF_RANGE.to_string())),
    }
}

#[derive(Deserialize)]
pub struct CreateHoldingRequest {
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub holding_type: Option<String>,
    pub position: Option<String>,
    pub purchase_price: Option<Value>,
}

impl TryFrom<CreateHoldingRequest> for NewHolding {
    type Error = ApiError;

    fn try_from(req: CreateHoldingRequest) -> Result<Self, Self::Error> {
        let missing = || ApiError::BadRequest(MISSING_HOLDING_FIELDS.to_string());

        let ticker = req.ticker.filter(|t| !t.trim().is_empty()).ok_or_else(missing)?;
        let holding_type = req.holding_type.filter(|t| !t.is_empty()).ok_or_else(missing)?;
        let position = req.position.filter(|p| !p.is_empty()).ok_or_else(missing)?;
        let purchase_price = req
            .purchase_price
            .filter(|v| !v.is_null() && v.as_str() != Some(""))
            .ok_or_else(missing)?;

        Ok(NewHolding {
            ticker,
            holding_type: HoldingType::from_str(&holding_type)?,
            position: PositionSide::from_str(&position)?,
            purchase_price: price_from_json(&purchase_price)
                .ok_or_else(|| invalid_price("purchase_price"))?,
        })
    }
}

#[derive(Deserialize)]
pub struct CloseHoldingRequest {
    pub close_price: Option<Value>,
}

impl CloseHoldingRequest {
    /// Missing or unparseable prices come back as zero so the service can
    /// settle ownership before rejecting the value.
    pub fn price(&self) -> Decimal {
        self.close_price
            .as_ref()
            .and_then(price_from_json)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn invalid_price(field: &str) -> ApiError {
    ApiError::BadRequest(format!("{field} must be a positive number"))
}

/// Accepts a JSON number or a numeric string.
fn price_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
