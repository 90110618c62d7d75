//! Holdings domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Kind of instrument a holding tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingType {
    Stock,
    Etf,
}

impl HoldingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingType::Stock => "stock",
            HoldingType::Etf => "etf",
        }
    }

    /// Maps a provider asset type (`EQUITY`, `ETF`, ...) onto a holding type.
    pub fn from_provider_type(asset_type: &str) -> Option<Self> {
        match asset_type.to_ascii_uppercase().as_str() {
            "EQUITY" => Some(HoldingType::Stock),
            "ETF" => Some(HoldingType::Etf),
            _ => None,
        }
    }
}

impl FromStr for HoldingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(HoldingType::Stock),
            "etf" => Ok(HoldingType::Etf),
            _ => Err(Error::invalid_input(r#"type must be "stock" or "etf""#)),
        }
    }
}

impl fmt::Display for HoldingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a position. Short positions gain when the price falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }

    pub fn multiplier(&self) -> Decimal {
        match self {
            PositionSide::Long => Decimal::ONE,
            PositionSide::Short => Decimal::NEGATIVE_ONE,
        }
    }
}

impl FromStr for PositionSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(PositionSide::Long),
            "short" => Ok(PositionSide::Short),
            _ => Err(Error::invalid_input(r#"position must be "long" or "short""#)),
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored position. It is open while `closed_at` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub id: i32,
    pub user_id: i32,
    pub ticker: String,
    pub name: String,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
    pub position: PositionSide,
    pub purchase_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub close_price: Option<Decimal>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Holding {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Input model for recording a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHolding {
    pub ticker: String,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
    pub position: PositionSide,
    pub purchase_price: Decimal,
}

/// Validated row handed to the repository.
#[derive(Debug, Clone)]
pub struct HoldingDraft {
    pub user_id: i32,
    pub ticker: String,
    pub name: String,
    pub holding_type: HoldingType,
    pub position: PositionSide,
    pub purchase_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Open holding enriched with live prices. Price fields are `None` when no quote was available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenHoldingView {
    pub id: i32,
    pub ticker: String,
    pub name: String,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
    pub position: PositionSide,
    pub purchase_price: Decimal,
    pub current_price: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub daily_pct: Option<Decimal>,
    pub total_pct: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosedHoldingView {
    pub id: i32,
    pub ticker: String,
    pub name: String,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
    pub position: PositionSide,
    pub purchase_price: Decimal,
    pub close_price: Decimal,
    pub closed_at: DateTime<Utc>,
    pub realized_pct: Option<Decimal>,
}

/// Average open-position return for one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioPoint {
    pub month: String,
    pub portfolio_return: Decimal,
}

/// Search hit restricted to instruments a holding can track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
}
