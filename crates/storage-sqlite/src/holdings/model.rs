//! Database models for holdings.
//!
//! Prices are stored as decimal text and timestamps as RFC 3339 text.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use alphasigma_core::portfolio::holdings::{Holding, HoldingDraft, HoldingType, PositionSide};

/// Database model for holdings
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: i32,
    pub user_id: i32,
    pub ticker: String,
    pub name: String,
    pub holding_type: String,
    pub position: String,
    pub purchase_price: String,
    pub created_at: String,
    pub close_price: Option<String>,
    pub closed_at: Option<String>,
}

/// Database model for inserting a holding
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
pub struct NewHoldingDB {
    pub user_id: i32,
    pub ticker: String,
    pub name: String,
    pub holding_type: String,
    pub position: String,
    pub purchase_price: String,
    pub created_at: String,
}

fn parse_decimal(value: &str, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::InvalidData(format!("{} '{}': {}", field, value, e)))
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("{} '{}': {}", field, value, e)))
}

impl TryFrom<HoldingDB> for Holding {
    type Error = StorageError;

    fn try_from(db: HoldingDB) -> Result<Self, Self::Error> {
        let holding_type = HoldingType::from_str(&db.holding_type)
            .map_err(|_| StorageError::InvalidData(format!("holding_type '{}'", db.holding_type)))?;
        let position = PositionSide::from_str(&db.position)
            .map_err(|_| StorageError::InvalidData(format!("position '{}'", db.position)))?;

        Ok(Holding {
            id: db.id,
            user_id: db.user_id,
            purchase_price: parse_decimal(&db.purchase_price, "purchase_price")?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            close_price: db
                .close_price
                .as_deref()
                .map(|v| parse_decimal(v, "close_price"))
                .transpose()?,
            closed_at: db
                .closed_at
                .as_deref()
                .map(|v| parse_timestamp(v, "closed_at"))
                .transpose()?,
            ticker: db.ticker,
            name: db.name,
            holding_type,
            position,
        })
    }
}

impl From<HoldingDraft> for NewHoldingDB {
    fn from(draft: HoldingDraft) -> Self {
        Self {
            user_id: draft.user_id,
            ticker: draft.ticker,
            name: draft.name,
            holding_type: draft.holding_type.as_str().to_string(),
            position: draft.position.as_str().to_string(),
            purchase_price: draft.purchase_price.to_string(),
            created_at: draft.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row() -> HoldingDB {
        HoldingDB {
            id: 3,
            user_id: 1,
            ticker: "SPY".to_string(),
            name: "SPDR S&P 500".to_string(),
            holding_type: "etf".to_string(),
            position: "short".to_string(),
            purchase_price: "512.25".to_string(),
            created_at: "2026-01-05T14:30:00+00:00".to_string(),
            close_price: Some("498.1".to_string()),
            closed_at: Some("2026-02-01T15:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_row_to_domain() {
        let holding = Holding::try_from(row()).unwrap();
        assert_eq!(holding.holding_type, HoldingType::Etf);
        assert_eq!(holding.position, PositionSide::Short);
        assert_eq!(holding.purchase_price, dec!(512.25));
        assert_eq!(holding.close_price, Some(dec!(498.1)));
        assert!(!holding.is_open());
    }

    #[test]
    fn test_bad_row_is_rejected() {
        let mut bad = row();
        bad.purchase_price = "abc".to_string();
        assert!(matches!(
            Holding::try_from(bad),
            Err(StorageError::InvalidData(_))
        ));

        let mut bad = row();
        bad.position = "sideways".to_string();
        assert!(Holding::try_from(bad).is_err());
    }

    #[test]
    fn test_draft_to_row() {
        let draft = HoldingDraft {
            user_id: 2,
            ticker: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            holding_type: HoldingType::Stock,
            position: PositionSide::Long,
            purchase_price: dec!(185.50),
            created_at: DateTime::parse_from_rfc3339("2026-01-05T14:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let row = NewHoldingDB::from(draft);
        assert_eq!(row.holding_type, "stock");
        assert_eq!(row.position, "long");
        assert_eq!(row.purchase_price, "185.50");
        assert_eq!(row.created_at, "2026-01-05T14:30:00+00:00");
    }
}
