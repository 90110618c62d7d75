use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One monthly closing price, labelled for charts (e.g. `Jan '26`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyClose {
    pub month: String,
    pub close: Decimal,
}

/// Formats a timestamp as a short month label: `Jan '26`.
pub fn month_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b '%y").to_string()
}
