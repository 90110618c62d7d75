use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::members::Member;

/// One member's standing: mean `total_pct` over open holdings that have a price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub member: Member,
    pub avg_return: Option<Decimal>,
    pub count: usize,
}

/// Sorts by average return, best first. Members without a return sink to the
/// bottom; ties keep their incoming order.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| match (a.avg_return, b.avg_return) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
