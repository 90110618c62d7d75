use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;

use super::leaderboard_model::{rank_entries, LeaderboardEntry};
use crate::errors::Result;
use crate::members::MemberServiceTrait;
use crate::portfolio::holdings::holdings_returns::average_pct;
use crate::portfolio::holdings::HoldingsServiceTrait;

#[async_trait]
pub trait LeaderboardServiceTrait: Send + Sync {
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;
}

pub struct LeaderboardService {
    member_service: Arc<dyn MemberServiceTrait>,
    holdings_service: Arc<dyn HoldingsServiceTrait>,
}

impl LeaderboardService {
    pub fn new(
        member_service: Arc<dyn MemberServiceTrait>,
        holdings_service: Arc<dyn HoldingsServiceTrait>,
    ) -> Self {
        Self {
            member_service,
            holdings_service,
        }
    }
}

#[async_trait]
impl LeaderboardServiceTrait for LeaderboardService {
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let members = self.member_service.list_members()?;

        let valuations = join_all(
            members
                .iter()
                .map(|m| self.holdings_service.list_open_holdings(m.id)),
        )
        .await;

        let mut entries: Vec<LeaderboardEntry> = members
            .into_iter()
            .zip(valuations)
            .map(|(member, valuation)| match valuation {
                Ok(holdings) => {
                    let returns: Vec<_> = holdings.iter().filter_map(|h| h.total_pct).collect();
                    LeaderboardEntry {
                        member,
                        avg_return: average_pct(&returns),
                        count: holdings.len(),
                    }
                }
                Err(e) => {
                    warn!("Failed to value holdings for member {}: {}", member.id, e);
                    LeaderboardEntry {
                        member,
                        avg_return: None,
                        count: 0,
                    }
                }
            })
            .collect();

        rank_entries(&mut entries);
        Ok(entries)
    }
}
