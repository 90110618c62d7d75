mod leaderboard_model;
mod leaderboard_service;

pub use leaderboard_model::{rank_entries, LeaderboardEntry};
pub use leaderboard_service::{LeaderboardService, LeaderboardServiceTrait};
