//! Portfolio module - holdings lifecycle and member rankings.

pub mod holdings;
pub mod leaderboard;
