//! Statistics derived from the registry and the match log
//!
//! This module provides per-player stats cards, leaderboards, movers, win
//! streaks and daily insights. Everything is recomputed on demand.

pub mod aggregator;
pub mod card;
pub mod insights;
pub mod query;

// Re-export commonly used types
pub use aggregator::StatsAggregator;
pub use card::{
    HeadToHead, LeaderboardRow, Momentum, Mover, RecentMatch, StatsCard, StreakRow, WinLoss,
};
pub use insights::{DailyInsights, DailyTotals, MatchSummary, Milestone, ModeDay, Upset};
pub use query::{StatsQuery, Window};
