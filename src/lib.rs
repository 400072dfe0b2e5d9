//! Elo Camp - set-level tennis ratings for a training camp
//!
//! This crate rates singles and doubles players set by set with a
//! margin-of-victory Elo model, keeps a registry of players and an append-only
//! match log, and derives stats cards, leaderboards and daily insights from them.

pub mod config;
pub mod error;
pub mod rating;
pub mod registry;
pub mod report;
pub mod service;
pub mod stats;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{CampError, Result};
pub use types::*;

// Re-export key components
pub use rating::{RatingCalculator, TennisEloCalculator};
pub use registry::PlayerRegistry;
pub use service::CampService;
pub use stats::{StatsAggregator, StatsQuery, Window};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
