//! Configuration management for the camp rating tracker
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod rating;
pub mod stats;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StorageSettings};
pub use rating::RatingConfig;
pub use stats::StatsSettings;
