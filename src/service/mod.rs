//! Service layer for the camp rating tracker
//!
//! This module contains the application facade that coordinates the stores,
//! the rating calculator and the statistics aggregator.

pub mod camp;

pub use camp::{CampService, RecordedMatch};
