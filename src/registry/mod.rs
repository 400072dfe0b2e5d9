//! Player registry
//!
//! The only place mutable aggregate state lives: current and peak ratings and
//! per-mode counters for every registered player.

pub mod player;
pub mod roster;

// Re-export commonly used types
pub use player::{ModeCounters, ModeProfile, PlayerEntry};
pub use roster::PlayerRegistry;
