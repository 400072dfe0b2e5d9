//! Persistence for the player registry and the match log
//!
//! Both stores are explicit handles owned by the camp service; nothing here is
//! global.

pub mod history;
pub mod players;

// Re-export commonly used types
pub use history::{AppendReceipt, InMemoryMatchLog, JsonLinesMatchLog, MatchLog};
pub use players::{InMemoryPlayerStore, JsonPlayerStore, MockPlayerStore, PlayerStore};
