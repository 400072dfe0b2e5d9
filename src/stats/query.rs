//! Stats queries and match windows

use crate::error::CampError;
use crate::types::{MatchRecord, Mode, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which of a player's matches a statistic looks at
///
/// `since` is applied first, then `last` keeps the most recent N of what is
/// left. An empty window means the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub since: Option<NaiveDate>,
    pub last: Option<usize>,
}

impl Window {
    /// Whole history
    pub fn all() -> Self {
        Self::default()
    }

    pub fn last(n: usize) -> Self {
        Self {
            since: None,
            last: Some(n),
        }
    }

    pub fn since(date: NaiveDate) -> Self {
        Self {
            since: Some(date),
            last: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.last.is_none()
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.last == Some(0) {
            return Err(CampError::InvalidWindow {
                reason: "--last must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Restrict chronologically ordered `matches` to the window
    pub fn apply<'a>(&self, matches: Vec<&'a MatchRecord>) -> Vec<&'a MatchRecord> {
        let mut kept: Vec<&MatchRecord> = match self.since {
            Some(since) => matches.into_iter().filter(|m| m.date >= since).collect(),
            None => matches,
        };
        if let Some(last) = self.last {
            let skip = kept.len().saturating_sub(last);
            kept.drain(..skip);
        }
        kept
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.since, self.last) {
            (None, None) => write!(f, "all matches"),
            (Some(since), None) => write!(f, "since {}", since),
            (None, Some(last)) => write!(f, "last {}", last),
            (Some(since), Some(last)) => write!(f, "last {} since {}", last, since),
        }
    }
}

/// Parameters of a single player's stats card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsQuery {
    pub player: PlayerId,
    pub mode: Mode,
    pub window: Window,
    /// Opponent for a head-to-head section
    pub h2h: Option<PlayerId>,
}

impl StatsQuery {
    pub fn new(player: &str, mode: Mode) -> Self {
        Self {
            player: player.to_string(),
            mode,
            window: Window::all(),
            h2h: None,
        }
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn against(mut self, opponent: &str) -> Self {
        self.h2h = Some(opponent.to_string());
        self
    }
}
