//! Common types used throughout the rating tracker

use crate::error::CampError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for players (the case-sensitive player name)
pub type PlayerId = String;

/// Unique identifier for recorded matches
pub type MatchId = Uuid;

/// Ratings of a set of players at one point in time, keyed by name
pub type RatingSnapshot = BTreeMap<PlayerId, f64>;

/// Kind of match being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Singles,
    Doubles,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Singles, Mode::Doubles];

    /// Number of players on each side
    pub fn side_size(self) -> usize {
        match self {
            Mode::Singles => 1,
            Mode::Doubles => 2,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Singles => write!(f, "singles"),
            Mode::Doubles => write!(f, "doubles"),
        }
    }
}

/// One of the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Whether a set was played out in games or settled by a standalone tiebreak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetKind {
    Normal,
    /// Counts are points rather than games
    Tiebreak,
}

/// Score of a single set from side A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub games_a: u32,
    pub games_b: u32,
    pub kind: SetKind,
}

impl SetScore {
    pub fn normal(games_a: u32, games_b: u32) -> Self {
        Self {
            games_a,
            games_b,
            kind: SetKind::Normal,
        }
    }

    pub fn tiebreak(points_a: u32, points_b: u32) -> Self {
        Self {
            games_a: points_a,
            games_b: points_b,
            kind: SetKind::Tiebreak,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.games_a) + u64::from(self.games_b)
    }

    pub fn is_tiebreak(&self) -> bool {
        self.kind == SetKind::Tiebreak
    }

    /// Side that took the set, `None` when the counts are level
    pub fn winner(&self) -> Option<Side> {
        match self.games_a.cmp(&self.games_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn games_for(&self, side: Side) -> u32 {
        match side {
            Side::A => self.games_a,
            Side::B => self.games_b,
        }
    }

    /// A normal set won with at least `min_games` while the loser took none
    pub fn is_bagel(&self, min_games: u32) -> bool {
        if self.kind != SetKind::Normal {
            return false;
        }
        let winning = self.games_a.max(self.games_b);
        let losing = self.games_a.min(self.games_b);
        losing == 0 && winning >= min_games
    }

    /// The same set seen from `side`
    pub fn oriented(&self, side: Side) -> SetScore {
        match side {
            Side::A => *self,
            Side::B => SetScore {
                games_a: self.games_b,
                games_b: self.games_a,
                kind: self.kind,
            },
        }
    }
}

impl std::fmt::Display for SetScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SetKind::Normal => write!(f, "{}-{}", self.games_a, self.games_b),
            SetKind::Tiebreak => write!(f, "{}-{}[tiebreak]", self.games_a, self.games_b),
        }
    }
}

impl FromStr for SetScore {
    type Err = CampError;

    /// Parse tokens like `6-3`, `7-6`, `6-4[set]` or `10-8[tiebreak]`
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || CampError::InvalidSetScore {
            reason: format!(
                "'{}' is not a set score; use A-B or A-B[tiebreak], e.g. 6-3 or 10-8[tiebreak]",
                token
            ),
        };

        let trimmed = token.trim();
        let (score, kind) = match trimmed.split_once('[') {
            Some((score, suffix)) => {
                let kind = match suffix {
                    "tiebreak]" => SetKind::Tiebreak,
                    "set]" => SetKind::Normal,
                    _ => return Err(invalid()),
                };
                (score, kind)
            }
            None => (trimmed, SetKind::Normal),
        };

        let (a, b) = score.split_once('-').ok_or_else(invalid)?;
        let parse_count = |digits: &str| -> Result<u32, CampError> {
            if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse().map_err(|_| invalid())
        };

        Ok(SetScore {
            games_a: parse_count(a)?,
            games_b: parse_count(b)?,
            kind,
        })
    }
}

/// Result of a match for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn token(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
        }
    }
}

/// A match as entered by the user, before any rating is computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub mode: Mode,
    pub side_a: Vec<PlayerId>,
    pub side_b: Vec<PlayerId>,
    pub sets: Vec<SetScore>,
}

impl MatchRequest {
    pub fn singles(player_a: &str, player_b: &str, sets: Vec<SetScore>) -> Self {
        Self {
            mode: Mode::Singles,
            side_a: vec![player_a.to_string()],
            side_b: vec![player_b.to_string()],
            sets,
        }
    }

    pub fn doubles(team_a: [&str; 2], team_b: [&str; 2], sets: Vec<SetScore>) -> Self {
        Self {
            mode: Mode::Doubles,
            side_a: team_a.iter().map(|name| name.to_string()).collect(),
            side_b: team_b.iter().map(|name| name.to_string()).collect(),
            sets,
        }
    }

    pub fn side(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    /// All participants, side A first
    pub fn participants(&self) -> impl Iterator<Item = &PlayerId> {
        self.side_a.iter().chain(self.side_b.iter())
    }

    /// Check side sizes, names and that at least one set was played
    pub fn validate(&self) -> crate::error::Result<()> {
        let expected = self.mode.side_size();
        for (label, side) in [("A", &self.side_a), ("B", &self.side_b)] {
            if side.len() != expected {
                return Err(CampError::InvalidParticipants {
                    reason: format!(
                        "{} side {} has {} players, expected {}",
                        self.mode,
                        label,
                        side.len(),
                        expected
                    ),
                }
                .into());
            }
        }

        let mut seen = std::collections::HashSet::new();
        for name in self.participants() {
            if name.trim().is_empty() {
                return Err(CampError::InvalidParticipants {
                    reason: "player names cannot be empty".to_string(),
                }
                .into());
            }
            if !seen.insert(name.as_str()) {
                return Err(CampError::InvalidParticipants {
                    reason: format!("{} appears more than once in the match", name),
                }
                .into());
            }
        }

        if self.sets.is_empty() {
            return Err(CampError::InvalidSetScore {
                reason: "a match needs at least one set".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Immutable entry of the match log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub mode: Mode,
    pub side_a: Vec<PlayerId>,
    pub side_b: Vec<PlayerId>,
    pub sets: Vec<SetScore>,
    pub winner: Side,
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    pub decided_by_tiebreak: bool,
    pub comeback_win: bool,
    /// Bonus credited to the winning side as a whole
    pub match_bonus: f64,
    pub ratings_before: RatingSnapshot,
    pub ratings_after: RatingSnapshot,
    pub rating_change: RatingSnapshot,
}

impl MatchRecord {
    pub fn side(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn side_of(&self, player: &str) -> Option<Side> {
        if self.side_a.iter().any(|name| name == player) {
            Some(Side::A)
        } else if self.side_b.iter().any(|name| name == player) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn includes(&self, player: &str) -> bool {
        self.side_of(player).is_some()
    }

    pub fn outcome_for(&self, player: &str) -> Option<Outcome> {
        self.side_of(player).map(|side| {
            if side == self.winner {
                Outcome::Win
            } else {
                Outcome::Loss
            }
        })
    }

    /// Rating change for `player`, 0.0 when they did not play
    pub fn delta_for(&self, player: &str) -> f64 {
        self.rating_change.get(player).copied().unwrap_or(0.0)
    }

    /// Summed rating change of everyone on `side`
    pub fn side_delta(&self, side: Side) -> f64 {
        self.side(side).iter().map(|name| self.delta_for(name)).sum()
    }

    /// Average pre-match rating of `side`
    pub fn side_rating_before(&self, side: Side) -> Option<f64> {
        let players = self.side(side);
        let ratings: Option<Vec<f64>> = players
            .iter()
            .map(|name| self.ratings_before.get(name).copied())
            .collect();
        ratings.map(|ratings| crate::rating::probability::side_rating(&ratings))
    }

    pub fn opponents_of(&self, player: &str) -> &[PlayerId] {
        match self.side_of(player) {
            Some(side) => self.side(side.opposite()),
            None => &[],
        }
    }

    pub fn partners_of(&self, player: &str) -> Vec<&PlayerId> {
        match self.side_of(player) {
            Some(side) => self.side(side).iter().filter(|n| *n != player).collect(),
            None => Vec::new(),
        }
    }

    /// Compact score like `6-3, 6-7[tiebreak]` as seen from `side`
    pub fn score_string(&self, side: Side) -> String {
        self.sets
            .iter()
            .map(|set| set.oriented(side).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
