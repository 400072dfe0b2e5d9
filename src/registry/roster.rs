//! The player registry: every player's current state, keyed by name

use crate::error::CampError;
use crate::rating::MatchOutcome;
use crate::registry::player::PlayerEntry;
use crate::types::{MatchRequest, Mode, PlayerId, RatingSnapshot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// All registered players
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, PlayerEntry>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PlayerEntry> {
        self.players.get(name)
    }

    /// Look up a player, failing with `UnknownPlayer`
    pub fn require(&self, name: &str) -> crate::error::Result<&PlayerEntry> {
        self.players.get(name).ok_or_else(|| {
            CampError::UnknownPlayer {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Players in name order
    pub fn iter(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.players.values()
    }

    /// Register a new player
    pub fn add_player(
        &mut self,
        name: &str,
        singles: f64,
        doubles: f64,
        created_at: DateTime<Utc>,
    ) -> crate::error::Result<&PlayerEntry> {
        if name.trim().is_empty() {
            return Err(CampError::InvalidParticipants {
                reason: "player names cannot be empty".to_string(),
            }
            .into());
        }
        if self.contains(name) {
            return Err(CampError::DuplicatePlayer {
                name: name.to_string(),
            }
            .into());
        }
        for rating in [singles, doubles] {
            if !rating.is_finite() {
                return Err(CampError::InvalidRating { value: rating }.into());
            }
        }

        let entry = PlayerEntry::new(name.to_string(), singles, doubles, created_at);
        Ok(self.players.entry(name.to_string()).or_insert(entry))
    }

    /// Current `mode` ratings of the named players
    pub fn snapshot<'a>(
        &self,
        mode: Mode,
        names: impl IntoIterator<Item = &'a PlayerId>,
    ) -> crate::error::Result<RatingSnapshot> {
        names
            .into_iter()
            .map(|name| Ok((name.clone(), self.require(name)?.rating(mode))))
            .collect()
    }

    /// Players sorted by `mode` rating, highest first, ties by name
    pub fn ranked(&self, mode: Mode) -> Vec<&PlayerEntry> {
        let mut entries: Vec<&PlayerEntry> = self.players.values().collect();
        entries.sort_by(|a, b| {
            b.rating(mode)
                .partial_cmp(&a.rating(mode))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Fold a calculated match into ratings, peaks and counters
    ///
    /// Every participant is checked before anything is touched, so an unknown
    /// player leaves the registry unchanged.
    pub fn apply_outcome(
        &mut self,
        request: &MatchRequest,
        outcome: &MatchOutcome,
        date: NaiveDate,
        bagel_min_games: u32,
    ) -> crate::error::Result<()> {
        for name in request.participants() {
            self.require(name)?;
            if outcome.change_for(name).is_none() {
                return Err(CampError::InvalidParticipants {
                    reason: format!("no rating change calculated for {}", name),
                }
                .into());
            }
        }

        for change in &outcome.rating_changes {
            let Some(entry) = self.players.get_mut(&change.player_id) else {
                continue;
            };
            let profile = entry.profile_mut(request.mode);

            if profile.apply_delta(change.delta, date) {
                info!(
                    "{} reached a new {} peak of {:.1}",
                    change.player_id, request.mode, profile.peak_rating
                );
            }
            for set in &request.sets {
                profile
                    .counters
                    .record_set(set, change.side, bagel_min_games);
            }
            profile.counters.record_match(change.side == outcome.winner);
            entry.last_match_date = Some(date);
        }

        Ok(())
    }
}
