//! The camp service: every user-facing operation over the two stores
//!
//! Writes are all-or-nothing. A match is computed against a copy of the
//! registry, appended to the log, and only then is the registry saved; a failed
//! save takes the log append back.

use crate::config::{validate_config, AppConfig};
use crate::error::Result;
use crate::rating::{MatchOutcome, RatingCalculator, TennisEloCalculator};
use crate::registry::{PlayerEntry, PlayerRegistry};
use crate::stats::{
    DailyInsights, LeaderboardRow, Mover, StatsAggregator, StatsCard, StatsQuery, StreakRow,
    Window,
};
use crate::storage::{JsonLinesMatchLog, JsonPlayerStore, MatchLog, PlayerStore};
use crate::types::{MatchRecord, MatchRequest, Mode};
use crate::utils::current_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, warn};

/// A match that made it into both stores
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMatch {
    pub record: MatchRecord,
    pub outcome: MatchOutcome,
}

/// Application facade owning the stores and the rating calculator
pub struct CampService<P: PlayerStore, L: MatchLog> {
    config: AppConfig,
    calculator: Box<dyn RatingCalculator>,
    players: P,
    log: L,
}

impl CampService<JsonPlayerStore, JsonLinesMatchLog> {
    /// Open the file-backed stores named by `config`
    pub fn open(config: AppConfig) -> Result<Self> {
        let players = JsonPlayerStore::new(config.storage.players_path());
        let log = JsonLinesMatchLog::new(config.storage.history_path());
        info!(
            "Opening camp data: players at {}, matches at {}",
            players.path().display(),
            log.path().display()
        );
        Self::new(config, players, log)
    }
}

impl<P: PlayerStore, L: MatchLog> CampService<P, L> {
    /// Create a service over explicit store handles
    pub fn new(config: AppConfig, players: P, log: L) -> Result<Self> {
        validate_config(&config)?;
        let calculator = TennisEloCalculator::new(config.rating.clone())?;
        Ok(Self {
            config,
            calculator: Box::new(calculator),
            players,
            log,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn calculator(&self) -> &dyn RatingCalculator {
        self.calculator.as_ref()
    }

    pub fn player_store(&self) -> &P {
        &self.players
    }

    pub fn player_store_mut(&mut self) -> &mut P {
        &mut self.players
    }

    pub fn match_log(&self) -> &L {
        &self.log
    }

    /// Register a player; unset ratings start at the configured initial rating
    pub fn add_player(
        &mut self,
        name: &str,
        singles: Option<f64>,
        doubles: Option<f64>,
    ) -> Result<PlayerEntry> {
        let initial = self.calculator.initial_rating();
        let mut registry = self.players.load_players()?;
        let entry = registry
            .add_player(
                name,
                singles.unwrap_or(initial),
                doubles.unwrap_or(initial),
                current_timestamp(),
            )?
            .clone();
        self.players.save_players(&registry)?;

        info!(
            "Added player {} (singles {:.1}, doubles {:.1})",
            entry.name, entry.singles.rating, entry.doubles.rating
        );
        Ok(entry)
    }

    /// Record a match played now
    pub fn record_match(&mut self, request: MatchRequest) -> Result<RecordedMatch> {
        self.record_match_at(request, current_timestamp())
    }

    /// Record a match with an explicit timestamp
    pub fn record_match_at(
        &mut self,
        request: MatchRequest,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordedMatch> {
        request.validate()?;

        let mut registry = self.players.load_players()?;
        let ratings = registry.snapshot(request.mode, request.participants())?;
        let outcome = self.calculator.calculate_match(&request, &ratings)?;

        registry.apply_outcome(
            &request,
            &outcome,
            timestamp.date_naive(),
            self.config.rating.bagel_min_games,
        )?;
        let record = outcome.to_record(&request, timestamp);

        let receipt = self.log.append_match(&record)?;
        if let Err(save_error) = self.players.save_players(&registry) {
            warn!(
                "Saving players failed after logging match {}, reverting: {}",
                record.id, save_error
            );
            if let Err(revert_error) = self.log.revert_append(receipt) {
                error!(
                    "Could not revert match {} from the log: {}",
                    record.id, revert_error
                );
                return Err(save_error.context(format!(
                    "match {} is in the log but ratings were not saved",
                    record.id
                )));
            }
            return Err(save_error);
        }

        info!(
            "Recorded {} match {}: {} def. {} ({}-{})",
            request.mode,
            record.id,
            record.side(record.winner).join(" & "),
            record.side(record.winner.opposite()).join(" & "),
            record.sets_won_a.max(record.sets_won_b),
            record.sets_won_a.min(record.sets_won_b),
        );
        Ok(RecordedMatch { record, outcome })
    }

    /// Current registry
    pub fn registry(&self) -> Result<PlayerRegistry> {
        self.players.load_players()
    }

    /// Full match log in append order
    pub fn matches(&self) -> Result<Vec<MatchRecord>> {
        self.log.load_matches()
    }

    pub fn player(&self, name: &str) -> Result<PlayerEntry> {
        Ok(self.registry()?.require(name)?.clone())
    }

    pub fn leaderboard(&self, mode: Mode, top: Option<usize>) -> Result<Vec<LeaderboardRow>> {
        let registry = self.registry()?;
        Ok(self.aggregator(&registry, &[]).leaderboard(mode, top))
    }

    pub fn stats_card(&self, query: &StatsQuery) -> Result<StatsCard> {
        let registry = self.registry()?;
        let matches = self.matches()?;
        self.aggregator(&registry, &matches).stats_card(query)
    }

    pub fn movers(&self, mode: Mode, window: Option<Window>) -> Result<Vec<Mover>> {
        let registry = self.registry()?;
        let matches = self.matches()?;
        self.aggregator(&registry, &matches).movers(mode, window)
    }

    pub fn active_streaks(&self, mode: Mode) -> Result<Vec<StreakRow>> {
        let registry = self.registry()?;
        Ok(self.aggregator(&registry, &[]).active_streaks(mode))
    }

    pub fn insights(&self, date: NaiveDate) -> Result<DailyInsights> {
        let registry = self.registry()?;
        let matches = self.matches()?;
        Ok(self.aggregator(&registry, &matches).insights(date))
    }

    fn aggregator<'a>(
        &'a self,
        registry: &'a PlayerRegistry,
        matches: &'a [MatchRecord],
    ) -> StatsAggregator<'a> {
        StatsAggregator::new(
            registry,
            matches,
            &self.config.stats,
            self.config.rating.bagel_min_games,
        )
    }
}
