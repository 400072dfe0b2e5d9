//! Statistics recomputed from the match log
//!
//! Nothing here is cached: every call walks the log again, so two runs over
//! the same log and registry always agree.

use crate::config::StatsSettings;
use crate::error::CampError;
use crate::registry::PlayerRegistry;
use crate::stats::card::{
    HeadToHead, LeaderboardRow, Momentum, Mover, RecentMatch, StatsCard, StreakRow, WinLoss,
};
use crate::stats::query::{StatsQuery, Window};
use crate::types::{MatchRecord, Mode, Outcome, PlayerId};
use tracing::debug;

/// Read-only view over the registry and the match log
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator<'a> {
    pub(crate) registry: &'a PlayerRegistry,
    pub(crate) matches: &'a [MatchRecord],
    pub(crate) settings: &'a StatsSettings,
    pub(crate) bagel_min_games: u32,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(
        registry: &'a PlayerRegistry,
        matches: &'a [MatchRecord],
        settings: &'a StatsSettings,
        bagel_min_games: u32,
    ) -> Self {
        Self {
            registry,
            matches,
            settings,
            bagel_min_games,
        }
    }

    /// `player`'s matches in `mode`, in log order
    pub fn player_matches(&self, player: &str, mode: Mode) -> Vec<&'a MatchRecord> {
        self.matches
            .iter()
            .filter(|record| record.mode == mode && record.includes(player))
            .collect()
    }

    /// Build the stats card for one player
    pub fn stats_card(&self, query: &StatsQuery) -> crate::error::Result<StatsCard> {
        query.window.validate()?;
        let entry = self.registry.require(&query.player)?;
        if let Some(opponent) = &query.h2h {
            self.registry.require(opponent)?;
            if *opponent == query.player {
                return Err(CampError::InvalidParticipants {
                    reason: format!("{} cannot be their own head-to-head opponent", opponent),
                }
                .into());
            }
        }

        let player = query.player.as_str();
        let window = query
            .window
            .apply(self.player_matches(player, query.mode));
        debug!(
            "Stats for {} ({}): {} matches in window ({})",
            player,
            query.mode,
            window.len(),
            query.window
        );

        let mut matches = WinLoss::default();
        let mut sets = WinLoss::default();
        let mut tiebreaks = WinLoss::default();
        let mut bagels_given = 0;
        let mut bagels_taken = 0;
        let mut current_streak = 0;
        let mut longest_streak = 0;
        let mut outcomes = Vec::with_capacity(window.len());

        for record in &window {
            let Some(side) = record.side_of(player) else {
                continue;
            };
            let won = record.winner == side;
            matches.record(won);
            outcomes.push(if won { Outcome::Win } else { Outcome::Loss });

            if won {
                current_streak += 1;
                longest_streak = longest_streak.max(current_streak);
            } else {
                current_streak = 0;
            }

            for set in &record.sets {
                let Some(set_winner) = set.winner() else {
                    continue;
                };
                let took_set = set_winner == side;
                sets.record(took_set);
                if set.is_tiebreak() {
                    tiebreaks.record(took_set);
                }
                if set.is_bagel(self.bagel_min_games) {
                    if took_set {
                        bagels_given += 1;
                    } else {
                        bagels_taken += 1;
                    }
                }
            }
        }

        let momentum = momentum_of(player, &window);

        let form_start = outcomes.len().saturating_sub(self.settings.recent_form_len);
        let recent_form = outcomes[form_start..].to_vec();

        // Bounded windows list every match; the full history only the latest few
        let listed = if query.window.is_unbounded() {
            self.settings.recent_form_len
        } else {
            window.len()
        };
        let recent_matches = window
            .iter()
            .rev()
            .take(listed)
            .filter_map(|record| recent_match(player, record))
            .collect();

        let head_to_head = query
            .h2h
            .as_deref()
            .map(|opponent| head_to_head(player, opponent, &window));

        let profile = entry.profile(query.mode);
        Ok(StatsCard {
            player: query.player.clone(),
            mode: query.mode,
            window: query.window,
            current_rating: profile.rating,
            peak_rating: profile.peak_rating,
            peak_date: profile.peak_date,
            matches,
            sets,
            tiebreaks,
            bagels_given,
            bagels_taken,
            current_streak,
            longest_streak,
            momentum,
            recent_form,
            recent_matches,
            head_to_head,
        })
    }

    /// Players by current rating, highest first; `top` defaults from settings
    pub fn leaderboard(&self, mode: Mode, top: Option<usize>) -> Vec<LeaderboardRow> {
        let top = top.unwrap_or(self.settings.default_top);
        self.registry
            .ranked(mode)
            .into_iter()
            .take(top)
            .enumerate()
            .map(|(index, entry)| {
                let counters = entry.counters(mode);
                LeaderboardRow {
                    rank: index + 1,
                    player: entry.name.clone(),
                    rating: entry.rating(mode),
                    peak_rating: entry.profile(mode).peak_rating,
                    matches: WinLoss {
                        won: counters.matches_won,
                        lost: counters.matches_lost(),
                    },
                }
            })
            .collect()
    }

    /// Summed deltas per player over each player's own window
    ///
    /// Players without matches in the window are left out. Sorted by delta,
    /// biggest gain first.
    pub fn movers(&self, mode: Mode, window: Option<Window>) -> crate::error::Result<Vec<Mover>> {
        let window = window.unwrap_or_else(|| Window::last(self.settings.default_momentum_last));
        window.validate()?;

        let mut movers: Vec<Mover> = self
            .registry
            .iter()
            .filter_map(|entry| {
                let matches = window.apply(self.player_matches(&entry.name, mode));
                if matches.is_empty() {
                    return None;
                }
                Some(Mover {
                    player: entry.name.clone(),
                    matches: matches.len(),
                    delta: matches.iter().map(|m| m.delta_for(&entry.name)).sum(),
                })
            })
            .collect();

        sort_movers(&mut movers);
        Ok(movers)
    }

    /// Every player's live win streak in `mode`, longest first
    pub fn active_streaks(&self, mode: Mode) -> Vec<StreakRow> {
        let mut rows: Vec<StreakRow> = self
            .registry
            .iter()
            .map(|entry| {
                let counters = entry.counters(mode);
                StreakRow {
                    player: entry.name.clone(),
                    current: counters.current_win_streak,
                    best: counters.best_win_streak,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.current.cmp(&a.current).then_with(|| a.player.cmp(&b.player)));
        rows
    }
}

pub(crate) fn sort_movers(movers: &mut [Mover]) {
    movers.sort_by(|a, b| {
        b.delta
            .partial_cmp(&a.delta)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.player.cmp(&b.player))
    });
}

fn momentum_of(player: &str, window: &[&MatchRecord]) -> Option<Momentum> {
    let first = window.first()?;
    let last = window.last()?;
    Some(Momentum {
        start_rating: *first.ratings_before.get(player)?,
        end_rating: *last.ratings_after.get(player)?,
        delta: window.iter().map(|m| m.delta_for(player)).sum(),
    })
}

fn recent_match(player: &str, record: &MatchRecord) -> Option<RecentMatch> {
    let side = record.side_of(player)?;
    Some(RecentMatch {
        match_id: record.id,
        date: record.date,
        outcome: record.outcome_for(player)?,
        partners: record.partners_of(player).into_iter().cloned().collect(),
        opponents: record.opponents_of(player).to_vec(),
        score: record.score_string(side),
        delta: record.delta_for(player),
    })
}

fn head_to_head(player: &str, opponent: &str, window: &[&MatchRecord]) -> HeadToHead {
    let mut matches = WinLoss::default();
    let mut sets = WinLoss::default();
    let mut last_meeting = None;

    for record in window {
        let Some(side) = record.side_of(player) else {
            continue;
        };
        if record.side_of(opponent) != Some(side.opposite()) {
            continue;
        }

        matches.record(record.winner == side);
        for set in &record.sets {
            if let Some(set_winner) = set.winner() {
                sets.record(set_winner == side);
            }
        }
        last_meeting = recent_match(player, record);
    }

    HeadToHead {
        opponent: opponent.to_string(),
        matches,
        sets,
        last_meeting,
    }
}

/// Winning and losing side of `record`
pub(crate) fn winners_and_losers(record: &MatchRecord) -> (&[PlayerId], &[PlayerId]) {
    (
        record.side(record.winner),
        record.side(record.winner.opposite()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{RatingCalculator, TennisEloCalculator};
    use crate::types::{MatchRequest, SetScore};
    use chrono::{NaiveDate, TimeZone, Utc};

    struct Camp {
        registry: PlayerRegistry,
        log: Vec<MatchRecord>,
        settings: StatsSettings,
    }

    impl Camp {
        fn new(players: &[(&str, f64)]) -> Self {
            let created = Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap();
            let mut registry = PlayerRegistry::new();
            for (name, rating) in players {
                registry.add_player(name, *rating, *rating, created).unwrap();
            }
            Self {
                registry,
                log: Vec::new(),
                settings: StatsSettings::default(),
            }
        }

        fn play(&mut self, day: u32, request: MatchRequest) {
            let calc = TennisEloCalculator::default();
            let pre = self
                .registry
                .snapshot(request.mode, request.participants())
                .unwrap();
            let outcome = calc.calculate_match(&request, &pre).unwrap();
            let timestamp = Utc
                .with_ymd_and_hms(2025, 7, day, 10, self.log.len() as u32, 0)
                .unwrap();
            self.registry
                .apply_outcome(&request, &outcome, timestamp.date_naive(), 6)
                .unwrap();
            self.log.push(outcome.to_record(&request, timestamp));
        }

        fn stats(&self) -> StatsAggregator<'_> {
            StatsAggregator::new(&self.registry, &self.log, &self.settings, 6)
        }
    }

    fn singles(a: &str, b: &str, sets: &[(u32, u32)]) -> MatchRequest {
        MatchRequest::singles(
            a,
            b,
            sets.iter().map(|(x, y)| SetScore::normal(*x, *y)).collect(),
        )
    }

    fn sample_camp() -> Camp {
        let mut camp = Camp::new(&[("Alice", 1000.0), ("Bob", 1000.0), ("Cat", 1000.0)]);
        camp.play(1, singles("Alice", "Bob", &[(6, 0), (6, 2)]));
        camp.play(2, singles("Bob", "Alice", &[(6, 4), (6, 4)]));
        camp.play(3, singles("Alice", "Cat", &[(6, 3), (6, 0)]));
        camp.play(4, singles("Alice", "Bob", &[(7, 5), (6, 4)]));
        camp
    }

    #[test]
    fn test_stats_card_full_history() {
        let camp = sample_camp();
        let card = camp
            .stats()
            .stats_card(&StatsQuery::new("Alice", Mode::Singles))
            .unwrap();

        assert_eq!(card.matches, WinLoss { won: 3, lost: 1 });
        assert_eq!(card.sets, WinLoss { won: 6, lost: 2 });
        assert_eq!(card.bagels_given, 2);
        assert_eq!(card.bagels_taken, 0);
        assert_eq!(card.current_streak, 2);
        assert_eq!(card.longest_streak, 2);
        assert_eq!(card.form_string(), "WLWW");

        // Newest first
        assert_eq!(card.recent_matches[0].opponent_label(), "Bob");
        assert_eq!(card.recent_matches[0].score, "7-5, 6-4");
        assert_eq!(card.recent_matches[2].score, "4-6, 4-6");

        let momentum = card.momentum.unwrap();
        assert_eq!(momentum.start_rating, 1000.0);
        assert!((momentum.end_rating - card.current_rating).abs() < 1e-9);
        assert!((momentum.delta - (card.current_rating - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_stats_card_last_window() {
        let camp = sample_camp();
        let query = StatsQuery::new("Alice", Mode::Singles).with_window(Window::last(2));
        let card = camp.stats().stats_card(&query).unwrap();

        assert_eq!(card.matches, WinLoss { won: 2, lost: 0 });
        assert_eq!(card.bagels_given, 1);
        assert_eq!(card.recent_matches.len(), 2);

        let since = Window::since(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
        let card = camp
            .stats()
            .stats_card(&StatsQuery::new("Alice", Mode::Singles).with_window(since))
            .unwrap();
        assert_eq!(card.matches.total(), 3);
    }

    #[test]
    fn test_stats_card_head_to_head() {
        let camp = sample_camp();
        let query = StatsQuery::new("Alice", Mode::Singles).against("Bob");
        let h2h = camp.stats().stats_card(&query).unwrap().head_to_head.unwrap();

        assert_eq!(h2h.matches, WinLoss { won: 2, lost: 1 });
        assert_eq!(h2h.sets, WinLoss { won: 4, lost: 2 });
        let last = h2h.last_meeting.unwrap();
        assert_eq!(last.outcome, Outcome::Win);
        assert_eq!(last.score, "7-5, 6-4");
    }

    #[test]
    fn test_head_to_head_ignores_partners() {
        let mut camp = Camp::new(&[
            ("Ann", 1000.0),
            ("Ben", 1000.0),
            ("Cat", 1000.0),
            ("Dan", 1000.0),
        ]);
        let sets = vec![SetScore::normal(6, 3)];
        camp.play(1, MatchRequest::doubles(["Ann", "Ben"], ["Cat", "Dan"], sets.clone()));
        camp.play(2, MatchRequest::doubles(["Ann", "Cat"], ["Ben", "Dan"], sets));

        let query = StatsQuery::new("Ann", Mode::Doubles).against("Ben");
        let card = camp.stats().stats_card(&query).unwrap();
        let h2h = card.head_to_head.unwrap();
        assert_eq!(h2h.matches, WinLoss { won: 1, lost: 0 });
        assert_eq!(card.recent_matches[1].partners, vec!["Ben".to_string()]);
        assert_eq!(card.recent_matches[1].opponent_label(), "Cat & Dan");
    }

    #[test]
    fn test_stats_card_errors() {
        let camp = sample_camp();
        let stats = camp.stats();

        let err = stats
            .stats_card(&StatsQuery::new("Zed", Mode::Singles))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CampError>(),
            Some(CampError::UnknownPlayer { .. })
        ));

        let err = stats
            .stats_card(&StatsQuery::new("Alice", Mode::Singles).against("Zed"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CampError>(),
            Some(CampError::UnknownPlayer { .. })
        ));

        let err = stats
            .stats_card(&StatsQuery::new("Alice", Mode::Singles).with_window(Window::last(0)))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CampError>(),
            Some(CampError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_stats_card_without_matches() {
        let camp = sample_camp();
        let card = camp
            .stats()
            .stats_card(&StatsQuery::new("Cat", Mode::Doubles))
            .unwrap();
        assert_eq!(card.matches.total(), 0);
        assert!(card.momentum.is_none());
        assert!(card.recent_form.is_empty());
    }

    #[test]
    fn test_recomputation_is_stable() {
        let camp = sample_camp();
        let query = StatsQuery::new("Bob", Mode::Singles).against("Alice");
        let first = camp.stats().stats_card(&query).unwrap();
        let second = camp.stats().stats_card(&query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_leaderboard_and_streaks() {
        let camp = sample_camp();
        let stats = camp.stats();

        let board = stats.leaderboard(Mode::Singles, Some(2));
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].player, "Alice");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].matches, WinLoss { won: 3, lost: 1 });

        let streaks = stats.active_streaks(Mode::Singles);
        assert_eq!(streaks[0].player, "Alice");
        assert_eq!(streaks[0].current, 2);
        assert_eq!(streaks.len(), 3);
    }

    #[test]
    fn test_movers_windowed_per_player() {
        let camp = sample_camp();
        let movers = camp.stats().movers(Mode::Singles, None).unwrap();

        assert_eq!(movers.len(), 3);
        assert_eq!(movers[0].player, "Alice");
        let total: f64 = movers.iter().map(|m| m.delta).sum();
        assert!(total.abs() < 1e-9);

        let recent = camp
            .stats()
            .movers(Mode::Singles, Some(Window::last(1)))
            .unwrap();
        assert!(recent.iter().all(|m| m.matches == 1));

        let doubles = camp.stats().movers(Mode::Doubles, None).unwrap();
        assert!(doubles.is_empty());
    }
}
