//! Daily camp insights
//!
//! A one-day digest: leaderboards, who rose and who slid, live streaks, totals,
//! every match played that day, upsets and new peaks.

use crate::rating::probability::expected_score;
use crate::stats::aggregator::{sort_movers, winners_and_losers, StatsAggregator};
use crate::stats::card::{LeaderboardRow, Mover, StreakRow};
use crate::types::{MatchId, MatchRecord, Mode, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Per-mode sections of the digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDay {
    pub mode: Mode,
    /// Whole roster by current rating
    pub leaderboard: Vec<LeaderboardRow>,
    /// Gained rating today, biggest first
    pub risers: Vec<Mover>,
    /// Lost rating today, biggest drop first
    pub sliders: Vec<Mover>,
    pub streaks: Vec<StreakRow>,
}

/// Counts over the day's matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub singles_matches: usize,
    pub doubles_matches: usize,
    pub sets: usize,
    pub tiebreaks: usize,
    pub bagels: usize,
    /// Distinct players who took the court
    pub participants: usize,
}

/// A match line from the winner's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub mode: Mode,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub score: String,
    /// Summed change of the winning side
    pub winner_delta: f64,
    pub decided_by_tiebreak: bool,
    pub comeback_win: bool,
}

impl From<&MatchRecord> for MatchSummary {
    fn from(record: &MatchRecord) -> Self {
        let (winners, losers) = winners_and_losers(record);
        Self {
            match_id: record.id,
            mode: record.mode,
            winners: winners.to_vec(),
            losers: losers.to_vec(),
            score: record.score_string(record.winner),
            winner_delta: record.side_delta(record.winner),
            decided_by_tiebreak: record.decided_by_tiebreak,
            comeback_win: record.comeback_win,
        }
    }
}

/// A win the ratings did not see coming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upset {
    pub summary: MatchSummary,
    pub winner_rating: f64,
    pub loser_rating: f64,
    /// Winner's pre-match expectation
    pub winner_expectation: f64,
}

/// A new career peak reached on the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub player: PlayerId,
    pub mode: Mode,
    pub peak_rating: f64,
}

/// Everything in a daily insights report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInsights {
    pub date: NaiveDate,
    pub modes: Vec<ModeDay>,
    pub totals: DailyTotals,
    pub matches: Vec<MatchSummary>,
    pub upsets: Vec<Upset>,
    pub milestones: Vec<Milestone>,
}

impl<'a> StatsAggregator<'a> {
    /// Build the digest for `date`
    pub fn insights(&self, date: NaiveDate) -> DailyInsights {
        let day: Vec<&MatchRecord> = self.matches.iter().filter(|m| m.date == date).collect();
        debug!("Building insights for {} over {} matches", date, day.len());

        let modes = Mode::ALL
            .into_iter()
            .map(|mode| {
                let (risers, sliders) = day_movers(&day, mode);
                ModeDay {
                    mode,
                    leaderboard: self.leaderboard(mode, Some(self.registry.len())),
                    risers,
                    sliders,
                    streaks: self.active_streaks(mode),
                }
            })
            .collect();

        let upsets = day
            .iter()
            .filter_map(|record| self.upset(record))
            .collect();

        let day_matches = &day;
        let mut milestones: Vec<Milestone> = self
            .registry
            .iter()
            .flat_map(move |entry| {
                Mode::ALL.into_iter().filter_map(move |mode| {
                    let profile = entry.profile(mode);
                    let reached = profile.peak_date == date
                        && day_matches
                            .iter()
                            .filter(|record| record.mode == mode)
                            .any(|record| climbed_to(record, &entry.name, profile.peak_rating));
                    reached.then(|| Milestone {
                        player: entry.name.clone(),
                        mode,
                        peak_rating: profile.peak_rating,
                    })
                })
            })
            .collect();
        milestones.sort_by(|a, b| a.player.cmp(&b.player).then(a.mode.cmp(&b.mode)));

        DailyInsights {
            date,
            modes,
            totals: self.totals(&day),
            matches: day.iter().map(|record| MatchSummary::from(*record)).collect(),
            upsets,
            milestones,
        }
    }

    fn totals(&self, day: &[&MatchRecord]) -> DailyTotals {
        let mut totals = DailyTotals::default();
        let mut participants = BTreeSet::new();

        for record in day {
            match record.mode {
                Mode::Singles => totals.singles_matches += 1,
                Mode::Doubles => totals.doubles_matches += 1,
            }
            totals.sets += record.sets.len();
            totals.tiebreaks += record.sets.iter().filter(|s| s.is_tiebreak()).count();
            totals.bagels += record
                .sets
                .iter()
                .filter(|s| s.is_bagel(self.bagel_min_games))
                .count();
            participants.extend(record.side_a.iter().chain(record.side_b.iter()));
        }

        totals.participants = participants.len();
        totals
    }

    fn upset(&self, record: &MatchRecord) -> Option<Upset> {
        let winner_rating = record.side_rating_before(record.winner)?;
        let loser_rating = record.side_rating_before(record.winner.opposite())?;
        let winner_expectation = expected_score(winner_rating, loser_rating);

        let gap = winner_rating + self.settings.upset_rating_gap <= loser_rating;
        let unlikely = winner_expectation <= self.settings.upset_expectation;
        (gap || unlikely).then(|| Upset {
            summary: MatchSummary::from(record),
            winner_rating,
            loser_rating,
            winner_expectation,
        })
    }
}

/// True when `record` lifted `player` to exactly `peak`
fn climbed_to(record: &MatchRecord, player: &str, peak: f64) -> bool {
    match (record.ratings_before.get(player), record.ratings_after.get(player)) {
        (Some(before), Some(after)) => after > before && (after - peak).abs() < 1e-9,
        _ => false,
    }
}

fn day_movers(day: &[&MatchRecord], mode: Mode) -> (Vec<Mover>, Vec<Mover>) {
    let mut totals: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in day.iter().filter(|m| m.mode == mode) {
        for (player, delta) in &record.rating_change {
            let slot = totals.entry(player.as_str()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += delta;
        }
    }

    let mut movers: Vec<Mover> = totals
        .into_iter()
        .map(|(player, (matches, delta))| Mover {
            player: player.to_string(),
            matches,
            delta,
        })
        .collect();
    sort_movers(&mut movers);

    let (risers, mut sliders): (Vec<Mover>, Vec<Mover>) = movers
        .into_iter()
        .filter(|m| m.delta != 0.0)
        .partition(|m| m.delta > 0.0);
    sliders.reverse();
    (risers, sliders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsSettings;
    use crate::rating::{RatingCalculator, TennisEloCalculator};
    use crate::registry::PlayerRegistry;
    use crate::types::{MatchRequest, SetScore};
    use chrono::{TimeZone, Utc};

    fn play(
        registry: &mut PlayerRegistry,
        log: &mut Vec<MatchRecord>,
        day: u32,
        request: MatchRequest,
    ) {
        let pre = registry
            .snapshot(request.mode, request.participants())
            .unwrap();
        let outcome = TennisEloCalculator::default()
            .calculate_match(&request, &pre)
            .unwrap();
        let timestamp = Utc
            .with_ymd_and_hms(2025, 7, day, 9, log.len() as u32, 0)
            .unwrap();
        registry
            .apply_outcome(&request, &outcome, timestamp.date_naive(), 6)
            .unwrap();
        log.push(outcome.to_record(&request, timestamp));
    }

    fn camp_day() -> (PlayerRegistry, Vec<MatchRecord>) {
        let created = Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap();
        let mut registry = PlayerRegistry::new();
        for (name, rating) in [("Alice", 1200.0), ("Bob", 1000.0), ("Cat", 1000.0), ("Dan", 1000.0)] {
            registry.add_player(name, rating, rating, created).unwrap();
        }

        let mut log = Vec::new();
        // Yesterday
        play(
            &mut registry,
            &mut log,
            1,
            MatchRequest::singles("Cat", "Dan", vec![SetScore::normal(6, 2)]),
        );
        // Today: an upset, a bagel, a doubles match decided in a tiebreak
        play(
            &mut registry,
            &mut log,
            2,
            MatchRequest::singles(
                "Bob",
                "Alice",
                vec![SetScore::normal(6, 0), SetScore::normal(6, 4)],
            ),
        );
        play(
            &mut registry,
            &mut log,
            2,
            MatchRequest::doubles(
                ["Alice", "Bob"],
                ["Cat", "Dan"],
                vec![
                    SetScore::normal(4, 6),
                    SetScore::normal(6, 3),
                    SetScore::tiebreak(10, 8),
                ],
            ),
        );
        (registry, log)
    }

    #[test]
    fn test_daily_totals() {
        let (registry, log) = camp_day();
        let settings = StatsSettings::default();
        let insights = StatsAggregator::new(&registry, &log, &settings, 6)
            .insights(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());

        assert_eq!(
            insights.totals,
            DailyTotals {
                singles_matches: 1,
                doubles_matches: 1,
                sets: 5,
                tiebreaks: 1,
                bagels: 1,
                participants: 4,
            }
        );
        assert_eq!(insights.matches.len(), 2);

        let doubles = &insights.matches[1];
        assert_eq!(doubles.winners, vec!["Alice".to_string(), "Bob".to_string()]);
        assert!(doubles.decided_by_tiebreak);
        assert!(doubles.comeback_win);
        assert_eq!(doubles.score, "4-6, 6-3, 10-8[tiebreak]");
    }

    #[test]
    fn test_upsets_and_movers() {
        let (registry, log) = camp_day();
        let settings = StatsSettings::default();
        let insights = StatsAggregator::new(&registry, &log, &settings, 6)
            .insights(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());

        assert_eq!(insights.upsets.len(), 1);
        let upset = &insights.upsets[0];
        assert_eq!(upset.summary.winners, vec!["Bob".to_string()]);
        assert_eq!(upset.summary.score, "6-0, 6-4");
        assert!(upset.winner_expectation < 0.35);

        let singles = &insights.modes[0];
        assert_eq!(singles.mode, Mode::Singles);
        assert_eq!(singles.risers[0].player, "Bob");
        assert_eq!(singles.sliders[0].player, "Alice");
        // Yesterday's singles match is not part of today
        assert!(singles.risers.iter().all(|m| m.player != "Cat"));
        assert_eq!(singles.leaderboard.len(), 4);
    }

    #[test]
    fn test_initial_peak_is_not_a_milestone() {
        let created = Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap();
        let mut registry = PlayerRegistry::new();
        registry.add_player("Alice", 1200.0, 1100.0, created).unwrap();
        registry.add_player("Bob", 1000.0, 1000.0, created).unwrap();

        let mut log = Vec::new();
        play(
            &mut registry,
            &mut log,
            1,
            MatchRequest::singles(
                "Alice",
                "Bob",
                vec![SetScore::normal(4, 6), SetScore::normal(3, 6)],
            ),
        );

        let settings = StatsSettings::default();
        let insights = StatsAggregator::new(&registry, &log, &settings, 6)
            .insights(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        assert_eq!(insights.milestones.len(), 1);
        let milestone = &insights.milestones[0];
        assert_eq!(milestone.player, "Bob");
        assert_eq!(milestone.mode, Mode::Singles);
        assert!(milestone.peak_rating > 1000.0);
    }

    #[test]
    fn test_milestones_for_the_day() {
        let (registry, log) = camp_day();
        let settings = StatsSettings::default();
        let stats = StatsAggregator::new(&registry, &log, &settings, 6);

        let today = stats.insights(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
        assert!(today
            .milestones
            .iter()
            .any(|m| m.player == "Bob" && m.mode == Mode::Singles));
        assert!(today.milestones.iter().all(|m| m.player != "Alice" || m.mode != Mode::Singles));

        // Cat and Dan only lost today
        assert!(today
            .milestones
            .iter()
            .all(|m| m.player != "Cat" && m.player != "Dan"));

        let empty = stats.insights(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert!(empty.matches.is_empty());
        assert!(empty.milestones.is_empty());
        assert_eq!(empty.totals, DailyTotals::default());
    }
}
