//! Integration tests for the camp rating tracker
//!
//! These tests drive the service end to end:
//! - Recording singles and doubles matches into both stores
//! - Stats cards, head-to-head and windows over the match log
//! - File-backed persistence across service instances
//! - All-or-nothing recording when a store fails

mod fixtures;

use chrono::NaiveDate;
use elo_camp::error::CampError;
use elo_camp::report::InsightsView;
use elo_camp::service::CampService;
use elo_camp::stats::{StatsQuery, WinLoss, Window};
use elo_camp::storage::{MatchLog, PlayerStore};
use elo_camp::types::{MatchRequest, Mode, Side};

use fixtures::{at, camp_week, file_camp, file_config, memory_camp, mock_camp, sets};

fn camp_error(err: &anyhow::Error) -> Option<&CampError> {
    err.downcast_ref::<CampError>()
}

#[test]
fn test_singles_scenario_from_scoreboard() {
    let mut camp = memory_camp();

    let recorded = camp
        .record_match_at(
            MatchRequest::singles("Alice", "Bob", sets(&["6-4", "6-7[tiebreak]", "7-5"])),
            at(1, 0),
        )
        .unwrap();
    let record = &recorded.record;
    assert_eq!(record.winner, Side::A);
    assert_eq!((record.sets_won_a, record.sets_won_b), (2, 1));
    assert!(!record.decided_by_tiebreak);
    assert!(!record.comeback_win);
    assert!((recorded.outcome.expected_a - 0.7597).abs() < 1e-3);

    let recorded = camp
        .record_match_at(
            MatchRequest::singles("Alice", "Bob", sets(&["4-6", "6-3", "7-6[tiebreak]"])),
            at(1, 30),
        )
        .unwrap();
    assert!(recorded.record.decided_by_tiebreak);
    assert!(recorded.record.comeback_win);
}

#[test]
fn test_every_match_is_zero_sum() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let before: f64 = fixtures::ROSTER.iter().map(|(_, s, d)| s + d).sum();
    let registry = camp.registry().unwrap();
    let after: f64 = registry
        .iter()
        .map(|p| p.rating(Mode::Singles) + p.rating(Mode::Doubles))
        .sum();
    assert!((before - after).abs() < 1e-6);

    for record in camp.matches().unwrap() {
        let net: f64 = record.rating_change.values().sum();
        assert!(net.abs() < 1e-9, "match {} not zero-sum", record.id);
    }
}

#[test]
fn test_doubles_partners_move_together() {
    let mut camp = memory_camp();
    let recorded = camp
        .record_match(MatchRequest::doubles(
            ["Alice", "Dan"],
            ["Bob", "Cat"],
            sets(&["6-3", "6-4"]),
        ))
        .unwrap();

    let change = &recorded.record.rating_change;
    assert!((change["Alice"] - change["Dan"]).abs() < 1e-9);
    assert!((change["Bob"] - change["Cat"]).abs() < 1e-9);
    assert!(change["Alice"] > 0.0);

    // Singles ratings are untouched by doubles
    assert_eq!(camp.player("Alice").unwrap().rating(Mode::Singles), 1200.0);
}

#[test]
fn test_bagels_counted_once_per_set() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let dan = camp.player("Dan").unwrap();
    let counters = dan.counters(Mode::Singles);
    assert_eq!(counters.bagels_given, 2);
    assert_eq!(counters.bagels_taken, 1);

    let card = camp
        .stats_card(&StatsQuery::new("Dan", Mode::Singles))
        .unwrap();
    assert_eq!(card.bagels_given, 2);
    assert_eq!(card.bagels_taken, 1);
}

#[test]
fn test_stats_card_matches_registry_counters() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    for name in ["Alice", "Bob", "Cat", "Dan"] {
        for mode in Mode::ALL {
            let card = camp.stats_card(&StatsQuery::new(name, mode)).unwrap();
            let entry = camp.player(name).unwrap();
            let counters = entry.counters(mode);

            assert_eq!(card.matches.won, counters.matches_won);
            assert_eq!(card.matches.total(), counters.matches_played);
            assert_eq!(card.sets.won, counters.sets_won);
            assert_eq!(card.sets.lost, counters.sets_lost);
            assert_eq!(card.tiebreaks.total(), counters.tiebreaks_played);
            assert_eq!(card.current_streak, counters.current_win_streak);
            assert_eq!(card.longest_streak, counters.best_win_streak);
        }
    }
}

#[test]
fn test_level_sets_are_not_losses() {
    let mut camp = memory_camp();
    camp.record_match(MatchRequest::singles(
        "Alice",
        "Bob",
        sets(&["6-6", "6-3", "6-2"]),
    ))
    .unwrap();

    for name in ["Alice", "Bob"] {
        let counters = camp.player(name).unwrap().counters(Mode::Singles).clone();
        let card = camp.stats_card(&StatsQuery::new(name, Mode::Singles)).unwrap();
        assert_eq!(counters.sets_played, 3);
        assert_eq!(card.sets.won, counters.sets_won);
        assert_eq!(card.sets.lost, counters.sets_lost);
    }
    let bob = camp.player("Bob").unwrap();
    assert_eq!(bob.counters(Mode::Singles).sets_lost, 2);
}

#[test]
fn test_huge_set_score_is_recorded_without_overflow() {
    let mut camp = memory_camp();
    let recorded = camp
        .record_match(MatchRequest::singles(
            "Alice",
            "Bob",
            sets(&["4294967295-1"]),
        ))
        .unwrap();

    assert_eq!(recorded.record.winner, Side::A);
    assert!(recorded.outcome.net_delta().abs() < 1e-6);
}

#[test]
fn test_head_to_head_and_windows() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let card = camp
        .stats_card(&StatsQuery::new("Alice", Mode::Singles).against("Dan"))
        .unwrap();
    let h2h = card.head_to_head.unwrap();
    assert_eq!(h2h.matches, WinLoss { won: 0, lost: 1 });
    assert_eq!(h2h.sets, WinLoss { won: 0, lost: 2 });
    assert_eq!(h2h.last_meeting.unwrap().score, "0-6, 0-6");

    let since = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
    let card = camp
        .stats_card(&StatsQuery::new("Alice", Mode::Singles).with_window(Window::since(since)))
        .unwrap();
    assert_eq!(card.matches, WinLoss { won: 0, lost: 2 });
    assert_eq!(card.form_string(), "LL");

    let err = camp
        .stats_card(&StatsQuery::new("Alice", Mode::Singles).with_window(Window::last(0)))
        .unwrap_err();
    assert!(matches!(
        camp_error(&err),
        Some(CampError::InvalidWindow { .. })
    ));
}

#[test]
fn test_replay_is_idempotent() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let query = StatsQuery::new("Bob", Mode::Doubles).against("Cat");
    assert_eq!(
        camp.stats_card(&query).unwrap(),
        camp.stats_card(&query).unwrap()
    );

    let date = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
    assert_eq!(camp.insights(date).unwrap(), camp.insights(date).unwrap());
}

#[test]
fn test_rejected_inputs_leave_stores_untouched() {
    let mut camp = memory_camp();
    camp_week(&mut camp);
    let registry = camp.registry().unwrap();
    let log_len = camp.matches().unwrap().len();

    let attempts = vec![
        MatchRequest::singles("Alice", "Zed", sets(&["6-0"])),
        MatchRequest::singles("Alice", "Bob", sets(&["6-4", "4-6"])),
        MatchRequest::singles("Alice", "Bob", sets(&["0-0"])),
        MatchRequest::singles("Alice", "Alice", sets(&["6-0"])),
        MatchRequest::doubles(["Alice", "Bob"], ["Bob", "Cat"], sets(&["6-0"])),
        MatchRequest::singles("Alice", "Bob", vec![]),
    ];
    for request in attempts {
        assert!(camp.record_match(request).is_err());
    }

    assert_eq!(camp.registry().unwrap(), registry);
    assert_eq!(camp.matches().unwrap().len(), log_len);

    let err = camp.add_player("Alice", None, None).unwrap_err();
    assert!(matches!(
        camp_error(&err),
        Some(CampError::DuplicatePlayer { .. })
    ));
}

#[test]
fn test_failing_player_store_keeps_log_unchanged() {
    let mut camp = mock_camp();
    camp.record_match(MatchRequest::singles("Alice", "Bob", sets(&["6-2", "6-2"])))
        .unwrap();
    let registry = camp.registry().unwrap();

    camp.player_store_mut().set_fail_saves(true);
    let err = camp
        .record_match(MatchRequest::singles("Cat", "Dan", sets(&["6-2", "6-2"])))
        .unwrap_err();
    assert!(matches!(camp_error(&err), Some(CampError::Storage { .. })));

    assert_eq!(camp.match_log().load_matches().unwrap().len(), 1);
    assert_eq!(camp.player_store().load_players().unwrap(), registry);
}

#[test]
fn test_file_stores_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut camp = file_camp(dir.path());
        camp_week(&mut camp);
    }

    let camp = CampService::open(file_config(dir.path())).unwrap();
    assert_eq!(camp.matches().unwrap().len(), 6);
    assert_eq!(camp.registry().unwrap().len(), 4);

    let history = std::fs::read_to_string(dir.path().join("matches.jsonl")).unwrap();
    assert_eq!(history.lines().count(), 6);

    let card = camp
        .stats_card(&StatsQuery::new("Cat", Mode::Singles))
        .unwrap();
    assert_eq!(card.matches, WinLoss { won: 1, lost: 0 });
    assert!(card.recent_matches[0].score.starts_with("4-6"));
}

#[test]
fn test_movers_and_streaks() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let movers = camp.movers(Mode::Singles, None).unwrap();
    assert_eq!(movers.len(), 4);
    let net: f64 = movers.iter().map(|m| m.delta).sum();
    assert!(net.abs() < 1e-6);
    assert_eq!(movers.last().unwrap().player, "Alice");

    let streaks = camp.active_streaks(Mode::Singles).unwrap();
    let dan = streaks.iter().find(|s| s.player == "Dan").unwrap();
    assert_eq!(dan.current, 1);
}

#[test]
fn test_insights_report_for_a_day() {
    let mut camp = memory_camp();
    camp_week(&mut camp);

    let insights = camp
        .insights(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        .unwrap();
    assert_eq!(insights.totals.singles_matches, 1);
    assert_eq!(insights.totals.doubles_matches, 1);
    assert_eq!(insights.totals.tiebreaks, 1);
    assert_eq!(insights.totals.participants, 4);

    let text = InsightsView(&insights).to_string();
    assert!(text.contains("Alice def. Bob  6-4, 6-3"));
    assert!(text.contains("Alice & Dan def. Bob & Cat"));

    // Dan, rated far below Alice, shutting her out is an upset
    let day3 = camp
        .insights(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap())
        .unwrap();
    assert!(day3
        .upsets
        .iter()
        .any(|u| u.summary.winners == vec!["Dan".to_string()]));
}
