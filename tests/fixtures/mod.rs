//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use elo_camp::config::AppConfig;
use elo_camp::service::CampService;
use elo_camp::storage::{
    InMemoryMatchLog, InMemoryPlayerStore, JsonLinesMatchLog, JsonPlayerStore, MatchLog,
    MockPlayerStore, PlayerStore,
};
use elo_camp::types::{MatchRequest, SetScore};
use std::path::Path;

/// The camp roster used across tests: name, singles, doubles
pub const ROSTER: &[(&str, f64, f64)] = &[
    ("Alice", 1200.0, 1100.0),
    ("Bob", 1000.0, 1000.0),
    ("Cat", 1050.0, 1150.0),
    ("Dan", 950.0, 900.0),
];

pub type MemoryCamp = CampService<InMemoryPlayerStore, InMemoryMatchLog>;
pub type FileCamp = CampService<JsonPlayerStore, JsonLinesMatchLog>;

/// Parse set tokens, panicking on bad test input
pub fn sets(tokens: &[&str]) -> Vec<SetScore> {
    tokens
        .iter()
        .map(|token| token.parse().expect("valid set token in test"))
        .collect()
}

/// Timestamp on day `day` of July 2025, `minute` minutes past ten
pub fn at(day: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, day, 10, minute, 0).unwrap()
}

pub fn with_roster<P: PlayerStore, L: MatchLog>(
    mut service: CampService<P, L>,
) -> CampService<P, L> {
    for (name, singles, doubles) in ROSTER {
        service
            .add_player(name, Some(*singles), Some(*doubles))
            .expect("roster player added");
    }
    service
}

pub fn memory_camp() -> MemoryCamp {
    with_roster(
        CampService::new(
            AppConfig::default(),
            InMemoryPlayerStore::new(),
            InMemoryMatchLog::new(),
        )
        .unwrap(),
    )
}

pub fn file_config(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.to_path_buf();
    config
}

pub fn file_camp(dir: &Path) -> FileCamp {
    with_roster(CampService::open(file_config(dir)).unwrap())
}

pub fn mock_camp() -> CampService<MockPlayerStore, InMemoryMatchLog> {
    with_roster(
        CampService::new(
            AppConfig::default(),
            MockPlayerStore::new(),
            InMemoryMatchLog::new(),
        )
        .unwrap(),
    )
}

/// A small camp week: three days of singles and doubles
pub fn camp_week<P: PlayerStore, L: MatchLog>(service: &mut CampService<P, L>) {
    let schedule: Vec<(u32, MatchRequest)> = vec![
        (1, MatchRequest::singles("Alice", "Bob", sets(&["6-4", "6-3"]))),
        (
            1,
            MatchRequest::doubles(["Alice", "Dan"], ["Bob", "Cat"], sets(&["6-2", "3-6", "10-7[tiebreak]"])),
        ),
        (2, MatchRequest::singles("Bob", "Dan", sets(&["6-0", "6-1"]))),
        (2, MatchRequest::singles("Cat", "Alice", sets(&["4-6", "7-5", "6-4"]))),
        (3, MatchRequest::singles("Dan", "Alice", sets(&["6-0", "6-0"]))),
        (
            3,
            MatchRequest::doubles(["Bob", "Dan"], ["Alice", "Cat"], sets(&["7-6", "6-7", "6-4"])),
        ),
    ];

    for (minute, (day, request)) in schedule.into_iter().enumerate() {
        service
            .record_match_at(request, at(day, minute as u32))
            .expect("scheduled match recorded");
    }
}
