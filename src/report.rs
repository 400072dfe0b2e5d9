//! Plain-text rendering of players, stats and insights
//!
//! Each view is a thin `Display` wrapper so callers can print it or write it to
//! a file with the same code.

use crate::registry::PlayerEntry;
use crate::service::RecordedMatch;
use crate::stats::{
    DailyInsights, LeaderboardRow, MatchSummary, Mover, StatsCard, StreakRow, WinLoss,
};
use crate::types::Mode;
use crate::utils::format_delta;
use std::fmt;

/// Capitalized mode name for headings
fn title(mode: Mode) -> &'static str {
    match mode {
        Mode::Singles => "Singles",
        Mode::Doubles => "Doubles",
    }
}

fn pct(tally: &WinLoss) -> String {
    match tally.win_pct() {
        Some(pct) => format!(" ({:.0}%)", pct),
        None => String::new(),
    }
}

/// Both ratings and all-time counters of a player
pub struct PlayerView<'a>(pub &'a PlayerEntry);

impl fmt::Display for PlayerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.0;
        writeln!(f, "{}", entry.name)?;
        for mode in Mode::ALL {
            let profile = entry.profile(mode);
            let c = &profile.counters;
            writeln!(
                f,
                "  {:<8} {:>7.1}  peak {:.1} ({})",
                title(mode),
                profile.rating,
                profile.peak_rating,
                profile.peak_date
            )?;
            writeln!(
                f,
                "           matches {}-{}  sets {}-{}  tiebreaks {}-{}  bagels {}/{}  streak {} (best {})",
                c.matches_won,
                c.matches_lost(),
                c.sets_won,
                c.sets_lost,
                c.tiebreaks_won,
                c.tiebreaks_played - c.tiebreaks_won,
                c.bagels_given,
                c.bagels_taken,
                c.current_win_streak,
                c.best_win_streak
            )?;
        }
        match entry.last_match_date {
            Some(date) => write!(f, "  last played {}", date),
            None => write!(f, "  no matches yet"),
        }
    }
}

/// Confirmation printed after a match is recorded
pub struct RecordedView<'a>(pub &'a RecordedMatch);

impl fmt::Display for RecordedView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.0.record;
        let summary = MatchSummary::from(record);
        writeln!(f, "[{}] {}", title(record.mode), SummaryLine(&summary))?;
        writeln!(
            f,
            "  pre-match expectation for {}: {:.2}",
            record.side_a.join(" & "),
            self.0.outcome.expected_a
        )?;
        for change in &self.0.outcome.rating_changes {
            writeln!(
                f,
                "  {:<12} {:>7.1} -> {:>7.1} ({})",
                change.player_id,
                change.old_rating,
                change.new_rating,
                format_delta(change.delta)
            )?;
        }
        write!(f, "  match bonus {:.1}", self.0.outcome.match_bonus)
    }
}

/// Rating table for one mode
pub struct LeaderboardView<'a> {
    pub mode: Mode,
    pub rows: &'a [LeaderboardRow],
}

impl fmt::Display for LeaderboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Leaderboard:", title(self.mode))?;
        if self.rows.is_empty() {
            return write!(f, "  (no players)");
        }
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:>3}. {:<12} {:>7.1}  (peak {:.1}, {})",
                row.rank, row.player, row.rating, row.peak_rating, row.matches
            )?;
        }
        Ok(())
    }
}

/// Biggest gainers and droppers
pub struct MoversView<'a> {
    pub movers: &'a [Mover],
    pub top: usize,
}

impl fmt::Display for MoversView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Biggest Movers:")?;
        for (rank, mover) in self.movers.iter().take(self.top).enumerate() {
            writeln!(
                f,
                " +{}) {:<12} {} over {}",
                rank + 1,
                mover.player,
                format_delta(mover.delta),
                mover.matches
            )?;
        }
        write!(f, "\nBiggest Droppers:")?;
        for (rank, mover) in self.movers.iter().rev().take(self.top).enumerate() {
            write!(
                f,
                "\n -{}) {:<12} {} over {}",
                rank + 1,
                mover.player,
                format_delta(mover.delta),
                mover.matches
            )?;
        }
        Ok(())
    }
}

/// Current win streaks
pub struct StreaksView<'a> {
    pub streaks: &'a [StreakRow],
    pub top: usize,
}

impl fmt::Display for StreaksView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Active Win Streaks:")?;
        for (i, row) in self.streaks.iter().take(self.top).enumerate() {
            write!(
                f,
                "\n {:>2}. {:<12} {} (best {})",
                i + 1,
                row.player,
                row.current,
                row.best
            )?;
        }
        Ok(())
    }
}

/// Stats card for one player
pub struct StatsCardView<'a>(pub &'a StatsCard);

impl fmt::Display for StatsCardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.0;
        writeln!(f, "{} - {} ({})", card.player, title(card.mode), card.window)?;
        writeln!(
            f,
            "Rating {:.2} | Peak {:.2} ({})",
            card.current_rating, card.peak_rating, card.peak_date
        )?;
        writeln!(f, "Matches {} | Sets {}", card.matches, card.sets)?;
        writeln!(
            f,
            "Streak {} (Longest {})",
            card.current_streak, card.longest_streak
        )?;
        writeln!(f, "Tiebreaks {}{}", card.tiebreaks, pct(&card.tiebreaks))?;
        writeln!(
            f,
            "Bagels {} given / {} taken",
            card.bagels_given, card.bagels_taken
        )?;
        match &card.momentum {
            Some(m) => writeln!(
                f,
                "Momentum {} ({:.1} -> {:.1})",
                format_delta(m.delta),
                m.start_rating,
                m.end_rating
            )?,
            None => writeln!(f, "Momentum -")?,
        }
        writeln!(f, "Form {}", card.form_string())?;

        write!(f, "Recent:")?;
        for game in &card.recent_matches {
            let mut label = game.opponent_label();
            if !game.partners.is_empty() {
                label = format!("{} (with {})", label, game.partners.join(" & "));
            }
            write!(
                f,
                "\n  {} {} vs {:<24} {:<28} ({})",
                game.date,
                game.outcome.token(),
                label,
                game.score,
                format_delta(game.delta)
            )?;
        }

        if let Some(h2h) = &card.head_to_head {
            write!(f, "\n\nHead-to-head vs {}:", h2h.opponent)?;
            write!(f, "\n  Matches {} | Sets {}", h2h.matches, h2h.sets)?;
            if let Some(last) = &h2h.last_meeting {
                write!(
                    f,
                    "\n  Last: {} {} on {} ({})",
                    last.outcome.token(),
                    last.score,
                    last.date,
                    format_delta(last.delta)
                )?;
            }
        }
        Ok(())
    }
}

struct SummaryLine<'a>(&'a MatchSummary);

impl fmt::Display for SummaryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "{} def. {}  {}  (Δ {})",
            m.winners.join(" & "),
            m.losers.join(" & "),
            m.score,
            format_delta(m.winner_delta)
        )?;
        let flags: Vec<&str> = [
            (m.decided_by_tiebreak, "TB decider"),
            (m.comeback_win, "comeback"),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, flag)| *flag)
        .collect();
        if !flags.is_empty() {
            write!(f, " ({})", flags.join(", "))?;
        }
        Ok(())
    }
}

/// Full daily insights report
pub struct InsightsView<'a>(pub &'a DailyInsights);

impl fmt::Display for InsightsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let insights = self.0;
        let heading = format!("Insights - {}", insights.date);
        writeln!(f, "{}", heading)?;
        writeln!(f, "{}", "=".repeat(heading.len()))?;

        for day in &insights.modes {
            writeln!(f)?;
            writeln!(
                f,
                "{}",
                LeaderboardView {
                    mode: day.mode,
                    rows: &day.leaderboard
                }
            )?;
        }

        for day in &insights.modes {
            writeln!(f)?;
            writeln!(f, "Top Risers ({}, today):", title(day.mode))?;
            if day.risers.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for (rank, m) in day.risers.iter().enumerate() {
                writeln!(f, " {:>2}. {:<12} {}", rank + 1, m.player, format_delta(m.delta))?;
            }
            writeln!(f, "Top Sliders ({}, today):", title(day.mode))?;
            if day.sliders.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for (rank, m) in day.sliders.iter().enumerate() {
                writeln!(f, " {:>2}. {:<12} {}", rank + 1, m.player, format_delta(m.delta))?;
            }
        }

        for day in &insights.modes {
            writeln!(f)?;
            writeln!(f, "Active Win Streaks ({}):", title(day.mode))?;
            let live: Vec<&StreakRow> = day.streaks.iter().filter(|s| s.current > 0).collect();
            if live.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for row in live {
                writeln!(f, "  {:<12} {}", row.player, row.current)?;
            }
        }

        let t = &insights.totals;
        writeln!(f)?;
        writeln!(f, "Daily Stats:")?;
        writeln!(f, "  Singles matches: {}", t.singles_matches)?;
        writeln!(f, "  Doubles matches: {}", t.doubles_matches)?;
        writeln!(f, "  Sets played: {}", t.sets)?;
        writeln!(f, "  Tiebreaks: {}", t.tiebreaks)?;
        writeln!(f, "  Bagels: {}", t.bagels)?;
        writeln!(f, "  Participants: {}", t.participants)?;

        writeln!(f)?;
        writeln!(f, "Highlights:")?;
        if insights.upsets.is_empty() {
            writeln!(f, "  (no upsets)")?;
        }
        for upset in &insights.upsets {
            writeln!(
                f,
                "  {} upset: {} (pre-match E={:.2}, {:.0} vs {:.0})",
                title(upset.summary.mode),
                SummaryLine(&upset.summary),
                upset.winner_expectation,
                upset.winner_rating,
                upset.loser_rating
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Milestones:")?;
        if insights.milestones.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for m in &insights.milestones {
            writeln!(f, "  {}: new {} peak {:.1}", m.player, m.mode, m.peak_rating)?;
        }

        writeln!(f)?;
        write!(f, "Match Log:")?;
        if insights.matches.is_empty() {
            write!(f, "\n  (no matches)")?;
        }
        for m in &insights.matches {
            write!(f, "\n  [{}] {}", title(m.mode), SummaryLine(m))?;
        }
        Ok(())
    }
}
