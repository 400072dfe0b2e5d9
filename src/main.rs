//! Command-line entry point for the Elo Camp rating tracker
//!
//! Every invocation loads the configuration, opens the file-backed stores,
//! runs one command and exits. Reports go to stdout, logs to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use elo_camp::config::AppConfig;
use elo_camp::report::{
    InsightsView, LeaderboardView, MoversView, PlayerView, RecordedView, StatsCardView,
    StreaksView,
};
use elo_camp::service::CampService;
use elo_camp::stats::{StatsQuery, Window};
use elo_camp::types::{MatchRequest, Mode, SetScore};
use elo_camp::utils::{parse_date, today};
use elo_camp::CampError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Elo Camp - set-level tennis ratings for singles and doubles
#[derive(Parser)]
#[command(
    name = "elo-camp",
    version,
    about = "Track singles and doubles tennis ratings at a training camp",
    long_about = "Elo Camp rates every set with a margin-of-victory Elo model, adds a \
                 match-win bonus, and keeps per-player stats, streaks and daily insights \
                 in a JSON player store and a JSON Lines match log."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, value_name = "DIR", global = true, help = "Directory holding the data files")]
    data_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMode {
    Singles,
    Doubles,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Singles => Mode::Singles,
            CliMode::Doubles => Mode::Doubles,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Register a new player
    AddPlayer {
        name: String,
        /// Starting singles rating
        #[arg(long)]
        singles: Option<f64>,
        /// Starting doubles rating
        #[arg(long)]
        doubles: Option<f64>,
    },
    /// Record a singles match, e.g. `record-singles Alice Bob 6-3 4-6 10-8[tiebreak]`
    RecordSingles {
        player_a: String,
        player_b: String,
        #[arg(required = true, value_name = "SETS")]
        sets: Vec<String>,
    },
    /// Record a doubles match
    RecordDoubles {
        a1: String,
        a2: String,
        b1: String,
        b2: String,
        #[arg(required = true, value_name = "SETS")]
        sets: Vec<String>,
    },
    /// Show a player's ratings and counters
    ShowPlayer { name: String },
    /// Show the rating leaderboard
    Leaderboard {
        #[arg(long, value_enum, default_value = "singles")]
        mode: CliMode,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show a player's stats card
    Stats {
        name: String,
        #[arg(long, value_enum, default_value = "singles")]
        mode: CliMode,
        /// Only the last N matches
        #[arg(long)]
        last: Option<usize>,
        /// Only matches on or after YYYY-MM-DD
        #[arg(long)]
        since: Option<String>,
        /// Head-to-head against this opponent
        #[arg(long)]
        h2h: Option<String>,
    },
    /// Leaderboard with optional movers and streak tables
    StatsLeaderboard {
        #[arg(long, value_enum, default_value = "singles")]
        mode: CliMode,
        #[arg(long)]
        top: Option<usize>,
        /// Show biggest movers and droppers
        #[arg(long)]
        momentum: bool,
        /// Show active win streaks
        #[arg(long)]
        streaks: bool,
        /// Movers window: last N matches per player
        #[arg(long)]
        last: Option<usize>,
        /// Movers window: matches on or after YYYY-MM-DD
        #[arg(long)]
        since: Option<String>,
    },
    /// Write the daily insights report
    Insights {
        /// Day to report on (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Output file (defaults to insights_<date>.txt)
        #[arg(long)]
        outfile: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    elo_camp::config::validate_config(&config)?;
    Ok(config)
}

fn parse_sets(tokens: &[String]) -> Result<Vec<SetScore>> {
    tokens
        .iter()
        .map(|token| token.parse::<SetScore>().map_err(anyhow::Error::from))
        .collect()
}

fn window_from(last: Option<usize>, since: Option<&str>) -> Result<Window> {
    let window = Window {
        since: since.map(parse_date).transpose()?,
        last,
    };
    window.validate()?;
    Ok(window)
}

fn run(command: Command, config: AppConfig) -> Result<()> {
    if let Command::Config = command {
        println!("{}", toml::to_string_pretty(&config)?);
        let service = CampService::open(config)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&service.calculator().config())?
        );
        return Ok(());
    }

    let top_default = config.stats.default_top;
    let mut service = CampService::open(config)?;

    match command {
        Command::AddPlayer {
            name,
            singles,
            doubles,
        } => {
            let entry = service.add_player(&name, singles, doubles)?;
            println!(
                "Added {} (singles {:.1}, doubles {:.1})",
                entry.name, entry.singles.rating, entry.doubles.rating
            );
        }
        Command::RecordSingles {
            player_a,
            player_b,
            sets,
        } => {
            let request = MatchRequest::singles(&player_a, &player_b, parse_sets(&sets)?);
            let recorded = service.record_match(request)?;
            println!("{}", RecordedView(&recorded));
        }
        Command::RecordDoubles {
            a1,
            a2,
            b1,
            b2,
            sets,
        } => {
            let request = MatchRequest::doubles(
                [a1.as_str(), a2.as_str()],
                [b1.as_str(), b2.as_str()],
                parse_sets(&sets)?,
            );
            let recorded = service.record_match(request)?;
            println!("{}", RecordedView(&recorded));
        }
        Command::ShowPlayer { name } => {
            let entry = service.player(&name)?;
            println!("{}", PlayerView(&entry));
        }
        Command::Leaderboard { mode, top } => {
            let mode = Mode::from(mode);
            let rows = service.leaderboard(mode, top)?;
            println!("{}", LeaderboardView { mode, rows: &rows });
        }
        Command::Stats {
            name,
            mode,
            last,
            since,
            h2h,
        } => {
            let mut query = StatsQuery::new(&name, mode.into())
                .with_window(window_from(last, since.as_deref())?);
            query.h2h = h2h;
            let card = service.stats_card(&query)?;
            println!("{}", StatsCardView(&card));
        }
        Command::StatsLeaderboard {
            mode,
            top,
            momentum,
            streaks,
            last,
            since,
        } => {
            let mode = Mode::from(mode);
            let top = top.unwrap_or(top_default);
            let rows = service.leaderboard(mode, Some(top))?;
            println!("{}", LeaderboardView { mode, rows: &rows });

            if momentum {
                let window = if last.is_none() && since.is_none() {
                    None
                } else {
                    Some(window_from(last, since.as_deref())?)
                };
                let movers = service.movers(mode, window)?;
                println!("\n{}", MoversView { movers: &movers, top });
            }
            if streaks {
                let rows = service.active_streaks(mode)?;
                println!("\n{}", StreaksView { streaks: &rows, top });
            }
        }
        Command::Insights { date, outfile } => {
            let date = match date {
                Some(value) => parse_date(&value)?,
                None => today(),
            };
            let insights = service.insights(date)?;
            let path = outfile.unwrap_or_else(|| PathBuf::from(format!("insights_{}.txt", date)));
            std::fs::write(&path, format!("{}\n", InsightsView(&insights))).map_err(|e| {
                CampError::Storage {
                    message: format!("Failed to write {}: {}", path.display(), e),
                }
            })?;
            info!("Wrote insights for {} to {}", date, path.display());
            println!("Wrote {}", path.display());
        }
        Command::Config => {}
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
    debug!("Effective configuration: {:?}", config);

    if let Err(e) = run(args.command, config) {
        match e.downcast_ref::<CampError>() {
            Some(camp_error) => eprintln!("error[{}]: {}", camp_error.kind(), camp_error),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}
