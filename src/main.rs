//! Skilltrack - command-line front end for the scheduling engine
//!
//! Reads a skill record as JSON (from a file or `-` for stdin), runs one of the
//! engine's call contracts and prints the result as JSON on stdout. Logs go to
//! stderr.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use skilltrack_core::{Quality, SchedulerConfig, SchedulingEngine, SkillRecord};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skilltrack")]
#[command(about = "Spaced-repetition scheduling for skill training", long_about = None)]
#[command(version)]
struct Cli {
    /// Scheduler config file (TOML)
    #[arg(long, global = true, env = "SKILLTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Evaluate as of this instant instead of the current time (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update ease factor, interval, repetitions and next review
    Review {
        /// Skill record JSON file, or - for stdin
        skill: PathBuf,

        /// Practice quality (1-4)
        #[arg(short, long, value_parser = parse_quality)]
        quality: Quality,
    },

    /// Advance focus XP
    Focus {
        skill: PathBuf,

        #[arg(short, long, value_parser = parse_quality)]
        quality: Quality,
    },

    /// Commit a level increase
    LevelUp {
        skill: PathBuf,

        /// New level
        #[arg(short, long)]
        level: u32,
    },

    /// Check automatic phase transitions
    Transition { skill: PathBuf },

    /// Run a full practice event: retention, focus XP and transitions
    Practice {
        skill: PathBuf,

        #[arg(short, long, value_parser = parse_quality)]
        quality: Quality,
    },

    /// Show the normalized record and any substituted defaults
    Normalize { skill: PathBuf },

    /// Training calendar queries
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
}

#[derive(Subcommand)]
enum CalendarAction {
    /// Whether a date falls on a training day
    IsTrainingDay { date: DateTime<Utc> },

    /// First training day after a date
    Next { date: DateTime<Utc> },

    /// Last training day before a date
    Previous { date: DateTime<Utc> },

    /// Add weeks and snap forward to a training day
    AddWeeks { date: DateTime<Utc>, weeks: u32 },

    /// Count training days in [start, end)
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

fn parse_quality(s: &str) -> Result<Quality, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number between 1 and 4", s))?;
    Quality::try_from(value).map_err(|e| e.to_string())
}

fn load_config(cli_path: Option<&Path>) -> anyhow::Result<SchedulerConfig> {
    if let Some(path) = cli_path {
        return SchedulerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()));
    }

    match SchedulerConfig::default_path() {
        Some(path) if path.exists() => {
            debug!("Using config at {}", path.display());
            SchedulerConfig::from_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        _ => {
            debug!("No config file found, using defaults");
            Ok(SchedulerConfig::default())
        }
    }
}

fn read_skill(path: &Path) -> anyhow::Result<SkillRecord> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading skill record from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading skill record {}", path.display()))?
    };

    serde_json::from_str(&contents).context("parsing skill record JSON")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "skilltrack={level},skilltrack_core={level}",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries JSON only
        .init();

    debug!("skilltrack v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    let calendar = config.calendar()?;
    let engine = SchedulingEngine::from_config(&config, &calendar);
    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command {
        Commands::Review { skill, quality } => {
            let record = read_skill(&skill)?;
            print_json(&engine.update_retention(&record, quality, now))
        }
        Commands::Focus { skill, quality } => {
            let record = read_skill(&skill)?;
            match engine.progress_focus(&record, quality, now) {
                Some(focus_data) => print_json(&focus_data),
                None => print_json(&serde_json::json!({})),
            }
        }
        Commands::LevelUp { skill, level } => {
            let record = read_skill(&skill)?;
            print_json(&engine.level_up(&record, level, now)?)
        }
        Commands::Transition { skill } => {
            let record = read_skill(&skill)?;
            print_json(&engine.check_auto_transition(&record, now))
        }
        Commands::Practice { skill, quality } => {
            let record = read_skill(&skill)?;
            print_json(&engine.record_practice(&record, quality, now))
        }
        Commands::Normalize { skill } => {
            let record = read_skill(&skill)?;
            print_json(&engine.normalize(&record, now))
        }
        Commands::Calendar { action } => match action {
            CalendarAction::IsTrainingDay { date } => print_json(&calendar.is_training_day(date)),
            CalendarAction::Next { date } => print_json(&calendar.next_training_day(date)),
            CalendarAction::Previous { date } => print_json(&calendar.previous_training_day(date)),
            CalendarAction::AddWeeks { date, weeks } => {
                print_json(&calendar.add_weeks_snapped(date, weeks))
            }
            CalendarAction::Between { start, end } => {
                print_json(&calendar.training_days_between(start, end))
            }
        },
    }
}
