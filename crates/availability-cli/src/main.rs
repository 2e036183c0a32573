//! `freetime` CLI: compute personal and group free time from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Free time for the next 7 days from calendar events (stdin → stdout)
//! cat events.json | freetime free
//!
//! # Pin "now", shorten the horizon, keep slots of an hour or more
//! freetime free -e events.json --now 2026-03-16T10:00 --days 3 --min-duration 60
//!
//! # Common free time for a group, one events file per member
//! freetime group --member alice.json --member bob.json
//!
//! # Intersect previously computed free-slot lists
//! freetime intersect --slots alice-free.json --slots bob-free.json --reference-date 2026-03-16
//!
//! # Use a config file (TOML) and log each computed day
//! freetime --config engine.toml -v free -e events.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use availability_engine::{
    freebusy, wire, EngineConfig, GroupIntersector, HorizonScheduler, MemberFreeTime,
};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Free time within the daily active window, for one user or a group"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with engine settings (offset, active hours, horizon)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override the civil offset from UTC, in minutes
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,

    /// Log each computed day to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one user's free slots from calendar events
    Free {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Reference moment (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Number of days to cover, today included
        #[arg(long)]
        days: Option<u32>,
        /// Drop slots shorter than this many minutes
        #[arg(long)]
        min_duration: Option<i64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute common free slots from each member's calendar events
    Group {
        /// Events JSON file of one member (repeat per member)
        #[arg(long = "member", required = true)]
        members: Vec<String>,
        /// Reference moment shared by all members (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Number of days to cover, today included
        #[arg(long)]
        days: Option<u32>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Intersect already computed free-slot lists
    Intersect {
        /// Free-slot JSON file of one member (repeat per member)
        #[arg(long = "slots", required = true)]
        slots: Vec<String>,
        /// Civil date all lists count their day 0 from (YYYY-MM-DD)
        #[arg(long)]
        reference_date: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(minutes) = cli.utc_offset_minutes {
        config.utc_offset_minutes = minutes;
    }
    config.validate().context("Invalid engine configuration")?;
    let offset = config.offset();

    match cli.command {
        Commands::Free {
            events,
            now,
            days,
            min_duration,
            output,
        } => {
            let json = read_input(events.as_deref())?;
            let events =
                wire::parse_events(&json, offset).context("Failed to parse calendar events")?;
            let now = resolve_now(now.as_deref(), offset)?;

            let scheduler = HorizonScheduler::new(config)?;
            let horizon = days.unwrap_or(scheduler.config().horizon_days);
            let mut slots = scheduler
                .compute_free_time(&events, now, horizon)
                .context("Failed to compute free time")?;
            if let Some(min) = min_duration {
                slots = freebusy::filter_min_duration(&slots, min);
            }

            write_slots(output.as_deref(), &slots, offset)?;
        }
        Commands::Group {
            members,
            now,
            days,
            output,
        } => {
            let now = resolve_now(now.as_deref(), offset)?;
            let horizon = days.unwrap_or(config.horizon_days);
            let scheduler = HorizonScheduler::new(config)?;

            let free_times = members
                .iter()
                .map(|path| -> Result<MemberFreeTime> {
                    let json = read_input(Some(path))?;
                    let events = wire::parse_events(&json, offset)
                        .with_context(|| format!("Failed to parse events in {}", path))?;
                    let member = scheduler.member_free_time(&events, now, horizon)?;
                    debug!(member = %path, slots = member.slots.len(), "computed member");
                    Ok(member)
                })
                .collect::<Result<Vec<MemberFreeTime>>>()?;

            let common = GroupIntersector::new(config)?.intersect(&free_times);
            write_slots(output.as_deref(), &common, offset)?;
        }
        Commands::Intersect {
            slots,
            reference_date,
            output,
        } => {
            let reference_date = wire::parse_date(&reference_date)?;
            let free_times = slots
                .iter()
                .map(|path| -> Result<MemberFreeTime> {
                    let json = read_input(Some(path))?;
                    let slots = wire::parse_slots(&json, offset)
                        .with_context(|| format!("Failed to parse free slots in {}", path))?;
                    Ok(MemberFreeTime {
                        reference_date,
                        slots,
                    })
                })
                .collect::<Result<Vec<MemberFreeTime>>>()?;

            let common = GroupIntersector::new(config)?.intersect(&free_times);
            write_slots(output.as_deref(), &common, offset)?;
        }
    }

    Ok(())
}

/// Send logs to stderr so stdout stays pure JSON.
///
/// `RUST_LOG` is honoured unless `--verbose` asks for debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn resolve_now(now: Option<&str>, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    match now {
        Some(s) => wire::parse_instant(s, offset).context("Invalid --now"),
        None => Ok(Utc::now().with_timezone(&offset)),
    }
}

fn write_slots(
    path: Option<&str>,
    slots: &[availability_engine::FreeSlot],
    offset: FixedOffset,
) -> Result<()> {
    let records = wire::to_slot_records(slots, offset);
    let mut json = serde_json::to_string_pretty(&records)?;
    json.push('\n');
    write_output(path, &json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
