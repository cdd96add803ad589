//! `caltrack` command-line entry point.
//!
//! # Responsibility
//! - Run exactly one tracker command per invocation.
//! - Resolve config from flags, env and file, then bootstrap logging.
//! - Render listings as a fixed-width table.

use anyhow::{Context, Result};
use caltrack_core::{
    init_logging, init_stderr_logging, parse_index, EventEdit, EventTracker, JsonFileStorage,
    NewEvent, TrackedEvent, TrackerConfig, TrackerError,
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

const REJECTED_EXIT_CODE: u8 = 2;
const TITLE_WIDTH: usize = 23;
const LOCATION_WIDTH: usize = 18;
const NOTE_WIDTH: usize = 40;

#[derive(Debug, Parser)]
#[command(name = "caltrack", about = "Personal calendar event tracker")]
struct Cli {
    /// Config file (TOML). Defaults to $CALTRACK_CONFIG when set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Events file, overriding config and $CALTRACK_EVENTS_FILE.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add an event.
    Add {
        /// Date as YYYY-MM-DD.
        date: String,
        title: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List all events sorted by date.
    List,
    /// List events on one date.
    On { date: String },
    /// List events between two dates, inclusive.
    Range { start: String, end: String },
    /// Delete the event at INDEX in the `list` view.
    Delete { index: String },
    /// Edit the event at INDEX in the `list` view; omitted fields are kept.
    Edit {
        index: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Search titles and notes for a keyword.
    Search { keyword: String },
    /// Print today's date.
    Today,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Today => {
            println!("Today's date is: {}", chrono::Local::now().format("%Y-%m-%d"));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Version => {
            println!("caltrack {}", caltrack_core::core_version());
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let config = resolve_config(&cli)?;
    start_logging(&config)?;
    let command = command_name(&cli.command);

    let storage = JsonFileStorage::new(&config.events_file);
    let mut tracker = EventTracker::open(storage).with_context(|| {
        format!("failed to open events at `{}`", config.events_file.display())
    })?;

    let outcome = match cli.command {
        Command::Add {
            date,
            title,
            location,
            note,
        } => tracker
            .add(NewEvent::new(date, title).location(location).note(note))
            .map(|_| println!("Event added.")),
        Command::List => {
            print_events(&tracker.list_all());
            Ok(())
        }
        Command::On { date } => {
            print_events(&tracker.list_on_date(&date));
            Ok(())
        }
        Command::Range { start, end } => {
            print_events(&tracker.list_in_range(&start, &end));
            Ok(())
        }
        Command::Delete { index } => parse_index(&index)
            .map_err(TrackerError::from)
            .and_then(|index| tracker.delete(index))
            .map(|_| println!("Event deleted.")),
        Command::Edit {
            index,
            title,
            location,
            note,
        } => parse_index(&index)
            .map_err(TrackerError::from)
            .and_then(|index| {
                tracker.edit(
                    index,
                    EventEdit {
                        title,
                        location,
                        note,
                    },
                )
            })
            .map(|_| println!("Event updated.")),
        Command::Search { keyword } => {
            print_events(&tracker.search(&keyword));
            Ok(())
        }
        Command::Today | Command::Version => Ok(()),
    };

    match outcome {
        Ok(()) => {
            info!("event=cli_command module=cli status=ok command={command}");
            Ok(ExitCode::SUCCESS)
        }
        Err(TrackerError::Rejected(rejection)) => {
            warn!(
                "event=cli_command module=cli status=rejected command={command} reason={}",
                rejection.code()
            );
            eprintln!("{rejection}");
            Ok(ExitCode::from(REJECTED_EXIT_CODE))
        }
        Err(TrackerError::Storage(err)) => {
            warn!("event=cli_command module=cli status=error command={command}");
            Err(err).context("failed to save events")
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List => "list",
        Command::On { .. } => "on",
        Command::Range { .. } => "range",
        Command::Delete { .. } => "delete",
        Command::Edit { .. } => "edit",
        Command::Search { .. } => "search",
        Command::Today => "today",
        Command::Version => "version",
    }
}

fn resolve_config(cli: &Cli) -> Result<TrackerConfig> {
    let mut config = TrackerConfig::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    if let Some(file) = &cli.file {
        config.events_file = file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn start_logging(config: &TrackerConfig) -> Result<()> {
    let started = match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, &dir.to_string_lossy()),
        None => init_stderr_logging(&config.log_level),
    };
    started.map_err(anyhow::Error::msg)
}

fn print_events(view: &[&TrackedEvent]) {
    if view.is_empty() {
        println!("\nNo events.\n");
        return;
    }

    println!("\nIdx | Date       | Title                   | Location           | Note");
    println!("{}", "-".repeat(100));
    for (index, tracked) in view.iter().enumerate() {
        let event = &tracked.event;
        println!(
            "{index:>3} | {} | {:<title_w$} | {:<location_w$} | {:<note_w$}",
            event.date,
            truncate(&event.title, TITLE_WIDTH),
            truncate(&event.location, LOCATION_WIDTH),
            truncate(&event.note, NOTE_WIDTH),
            title_w = TITLE_WIDTH,
            location_w = LOCATION_WIDTH,
            note_w = NOTE_WIDTH,
        );
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
