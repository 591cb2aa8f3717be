use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rewind-backend")]
#[command(about = "Match history ingestion and season analytics", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also write daily-rotated log files into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print process counters in Prometheus text format to stderr when done
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ingest new matches, then print the season profile
    Sync(PlayerArgs),
    /// Summarize timelines of stored matches that have none yet
    ProcessTimelines(PlayerArgs),
    /// Print the season-level timeline summary
    TimelineSummary(PlayerArgs),
    /// Ask the narrative model for a season recap
    Recap(PlayerArgs),
    /// Print the season profile from stored matches only
    Profile(PlayerArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PlayerArgs {
    /// Riot ID name, e.g. "Hide on bush"
    pub game_name: String,
    /// Riot ID tag, with or without the leading '#'
    pub tag_line: String,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sync(_) => "sync",
            Command::ProcessTimelines(_) => "process-timelines",
            Command::TimelineSummary(_) => "timeline-summary",
            Command::Recap(_) => "recap",
            Command::Profile(_) => "profile",
        }
    }

    pub fn player(&self) -> &PlayerArgs {
        match self {
            Command::Sync(args)
            | Command::ProcessTimelines(args)
            | Command::TimelineSummary(args)
            | Command::Recap(args)
            | Command::Profile(args) => args,
        }
    }
}
