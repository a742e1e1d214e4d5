//! CLI command definitions

use crate::error::{LifeosError, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lifeos")]
#[command(about = "Personal life dashboard in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new workspace
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Owner name shown in the overview (default: login name)
        #[arg(short, long)]
        owner: Option<String>,

        /// Fill every store with sample data
        #[arg(long)]
        seed: bool,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// List the record kinds
    Kinds,

    /// Add a record from a JSON object ("-" reads stdin)
    Add {
        kind: String,
        json: String,
    },

    /// Merge JSON fields into an existing record
    Update {
        kind: String,
        /// Record id or unique id prefix
        id: String,
        json: String,
    },

    /// Delete a record
    Delete {
        kind: String,
        id: String,
    },

    /// Print one record as JSON
    Show {
        kind: String,
        id: String,
    },

    /// List records of a kind
    List {
        kind: String,

        /// Tag query (e.g. "work AND NOT someday")
        #[arg(short, long)]
        tag: Option<String>,

        /// Maximum number of records to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Mark a task done, a prayer answered, a book finished, ...
    Complete {
        kind: String,
        id: String,
    },

    /// Calendar events, family events and birthdays coming up
    Upcoming {
        /// Days ahead (default: upcoming_days from config)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// World-intelligence signals grouped by category
    Signals {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Income, expenses and net balance
    Balance {
        /// Start date (DD-MM-YYYY)
        #[arg(long)]
        from: Option<String>,

        /// End date (DD-MM-YYYY)
        #[arg(long)]
        to: Option<String>,
    },

    /// People you have not been in touch with lately
    StaleContacts {
        /// Quiet period in days (default: 30)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Switch a device on or off
    Toggle {
        id: String,
    },

    /// Check whether a host is blocked by a mind-guard rule
    Check {
        host: String,
    },

    /// Show system log entries
    Logs {
        /// Lowest level shown (debug, info, warn, error)
        #[arg(short, long, default_value = "debug")]
        min_level: String,

        /// Remove every entry instead
        #[arg(long)]
        clear: bool,
    },

    /// Fill empty stores with sample data
    Seed,

    /// Record counts across every store
    Overview,
}

/// Parse a DD-MM-YYYY command-line date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d-%m-%Y")
        .map_err(|_| LifeosError::Config(format!("Invalid date format: {}", value)))
}
