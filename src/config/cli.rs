use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Contributor data file: a local path or an http(s) URL
    #[arg(long, env = "CONTRIBUTORS_SOURCE", default_value = "data/contributors.ndjson")]
    pub source: String,

    /// Directory backing the local key/value store
    #[arg(long, env = "CONTRIBUTOR_WALL_STATE", default_value = ".contributor-wall")]
    pub state_dir: PathBuf,

    /// Keep appreciation and theme state in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the contributor wall
    List {
        /// newest, oldest, name-asc or name-desc
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Case-insensitive match against name or username
        #[arg(long, default_value = "")]
        search: String,

        /// "all" or one of first, core, top, helper, early, milestone
        #[arg(long, default_value = "all")]
        badge: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show aggregate statistics
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Pick a random contributor, never the same one twice in a row
    Spotlight {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Send a reaction to a contributor (once per reaction type)
    Appreciate {
        username: String,
        /// clap, heart, star, rocket or party
        reaction: String,
    },
    /// Show or change the color theme
    Theme { value: Option<String> },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
