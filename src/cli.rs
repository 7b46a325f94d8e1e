//! CLI definitions for xg.
//!
//! Uses clap for argument parsing with derive macros.

use crate::query::{PageSize, QueryConfig, SortField, SortOrder};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// xg - keyword-group tweet dashboard backed by Redis
#[derive(Parser, Debug)]
#[command(name = "xg")]
#[command(version)]
#[command(about = "Manage keyword groups of tweets and query them from Redis")]
#[command(long_about = r"
xg (x_groups) - backend core of a keyword-group tweet dashboard.

Define named groups of keywords, ingest provider tweet captures into each
group, and filter/sort/paginate the stored tweets.

Quick start:
  1. Run a Redis server (or set XG_REDIS_URL / REDIS_URL)
  2. xg groups create KYB 'binance kyb, card kyb'
  3. xg ingest tweets.json --group KYB
  4. xg tweets KYB --min-impressions 100 --sort impressions
")]
pub struct Cli {
    /// Redis connection URL
    #[arg(long, env = "XG_REDIS_URL", global = true)]
    pub redis_url: Option<String>,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage keyword groups
    Groups(GroupsArgs),

    /// Query the tweets stored for a group
    Tweets(TweetsArgs),

    /// List the mention filter choices for a group
    Mentions(MentionsArgs),

    /// Ingest a provider tweet capture into a group
    Ingest(IngestArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    /// List all groups with their keywords
    List,

    /// Create a group (overwrites keywords if the name exists)
    Create {
        /// Unique group name
        name: String,
        /// Comma-separated keyword phrases, e.g. "binance kyb, card kyb"
        keywords: String,
    },

    /// Delete a group and all of its tweets
    Delete {
        /// Group name
        name: String,
    },

    /// Rename a group and/or update its keywords
    Rename {
        /// Current group name
        old_name: String,
        /// New group name (may equal the old name to only change keywords)
        new_name: String,
        /// Comma-separated keyword phrases
        keywords: String,
    },
}

#[derive(Args, Debug)]
pub struct TweetsArgs {
    /// Group to fetch tweets for
    pub group: String,

    /// Inclusive lower bound on impressions
    #[arg(long, default_value = "0")]
    pub min_impressions: u64,

    /// Drop tweets whose text contains this substring (case-insensitive)
    #[arg(long)]
    pub exclude: Option<String>,

    /// Keep only tweets containing at least one of these keywords
    /// (case-insensitive, repeatable)
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Keep only tweets mentioning at least one of these handles
    /// (repeatable)
    #[arg(long = "mention")]
    pub mentions: Vec<String>,

    /// Sort field
    #[arg(long, default_value = "date")]
    pub sort: SortFieldArg,

    /// Sort direction
    #[arg(long, default_value = "desc")]
    pub order: SortOrderArg,

    /// 1-based page index
    #[arg(long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Page size (5, 10, 20, or 50)
    #[arg(long, default_value = "10", value_parser = parse_page_size)]
    pub page_size: PageSize,

    /// Emit the page as JSON instead of rendered cards
    #[arg(long)]
    pub json: bool,
}

impl TweetsArgs {
    /// Build the engine configuration these flags describe.
    #[must_use]
    pub fn to_query_config(&self) -> QueryConfig {
        QueryConfig {
            min_impressions: self.min_impressions,
            exclude_text: self.exclude.clone().unwrap_or_default(),
            selected_keywords: self.keywords.clone(),
            selected_mentions: self.mentions.clone(),
            sort_field: self.sort.into(),
            sort_order: self.order.into(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Args, Debug)]
pub struct MentionsArgs {
    /// Group to collect mentions from
    pub group: String,
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Provider capture file: JSON with a top-level "data" array of tweets
    pub file: PathBuf,

    /// Group to store the tweets under
    #[arg(long, short = 'g')]
    pub group: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortFieldArg {
    Date,
    Impressions,
}

impl From<SortFieldArg> for SortField {
    fn from(value: SortFieldArg) -> Self {
        match value {
            SortFieldArg::Date => Self::Date,
            SortFieldArg::Impressions => Self::Impressions,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(value: SortOrderArg) -> Self {
        match value {
            SortOrderArg::Asc => Self::Ascending,
            SortOrderArg::Desc => Self::Descending,
        }
    }
}

fn parse_page(value: &str) -> Result<usize, String> {
    let n: usize = value
        .parse()
        .map_err(|_| format!("Invalid page '{value}': must be a number"))?;
    if n == 0 {
        return Err(format!("Invalid page '{value}': pages start at 1"));
    }
    Ok(n)
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    let n: usize = value
        .parse()
        .map_err(|_| format!("Invalid page size '{value}': must be a number"))?;
    PageSize::try_from(n)
}
