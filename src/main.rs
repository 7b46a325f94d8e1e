//! xg - keyword-group tweet dashboard CLI
//!
//! Main entry point for the xg command-line tool.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::warn;

use xg::logging::init_cli_logging;
use xg::store::tweet_from_payload;
use xg::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_cli_logging(cli.quiet, cli.verbose, !cli.no_color);

    let mut config = Config::load();
    if let Some(url) = &cli.redis_url {
        config.redis.url.clone_from(url);
    }
    if cli.no_color {
        config.output.colors = false;
    }
    if cli.quiet {
        config.output.quiet = true;
    }

    match &cli.command {
        Commands::Groups(args) => cmd_groups(&config, args).await,
        Commands::Tweets(args) => cmd_tweets(&config, args).await,
        Commands::Mentions(args) => cmd_mentions(&config, args).await,
        Commands::Ingest(args) => cmd_ingest(&config, args).await,
        Commands::Config => cmd_config(&config),
    }
}

async fn connect(config: &Config) -> Result<RedisTweetStore> {
    RedisTweetStore::connect(&config.redis)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", config.redis.url))
}

async fn cmd_groups(config: &Config, args: &cli::GroupsArgs) -> Result<()> {
    match &args.command {
        cli::GroupsCommand::List => {
            let mut store = connect(config).await?;
            let groups = store.list_groups().await;
            if groups.is_empty() {
                println!("No groups defined. Create one with 'xg groups create <name> <keywords>'.");
                return Ok(());
            }
            for group in &groups {
                println!("{}", group.name.bold());
                for keyword in group.keyword_list() {
                    println!("  {} {}", "•".dimmed(), keyword);
                }
            }
        }
        cli::GroupsCommand::Create { name, keywords } => {
            // Validate before opening a connection so bad input fails fast.
            if name.trim().is_empty() || keywords.trim().is_empty() {
                anyhow::bail!("Validation error: Name and keywords are required");
            }
            let mut store = connect(config).await?;
            store.create_group(name, keywords).await?;
            println!("{} Created group '{}'", "✓".green(), name);
        }
        cli::GroupsCommand::Delete { name } => {
            if name.trim().is_empty() {
                anyhow::bail!("Validation error: Group name is required");
            }
            let mut store = connect(config).await?;
            store.delete_group(name).await?;
            println!("{} Deleted group '{}' and its tweets", "✓".green(), name);
        }
        cli::GroupsCommand::Rename {
            old_name,
            new_name,
            keywords,
        } => {
            if new_name.trim().is_empty() || keywords.trim().is_empty() {
                anyhow::bail!("Validation error: Name and keywords are required");
            }
            let mut store = connect(config).await?;
            store.update_group(old_name, new_name, keywords).await?;
            if old_name == new_name {
                println!("{} Updated keywords for '{}'", "✓".green(), new_name);
            } else {
                println!("{} Renamed '{}' to '{}'", "✓".green(), old_name, new_name);
            }
        }
    }
    Ok(())
}

async fn cmd_tweets(config: &Config, args: &cli::TweetsArgs) -> Result<()> {
    let query_config = args.to_query_config();

    let mut store = connect(config).await?;
    let tweets = store.tweets_for_group(&args.group).await;
    let page = run_query(&tweets, &query_config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let keywords = store
        .list_groups()
        .await
        .into_iter()
        .find(|g| g.name == args.group)
        .map(|g| g.keywords);
    if let Some(keywords) = keywords {
        println!("{} {}", "Keywords:".bold(), keywords);
        println!();
    }

    if page.total_count == 0 {
        println!("No tweets stored for group '{}'.", args.group);
        return Ok(());
    }
    if page.tweets.is_empty() {
        println!(
            "No tweets on page {} ({} match the filters, {} pages).",
            page.page, page.filtered_count, page.total_pages
        );
        return Ok(());
    }

    for tweet in &page.tweets {
        render_tweet(tweet);
    }

    println!(
        "{}",
        format!(
            "Page {} of {} · showing {} of {} matching tweets ({} total)",
            page.page,
            page.total_pages,
            page.tweets.len(),
            page.filtered_count,
            page.total_count
        )
        .dimmed()
    );
    Ok(())
}

fn render_tweet(tweet: &Tweet) {
    let author = if tweet.author.is_empty() {
        "Unknown Author"
    } else {
        tweet.author.as_str()
    };
    let username = if tweet.author_username.is_empty() {
        "unknown"
    } else {
        tweet.author_username.as_str()
    };
    println!("{} {}", author.bold(), format!("@{username}").dimmed());

    if tweet.text.is_empty() {
        println!("  {}", "(no content)".dimmed());
    } else {
        println!("  {}", tweet.text);
    }

    let mentions = effective_mentions(tweet);
    if !mentions.is_empty() {
        println!("  {}", mentions.join(" ").cyan());
    }

    let date = tweet
        .created_at_parsed()
        .map_or_else(|| "unknown date".to_string(), format_relative_date);
    println!(
        "  {}",
        format!(
            "{date} · {} impressions",
            format_number(tweet.impressions)
        )
        .dimmed()
    );
    println!();
}

async fn cmd_mentions(config: &Config, args: &cli::MentionsArgs) -> Result<()> {
    let mut store = connect(config).await?;
    let tweets = store.tweets_for_group(&args.group).await;
    let options = mention_options(&tweets);

    for option in &options {
        let pinned = PINNED_MENTIONS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(option));
        if pinned {
            println!("{} {}", option, "(pinned)".dimmed());
        } else {
            println!("{option}");
        }
    }
    Ok(())
}

async fn cmd_ingest(config: &Config, args: &cli::IngestArgs) -> Result<()> {
    // Read and parse the capture before touching Redis.
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read ingest file '{}'", args.file.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not valid JSON", args.file.display()))?;

    // The scraper writes {"data": [...]}; accept a bare array too.
    let items = value
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| value.as_array())
        .with_context(|| "Expected a top-level \"data\" array of tweets")?;

    if args.group.trim().is_empty() {
        anyhow::bail!("Validation error: Group name is required");
    }

    let mut store = connect(config).await?;

    let bar = if config.output.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(items.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let mut stored = 0usize;
    let mut duplicates = 0usize;
    let mut skipped = 0usize;
    for item in items {
        bar.inc(1);
        let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
        if id.is_empty() {
            warn!("Skipping capture entry without an id");
            skipped += 1;
            continue;
        }
        let raw = item.to_string();
        // Reject entries the read side would only skip with a warning later.
        if let Err(err) = tweet_from_payload(&args.group, id, &raw) {
            warn!(tweet_id = %id, error = %err, "Skipping malformed capture entry");
            skipped += 1;
            continue;
        }
        // The group hash is the shape `xg tweets` reads back.
        match store.store_payload(&args.group, id, &raw).await {
            Ok(true) => stored += 1,
            Ok(false) => duplicates += 1,
            Err(err) => {
                warn!(tweet_id = %id, error = %err, "Failed to store tweet");
                skipped += 1;
            }
        }
    }
    bar.finish_and_clear();

    println!(
        "{} Ingested {} tweets into '{}' ({} duplicates, {} skipped)",
        "✓".green(),
        stored,
        args.group,
        duplicates,
        skipped
    );
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    if let Some(path) = Config::user_config_path() {
        println!("{} {}", "Config file:".bold(), path.display());
    }
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
