//! xg - keyword-group tweet dashboard core
//!
//! This library provides the backend of a dashboard that organizes tweets
//! into named keyword groups stored in Redis and serves filtered, sorted,
//! paginated views of them.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Layered configuration (file, env, CLI)
//! - [`error`] - Custom error types
//! - [`model`] - Group and tweet records
//! - [`query`] - Pure filter/sort/paginate engine
//! - [`store`] - Redis persistence mapper

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;

pub use cli::*;
pub use config::Config;
pub use error::{Result, XgError};
pub use model::{parse_created_at, Group, Tweet};
pub use query::{
    effective_mentions, mention_options, run_query, unique_mentions, PageSize, QueryConfig,
    SortField, SortOrder, TweetPage, PINNED_MENTIONS,
};
pub use store::{RedisTweetStore, TweetStore};

use chrono::{DateTime, Datelike, Utc};

/// Format an unsigned integer with thousands separators.
#[must_use]
pub fn format_number(value: u64) -> String {
    let mut out = String::with_capacity(24);

    for (idx, ch) in value.to_string().chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a datetime as a human-friendly relative string.
///
/// - < 1 minute: "just now"
/// - < 1 hour: "Nm ago"
/// - < 24 hours: "Nh ago"
/// - < 7 days: "Nd ago"
/// - Same calendar year: "Mon D"
/// - Different year: "Mon D, YYYY"
#[must_use]
pub fn format_relative_date(dt: DateTime<Utc>) -> String {
    format_relative_date_with_base(dt, Utc::now())
}

/// Format a datetime relative to a fixed base time (useful for tests).
#[must_use]
pub fn format_relative_date_with_base(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    if duration.num_seconds() < 0 {
        return dt.format("%b %d, %Y").to_string();
    }

    let minutes = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else if dt.year() == now.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%b %d, %Y").to_string()
    }
}
