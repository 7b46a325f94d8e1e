//! Data models for keyword groups and the tweets stored against them.
//!
//! These are the normalized shapes the rest of the crate works with, after
//! provider payloads have been parsed by the store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, user-defined collection of keywords used to tag tweets.
///
/// The keywords live as a single comma-separated string, exactly as stored;
/// they are only split out at render/filter time via [`Group::keyword_list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub keywords: String,
}

impl Group {
    /// Create a group record.
    pub fn new(name: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.into(),
        }
    }

    /// Split the keyword string into trimmed, non-empty phrases.
    #[must_use]
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// A tweet record, belonging to exactly one group's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author: String,
    pub author_username: String,
    pub author_profile_image: String,
    /// ISO-ish timestamp string as supplied by the provider; may be
    /// unparsable, in which case it sorts as a tie (see [`parse_created_at`]).
    pub created_at: String,
    pub impressions: u64,
    pub mentions: Vec<String>,
    /// Owning group's name at the time of storage. Not rewritten when the
    /// group is later renamed.
    pub group_name: String,
}

impl Tweet {
    /// Parsed creation time, or `None` when the timestamp is unparsable.
    #[must_use]
    pub fn created_at_parsed(&self) -> Option<DateTime<Utc>> {
        parse_created_at(&self.created_at)
    }
}

/// Parse a provider timestamp string.
///
/// Accepts RFC 3339 (`2025-01-08T12:00:00Z`, with or without fractional
/// seconds), a bare ISO datetime without offset (treated as UTC), and the
/// classic Twitter format (`Wed Jan 08 12:00:00 +0000 2025`). Anything else
/// yields `None` rather than some sentinel epoch value.
#[must_use]
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.with_timezone(&Utc));
    }

    None
}
