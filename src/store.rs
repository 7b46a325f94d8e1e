//! Redis persistence for groups and tweets.
//!
//! Maps the two logical collections onto Redis primitives:
//!
//! - `groups` hash: field = group name, value = keywords string
//! - `tweets:<group>` hash: field = tweet ID, value = serialized provider
//!   payload. This is the shape [`TweetStore::store_payload`] writes and
//!   [`TweetStore::tweets_for_group`] reads back.
//! - `tweet:<id>` hash: field per attribute, mentions comma-joined, written
//!   by [`TweetStore::add_tweet`] alongside an ID collection entry (a set
//!   for new writes; legacy list and hash forms are appended to in kind)
//!
//! Reads degrade to empty results on backend failure (logged, never
//! propagated); writes surface their errors so callers can show a failure
//! state. The connection is injected rather than read from a global, and the
//! store is generic over the connection so tests can drive it with a mock.

use crate::config::RedisConfig;
use crate::error::{Result, XgError};
use crate::model::{Group, Tweet};
use redis::aio::{ConnectionLike, ConnectionManager, ConnectionManagerConfig};
use redis::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Hash holding `group name -> keywords`.
pub const GROUPS_KEY: &str = "groups";

/// Key of a group's tweet-ID collection.
#[must_use]
pub fn tweets_key(group: &str) -> String {
    format!("tweets:{group}")
}

/// Key of a single stored tweet record.
#[must_use]
pub fn tweet_key(id: &str) -> String {
    format!("tweet:{id}")
}

/// Store handle over any async Redis connection.
pub struct TweetStore<C> {
    conn: C,
}

/// The production store type, backed by a reconnecting connection manager.
pub type RedisTweetStore = TweetStore<ConnectionManager>;

impl TweetStore<ConnectionManager> {
    /// Connect to Redis using the configured URL.
    ///
    /// The connection manager reconnects with a bounded number of retries;
    /// beyond that, individual operations fail and are handled per the
    /// read/write rules above.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the initial connection
    /// cannot be established.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let manager_config = ConnectionManagerConfig::new().set_number_of_retries(config.retries);
        let client = Client::open(config.url.as_str())?;
        let conn = client
            .get_connection_manager_with_config(manager_config)
            .await?;
        debug!(url = %config.url, "Connected to Redis");
        Ok(Self { conn })
    }
}

impl<C: ConnectionLike + Send> TweetStore<C> {
    /// Wrap an existing connection (used by tests with a mock).
    pub fn with_connection(conn: C) -> Self {
        Self { conn }
    }

    /// List all groups.
    ///
    /// Returns an empty list when the `groups` hash is absent or the backend
    /// is unreachable; read failures are logged and swallowed.
    pub async fn list_groups(&mut self) -> Vec<Group> {
        let result: redis::RedisResult<HashMap<String, String>> = redis::cmd("HGETALL")
            .arg(GROUPS_KEY)
            .query_async(&mut self.conn)
            .await;

        match result {
            Ok(fields) => {
                let mut groups: Vec<Group> = fields
                    .into_iter()
                    .map(|(name, keywords)| Group { name, keywords })
                    .collect();
                // Hash field order is arbitrary; sort for stable output.
                groups.sort_by(|a, b| a.name.cmp(&b.name));
                groups
            }
            Err(err) => {
                warn!(key = GROUPS_KEY, error = %err, "Failed to fetch groups");
                Vec::new()
            }
        }
    }

    /// Create a group, overwriting the keywords if the name already exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `name` or `keywords` is empty, or a
    /// backend error if the write fails.
    pub async fn create_group(&mut self, name: &str, keywords: &str) -> Result<()> {
        if name.trim().is_empty() || keywords.trim().is_empty() {
            return Err(XgError::validation("Name and keywords are required"));
        }

        let _: i64 = redis::cmd("HSET")
            .arg(GROUPS_KEY)
            .arg(name)
            .arg(keywords)
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }

    /// Delete a group and, unconditionally, its tweet-ID collection.
    ///
    /// Deleting a group that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns a backend error if either delete fails.
    pub async fn delete_group(&mut self, name: &str) -> Result<()> {
        let _: i64 = redis::cmd("HDEL")
            .arg(GROUPS_KEY)
            .arg(name)
            .query_async(&mut self.conn)
            .await?;
        let _: i64 = redis::cmd("DEL")
            .arg(tweets_key(name))
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }

    /// Update a group's keywords, renaming it when `old_name != new_name`.
    ///
    /// The rename path issues the two `groups`-hash writes as one pipeline.
    /// Moving the `tweets:<old>` collection is best-effort: a failed
    /// existence check or RENAME is logged and the mapping changes still
    /// land, which can leave an orphaned collection behind. Callers treat a
    /// group without a tweets collection as having an empty tweet list.
    ///
    /// Stored tweet records keep their original `group_name` field after a
    /// rename; only the collection key moves.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty inputs, or a backend error if
    /// the `groups` mapping writes fail.
    pub async fn update_group(
        &mut self,
        old_name: &str,
        new_name: &str,
        keywords: &str,
    ) -> Result<()> {
        if new_name.trim().is_empty() || keywords.trim().is_empty() {
            return Err(XgError::validation("Name and keywords are required"));
        }

        if old_name == new_name {
            let _: i64 = redis::cmd("HSET")
                .arg(GROUPS_KEY)
                .arg(old_name)
                .arg(keywords)
                .query_async(&mut self.conn)
                .await?;
            return Ok(());
        }

        let old_tweets = tweets_key(old_name);
        let exists_check: redis::RedisResult<i64> = redis::cmd("EXISTS")
            .arg(&old_tweets)
            .query_async(&mut self.conn)
            .await;
        let exists = match exists_check {
            Ok(n) => n > 0,
            Err(err) => {
                warn!(key = %old_tweets, error = %err, "Existence check failed; skipping tweets rename");
                false
            }
        };

        let _: () = redis::pipe()
            .cmd("HSET")
            .arg(GROUPS_KEY)
            .arg(new_name)
            .arg(keywords)
            .ignore()
            .cmd("HDEL")
            .arg(GROUPS_KEY)
            .arg(old_name)
            .ignore()
            .query_async(&mut self.conn)
            .await?;

        if exists {
            let renamed: redis::RedisResult<()> = redis::cmd("RENAME")
                .arg(&old_tweets)
                .arg(tweets_key(new_name))
                .query_async(&mut self.conn)
                .await;
            if let Err(err) = renamed {
                warn!(
                    from = %old_tweets,
                    to = %tweets_key(new_name),
                    error = %err,
                    "Failed to rename tweets collection; group mapping was still updated"
                );
            }
        }

        Ok(())
    }

    /// Fetch all tweets stored for a group, newest first.
    ///
    /// Reads `tweets:<group>` as a hash of `id -> serialized payload` (the
    /// shape the external scraper writes with HSETNX). Individual entries
    /// that fail to parse are logged and skipped; a missing key or an
    /// unreachable backend yields an empty list.
    pub async fn tweets_for_group(&mut self, group: &str) -> Vec<Tweet> {
        let key = tweets_key(group);
        let result: redis::RedisResult<HashMap<String, String>> = redis::cmd("HGETALL")
            .arg(&key)
            .query_async(&mut self.conn)
            .await;

        let entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to fetch tweets for group");
                return Vec::new();
            }
        };

        let mut tweets = Vec::with_capacity(entries.len());
        for (id, raw) in entries {
            match tweet_from_payload(group, &id, &raw) {
                Ok(tweet) => tweets.push(tweet),
                Err(err) => warn!(tweet_id = %id, error = %err, "Skipping malformed tweet entry"),
            }
        }

        sort_newest_first(&mut tweets);
        tweets
    }

    /// Store a raw provider payload under the group's tweet hash.
    ///
    /// This is the write shape [`tweets_for_group`](Self::tweets_for_group)
    /// reads back: `HSETNX tweets:<group> <id> <payload>`. An ID that is
    /// already present keeps its existing payload; the return value says
    /// whether the entry was newly stored.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `id` or `group` is empty, or a
    /// backend error if the write fails.
    pub async fn store_payload(&mut self, group: &str, id: &str, raw: &str) -> Result<bool> {
        if id.is_empty() || group.trim().is_empty() {
            return Err(XgError::validation("Tweet ID and group name are required"));
        }

        let stored: i64 = redis::cmd("HSETNX")
            .arg(tweets_key(group))
            .arg(id)
            .arg(raw)
            .query_async(&mut self.conn)
            .await?;
        Ok(stored > 0)
    }

    /// Store a tweet and register its ID in the owning group's collection.
    ///
    /// A duplicate ID is a no-op. The group collection's type is repaired on
    /// write: sets and lists and hashes are appended to in kind, anything
    /// else is reset to a fresh set.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the tweet has no ID or group, or a
    /// backend error if any write fails.
    pub async fn add_tweet(&mut self, tweet: &Tweet) -> Result<()> {
        if tweet.id.is_empty() || tweet.group_name.is_empty() {
            return Err(XgError::validation("Tweet ID and group name are required"));
        }

        let record_key = tweet_key(&tweet.id);
        let exists: i64 = redis::cmd("EXISTS")
            .arg(&record_key)
            .query_async(&mut self.conn)
            .await?;
        if exists > 0 {
            debug!(tweet_id = %tweet.id, "Tweet already stored; skipping");
            return Ok(());
        }

        let _: i64 = redis::cmd("HSET")
            .arg(&record_key)
            .arg("id")
            .arg(&tweet.id)
            .arg("text")
            .arg(&tweet.text)
            .arg("author")
            .arg(&tweet.author)
            .arg("author_username")
            .arg(&tweet.author_username)
            .arg("author_profile_image")
            .arg(&tweet.author_profile_image)
            .arg("created_at")
            .arg(&tweet.created_at)
            .arg("impressions")
            .arg(tweet.impressions)
            .arg("mentions")
            .arg(tweet.mentions.join(","))
            .arg("group_name")
            .arg(&tweet.group_name)
            .query_async(&mut self.conn)
            .await?;

        let collection = tweets_key(&tweet.group_name);
        let key_type: String = redis::cmd("TYPE")
            .arg(&collection)
            .query_async(&mut self.conn)
            .await?;

        match key_type.as_str() {
            "none" | "set" => {
                let _: i64 = redis::cmd("SADD")
                    .arg(&collection)
                    .arg(&tweet.id)
                    .query_async(&mut self.conn)
                    .await?;
            }
            "list" => {
                let _: i64 = redis::cmd("LPUSH")
                    .arg(&collection)
                    .arg(&tweet.id)
                    .query_async(&mut self.conn)
                    .await?;
            }
            "hash" => {
                let _: i64 = redis::cmd("HSET")
                    .arg(&collection)
                    .arg(&tweet.id)
                    .arg("1")
                    .query_async(&mut self.conn)
                    .await?;
            }
            other => {
                warn!(key = %collection, key_type = %other, "Resetting tweets collection to a set");
                let _: i64 = redis::cmd("DEL")
                    .arg(&collection)
                    .query_async(&mut self.conn)
                    .await?;
                let _: i64 = redis::cmd("SADD")
                    .arg(&collection)
                    .arg(&tweet.id)
                    .query_async(&mut self.conn)
                    .await?;
            }
        }

        Ok(())
    }
}

/// Sort newest first; entries with unparsable timestamps compare as ties and
/// keep their incoming order.
pub(crate) fn sort_newest_first(tweets: &mut [Tweet]) {
    tweets.sort_by(|a, b| match (b.created_at_parsed(), a.created_at_parsed()) {
        (Some(db), Some(da)) => db.cmp(&da),
        _ => std::cmp::Ordering::Equal,
    });
}

/// Parse a stored tweet payload into a [`Tweet`].
///
/// The payload is provider-shaped JSON: impressions live under
/// `public_metrics.impression_count` (or `.impressions`), author fields use
/// the provider's names, and any field may be missing. Missing fields get
/// explicit defaults; a payload that is not a JSON object is an error so the
/// batch read can skip it.
///
/// # Errors
///
/// Returns a parse error when the payload is not valid JSON or not an
/// object.
pub fn tweet_from_payload(group: &str, id: &str, raw: &str) -> Result<Tweet> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| XgError::tweet_parse(id, format!("invalid JSON: {e}")))?;

    let obj = value
        .as_object()
        .ok_or_else(|| XgError::tweet_parse(id, "payload is not a JSON object"))?;

    let str_field = |name: &str| -> String {
        obj.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let impressions = obj
        .get("public_metrics")
        .and_then(Value::as_object)
        .and_then(|m| m.get("impression_count").or_else(|| m.get("impressions")))
        .map_or(0, u64_from_value);

    let mentions = match obj.get("mentions") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let payload_id = obj.get("id").and_then(Value::as_str).unwrap_or(id);

    Ok(Tweet {
        id: payload_id.to_string(),
        text: str_field("text"),
        author: str_field("author_name"),
        author_username: str_field("author_username"),
        author_profile_image: str_field("profile_image_url"),
        created_at: str_field("created_at"),
        impressions,
        mentions,
        group_name: group.to_string(),
    })
}

/// Coerce a JSON number or numeric string to u64, defaulting to 0.
fn u64_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
