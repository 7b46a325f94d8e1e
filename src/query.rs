//! Tweet query engine: filter, sort, and paginate an in-memory tweet list.
//!
//! Pure and stateless. The UI re-runs [`run_query`] on every filter change,
//! so everything here is deterministic, never touches I/O, and never mutates
//! its input. Pipeline order is fixed: mention resolution, filtering,
//! sorting, pagination.

use crate::model::Tweet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Matches `@handle` references in tweet text. Used as a fallback when the
/// provider did not supply structured mentions.
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("valid mention regex"));

/// Organization handles that are always offered as filter options, even when
/// absent from the current tweet list.
pub const PINNED_MENTIONS: &[&str] = &["@Binance", "@cz_binance", "@BinanceHelpDesk"];

/// Field to sort the filtered list by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Impressions,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Page size, restricted to the fixed set the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    /// All valid page sizes, in display order.
    pub const ALL: &'static [Self] = &[Self::Five, Self::Ten, Self::Twenty, Self::Fifty];

    #[must_use]
    pub const fn as_usize(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            20 => Ok(Self::Twenty),
            50 => Ok(Self::Fifty),
            other => Err(format!("Invalid page size {other}: must be 5, 10, 20, or 50")),
        }
    }
}

/// Ephemeral filter/sort/pagination parameters. Never persisted; held only
/// while the user is interacting with a tweet list.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// Inclusive lower bound on impressions.
    pub min_impressions: u64,
    /// Case-insensitive substring; non-empty drops tweets containing it.
    pub exclude_text: String,
    /// If non-empty, a tweet passes only if its text contains at least one
    /// (case-insensitive substring match).
    pub selected_keywords: Vec<String>,
    /// If non-empty, a tweet passes only if its effective mention set
    /// intersects this set.
    pub selected_mentions: Vec<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// 1-based page index. The engine does not clamp out-of-range pages;
    /// callers reset to page 1 whenever filters or the page size change.
    pub page: usize,
    pub page_size: PageSize,
}

impl QueryConfig {
    /// Default configuration showing page 1, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }
}

/// One rendered page of tweets plus pagination metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TweetPage {
    /// The visible slice, in final display order.
    pub tweets: Vec<Tweet>,
    /// 1-based page index this slice corresponds to.
    pub page: usize,
    /// `ceil(filtered_count / page_size)`.
    pub total_pages: usize,
    /// Tweets surviving the filter stage.
    pub filtered_count: usize,
    /// Size of the unfiltered input list.
    pub total_count: usize,
}

/// A tweet's effective mention set: its stored mentions when non-empty,
/// otherwise every `@handle` token extracted from its text.
#[must_use]
pub fn effective_mentions(tweet: &Tweet) -> Vec<String> {
    if !tweet.mentions.is_empty() {
        return tweet.mentions.clone();
    }
    MENTION_RE
        .find_iter(&tweet.text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Unique mentions across the full unfiltered tweet list, sorted, for
/// building filter choices.
#[must_use]
pub fn unique_mentions(tweets: &[Tweet]) -> Vec<String> {
    let set: BTreeSet<String> = tweets
        .iter()
        .flat_map(|t| effective_mentions(t))
        .filter(|m| !m.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Filter options to offer the user: the pinned organization handles first,
/// then every observed mention not already pinned (compared
/// case-insensitively).
#[must_use]
pub fn mention_options(tweets: &[Tweet]) -> Vec<String> {
    let mut options: Vec<String> = PINNED_MENTIONS.iter().map(ToString::to_string).collect();
    for mention in unique_mentions(tweets) {
        let already_pinned = PINNED_MENTIONS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&mention));
        if !already_pinned {
            options.push(mention);
        }
    }
    options
}

fn passes_filters(tweet: &Tweet, config: &QueryConfig) -> bool {
    if tweet.impressions < config.min_impressions {
        return false;
    }

    let text_lower = tweet.text.to_lowercase();

    if !config.exclude_text.is_empty() && text_lower.contains(&config.exclude_text.to_lowercase()) {
        return false;
    }

    if !config.selected_keywords.is_empty() {
        let any_keyword = config
            .selected_keywords
            .iter()
            .any(|k| text_lower.contains(&k.to_lowercase()));
        if !any_keyword {
            return false;
        }
    }

    if !config.selected_mentions.is_empty() {
        let mentions = effective_mentions(tweet);
        let intersects = mentions
            .iter()
            .any(|m| config.selected_mentions.iter().any(|s| s == m));
        if !intersects {
            return false;
        }
    }

    true
}

fn compare(a: &Tweet, b: &Tweet, config: &QueryConfig) -> std::cmp::Ordering {
    let ordering = match config.sort_field {
        SortField::Date => match (a.created_at_parsed(), b.created_at_parsed()) {
            // Unparsable timestamps compare as ties.
            (Some(da), Some(db)) => da.cmp(&db),
            _ => std::cmp::Ordering::Equal,
        },
        SortField::Impressions => a.impressions.cmp(&b.impressions),
    };

    match config.sort_order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Run the full query pipeline over a tweet list.
///
/// Returns a new ordered page each call; the input is never mutated. A
/// `page` beyond `total_pages` yields an empty slice, not an error.
#[must_use]
pub fn run_query(tweets: &[Tweet], config: &QueryConfig) -> TweetPage {
    let mut filtered: Vec<Tweet> = tweets
        .iter()
        .filter(|t| passes_filters(t, config))
        .cloned()
        .collect();

    // Vec::sort_by is stable, so equal keys keep their incoming order.
    filtered.sort_by(|a, b| compare(a, b, config));

    let filtered_count = filtered.len();
    let page_size = config.page_size.as_usize();
    let total_pages = filtered_count.div_ceil(page_size);

    let start = config.page.saturating_sub(1).saturating_mul(page_size);
    let page_tweets: Vec<Tweet> = if start >= filtered_count {
        Vec::new()
    } else {
        filtered[start..(start + page_size).min(filtered_count)].to_vec()
    };

    TweetPage {
        tweets: page_tweets,
        page: config.page.max(1),
        total_pages,
        filtered_count,
        total_count: tweets.len(),
    }
}
