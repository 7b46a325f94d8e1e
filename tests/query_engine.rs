//! Integration tests for the tweet query engine.
//!
//! Exercises the full filter/sort/paginate pipeline through the public API
//! with realistic combined configurations, the way the dashboard drives it.

use xg::{
    run_query, unique_mentions, PageSize, QueryConfig, SortField, SortOrder, Tweet,
};

fn tweet(id: &str, text: &str, impressions: u64, created_at: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: text.to_string(),
        author: format!("Author {id}"),
        author_username: format!("user_{id}"),
        author_profile_image: String::new(),
        created_at: created_at.to_string(),
        impressions,
        mentions: Vec::new(),
        group_name: "KYB".to_string(),
    }
}

fn fixture() -> Vec<Tweet> {
    vec![
        tweet("1", "Binance KYB rollout for EU users", 500, "2025-01-01T10:00:00Z"),
        tweet("2", "OKX card launch with @okx", 50, "2025-01-02T10:00:00Z"),
        tweet("3", "Giveaway! follow @Binance now", 10_000, "2025-01-03T10:00:00Z"),
        tweet("4", "binance kyb is painful @Binance @cz_binance", 120, "2025-01-04T10:00:00Z"),
        tweet("5", "completely unrelated post", 80, "2025-01-05T10:00:00Z"),
        tweet("6", "KYB timelines improving", 40, "not-a-timestamp"),
    ]
}

#[test]
fn combined_filters_then_sort_then_paginate() {
    let tweets = fixture();
    let config = QueryConfig {
        min_impressions: 50,
        exclude_text: "giveaway".to_string(),
        selected_keywords: vec!["kyb".to_string(), "okx card".to_string()],
        sort_field: SortField::Impressions,
        sort_order: SortOrder::Descending,
        page: 1,
        page_size: PageSize::Five,
        ..QueryConfig::new()
    };

    let page = run_query(&tweets, &config);

    // "3" is excluded by text, "5" by keywords, "6" by impressions.
    let ids: Vec<&str> = page.tweets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4", "2"]);
    assert_eq!(page.filtered_count, 3);
    assert_eq!(page.total_count, 6);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn mention_filter_combines_with_impressions() {
    let tweets = fixture();
    let config = QueryConfig {
        min_impressions: 100,
        selected_mentions: vec!["@Binance".to_string()],
        ..QueryConfig::new()
    };

    let page = run_query(&tweets, &config);
    let ids: Vec<&str> = page.tweets.iter().map(|t| t.id.as_str()).collect();
    // "3" and "4" mention @Binance (extracted from text) and clear the bound.
    assert_eq!(page.filtered_count, 2);
    assert!(ids.contains(&"3"));
    assert!(ids.contains(&"4"));
}

#[test]
fn page_walk_covers_all_filtered_tweets_exactly_once() {
    let tweets: Vec<Tweet> = (0..23)
        .map(|i| {
            tweet(
                &format!("t{i}"),
                "text",
                i,
                &format!("2025-01-{:02}T00:00:00Z", (i % 27) + 1),
            )
        })
        .collect();

    let mut config = QueryConfig {
        sort_field: SortField::Impressions,
        sort_order: SortOrder::Ascending,
        ..QueryConfig::new()
    };

    let mut seen = Vec::new();
    for page_index in 1..=3 {
        config.page = page_index;
        let page = run_query(&tweets, &config);
        assert_eq!(page.total_pages, 3);
        seen.extend(page.tweets.into_iter().map(|t| t.id));
    }
    assert_eq!(seen.len(), 23);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 23);

    // Walking past the end yields an empty page, not an error.
    config.page = 4;
    assert!(run_query(&tweets, &config).tweets.is_empty());
}

#[test]
fn changing_page_size_requires_caller_to_reset_page() {
    // The UX contract: the engine does not clamp, so a caller that keeps a
    // stale page index after shrinking the result set gets an empty slice
    // and must reset to page 1.
    let tweets = fixture();
    let stale = QueryConfig {
        page: 9,
        ..QueryConfig::new()
    };
    let page = run_query(&tweets, &stale);
    assert!(page.tweets.is_empty());
    assert!(page.total_pages >= 1);

    let reset = QueryConfig::new();
    assert!(!run_query(&tweets, &reset).tweets.is_empty());
}

#[test]
fn date_sort_skips_nothing_and_keeps_unparsable_entries() {
    let tweets = fixture();
    let page = run_query(&tweets, &QueryConfig::new());
    // All six survive an empty filter config, including the unparsable one.
    assert_eq!(page.filtered_count, 6);
    let ids: Vec<&str> = page.tweets.iter().map(|t| t.id.as_str()).collect();
    assert!(ids.contains(&"6"));
    // Parsable entries are newest first.
    let pos = |id: &str| ids.iter().position(|x| *x == id).unwrap();
    assert!(pos("5") < pos("4"));
    assert!(pos("4") < pos("3"));
    assert!(pos("1") > pos("2"));
}

#[test]
fn unique_mentions_come_from_the_unfiltered_list() {
    let tweets = fixture();
    let mentions = unique_mentions(&tweets);
    assert!(mentions.contains(&"@Binance".to_string()));
    assert!(mentions.contains(&"@cz_binance".to_string()));
    assert!(mentions.contains(&"@okx".to_string()));
}
