//! Suggestion and analytics tests
//!
//! Suggestions merge four independent store sources and tolerate per-source
//! failure; analytics are fire-and-forget and can never affect the query
//! result.

mod common;

use std::time::Duration;

use catalog_search::{ContentRecord, Query, SuggestionKind};
use common::{flush_analytics, harness, record};

#[tokio::test]
async fn suggestions_merge_all_four_sources() -> anyhow::Result<()> {
    let records = vec![
        ContentRecord {
            tags: vec!["productivity".to_string()],
            topics: vec!["productive mornings".to_string()],
            author_name: "Pru Productiva".to_string(),
            ..record("a", "Daily Systems")
        },
    ];
    let h = harness(records);
    h.store.add_popular_query("productivity tips", 50);
    h.store.add_popular_query("product reviews", 10);

    let suggestions = h.engine.suggest("produc", 10).await;

    let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();
    assert!(kinds.contains(&SuggestionKind::Query));
    assert!(kinds.contains(&SuggestionKind::Tag));
    assert!(kinds.contains(&SuggestionKind::Topic));
    assert!(kinds.contains(&SuggestionKind::Author));

    for pair in suggestions.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "suggestions are ordered by descending score"
        );
    }
    Ok(())
}

#[tokio::test]
async fn a_failing_source_still_yields_the_others() -> anyhow::Result<()> {
    let records = vec![ContentRecord {
        tags: vec!["focus".to_string()],
        ..record("a", "Anything")
    }];
    let h = harness(records);
    h.store.add_popular_query("focus music", 5);
    h.store.fail_popular(true);

    let suggestions = h.engine.suggest("focus", 10).await;

    assert!(!suggestions.is_empty(), "tag source still contributes");
    assert!(
        suggestions.iter().all(|s| s.kind != SuggestionKind::Query),
        "the failed source contributes nothing"
    );
    Ok(())
}

#[tokio::test]
async fn suggestion_limit_and_blank_prefix_are_respected() -> anyhow::Result<()> {
    let records = vec![ContentRecord {
        tags: (0..20).map(|i| format!("focus-{i}")).collect(),
        ..record("a", "Anything")
    }];
    let h = harness(records);

    assert!(h.engine.suggest("   ", 10).await.is_empty());
    assert_eq!(h.engine.suggest("focus", 3).await.len(), 3);
    Ok(())
}

#[tokio::test]
async fn successful_queries_are_reported_with_popular_counters() -> anyhow::Result<()> {
    let h = harness(vec![record("a", "Alpha Waves")]);

    let query = Query {
        text: Some("Alpha Waves".to_string()),
        user_id: Some("user-1".to_string()),
        ..Query::default()
    };
    h.engine.search(&query).await?;
    flush_analytics(&h.sink).await;

    let queries = h.sink.recorded_queries();
    assert_eq!(queries.len(), 1);
    let (text, count, _elapsed, user) = &queries[0];
    assert_eq!(text.as_deref(), Some("Alpha Waves"));
    assert_eq!(*count, 1);
    assert_eq!(user.as_deref(), Some("user-1"));

    // One increment per rolling window, with normalized text.
    for _ in 0..50 {
        if h.sink.recorded_counters().len() == 5 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let counters = h.sink.recorded_counters();
    assert_eq!(counters.len(), 5);
    assert!(counters.iter().all(|(text, _)| text == "alpha waves"));
    Ok(())
}

#[tokio::test]
async fn filter_only_queries_report_without_popular_counters() -> anyhow::Result<()> {
    let h = harness(vec![record("a", "Alpha Waves")]);

    h.engine.search(&Query::default()).await?;
    flush_analytics(&h.sink).await;

    assert_eq!(h.sink.recorded_queries().len(), 1);
    // Give the detached task a moment; no counters should ever appear.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.sink.recorded_counters().is_empty());
    Ok(())
}

#[tokio::test]
async fn a_failing_sink_never_affects_the_query() -> anyhow::Result<()> {
    let h = harness(vec![record("a", "Alpha Waves")]);
    h.sink.fail(true);

    let result = h
        .engine
        .search(&Query {
            text: Some("alpha".to_string()),
            ..Query::default()
        })
        .await?;

    assert_eq!(result.total_count, 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.sink.recorded_queries().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_text_results_still_count_as_resolved() -> anyhow::Result<()> {
    let h = harness(vec![record("a", "Watercolor Painting")]);

    let result = h
        .engine
        .search(&Query {
            text: Some("zzqx vvnm".to_string()),
            ..Query::default()
        })
        .await?;
    assert_eq!(result.total_count, 0);

    flush_analytics(&h.sink).await;
    let queries = h.sink.recorded_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].1, 0, "zero results are still a resolution");
    Ok(())
}
