//! Integration tests for the stats domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migration produces a usable `hits` table
//! - The aggregation SQL counts, filters and orders like the in-memory store
//!
//! They need Docker: `cargo test -p domain_stats -- --ignored`

use chrono::{NaiveDate, NaiveDateTime};
use domain_stats::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn at(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_assigns_sequential_ids() {
    let db = TestDatabase::new().await;
    let repo = PgHitRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_ids");

    let first = repo
        .create(NewHit::new(builder.app("main"), builder.uri("/events", 1), builder.ip(1), at(10, 0)))
        .await
        .unwrap();
    let second = repo
        .create(NewHit::new(builder.app("main"), builder.uri("/events", 1), builder.ip(1), at(10, 0)))
        .await
        .unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.timestamp, at(10, 0));
    assert_eq!(first.app, builder.app("main"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_aggregate_total_and_unique() {
    let db = TestDatabase::new().await;
    let repo = PgHitRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("total_and_unique");
    let app = builder.app("main");
    let uri = builder.uri("/events", 1);

    for (ip, ts) in [(1, at(9, 30)), (1, at(10, 0)), (2, at(10, 30))] {
        repo.create(NewHit::new(&app, &uri, builder.ip(ip), ts))
            .await
            .unwrap();
    }

    let query = StatsQuery::new(at(9, 0), at(11, 0)).with_uris([uri.clone()]);

    let total = repo.aggregate(&query).await.unwrap();
    assert_eq!(total, vec![ViewStats::new(&app, &uri, 3)]);

    let unique = repo.aggregate(&query.clone().unique(true)).await.unwrap();
    assert_eq!(unique, vec![ViewStats::new(&app, &uri, 2)]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_aggregate_orders_by_hits_then_first_seen() {
    let db = TestDatabase::new().await;
    let repo = PgHitRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("ordering");
    let app = builder.app("main");

    // /3 is seen first but has fewer hits; /1 and /2 tie and /1 is seen first
    for id in [3, 1, 2, 2, 1] {
        repo.create(NewHit::new(&app, builder.uri("/events", id), builder.ip(1), at(10, 0)))
            .await
            .unwrap();
    }

    let stats = repo
        .aggregate(&StatsQuery::new(at(9, 0), at(11, 0)))
        .await
        .unwrap();

    assert_sorted_desc(&stats, |s| s.hits, "stats");
    let uris: Vec<String> = stats.into_iter().map(|s| s.uri).collect();
    assert_eq!(
        uris,
        vec![
            builder.uri("/events", 1),
            builder.uri("/events", 2),
            builder.uri("/events", 3),
        ]
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_aggregate_start_equal_end_is_inclusive() {
    let db = TestDatabase::new().await;
    let repo = PgHitRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("instant");
    let app = builder.app("main");
    let uri = builder.uri("/events", 1);

    repo.create(NewHit::new(&app, &uri, builder.ip(1), at(10, 0)))
        .await
        .unwrap();
    repo.create(NewHit::new(&app, &uri, builder.ip(2), at(10, 1)))
        .await
        .unwrap();

    let stats = repo
        .aggregate(&StatsQuery::new(at(10, 0), at(10, 0)))
        .await
        .unwrap();

    let row = assert_some(stats.first().cloned(), "hit at the instant");
    assert_eq!(row.hits, 1);
    assert_eq!(stats.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_aggregate_unknown_uri_is_empty() {
    let db = TestDatabase::new().await;
    let repo = PgHitRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("unknown_uri");

    repo.create(NewHit::new(builder.app("main"), builder.uri("/events", 1), builder.ip(1), at(10, 0)))
        .await
        .unwrap();

    let stats = repo
        .aggregate(&StatsQuery::new(at(9, 0), at(11, 0)).with_uris([builder.uri("/events", 404)]))
        .await
        .unwrap();

    assert!(stats.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_rejects_inverted_range_before_querying() {
    let db = TestDatabase::new().await;
    let service = StatsService::new(PgHitRepository::new(db.connection()));

    let result = service.get_stats(StatsQuery::new(at(11, 0), at(9, 0))).await;

    assert!(matches!(result, Err(StatsError::InvalidRange { .. })));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_hits_are_all_counted() {
    let db = TestDatabase::new().await;
    let service = StatsService::new(PgHitRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("concurrent");
    let app = builder.app("main");
    let uri = builder.uri("/events", 1);

    let writes = (0..10u8).map(|n| {
        service.record_hit(NewHit::new(&app, &uri, builder.ip(n), at(10, 0)))
    });
    for result in futures::future::join_all(writes).await {
        result.unwrap();
    }

    let stats = service
        .get_stats(StatsQuery::new(at(9, 0), at(11, 0)).unique(true))
        .await
        .unwrap();
    assert_eq!(stats, vec![ViewStats::new(&app, &uri, 10)]);
}
