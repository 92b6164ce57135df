//! Integration tests for database initialization and store queries

use pcjc_common::db::models::AwardRecord;
use pcjc_common::db::{self, AwardFilter};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = db::init_database(&dir.path().join("orchid_awards.sqlite"))
        .await
        .unwrap();
    (dir, pool)
}

fn sample_record(award_num: &str) -> AwardRecord {
    AwardRecord {
        award_num: award_num.to_string(),
        award: Some("AM".to_string()),
        award_points: Some(82),
        location: Some("San Francisco".to_string()),
        date_text: Some("March 2, 2025".to_string()),
        date_iso: Some("2025-03-02".to_string()),
        genus: Some("Cattleya".to_string()),
        species: Some("maxima".to_string()),
        clone_name: Some("Hsinying".to_string()),
        cross_name: Some("N/A".to_string()),
        exhibitor: Some("Pierre Pujol".to_string()),
        photographer: Some("Ramon de los Santos".to_string()),
        photo: Some(format!("images/{}.jpg", award_num)),
        source_url: Some(format!(
            "https://www.paccentraljc.org/20250302/{}.html",
            award_num
        )),
        year: 2025,
        measurement_type: Some("Lip&LateralSepal".to_string()),
        description: Some("Twelve flat flowers on one inflorescence".to_string()),
        num_flowers: Some(12),
        num_buds: Some(2),
        num_inflorescences: Some(1),
        ns: Some(10.2),
        nsv: Some(9.8),
        dsw: Some(2.1),
        dsl: Some(5.4),
        petw: Some(3.3),
        petl: Some(5.1),
        lsw: Some(2.0),
        lsl: Some(5.2),
        lipw: Some(3.8),
        lipl: Some(4.9),
        synsw: None,
        synsl: None,
        pchw: None,
        pchl: None,
    }
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("orchid_awards.sqlite");

    let result = db::init_database(&db_path).await;
    assert!(
        result.is_ok(),
        "Database initialization failed: {:?}",
        result.err()
    );
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("orchid_awards.sqlite");

    let pool1 = db::init_database(&db_path).await;
    assert!(pool1.is_ok());
    pool1.unwrap().close().await;

    let pool2 = db::init_database(&db_path).await;
    assert!(
        pool2.is_ok(),
        "Failed to open existing database: {:?}",
        pool2.err()
    );
}

#[tokio::test]
async fn test_upsert_then_get_round_trip() {
    let (_dir, pool) = test_pool().await;
    let record = sample_record("20255302");

    db::upsert_award(&pool, &record).await.unwrap();

    let stored = db::get_award(&pool, "20255302").await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_upsert_overwrites_instead_of_duplicating() {
    let (_dir, pool) = test_pool().await;

    let mut record = sample_record("20255302");
    db::upsert_award(&pool, &record).await.unwrap();

    record.exhibitor = Some("David Sorokowsky".to_string());
    db::upsert_award(&pool, &record).await.unwrap();

    let all = db::list_awards(&pool, &AwardFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1, "upsert must not create a second row");
    assert_eq!(
        all[0].exhibitor.as_deref(),
        Some("David Sorokowsky"),
        "upsert must overwrite fields"
    );
}

#[tokio::test]
async fn test_list_awards_filters_and_order() {
    let (_dir, pool) = test_pool().await;

    let mut a = sample_record("20245100");
    a.year = 2024;
    a.date_iso = Some("2024-05-19".to_string());
    let mut b = sample_record("20245101");
    b.year = 2024;
    b.date_iso = Some("2024-11-02".to_string());
    b.exhibitor = Some("Japheth Ko".to_string());
    let mut c = sample_record("20255302");
    c.date_iso = None; // defective date sorts last

    for record in [&a, &b, &c] {
        db::upsert_award(&pool, record).await.unwrap();
    }

    let by_year = db::list_awards(
        &pool,
        &AwardFilter {
            year: Some(2024),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_year.len(), 2);
    // Newest first
    assert_eq!(by_year[0].award_num, "20245101");
    assert_eq!(by_year[1].award_num, "20245100");

    let by_exhibitor = db::list_awards(
        &pool,
        &AwardFilter {
            exhibitor: Some("Japheth Ko".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_exhibitor.len(), 1);
    assert_eq!(by_exhibitor[0].award_num, "20245101");

    let all = db::list_awards(&pool, &AwardFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(
        all[2].award_num, "20255302",
        "rows without date_iso sort last"
    );
}

#[tokio::test]
async fn test_year_counts() {
    let (_dir, pool) = test_pool().await;

    let mut a = sample_record("20245100");
    a.year = 2024;
    let mut b = sample_record("20245101");
    b.year = 2024;
    let c = sample_record("20255302");

    for record in [&a, &b, &c] {
        db::upsert_award(&pool, record).await.unwrap();
    }

    let counts = db::year_counts(&pool).await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].year, 2025);
    assert_eq!(counts[0].count, 1);
    assert_eq!(counts[1].year, 2024);
    assert_eq!(counts[1].count, 2);
}

#[tokio::test]
async fn test_corrections_append_and_sequence() {
    let (_dir, pool) = test_pool().await;
    db::upsert_award(&pool, &sample_record("20255302"))
        .await
        .unwrap();

    let seq1 = db::append_correction(
        &pool,
        "20255302",
        "2026-02-11T10:00:00Z",
        "exhibitor",
        Some("Dave Sorokowsky"),
        Some("David Sorokowsky"),
        "automated-import",
        Some("exhibitor name standardization"),
    )
    .await
    .unwrap();
    let seq2 = db::append_correction(
        &pool,
        "20255302",
        "2026-02-11T10:00:01Z",
        "location",
        Some("San Fransisco"),
        Some("San Francisco"),
        "automated-import",
        None,
    )
    .await
    .unwrap();

    assert_eq!(seq1, 1);
    assert_eq!(seq2, 2);

    let entries = db::corrections_for(&pool, "20255302").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].field, "exhibitor");
    assert_eq!(entries[1].field, "location");
    assert_eq!(db::correction_count(&pool, "20255302").await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_award_cascades_corrections() {
    let (_dir, pool) = test_pool().await;
    db::upsert_award(&pool, &sample_record("20255302"))
        .await
        .unwrap();
    db::append_correction(
        &pool,
        "20255302",
        "2026-02-11T10:00:00Z",
        "photo",
        None,
        Some("images/20255302.jpg"),
        "automated-import",
        None,
    )
    .await
    .unwrap();

    assert!(db::delete_award(&pool, "20255302").await.unwrap());
    assert!(!db::delete_award(&pool, "20255302").await.unwrap());

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM corrections WHERE award_num = '20255302'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0, "corrections must cascade on delete");
}
