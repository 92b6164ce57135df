//! Store queries
//!
//! All writes are single-row upserts keyed by award number; the read side
//! filters by year, exhibitor and location and sorts by `date_iso`
//! descending so newest awards list first.

use crate::db::models::{AwardRecord, Correction, YearCount};
use crate::Result;
use sqlx::SqlitePool;

/// Column list shared by every SELECT that maps to `AwardRecord`.
/// `created_at`/`updated_at` are bookkeeping only and stay out of the model.
const AWARD_COLUMNS: &str = "award_num, award, award_points, location, date_text, date_iso, \
     genus, species, clone_name, cross_name, exhibitor, photographer, photo, source_url, year, \
     measurement_type, description, num_flowers, num_buds, num_inflorescences, \
     ns, nsv, dsw, dsl, petw, petl, lsw, lsl, lipw, lipl, synsw, synsl, pchw, pchl";

/// Read-side filter for award listings
#[derive(Debug, Clone, Default)]
pub struct AwardFilter {
    pub year: Option<i64>,
    pub exhibitor: Option<String>,
    pub location: Option<String>,
    pub limit: Option<i64>,
}

/// Insert or overwrite one award row.
///
/// Re-running an import must never duplicate a record, so conflicts on the
/// primary key overwrite every data column and bump `updated_at`.
pub async fn upsert_award(pool: &SqlitePool, record: &AwardRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO awards (
            award_num, award, award_points, location, date_text, date_iso,
            genus, species, clone_name, cross_name, exhibitor, photographer,
            photo, source_url, year, measurement_type, description,
            num_flowers, num_buds, num_inflorescences,
            ns, nsv, dsw, dsl, petw, petl,
            lsw, lsl, lipw, lipl, synsw, synsl, pchw, pchl
        )
        VALUES (
            ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?, ?, ?
        )
        ON CONFLICT(award_num) DO UPDATE SET
            award = excluded.award,
            award_points = excluded.award_points,
            location = excluded.location,
            date_text = excluded.date_text,
            date_iso = excluded.date_iso,
            genus = excluded.genus,
            species = excluded.species,
            clone_name = excluded.clone_name,
            cross_name = excluded.cross_name,
            exhibitor = excluded.exhibitor,
            photographer = excluded.photographer,
            photo = excluded.photo,
            source_url = excluded.source_url,
            year = excluded.year,
            measurement_type = excluded.measurement_type,
            description = excluded.description,
            num_flowers = excluded.num_flowers,
            num_buds = excluded.num_buds,
            num_inflorescences = excluded.num_inflorescences,
            ns = excluded.ns,
            nsv = excluded.nsv,
            dsw = excluded.dsw,
            dsl = excluded.dsl,
            petw = excluded.petw,
            petl = excluded.petl,
            lsw = excluded.lsw,
            lsl = excluded.lsl,
            lipw = excluded.lipw,
            lipl = excluded.lipl,
            synsw = excluded.synsw,
            synsl = excluded.synsl,
            pchw = excluded.pchw,
            pchl = excluded.pchl,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&record.award_num)
    .bind(&record.award)
    .bind(record.award_points)
    .bind(&record.location)
    .bind(&record.date_text)
    .bind(&record.date_iso)
    .bind(&record.genus)
    .bind(&record.species)
    .bind(&record.clone_name)
    .bind(&record.cross_name)
    .bind(&record.exhibitor)
    .bind(&record.photographer)
    .bind(&record.photo)
    .bind(&record.source_url)
    .bind(record.year)
    .bind(&record.measurement_type)
    .bind(&record.description)
    .bind(record.num_flowers)
    .bind(record.num_buds)
    .bind(record.num_inflorescences)
    .bind(record.ns)
    .bind(record.nsv)
    .bind(record.dsw)
    .bind(record.dsl)
    .bind(record.petw)
    .bind(record.petl)
    .bind(record.lsw)
    .bind(record.lsl)
    .bind(record.lipw)
    .bind(record.lipl)
    .bind(record.synsw)
    .bind(record.synsl)
    .bind(record.pchw)
    .bind(record.pchl)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch one award by its number
pub async fn get_award(pool: &SqlitePool, award_num: &str) -> Result<Option<AwardRecord>> {
    let sql = format!("SELECT {} FROM awards WHERE award_num = ?", AWARD_COLUMNS);
    let record = sqlx::query_as::<_, AwardRecord>(&sql)
        .bind(award_num)
        .fetch_optional(pool)
        .await?;

    Ok(record)
}

/// List awards matching the filter, newest first.
///
/// Rows without a parseable date sort last (`date_iso IS NULL`), which keeps
/// defective records visible at the end of a listing instead of hidden.
pub async fn list_awards(pool: &SqlitePool, filter: &AwardFilter) -> Result<Vec<AwardRecord>> {
    let mut sql = format!("SELECT {} FROM awards WHERE 1=1", AWARD_COLUMNS);

    if filter.year.is_some() {
        sql.push_str(" AND year = ?");
    }
    if filter.exhibitor.is_some() {
        sql.push_str(" AND exhibitor = ?");
    }
    if filter.location.is_some() {
        sql.push_str(" AND location = ?");
    }
    sql.push_str(" ORDER BY date_iso IS NULL, date_iso DESC, award_num DESC");
    if filter.limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut query = sqlx::query_as::<_, AwardRecord>(&sql);
    if let Some(year) = filter.year {
        query = query.bind(year);
    }
    if let Some(ref exhibitor) = filter.exhibitor {
        query = query.bind(exhibitor);
    }
    if let Some(ref location) = filter.location {
        query = query.bind(location);
    }
    if let Some(limit) = filter.limit {
        query = query.bind(limit);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Per-year award counts, newest year first
pub async fn year_counts(pool: &SqlitePool) -> Result<Vec<YearCount>> {
    let counts = sqlx::query_as::<_, YearCount>(
        "SELECT year, COUNT(*) AS count FROM awards GROUP BY year ORDER BY year DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Distinct non-empty exhibitor names, for the name-variant review
pub async fn distinct_exhibitors(pool: &SqlitePool) -> Result<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT exhibitor FROM awards \
         WHERE exhibitor IS NOT NULL AND exhibitor != '' ORDER BY exhibitor",
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Distinct non-empty location names, for the name-variant review
pub async fn distinct_locations(pool: &SqlitePool) -> Result<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT location FROM awards \
         WHERE location IS NOT NULL AND location != '' ORDER BY location",
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Every stored award number with its photo path, for photo verification
pub async fn photo_index(pool: &SqlitePool) -> Result<Vec<(String, Option<String>)>> {
    let rows: Vec<(String, Option<String>)> =
        sqlx::query_as("SELECT award_num, photo FROM awards ORDER BY award_num")
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

/// All stored award numbers, for placeholder cleanup
pub async fn list_award_nums(pool: &SqlitePool) -> Result<Vec<String>> {
    let nums: Vec<String> = sqlx::query_scalar("SELECT award_num FROM awards ORDER BY award_num")
        .fetch_all(pool)
        .await?;

    Ok(nums)
}

/// Delete one award row (cascades to its corrections).
///
/// Only the placeholder cleanup path uses this; normal records are never
/// deleted.
pub async fn delete_award(pool: &SqlitePool, award_num: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM awards WHERE award_num = ?")
        .bind(award_num)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append one corrections entry, assigning the next sequence number.
///
/// Returns the assigned `seq`. Entries are never updated or removed.
pub async fn append_correction(
    pool: &SqlitePool,
    award_num: &str,
    timestamp: &str,
    field: &str,
    old_value: Option<&str>,
    new_value: Option<&str>,
    source: &str,
    reason: Option<&str>,
) -> Result<i64> {
    let seq: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(seq), 0) + 1 FROM corrections WHERE award_num = ?",
    )
    .bind(award_num)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO corrections (award_num, seq, timestamp, field, old_value, new_value, source, reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(award_num)
    .bind(seq)
    .bind(timestamp)
    .bind(field)
    .bind(old_value)
    .bind(new_value)
    .bind(source)
    .bind(reason)
    .execute(pool)
    .await?;

    Ok(seq)
}

/// Corrections for one award, in append order
pub async fn corrections_for(pool: &SqlitePool, award_num: &str) -> Result<Vec<Correction>> {
    let entries = sqlx::query_as::<_, Correction>(
        "SELECT award_num, seq, timestamp, field, old_value, new_value, source, reason \
         FROM corrections WHERE award_num = ? ORDER BY seq",
    )
    .bind(award_num)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Number of corrections recorded for one award
pub async fn correction_count(pool: &SqlitePool, award_num: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM corrections WHERE award_num = ?")
        .bind(award_num)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
