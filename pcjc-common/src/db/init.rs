//! Database initialization
//!
//! Opens (or creates) the SQLite database, applies the session pragmas and
//! brings the schema up to date. Safe to call at every service start.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL lets the web read side keep serving while an import batch writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation is idempotent - safe to call multiple times
    create_schema_version_table(&pool).await?;
    create_awards_table(&pool).await?;
    create_corrections_table(&pool).await?;

    crate::db::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the awards table
///
/// One row per physical award certificate, keyed by award number. The
/// measurement columns mirror the judging sheet: shared fields (NS, NSV,
/// DSW, DSL, PETW, PETL) plus one of the two group-specific sets
/// (LSW/LSL/LIPW/LIPL or SYNSW/SYNSL/PCHW/PCHL) depending on
/// `measurement_type`.
pub async fn create_awards_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS awards (
            award_num TEXT PRIMARY KEY,
            award TEXT,
            award_points INTEGER,
            location TEXT,
            date_text TEXT,
            date_iso TEXT,
            genus TEXT,
            species TEXT,
            clone_name TEXT,
            cross_name TEXT,
            exhibitor TEXT,
            photographer TEXT,
            photo TEXT,
            source_url TEXT,
            year INTEGER NOT NULL,
            measurement_type TEXT,
            description TEXT,
            num_flowers INTEGER,
            num_buds INTEGER,
            num_inflorescences INTEGER,
            ns REAL,
            nsv REAL,
            dsw REAL,
            dsl REAL,
            petw REAL,
            petl REAL,
            lsw REAL,
            lsl REAL,
            lipw REAL,
            lipl REAL,
            synsw REAL,
            synsl REAL,
            pchw REAL,
            pchl REAL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (award_points IS NULL OR (award_points >= 0 AND award_points <= 100)),
            CHECK (measurement_type IS NULL OR measurement_type IN ('Lip&LateralSepal', 'Pouch&Synsepal', 'Other')),
            CHECK (year > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the read-side filters
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_year ON awards(year)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_award ON awards(award)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_genus ON awards(genus)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_location ON awards(location)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_exhibitor ON awards(exhibitor)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_awards_date_iso ON awards(date_iso)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the corrections table
///
/// Append-only audit trail of field-level fixes, keyed `(award_num, seq)`.
/// Kept out of the awards row so re-imports cannot bloat a record's payload.
pub async fn create_corrections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS corrections (
            award_num TEXT NOT NULL REFERENCES awards(award_num) ON DELETE CASCADE,
            seq INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            field TEXT NOT NULL,
            old_value TEXT,
            new_value TEXT,
            source TEXT NOT NULL,
            reason TEXT,
            PRIMARY KEY (award_num, seq)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_corrections_award ON corrections(award_num)")
        .execute(pool)
        .await?;

    Ok(())
}
