//! Award record import pipeline
//!
//! Takes raw per-award JSON records, applies the field normalizers and
//! upserts the result into the store. Re-running an import is safe: an
//! unchanged record is a no-op and writes nothing, a changed record is
//! overwritten with one corrections entry per changed field. The unit of
//! failure isolation is always a single record; a batch never aborts
//! because one file is bad.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Map;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use pcjc_common::config::Paths;
use pcjc_common::db::{self, models::AwardRecord};
use pcjc_common::AwardNum;

use crate::normalize::photo::{canonical_photo_path, resolve_photo, PhotoStatus};
use crate::normalize::{clean_text, date, measurements, names::AliasTable};
use crate::raw::{value_to_string, RawAward};

/// Source tag for corrections written by the importer
pub const IMPORT_SOURCE: &str = "automated-import";

/// Source tag for corrections preserved from a raw record's embedded trail
pub const LEGACY_SOURCE: &str = "legacy-record";

/// Import pipeline errors (fatal to one record, never to a batch)
#[derive(Debug, Error)]
pub enum ImportError {
    /// Record has no awardNum key
    #[error("record has no awardNum key")]
    MissingKey,

    /// awardNum present but not a valid award number
    #[error("invalid award number: {0:?}")]
    InvalidAwardNum(String),

    /// Raw record is not valid JSON
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Cannot read a raw record file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Common(#[from] pcjc_common::Error),
}

/// Outcome of importing one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No row existed; one was inserted
    Inserted,
    /// Row existed and differed; overwritten with audited corrections
    Updated { corrections: usize },
    /// Row existed and was identical; nothing written, nothing logged
    Unchanged,
}

/// How bad one reported issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Record was skipped entirely
    Error,
    /// Record was stored with a defective field
    Warning,
}

/// One per-record issue, with enough context for a human to act on
#[derive(Debug, Clone)]
pub struct RecordIssue {
    pub severity: IssueSeverity,
    pub award_num: Option<String>,
    pub field: Option<String>,
    pub reason: String,
}

impl RecordIssue {
    fn error(award_num: Option<&str>, reason: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            award_num: award_num.map(str::to_string),
            field: None,
            reason,
        }
    }

    fn warning(award_num: &str, field: &str, reason: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            award_num: Some(award_num.to_string()),
            field: Some(field.to_string()),
            reason,
        }
    }
}

/// Result of importing one record: the outcome plus any field-level issues
#[derive(Debug)]
pub struct ImportResult {
    pub outcome: ImportOutcome,
    pub issues: Vec<RecordIssue>,
}

/// Per-run summary for a batch import
#[derive(Debug)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub issues: Vec<RecordIssue>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            processed: 0,
            inserted: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            issues: Vec::new(),
        }
    }

    fn skip(&mut self, award_num: Option<&str>, reason: String) {
        self.skipped += 1;
        self.issues.push(RecordIssue::error(award_num, reason));
    }

    /// Human-readable summary for the batch tool's output
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Import run {}\n", self.run_id));
        out.push_str(&format!("  processed: {}\n", self.processed));
        out.push_str(&format!("  inserted:  {}\n", self.inserted));
        out.push_str(&format!("  updated:   {}\n", self.updated));
        out.push_str(&format!("  unchanged: {}\n", self.unchanged));
        out.push_str(&format!("  skipped:   {}\n", self.skipped));
        if !self.issues.is_empty() {
            out.push_str(&format!("Issues ({}):\n", self.issues.len()));
            for issue in &self.issues {
                let severity = match issue.severity {
                    IssueSeverity::Error => "error",
                    IssueSeverity::Warning => "warning",
                };
                out.push_str(&format!(
                    "  [{}] {} {}: {}\n",
                    severity,
                    issue.award_num.as_deref().unwrap_or("-"),
                    issue.field.as_deref().unwrap_or("-"),
                    issue.reason
                ));
            }
        }
        out
    }
}

/// Photo verification summary
#[derive(Debug, Default)]
pub struct PhotoReport {
    pub checked: usize,
    pub correct: usize,
    pub rewritten: usize,
    pub missing: usize,
    pub absent: usize,
    pub issues: Vec<RecordIssue>,
}

/// Placeholder cleanup summary
#[derive(Debug, Default)]
pub struct CleanReport {
    pub scanned: usize,
    pub invalid: Vec<String>,
    pub deleted: usize,
}

/// One field-level difference between the stored and the normalized record
struct FieldChange {
    field: &'static str,
    old: Option<String>,
    new: Option<String>,
}

/// The import pipeline
pub struct Importer {
    pool: SqlitePool,
    exhibitors: AliasTable,
    locations: AliasTable,
    images_dir: PathBuf,
}

impl Importer {
    pub fn new(pool: SqlitePool, images_dir: PathBuf) -> Self {
        Self {
            pool,
            exhibitors: AliasTable::exhibitors(),
            locations: AliasTable::locations(),
            images_dir,
        }
    }

    /// Apply every normalizer to a raw record.
    ///
    /// Fails fast only on a missing or malformed award number; field-level
    /// defects (unparseable date, dangling photo) surface as issues on a
    /// record that is still stored.
    pub fn normalize_record(
        &self,
        raw: &RawAward,
    ) -> Result<(AwardRecord, Vec<RecordIssue>), ImportError> {
        let award_num_text = raw
            .award_num
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ImportError::MissingKey)?;
        let award_num = AwardNum::parse(award_num_text)
            .map_err(|_| ImportError::InvalidAwardNum(award_num_text.to_string()))?;

        let mut issues = Vec::new();

        let date_text = clean_text(raw.date.as_deref());
        let date_iso = match date_text.as_deref() {
            Some(text) => match date::normalize_date(text) {
                Ok(iso) => Some(iso),
                Err(err) => {
                    issues.push(RecordIssue::warning(
                        award_num.as_str(),
                        "date",
                        format!("{}; stored without date_iso", err),
                    ));
                    None
                }
            },
            None => None,
        };

        let exhibitor = clean_text(raw.exhibitor.as_deref())
            .map(|name| self.exhibitors.canonicalize(&name).to_string());
        let location = clean_text(raw.location.as_deref())
            .map(|name| self.locations.canonicalize(&name).to_string());

        let genus = clean_text(raw.genus.as_deref());
        let measurement_type = measurements::classify(genus.as_deref(), raw.measurements.as_ref());

        let empty = Map::new();
        let m = raw.measurements.as_ref().unwrap_or(&empty);
        use pcjc_common::db::models::MeasurementType;
        let flower = measurement_type != MeasurementType::Other;
        let lip = measurement_type == MeasurementType::LipLateralSepal;
        let pouch = measurement_type == MeasurementType::PouchSynsepal;

        let raw_photo = clean_text(raw.photo.as_deref());
        let photo = match resolve_photo(award_num.as_str(), raw_photo.as_deref(), &self.images_dir)
        {
            PhotoStatus::Absent => None,
            PhotoStatus::Correct => raw_photo,
            PhotoStatus::NeedsRewrite(canonical) => Some(canonical),
            PhotoStatus::Missing(path) => {
                issues.push(RecordIssue::warning(
                    award_num.as_str(),
                    "photo",
                    format!("photo file missing: {}", path.display()),
                ));
                // The reference is kept (canonicalized); the defect is
                // reported, not fatal.
                Some(canonical_photo_path(award_num.as_str()))
            }
        };

        let record = AwardRecord {
            year: award_num.year(),
            award_num: award_num.to_string(),
            award: clean_text(raw.award.as_deref()),
            award_points: raw.award_points,
            location,
            date_text,
            date_iso,
            genus,
            species: clean_text(raw.species.as_deref()),
            clone_name: clean_text(raw.clone.as_deref()),
            cross_name: clean_text(raw.cross.as_deref()),
            exhibitor,
            photographer: clean_text(raw.photographer.as_deref()),
            photo,
            source_url: clean_text(raw.source_url.as_deref()),
            measurement_type: Some(measurement_type.as_str().to_string()),
            description: measurements::text(m, "description"),
            num_flowers: measurements::integer(m, "numFlowers"),
            num_buds: measurements::integer(m, "numBuds"),
            num_inflorescences: measurements::integer(m, "numInflorescences"),
            ns: flower.then(|| measurements::numeric(m, "NS")).flatten(),
            nsv: flower.then(|| measurements::numeric(m, "NSV")).flatten(),
            dsw: flower.then(|| measurements::numeric(m, "DSW")).flatten(),
            dsl: flower.then(|| measurements::numeric(m, "DSL")).flatten(),
            petw: flower.then(|| measurements::numeric(m, "PETW")).flatten(),
            petl: flower.then(|| measurements::numeric(m, "PETL")).flatten(),
            lsw: lip.then(|| measurements::numeric(m, "LSW")).flatten(),
            lsl: lip.then(|| measurements::numeric(m, "LSL")).flatten(),
            lipw: lip.then(|| measurements::numeric(m, "LIPW")).flatten(),
            lipl: lip.then(|| measurements::numeric(m, "LIPL")).flatten(),
            synsw: pouch.then(|| measurements::numeric(m, "SYNSW")).flatten(),
            synsl: pouch.then(|| measurements::numeric(m, "SYNSL")).flatten(),
            pchw: pouch.then(|| measurements::numeric(m, "PCHW")).flatten(),
            pchl: pouch.then(|| measurements::numeric(m, "PCHL")).flatten(),
        };

        Ok((record, issues))
    }

    /// Import one raw record, idempotently.
    pub async fn import_record(&self, raw: &RawAward) -> Result<ImportResult, ImportError> {
        let (record, issues) = self.normalize_record(raw)?;

        let existing = db::get_award(&self.pool, &record.award_num).await?;
        let outcome = match existing {
            None => {
                db::upsert_award(&self.pool, &record).await?;
                self.copy_embedded_corrections(raw, &record.award_num).await?;
                debug!("Inserted award {}", record.award_num);
                ImportOutcome::Inserted
            }
            Some(stored) => {
                let changes = diff_records(&stored, &record);
                if changes.is_empty() {
                    // No-op re-import: nothing written, nothing logged
                    ImportOutcome::Unchanged
                } else {
                    db::upsert_award(&self.pool, &record).await?;
                    let timestamp = Utc::now().to_rfc3339();
                    for change in &changes {
                        db::append_correction(
                            &self.pool,
                            &record.award_num,
                            &timestamp,
                            change.field,
                            change.old.as_deref(),
                            change.new.as_deref(),
                            IMPORT_SOURCE,
                            Some("raw record re-import differed from stored value"),
                        )
                        .await?;
                    }
                    debug!(
                        "Updated award {} ({} fields changed)",
                        record.award_num,
                        changes.len()
                    );
                    ImportOutcome::Updated {
                        corrections: changes.len(),
                    }
                }
            }
        };

        Ok(ImportResult { outcome, issues })
    }

    /// Preserve the audit entries embedded in a raw record (first insert
    /// only, so re-imports cannot duplicate them).
    async fn copy_embedded_corrections(
        &self,
        raw: &RawAward,
        award_num: &str,
    ) -> Result<(), ImportError> {
        let fallback_timestamp = Utc::now().to_rfc3339();
        for entry in &raw.corrections {
            db::append_correction(
                &self.pool,
                award_num,
                entry.timestamp.as_deref().unwrap_or(&fallback_timestamp),
                entry.field.as_deref().unwrap_or("record"),
                value_to_string(entry.old_value.as_ref()).as_deref(),
                value_to_string(entry.new_value.as_ref()).as_deref(),
                entry.source.as_deref().unwrap_or(LEGACY_SOURCE),
                entry.reason.as_deref(),
            )
            .await?;
        }
        Ok(())
    }

    /// Import a list of raw record files.
    ///
    /// One bad file never stops the rest: parse failures, missing keys and
    /// store errors are recorded in the report and the batch moves on.
    pub async fn import_batch(&self, files: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for path in files {
            report.processed += 1;

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    warn!("Cannot read {}: {}", path.display(), err);
                    report.skip(None, format!("{}: {}", path.display(), err));
                    continue;
                }
            };

            let raw = match RawAward::from_json(&text) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("Cannot parse {}: {}", path.display(), err);
                    report.skip(None, format!("{}: {}", path.display(), err));
                    continue;
                }
            };

            // Duplicate award number inside one batch: last write wins,
            // but it must be visible in the report.
            if let Some(num) = raw.award_num.as_deref().map(str::trim) {
                if let Some(previous) = seen.insert(num.to_string(), path.clone()) {
                    warn!(
                        "Duplicate awardNum {} in batch ({} and {})",
                        num,
                        previous.display(),
                        path.display()
                    );
                    report.issues.push(RecordIssue::warning(
                        num,
                        "awardNum",
                        format!(
                            "duplicate in batch (also in {}); last write wins",
                            previous.display()
                        ),
                    ));
                }
            }

            match self.import_record(&raw).await {
                Ok(result) => {
                    match result.outcome {
                        ImportOutcome::Inserted => report.inserted += 1,
                        ImportOutcome::Updated { .. } => report.updated += 1,
                        ImportOutcome::Unchanged => report.unchanged += 1,
                    }
                    report.issues.extend(result.issues);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    report.skip(raw.award_num.as_deref(), err.to_string());
                }
            }
        }

        report
    }

    /// Check every stored photo reference against the image library.
    ///
    /// With `apply`, non-canonical paths are rewritten through the audited
    /// update path; missing files are only ever reported.
    pub async fn verify_photos(&self, apply: bool) -> Result<PhotoReport, ImportError> {
        let mut report = PhotoReport::default();

        for (award_num, photo) in db::photo_index(&self.pool).await? {
            report.checked += 1;
            match resolve_photo(&award_num, photo.as_deref(), &self.images_dir) {
                PhotoStatus::Correct => report.correct += 1,
                PhotoStatus::Absent => report.absent += 1,
                PhotoStatus::Missing(path) => {
                    report.missing += 1;
                    report.issues.push(RecordIssue::warning(
                        &award_num,
                        "photo",
                        format!("photo file missing: {}", path.display()),
                    ));
                }
                PhotoStatus::NeedsRewrite(canonical) => {
                    report.rewritten += 1;
                    if apply {
                        if let Some(stored) = db::get_award(&self.pool, &award_num).await? {
                            let mut updated = stored.clone();
                            updated.photo = Some(canonical.clone());
                            db::upsert_award(&self.pool, &updated).await?;
                            db::append_correction(
                                &self.pool,
                                &award_num,
                                &Utc::now().to_rfc3339(),
                                "photo",
                                stored.photo.as_deref(),
                                Some(&canonical),
                                "photo-path-fix",
                                Some("rewritten to canonical image library path"),
                            )
                            .await?;
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    /// Remove rows whose award number fails validation: index pages and
    /// placeholder entries that leaked in from the old scraper.
    pub async fn clean_placeholders(&self, dry_run: bool) -> Result<CleanReport, ImportError> {
        let mut report = CleanReport::default();

        for num in db::list_award_nums(&self.pool).await? {
            report.scanned += 1;
            if !AwardNum::is_valid(&num) {
                if !dry_run && db::delete_award(&self.pool, &num).await? {
                    report.deleted += 1;
                }
                report.invalid.push(num);
            }
        }

        Ok(report)
    }
}

/// Collect raw record files under the archive (`awards/{year}/data/json`),
/// sorted for a deterministic batch order.
pub fn collect_json_files(paths: &Paths, year: Option<i64>) -> Vec<PathBuf> {
    let root = match year {
        Some(year) => paths.year_json_dir(year),
        None => paths.root().join("awards"),
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().map(|e| e == "json").unwrap_or(false)
                && under_json_dir(entry.path())
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn under_json_dir(path: &Path) -> bool {
    path.parent()
        .map(|parent| parent.ends_with("data/json"))
        .unwrap_or(false)
}

/// Field-by-field comparison between the stored row and the freshly
/// normalized record, stringified the way the corrections table stores
/// values.
fn diff_records(old: &AwardRecord, new: &AwardRecord) -> Vec<FieldChange> {
    fn num<T: ToString>(value: &Option<T>) -> Option<String> {
        value.as_ref().map(T::to_string)
    }

    let mut changes = Vec::new();
    {
        let mut push = |field: &'static str, old: Option<String>, new: Option<String>| {
            if old != new {
                changes.push(FieldChange { field, old, new });
            }
        };

        push("award", old.award.clone(), new.award.clone());
        push("award_points", num(&old.award_points), num(&new.award_points));
        push("location", old.location.clone(), new.location.clone());
        push("date_text", old.date_text.clone(), new.date_text.clone());
        push("date_iso", old.date_iso.clone(), new.date_iso.clone());
        push("genus", old.genus.clone(), new.genus.clone());
        push("species", old.species.clone(), new.species.clone());
        push("clone_name", old.clone_name.clone(), new.clone_name.clone());
        push("cross_name", old.cross_name.clone(), new.cross_name.clone());
        push("exhibitor", old.exhibitor.clone(), new.exhibitor.clone());
        push(
            "photographer",
            old.photographer.clone(),
            new.photographer.clone(),
        );
        push("photo", old.photo.clone(), new.photo.clone());
        push("source_url", old.source_url.clone(), new.source_url.clone());
        push(
            "year",
            Some(old.year.to_string()),
            Some(new.year.to_string()),
        );
        push(
            "measurement_type",
            old.measurement_type.clone(),
            new.measurement_type.clone(),
        );
        push(
            "description",
            old.description.clone(),
            new.description.clone(),
        );
        push("num_flowers", num(&old.num_flowers), num(&new.num_flowers));
        push("num_buds", num(&old.num_buds), num(&new.num_buds));
        push(
            "num_inflorescences",
            num(&old.num_inflorescences),
            num(&new.num_inflorescences),
        );
        push("ns", num(&old.ns), num(&new.ns));
        push("nsv", num(&old.nsv), num(&new.nsv));
        push("dsw", num(&old.dsw), num(&new.dsw));
        push("dsl", num(&old.dsl), num(&new.dsl));
        push("petw", num(&old.petw), num(&new.petw));
        push("petl", num(&old.petl), num(&new.petl));
        push("lsw", num(&old.lsw), num(&new.lsw));
        push("lsl", num(&old.lsl), num(&new.lsl));
        push("lipw", num(&old.lipw), num(&new.lipw));
        push("lipl", num(&old.lipl), num(&new.lipl));
        push("synsw", num(&old.synsw), num(&new.synsw));
        push("synsl", num(&old.synsl), num(&new.synsl));
        push("pchw", num(&old.pchw), num(&new.pchw));
        push("pchl", num(&old.pchl), num(&new.pchl));
    }

    changes
}
