//! Database models

use serde::{Deserialize, Serialize};

/// Measurement-group classification for one award.
///
/// Which flower-part measurement group applies: lip/lateral-sepal orchids,
/// pouch/synsepal orchids (paphs and phrags), or other/display awards that
/// carry no flower measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementType {
    #[serde(rename = "Lip&LateralSepal")]
    LipLateralSepal,
    #[serde(rename = "Pouch&Synsepal")]
    PouchSynsepal,
    #[serde(rename = "Other")]
    Other,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::LipLateralSepal => "Lip&LateralSepal",
            MeasurementType::PouchSynsepal => "Pouch&Synsepal",
            MeasurementType::Other => "Other",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Lip&LateralSepal" => Some(MeasurementType::LipLateralSepal),
            "Pouch&Synsepal" => Some(MeasurementType::PouchSynsepal),
            "Other" => Some(MeasurementType::Other),
            _ => None,
        }
    }
}

/// One award record, as stored in the `awards` table.
///
/// `award_num` is the immutable primary key. `date_text` keeps the original
/// free-text date for provenance; `date_iso` is the derived `YYYY-MM-DD`
/// form every query sorts and filters on. The `clone`/`cross` fields of the
/// raw records are stored as `clone_name`/`cross_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AwardRecord {
    pub award_num: String,
    pub award: Option<String>,
    pub award_points: Option<i64>,
    pub location: Option<String>,
    pub date_text: Option<String>,
    pub date_iso: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub clone_name: Option<String>,
    pub cross_name: Option<String>,
    pub exhibitor: Option<String>,
    pub photographer: Option<String>,
    pub photo: Option<String>,
    pub source_url: Option<String>,
    pub year: i64,
    pub measurement_type: Option<String>,
    pub description: Option<String>,
    pub num_flowers: Option<i64>,
    pub num_buds: Option<i64>,
    pub num_inflorescences: Option<i64>,
    pub ns: Option<f64>,
    pub nsv: Option<f64>,
    pub dsw: Option<f64>,
    pub dsl: Option<f64>,
    pub petw: Option<f64>,
    pub petl: Option<f64>,
    pub lsw: Option<f64>,
    pub lsl: Option<f64>,
    pub lipw: Option<f64>,
    pub lipl: Option<f64>,
    pub synsw: Option<f64>,
    pub synsl: Option<f64>,
    pub pchw: Option<f64>,
    pub pchl: Option<f64>,
}

/// One entry in the append-only corrections audit trail.
///
/// Entries are keyed `(award_num, seq)`; `seq` increases monotonically per
/// award and existing entries are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Correction {
    pub award_num: String,
    pub seq: i64,
    pub timestamp: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: String,
    pub reason: Option<String>,
}

/// Per-year award count for the read side
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct YearCount {
    pub year: i64,
    pub count: i64,
}
