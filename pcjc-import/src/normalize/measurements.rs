//! Measurement-type classification
//!
//! Decides which flower-part measurement group applies to a record. The
//! decision is purely structural: which keys the raw measurement object
//! carries and what the genus says, never the numeric values.
//!
//! - `Other`: genus case-insensitively contains "display" (show displays
//!   and special awards carry no flower measurements)
//! - `Pouch&Synsepal`: all four of SYNSW, SYNSL, PCHW, PCHL present as keys
//! - `Lip&LateralSepal`: everything else

use pcjc_common::db::models::MeasurementType;
use serde_json::{Map, Value};

/// Measurement keys shared by both flower groups
pub const SHARED_KEYS: [&str; 6] = ["NS", "NSV", "DSW", "DSL", "PETW", "PETL"];

/// Keys specific to lip/lateral-sepal orchids
pub const LIP_GROUP: [&str; 4] = ["LSW", "LSL", "LIPW", "LIPL"];

/// Keys specific to pouch/synsepal orchids (paphs and phrags)
pub const POUCH_GROUP: [&str; 4] = ["SYNSW", "SYNSL", "PCHW", "PCHL"];

/// Classify one record's measurements
pub fn classify(genus: Option<&str>, measurements: Option<&Map<String, Value>>) -> MeasurementType {
    if let Some(genus) = genus {
        if genus.to_lowercase().contains("display") {
            return MeasurementType::Other;
        }
    }

    if let Some(m) = measurements {
        if POUCH_GROUP.iter().all(|key| m.contains_key(*key)) {
            return MeasurementType::PouchSynsepal;
        }
    }

    MeasurementType::LipLateralSepal
}

/// Read one numeric measurement, tolerating the string forms older scrape
/// rounds wrote ("10.2" as text).
pub fn numeric(measurements: &Map<String, Value>, key: &str) -> Option<f64> {
    match measurements.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read one integer count field (numFlowers, numBuds, numInflorescences)
pub fn integer(measurements: &Map<String, Value>, key: &str) -> Option<i64> {
    match measurements.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read one free-text measurement field (description)
pub fn text(measurements: &Map<String, Value>, key: &str) -> Option<String> {
    match measurements.get(key)? {
        Value::String(s) => crate::normalize::clean_text(Some(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_display_genus_is_other() {
        let m = map(json!({"SYNSW": 1, "SYNSL": 2, "PCHW": 1, "PCHL": 2}));
        assert_eq!(
            classify(Some("Display"), Some(&m)),
            MeasurementType::Other,
            "display genus wins over key presence"
        );
        assert_eq!(
            classify(Some("Orchid Display"), None),
            MeasurementType::Other
        );
        assert_eq!(classify(Some("display"), None), MeasurementType::Other);
    }

    #[test]
    fn test_all_four_pouch_keys_classify_as_pouch() {
        let m = map(json!({"SYNSW": 1, "SYNSL": 2, "PCHW": 1, "PCHL": 2}));
        assert_eq!(
            classify(Some("Paphiopedilum"), Some(&m)),
            MeasurementType::PouchSynsepal
        );
    }

    #[test]
    fn test_pouch_keys_count_even_when_null() {
        // Classification is key presence, not value content
        let m = map(json!({"SYNSW": null, "SYNSL": null, "PCHW": null, "PCHL": null}));
        assert_eq!(classify(None, Some(&m)), MeasurementType::PouchSynsepal);
    }

    #[test]
    fn test_partial_pouch_keys_default_to_lip() {
        let m = map(json!({"SYNSW": 1, "SYNSL": 2, "PCHW": 1}));
        assert_eq!(classify(None, Some(&m)), MeasurementType::LipLateralSepal);
    }

    #[test]
    fn test_no_measurements_default_to_lip() {
        assert_eq!(
            classify(Some("Cattleya"), None),
            MeasurementType::LipLateralSepal
        );
    }

    #[test]
    fn test_numeric_accepts_number_and_string() {
        let m = map(json!({"NS": 10.2, "NSV": "9.8", "DSW": "not found"}));
        assert_eq!(numeric(&m, "NS"), Some(10.2));
        assert_eq!(numeric(&m, "NSV"), Some(9.8));
        assert_eq!(numeric(&m, "DSW"), None);
        assert_eq!(numeric(&m, "PETW"), None);
    }

    #[test]
    fn test_integer_and_text_fields() {
        let m = map(json!({"numFlowers": 12, "description": " Twelve flat flowers "}));
        assert_eq!(integer(&m, "numFlowers"), Some(12));
        assert_eq!(
            text(&m, "description"),
            Some("Twelve flat flowers".to_string())
        );
    }
}
