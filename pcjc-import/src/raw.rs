//! Raw award records
//!
//! Shape of the per-award JSON files the scraper writes under
//! `awards/{year}/data/json/{award_num}.json`. Field names follow the
//! harvested files (camelCase, `awardpoints` all lowercase); the importer
//! maps them onto the snake_case store schema.
//!
//! The `awardpoints` field is messy in the wild: older files carry a
//! number, non-point award types carry the string `"N/A"`, and some files
//! carry `null` or nothing. All three forms normalize to `None` here so the
//! rest of the pipeline sees a single sentinel.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One raw award record as scraped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAward {
    #[serde(rename = "awardNum")]
    pub award_num: Option<String>,
    pub award: Option<String>,
    #[serde(rename = "awardpoints", deserialize_with = "deserialize_points")]
    pub award_points: Option<i64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub clone: Option<String>,
    pub cross: Option<String>,
    pub exhibitor: Option<String>,
    pub photographer: Option<String>,
    pub photo: Option<String>,
    #[serde(rename = "sourceUrl")]
    pub source_url: Option<String>,
    /// Kept as a raw JSON map: the measurement-type classifier works on
    /// key *presence*, which a typed struct with optional fields cannot
    /// distinguish from a key carrying `null`.
    pub measurements: Option<Map<String, Value>>,
    pub corrections: Vec<RawCorrection>,
}

/// One audit entry embedded in a raw record by the historical fix scripts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCorrection {
    pub timestamp: Option<String>,
    pub field: Option<String>,
    #[serde(rename = "oldValue")]
    pub old_value: Option<Value>,
    #[serde(rename = "newValue")]
    pub new_value: Option<Value>,
    pub source: Option<String>,
    pub reason: Option<String>,
}

impl RawAward {
    /// Parse one raw record from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn deserialize_points<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(points_from_value(value.as_ref()))
}

/// Normalize the award-points boundary: number, `"N/A"`, `null`, or a
/// numeric string, all collapsing to one `Option<i64>` sentinel.
pub fn points_from_value(value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
                None
            } else {
                s.parse().ok()
            }
        }
        Some(_) => None,
    }
}

/// Render an embedded correction value for the audit table
pub fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let raw = RawAward::from_json(
            r#"{
                "awardNum": "20255302",
                "award": "HCC",
                "awardpoints": 79,
                "location": "San Francisco Monthly",
                "date": "March 2, 2025",
                "genus": "Cattleya",
                "exhibitor": "Pierre Pujol",
                "photo": "images/20255302.jpg",
                "measurements": { "type": "Lip&LateralSepal", "NS": 10.2 }
            }"#,
        )
        .unwrap();

        assert_eq!(raw.award_num.as_deref(), Some("20255302"));
        assert_eq!(raw.award_points, Some(79));
        assert!(raw.measurements.unwrap().contains_key("NS"));
        assert!(raw.corrections.is_empty());
    }

    #[test]
    fn test_points_accepts_na_sentinel() {
        let raw = RawAward::from_json(r#"{"awardNum":"20245301","awardpoints":"N/A"}"#).unwrap();
        assert_eq!(raw.award_points, None);
    }

    #[test]
    fn test_points_accepts_null_and_missing() {
        let raw = RawAward::from_json(r#"{"awardNum":"20245301","awardpoints":null}"#).unwrap();
        assert_eq!(raw.award_points, None);

        let raw = RawAward::from_json(r#"{"awardNum":"20245301"}"#).unwrap();
        assert_eq!(raw.award_points, None);
    }

    #[test]
    fn test_points_accepts_numeric_string() {
        let raw = RawAward::from_json(r#"{"awardNum":"20245301","awardpoints":"82"}"#).unwrap();
        assert_eq!(raw.award_points, Some(82));
    }

    #[test]
    fn test_corrections_entries_parse() {
        let raw = RawAward::from_json(
            r#"{
                "awardNum": "20245301",
                "corrections": [{
                    "timestamp": "2026-02-11T10:00:00Z",
                    "field": "sourceUrl",
                    "oldValue": "https://old",
                    "newValue": "https://new",
                    "source": "automated-source-url-correction",
                    "reason": "Updated to reflect actual source page URL structure"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.corrections.len(), 1);
        assert_eq!(raw.corrections[0].field.as_deref(), Some("sourceUrl"));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(None), None);
        assert_eq!(value_to_string(Some(&Value::Null)), None);
        assert_eq!(
            value_to_string(Some(&Value::String("x".into()))),
            Some("x".to_string())
        );
        assert_eq!(
            value_to_string(Some(&serde_json::json!(79))),
            Some("79".to_string())
        );
    }
}
