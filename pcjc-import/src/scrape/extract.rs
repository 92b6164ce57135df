//! Field extraction from award pages
//!
//! The archive's pages are hand-maintained static HTML with a stable
//! line layout, so extraction is marker-and-offset based rather than a DOM
//! walk: the plant name lives in `<title>`, the date/location and cross
//! lines sit at fixed offsets below it, the award line sits directly above
//! the `Exhibited by:` line, and each measurement value sits two lines
//! below its `;KEY` marker.

use serde_json::{Map, Value};

use crate::normalize::measurements::{LIP_GROUP, POUCH_GROUP, SHARED_KEYS};
use crate::raw::RawAward;

/// Extract a raw award record from one page.
///
/// Absent markers simply leave fields unset; the importer decides what is
/// fatal. This function never fails.
pub fn extract_fields(html: &str) -> RawAward {
    let lines: Vec<&str> = html.lines().collect();
    let mut raw = RawAward::default();

    if let Some(title_idx) = lines.iter().position(|line| line.contains("<title>")) {
        if let Some(title) = between(lines[title_idx], "<title>", "</title>") {
            let plant_name = clean(title);
            let (genus, species, clone) = parse_plant_name(&plant_name);
            raw.genus = genus;
            raw.species = species;
            raw.clone = clone;
        }

        // Date and location share a line a fixed offset below the title:
        // "March 2, 2025 - San Francisco Monthly"
        if let Some(text) = lines.get(title_idx + 7).and_then(|line| tag_text(line)) {
            let text = clean(text);
            if let Some((date, location)) = text.split_once(" - ") {
                raw.date = Some(date.trim().to_string());
                raw.location = Some(location.trim().to_string());
            } else if !text.is_empty() {
                raw.date = Some(text);
            }
        }

        if let Some(text) = lines.get(title_idx + 9).and_then(|line| tag_text(line)) {
            let cross = clean(text);
            if !cross.is_empty() {
                raw.cross = Some(cross);
            }
        }
    }

    if let Some(exhibited_idx) = lines.iter().position(|line| line.contains("Exhibited")) {
        raw.exhibitor = after(lines[exhibited_idx], "by: ").map(clean);

        // The award line ("HCC 79", or a bare code for non-point awards)
        // sits directly above the exhibitor line
        if exhibited_idx > 0 {
            if let Some(text) = tag_text(lines[exhibited_idx - 1]) {
                let text = clean(text);
                let mut parts = text.split_whitespace();
                raw.award = parts.next().map(str::to_string);
                raw.award_points = parts.next().and_then(|points| points.parse().ok());
            }
        }
    }

    raw.photographer = lines
        .iter()
        .find_map(|line| after(line, "Photographer: "))
        .map(clean);

    if let Some(line) = lines.iter().find(|line| line.contains("Award 2")) {
        raw.award_num = between(line, "Award ", "<").map(|s| s.trim().to_string());
    }

    let measurements = extract_measurements(&lines);
    if !measurements.is_empty() {
        raw.measurements = Some(measurements);
    }

    raw
}

fn extract_measurements(lines: &[&str]) -> Map<String, Value> {
    let mut measurements = Map::new();

    for key in SHARED_KEYS
        .iter()
        .chain(LIP_GROUP.iter())
        .chain(POUCH_GROUP.iter())
    {
        let Some(marker_idx) = lines.iter().position(|line| has_marker(line, key)) else {
            continue;
        };
        // Value cell sits two lines below the label
        let Some(text) = lines.get(marker_idx + 2).and_then(|line| between(line, ">", "<"))
        else {
            continue;
        };
        if let Ok(value) = text.trim().parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(value) {
                measurements.insert(key.to_string(), Value::Number(number));
            }
        }
    }

    measurements
}

/// Match `;KEY` only at a key boundary, so `;NS` does not fire on `;NSV`
fn has_marker(line: &str, key: &str) -> bool {
    let marker = format!(";{}", key);
    let Some(idx) = line.find(&marker) else {
        return false;
    };
    !line[idx + marker.len()..]
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric())
        .unwrap_or(false)
}

/// Text after the first `">` on a line (the cell content on this layout)
fn tag_text(line: &str) -> Option<&str> {
    after(line, "\">")
}

fn after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|idx| &line[idx + marker.len()..])
}

fn between<'a>(line: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let rest = after(line, start)?;
    rest.find(end).map(|idx| &rest[..idx])
}

/// Decode the two entities these pages actually use and collapse runs of
/// whitespace.
fn clean(text: &str) -> String {
    let decoded = text.replace("&nbsp;", " ").replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split "Genus species 'Clone'" into its parts. The clone name is the
/// trailing quoted segment; the genus is the first word; the species (or
/// hybrid grex) is whatever remains.
fn parse_plant_name(plant_name: &str) -> (Option<String>, Option<String>, Option<String>) {
    let plant_name = plant_name.trim();

    let (name_part, clone) = match plant_name.rfind('\'') {
        Some(end) if end > 0 => match plant_name[..end].rfind('\'') {
            Some(start) => (
                plant_name[..start].trim_end(),
                Some(plant_name[start + 1..end].to_string()),
            ),
            None => (plant_name, None),
        },
        _ => (plant_name, None),
    };

    let mut words = name_part.split_whitespace();
    let genus = words.next().map(str::to_string);
    let rest: Vec<&str> = words.collect();
    let species = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    (genus, species, clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic page with the archive's line layout: date/location seven
    /// lines below the title, cross nine below, award directly above the
    /// exhibitor, measurement values two lines below their `;KEY` labels
    const SAMPLE_PAGE: &str = r#"<html>
<head><title>Cattleya maxima 'Hsinying'</title></head>
<body>
<table>
<tr>
<td class="head">Pacific Central Judging Center</td>
</tr>
<tr>
<td class="line">March 2, 2025 - San Francisco Monthly
</tr>
<td class="line">C. maxima x C. maxima
<td class="award">HCC 79
<td class="who">Exhibited by: Pierre Pujol
<td class="who">Photographer: Ramon de los Santos
<td class="num">Award 20255302<br>
<td>;NS</td>
<td>label</td>
<td>10.2</td>
<td>;NSV</td>
<td>label</td>
<td>9.8</td>
</table>
</body>
</html>"#;

    #[test]
    fn test_plant_name_parsing() {
        assert_eq!(
            parse_plant_name("Cattleya maxima 'Hsinying'"),
            (
                Some("Cattleya".to_string()),
                Some("maxima".to_string()),
                Some("Hsinying".to_string())
            )
        );
        assert_eq!(
            parse_plant_name("Paphiopedilum Wossner Black Wings 'Midnight'"),
            (
                Some("Paphiopedilum".to_string()),
                Some("Wossner Black Wings".to_string()),
                Some("Midnight".to_string())
            )
        );
        // No clone quotes
        assert_eq!(
            parse_plant_name("Orchid Display"),
            (Some("Orchid".to_string()), Some("Display".to_string()), None)
        );
    }

    #[test]
    fn test_extracts_identity_fields() {
        let raw = extract_fields(SAMPLE_PAGE);
        assert_eq!(raw.genus.as_deref(), Some("Cattleya"));
        assert_eq!(raw.species.as_deref(), Some("maxima"));
        assert_eq!(raw.clone.as_deref(), Some("Hsinying"));
        assert_eq!(raw.award_num.as_deref(), Some("20255302"));
    }

    #[test]
    fn test_extracts_date_and_location() {
        let raw = extract_fields(SAMPLE_PAGE);
        assert_eq!(raw.date.as_deref(), Some("March 2, 2025"));
        assert_eq!(raw.location.as_deref(), Some("San Francisco Monthly"));
    }

    #[test]
    fn test_extracts_award_and_people() {
        let raw = extract_fields(SAMPLE_PAGE);
        assert_eq!(raw.award.as_deref(), Some("HCC"));
        assert_eq!(raw.award_points, Some(79));
        assert_eq!(raw.exhibitor.as_deref(), Some("Pierre Pujol"));
        assert_eq!(raw.photographer.as_deref(), Some("Ramon de los Santos"));
    }

    #[test]
    fn test_extracts_cross_and_measurements() {
        let raw = extract_fields(SAMPLE_PAGE);
        assert_eq!(raw.cross.as_deref(), Some("C. maxima x C. maxima"));

        let measurements = raw.measurements.expect("measurements present");
        assert_eq!(measurements.get("NS").and_then(|v| v.as_f64()), Some(10.2));
        assert_eq!(measurements.get("NSV").and_then(|v| v.as_f64()), Some(9.8));
        assert!(!measurements.contains_key("PCHW"));
    }

    #[test]
    fn test_non_point_award_has_no_points() {
        let page = SAMPLE_PAGE.replace("HCC 79", "CBR");
        let raw = extract_fields(&page);
        assert_eq!(raw.award.as_deref(), Some("CBR"));
        assert_eq!(raw.award_points, None);
    }

    #[test]
    fn test_marker_boundaries() {
        assert!(has_marker("<td>;NS</td>", "NS"));
        assert!(has_marker("label;NS", "NS"));
        assert!(!has_marker("<td>;NSV</td>", "NS"));
        assert!(has_marker("<td>;NSV</td>", "NSV"));
    }

    #[test]
    fn test_empty_page_extracts_nothing() {
        let raw = extract_fields("<html><body>nothing here</body></html>");
        assert!(raw.award_num.is_none());
        assert!(raw.genus.is_none());
        assert!(raw.measurements.is_none());
    }
}
