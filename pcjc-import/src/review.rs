//! Near-duplicate name review
//!
//! Finds stored exhibitor/location names that look like spelling or format
//! variants of each other. Advisory only: the output is a report for a
//! human to turn into alias-table entries; nothing is ever auto-applied.

use strsim::jaro_winkler;

/// Default Jaro-Winkler similarity threshold for reporting a pair
pub const DEFAULT_THRESHOLD: f64 = 0.93;

/// One candidate variant pair
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPair {
    pub a: String,
    pub b: String,
    pub similarity: f64,
}

/// Pairwise similarity scan over a set of distinct names.
///
/// Comparison is case- and whitespace-insensitive, so pairs that differ
/// only in formatting still surface; the reported names keep their stored
/// spelling. Pairs at or above the threshold are returned most-similar
/// first.
pub fn near_duplicates(names: &[String], threshold: f64) -> Vec<VariantPair> {
    let normalized: Vec<String> = names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();

    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if normalized[i] == normalized[j] {
                // Same name after normalization; still worth reporting,
                // a case-only variant is the easiest fix of all
                pairs.push(VariantPair {
                    a: names[i].clone(),
                    b: names[j].clone(),
                    similarity: 1.0,
                });
                continue;
            }
            let similarity = jaro_winkler(&normalized[i], &normalized[j]);
            if similarity >= threshold {
                pairs.push(VariantPair {
                    a: names[i].clone(),
                    b: names[j].clone(),
                    similarity,
                });
            }
        }
    }

    pairs.sort_by(|x, y| {
        y.similarity
            .partial_cmp(&x.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}

/// Render a report section for one name column
pub fn render_report(label: &str, pairs: &[VariantPair]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}: {} candidate pair(s)\n", label, pairs.len()));
    for pair in pairs {
        out.push_str(&format!(
            "  {:.3}  {:?} <-> {:?}\n",
            pair.similarity, pair.a, pair.b
        ));
    }
    out
}
