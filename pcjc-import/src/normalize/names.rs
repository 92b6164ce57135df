//! Exhibitor and location name canonicalization
//!
//! Case-sensitive exact-match lookup against a fixed alias table: known
//! misspellings and format variants map to one canonical spelling,
//! anything else passes through unchanged. The tables collect every fix
//! round applied to the historical data; they are immutable and built once
//! per run. No fuzzy matching happens here - near-duplicate *detection* is
//! the review tool's job and is never auto-applied.

use std::collections::HashMap;

/// Exhibitor name standardizations
const EXHIBITOR_FIXES: &[(&str, &str)] = &[
    // Amy & Ken Jacobsen variations (final form uses the ampersand)
    ("Amy and Ken Jacbonsen", "Amy & Ken Jacobsen"),
    ("Amy and Ken Jacobsen", "Amy & Ken Jacobsen"),
    ("Any and Ken Jacobsen", "Amy & Ken Jacobsen"),
    ("Ken and Amy Jacobsen", "Amy & Ken Jacobsen"),
    // Cal-Orchid variations
    ("Cal Orchid", "Cal-Orchid, Inc."),
    ("Cal-Orchid", "Cal-Orchid, Inc."),
    ("Cal-Orchid Inc.", "Cal-Orchid, Inc."),
    ("Cahterine Obillo", "Catherine Obillo"),
    ("Ceajay Palanca", "CeaJay Palanca"),
    ("Chen-Hao Hsu", "Chen Hao Hsu"),
    // Christian Neitro variations
    ("Chris Neitro", "Christian Neitro"),
    ("Christian Nietro", "Christian Neitro"),
    // David Sorokowsky variations
    ("Dave Sorokowski", "David Sorokowsky"),
    ("Dave Sorokowsky", "David Sorokowsky"),
    ("Dave Sorokwsky", "David Sorokowsky"),
    ("Even Shen", "Evan Shen"),
    ("Fangmei Orchids", "Fang Mei Orchids"),
    ("Golden Gate Orchds", "Golden Gate Orchids"),
    ("H&R Nurseries", "H & R Nurseries"),
    ("Ivan Madrinan", "Ivan Madrian"),
    ("Jason Douglass", "Jason Douglas"),
    ("Jason Douglass and Ron Norris", "Jason Douglas and Ron Norris"),
    ("Steven Christofferson", "Steven Christoffersen"),
    ("Terry and Margaret Boomer", "Terry & Margaret Boomer"),
];

/// Event location standardizations
const LOCATION_FIXES: &[(&str, &str)] = &[
    ("Filoli", "Filoli Historic House"),
    ("Filoli Historic House Monthly", "Filoli Historic House"),
    (
        "POS/GCCS Show",
        "Peninsula Orchid Society and Gold Coast Cymbidium Society Show",
    ),
    ("San Francisco Monthly", "San Francisco"),
    ("San Fransisco", "San Francisco"),
    (
        "Santa Clara Valley OS Outreach Judging",
        "Santa Clara Valley OS Outreach",
    ),
    ("Sonoma County OS Show", "Sonoma County Orchid Society Show"),
];

/// A fixed variant-to-canonical name mapping
#[derive(Debug, Clone)]
pub struct AliasTable {
    map: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    /// The exhibitor alias table
    pub fn exhibitors() -> Self {
        Self::from_pairs(EXHIBITOR_FIXES)
    }

    /// The event-location alias table
    pub fn locations() -> Self {
        Self::from_pairs(LOCATION_FIXES)
    }

    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            map: pairs.iter().copied().collect(),
        }
    }

    /// Canonical spelling for a name: the mapped value on an exact match,
    /// the input unchanged otherwise.
    pub fn canonicalize<'a>(&self, name: &'a str) -> &'a str {
        self.map.get(name).copied().unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_exhibitor_variant() {
        let table = AliasTable::exhibitors();
        assert_eq!(table.canonicalize("Dave Sorokowsky"), "David Sorokowsky");
        assert_eq!(table.canonicalize("Cal Orchid"), "Cal-Orchid, Inc.");
        assert_eq!(
            table.canonicalize("Ken and Amy Jacobsen"),
            "Amy & Ken Jacobsen"
        );
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let table = AliasTable::exhibitors();
        assert_eq!(table.canonicalize("Pierre Pujol"), "Pierre Pujol");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = AliasTable::exhibitors();
        // Only the exact recorded variant maps; different casing is a
        // different (unknown) name.
        assert_eq!(table.canonicalize("dave sorokowsky"), "dave sorokowsky");
    }

    #[test]
    fn test_known_location_variant() {
        let table = AliasTable::locations();
        assert_eq!(table.canonicalize("San Fransisco"), "San Francisco");
        assert_eq!(table.canonicalize("Filoli"), "Filoli Historic House");
    }

    #[test]
    fn test_canonicalization_is_a_fixed_point() {
        // canon(canon(x)) == canon(x): no table value may itself be a key
        // that maps somewhere else.
        for table in [AliasTable::exhibitors(), AliasTable::locations()] {
            for &canonical in table.map.values() {
                assert_eq!(
                    table.canonicalize(canonical),
                    canonical,
                    "canonical form {:?} must not remap",
                    canonical
                );
            }
        }
    }
}
