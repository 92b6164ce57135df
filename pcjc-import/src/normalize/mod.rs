//! Field normalizers
//!
//! Pure functions applied to every raw record before it reaches the store:
//! date-to-ISO conversion, name canonicalization, measurement-type
//! classification and photo-path resolution. Alias tables are built once
//! and passed in explicitly; nothing here touches global state.

pub mod date;
pub mod measurements;
pub mod names;
pub mod photo;

/// Trim free text, collapsing the scraper's failure sentinels and empty
/// strings to `None`.
///
/// Early harvest rounds wrote the literal strings `not found` and
/// `no match` where extraction failed; those are absences, not values.
pub fn clean_text(input: Option<&str>) -> Option<String> {
    let s = input?.trim();
    if s.is_empty() || s == "not found" || s == "no match" {
        return None;
    }
    Some(s.to_string())
}
