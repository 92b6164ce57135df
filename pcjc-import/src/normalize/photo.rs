//! Photo-path resolution
//!
//! The canonical photo path for an award is `images/{award_num}.jpg`,
//! relative to the root folder. The resolver distinguishes four outcomes;
//! in particular a missing file is always its own result, never folded
//! into "needs rewriting".

use std::path::{Path, PathBuf};

/// Outcome of checking one record's photo reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoStatus {
    /// Path is already canonical and the file exists
    Correct,
    /// File exists but the stored path differs; carries the canonical path
    NeedsRewrite(String),
    /// Canonical file does not exist on disk (dangling reference)
    Missing(PathBuf),
    /// Record has no photo field
    Absent,
}

/// Canonical relative photo path for an award number
pub fn canonical_photo_path(award_num: &str) -> String {
    format!("images/{}.jpg", award_num)
}

/// Resolve one record's photo reference against the image library.
pub fn resolve_photo(award_num: &str, photo: Option<&str>, images_dir: &Path) -> PhotoStatus {
    let photo = match photo.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return PhotoStatus::Absent,
    };

    let file = images_dir.join(format!("{}.jpg", award_num));
    if !file.exists() {
        return PhotoStatus::Missing(file);
    }

    let canonical = canonical_photo_path(award_num);
    if photo == canonical {
        PhotoStatus::Correct
    } else {
        PhotoStatus::NeedsRewrite(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn images_with(award_nums: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for num in award_nums {
            std::fs::write(dir.path().join(format!("{}.jpg", num)), b"jpeg").unwrap();
        }
        dir
    }

    #[test]
    fn test_absent_when_no_photo_field() {
        let dir = images_with(&[]);
        assert_eq!(
            resolve_photo("20255302", None, dir.path()),
            PhotoStatus::Absent
        );
        assert_eq!(
            resolve_photo("20255302", Some("  "), dir.path()),
            PhotoStatus::Absent
        );
    }

    #[test]
    fn test_correct_canonical_path() {
        let dir = images_with(&["20255302"]);
        assert_eq!(
            resolve_photo("20255302", Some("images/20255302.jpg"), dir.path()),
            PhotoStatus::Correct
        );
    }

    #[test]
    fn test_needs_rewrite_preserves_target() {
        let dir = images_with(&["20255302"]);
        assert_eq!(
            resolve_photo(
                "20255302",
                Some("database/images/20255302.jpg"),
                dir.path()
            ),
            PhotoStatus::NeedsRewrite("images/20255302.jpg".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_distinct_from_rewrite() {
        let dir = images_with(&[]);
        // Even a non-canonical path reports Missing when the file is gone
        let status = resolve_photo("20255302", Some("database/images/20255302.jpg"), dir.path());
        match status {
            PhotoStatus::Missing(path) => {
                assert!(path.ends_with("20255302.jpg"));
            }
            other => panic!("expected Missing, got {:?}", other),
        }
    }
}
