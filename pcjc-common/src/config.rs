//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no command-line root is given
pub const ROOT_ENV_VAR: &str = "PCJC_ROOT";

/// Database file name under the root folder
pub const DATABASE_FILE: &str = "orchid_awards.sqlite";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. PCJC_ROOT environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("pcjc").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/pcjc/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("pcjc"))
        .unwrap_or_else(|| PathBuf::from("./pcjc_data"))
}

/// Filesystem layout under the root folder.
///
/// The scrape archive keeps the per-year convention the historical harvest
/// used: `awards/{year}/html`, `awards/{year}/images`,
/// `awards/{year}/data/json`. The consolidated photo library lives at
/// `images/{award_num}.jpg`.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// SQLite database file
    pub fn database(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    /// Consolidated image library (canonical photo paths resolve here)
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Per-year scrape archive directory
    pub fn year_dir(&self, year: i64) -> PathBuf {
        self.root.join("awards").join(year.to_string())
    }

    pub fn year_html_dir(&self, year: i64) -> PathBuf {
        self.year_dir(year).join("html")
    }

    pub fn year_images_dir(&self, year: i64) -> PathBuf {
        self.year_dir(year).join("images")
    }

    pub fn year_json_dir(&self, year: i64) -> PathBuf {
        self.year_dir(year).join("data").join("json")
    }

    /// Create the directories a run needs to exist
    pub fn ensure_base_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.images_dir())?;
        Ok(())
    }

    /// Create the archive directories for one year
    pub fn ensure_year_directories(&self, year: i64) -> Result<()> {
        std::fs::create_dir_all(self.year_html_dir(year))?;
        std::fs::create_dir_all(self.year_images_dir(year))?;
        std::fs::create_dir_all(self.year_json_dir(year))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let root = resolve_root_folder(Some("/tmp/pcjc-test-root"));
        assert_eq!(root, PathBuf::from("/tmp/pcjc-test-root"));
    }

    #[test]
    fn test_paths_layout() {
        let paths = Paths::new(PathBuf::from("/data/pcjc"));
        assert_eq!(
            paths.database(),
            PathBuf::from("/data/pcjc/orchid_awards.sqlite")
        );
        assert_eq!(paths.images_dir(), PathBuf::from("/data/pcjc/images"));
        assert_eq!(
            paths.year_json_dir(2024),
            PathBuf::from("/data/pcjc/awards/2024/data/json")
        );
        assert_eq!(
            paths.year_html_dir(2024),
            PathBuf::from("/data/pcjc/awards/2024/html")
        );
    }
}
