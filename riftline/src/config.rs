//! Configuration for riftline
//!
//! Handles data directory, database path, region and API key with the
//! following precedence per value:
//! 1. Dedicated environment variable
//! 2. Platform default (where one exists)
//! 3. ./data (fallback for development)

use std::path::PathBuf;

const DEV_DATA_DIR: &str = "./data";
const DB_FILE_NAME: &str = "riftline.db";
const DEFAULT_REGION: &str = "euw1";

/// Get the data directory for the local store.
///
/// Priority:
/// 1. RIFTLINE_DATA_DIR env variable if set
/// 2. The platform data directory (e.g. ~/.local/share/riftline)
/// 3. ./data as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RIFTLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "riftline") {
        return dirs.data_dir().to_path_buf();
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Path of the SQLite database file inside the data directory.
pub fn get_db_path() -> PathBuf {
    get_data_dir().join(DB_FILE_NAME)
}

/// Platform region for the remote API (e.g. `euw1`, `na1`).
///
/// Priority:
/// 1. RIFTLINE_REGION env variable if set
/// 2. `euw1` as fallback
pub fn get_region() -> String {
    std::env::var("RIFTLINE_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string())
}

/// The remote API key. There is no fallback — syncing without a key is
/// impossible, so the caller turns `None` into a startup error.
pub fn get_api_key() -> Option<String> {
    std::env::var("RIOT_API_KEY").ok().filter(|key| !key.is_empty())
}

/// Optional directory for rolling log files. When unset, logs go to stdout.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("RIFTLINE_LOG_DIR").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_is_nonempty() {
        // Note: if RIFTLINE_DATA_DIR is set in the test environment this
        // returns that value, which is correct behavior.
        let dir = get_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_db_path_is_inside_data_dir() {
        let path = get_db_path();
        assert!(path.ends_with(DB_FILE_NAME));
        assert!(path.starts_with(get_data_dir()));
    }

    #[test]
    fn test_region_is_nonempty() {
        assert!(!get_region().is_empty());
    }
}
