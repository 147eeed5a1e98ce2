//! Environment configuration helpers

use std::path::Path;

use crate::error::{BalanceError, BalanceResult};

/// Load `.env.local` and then `.env` into the process environment
///
/// Runs before logging is set up, so load failures are returned for the
/// caller to report instead of being logged here.
pub fn load_dotenv() -> Vec<String> {
    load_dotenv_files(&[".env.local", ".env"])
}

/// Load the given dotenv files in order
///
/// Variables already set are left untouched. Missing files are skipped;
/// unreadable or malformed files yield one message each.
pub fn load_dotenv_files<P: AsRef<Path>>(files: &[P]) -> Vec<String> {
    files
        .iter()
        .filter_map(|file| {
            let file = file.as_ref();
            match dotenvy::from_path(file) {
                Ok(()) => None,
                Err(e) if e.not_found() => None,
                Err(e) => Some(format!("Failed to load {}: {}", file.display(), e)),
            }
        })
        .collect()
}

/// Read a required environment variable
///
/// An empty value counts as unset.
pub fn require_env(name: &str) -> BalanceResult<String> {
    optional_env(name).ok_or_else(|| BalanceError::missing_env(name))
}

/// Read an optional environment variable, treating empty as unset
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
