pub mod answers;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod narrative;
pub mod scoring;

use std::path::PathBuf;

/// Load environment variables from the first env file found:
/// 1) ORACLE_ENV_FILE if set
/// 2) ./.env
/// 3) ../.env (repo root when running from a subdirectory)
///
/// Variables already present in the process environment are never overridden.
/// Returns the file that was loaded, if any.
pub fn load_env() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("ORACLE_ENV_FILE") {
        let path = PathBuf::from(env_path);
        return dotenvy::from_path(&path).ok().map(|_| path);
    }
    ["./.env", "../.env"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| dotenvy::from_path(path).is_ok())
}
