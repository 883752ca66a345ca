/// Runtime configuration
///
/// Everything comes from the environment (optionally seeded from a `.env`
/// file). Paths default to `~/.carrental/`.

use crate::error::{RentalError, Result};
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = ".carrental";

#[derive(Debug, Clone)]
pub struct Config {
    pub rentals_file: PathBuf,
    pub database_path: PathBuf,
    pub admin_user: Option<String>,
    pub admin_password: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Split out from `from_env` so tests don't have to touch process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rentals_file = match lookup("CARRENTAL_RENTALS_FILE") {
            Some(path) => PathBuf::from(path),
            None => app_dir()?.join("rentals.json"),
        };

        let database_path = match lookup("CARRENTAL_DATABASE") {
            Some(path) => PathBuf::from(path),
            None => app_dir()?.join("carrental.db"),
        };

        Ok(Config {
            rentals_file,
            database_path,
            admin_user: lookup("CARRENTAL_ADMIN_USER").filter(|v| !v.trim().is_empty()),
            admin_password: lookup("CARRENTAL_ADMIN_PASSWORD").filter(|v| !v.is_empty()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        RentalError::Config("Could not determine home directory".to_string())
    })?;
    Ok(home.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config::from_lookup(lookup_from(&[
            ("CARRENTAL_RENTALS_FILE", "/data/rentals.json"),
            ("CARRENTAL_DATABASE", "/data/rentals.db"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.rentals_file, PathBuf::from("/data/rentals.json"));
        assert_eq!(config.database_path, PathBuf::from("/data/rentals.db"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_credentials_are_optional() {
        let config = Config::from_lookup(lookup_from(&[
            ("CARRENTAL_RENTALS_FILE", "/data/rentals.json"),
            ("CARRENTAL_DATABASE", "/data/rentals.db"),
            ("CARRENTAL_ADMIN_USER", "  "),
        ]))
        .unwrap();

        assert!(config.admin_user.is_none());
        assert!(config.admin_password.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_credentials_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("CARRENTAL_RENTALS_FILE", "/r.json"),
            ("CARRENTAL_DATABASE", "/r.db"),
            ("CARRENTAL_ADMIN_USER", "admin"),
            ("CARRENTAL_ADMIN_PASSWORD", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.admin_user.as_deref(), Some("admin"));
        assert_eq!(config.admin_password.as_deref(), Some("s3cret"));
    }
}
