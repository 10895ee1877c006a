use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::league::League;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CACHE_SECS: u64 = 600;
const MIN_CACHE_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
    pub default_league: League,
    pub export_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_SECS),
            default_league: League::J1,
            export_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Read `.env.local`/`.env` if present, then the `PHYSICAL_*` variables.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable lookup; unset, blank or unparseable values fall back to defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let cache_secs = var("PHYSICAL_CACHE_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_CACHE_SECS)
            .max(MIN_CACHE_SECS);
        Self {
            data_dir: path_value(var("PHYSICAL_DATA_DIR")).unwrap_or(defaults.data_dir),
            cache_ttl: Duration::from_secs(cache_secs),
            default_league: var("PHYSICAL_DEFAULT_LEAGUE")
                .and_then(|val| League::parse(&val))
                .unwrap_or(defaults.default_league),
            export_dir: path_value(var("PHYSICAL_EXPORT_DIR")).unwrap_or(defaults.export_dir),
            log_file: path_value(var("PHYSICAL_LOG_FILE")),
        }
    }
}

fn path_value(raw: Option<String>) -> Option<PathBuf> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
