use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::dataset::{self, LeagueTable};
use crate::league::League;

struct CacheEntry {
    table: Arc<LeagueTable>,
    loaded_at: Instant,
    modified: Option<SystemTime>,
}

/// Raw league tables memoized by league. An entry is reused until it is older
/// than `ttl` or its source file's modification time changes.
pub struct LeagueCache {
    data_dir: PathBuf,
    ttl: Duration,
    entries: HashMap<League, CacheEntry>,
}

impl LeagueCache {
    pub fn new(data_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            data_dir: data_dir.into(),
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn get(&mut self, league: League) -> Arc<LeagueTable> {
        let path = league.data_path(&self.data_dir);
        let modified = file_modified(&path);
        if let Some(entry) = self.entries.get(&league) {
            if entry.loaded_at.elapsed() < self.ttl && entry.modified == modified {
                return Arc::clone(&entry.table);
            }
            log::debug!("cache entry for {} is stale", league.key());
        }

        let table = Arc::new(dataset::load_league(&self.data_dir, league));
        self.entries.insert(
            league,
            CacheEntry {
                table: Arc::clone(&table),
                loaded_at: Instant::now(),
                modified,
            },
        );
        table
    }

    pub fn invalidate(&mut self, league: League) {
        self.entries.remove(&league);
    }

    pub fn is_cached(&self, league: League) -> bool {
        self.entries.contains_key(&league)
    }
}

fn file_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
