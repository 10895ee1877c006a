use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::Selection;

const CACHE_DIR: &str = "physical_terminal";
const SESSION_FILE: &str = "session.json";
const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    selection: Selection,
    #[serde(default)]
    saved_at: Option<u64>,
}

/// Last saved selection, or `None` when missing, unreadable or from another version.
pub fn load_selection() -> Option<Selection> {
    load_selection_from(&session_path()?)
}

pub fn load_selection_from(path: &Path) -> Option<Selection> {
    let raw = fs::read_to_string(path).ok()?;
    let session = serde_json::from_str::<SessionFile>(&raw).ok()?;
    if session.version != SESSION_VERSION {
        return None;
    }
    Some(session.selection)
}

pub fn save_selection(selection: &Selection) -> Result<()> {
    let Some(path) = session_path() else {
        return Ok(());
    };
    save_selection_to(&path, selection)
}

pub fn save_selection_to(path: &Path, selection: &Selection) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let session = SessionFile {
        version: SESSION_VERSION,
        selection: *selection,
        saved_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs()),
    };
    let json = serde_json::to_string_pretty(&session).context("serialize session")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write session")?;
    fs::rename(&tmp, path).context("swap session")?;
    Ok(())
}

fn session_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(SESSION_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(SESSION_FILE),
    )
}
