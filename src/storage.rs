use std::fs;
use std::path::PathBuf;
use crate::models::Reminder;

/// Returns the path to the reminder database file (`reminders.json`).
///
/// The path is determined in the following order:
/// 1. `REMINDERS_DB` environment variable.
/// 2. `~/.local/share/remindr/reminders.json` (on Linux).
/// 3. `./reminders.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("REMINDERS_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("remindr");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("reminders.json");
        p
    })
}

/// Returns the directory the database lives in. The notification schedule
/// ledger is kept alongside it.
pub fn data_dir() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p
}

/// Loads the full reminder collection from the storage file.
///
/// Read and parse failures are logged and degrade to an empty collection.
pub fn load_reminders() -> Vec<Reminder> {
    let path = db_path();
    if !path.exists() {
        return Vec::new();
    }
    let raw = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(reminders) => reminders,
        Err(e) => {
            log::error!("Malformed reminder database {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Saves the full reminder collection, overwriting the existing file.
///
/// Write failures are logged and swallowed; the change stays visible in
/// memory for the session.
pub fn save_reminders(reminders: &[Reminder]) {
    let path = db_path();
    let json = match serde_json::to_string_pretty(reminders) {
        Ok(j) => j,
        Err(e) => {
            log::error!("Failed to serialize reminders: {}", e);
            return;
        }
    };
    if let Err(e) = fs::write(&path, json) {
        log::error!("Failed to write {}: {}", path.display(), e);
    }
}
