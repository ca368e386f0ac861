use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use notify_rust::{Notification, Urgency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage;

/// One pending entry in the notification schedule ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: Uuid,
    pub fire_at: NaiveDateTime,
    pub title: String,
    pub body: String,
}

/// Boundary to the local-notification facility.
///
/// All three operations are best-effort side channels: a failure here must
/// never block or corrupt the reminder collection itself, so nothing in this
/// trait returns an error to the caller.
pub trait NotificationScheduler {
    /// Probes whether notifications can be delivered. The outcome is logged,
    /// not surfaced; scheduling proceeds regardless.
    fn ensure_permission(&mut self);

    /// Registers a one-shot notification at the exact `fire_at` instant and
    /// returns its handle. Returns `None` (with a warning logged) when the
    /// instant is not strictly in the future.
    fn schedule(&mut self, fire_at: NaiveDateTime, title: &str, body: &str) -> Option<Uuid>;

    /// Cancels a previously scheduled notification. Canceling a handle that
    /// already fired, or never existed, is logged and ignored.
    fn cancel(&mut self, handle: Uuid);
}

/// Scheduler backed by a JSON ledger next to the reminder database. Entries
/// are delivered through the desktop notification daemon by a `watch`
/// process polling [`DesktopScheduler::deliver_due`].
pub struct DesktopScheduler {
    probed: bool,
}

impl DesktopScheduler {
    pub fn new() -> Self {
        Self { probed: false }
    }

    fn ledger_path() -> PathBuf {
        storage::data_dir().join("notifications.json")
    }

    fn load_ledger() -> Vec<ScheduledNotification> {
        let path = Self::ledger_path();
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
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Malformed schedule ledger {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn save_ledger(entries: &[ScheduledNotification]) {
        let path = Self::ledger_path();
        let json = match serde_json::to_string_pretty(entries) {
            Ok(j) => j,
            Err(e) => {
                log::error!("Failed to serialize schedule ledger: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&path, json) {
            log::error!("Failed to write {}: {}", path.display(), e);
        }
    }

    /// Fires every ledger entry whose instant has passed and removes it.
    /// Returns the number of notifications delivered (or attempted; delivery
    /// failures are logged and the entry is dropped either way).
    pub fn deliver_due(&mut self) -> usize {
        let now = Local::now().naive_local();
        let entries = Self::load_ledger();
        let (due, pending): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|n| n.fire_at <= now);
        if due.is_empty() {
            return 0;
        }
        for notification in &due {
            let shown = Notification::new()
                .summary(&notification.title)
                .body(&notification.body)
                .appname("remindr")
                .icon("appointment-soon")
                .sound_name("alarm-clock-elapsed")
                .urgency(Urgency::Critical)
                .show();
            if let Err(e) = shown {
                log::warn!("Failed to deliver notification {}: {}", notification.id, e);
            }
        }
        Self::save_ledger(&pending);
        due.len()
    }
}

impl Default for DesktopScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationScheduler for DesktopScheduler {
    fn ensure_permission(&mut self) {
        if self.probed {
            return;
        }
        self.probed = true;
        match notify_rust::get_capabilities() {
            Ok(caps) => log::debug!("Notification server capabilities: {:?}", caps),
            Err(e) => log::warn!(
                "Notification server unreachable ({}); reminders will still be saved",
                e
            ),
        }
    }

    fn schedule(&mut self, fire_at: NaiveDateTime, title: &str, body: &str) -> Option<Uuid> {
        let seconds_until = (fire_at - Local::now().naive_local()).num_seconds();
        if seconds_until <= 0 {
            log::warn!("Fire time {} is in the past; not scheduling", fire_at);
            return None;
        }
        let entry = ScheduledNotification {
            id: Uuid::new_v4(),
            fire_at,
            title: title.to_string(),
            body: body.to_string(),
        };
        let handle = entry.id;
        let mut entries = Self::load_ledger();
        entries.push(entry);
        Self::save_ledger(&entries);
        Some(handle)
    }

    fn cancel(&mut self, handle: Uuid) {
        let mut entries = Self::load_ledger();
        let before = entries.len();
        entries.retain(|n| n.id != handle);
        if entries.len() == before {
            log::debug!("Notification {} already fired or was never scheduled", handle);
            return;
        }
        Self::save_ledger(&entries);
    }
}
