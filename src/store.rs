use chrono::{Local, NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Reminder, ReminderState};
use crate::notify::NotificationScheduler;
use crate::storage::{load_reminders, save_reminders};

/// Failures surfaced to the user. Storage and notification plumbing errors
/// are absorbed at their boundaries and only logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    /// A required field was empty.
    #[error("Please fill in the {0}")]
    MissingField(&'static str),
    #[error("Invalid date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}': use HH:MM:SS")]
    InvalidTime(String),
    #[error("Reminder time is in the past. Cannot schedule notification.")]
    PastTime,
    #[error("No active reminder matches '{0}'")]
    NotFound(String),
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardCounts {
    pub active: usize,
    pub completed: usize,
}

/// In-memory reminder collection, partitioned into active and completed.
///
/// The store is the single owner of reminder state for a process: every view
/// reads from the same instance, and every mutation bumps [`revision`] so a
/// view can tell its derived data has gone stale. The full union of both
/// partitions is written back to storage after each mutation.
///
/// [`revision`]: ReminderStore::revision
pub struct ReminderStore {
    active: Vec<Reminder>,
    completed: Vec<Reminder>,
    scheduler: Box<dyn NotificationScheduler>,
    revision: u64,
}

impl ReminderStore {
    /// Loads the persisted collection and partitions it. Active reminders
    /// are ordered by fire instant, completed ones keep their stored order.
    pub fn open(scheduler: Box<dyn NotificationScheduler>) -> Self {
        let (completed, active): (Vec<_>, Vec<_>) =
            load_reminders().into_iter().partition(Reminder::is_completed);
        let mut store = Self {
            active,
            completed,
            scheduler,
            revision: 0,
        };
        store.active.sort_by_key(Reminder::fire_at);
        store
    }

    /// Active reminders, sorted ascending by fire instant.
    pub fn active(&self) -> &[Reminder] {
        &self.active
    }

    /// Completed reminders, in completion order.
    pub fn completed(&self) -> &[Reminder] {
        &self.completed
    }

    /// Bumped on every mutation; lets a view know cached derivations of the
    /// collection need recomputing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            active: self.active.len(),
            completed: self.completed.len(),
        }
    }

    /// Creates a reminder from user input and persists the collection.
    ///
    /// All three fields must be present and parseable, and the fire instant
    /// strictly in the future; otherwise nothing is mutated and the
    /// scheduler is never invoked. Scheduling itself is best-effort: if no
    /// notification could be registered the reminder is saved without a
    /// handle.
    pub fn create(&mut self, date: &str, time: &str, text: &str) -> Result<Uuid, ReminderError> {
        let date = date.trim();
        let time = time.trim();
        let text = text.trim();
        if date.is_empty() {
            return Err(ReminderError::MissingField("date"));
        }
        if time.is_empty() {
            return Err(ReminderError::MissingField("time"));
        }
        if text.is_empty() {
            return Err(ReminderError::MissingField("text"));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ReminderError::InvalidDate(date.to_string()))?;
        let time = parse_time(time)?;
        let fire_at = date.and_time(time);
        if fire_at <= Local::now().naive_local() {
            return Err(ReminderError::PastTime);
        }

        self.scheduler.ensure_permission();
        let notification = self.scheduler.schedule(fire_at, "Reminder", text);

        let reminder = Reminder::new(date, time, text.to_string(), notification);
        let id = reminder.id;
        self.active.push(reminder);
        self.active.sort_by_key(Reminder::fire_at);
        self.persist();
        Ok(id)
    }

    /// Moves an active reminder to the completed partition, canceling its
    /// notification if one is still attached.
    pub fn complete(&mut self, id: Uuid) -> Result<(), ReminderError> {
        let idx = self
            .active
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        let mut reminder = self.active.remove(idx);
        if let Some(handle) = reminder.notification() {
            self.scheduler.cancel(handle);
        }
        reminder.state = ReminderState::Completed;
        self.completed.push(reminder);
        self.persist();
        Ok(())
    }

    /// Removes a reminder from the completed partition. Active reminders
    /// cannot be deleted; an unknown id is a no-op. Returns whether a record
    /// was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.completed.len();
        self.completed.retain(|r| r.id != id);
        if self.completed.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Case-insensitive substring search over the full collection. An empty
    /// query yields no results rather than everything.
    pub fn search(&self, query: &str) -> Vec<&Reminder> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.active
            .iter()
            .chain(self.completed.iter())
            .filter(|r| r.text.to_lowercase().contains(&needle))
            .collect()
    }

    fn persist(&mut self) {
        self.revision += 1;
        let union: Vec<Reminder> = self
            .active
            .iter()
            .chain(self.completed.iter())
            .cloned()
            .collect();
        save_reminders(&union);
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ReminderError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ReminderError::InvalidTime(raw.to_string()))
}
