use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a single reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredReminder", into = "StoredReminder")]
pub struct Reminder {
    /// Unique identifier for the reminder.
    pub id: Uuid,
    /// Calendar date the reminder fires on.
    pub date: NaiveDate,
    /// Time of day the reminder fires at.
    pub time: NaiveTime,
    /// User-supplied label, non-empty.
    pub text: String,
    /// Where the reminder is in its lifecycle.
    pub state: ReminderState,
}

/// Lifecycle of a reminder. A completed reminder never goes back to active,
/// and only completed reminders can be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderState {
    /// Waiting to fire. Carries the notification handle, if one was
    /// scheduled.
    Active { notification: Option<Uuid> },
    /// Marked done. Its notification (if any) was canceled on completion.
    Completed,
}

impl Reminder {
    pub fn new(date: NaiveDate, time: NaiveTime, text: String, notification: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time,
            text,
            state: ReminderState::Active { notification },
        }
    }

    /// The combined date+time instant the notification is due at.
    pub fn fire_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, ReminderState::Completed)
    }

    /// The scheduled notification handle, while one is attached.
    pub fn notification(&self) -> Option<Uuid> {
        match self.state {
            ReminderState::Active { notification } => notification,
            ReminderState::Completed => None,
        }
    }

    /// First 8 characters of the id, enough to address a reminder from the
    /// command line.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

/// Persisted form of a reminder. Field names are camelCase to stay readable
/// alongside databases written by earlier versions of the app.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReminder {
    id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification_id: Option<Uuid>,
}

impl From<StoredReminder> for Reminder {
    fn from(stored: StoredReminder) -> Self {
        let state = if stored.completed {
            ReminderState::Completed
        } else {
            ReminderState::Active {
                notification: stored.notification_id,
            }
        };
        Self {
            id: stored.id,
            date: stored.date,
            time: stored.time,
            text: stored.text,
            state,
        }
    }
}

impl From<Reminder> for StoredReminder {
    fn from(reminder: Reminder) -> Self {
        let (completed, notification_id) = match reminder.state {
            ReminderState::Active { notification } => (false, notification),
            ReminderState::Completed => (true, None),
        };
        Self {
            id: reminder.id,
            date: reminder.date,
            time: reminder.time,
            text: reminder.text,
            completed,
            notification_id,
        }
    }
}
