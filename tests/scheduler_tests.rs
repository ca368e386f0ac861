use std::env;
use std::fs;
use std::sync::Mutex;

use chrono::{Duration, Local};
use uuid::Uuid;

use remindr::notify::{DesktopScheduler, NotificationScheduler, ScheduledNotification};
use remindr::storage;

// Use a mutex to ensure tests run serially since they modify the environment
// variable.
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_dir<F>(test_name: &str, f: F)
where
    F: FnOnce(),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut dir = env::temp_dir();
    dir.push(format!("remindr_sched_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    env::set_var("REMINDERS_DB", dir.join("reminders.json").to_str().unwrap());

    f();

    fs::remove_dir_all(&dir).ok();
    env::remove_var("REMINDERS_DB");
}

fn read_ledger() -> Vec<ScheduledNotification> {
    let path = storage::data_dir().join("notifications.json");
    if !path.exists() {
        return Vec::new();
    }
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn schedule_records_a_ledger_entry() {
    with_test_dir("schedule", || {
        let mut scheduler = DesktopScheduler::new();
        let fire_at = Local::now().naive_local() + Duration::days(30);

        let handle = scheduler.schedule(fire_at, "Reminder", "water plants");
        let handle = handle.expect("future instants should schedule");

        let ledger = read_ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, handle);
        assert_eq!(ledger[0].fire_at, fire_at);
        assert_eq!(ledger[0].title, "Reminder");
        assert_eq!(ledger[0].body, "water plants");
    });
}

#[test]
fn schedule_in_past_returns_none() {
    with_test_dir("schedule_past", || {
        let mut scheduler = DesktopScheduler::new();
        let fire_at = Local::now().naive_local() - Duration::seconds(1);

        assert_eq!(scheduler.schedule(fire_at, "Reminder", "too late"), None);
        assert!(read_ledger().is_empty());
    });
}

#[test]
fn cancel_removes_exactly_the_addressed_entry() {
    with_test_dir("cancel", || {
        let mut scheduler = DesktopScheduler::new();
        let soon = Local::now().naive_local() + Duration::days(1);
        let later = Local::now().naive_local() + Duration::days(2);

        let first = scheduler.schedule(soon, "Reminder", "first").unwrap();
        let second = scheduler.schedule(later, "Reminder", "second").unwrap();

        scheduler.cancel(first);

        let ledger = read_ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, second);

        // Canceling an unknown or already-canceled handle changes nothing.
        scheduler.cancel(first);
        scheduler.cancel(Uuid::new_v4());
        assert_eq!(read_ledger().len(), 1);
    });
}

#[test]
fn deliver_due_fires_only_due_entries() {
    with_test_dir("deliver", || {
        let now = Local::now().naive_local();
        let ledger = vec![
            ScheduledNotification {
                id: Uuid::new_v4(),
                fire_at: now - Duration::minutes(5),
                title: "Reminder".to_string(),
                body: "overdue".to_string(),
            },
            ScheduledNotification {
                id: Uuid::new_v4(),
                fire_at: now + Duration::days(1),
                title: "Reminder".to_string(),
                body: "tomorrow".to_string(),
            },
        ];
        let path = storage::data_dir().join("notifications.json");
        fs::write(&path, serde_json::to_string_pretty(&ledger).unwrap()).unwrap();

        let mut scheduler = DesktopScheduler::new();
        assert_eq!(scheduler.deliver_due(), 1);

        let remaining = read_ledger();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].body, "tomorrow");

        // Nothing left that is due.
        assert_eq!(scheduler.deliver_due(), 0);
    });
}
