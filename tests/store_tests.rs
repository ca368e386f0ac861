use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime};
use uuid::Uuid;

use remindr::models::ReminderState;
use remindr::notify::NotificationScheduler;
use remindr::storage::{load_reminders, save_reminders};
use remindr::store::{ReminderError, ReminderStore};

// Use a mutex to ensure tests run serially since they modify the environment
// variable.
static TEST_MUTEX: Mutex<()> = Mutex::new(());

#[derive(Default)]
struct SchedulerLog {
    permission_checks: usize,
    scheduled: Vec<(NaiveDateTime, String)>,
    canceled: Vec<Uuid>,
}

/// Stand-in for the platform boundary that records every call.
struct RecordingScheduler {
    log: Rc<RefCell<SchedulerLog>>,
    fail_scheduling: bool,
}

impl RecordingScheduler {
    fn new(log: Rc<RefCell<SchedulerLog>>) -> Self {
        Self {
            log,
            fail_scheduling: false,
        }
    }

    fn failing(log: Rc<RefCell<SchedulerLog>>) -> Self {
        Self {
            log,
            fail_scheduling: true,
        }
    }
}

impl NotificationScheduler for RecordingScheduler {
    fn ensure_permission(&mut self) {
        self.log.borrow_mut().permission_checks += 1;
    }

    fn schedule(&mut self, fire_at: NaiveDateTime, _title: &str, body: &str) -> Option<Uuid> {
        self.log.borrow_mut().scheduled.push((fire_at, body.to_string()));
        if self.fail_scheduling {
            None
        } else {
            Some(Uuid::new_v4())
        }
    }

    fn cancel(&mut self, handle: Uuid) {
        self.log.borrow_mut().canceled.push(handle);
    }
}

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut dir = env::temp_dir();
    dir.push(format!("remindr_test_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    let db_path: PathBuf = dir.join("reminders.json");
    env::set_var("REMINDERS_DB", db_path.to_str().unwrap());

    f();

    fs::remove_dir_all(&dir).ok();
    env::remove_var("REMINDERS_DB");
}

fn open_store(log: Rc<RefCell<SchedulerLog>>) -> ReminderStore {
    ReminderStore::open(Box::new(RecordingScheduler::new(log)))
}

#[test]
fn create_sorts_active_by_fire_instant() {
    with_test_db("create_sorted", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        store.create("2031-05-01", "09:00:00", "later").unwrap();
        store.create("2030-01-01", "09:00:00", "first").unwrap();
        store.create("2030-01-01", "18:30:00", "second").unwrap();

        let texts: Vec<&str> = store.active().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "later"]);
        assert!(store.completed().is_empty());
        assert!(store.active().iter().all(|r| r.notification().is_some()));
        assert_eq!(log.borrow().scheduled.len(), 3);
        assert_eq!(log.borrow().permission_checks, 3);
    });
}

#[test]
fn create_rejects_empty_fields() {
    with_test_db("create_empty", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        assert_eq!(
            store.create("", "09:00:00", "text"),
            Err(ReminderError::MissingField("date"))
        );
        assert_eq!(
            store.create("2030-01-01", "", "text"),
            Err(ReminderError::MissingField("time"))
        );
        assert_eq!(
            store.create("2030-01-01", "09:00:00", "  "),
            Err(ReminderError::MissingField("text"))
        );

        assert!(store.active().is_empty());
        assert!(load_reminders().is_empty());
        assert_eq!(log.borrow().permission_checks, 0);
        assert!(log.borrow().scheduled.is_empty());
    });
}

#[test]
fn create_rejects_unparseable_fields() {
    with_test_db("create_unparseable", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        assert!(matches!(
            store.create("tomorrow", "09:00:00", "text"),
            Err(ReminderError::InvalidDate(_))
        ));
        assert!(matches!(
            store.create("2030-01-01", "9 o'clock", "text"),
            Err(ReminderError::InvalidTime(_))
        ));
        assert!(load_reminders().is_empty());
        assert!(log.borrow().scheduled.is_empty());
    });
}

#[test]
fn create_rejects_past_fire_instant() {
    with_test_db("create_past", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        // A fire instant one second ago still counts as past.
        let just_past = Local::now().naive_local() - Duration::seconds(1);
        let result = store.create(
            &just_past.format("%Y-%m-%d").to_string(),
            &just_past.format("%H:%M:%S").to_string(),
            "too late",
        );
        assert_eq!(result, Err(ReminderError::PastTime));

        assert_eq!(
            store.create("2000-01-01", "09:00:00", "long gone"),
            Err(ReminderError::PastTime)
        );

        assert!(store.active().is_empty());
        assert!(load_reminders().is_empty());
        assert_eq!(log.borrow().permission_checks, 0);
        assert!(log.borrow().scheduled.is_empty());
    });
}

#[test]
fn complete_moves_and_cancels_once() {
    with_test_db("complete", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        let id = store.create("2030-01-01", "09:00:00", "task").unwrap();
        let handle = store.active()[0].notification().unwrap();

        store.complete(id).unwrap();

        assert!(store.active().is_empty());
        assert_eq!(store.completed().len(), 1);
        assert_eq!(store.completed()[0].state, ReminderState::Completed);
        assert_eq!(log.borrow().canceled, vec![handle]);

        // Count-preserving: the persisted union lost nothing.
        assert_eq!(load_reminders().len(), 1);
        assert!(load_reminders()[0].is_completed());

        // Completing again reports the id as unknown and cancels nothing.
        assert!(matches!(store.complete(id), Err(ReminderError::NotFound(_))));
        assert_eq!(log.borrow().canceled.len(), 1);
    });
}

#[test]
fn delete_only_touches_completed() {
    with_test_db("delete", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        let keep = store.create("2030-01-01", "09:00:00", "keep").unwrap();
        let gone = store.create("2030-02-01", "09:00:00", "gone").unwrap();
        store.complete(gone).unwrap();

        // An active reminder cannot be deleted.
        assert!(!store.delete(keep));
        assert_eq!(store.active().len(), 1);

        // Deleting an unknown id is a no-op.
        assert!(!store.delete(Uuid::new_v4()));

        assert!(store.delete(gone));
        assert!(store.completed().is_empty());
        assert_eq!(store.active().len(), 1);
        assert_eq!(load_reminders().len(), 1);
    });
}

#[test]
fn search_is_case_insensitive_substring() {
    with_test_db("search", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        store.create("2030-01-01", "09:00:00", "Pay rent").unwrap();
        store.create("2030-01-02", "09:00:00", "buy groceries").unwrap();
        let done = store.create("2030-01-03", "09:00:00", "rental car").unwrap();
        store.complete(done).unwrap();

        // Matches span both sections.
        let hits: Vec<&str> = store.search("RENT").iter().map(|r| r.text.as_str()).collect();
        assert_eq!(hits, vec!["Pay rent", "rental car"]);

        assert_eq!(store.search("groc").len(), 1);
        assert!(store.search("dentist").is_empty());
    });
}

#[test]
fn empty_search_yields_nothing() {
    with_test_db("search_empty", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        store.create("2030-01-01", "09:00:00", "Pay rent").unwrap();
        assert!(store.search("").is_empty());
    });
}

#[test]
fn save_load_round_trip_is_idempotent() {
    with_test_db("round_trip", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        store.create("2030-01-01", "09:00:00", "one").unwrap();
        let two = store.create("2030-02-01", "10:15:00", "two").unwrap();
        store.complete(two).unwrap();

        let first = load_reminders();
        save_reminders(&first);
        let second = load_reminders();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    });
}

#[test]
fn scheduling_failure_still_saves_reminder() {
    with_test_db("schedule_failure", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = ReminderStore::open(Box::new(RecordingScheduler::failing(log.clone())));

        let id = store.create("2030-01-01", "09:00:00", "no toast").unwrap();

        assert_eq!(store.active().len(), 1);
        assert_eq!(store.active()[0].id, id);
        assert_eq!(store.active()[0].notification(), None);
        assert_eq!(load_reminders().len(), 1);
        assert_eq!(log.borrow().scheduled.len(), 1);
    });
}

#[test]
fn reminder_lifecycle_end_to_end() {
    with_test_db("lifecycle", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());

        assert_eq!(store.revision(), 0);
        let id = store.create("2030-01-01", "09:00:00", "Pay rent").unwrap();
        assert_eq!(store.revision(), 1);
        assert_eq!(store.active().len(), 1);
        assert!(store.completed().is_empty());
        assert!(!store.active()[0].is_completed());
        assert!(store.active()[0].notification().is_some());

        store.complete(id).unwrap();
        assert!(store.active().is_empty());
        assert_eq!(store.completed().len(), 1);
        assert!(store.completed()[0].is_completed());
        assert_eq!(log.borrow().canceled.len(), 1);

        assert!(store.delete(id));
        assert!(store.completed().is_empty());
        assert!(load_reminders().is_empty());
    });
}

#[test]
fn store_reopens_from_persisted_state() {
    with_test_db("reopen", || {
        let log = Rc::new(RefCell::new(SchedulerLog::default()));
        let mut store = open_store(log.clone());
        store.create("2031-01-01", "09:00:00", "later").unwrap();
        store.create("2030-01-01", "09:00:00", "sooner").unwrap();
        let done = store.create("2030-06-01", "09:00:00", "done").unwrap();
        store.complete(done).unwrap();
        drop(store);

        let reopened = open_store(log);
        let texts: Vec<&str> = reopened.active().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["sooner", "later"]);
        assert_eq!(reopened.completed().len(), 1);
        assert_eq!(reopened.completed()[0].text, "done");
    });
}
