use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::Reminder;
use crate::notify::{DesktopScheduler, NotificationScheduler};
use crate::store::ReminderStore;

fn open_store() -> ReminderStore {
    ReminderStore::open(Box::new(DesktopScheduler::new()))
}

/// Adds a new reminder and schedules its notification.
pub fn cmd_add(date: String, time: String, text: String) {
    let mut store = open_store();
    match store.create(&date, &time, &text) {
        Ok(id) => {
            let short = store
                .active()
                .iter()
                .find(|r| r.id == id)
                .map(Reminder::short_id)
                .unwrap_or_else(|| id.to_string());
            println!("Reminder added (id = {})", short);
        }
        Err(e) => eprintln!("{}", e),
    }
}

/// Marks an active reminder as complete, after confirmation.
pub fn cmd_complete(id: String, force: bool) {
    let mut store = open_store();
    let (target, text) = match resolve_id(store.active(), &id) {
        Ok(r) => (r.id, r.text.clone()),
        Err(msg) => {
            eprintln!("{}", msg);
            return;
        }
    };
    if !force && !confirm(&format!("Mark '{}' as complete?", text)) {
        println!("Aborted.");
        return;
    }
    match store.complete(target) {
        Ok(()) => println!("Reminder marked as complete."),
        Err(e) => eprintln!("{}", e),
    }
}

/// Deletes a completed reminder, after confirmation. Active reminders must
/// be completed first.
pub fn cmd_delete(id: String, force: bool) {
    let mut store = open_store();
    let (target, text) = match resolve_id(store.completed(), &id) {
        Ok(r) => (r.id, r.text.clone()),
        Err(msg) => {
            eprintln!("{}", msg);
            return;
        }
    };
    if !force && !confirm(&format!("Are you sure you want to delete '{}'?", text)) {
        println!("Aborted.");
        return;
    }
    if store.delete(target) {
        println!("Reminder deleted.");
    }
}

/// Lists active reminders in a formatted table; `all` includes the
/// completed section.
pub fn cmd_list(all: bool) {
    let store = open_store();
    let mut rows: Vec<&Reminder> = store.active().iter().collect();
    if all {
        rows.extend(store.completed().iter());
    }
    if rows.is_empty() {
        println!("No reminders found.");
        return;
    }
    println!("{}", reminder_table(&rows));
}

/// Searches the full collection by text.
pub fn cmd_search(query: String) {
    let store = open_store();
    let matches = store.search(&query);
    if matches.is_empty() {
        println!("No reminders match '{}'.", query);
        return;
    }
    println!("{}", reminder_table(&matches));
}

/// Prints the dashboard: counts per section, plus search results when a
/// query is given.
pub fn cmd_dashboard(query: Option<String>) {
    let store = open_store();
    let counts = store.counts();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Section").add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
        ]);
    table.add_row(vec![
        Cell::new("Active"),
        Cell::new(counts.active).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Completed"),
        Cell::new(counts.completed).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(counts.active + counts.completed),
    ]);
    println!("{table}");

    if let Some(query) = query {
        let matches = store.search(&query);
        if matches.is_empty() {
            println!("No reminders match '{}'.", query);
        } else {
            println!("{}", reminder_table(&matches));
        }
    }
}

/// Polls the schedule ledger and delivers due notifications until
/// interrupted.
pub fn cmd_watch(interval_secs: u64) {
    let mut scheduler = DesktopScheduler::new();
    scheduler.ensure_permission();
    println!(
        "Watching for due reminders every {}s (Ctrl-C to stop).",
        interval_secs
    );
    loop {
        let delivered = scheduler.deliver_due();
        if delivered > 0 {
            log::info!("Delivered {} notification(s)", delivered);
        }
        std::thread::sleep(Duration::from_secs(interval_secs));
    }
}

/// Finds the single reminder in `pool` whose id starts with `needle`.
fn resolve_id<'a>(pool: &'a [Reminder], needle: &str) -> Result<&'a Reminder, String> {
    let needle = needle.to_lowercase();
    let matches: Vec<&Reminder> = pool
        .iter()
        .filter(|r| r.id.to_string().starts_with(&needle))
        .collect();
    match matches.len() {
        0 => Err(format!("No reminder matches '{}'.", needle)),
        1 => Ok(matches[0]),
        n => Err(format!("'{}' is ambiguous ({} reminders match).", needle, n)),
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn reminder_table(reminders: &[&Reminder]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
            Cell::new("When").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let today = Local::now().date_naive();

    for r in reminders {
        let days_left = (r.date - today).num_days();
        let when = if days_left < 0 {
            format!("{}d overdue", days_left.abs())
        } else if days_left == 0 {
            "Today".to_string()
        } else {
            format!("{}d", days_left)
        };

        let when_color = if days_left < 0 && !r.is_completed() {
            Color::Red
        } else {
            Color::Reset
        };
        let status = if r.is_completed() { "Done" } else { "Active" };
        let status_color = if r.is_completed() {
            Color::Green
        } else {
            Color::Yellow
        };

        table.add_row(vec![
            Cell::new(r.short_id()),
            Cell::new(r.date),
            Cell::new(r.time),
            Cell::new(&r.text),
            Cell::new(when).fg(when_color),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}
