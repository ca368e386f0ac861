//! # remindr
//!
//! A terminal reminder manager written in Rust. remindr combines a fast CLI for quick entry with a TUI (Terminal User Interface) for interactive management, and delivers desktop notifications when reminders come due.
//!
//! ## Features
//!
//! *   **Dated reminders**: Each reminder fires at an exact date and time; the active list stays sorted by what is due next.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive list and dashboard views.
//! *   **Desktop notifications**: A `watch` process delivers a notification at the scheduled moment; completing a reminder cancels its pending notification.
//! *   **Dashboard**: Counts per section and live text search.
//! *   **Data Persistence**: Reminders are stored in standard XDG data directories (JSON format).
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ### Interactive Mode (TUI)
//!
//! Simply run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! remindr
//! # or explicitly
//! remindr ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//! *   `v` / `Tab`: Switch between Reminders and Dashboard views
//!
//! **Reminders View**
//! *   `a`: Add new reminder (date, time, text)
//! *   `Space`: Mark selected reminder as complete (asks for confirmation)
//! *   `d`: Delete selected completed reminder (asks for confirmation)
//! *   `Enter`: Expand/collapse the selected section
//!
//! **Dashboard View**
//! *   `/`: Edit the search query (results update per keystroke)
//! *   `Enter`: Jump to the reminders view with the selected section expanded
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Add a reminder
//! remindr add "Pay rent" --date 2030-01-01 --time 09:00:00
//!
//! # List active reminders (sorted by fire time)
//! remindr list
//!
//! # List all (including completed)
//! remindr list --all
//!
//! # Complete / delete (ids may be abbreviated to a unique prefix)
//! remindr complete 3f2a
//! remindr delete 3f2a
//!
//! # Dashboard counts and search
//! remindr dashboard
//! remindr dashboard rent
//! remindr search rent
//!
//! # Deliver due notifications (leave running in the background)
//! remindr watch
//! ```
//!
//! ## Data Storage
//!
//! Reminders are saved in your local data directory:
//! *   Linux: `~/.local/share/remindr/reminders.json`
//! *   macOS: `~/Library/Application Support/remindr/reminders.json`
//! *   Windows: `%APPDATA%\remindr\reminders.json`
//!
//! You can override this by setting the `REMINDERS_DB` environment variable.
//! Pending notifications live in `notifications.json` next to the database.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use remindr::commands::*;
use remindr::tui::run_tui;
use std::io;

#[derive(Parser)]
#[command(name = "remindr")]
#[command(about = "Terminal reminder manager with desktop notifications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new reminder
    Add {
        /// Reminder text (quoted if it has spaces)
        text: String,
        /// Date in YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        /// Time of day in HH:MM:SS
        #[arg(short, long)]
        time: String,
    },
    /// List reminders sorted by fire time
    List {
        /// Show completed reminders too
        #[arg(short, long)]
        all: bool,
    },
    /// Mark an active reminder as complete
    Complete {
        /// Reminder id (or unique prefix)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Delete a completed reminder
    Delete {
        /// Reminder id (or unique prefix)
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Search reminders by text
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },
    /// Show per-section counts, optionally with search results
    Dashboard {
        /// Case-insensitive substring to look for
        query: Option<String>,
    },
    /// Deliver due notifications until interrupted
    Watch {
        /// Poll interval in seconds
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    env_logger::builder()
        .filter_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Add { text, date, time }) => cmd_add(date, time, text),
        Some(Commands::List { all }) => cmd_list(all),
        Some(Commands::Complete { id, force }) => cmd_complete(id, force),
        Some(Commands::Delete { id, force }) => cmd_delete(id, force),
        Some(Commands::Search { query }) => cmd_search(query),
        Some(Commands::Dashboard { query }) => cmd_dashboard(query),
        Some(Commands::Watch { interval }) => cmd_watch(interval),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "remindr", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
