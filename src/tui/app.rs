use ratatui::widgets::TableState;
use uuid::Uuid;

use crate::models::Reminder;
use crate::notify::DesktopScheduler;
use crate::store::ReminderStore;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Searching,
    Confirming,
}

#[derive(PartialEq, Clone, Copy)]
pub enum ViewMode {
    Reminders,
    Dashboard,
}

#[derive(PartialEq, Clone, Copy)]
pub enum Section {
    Active,
    Completed,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Active => "Active",
            Section::Completed => "Completed",
        }
    }
}

#[derive(Clone, Copy)]
pub enum ConfirmAction {
    Complete(Uuid),
    Delete(Uuid),
}

pub enum DisplayItem {
    SectionHeader(Section, usize),
    Entry(Reminder),
}

/// State for the multi-step "Add Reminder" wizard.
#[derive(Default)]
pub struct AddState {
    pub date: String,
    pub time: String,
    pub step: usize, // 0: Date, 1: Time, 2: Text
}

pub struct App {
    pub store: ReminderStore,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub confirm: Option<ConfirmAction>,
    pub confirm_prompt: String,
    pub display_items: Vec<DisplayItem>,
    pub state: TableState,
    pub expand_active: bool,
    pub expand_completed: bool,
    pub dash_selected: Section,
    pub search_query: String,
    pub search_results: Vec<Reminder>,
    pub status: Option<String>,
}

impl App {
    /// Creates a new App instance around a single shared store.
    pub fn new() -> App {
        let store = ReminderStore::open(Box::new(DesktopScheduler::new()));
        let mut state = TableState::default();
        state.select(Some(0));
        let mut app = App {
            store,
            view_mode: ViewMode::Reminders,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            confirm: None,
            confirm_prompt: String::new(),
            display_items: Vec::new(),
            state,
            expand_active: true,
            expand_completed: false,
            dash_selected: Section::Active,
            search_query: String::new(),
            search_results: Vec::new(),
            status: None,
        };
        app.refresh();
        app
    }

    /// Rebuilds the display list and search results from the store and
    /// clamps the selection.
    pub fn refresh(&mut self) {
        self.display_items.clear();
        let active = self.store.active();
        self.display_items
            .push(DisplayItem::SectionHeader(Section::Active, active.len()));
        if self.expand_active {
            for r in active {
                self.display_items.push(DisplayItem::Entry(r.clone()));
            }
        }
        let completed = self.store.completed();
        self.display_items
            .push(DisplayItem::SectionHeader(Section::Completed, completed.len()));
        if self.expand_completed {
            for r in completed {
                self.display_items.push(DisplayItem::Entry(r.clone()));
            }
        }

        if let Some(i) = self.state.selected() {
            if i >= self.display_items.len() {
                self.state.select(Some(self.display_items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }

        self.search_results = self
            .store
            .search(&self.search_query)
            .into_iter()
            .cloned()
            .collect();
    }

    pub fn toggle_view(&mut self) {
        self.status = None;
        self.view_mode = match self.view_mode {
            ViewMode::Reminders => ViewMode::Dashboard,
            ViewMode::Dashboard => ViewMode::Reminders,
        };
    }

    /// Selects the next item in the current view.
    pub fn next(&mut self) {
        match self.view_mode {
            ViewMode::Reminders => {
                if self.display_items.is_empty() {
                    return;
                }
                let i = match self.state.selected() {
                    Some(i) => {
                        if i >= self.display_items.len() - 1 {
                            0
                        } else {
                            i + 1
                        }
                    }
                    None => 0,
                };
                self.state.select(Some(i));
            }
            ViewMode::Dashboard => {
                self.dash_selected = match self.dash_selected {
                    Section::Active => Section::Completed,
                    Section::Completed => Section::Active,
                };
            }
        }
    }

    /// Selects the previous item in the current view.
    pub fn previous(&mut self) {
        match self.view_mode {
            ViewMode::Reminders => {
                if self.display_items.is_empty() {
                    return;
                }
                let i = match self.state.selected() {
                    Some(i) => {
                        if i == 0 {
                            self.display_items.len() - 1
                        } else {
                            i - 1
                        }
                    }
                    None => 0,
                };
                self.state.select(Some(i));
            }
            ViewMode::Dashboard => self.next(),
        }
    }

    fn selected_entry(&self) -> Option<&Reminder> {
        if self.view_mode != ViewMode::Reminders {
            return None;
        }
        match self.state.selected().and_then(|i| self.display_items.get(i)) {
            Some(DisplayItem::Entry(r)) => Some(r),
            _ => None,
        }
    }

    /// Asks for confirmation before marking the selected reminder complete.
    pub fn complete_selected(&mut self) {
        let Some((id, text, completed)) = self
            .selected_entry()
            .map(|r| (r.id, r.text.clone(), r.is_completed()))
        else {
            return;
        };
        if completed {
            self.status = Some("Already completed.".to_string());
            return;
        }
        self.confirm_prompt = format!("Want to mark '{}' as complete?", text);
        self.confirm = Some(ConfirmAction::Complete(id));
        self.input_mode = InputMode::Confirming;
    }

    /// Asks for confirmation before deleting the selected completed
    /// reminder.
    pub fn delete_selected(&mut self) {
        let Some((id, text, completed)) = self
            .selected_entry()
            .map(|r| (r.id, r.text.clone(), r.is_completed()))
        else {
            return;
        };
        if !completed {
            self.status = Some("Only completed reminders can be deleted.".to_string());
            return;
        }
        self.confirm_prompt = format!("Are you sure you want to delete '{}'?", text);
        self.confirm = Some(ConfirmAction::Delete(id));
        self.input_mode = InputMode::Confirming;
    }

    pub fn confirm_yes(&mut self) {
        if let Some(action) = self.confirm.take() {
            match action {
                ConfirmAction::Complete(id) => {
                    if let Err(e) = self.store.complete(id) {
                        self.status = Some(e.to_string());
                    }
                }
                ConfirmAction::Delete(id) => {
                    self.store.delete(id);
                }
            }
        }
        self.input_mode = InputMode::Normal;
        self.refresh();
    }

    pub fn confirm_no(&mut self) {
        self.confirm = None;
        self.input_mode = InputMode::Normal;
    }

    /// Enter on a section header toggles it; Enter on the dashboard jumps
    /// to the reminders view with the selected section expanded.
    pub fn activate_selected(&mut self) {
        match self.view_mode {
            ViewMode::Reminders => {
                let Some(i) = self.state.selected() else {
                    return;
                };
                let section = match self.display_items.get(i) {
                    Some(DisplayItem::SectionHeader(s, _)) => *s,
                    _ => return,
                };
                match section {
                    Section::Active => self.expand_active = !self.expand_active,
                    Section::Completed => self.expand_completed = !self.expand_completed,
                }
                self.refresh();
                self.state.select(Some(i.min(self.display_items.len() - 1)));
            }
            ViewMode::Dashboard => {
                let target = self.dash_selected;
                match target {
                    Section::Active => self.expand_active = true,
                    Section::Completed => self.expand_completed = true,
                }
                self.view_mode = ViewMode::Reminders;
                self.refresh();
                let header = self
                    .display_items
                    .iter()
                    .position(|item| matches!(item, DisplayItem::SectionHeader(s, _) if *s == target))
                    .unwrap_or(0);
                self.state.select(Some(header));
            }
        }
    }

    /// Initiates the "Add Reminder" wizard.
    pub fn start_add(&mut self) {
        if self.view_mode != ViewMode::Reminders {
            return;
        }
        self.status = None;
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of the dashboard search query.
    pub fn start_search(&mut self) {
        if self.view_mode != ViewMode::Dashboard {
            return;
        }
        self.input_mode = InputMode::Searching;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Advances the "Add Reminder" wizard one step; the final step creates
    /// the reminder and reports any validation failure in the status line.
    pub fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                self.add_state.date = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            1 => {
                self.add_state.time = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => {
                let created = self.store.create(
                    &self.add_state.date,
                    &self.add_state.time,
                    &self.input_buffer,
                );
                match created {
                    Ok(_) => self.status = None,
                    Err(e) => self.status = Some(e.to_string()),
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.refresh();
            }
            _ => {}
        }
    }
}
