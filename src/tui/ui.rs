use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, DisplayItem, InputMode, Section, ViewMode};
use crate::models::Reminder;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),    // Content
                Constraint::Length(1), // Status line
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(f.area());

    match app.view_mode {
        ViewMode::Reminders => render_reminders(f, app, chunks[0]),
        ViewMode::Dashboard => render_dashboard(f, app, chunks[0]),
    }

    let status = Paragraph::new(app.status.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Red));
    f.render_widget(status, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Reminders => {
                "q: Quit | a: Add | Space: Complete | d: Delete | Enter: Expand/Collapse | v: Dashboard"
            }
            ViewMode::Dashboard => "q: Quit | /: Search | Enter: Open Section | v: Reminders",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::Searching => "Type to filter | Enter/Esc: Done",
        InputMode::Confirming => "y: Yes | n: No",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    match app.input_mode {
        InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);
            let title = match app.add_state.step {
                0 => "Add Reminder: Enter Date (YYYY-MM-DD)",
                1 => "Add Reminder: Enter Time (HH:MM:SS)",
                2 => "Add Reminder: Enter Text",
                _ => "Add Reminder",
            };
            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(input, area);
        }
        InputMode::Confirming => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);
            let prompt = Paragraph::new(app.confirm_prompt.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Confirmation (y/n)"));
            f.render_widget(prompt, area);
        }
        _ => {}
    }
}

fn render_reminders(f: &mut Frame, app: &mut App, area: Rect) {
    let today = Local::now().date_naive();

    let rows: Vec<Row> = app
        .display_items
        .iter()
        .map(|item| match item {
            DisplayItem::SectionHeader(section, count) => {
                let marker = match section {
                    Section::Active => {
                        if app.expand_active {
                            "▾"
                        } else {
                            "▸"
                        }
                    }
                    Section::Completed => {
                        if app.expand_completed {
                            "▾"
                        } else {
                            "▸"
                        }
                    }
                };
                Row::new(vec![
                    Cell::from(format!("{} {} ({})", marker, section.title(), count)),
                    Cell::from(""),
                    Cell::from(""),
                    Cell::from(""),
                    Cell::from(""),
                ])
                .style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            }
            DisplayItem::Entry(r) => {
                let days_left = (r.date - today).num_days();
                let when = if days_left < 0 {
                    format!("{}d overdue", days_left.abs())
                } else if days_left == 0 {
                    "Today".to_string()
                } else {
                    format!("{}d", days_left)
                };
                let style = if r.is_completed() {
                    Style::default().fg(Color::DarkGray)
                } else if days_left < 0 {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Green)
                };
                Row::new(vec![
                    Cell::from(format!("  {}", r.short_id())),
                    Cell::from(r.date.to_string()),
                    Cell::from(r.time.to_string()),
                    Cell::from(r.text.clone()),
                    Cell::from(when),
                ])
                .style(style)
            }
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Section / ID", "Date", "Time", "Text", "When"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title("remindr - Reminders"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_dashboard(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5), // Counts
                Constraint::Length(3), // Search box
                Constraint::Min(0),    // Results
            ]
            .as_ref(),
        )
        .split(area);

    let counts = app.store.counts();
    let count_rows = [
        (Section::Active, counts.active),
        (Section::Completed, counts.completed),
    ];
    let rows: Vec<Row> = count_rows
        .iter()
        .map(|(section, count)| {
            let selected = *section == app.dash_selected;
            let style = if selected {
                Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let prefix = if selected { ">> " } else { "   " };
            Row::new(vec![
                Cell::from(format!("{}{}", prefix, section.title())),
                Cell::from(count.to_string()),
            ])
            .style(style)
        })
        .collect();
    let counts_table = Table::new(rows, [Constraint::Min(16), Constraint::Length(8)])
        .header(
            Row::new(vec!["Section", "Count"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("remindr - Dashboard"));
    f.render_widget(counts_table, chunks[0]);

    let search_style = if app.input_mode == InputMode::Searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let search = Paragraph::new(app.search_query.as_str())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(search, chunks[1]);

    let today = Local::now().date_naive();
    let result_rows: Vec<Row> = app.search_results.iter().map(|r| result_row(r, today)).collect();
    let results = Table::new(
        result_rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["ID", "Date", "Time", "Text", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(results, chunks[2]);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height - height) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height - height) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn result_row(r: &Reminder, today: chrono::NaiveDate) -> Row<'static> {
    let style = if r.is_completed() {
        Style::default().fg(Color::DarkGray)
    } else if r.date < today {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    Row::new(vec![
        Cell::from(r.short_id()),
        Cell::from(r.date.to_string()),
        Cell::from(r.time.to_string()),
        Cell::from(r.text.clone()),
        Cell::from(if r.is_completed() { "Done" } else { "Active" }),
    ])
    .style(style)
}
