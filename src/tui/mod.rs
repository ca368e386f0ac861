pub mod app;
pub mod ui;

use std::{error::Error, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputMode};
use ui::ui;

pub fn run_tui() -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab | KeyCode::Char('v') => app.toggle_view(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') => app.complete_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('/') => app.start_search(),
                    KeyCode::Enter => app.activate_selected(),
                    _ => {}
                },
                InputMode::Adding => match key.code {
                    KeyCode::Enter => app.handle_adding_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                },
                InputMode::Searching => match key.code {
                    KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
                    KeyCode::Char(c) => {
                        app.search_query.push(c);
                        app.refresh();
                    }
                    KeyCode::Backspace => {
                        app.search_query.pop();
                        app.refresh();
                    }
                    _ => {}
                },
                InputMode::Confirming => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_yes(),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
                    _ => {}
                },
            }
        }
    }
}
