use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use gym_coach::router::{Route, Screen};

use super::app::{App, Loaded};
use super::widgets;

/// Dashboard manages the TUI lifecycle
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    loads: mpsc::UnboundedReceiver<Loaded>,
}

impl Dashboard {
    pub fn new(app: App, loads: mpsc::UnboundedReceiver<Loaded>) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            app,
            loads,
        })
    }

    /// Run the event loop until the user quits
    pub fn run(&mut self) -> Result<()> {
        loop {
            while let Ok(loaded) = self.loads.try_recv() {
                self.app.apply(loaded);
            }

            let app = &self.app;
            self.terminal.draw(|f| ui(f, app))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        self.app.handle_key(key.code)?;
                    }
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // Tabs, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    widgets::render_tabs(chunks[0], f.buffer_mut(), &app.route, app.selected_tab);

    let body = chunks[1];
    match app.current_screen() {
        None => widgets::render_placeholder(body, f.buffer_mut(), &app.route),
        Some(screen) => render_screen(f, app, screen, body),
    }

    widgets::render_status_bar(chunks[2], f.buffer_mut(), &app.route, app.focused_student.as_ref());

    if app.show_help {
        let help_area = centered_rect(60, 80, size);
        widgets::render_help_overlay(help_area, f.buffer_mut());
    }
}

fn render_screen(f: &mut Frame, app: &App, screen: Screen, area: Rect) {
    let buf = f.buffer_mut();
    let needs_student = matches!(app.route, Route::Trainer { .. }) && app.focused_student.is_none();

    match screen {
        Screen::StudentHome => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            widgets::render_welcome(columns[0], buf, app.settings.as_ref());
            widgets::render_progress_chart(columns[1], buf, app.progress.state());
        }
        Screen::Progress => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            widgets::render_progress_chart(rows[0], buf, app.progress.state());
            widgets::render_progress_table(rows[1], buf, app.progress.state());
        }
        Screen::Routines | Screen::ManageRoutines if !needs_student => {
            widgets::render_routines(area, buf, app.routines.state(), app.selected_index);
        }
        Screen::Injuries | Screen::RecordInjury if !needs_student => {
            widgets::render_injuries(area, buf, app.injuries.state(), app.selected_index);
        }
        Screen::ManageRoutines | Screen::RecordInjury => {
            let hint = ["Select a student on the Students tab first."];
            widgets::render_hint(area, buf, screen, &hint);
        }
        Screen::TrainerDashboard => {
            widgets::render_students(area, buf, app.students.state(), app.selected_index);
        }
        Screen::AdminDashboard | Screen::AssignStudent => {
            widgets::render_overview(area, buf, &app.overview());
        }
        Screen::RegisterTrainer => {
            let hint = ["Run 'gym-coach register-trainer' to create a trainer account."];
            widgets::render_hint(area, buf, screen, &hint);
        }
        Screen::Settings => widgets::render_settings(area, buf, app.settings.as_ref()),
        Screen::Login | Screen::Register => {
            let hint = ["Run 'gym-coach login' or 'gym-coach register' first."];
            widgets::render_hint(area, buf, screen, &hint);
        }
        Screen::Routines | Screen::Injuries => {}
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
