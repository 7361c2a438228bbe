use anyhow::Result;
use chrono::Utc;
use crossterm::event::KeyCode;
use std::sync::Arc;
use tokio::sync::mpsc;

use gym_coach::backend::DocumentStore;
use gym_coach::config::CollectionsConfig;
use gym_coach::models::{Role, UserProfile};
use gym_coach::progress::WeekBucket;
use gym_coach::router::{Route, Screen};
use gym_coach::screens::admin::{list_by_role, Overview};
use gym_coach::screens::injuries::{InjuriesScreen, InjuryView};
use gym_coach::screens::progress::ProgressScreen;
use gym_coach::screens::routines::{RoutineView, RoutinesScreen};
use gym_coach::screens::settings::SettingsView;
use gym_coach::screens::trainer::{dashboard, StudentOption};
use gym_coach::screens::{load, ListState, LoadTicket, ScreenSlot};

/// Result of a background load, tagged with the mount it belongs to
pub enum Loaded {
    Routines(LoadTicket, ListState<RoutineView>),
    Injuries(LoadTicket, ListState<InjuryView>),
    Progress(LoadTicket, ListState<WeekBucket>),
    Students(LoadTicket, ListState<StudentOption>),
    Trainers(LoadTicket, ListState<UserProfile>),
    AllStudents(LoadTicket, ListState<UserProfile>),
}

/// Spawns screen loads on the runtime and reports back over a channel
#[derive(Clone)]
pub struct Loader {
    store: Arc<dyn DocumentStore>,
    collections: CollectionsConfig,
    date_format: String,
    window_weeks: u32,
    tx: mpsc::UnboundedSender<Loaded>,
}

impl Loader {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: CollectionsConfig,
        date_format: String,
        window_weeks: u32,
    ) -> (Self, mpsc::UnboundedReceiver<Loaded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            store,
            collections,
            date_format,
            window_weeks,
            tx,
        };
        (loader, rx)
    }

    fn routines(&self, ticket: LoadTicket, owner: Option<String>) {
        let this = self.clone();
        tokio::spawn(async move {
            let screen = RoutinesScreen::new(this.date_format.clone());
            let state =
                load(&screen, this.store.as_ref(), &this.collections, owner.as_deref()).await;
            let _ = this.tx.send(Loaded::Routines(ticket, state));
        });
    }

    fn injuries(&self, ticket: LoadTicket, owner: Option<String>) {
        let this = self.clone();
        tokio::spawn(async move {
            let screen = InjuriesScreen::new(this.date_format.clone());
            let state =
                load(&screen, this.store.as_ref(), &this.collections, owner.as_deref()).await;
            let _ = this.tx.send(Loaded::Injuries(ticket, state));
        });
    }

    fn progress(&self, ticket: LoadTicket, owner: Option<String>) {
        let this = self.clone();
        tokio::spawn(async move {
            let screen = ProgressScreen::new(Utc::now(), this.window_weeks);
            let state =
                load(&screen, this.store.as_ref(), &this.collections, owner.as_deref()).await;
            let _ = this.tx.send(Loaded::Progress(ticket, state));
        });
    }

    fn students(&self, ticket: LoadTicket, trainer_id: Option<String>) {
        let this = self.clone();
        tokio::spawn(async move {
            let state =
                dashboard(this.store.as_ref(), &this.collections, trainer_id.as_deref()).await;
            let _ = this.tx.send(Loaded::Students(ticket, state));
        });
    }

    fn profiles(&self, ticket: LoadTicket, role: Role) {
        let this = self.clone();
        tokio::spawn(async move {
            let state = list_by_role(this.store.as_ref(), &this.collections, &role).await;
            let loaded = match role {
                Role::Trainer => Loaded::Trainers(ticket, state),
                _ => Loaded::AllStudents(ticket, state),
            };
            let _ = this.tx.send(loaded);
        });
    }
}

/// Application state of the interactive client
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub route: Route,
    pub settings: Option<SettingsView>,
    pub selected_tab: usize,
    pub selected_index: usize,
    /// Student picked on the trainer dashboard; scopes the trainer's other tabs
    pub focused_student: Option<StudentOption>,
    pub routines: ScreenSlot<RoutineView>,
    pub injuries: ScreenSlot<InjuryView>,
    pub progress: ScreenSlot<WeekBucket>,
    pub students: ScreenSlot<StudentOption>,
    pub trainers: ScreenSlot<UserProfile>,
    pub all_students: ScreenSlot<UserProfile>,
    loader: Loader,
}

impl App {
    pub fn new(route: Route, settings: Option<SettingsView>, loader: Loader) -> Self {
        let mut app = Self {
            should_quit: false,
            show_help: false,
            route,
            settings,
            selected_tab: 0,
            selected_index: 0,
            focused_student: None,
            routines: ScreenSlot::new(),
            injuries: ScreenSlot::new(),
            progress: ScreenSlot::new(),
            students: ScreenSlot::new(),
            trainers: ScreenSlot::new(),
            all_students: ScreenSlot::new(),
            loader,
        };
        app.mount_current();
        app
    }

    pub fn tabs(&self) -> &'static [Screen] {
        self.route.screens()
    }

    pub fn current_screen(&self) -> Option<Screen> {
        self.tabs().get(self.selected_tab).copied()
    }

    /// Trainer and admin overview, rebuilt from the two profile lists
    pub fn overview(&self) -> Overview {
        Overview {
            trainers: self.trainers.state().clone(),
            students: self.all_students.state().clone(),
        }
    }

    /// Owner of the student-scoped lists on the current tree
    fn owner(&self) -> Option<String> {
        match &self.route {
            Route::Student { student_id } => Some(student_id.clone()),
            Route::Trainer { .. } => self.focused_student.as_ref().map(|s| s.id.clone()),
            _ => None,
        }
    }

    /// Start the loads of the visible screen
    fn mount_current(&mut self) {
        let Some(screen) = self.current_screen() else {
            return;
        };
        let user_id = self.route.user_id().map(str::to_string);
        let owner = self.owner();

        match screen {
            Screen::StudentHome | Screen::Progress => {
                let ticket = self.progress.mount();
                self.loader.progress(ticket, owner);
            }
            Screen::Routines | Screen::ManageRoutines => {
                let ticket = self.routines.mount();
                self.loader.routines(ticket, owner);
            }
            Screen::Injuries | Screen::RecordInjury => {
                let ticket = self.injuries.mount();
                self.loader.injuries(ticket, owner);
            }
            Screen::TrainerDashboard => {
                let ticket = self.students.mount();
                self.loader.students(ticket, user_id);
            }
            Screen::AdminDashboard | Screen::AssignStudent => {
                let ticket = self.trainers.mount();
                self.loader.profiles(ticket, Role::Trainer);
                let ticket = self.all_students.mount();
                self.loader.profiles(ticket, Role::Student);
            }
            Screen::Login | Screen::Register | Screen::RegisterTrainer | Screen::Settings => {}
        }
    }

    /// Invalidate loads of the screen being left
    fn unmount_current(&mut self) {
        let Some(screen) = self.current_screen() else {
            return;
        };

        match screen {
            Screen::StudentHome | Screen::Progress => self.progress.unmount(),
            Screen::Routines | Screen::ManageRoutines => self.routines.unmount(),
            Screen::Injuries | Screen::RecordInjury => self.injuries.unmount(),
            Screen::TrainerDashboard => self.students.unmount(),
            Screen::AdminDashboard | Screen::AssignStudent => {
                self.trainers.unmount();
                self.all_students.unmount();
            }
            Screen::Login | Screen::Register | Screen::RegisterTrainer | Screen::Settings => {}
        }
    }

    /// Apply a finished load; stale results are dropped by the slot
    pub fn apply(&mut self, loaded: Loaded) -> bool {
        match loaded {
            Loaded::Routines(ticket, state) => self.routines.apply(ticket, state),
            Loaded::Injuries(ticket, state) => self.injuries.apply(ticket, state),
            Loaded::Progress(ticket, state) => self.progress.apply(ticket, state),
            Loaded::Students(ticket, state) => self.students.apply(ticket, state),
            Loaded::Trainers(ticket, state) => self.trainers.apply(ticket, state),
            Loaded::AllStudents(ticket, state) => self.all_students.apply(ticket, state),
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        if index >= self.tabs().len() || index == self.selected_tab {
            return;
        }
        self.unmount_current();
        self.selected_tab = index;
        self.selected_index = 0;
        self.mount_current();
    }

    fn next_tab(&mut self) {
        let count = self.tabs().len();
        if count > 0 {
            self.select_tab((self.selected_tab + 1) % count);
        }
    }

    fn prev_tab(&mut self) {
        let count = self.tabs().len();
        if count > 0 {
            self.select_tab((self.selected_tab + count - 1) % count);
        }
    }

    fn selectable_len(&self) -> usize {
        match self.current_screen() {
            Some(Screen::Routines | Screen::ManageRoutines) => self.routines.state().items().len(),
            Some(Screen::Injuries | Screen::RecordInjury) => self.injuries.state().items().len(),
            Some(Screen::TrainerDashboard) => self.students.state().items().len(),
            _ => 0,
        }
    }

    /// Focus the highlighted student on the trainer dashboard
    fn focus_student(&mut self) {
        if self.current_screen() != Some(Screen::TrainerDashboard) {
            return;
        }
        if let Some(student) = self.students.state().items().get(self.selected_index) {
            tracing::debug!("Focused student {}", student.id);
            self.focused_student = Some(student.clone());
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        if self.show_help {
            match key {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                _ => {}
            }
            return Ok(());
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            KeyCode::Char('?') => {
                self.show_help = true;
            }

            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.unmount_current();
                self.mount_current();
            }

            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.prev_tab(),

            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.select_tab(index);
                }
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.selectable_len() {
                    self.selected_index += 1;
                }
            }

            KeyCode::Enter => self.focus_student(),

            _ => {}
        }

        Ok(())
    }
}
