//! Role router: maps the session state to exactly one screen tree

use std::fmt;

use crate::models::Role;
use crate::session::SessionState;

/// Screens reachable from some tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    StudentHome,
    Progress,
    Routines,
    Injuries,
    Settings,
    TrainerDashboard,
    ManageRoutines,
    RecordInjury,
    AdminDashboard,
    RegisterTrainer,
    AssignStudent,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::StudentHome => "Home",
            Screen::Progress => "Progress",
            Screen::Routines => "Routines",
            Screen::Injuries => "Injuries",
            Screen::Settings => "Settings",
            Screen::TrainerDashboard => "Students",
            Screen::ManageRoutines => "Manage Routines",
            Screen::RecordInjury => "Record Injury",
            Screen::AdminDashboard => "Overview",
            Screen::RegisterTrainer => "Register Trainer",
            Screen::AssignStudent => "Assign Student",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

const AUTH_SCREENS: &[Screen] = &[Screen::Login, Screen::Register];

/// Student tabs, in display order
pub const STUDENT_TABS: &[Screen] = &[
    Screen::StudentHome,
    Screen::Progress,
    Screen::Routines,
    Screen::Injuries,
    Screen::Settings,
];

const TRAINER_SCREENS: &[Screen] = &[
    Screen::TrainerDashboard,
    Screen::ManageRoutines,
    Screen::RecordInjury,
    Screen::Settings,
];

const ADMIN_SCREENS: &[Screen] = &[
    Screen::AdminDashboard,
    Screen::RegisterTrainer,
    Screen::AssignStudent,
    Screen::Settings,
];

/// The mounted screen tree
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Session still initializing
    Loading,
    /// No session: login and registration
    Auth,
    Admin { admin_id: String },
    Trainer { trainer_id: String },
    Student { student_id: String },
    /// Signed in with a role outside the known set
    UnknownRole(Role),
    /// Signed in, but the profile is missing or unreadable
    ProfileError(String),
}

/// Pick the screen tree for a session state
pub fn route(state: &SessionState) -> Route {
    match state {
        SessionState::Initializing => Route::Loading,
        SessionState::SignedOut => Route::Auth,
        SessionState::ProfileMissing { user } => Route::ProfileError(format!(
            "No profile was found for this account ({}). Contact your administrator.",
            user.email.as_deref().unwrap_or(&user.uid)
        )),
        SessionState::ProfileUnavailable { reason, .. } => {
            Route::ProfileError(format!("Your profile could not be loaded: {}", reason))
        }
        SessionState::SignedIn { user, role, .. } => match role {
            Role::Admin => Route::Admin {
                admin_id: user.uid.clone(),
            },
            Role::Trainer => Route::Trainer {
                trainer_id: user.uid.clone(),
            },
            Role::Student => Route::Student {
                student_id: user.uid.clone(),
            },
            Role::Unknown(_) => Route::UnknownRole(role.clone()),
        },
    }
}

impl Route {
    /// Screens of the mounted tree; empty for placeholder views
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Route::Auth => AUTH_SCREENS,
            Route::Admin { .. } => ADMIN_SCREENS,
            Route::Trainer { .. } => TRAINER_SCREENS,
            Route::Student { .. } => STUDENT_TABS,
            Route::Loading | Route::UnknownRole(_) | Route::ProfileError(_) => &[],
        }
    }

    pub fn allows(&self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }

    /// Identifier of the signed-in user for role trees
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Route::Admin { admin_id } => Some(admin_id),
            Route::Trainer { trainer_id } => Some(trainer_id),
            Route::Student { student_id } => Some(student_id),
            _ => None,
        }
    }

    /// Message of a placeholder view, if this route renders one
    pub fn placeholder(&self) -> Option<String> {
        match self {
            Route::Loading => Some("Loading...".to_string()),
            Route::UnknownRole(role) => Some(format!(
                "Your account has an unrecognized role: {}. Contact your administrator.",
                role
            )),
            Route::ProfileError(message) => Some(message.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Loading => write!(f, "loading"),
            Route::Auth => write!(f, "authentication"),
            Route::Admin { .. } => write!(f, "administrator"),
            Route::Trainer { .. } => write!(f, "trainer"),
            Route::Student { .. } => write!(f, "student"),
            Route::UnknownRole(role) => write!(f, "{}", role),
            Route::ProfileError(_) => write!(f, "profile error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthUser;
    use crate::models::UserProfile;

    fn signed_in(role: Role) -> SessionState {
        SessionState::SignedIn {
            user: AuthUser {
                uid: "u1".to_string(),
                email: None,
            },
            profile: UserProfile::new("u1", role.clone()),
            role,
        }
    }

    #[test]
    fn test_each_role_mounts_one_tree() {
        assert_eq!(
            route(&signed_in(Role::Admin)),
            Route::Admin {
                admin_id: "u1".to_string()
            }
        );
        assert_eq!(
            route(&signed_in(Role::Trainer)),
            Route::Trainer {
                trainer_id: "u1".to_string()
            }
        );
        assert_eq!(
            route(&signed_in(Role::Student)),
            Route::Student {
                student_id: "u1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_role_renders_placeholder_only() {
        let route = route(&signed_in(Role::Unknown("coach".to_string())));
        assert!(route.screens().is_empty());
        assert!(route.placeholder().unwrap().contains("coach"));
        assert_eq!(route.user_id(), None);
    }

    #[test]
    fn test_missing_profile_renders_error() {
        let state = SessionState::ProfileMissing {
            user: AuthUser {
                uid: "u9".to_string(),
                email: Some("x@gym.test".to_string()),
            },
        };
        let route = route(&state);
        assert!(matches!(route, Route::ProfileError(ref m) if m.contains("x@gym.test")));
        assert!(!route.allows(Screen::StudentHome));
    }

    #[test]
    fn test_signed_out_and_loading() {
        assert_eq!(route(&SessionState::SignedOut), Route::Auth);
        assert!(Route::Auth.allows(Screen::Register));
        assert_eq!(route(&SessionState::Initializing), Route::Loading);
        assert!(Route::Loading.screens().is_empty());
    }

    #[test]
    fn test_trees_are_disjoint_by_role() {
        let trainer = route(&signed_in(Role::Trainer));
        assert!(trainer.allows(Screen::RecordInjury));
        assert!(!trainer.allows(Screen::RegisterTrainer));
        assert!(!trainer.allows(Screen::Progress));

        let student = route(&signed_in(Role::Student));
        assert!(!student.allows(Screen::RecordInjury));
        assert_eq!(student.screens(), STUDENT_TABS);
    }
}
