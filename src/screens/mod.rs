//! Screen logic: owner-scoped list loaders and form submissions.
//!
//! Rendering lives in the terminal client; everything here is plain async
//! functions over the backend ports, so every screen can run against the
//! in-memory adapters.

use chrono::{DateTime, Local, Utc};
use std::fmt;

use crate::error::AppError;

pub mod admin;
pub mod auth;
pub mod injuries;
pub mod loader;
pub mod manage_routines;
pub mod progress;
pub mod record_injury;
pub mod routines;
pub mod settings;
pub mod trainer;

pub use loader::{load, resolve_owner, ListState, LoadTicket, OwnerScoped, ScreenSlot};

/// Text shown for records without a stored timestamp
pub const DATE_UNAVAILABLE: &str = "date unavailable";

/// Render a stored timestamp as a local calendar date
pub fn display_date(date: Option<DateTime<Utc>>, format: &str) -> String {
    match date {
        Some(date) => date.with_timezone(&Local).format(format).to_string(),
        None => DATE_UNAVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

/// Outcome of a write screen, shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Validation failures warn; everything else is an error
    pub fn failure(title: impl Into<String>, error: &AppError) -> Self {
        let kind = match error {
            AppError::Validation(_) => AlertKind::Warning,
            _ => AlertKind::Error,
        };
        Self {
            kind,
            title: title.into(),
            message: error.to_string(),
        }
    }

    pub fn from_result<T>(title: &str, success: &str, result: &Result<T, AppError>) -> Self {
        match result {
            Ok(_) => Alert::success(title, success),
            Err(error) => Alert::failure(title, error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == AlertKind::Success
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
