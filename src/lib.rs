//! Gym Coach: client library for a personal-training product.
//!
//! Students, trainers and an administrator share a hosted document store and
//! authentication service. A [`session::SessionContext`] resolves the role of
//! the signed-in user, [`router::route`] picks the screen tree for that role,
//! and the [`screens`] read and write the records of each tree.

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod router;
pub mod screens;
pub mod session;

pub use error::{AppError, Result};
