// Library exports for the Gym Coach CLI
// This allows testing of internal modules

pub mod commands;
pub mod context;
pub mod ui;
