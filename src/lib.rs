//! Shredder: settings screen of a duplicate file finder
//!
//! This library provides:
//! - Loading the settings schema and opening the settings store
//! - Editor widgets generated from the schema, bound to the store
//! - The settings screen with staged Apply / Reset to defaults actions
//! - A minimal application window hosting the screens

pub mod config;
pub mod ui;

// Re-export commonly used types
pub use shredder_core::{Settings, SettingsController};
