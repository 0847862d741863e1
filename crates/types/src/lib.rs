//! shredder-types: Shared data types for the Shredder settings screen.
//!
//! This crate contains the settings schema, typed values and the naming
//! conventions layered on top of key names and summaries. It has no GTK
//! dependencies, making it suitable as a foundation layer.

pub mod schema;
pub mod summary;
pub mod value;

pub use schema::{KeyRange, KeySchema, SchemaError, SettingsSchema, TypeTag};
pub use summary::{capitalize, parse_summary, section_for_key, ParsedSummary, HIDDEN_MARKER};
pub use value::SettingValue;
