//! shredder-core: Settings store, form layout and screen lifecycle.
//!
//! This crate holds everything about the settings screen that does not need
//! a display: the staged settings store and its backends, the editor
//! registry, the form layout rules, the choice, numeric and size range
//! editor state with its bindings to settings keys, and the controller
//! driving a visit to the screen.

pub mod backend;
pub mod binding;
pub mod choice;
pub mod constants;
pub mod controller;
pub mod form;
pub mod numeric;
mod registry;
mod store;
pub mod units;

pub use backend::{JsonFileBackend, MemoryBackend, SettingsBackend, StoredValues};
pub use binding::{ChoiceBinding, SizeRangeBinding};
pub use choice::{ChoiceModel, RowGlyph};
pub use constants::RESET_SETTLE_DELAY;
pub use controller::{DeferredRunner, ScreenShell, ScreenState, SettingsController, TaskHandle};
pub use form::{build_form, FormEntry, FormSection};
pub use numeric::{NumericDisplay, NumericSpec};
pub use registry::EditorKind;
pub use store::{HandlerId, Settings, SettingsError};
pub use units::{format_size, order_range, RangeEnd, SizeUnit};

// Re-export types used in signatures for convenience
pub use shredder_types::{KeyRange, KeySchema, SettingValue, SettingsSchema, TypeTag};
