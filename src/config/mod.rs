//! Configuration management

mod settings;

pub use settings::{
    builtin_schema, effective_values, load_schema, open_settings, settings_path,
};
