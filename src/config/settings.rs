//! Locating, loading and opening the settings store

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value};
use shredder_core::{JsonFileBackend, Settings, SettingsSchema};
use std::path::{Path, PathBuf};

/// Schema compiled into the binary
const BUILTIN_SCHEMA: &str = include_str!("../../data/org.gnome.Shredder.json");

/// Parse the schema that ships with the application
pub fn builtin_schema() -> Result<SettingsSchema> {
    SettingsSchema::from_json(BUILTIN_SCHEMA).context("built-in settings schema is invalid")
}

/// Load a schema from `path`, or the built-in one
pub fn load_schema(path: Option<&Path>) -> Result<SettingsSchema> {
    let Some(path) = path else {
        return builtin_schema();
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {:?}", path))?;
    let schema = SettingsSchema::from_json(&content)
        .with_context(|| format!("failed to load schema {:?}", path))?;
    info!("Loaded settings schema '{}' from {:?}", schema.id, path);
    Ok(schema)
}

/// Default location of the stored settings
pub fn settings_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("org", "gnome", "Shredder")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().join("settings.json"))
}

/// Open the settings store
///
/// `schema_path` and `settings_file` override the built-in schema and the
/// default storage location.
pub fn open_settings(schema_path: Option<&Path>, settings_file: Option<&Path>) -> Result<Settings> {
    let schema = load_schema(schema_path)?;
    let path = match settings_file {
        Some(path) => path.to_path_buf(),
        None => settings_path()?,
    };
    info!("Using settings file {:?}", path);
    Ok(Settings::new(schema, JsonFileBackend::new(path)))
}

/// Current value of every key, as a JSON object
pub fn effective_values(settings: &Settings) -> Result<Value> {
    let mut values = Map::new();
    for key in settings.list_keys() {
        let value = settings.value(&key)?;
        values.insert(key, value.to_json());
    }
    Ok(Value::Object(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shredder_core::{build_form, EditorKind, MemoryBackend, TypeTag};

    #[test]
    fn test_builtin_schema_loads() {
        let schema = builtin_schema().unwrap();
        assert_eq!(schema.id, "org.gnome.Shredder");
        assert!(schema.key("computation-algorithm").is_some());
    }

    #[test]
    fn test_builtin_schema_form() {
        let schema = builtin_schema().unwrap();
        let sections = build_form(&schema, |kind, _, _, _| kind);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        // The ui section only holds hidden or unsupported keys
        assert_eq!(names, vec!["computation", "general", "traverse"]);

        let keys: Vec<&str> = sections
            .iter()
            .flat_map(|s| s.entries.iter().map(|e| e.key.as_str()))
            .collect();
        assert!(!keys.contains(&"general-find-nonstripped"));
        assert!(!keys.contains(&"ui-window-size"));
        assert!(!keys.contains(&"ui-recent-paths"));

        let computation = &sections[0];
        assert_eq!(computation.entries[0].key, "computation-algorithm");
        assert_eq!(computation.entries[1].widget, EditorKind::SizeRange);
    }

    #[test]
    fn test_every_key_has_a_known_type_or_is_skipped() {
        let schema = builtin_schema().unwrap();
        let unsupported: Vec<&str> = schema
            .keys()
            .iter()
            .filter(|k| matches!(k.type_tag, TypeTag::Unsupported(_)))
            .map(|k| k.name.as_str())
            .collect();
        assert_eq!(unsupported, vec!["ui-recent-paths"]);
    }

    #[test]
    fn test_effective_values() {
        let settings = Settings::new(builtin_schema().unwrap(), MemoryBackend::new());
        settings.set_boolean("traverse-hidden", true).unwrap();
        let values = effective_values(&settings).unwrap();
        assert_eq!(values["traverse-hidden"], Value::Bool(true));
        assert_eq!(values["computation-size-range"][1], Value::from(u64::MAX));
    }

    #[test]
    fn test_load_schema_from_missing_file() {
        assert!(load_schema(Some(Path::new("/nonexistent/schema.json"))).is_err());
    }
}
