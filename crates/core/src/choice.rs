//! State of the multiple-choice picker
//!
//! The picker shows the selected option on its button and lists every
//! option in a popover. Rows carry a glyph telling apart "selected" from
//! "default": the default option shows a star, filled while selected and
//! dimmed otherwise; any other selected option shows a checkmark.

use log::warn;
use shredder_types::{capitalize, KeyRange, KeySchema};

/// Glyph shown at the end of an option row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowGlyph {
    None,
    Check,
    Starred,
    /// Default option while another one is selected, drawn dimmed
    NonStarred,
}

impl RowGlyph {
    pub fn for_row(is_default: bool, active: bool) -> Self {
        match (is_default, active) {
            (true, true) => RowGlyph::Starred,
            (true, false) => RowGlyph::NonStarred,
            (false, true) => RowGlyph::Check,
            (false, false) => RowGlyph::None,
        }
    }

    /// Symbolic icon name, `None` when nothing is shown
    pub fn icon_name(self) -> Option<&'static str> {
        match self {
            RowGlyph::None => None,
            RowGlyph::Check => Some("emblem-ok-symbolic"),
            RowGlyph::Starred => Some("starred-symbolic"),
            RowGlyph::NonStarred => Some("non-starred-symbolic"),
        }
    }

    pub fn is_dimmed(self) -> bool {
        self == RowGlyph::NonStarred
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceModel {
    options: Vec<String>,
    default: String,
    selected: String,
}

impl ChoiceModel {
    pub fn new(options: Vec<String>, default: impl Into<String>, selected: impl Into<String>) -> Self {
        Self {
            options,
            default: default.into(),
            selected: selected.into(),
        }
    }

    /// Build the model for an enumeration key
    ///
    /// A key whose range is not an enumeration gets an empty option list.
    pub fn for_key(key: &KeySchema, selected: &str) -> Self {
        let options = match &key.range {
            KeyRange::Enum { values } => values.clone(),
            other => {
                warn!(
                    "Key '{}' is shown as a choice but has a '{}' range, offering no options",
                    key.name,
                    other.kind()
                );
                Vec::new()
            }
        };
        let default = key.default.as_str().unwrap_or_default();
        Self::new(options, default, selected)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn default(&self) -> &str {
        &self.default
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_default(&self, option: &str) -> bool {
        self.default == option
    }

    pub fn glyph(&self, option: &str) -> RowGlyph {
        RowGlyph::for_row(self.is_default(option), self.selected == option)
    }

    /// Select one of the options; returns false for unknown or current options
    pub fn select(&mut self, option: &str) -> bool {
        if self.selected == option || !self.options.iter().any(|o| o == option) {
            return false;
        }
        self.selected = option.to_string();
        true
    }

    /// Follow a value coming from the store, whether or not it is an option
    pub fn sync_selected(&mut self, value: &str) {
        if self.selected != value {
            self.selected = value.to_string();
        }
    }

    /// Text of the button, before markup
    pub fn label_text(&self) -> String {
        capitalize(&self.selected)
    }

    /// Header shown above the options in the popover
    pub fn header_text(summary: &str) -> String {
        format!("{}?", summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shredder_types::{SettingValue, TypeTag};

    fn model() -> ChoiceModel {
        ChoiceModel::new(
            vec!["md5".to_string(), "sha1".to_string(), "paranoid".to_string()],
            "sha1",
            "sha1",
        )
    }

    fn active_rows(model: &ChoiceModel) -> Vec<&str> {
        model
            .options()
            .iter()
            .filter(|o| matches!(model.glyph(o), RowGlyph::Check | RowGlyph::Starred))
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(RowGlyph::for_row(true, true).icon_name(), Some("starred-symbolic"));
        assert_eq!(RowGlyph::for_row(true, false).icon_name(), Some("non-starred-symbolic"));
        assert!(RowGlyph::for_row(true, false).is_dimmed());
        assert_eq!(RowGlyph::for_row(false, true).icon_name(), Some("emblem-ok-symbolic"));
        assert_eq!(RowGlyph::for_row(false, false).icon_name(), None);
    }

    #[test]
    fn test_select_marks_exactly_one_row() {
        let mut model = model();
        assert_eq!(model.glyph("sha1"), RowGlyph::Starred);
        assert_eq!(active_rows(&model), vec!["sha1"]);

        assert!(model.select("paranoid"));
        assert_eq!(active_rows(&model), vec!["paranoid"]);
        assert_eq!(model.glyph("paranoid"), RowGlyph::Check);
        assert_eq!(model.glyph("sha1"), RowGlyph::NonStarred);
        assert_eq!(model.glyph("md5"), RowGlyph::None);
        assert_eq!(model.label_text(), "Paranoid");

        // Back to the default shows the filled star instead of a checkmark
        assert!(model.select("sha1"));
        assert_eq!(model.glyph("sha1"), RowGlyph::Starred);
    }

    #[test]
    fn test_select_rejects_unknown_and_current() {
        let mut model = model();
        assert!(!model.select("crc32"));
        assert!(!model.select("sha1"));
        assert_eq!(model.selected(), "sha1");
    }

    #[test]
    fn test_sync_selected_follows_store() {
        let mut model = model();
        assert!(model.select("md5"));

        model.sync_selected("sha1");
        assert_eq!(model.selected(), "sha1");
        assert_eq!(active_rows(&model), vec!["sha1"]);
        assert_eq!(model.glyph("md5"), RowGlyph::None);

        // A value outside the options still shows on the button
        model.sync_selected("crc32");
        assert_eq!(model.label_text(), "Crc32");
        assert!(active_rows(&model).is_empty());
    }

    #[test]
    fn test_for_key_with_non_enum_range() {
        let key = KeySchema {
            name: "computation-algorithm".to_string(),
            type_tag: TypeTag::String,
            default: SettingValue::String("sha1".to_string()),
            range: KeyRange::Type,
            summary: "Algorithm".to_string(),
            description: None,
        };
        let model = ChoiceModel::for_key(&key, "sha1");
        assert!(model.options().is_empty());
        assert_eq!(model.default(), "sha1");
        assert_eq!(model.label_text(), "Sha1");
    }

    #[test]
    fn test_header_text() {
        assert_eq!(ChoiceModel::header_text("Checksum algorithm"), "Checksum algorithm?");
    }
}
