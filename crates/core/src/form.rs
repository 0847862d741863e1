//! Form builder: turns a settings schema into sections of editor rows
//!
//! Construction happens in two phases. First every key is visited in schema
//! order and an entry is collected for each editable, visible key. Then the
//! entries are grouped into sections, which are sorted by name, and the rows
//! inside each section are sorted by `(order, key)`.
//!
//! Everything here is generic over the widget type so the layout rules can
//! be exercised without a display.

use shredder_types::{parse_summary, section_for_key, KeySchema, ParsedSummary, SettingsSchema};
use std::collections::BTreeMap;

use crate::registry::EditorKind;

/// One editable key, ready to be placed in a row
#[derive(Debug, Clone)]
pub struct FormEntry<W> {
    pub order: u32,
    /// Lower-cased section name, empty for keys without a prefix
    pub section: String,
    pub key: String,
    pub widget: W,
    /// Summary with ordering prefix removed
    pub summary: String,
    /// Description as plain text, escaped by whoever renders it as markup
    pub description: Option<String>,
}

/// A titled group of rows
#[derive(Debug, Clone)]
pub struct FormSection<W> {
    pub name: String,
    pub entries: Vec<FormEntry<W>>,
}

/// Collect an entry for every key that can be edited and is not hidden
///
/// `build` is called with the editor kind, the key schema, the display
/// summary and the description, and returns the editor widget.
pub fn collect_entries<W, F>(schema: &SettingsSchema, mut build: F) -> Vec<FormEntry<W>>
where
    F: FnMut(EditorKind, &KeySchema, &str, Option<&str>) -> W,
{
    let mut entries = Vec::new();

    for key in schema.keys() {
        let Some(kind) = EditorKind::for_tag(&key.type_tag) else {
            log::debug!(
                "Skipping key '{}' of unsupported type '{}'",
                key.name,
                key.type_tag.type_string()
            );
            continue;
        };

        let (order, summary) = match parse_summary(&key.summary) {
            ParsedSummary::Hidden => continue,
            ParsedSummary::Visible { order, text } => (order, text),
        };

        let description = key.description.clone();
        let widget = build(kind, key, &summary, description.as_deref());

        entries.push(FormEntry {
            order,
            section: section_for_key(&key.name).to_lowercase(),
            key: key.name.clone(),
            widget,
            summary,
            description,
        });
    }

    entries
}

/// Group entries into sections sorted by name, rows sorted by `(order, key)`
pub fn layout_sections<W>(mut entries: Vec<FormEntry<W>>) -> Vec<FormSection<W>> {
    entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.key.cmp(&b.key)));

    let mut sections: BTreeMap<String, Vec<FormEntry<W>>> = BTreeMap::new();
    for entry in entries {
        sections.entry(entry.section.clone()).or_default().push(entry);
    }

    sections
        .into_iter()
        .map(|(name, entries)| FormSection { name, entries })
        .collect()
}

/// Collect and lay out in one go
pub fn build_form<W, F>(schema: &SettingsSchema, build: F) -> Vec<FormSection<W>>
where
    F: FnMut(EditorKind, &KeySchema, &str, Option<&str>) -> W,
{
    layout_sections(collect_entries(schema, build))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_schema;

    fn key_names(sections: &[FormSection<EditorKind>]) -> Vec<(String, Vec<String>)> {
        sections
            .iter()
            .map(|s| {
                (
                    s.name.clone(),
                    s.entries.iter().map(|e| e.key.clone()).collect(),
                )
            })
            .collect()
    }

    fn schema_with(keys: &str) -> SettingsSchema {
        SettingsSchema::from_json(&format!(r#"{{"id": "t", "keys": [{}]}}"#, keys)).unwrap()
    }

    #[test]
    fn test_one_row_per_visible_supported_key() {
        let sections = build_form(&test_schema(), |kind, _, _, _| kind);

        assert_eq!(
            key_names(&sections),
            vec![
                (
                    "computation".to_string(),
                    vec![
                        "computation-algorithm".to_string(),
                        "computation-size-range".to_string()
                    ]
                ),
                ("general".to_string(), vec!["general-ratio".to_string()]),
                (
                    "traverse".to_string(),
                    vec![
                        "traverse-max-depth".to_string(),
                        "traverse-hidden".to_string()
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_entry_contents() {
        let entries = collect_entries(&test_schema(), |kind, _, _, _| kind);
        let algo = entries
            .iter()
            .find(|e| e.key == "computation-algorithm")
            .unwrap();
        assert_eq!(algo.widget, EditorKind::Choice);
        assert_eq!(algo.summary, "Checksum algorithm");
        assert_eq!(
            algo.description.as_deref(),
            Some("How file contents are compared")
        );

        let hidden = entries.iter().find(|e| e.key == "traverse-hidden").unwrap();
        assert_eq!(hidden.order, 1);
        assert_eq!(hidden.summary, "Find hidden files");
        assert_eq!(hidden.description, None);
    }

    #[test]
    fn test_hidden_and_unsupported_keys_are_skipped() {
        let schema = schema_with(
            r#"{"name": "a-visible", "type": "b", "default": true, "summary": "Visible"},
               {"name": "a-hidden", "type": "b", "default": true, "summary": "[hidden] Hidden"},
               {"name": "a-hidden-int", "type": "i", "default": 1, "summary": "[hidden]"},
               {"name": "a-list", "type": "as", "default": [], "summary": "List"}"#,
        );
        let mut built = Vec::new();
        let entries = collect_entries(&schema, |kind, key, _, _| {
            built.push(key.name.clone());
            kind
        });

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "a-visible");
        // Widgets are only constructed for rows that are shown
        assert_eq!(built, vec!["a-visible"]);
    }

    #[test]
    fn test_sections_sorted_with_empty_first() {
        let schema = schema_with(
            r#"{"name": "b-one", "type": "b", "default": true, "summary": "x"},
               {"name": "a-one", "type": "b", "default": true, "summary": "x"},
               {"name": "plain", "type": "b", "default": true, "summary": "x"}"#,
        );
        let sections = build_form(&schema, |kind, _, _, _| kind);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["", "a", "b"]);
    }

    #[test]
    fn test_rows_ordered_by_order_then_key() {
        let schema = schema_with(
            r#"{"name": "s-zeta", "type": "b", "default": true, "summary": "[1] z"},
               {"name": "s-beta", "type": "b", "default": true, "summary": "[2] b"},
               {"name": "s-alpha", "type": "b", "default": true, "summary": "[2] a"},
               {"name": "s-omega", "type": "b", "default": true, "summary": "o"}"#,
        );
        let sections = build_form(&schema, |kind, _, _, _| kind);
        assert_eq!(
            key_names(&sections),
            vec![(
                "s".to_string(),
                vec![
                    "s-omega".to_string(),
                    "s-zeta".to_string(),
                    "s-alpha".to_string(),
                    "s-beta".to_string()
                ]
            )]
        );
    }

    #[test]
    fn test_section_names_are_case_insensitive() {
        let schema = schema_with(
            r#"{"name": "Foo-a", "type": "b", "default": true, "summary": "x"},
               {"name": "foo-b", "type": "b", "default": true, "summary": "x"}"#,
        );
        let sections = build_form(&schema, |kind, _, _, _| kind);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "foo");
        assert_eq!(sections[0].entries.len(), 2);
    }
}
