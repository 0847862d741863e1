//! Registry mapping value types to the editor that can edit them

use shredder_types::TypeTag;

/// Kind of editor widget used for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    /// On/off switch
    Toggle,
    /// Spin button; `floating_point` selects fractional stepping
    Numeric { floating_point: bool },
    /// Single-select popover picker over an enumeration
    Choice,
    /// Min/max size range picker
    SizeRange,
}

impl EditorKind {
    /// Editor for a type tag, or `None` if the type cannot be edited
    pub fn for_tag(tag: &TypeTag) -> Option<Self> {
        match tag {
            TypeTag::Boolean => Some(EditorKind::Toggle),
            TypeTag::Integer => Some(EditorKind::Numeric {
                floating_point: false,
            }),
            TypeTag::Double => Some(EditorKind::Numeric {
                floating_point: true,
            }),
            TypeTag::String => Some(EditorKind::Choice),
            TypeTag::IntPair | TypeTag::UintPair => Some(EditorKind::SizeRange),
            TypeTag::Unsupported(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_tags() {
        let cases = [
            ("b", EditorKind::Toggle),
            ("i", EditorKind::Numeric { floating_point: false }),
            ("d", EditorKind::Numeric { floating_point: true }),
            ("s", EditorKind::Choice),
            ("(ii)", EditorKind::SizeRange),
            ("(tt)", EditorKind::SizeRange),
        ];
        for (type_string, kind) in cases {
            assert_eq!(EditorKind::for_tag(&TypeTag::parse(type_string)), Some(kind));
        }
    }

    #[test]
    fn test_unsupported_tags() {
        for type_string in ["as", "a{sv}", "(dd)", "x", ""] {
            assert_eq!(EditorKind::for_tag(&TypeTag::parse(type_string)), None);
        }
    }
}
