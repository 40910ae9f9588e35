//! Known cell renderers.

use crate::query::ComparatorKind;

/// How a column's cells are rendered.
///
/// Renderers are named in column definitions; only the names listed in
/// [`CellRendererKind::from_name`] are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRendererKind {
    /// Plain value in a span (`CustomCellRenderer`).
    Value,
    /// An "Add" button followed by the value (`Push`).
    PushButton,
    /// Value that flashes when it changes (`agAnimateShowChangeCellRenderer`).
    AnimateShowChange,
    /// Boolean checkbox (`agCheckboxCellRenderer`).
    Checkbox,
}

impl CellRendererKind {
    /// Resolves a renderer name from a column definition.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CustomCellRenderer" => Some(Self::Value),
            "Push" => Some(Self::PushButton),
            "agAnimateShowChangeCellRenderer" => Some(Self::AnimateShowChange),
            "agCheckboxCellRenderer" => Some(Self::Checkbox),
            _ => None,
        }
    }

    /// Returns the name this renderer is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "CustomCellRenderer",
            Self::PushButton => "Push",
            Self::AnimateShowChange => "agAnimateShowChangeCellRenderer",
            Self::Checkbox => "agCheckboxCellRenderer",
        }
    }
}

impl ComparatorKind {
    /// Resolves a comparator name from a column definition.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "defaultComparator" => Some(Self::Default),
            "dateComparator" => Some(Self::Date),
            "numberComparator" => Some(Self::Number),
            "textComparator" => Some(Self::Text),
            _ => None,
        }
    }

    /// Returns the name this comparator is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "defaultComparator",
            Self::Date => "dateComparator",
            Self::Number => "numberComparator",
            Self::Text => "textComparator",
        }
    }
}
