//! Column state snapshots and the headless column model they apply to.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value as Json;

use crate::query::Direction;

/// Which side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    /// Pinned to the left edge.
    Left,
    /// Pinned to the right edge.
    Right,
}

/// Serializable layout of one column.
///
/// `None` fields are left untouched when the state is applied. Fields this
/// model does not interpret (`rowGroup`, `aggFunc`, `pivot`, ...) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnState {
    /// Column id.
    pub col_id: String,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Whether the column is hidden.
    pub hide: Option<bool>,
    /// Pinned side.
    pub pinned: Option<Pinned>,
    /// Sort direction.
    pub sort: Option<Direction>,
    /// Position of this column in a multi-column sort.
    pub sort_index: Option<u32>,
    /// Flex factor.
    pub flex: Option<u32>,
    /// Grid fields passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

impl ColumnState {
    /// Creates a state that only names the column.
    pub fn new(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            ..Self::default()
        }
    }

    /// Sets the width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets whether the column is hidden.
    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = Some(hide);
        self
    }

    /// Sets the pinned side.
    pub fn with_pinned(mut self, pinned: Pinned) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Sets the sort direction and index.
    pub fn with_sort(mut self, sort: Direction, sort_index: u32) -> Self {
        self.sort = Some(sort);
        self.sort_index = Some(sort_index);
        self
    }
}

/// A layout change that should be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A column was moved.
    Moved,
    /// A column was resized.
    Resized,
    /// A column was shown or hidden.
    Visible,
}

/// Options for [`ColumnModel::apply_column_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyColumnStateOptions {
    /// Reorder columns to follow the order of the applied state.
    pub apply_order: bool,
    /// Apply stored widths.
    pub apply_widths: bool,
    /// Clear sort on every column instead of applying stored sort.
    pub clear_sort: bool,
}

impl Default for ApplyColumnStateOptions {
    /// Restores order and widths, and leaves sort unchanged.
    fn default() -> Self {
        Self {
            apply_order: true,
            apply_widths: true,
            clear_sort: false,
        }
    }
}

impl ApplyColumnStateOptions {
    /// Options used when restoring a saved layout: order and widths are
    /// applied and sort is cleared.
    pub fn restore() -> Self {
        Self {
            clear_sort: true,
            ..Self::default()
        }
    }
}

/// The current column layout of a grid.
///
/// Columns marked with `lock_position` always stay at the front, in their
/// original relative order.
///
/// # Example
///
/// ```
/// use gridsource_lib::layout::{ColumnModel, ColumnState, LayoutEvent};
///
/// let mut model = ColumnModel::new(vec![
///     ColumnState::new("athlete").with_width(200),
///     ColumnState::new("age").with_width(220),
/// ]);
///
/// assert_eq!(model.resize_column("age", 100), Some(LayoutEvent::Resized));
/// assert_eq!(model.column_state()[1].width, Some(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnModel {
    columns: Vec<ColumnState>,
    locked: HashSet<String>,
}

impl ColumnModel {
    /// Creates a model from the initial column layout.
    pub fn new(columns: Vec<ColumnState>) -> Self {
        Self {
            columns,
            locked: HashSet::new(),
        }
    }

    /// Locks a column to the front of the layout.
    pub fn lock_position(mut self, col_id: impl Into<String>) -> Self {
        self.locked.insert(col_id.into());
        self.keep_locked_first();
        self
    }

    /// Returns a snapshot of the current layout.
    pub fn column_state(&self) -> Vec<ColumnState> {
        self.columns.clone()
    }

    /// Returns the column ids in display order.
    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.col_id.as_str()).collect()
    }

    /// Returns the state of one column.
    pub fn column(&self, col_id: &str) -> Option<&ColumnState> {
        self.columns.iter().find(|c| c.col_id == col_id)
    }

    fn column_mut(&mut self, col_id: &str) -> Option<&mut ColumnState> {
        self.columns.iter_mut().find(|c| c.col_id == col_id)
    }

    /// Applies a saved layout.
    ///
    /// States naming unknown columns are ignored. Returns `true` if every
    /// state matched a column.
    pub fn apply_column_state(&mut self, states: &[ColumnState], options: ApplyColumnStateOptions) -> bool {
        let mut all_matched = true;

        for state in states {
            let Some(column) = self.column_mut(&state.col_id) else {
                all_matched = false;
                continue;
            };

            if options.apply_widths {
                column.width = state.width.or(column.width);
                column.flex = state.flex.or(column.flex);
            }
            column.hide = state.hide.or(column.hide);
            column.pinned = state.pinned.or(column.pinned);
            for (key, value) in &state.extra {
                column.extra.insert(key.clone(), value.clone());
            }
            if !options.clear_sort {
                column.sort = state.sort;
                column.sort_index = state.sort_index;
            }
        }

        if options.clear_sort {
            for column in &mut self.columns {
                column.sort = None;
                column.sort_index = None;
            }
        }

        if options.apply_order {
            let position = |col_id: &str| states.iter().position(|s| s.col_id == col_id);
            // Stable sort: columns missing from the state keep their order, after the others.
            self.columns
                .sort_by_key(|c| position(&c.col_id).unwrap_or(usize::MAX));
            self.keep_locked_first();
        }

        all_matched
    }

    /// Moves a column to a new display index.
    ///
    /// Locked columns cannot be moved, and other columns cannot be moved in
    /// front of them.
    pub fn move_column(&mut self, col_id: &str, to_index: usize) -> Option<LayoutEvent> {
        if self.locked.contains(col_id) {
            return None;
        }
        let from = self.columns.iter().position(|c| c.col_id == col_id)?;
        let first_free = self.columns.iter().filter(|c| self.locked.contains(&c.col_id)).count();
        let column = self.columns.remove(from);
        let to = to_index.clamp(first_free, self.columns.len());
        self.columns.insert(to, column);
        Some(LayoutEvent::Moved)
    }

    /// Sets a column's width.
    pub fn resize_column(&mut self, col_id: &str, width: u32) -> Option<LayoutEvent> {
        let column = self.column_mut(col_id)?;
        column.width = Some(width);
        column.flex = None;
        Some(LayoutEvent::Resized)
    }

    /// Shows or hides a column.
    pub fn set_column_visible(&mut self, col_id: &str, visible: bool) -> Option<LayoutEvent> {
        let column = self.column_mut(col_id)?;
        column.hide = Some(!visible);
        Some(LayoutEvent::Visible)
    }

    /// Sets the sort of a column. Sorting does not produce a layout event.
    pub fn set_column_sort(&mut self, col_id: &str, sort: Option<Direction>, sort_index: Option<u32>) -> bool {
        match self.column_mut(col_id) {
            Some(column) => {
                column.sort = sort;
                column.sort_index = sort_index;
                true
            }
            None => false,
        }
    }

    fn keep_locked_first(&mut self) {
        let locked = &self.locked;
        self.columns.sort_by_key(|c| !locked.contains(&c.col_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ColumnModel {
        ColumnModel::new(vec![
            ColumnState::new("checkbox").with_width(50).with_pinned(Pinned::Left),
            ColumnState::new("athlete").with_width(200),
            ColumnState::new("age").with_width(220),
            ColumnState::new("country").with_width(220),
            ColumnState::new("year").with_width(180),
        ])
        .lock_position("checkbox")
    }

    #[test]
    fn test_move_column() {
        let mut model = model();
        assert_eq!(model.move_column("year", 1), Some(LayoutEvent::Moved));
        assert_eq!(model.column_ids(), ["checkbox", "year", "athlete", "age", "country"]);
    }

    #[test]
    fn test_locked_column_stays_first() {
        let mut model = model();
        assert_eq!(model.move_column("checkbox", 3), None);
        model.move_column("age", 0);
        assert_eq!(model.column_ids()[0], "checkbox");
        assert_eq!(model.column_ids()[1], "age");
    }

    #[test]
    fn test_unknown_column_produces_no_event() {
        let mut model = model();
        assert_eq!(model.resize_column("silver", 10), None);
        assert_eq!(model.set_column_visible("silver", false), None);
    }

    #[test]
    fn test_apply_order_and_widths() {
        let mut model = model();
        let saved = vec![
            ColumnState::new("country").with_width(300),
            ColumnState::new("athlete").with_hide(true),
        ];

        assert!(model.apply_column_state(&saved, ApplyColumnStateOptions::default()));
        assert_eq!(model.column_ids(), ["checkbox", "country", "athlete", "age", "year"]);
        assert_eq!(model.column("country").unwrap().width, Some(300));
        assert_eq!(model.column("athlete").unwrap().hide, Some(true));
        assert_eq!(model.column("athlete").unwrap().width, Some(200));
    }

    #[test]
    fn test_clear_sort_drops_every_sort() {
        let mut model = model();
        model.set_column_sort("age", Some(Direction::Desc), Some(0));
        let saved = vec![ColumnState::new("athlete").with_sort(Direction::Asc, 0)];

        model.apply_column_state(&saved, ApplyColumnStateOptions::restore());
        assert!(model.column_state().iter().all(|c| c.sort.is_none() && c.sort_index.is_none()));
    }

    #[test]
    fn test_unmatched_state_is_reported() {
        let mut model = model();
        let saved = vec![ColumnState::new("bronze").with_width(10)];
        assert!(!model.apply_column_state(&saved, ApplyColumnStateOptions::default()));
        assert_eq!(model, self::model());
    }

    #[test]
    fn test_deserialize_grid_state() {
        let json = r#"[{"colId":"age","width":220,"hide":false,"pinned":null,"sort":"asc","sortIndex":0,"aggFunc":null}]"#;
        let mut states: Vec<ColumnState> = serde_json::from_str(json).unwrap();
        assert_eq!(states[0].extra.remove("aggFunc"), Some(Json::Null));
        assert_eq!(states[0], ColumnState::new("age").with_width(220).with_hide(false).with_sort(Direction::Asc, 0));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{"colId":"gold","width":120,"rowGroup":true,"rowGroupIndex":0,"aggFunc":"sum","pivot":false}"#;
        let state: ColumnState = serde_json::from_str(json).unwrap();
        assert_eq!(state.extra.get("aggFunc"), Some(&Json::from("sum")));

        let written: Json = serde_json::to_value(&state).unwrap();
        assert_eq!(written["rowGroup"], Json::Bool(true));
        assert_eq!(written["rowGroupIndex"], Json::from(0));
        assert_eq!(written["pivot"], Json::Bool(false));
        assert_eq!(written["width"], Json::from(120));
    }

    #[test]
    fn test_apply_carries_unknown_fields() {
        let mut model = model();
        let saved: Vec<ColumnState> = serde_json::from_str(r#"[{"colId":"age","aggFunc":"avg"}]"#).unwrap();

        model.apply_column_state(&saved, ApplyColumnStateOptions::restore());
        assert_eq!(model.column("age").unwrap().extra.get("aggFunc"), Some(&Json::from("avg")));
    }
}
