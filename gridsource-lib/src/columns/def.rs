//! Column and column group definitions.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Deserialize;

use super::CellRendererKind;
use crate::error::ColumnDefError;
use crate::error::LoadError;
use crate::layout::ColumnModel;
use crate::layout::ColumnState;
use crate::layout::Pinned;
use crate::query::ComparatorKind;

/// A resolved column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column id; the `colId` if given, otherwise the field.
    pub col_id: String,
    /// Row field the column displays.
    pub field: String,
    /// Header text.
    pub header_name: Option<String>,
    /// Initial width in pixels.
    pub width: Option<u32>,
    /// Pinned side.
    pub pinned: Option<Pinned>,
    /// Keeps the column at the front of the layout.
    pub lock_position: bool,
    /// Whether the column can be sorted.
    pub sortable: bool,
    /// Whether the column can be filtered.
    pub filter: bool,
    /// Whether the column starts hidden.
    pub hide: bool,
    /// Renderer for the column's cells.
    pub cell_renderer: Option<CellRendererKind>,
    /// Parameters passed to the renderer.
    pub cell_renderer_params: Option<serde_json::Value>,
    /// Comparator used when sorting the column.
    pub comparator: Option<ComparatorKind>,
}

/// A group of columns under a shared header.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroupDef {
    /// Group header text.
    pub header_name: String,
    /// Group id.
    pub group_id: Option<String>,
    /// Keeps the group's columns together when moving.
    pub marry_children: bool,
    /// Columns in the group.
    pub children: Vec<ColumnDef>,
}

/// The full set of column definitions for a grid.
///
/// # Example
///
/// ```
/// use gridsource_lib::columns::ColumnDefs;
/// use gridsource_lib::query::ComparatorKind;
///
/// let defs = ColumnDefs::from_json_str(r#"[
///     {"headerName": "Athlete", "children": [{"field": "athlete", "width": 200}]},
///     {"headerName": "Event", "children": [{"field": "date", "comparator": "dateComparator"}]}
/// ]"#).unwrap();
///
/// assert_eq!(defs.columns().count(), 2);
/// assert_eq!(defs.comparators()["date"], ComparatorKind::Date);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDefs {
    groups: Vec<ColumnGroupDef>,
}

impl ColumnDefs {
    /// Creates definitions from already resolved groups.
    pub fn new(groups: Vec<ColumnGroupDef>) -> Result<Self, ColumnDefError> {
        let defs = Self { groups };
        defs.check_unique_ids()?;
        Ok(defs)
    }

    /// Parses and resolves definitions from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ColumnDefError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(LoadError::from)?;
        Self::from_json(value)
    }

    /// Resolves definitions from a JSON array.
    ///
    /// Entries are column groups; a bare column entry is wrapped in a group
    /// with an empty header. Unknown renderer or comparator names are
    /// errors.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ColumnDefError> {
        let entries: Vec<RawEntry> = serde_json::from_value(value).map_err(LoadError::from)?;
        let groups = entries
            .into_iter()
            .map(RawEntry::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(groups)
    }

    /// Returns the column groups.
    pub fn groups(&self) -> &[ColumnGroupDef] {
        &self.groups
    }

    /// Returns every column in display order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.groups.iter().flat_map(|group| group.children.iter())
    }

    /// Returns the column with the given id.
    pub fn column(&self, col_id: &str) -> Option<&ColumnDef> {
        self.columns().find(|c| c.col_id == col_id)
    }

    /// Returns the comparator configured per sortable column.
    pub fn comparators(&self) -> HashMap<String, ComparatorKind> {
        self.columns()
            .filter_map(|c| c.comparator.map(|kind| (c.col_id.clone(), kind)))
            .collect()
    }

    /// Builds the initial column layout from the definitions.
    pub fn column_model(&self) -> ColumnModel {
        let states = self
            .columns()
            .map(|c| ColumnState {
                col_id: c.col_id.clone(),
                width: c.width,
                hide: Some(c.hide),
                pinned: c.pinned,
                ..ColumnState::default()
            })
            .collect();

        self.columns()
            .filter(|c| c.lock_position)
            .fold(ColumnModel::new(states), |model, c| model.lock_position(c.col_id.clone()))
    }

    fn check_unique_ids(&self) -> Result<(), ColumnDefError> {
        let mut seen = HashSet::new();
        for column in self.columns() {
            if !seen.insert(column.col_id.as_str()) {
                return Err(ColumnDefError::DuplicateColumn(column.col_id.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// JSON shapes
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Group(RawGroup),
    Column(RawColumn),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGroup {
    #[serde(default)]
    header_name: String,
    group_id: Option<String>,
    #[serde(default)]
    marry_children: bool,
    children: Vec<RawColumn>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumn {
    field: String,
    col_id: Option<String>,
    header_name: Option<String>,
    width: Option<u32>,
    pinned: Option<Pinned>,
    #[serde(default)]
    lock_position: bool,
    sortable: Option<bool>,
    filter: Option<serde_json::Value>,
    #[serde(default)]
    hide: bool,
    cell_renderer: Option<String>,
    cell_renderer_params: Option<serde_json::Value>,
    comparator: Option<String>,
}

impl RawEntry {
    fn resolve(self) -> Result<ColumnGroupDef, ColumnDefError> {
        match self {
            RawEntry::Group(group) => Ok(ColumnGroupDef {
                header_name: group.header_name,
                group_id: group.group_id,
                marry_children: group.marry_children,
                children: group
                    .children
                    .into_iter()
                    .map(RawColumn::resolve)
                    .collect::<Result<_, _>>()?,
            }),
            RawEntry::Column(column) => Ok(ColumnGroupDef {
                header_name: String::new(),
                group_id: None,
                marry_children: false,
                children: vec![column.resolve()?],
            }),
        }
    }
}

impl RawColumn {
    fn resolve(self) -> Result<ColumnDef, ColumnDefError> {
        let col_id = self.col_id.unwrap_or_else(|| self.field.clone());

        let cell_renderer = self
            .cell_renderer
            .map(|name| {
                CellRendererKind::from_name(&name).ok_or_else(|| ColumnDefError::UnknownRenderer {
                    column: col_id.clone(),
                    name,
                })
            })
            .transpose()?;

        let comparator = self
            .comparator
            .map(|name| {
                ComparatorKind::from_name(&name).ok_or_else(|| ColumnDefError::UnknownComparator {
                    column: col_id.clone(),
                    name,
                })
            })
            .transpose()?;

        // `filter` is either a flag or the name of a filter component.
        let filter = match self.filter {
            None | Some(serde_json::Value::Bool(true)) => true,
            Some(serde_json::Value::Bool(false)) | Some(serde_json::Value::Null) => false,
            Some(_) => true,
        };

        Ok(ColumnDef {
            col_id,
            field: self.field,
            header_name: self.header_name,
            width: self.width,
            pinned: self.pinned,
            lock_position: self.lock_position,
            sortable: self.sortable.unwrap_or(true),
            filter,
            hide: self.hide,
            cell_renderer,
            cell_renderer_params: self.cell_renderer_params,
            comparator,
        })
    }
}
