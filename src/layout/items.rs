//! Per-computation geometry records.

use serde::Serialize;

use crate::types::SubgridRole;

/// One visible column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLayoutColumn {
    /// Position within the visible column list.
    pub index: usize,
    pub active_column_index: usize,
    pub field_index: usize,
    pub left: i32,
    /// Drawn width. A partially scrolled or clipped column is narrower than
    /// the column's own width.
    pub width: i32,
    /// Exclusive right edge.
    pub right_plus_1: i32,
    pub fixed: bool,
}

impl ViewLayoutColumn {
    pub fn contains_x(&self, x: i32) -> bool {
        x >= self.left && x < self.right_plus_1
    }
}

/// One visible row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLayoutRow {
    /// Position within the visible row list.
    pub index: usize,
    /// Position of the owning subgrid in the grid's subgrid list.
    pub subgrid_index: usize,
    pub subgrid_role: SubgridRole,
    pub subgrid_row_index: usize,
    pub top: i32,
    pub height: i32,
    /// Exclusive bottom edge.
    pub bottom_plus_1: i32,
    pub fixed: bool,
}

impl ViewLayoutRow {
    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.top && y < self.bottom_plus_1
    }

    pub fn is_main(&self) -> bool {
        self.subgrid_role.is_main()
    }
}

/// Separator between the fixed and scrollable regions of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLayoutGap {
    pub start: i32,
    /// Exclusive end.
    pub end_plus_1: i32,
}

impl ViewLayoutGap {
    pub fn size(&self) -> i32 {
        self.end_plus_1 - self.start
    }
}

/// Which column view widths changed in the latest horizontal compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsViewWidthsChange {
    pub fixed_changed: bool,
    pub scrollable_changed: bool,
    pub visible_changed: bool,
}

impl ColumnsViewWidthsChange {
    pub fn any(&self) -> bool {
        self.fixed_changed || self.scrollable_changed || self.visible_changed
    }
}

/// Pixel widths of the column regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsViewWidths {
    pub fixed: i32,
    pub scrollable: i32,
    pub visible: i32,
}

impl ColumnsViewWidths {
    pub fn diff(&self, previous: &Self) -> ColumnsViewWidthsChange {
        ColumnsViewWidthsChange {
            fixed_changed: self.fixed != previous.fixed,
            scrollable_changed: self.scrollable != previous.scrollable,
            visible_changed: self.visible != previous.visible,
        }
    }
}
