//! Reusable per-cell descriptors.
//!
//! The pool grows to the largest visible grid seen and never shrinks; slots
//! past the current cell count are kept for reuse and ignored.

use serde::Serialize;

use super::{ViewLayoutColumn, ViewLayoutRow};
use crate::settings::ColumnSettings;
use crate::types::Rectangle;

/// Traversal order of a cell pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CellPoolOrder {
    /// All cells of row 0, then row 1, ...
    RowColumn,
    /// All cells of column 0, then column 1, ...
    ColumnRow,
}

/// One visible cell, re-bound every time the pool is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCell {
    pub view_column: ViewLayoutColumn,
    pub view_row: ViewLayoutRow,
    pub bounds: Rectangle,
    pub column_settings: ColumnSettings,
    /// Set by a painter to recognise a cell it already painted. Cleared when
    /// the cell is re-bound to a different column, row or bounds.
    pub paint_fingerprint: Option<u64>,
}

impl ViewCell {
    pub fn new(view_column: ViewLayoutColumn, view_row: ViewLayoutRow, column_settings: ColumnSettings) -> Self {
        Self {
            view_column,
            view_row,
            bounds: bounds(&view_column, &view_row),
            column_settings,
            paint_fingerprint: None,
        }
    }

    /// Re-bind to a column and row.
    pub fn reset(&mut self, view_column: ViewLayoutColumn, view_row: ViewLayoutRow, column_settings: ColumnSettings) {
        let bounds = bounds(&view_column, &view_row);
        let same_cell = self.view_column.active_column_index == view_column.active_column_index
            && self.view_column.field_index == view_column.field_index
            && self.view_row.subgrid_index == view_row.subgrid_index
            && self.view_row.subgrid_row_index == view_row.subgrid_row_index
            && self.bounds == bounds
            && self.column_settings == column_settings;
        if !same_cell {
            self.paint_fingerprint = None;
        }
        self.view_column = view_column;
        self.view_row = view_row;
        self.bounds = bounds;
        self.column_settings = column_settings;
    }

    pub fn is_fixed(&self) -> bool {
        self.view_column.fixed || self.view_row.fixed
    }
}

fn bounds(column: &ViewLayoutColumn, row: &ViewLayoutRow) -> Rectangle {
    Rectangle::new(column.left, row.top, column.width, row.height)
}

#[derive(Debug)]
pub(crate) struct CellPool {
    order: CellPoolOrder,
    cells: Vec<ViewCell>,
    count: usize,
    computed_for: Option<u64>,
}

impl CellPool {
    pub(crate) fn new(order: CellPoolOrder) -> Self {
        Self {
            order,
            cells: Vec::new(),
            count: 0,
            computed_for: None,
        }
    }

    pub(crate) fn is_current(&self, computation_id: u64) -> bool {
        self.computed_for == Some(computation_id)
    }

    pub(crate) fn cells(&self) -> &[ViewCell] {
        self.cells.get(..self.count).unwrap_or(&[])
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [ViewCell] {
        let count = self.count;
        self.cells.get_mut(..count).unwrap_or(&mut [])
    }

    pub(crate) fn cell(&self, column_index: usize, row_index: usize, column_count: usize, row_count: usize) -> Option<&ViewCell> {
        if column_index >= column_count || row_index >= row_count {
            return None;
        }
        let slot = match self.order {
            CellPoolOrder::RowColumn => row_index * column_count + column_index,
            CellPoolOrder::ColumnRow => column_index * row_count + row_index,
        };
        self.cells().get(slot)
    }

    /// Bind one cell per (column, row) pair in this pool's order.
    pub(crate) fn rebuild(
        &mut self,
        columns: &[ViewLayoutColumn],
        rows: &[ViewLayoutRow],
        column_settings: &dyn Fn(&ViewLayoutColumn) -> ColumnSettings,
        computation_id: u64,
    ) {
        let count = columns.len() * rows.len();
        let cells = &mut self.cells;
        let mut slot = 0;
        let mut bind = |column: &ViewLayoutColumn, row: &ViewLayoutRow| {
            let settings = column_settings(column);
            match cells.get_mut(slot) {
                Some(cell) => cell.reset(*column, *row, settings),
                None => cells.push(ViewCell::new(*column, *row, settings)),
            }
            slot += 1;
        };
        match self.order {
            CellPoolOrder::RowColumn => {
                for row in rows {
                    for column in columns {
                        bind(column, row);
                    }
                }
            }
            CellPoolOrder::ColumnRow => {
                for column in columns {
                    for row in rows {
                        bind(column, row);
                    }
                }
            }
        }
        self.count = count;
        self.computed_for = Some(computation_id);
        tracing::trace!(order = ?self.order, cells = count, computation_id, "cell pool rebuilt");
    }
}
