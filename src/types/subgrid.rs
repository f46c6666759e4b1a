//! Row providers.
//!
//! A grid stacks several subgrids vertically (header, filter, main, summary,
//! footer). Only the main subgrid scrolls.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Serialize;

/// Role of a subgrid within the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubgridRole {
    Header,
    Filter,
    #[default]
    Main,
    Summary,
    Footer,
}

impl SubgridRole {
    /// Whether this is the scrollable main subgrid.
    pub fn is_main(self) -> bool {
        self == Self::Main
    }
}

/// Supplier of rows for one subgrid.
pub trait Subgrid {
    /// Role of this subgrid.
    fn role(&self) -> SubgridRole;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Height of a row in pixels.
    fn row_height(&self, row_index: usize) -> i32;

    /// Whether a row is pinned (never scrolls).
    ///
    /// Rows of non-main subgrids are always pinned; in the main subgrid the
    /// first `fixed_row_count` rows are.
    fn is_row_fixed(&self, row_index: usize, fixed_row_count: usize) -> bool {
        !self.role().is_main() || row_index < fixed_row_count
    }
}

/// In-memory subgrid with a default row height and per-row overrides.
///
/// Uses interior mutability so the data owner can change the row set while
/// the grid holds a shared handle, then notify the grid.
#[derive(Debug)]
pub struct StaticSubgrid {
    role: SubgridRole,
    row_count: Cell<usize>,
    default_row_height: Cell<i32>,
    row_heights: RefCell<HashMap<usize, i32>>,
}

impl StaticSubgrid {
    pub fn new(role: SubgridRole, row_count: usize, default_row_height: i32) -> Self {
        Self {
            role,
            row_count: Cell::new(row_count),
            default_row_height: Cell::new(default_row_height),
            row_heights: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_row_count(&self, row_count: usize) {
        self.row_count.set(row_count);
        self.row_heights
            .borrow_mut()
            .retain(|&row_index, _| row_index < row_count);
    }

    pub fn set_default_row_height(&self, height: i32) {
        self.default_row_height.set(height);
    }

    /// Override the height of a single row.
    pub fn set_row_height(&self, row_index: usize, height: i32) {
        self.row_heights.borrow_mut().insert(row_index, height);
    }

    /// Insert rows, shifting height overrides of later rows.
    pub fn insert_rows(&self, index: usize, count: usize) {
        self.row_count.set(self.row_count.get() + count);
        let mut heights = self.row_heights.borrow_mut();
        let shifted: HashMap<usize, i32> = heights
            .drain()
            .map(|(row_index, height)| {
                if row_index >= index {
                    (row_index + count, height)
                } else {
                    (row_index, height)
                }
            })
            .collect();
        *heights = shifted;
    }

    /// Delete rows, shifting height overrides of later rows.
    pub fn delete_rows(&self, index: usize, count: usize) {
        let row_count = self.row_count.get();
        let count = count.min(row_count.saturating_sub(index));
        self.row_count.set(row_count - count);
        let mut heights = self.row_heights.borrow_mut();
        let shifted: HashMap<usize, i32> = heights
            .drain()
            .filter(|&(row_index, _)| row_index < index || row_index >= index + count)
            .map(|(row_index, height)| {
                if row_index >= index + count {
                    (row_index - count, height)
                } else {
                    (row_index, height)
                }
            })
            .collect();
        *heights = shifted;
    }
}

impl Subgrid for StaticSubgrid {
    fn role(&self) -> SubgridRole {
        self.role
    }

    fn row_count(&self) -> usize {
        self.row_count.get()
    }

    fn row_height(&self, row_index: usize) -> i32 {
        self.row_heights
            .borrow()
            .get(&row_index)
            .copied()
            .unwrap_or_else(|| self.default_row_height.get())
    }
}
