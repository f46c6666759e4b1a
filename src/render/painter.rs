//! Painter trait for pluggable cell rendering.
//!
//! The grid never draws text or decorations itself. It hands every visible
//! cell to a [`CellPainter`] once per render tick and collects the widths the
//! painter would like each column to have.

use crate::layout::ViewCell;

/// Paints one cell at a time.
pub trait CellPainter {
    /// Paint `cell` within `cell.bounds`.
    ///
    /// Returns the width the cell's content would need, if the painter
    /// measured it. Auto-sizing columns widen to the largest reported value.
    fn paint(&mut self, cell: &mut ViewCell) -> Option<i32>;
}

impl<F> CellPainter for F
where
    F: FnMut(&mut ViewCell) -> Option<i32>,
{
    fn paint(&mut self, cell: &mut ViewCell) -> Option<i32> {
        self(cell)
    }
}

/// Largest preferred width per active column index, in first-seen order.
pub(crate) fn collect_preferred_widths(
    cells: &mut [ViewCell],
    painter: &mut dyn CellPainter,
) -> Vec<(usize, i32)> {
    let mut preferred: Vec<(usize, i32)> = Vec::new();
    for cell in cells {
        let Some(width) = painter.paint(cell) else {
            continue;
        };
        let active_index = cell.view_column.active_column_index;
        match preferred.iter_mut().find(|(index, _)| *index == active_index) {
            Some(entry) => entry.1 = entry.1.max(width),
            None => preferred.push((active_index, width)),
        }
    }
    preferred
}
