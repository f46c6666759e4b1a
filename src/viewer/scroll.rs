//! Scroll-related operations for `GridView`.
//!
//! Scroll requests move the anchor of one axis; geometry is recomputed lazily
//! on the next render tick or lookup.

use super::GridView;
use crate::error::Result;
use crate::layout::{ScrollAnchor, ScrollRequest, ScrollerState};
use crate::types::Axis;

impl GridView {
    /// Apply a scroll request to one axis. Returns `true` if the view moved.
    ///
    /// # Errors
    /// Returns an assertion error if the scroll dimension could not be
    /// computed.
    pub fn scroll(&mut self, axis: Axis, request: ScrollRequest) -> Result<bool> {
        let (layout, ctx) = self.layout_parts();
        let result = layout.scroll(axis, &ctx, request);
        self.flush();
        result
    }

    /// Scroll so that active column `index` is at the anchored edge.
    ///
    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn scroll_columns_to(&mut self, index: usize, offset: i32) -> Result<bool> {
        self.scroll(Axis::Horizontal, ScrollRequest::To { index, offset })
    }

    /// Scroll so that main row `index` is at the top.
    ///
    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn scroll_rows_to(&mut self, index: usize, offset: i32) -> Result<bool> {
        self.scroll(Axis::Vertical, ScrollRequest::To { index, offset })
    }

    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn scroll_by_pixels(&mut self, axis: Axis, delta: i64) -> Result<bool> {
        self.scroll(axis, ScrollRequest::ByPixels(delta))
    }

    /// Step scroll by whole items.
    ///
    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn scroll_by_items(&mut self, axis: Axis, count: isize) -> Result<bool> {
        self.scroll(axis, ScrollRequest::ByItems(count))
    }

    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn page(&mut self, axis: Axis, forward: bool) -> Result<bool> {
        self.scroll(axis, ScrollRequest::Page { forward })
    }

    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn ensure_column_fully_visible(&mut self, active_index: usize) -> Result<bool> {
        self.scroll(Axis::Horizontal, ScrollRequest::EnsureFullyVisible(active_index))
    }

    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn ensure_row_fully_visible(&mut self, row_index: usize) -> Result<bool> {
        self.scroll(Axis::Vertical, ScrollRequest::EnsureFullyVisible(row_index))
    }

    /// Move to a position reported by a host scroller.
    ///
    /// # Errors
    /// See [`scroll`](Self::scroll).
    pub fn set_scroller_position(&mut self, axis: Axis, position: i64) -> Result<bool> {
        self.scroll(axis, ScrollRequest::ScrollerPosition(position))
    }

    /// Current anchor of an axis, `None` if nothing can scroll.
    pub fn scroll_anchor(&self, axis: Axis) -> Option<ScrollAnchor> {
        self.layout.dimension(axis).anchor()
    }

    /// Scroller summary as of the last dimension compute.
    pub fn scroller_state(&self, axis: Axis) -> ScrollerState {
        self.layout.dimension(axis).scroller_state()
    }
}
