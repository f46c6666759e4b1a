//! Mapping between a scroll position and the item at the viewport edge.
//!
//! One [`ScrollDimension`] exists per axis. Items `0..fixed_count` are fixed
//! and never scroll; the remaining items form the scrollable content. Content
//! positions are measured from the start of the first scrollable item, with a
//! grid line between consecutive items.
//!
//! A left-aligned (or top-aligned) dimension anchors the viewport's leading
//! edge: anchor `{index, offset}` puts the viewport start `offset` pixels into
//! item `index`. An end-aligned dimension anchors the trailing edge: the
//! viewport ends `offset` pixels before the end of item `index`. In both cases
//! the anchor's content position grows toward the content end, so limits and
//! scrolling deltas are expressed in one coordinate system.

use serde::Serialize;

use crate::error::{GridError, Result};
use crate::types::Axis;

/// Item at the governing viewport edge plus the pixels of it scrolled past
/// that edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollAnchor {
    pub index: usize,
    pub offset: i32,
}

impl ScrollAnchor {
    pub fn new(index: usize, offset: i32) -> Self {
        Self { index, offset }
    }
}

/// How much of the content the viewport shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewportCoverageExtent {
    /// Viewport has no size.
    #[default]
    None,
    /// Content exceeds the viewport.
    Partial,
    /// Viewport shows all content.
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DimensionState {
    #[default]
    Invalid,
    Computing,
    Valid,
}

/// Scroller-facing summary produced by every compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollerState {
    pub axis: Axis,
    pub scroll_size: i64,
    pub viewport_size: i64,
    /// Distance of the current anchor from the start limit.
    pub position: i64,
    pub coverage: ViewportCoverageExtent,
    pub compute_id: u64,
}

/// Inputs for one compute, read from the current settings and item sources.
pub struct AxisSource<'a> {
    pub item_count: usize,
    pub fixed_count: usize,
    pub gridline_width: i32,
    /// Line between the fixed and scrollable regions.
    pub fixed_line_width: i32,
    /// Pixels available for fixed plus scrollable items.
    pub viewport_extent: i32,
    pub smooth: bool,
    /// Anchor the trailing edge instead of the leading one.
    pub end_aligned: bool,
    pub item_size: &'a dyn Fn(usize) -> i32,
}

#[derive(Debug)]
pub struct ScrollDimension {
    axis: Axis,
    state: DimensionState,
    compute_id: u64,
    anchor: Option<ScrollAnchor>,

    fixed_count: usize,
    smooth: bool,
    end_aligned: bool,
    line: i64,
    /// `edges[k]` is the content position of scrollable item `k`;
    /// `edges[k + 1] - line` is its exclusive end.
    edges: Vec<i64>,
    start: i64,
    viewport_size: i64,
    content_size: i64,
    scroll_size: i64,
    start_limit: Option<ScrollAnchor>,
    finish_limit: Option<ScrollAnchor>,
    coverage: ViewportCoverageExtent,
}

impl ScrollDimension {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            state: DimensionState::Invalid,
            compute_id: 0,
            anchor: None,
            fixed_count: 0,
            smooth: true,
            end_aligned: false,
            line: 0,
            edges: vec![0],
            start: 0,
            viewport_size: 0,
            content_size: 0,
            scroll_size: 0,
            start_limit: None,
            finish_limit: None,
            coverage: ViewportCoverageExtent::None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> DimensionState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == DimensionState::Valid
    }

    pub fn invalidate(&mut self) {
        self.state = DimensionState::Invalid;
    }

    /// Incremented on every compute.
    pub fn compute_id(&self) -> u64 {
        self.compute_id
    }

    /// Current anchor; `None` when there is nothing to scroll.
    pub fn anchor(&self) -> Option<ScrollAnchor> {
        self.anchor
    }

    /// Pixel offset of the scrollable region (fixed items plus fixed line).
    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn viewport_size(&self) -> i64 {
        self.viewport_size
    }

    /// Scrollable content size, without non-smooth extension.
    pub fn content_size(&self) -> i64 {
        self.content_size
    }

    /// Scrollable range reported to scrollers.
    pub fn scroll_size(&self) -> i64 {
        self.scroll_size
    }

    pub fn start_limit(&self) -> Option<ScrollAnchor> {
        self.start_limit
    }

    pub fn finish_limit(&self) -> Option<ScrollAnchor> {
        self.finish_limit
    }

    pub fn viewport_coverage_extent(&self) -> ViewportCoverageExtent {
        self.coverage
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    pub fn scrollable_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn is_end_aligned(&self) -> bool {
        self.end_aligned
    }

    /// Recompute sizes, limits and the limited anchor.
    pub fn compute(&mut self, source: &AxisSource<'_>) -> ScrollerState {
        self.state = DimensionState::Computing;

        let fixed_count = source.fixed_count.min(source.item_count);
        let line = i64::from(source.gridline_width.max(0));
        let size_of = |index: usize| i64::from((source.item_size)(index).max(0));

        let start = if fixed_count > 0 {
            let fixed_sizes: i64 = (0..fixed_count).map(size_of).sum();
            #[allow(clippy::cast_possible_wrap)]
            let fixed_lines = (fixed_count as i64 - 1) * line;
            fixed_sizes + fixed_lines + i64::from(source.fixed_line_width.max(0))
        } else {
            0
        };

        let mut edges = Vec::with_capacity(source.item_count - fixed_count + 1);
        let mut edge = 0;
        edges.push(edge);
        for index in fixed_count..source.item_count {
            edge += size_of(index) + line;
            edges.push(edge);
        }

        self.fixed_count = fixed_count;
        self.smooth = source.smooth;
        self.end_aligned = source.end_aligned;
        self.line = line;
        self.edges = edges;
        self.start = start;
        self.viewport_size = (i64::from(source.viewport_extent) - start).max(0);
        self.content_size = if self.scrollable_count() > 0 {
            edge - line
        } else {
            0
        };
        self.compute_limits();

        self.anchor = match self.anchor.or(self.start_limit) {
            Some(anchor) => self.limit(anchor.index, i64::from(anchor.offset), self.default_snap()),
            None => None,
        };

        self.compute_id += 1;
        self.state = DimensionState::Valid;
        tracing::debug!(
            axis = ?self.axis,
            compute_id = self.compute_id,
            content = self.content_size,
            viewport = self.viewport_size,
            anchor = ?self.anchor,
            "scroll dimension computed"
        );
        self.scroller_state()
    }

    fn compute_limits(&mut self) {
        let n = self.scrollable_count();
        if n == 0 {
            self.start_limit = None;
            self.finish_limit = None;
            self.scroll_size = 0;
            self.coverage = coverage(self.viewport_size, 0);
            return;
        }
        let start = if self.end_aligned { (n - 1, 0) } else { (0, 0) };
        let finish = if self.viewport_size <= 0 {
            if self.end_aligned {
                (0, 0)
            } else {
                (n - 1, 0)
            }
        } else if self.content_size <= self.viewport_size {
            start
        } else if self.end_aligned {
            let (k, offset) = self.anchor_at_trailing_position(self.viewport_size);
            self.snap(k, offset, false)
        } else {
            let (k, offset) = self.anchor_at_leading_position(self.content_size - self.viewport_size);
            self.snap(k, offset, true)
        };

        self.scroll_size = if self.smooth {
            self.content_size
        } else {
            let span = (self.position_of(finish.0, finish.1) - self.position_of(start.0, start.1)).abs();
            self.content_size.max(span + self.viewport_size)
        };
        self.start_limit = Some(self.to_anchor(start));
        self.finish_limit = Some(self.to_anchor(finish));
        self.coverage = coverage(self.viewport_size, self.scroll_size);
    }

    /// Clamp a candidate anchor to the content bounds.
    ///
    /// Returns `None` when there are no scrollable items. Feeding a returned
    /// anchor back in returns it unchanged.
    pub fn calculate_limited_scroll_anchor(&self, index: usize, offset: i32) -> Result<Option<ScrollAnchor>> {
        self.check_valid("SDCLSA")?;
        Ok(self.limit(index, i64::from(offset), self.default_snap()))
    }

    /// Scroll to an anchor. Returns `true` if the anchor changed.
    pub fn scroll_to(&mut self, index: usize, offset: i32) -> Result<bool> {
        let anchor = self.calculate_limited_scroll_anchor(index, offset)?;
        Ok(self.replace_anchor(anchor))
    }

    /// Scroll by pixels; positive moves toward the content end.
    pub fn scroll_by_pixels(&mut self, delta: i64) -> Result<bool> {
        self.check_valid("SDSBP")?;
        let Some(current) = self.anchor else {
            return Ok(false);
        };
        let k = current.index.saturating_sub(self.fixed_count);
        let position = self.position_of(k, i64::from(current.offset)).saturating_add(delta);
        let anchor = self.limit_position(position, delta >= 0);
        Ok(self.replace_anchor(anchor))
    }

    /// Step by whole items; positive moves toward the content end.
    pub fn scroll_by_items(&mut self, count: isize) -> Result<bool> {
        self.check_valid("SDSBI")?;
        let Some(current) = self.anchor else {
            return Ok(false);
        };
        let index = current
            .index
            .saturating_add_signed(count)
            .max(self.fixed_count);
        let anchor = self.limit(index, 0, count >= 0);
        Ok(self.replace_anchor(anchor))
    }

    /// Scroll by one viewport.
    pub fn page(&mut self, forward: bool) -> Result<bool> {
        let delta = self.viewport_size.max(1);
        self.scroll_by_pixels(if forward { delta } else { -delta })
    }

    /// Scroll the least amount that shows item `index` completely.
    ///
    /// Fixed items and items already fully visible are left alone. An item
    /// larger than the viewport is aligned with the anchored edge.
    pub fn ensure_fully_visible(&mut self, index: usize) -> Result<bool> {
        self.check_valid("SDEFV")?;
        let Some(current) = self.anchor else {
            return Ok(false);
        };
        if index < self.fixed_count || index >= self.fixed_count + self.scrollable_count() {
            return Ok(false);
        }
        let k = index - self.fixed_count;
        let item_start = self.item_start(k);
        let item_end = self.item_end(k);
        let size = item_end - item_start;
        let position = self.anchor_position(current);
        let vp = self.viewport_size;

        let target = if self.end_aligned {
            let view_start = position - vp;
            if item_start >= view_start && item_end <= position {
                return Ok(false);
            }
            if item_end > position || size > vp {
                item_end
            } else {
                item_start + vp
            }
        } else {
            if item_start >= position && item_end <= position + vp {
                return Ok(false);
            }
            if item_start < position || size > vp {
                item_start
            } else {
                item_end - vp
            }
        };
        let anchor = self.limit_position(target, target >= position);
        Ok(self.replace_anchor(anchor))
    }

    /// Distance of the current anchor from the start limit.
    pub fn scroller_position(&self) -> i64 {
        match (self.anchor, self.start_limit) {
            (Some(anchor), Some(start)) => (self.anchor_position(anchor) - self.anchor_position(start)).abs(),
            _ => 0,
        }
    }

    /// Scroll so that [`scroller_position`](Self::scroller_position) becomes
    /// `position` (after limiting).
    pub fn set_scroller_position(&mut self, position: i64) -> Result<bool> {
        self.check_valid("SDSSP")?;
        let Some(start) = self.start_limit else {
            return Ok(false);
        };
        let start_position = self.anchor_position(start);
        let target = if self.end_aligned {
            start_position.saturating_sub(position)
        } else {
            start_position.saturating_add(position)
        };
        let anchor = self.limit_position(target, self.default_snap());
        Ok(self.replace_anchor(anchor))
    }

    pub fn scroller_state(&self) -> ScrollerState {
        ScrollerState {
            axis: self.axis,
            scroll_size: self.scroll_size,
            viewport_size: self.viewport_size,
            position: self.scroller_position(),
            coverage: self.coverage,
            compute_id: self.compute_id,
        }
    }

    /// Forget the anchor; the next compute starts at the start limit.
    pub fn reset_anchor(&mut self) {
        self.anchor = None;
        self.invalidate();
    }

    /// Keep the anchor on the same item after `count` items were inserted at
    /// `index`.
    pub fn adjust_for_inserted(&mut self, index: usize, count: usize) {
        if let Some(anchor) = &mut self.anchor {
            if anchor.index >= index && index >= self.fixed_count {
                anchor.index += count;
            }
        }
        self.invalidate();
    }

    /// Re-anchor after `count` items were deleted at `index`. An anchor inside
    /// the deleted range moves to the first item after it; the next compute
    /// clamps it into range.
    pub fn adjust_for_deleted(&mut self, index: usize, count: usize) {
        if let Some(anchor) = &mut self.anchor {
            if anchor.index >= index + count {
                anchor.index -= count;
            } else if anchor.index >= index {
                *anchor = ScrollAnchor::new(index.max(self.fixed_count), 0);
            }
        }
        self.invalidate();
    }

    /// Follow the anchored item through a move of `count` items.
    pub fn adjust_for_moved(&mut self, old_index: usize, new_index: usize, count: usize) {
        if let Some(anchor) = &mut self.anchor {
            anchor.index = moved_index(anchor.index, old_index, new_index, count).max(self.fixed_count);
        }
        self.invalidate();
    }

    // ------------------------------------------------------------------
    // Position arithmetic
    // ------------------------------------------------------------------

    fn check_valid(&self, code: &'static str) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GridError::assert(code, format!("{:?} scroll dimension is not computed", self.axis)))
        }
    }

    fn replace_anchor(&mut self, anchor: Option<ScrollAnchor>) -> bool {
        if anchor == self.anchor {
            return false;
        }
        self.anchor = anchor;
        true
    }

    /// Snap direction used when none is implied by a scroll delta.
    fn default_snap(&self) -> bool {
        !self.end_aligned
    }

    fn item_start(&self, k: usize) -> i64 {
        self.edges.get(k).copied().unwrap_or(self.content_size)
    }

    fn item_end(&self, k: usize) -> i64 {
        match self.edges.get(k + 1) {
            Some(&next) => next - self.line,
            None => self.content_size,
        }
    }

    fn item_size(&self, k: usize) -> i64 {
        self.item_end(k) - self.item_start(k)
    }

    fn position_of(&self, k: usize, offset: i64) -> i64 {
        if self.end_aligned {
            self.item_end(k) - offset
        } else {
            self.item_start(k) + offset
        }
    }

    fn anchor_position(&self, anchor: ScrollAnchor) -> i64 {
        self.position_of(anchor.index.saturating_sub(self.fixed_count), i64::from(anchor.offset))
    }

    fn item_edges(&self) -> &[i64] {
        let n = self.scrollable_count();
        self.edges.get(..n).unwrap_or(&[])
    }

    /// Item whose leading part contains `position`. A position on a grid line
    /// maps to the start of the following item.
    fn anchor_at_leading_position(&self, position: i64) -> (usize, i64) {
        let n = self.scrollable_count();
        let k = self
            .item_edges()
            .partition_point(|&edge| edge <= position)
            .saturating_sub(1);
        let offset = position - self.item_start(k);
        let size = self.item_size(k);
        if offset < 0 {
            (k, 0)
        } else if offset >= size && k + 1 < n {
            (k + 1, 0)
        } else if offset >= size {
            (k, (size - 1).max(0))
        } else {
            (k, offset)
        }
    }

    /// Item whose trailing part contains `position`. A position on a grid line
    /// maps to the end of the preceding item.
    fn anchor_at_trailing_position(&self, position: i64) -> (usize, i64) {
        let k = self
            .item_edges()
            .partition_point(|&edge| edge < position)
            .saturating_sub(1);
        let offset = self.item_end(k) - position;
        let size = self.item_size(k);
        if offset < 0 {
            (k, 0)
        } else if offset >= size {
            (k, (size - 1).max(0))
        } else {
            (k, offset)
        }
    }

    fn anchor_at_position(&self, position: i64) -> (usize, i64) {
        if self.end_aligned {
            self.anchor_at_trailing_position(position)
        } else {
            self.anchor_at_leading_position(position)
        }
    }

    /// Drop a partial item when scrolling is not smooth. `toward_end` picks
    /// the direction the anchor position moves.
    fn snap(&self, k: usize, offset: i64, toward_end: bool) -> (usize, i64) {
        if self.smooth || offset == 0 {
            return (k, offset);
        }
        let n = self.scrollable_count();
        if self.end_aligned {
            if !toward_end && k > 0 {
                (k - 1, 0)
            } else {
                (k, 0)
            }
        } else if toward_end && k + 1 < n {
            (k + 1, 0)
        } else {
            (k, 0)
        }
    }

    fn to_anchor(&self, (k, offset): (usize, i64)) -> ScrollAnchor {
        ScrollAnchor::new(self.fixed_count + k, to_offset(offset))
    }

    fn limit_bounds(&self) -> Option<(i64, i64, ScrollAnchor, ScrollAnchor)> {
        let start = self.start_limit?;
        let finish = self.finish_limit?;
        let start_position = self.anchor_position(start);
        let finish_position = self.anchor_position(finish);
        Some(if start_position <= finish_position {
            (start_position, finish_position, start, finish)
        } else {
            (finish_position, start_position, finish, start)
        })
    }

    fn limit(&self, index: usize, offset: i64, toward_end: bool) -> Option<ScrollAnchor> {
        let n = self.scrollable_count();
        if n == 0 {
            return None;
        }
        let k = index.saturating_sub(self.fixed_count).min(n - 1);
        self.limit_position(self.position_of(k, offset), toward_end)
    }

    fn limit_position(&self, position: i64, toward_end: bool) -> Option<ScrollAnchor> {
        let (low, high, low_anchor, high_anchor) = self.limit_bounds()?;
        let (k, offset) = self.anchor_at_position(position.clamp(low, high));
        let (k, offset) = self.snap(k, offset, toward_end);
        let snapped = self.position_of(k, offset);
        Some(if snapped < low {
            low_anchor
        } else if snapped > high {
            high_anchor
        } else {
            self.to_anchor((k, offset))
        })
    }
}

fn coverage(viewport_size: i64, scroll_size: i64) -> ViewportCoverageExtent {
    if viewport_size <= 0 {
        ViewportCoverageExtent::None
    } else if viewport_size < scroll_size {
        ViewportCoverageExtent::Partial
    } else {
        ViewportCoverageExtent::Full
    }
}

fn to_offset(offset: i64) -> i32 {
    i32::try_from(offset.max(0)).unwrap_or(i32::MAX)
}

/// New position of the item at `index` after moving `count` items from
/// `old_index` to `new_index` (the index of the first moved item once the
/// move is complete).
pub(crate) fn moved_index(index: usize, old_index: usize, new_index: usize, count: usize) -> usize {
    if index >= old_index && index < old_index + count {
        return index - old_index + new_index;
    }
    // Remove, then insert.
    let after_removal = if index >= old_index + count {
        index - count
    } else {
        index
    };
    if after_removal >= new_index {
        after_removal + count
    } else {
        after_removal
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const WIDTHS: [i32; 4] = [50, 100, 100, 100];

    fn compute(dim: &mut ScrollDimension, sizes: &[i32], fixed_count: usize, extent: i32, smooth: bool, end_aligned: bool) {
        let item_size = |index: usize| sizes.get(index).copied().unwrap_or(0);
        dim.compute(&AxisSource {
            item_count: sizes.len(),
            fixed_count,
            gridline_width: 1,
            fixed_line_width: 1,
            viewport_extent: extent,
            smooth,
            end_aligned,
            item_size: &item_size,
        });
    }

    fn dimension(sizes: &[i32], fixed_count: usize, extent: i32, smooth: bool, end_aligned: bool) -> ScrollDimension {
        let mut dim = ScrollDimension::new(Axis::Horizontal);
        compute(&mut dim, sizes, fixed_count, extent, smooth, end_aligned);
        dim
    }

    #[test]
    fn test_left_aligned_limits() {
        let dim = dimension(&WIDTHS, 1, 200, true, false);
        assert_eq!(dim.start(), 51);
        assert_eq!(dim.viewport_size(), 149);
        assert_eq!(dim.content_size(), 302);
        assert_eq!(dim.scroll_size(), 302);
        assert_eq!(dim.start_limit(), Some(ScrollAnchor::new(1, 0)));
        assert_eq!(dim.finish_limit(), Some(ScrollAnchor::new(2, 52)));
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(1, 0)));
        assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::Partial);
    }

    #[test]
    fn test_non_smooth_snaps_partial_leading_item() {
        let dim = dimension(&WIDTHS, 1, 200, false, false);
        assert_eq!(dim.finish_limit(), Some(ScrollAnchor::new(3, 0)));
        assert_eq!(dim.scroll_size(), 202 + 149);
        let anchor = dim.calculate_limited_scroll_anchor(1, 30).unwrap();
        assert_eq!(anchor, Some(ScrollAnchor::new(2, 0)));
    }

    #[test]
    fn test_limited_anchor_clamps_to_limits() {
        let dim = dimension(&WIDTHS, 1, 200, true, false);
        let anchor = dim.calculate_limited_scroll_anchor(3, 90).unwrap();
        assert_eq!(anchor, Some(ScrollAnchor::new(2, 52)));
        let anchor = dim.calculate_limited_scroll_anchor(0, 0).unwrap();
        assert_eq!(anchor, Some(ScrollAnchor::new(1, 0)));
    }

    #[test]
    fn test_right_aligned_limits() {
        let dim = dimension(&WIDTHS, 1, 200, true, true);
        assert_eq!(dim.start_limit(), Some(ScrollAnchor::new(3, 0)));
        // Viewport end at content position 149: 52 pixels before the end of
        // item 2 (101..201).
        assert_eq!(dim.finish_limit(), Some(ScrollAnchor::new(2, 52)));
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(3, 0)));
    }

    #[test]
    fn test_content_fits_viewport() {
        let dim = dimension(&[50, 40, 40], 1, 400, true, false);
        assert_eq!(dim.start_limit(), dim.finish_limit());
        assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::Full);
    }

    #[test]
    fn test_no_scrollable_items_reports_no_anchor() {
        let dim = dimension(&[50, 40], 2, 400, true, false);
        assert_eq!(dim.anchor(), None);
        assert_eq!(dim.calculate_limited_scroll_anchor(0, 0).unwrap(), None);
    }

    #[test]
    fn test_zero_viewport() {
        let dim = dimension(&WIDTHS, 1, 40, true, false);
        assert_eq!(dim.viewport_size(), 0);
        assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::None);
        assert_eq!(dim.finish_limit(), Some(ScrollAnchor::new(3, 0)));
    }

    #[test]
    fn test_query_before_compute_is_error() {
        let dim = ScrollDimension::new(Axis::Vertical);
        let err = dim.calculate_limited_scroll_anchor(0, 0).unwrap_err();
        assert_eq!(err.code(), "SDCLSA");
    }

    #[test]
    fn test_scroll_by_pixels_and_items() {
        let mut dim = dimension(&WIDTHS, 1, 200, true, false);
        assert!(dim.scroll_by_pixels(120).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(2, 19)));
        assert!(dim.scroll_by_items(-1).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(1, 0)));
        assert!(!dim.scroll_by_items(-1).unwrap());
        assert!(dim.page(true).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(2, 48)));
    }

    #[test]
    fn test_non_smooth_scroll_back_moves_one_item() {
        let mut dim = dimension(&WIDTHS, 1, 200, false, false);
        dim.scroll_to(3, 0).unwrap();
        assert!(dim.scroll_by_pixels(-5).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(2, 0)));
    }

    #[test]
    fn test_ensure_fully_visible() {
        let mut dim = dimension(&WIDTHS, 1, 200, true, false);
        assert!(!dim.ensure_fully_visible(0).unwrap());
        assert!(!dim.ensure_fully_visible(1).unwrap());
        // Item 2 spans 101..201; a viewport of 149 starting at 52 ends there.
        assert!(dim.ensure_fully_visible(2).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(1, 52)));
        assert!(dim.ensure_fully_visible(1).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(1, 0)));
    }

    #[test]
    fn test_scroller_position_round_trip() {
        let mut dim = dimension(&WIDTHS, 1, 200, true, false);
        assert!(dim.set_scroller_position(130).unwrap());
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(2, 29)));
        assert_eq!(dim.scroller_state().position, 130);
    }

    #[test]
    fn test_deleting_anchor_item_reanchors() {
        let mut dim = dimension(&WIDTHS, 1, 200, false, false);
        dim.scroll_to(3, 0).unwrap();
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(3, 0)));
        dim.adjust_for_deleted(3, 1);
        compute(&mut dim, &WIDTHS[..3], 1, 200, false, false);
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(2, 0)));
    }

    #[test]
    fn test_inserted_before_anchor_shifts_it() {
        let mut dim = dimension(&[50, 100, 100, 100, 100, 100], 1, 200, true, false);
        dim.scroll_to(3, 0).unwrap();
        dim.adjust_for_inserted(1, 2);
        assert_eq!(dim.anchor(), Some(ScrollAnchor::new(5, 0)));
        assert!(!dim.is_valid());
    }

    #[test]
    fn test_moved_index() {
        // Move [2, 3] so that it starts at 5 in a list of 8.
        assert_eq!(moved_index(2, 2, 5, 2), 5);
        assert_eq!(moved_index(4, 2, 5, 2), 2);
        assert_eq!(moved_index(7, 2, 5, 2), 7);
        assert_eq!(moved_index(1, 2, 5, 2), 1);
        // Move 6 to 1.
        assert_eq!(moved_index(1, 6, 1, 1), 2);
    }
}
