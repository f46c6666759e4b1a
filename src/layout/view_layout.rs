//! Visible column and row geometry, computed on demand.
//!
//! Geometry is computed lazily per axis: invalidation only clears flags, and
//! the next [`ViewLayout::ensure_computed`] recomputes what is stale. Every
//! geometry compute bumps [`ViewLayout::computation_id`], which the cell pools
//! compare against to detect staleness.

use std::rc::Rc;

use super::cell_pool::CellPool;
use super::{
    AxisSource, CellPoolOrder, ColumnsViewWidths, ColumnsViewWidthsChange, InvalidateAction, InvalidateScope,
    ScrollAnchor, ScrollDimension, ScrollerState, ViewCell, ViewLayoutColumn, ViewLayoutGap, ViewLayoutRow,
};
use crate::columns::ColumnsManager;
use crate::error::{GridError, Result};
use crate::settings::{ColumnSettings, GridSettings};
use crate::types::{Axis, Subgrid};

/// Read-only view of everything a compute pulls from.
pub struct LayoutContext<'a> {
    pub settings: &'a GridSettings,
    pub columns: &'a ColumnsManager,
    pub subgrids: &'a [Rc<dyn Subgrid>],
    pub surface_width: i32,
    pub surface_height: i32,
}

impl LayoutContext<'_> {
    fn main_subgrid(&self) -> Option<(usize, &Rc<dyn Subgrid>)> {
        self.subgrids
            .iter()
            .enumerate()
            .find(|(_, subgrid)| subgrid.role().is_main())
    }

    fn horizontal_source<'s>(&self, item_size: &'s dyn Fn(usize) -> i32) -> AxisSource<'s> {
        AxisSource {
            item_count: self.columns.active_column_count(),
            fixed_count: self.settings.fixed_column_count,
            gridline_width: self.settings.vertical_grid_lines_width,
            fixed_line_width: self.settings.effective_vertical_fixed_line_width(),
            viewport_extent: self.surface_width,
            smooth: self.settings.scroll_horizontally_smoothly,
            end_aligned: self.settings.grid_right_aligned,
            item_size,
        }
    }
}

/// Something a compute or invalidation wants the owner to publish.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    Invalidated(InvalidateAction),
    ColumnsViewWidthsChanged(ColumnsViewWidthsChange),
    CellPoolComputed(CellPoolOrder),
    ScrollerComputed(ScrollerState),
}

/// Scroll operations routed through [`ViewLayout::scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    To { index: usize, offset: i32 },
    ByPixels(i64),
    ByItems(isize),
    Page { forward: bool },
    EnsureFullyVisible(usize),
    ScrollerPosition(i64),
}

/// Vertical split of the surface around the main subgrid.
#[derive(Debug, Clone, Copy, Default)]
struct VerticalRegions {
    main_top: i32,
    main_bottom: i32,
    post_block: i32,
}

#[derive(Debug)]
pub struct ViewLayout {
    horizontal_dimension: ScrollDimension,
    vertical_dimension: ScrollDimension,

    columns: Vec<ViewLayoutColumn>,
    rows: Vec<ViewLayoutRow>,
    horizontal_valid: bool,
    vertical_valid: bool,
    computation_id: u64,
    horizontal_anchor_used: Option<ScrollAnchor>,
    vertical_anchor_used: Option<ScrollAnchor>,

    first_scrollable_column: Option<usize>,
    last_scrollable_column: Option<usize>,
    unanchored_column_overflow: Option<i32>,
    column_gap: Option<ViewLayoutGap>,
    columns_view_widths: ColumnsViewWidths,

    first_scrollable_row: Option<usize>,
    last_scrollable_row: Option<usize>,
    last_scrollable_row_overflow: Option<i32>,
    row_gap: Option<ViewLayoutGap>,

    row_column_pool: CellPool,
    column_row_pool: CellPool,
    pool_computing: bool,

    events: Vec<LayoutEvent>,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLayout {
    pub fn new() -> Self {
        Self {
            horizontal_dimension: ScrollDimension::new(Axis::Horizontal),
            vertical_dimension: ScrollDimension::new(Axis::Vertical),
            columns: Vec::new(),
            rows: Vec::new(),
            horizontal_valid: false,
            vertical_valid: false,
            computation_id: 0,
            horizontal_anchor_used: None,
            vertical_anchor_used: None,
            first_scrollable_column: None,
            last_scrollable_column: None,
            unanchored_column_overflow: None,
            column_gap: None,
            columns_view_widths: ColumnsViewWidths::default(),
            first_scrollable_row: None,
            last_scrollable_row: None,
            last_scrollable_row_overflow: None,
            row_gap: None,
            row_column_pool: CellPool::new(CellPoolOrder::RowColumn),
            column_row_pool: CellPool::new(CellPoolOrder::ColumnRow),
            pool_computing: false,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Published state
    // ------------------------------------------------------------------

    /// Visible columns, left to right, as of the last compute.
    pub fn columns(&self) -> &[ViewLayoutColumn] {
        &self.columns
    }

    /// Visible rows, top to bottom, as of the last compute.
    pub fn rows(&self) -> &[ViewLayoutRow] {
        &self.rows
    }

    pub fn computation_id(&self) -> u64 {
        self.computation_id
    }

    pub fn is_valid(&self) -> bool {
        self.horizontal_valid
            && self.vertical_valid
            && self.horizontal_dimension.is_valid()
            && self.vertical_dimension.is_valid()
    }

    pub fn dimension(&self, axis: Axis) -> &ScrollDimension {
        match axis {
            Axis::Horizontal => &self.horizontal_dimension,
            Axis::Vertical => &self.vertical_dimension,
        }
    }

    fn dimension_mut(&mut self, axis: Axis) -> &mut ScrollDimension {
        match axis {
            Axis::Horizontal => &mut self.horizontal_dimension,
            Axis::Vertical => &mut self.vertical_dimension,
        }
    }

    /// Position in [`columns`](Self::columns) of the first scrollable column.
    pub fn first_scrollable_visible_column_index(&self) -> Option<usize> {
        self.first_scrollable_column
    }

    pub fn last_scrollable_visible_column_index(&self) -> Option<usize> {
        self.last_scrollable_column
    }

    /// Pixels of the non-anchored boundary column beyond the scrollable
    /// region: the rightmost scrollable column when left-aligned, the leftmost
    /// when right-aligned. Negative when the column ends inside the region.
    pub fn unanchored_column_overflow(&self) -> Option<i32> {
        self.unanchored_column_overflow
    }

    pub fn column_gap(&self) -> Option<ViewLayoutGap> {
        self.column_gap
    }

    pub fn columns_view_widths(&self) -> ColumnsViewWidths {
        self.columns_view_widths
    }

    pub fn first_scrollable_visible_row_index(&self) -> Option<usize> {
        self.first_scrollable_row
    }

    pub fn last_scrollable_visible_row_index(&self) -> Option<usize> {
        self.last_scrollable_row
    }

    /// Pixels of the last scrollable row below the main area.
    pub fn last_scrollable_row_bottom_overflow(&self) -> Option<i32> {
        self.last_scrollable_row_overflow
    }

    pub fn row_gap(&self) -> Option<ViewLayoutGap> {
        self.row_gap
    }

    /// Take the queued events.
    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Mark geometry stale for the scoped axes; `with_dimension` also forces
    /// the scroll dimensions to recompute.
    pub fn invalidate(&mut self, scope: InvalidateScope, action: InvalidateAction, with_dimension: bool) {
        if scope.horizontal() {
            self.horizontal_valid = false;
            if with_dimension {
                self.horizontal_dimension.invalidate();
            }
        }
        if scope.vertical() {
            self.vertical_valid = false;
            if with_dimension {
                self.vertical_dimension.invalidate();
            }
        }
        self.events.push(LayoutEvent::Invalidated(action));
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate(InvalidateScope::Both, InvalidateAction::All, true);
    }

    fn invalidate_geometry(&mut self, axis: Axis) {
        match axis {
            Axis::Horizontal => self.horizontal_valid = false,
            Axis::Vertical => self.vertical_valid = false,
        }
    }

    fn geometry_valid(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal_valid,
            Axis::Vertical => self.vertical_valid,
        }
    }

    /// Active column or main row index of the last visible scrollable item.
    fn last_visible_scrollable_item(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::Horizontal => self
                .last_scrollable_column
                .and_then(|index| self.columns.get(index))
                .map(|column| column.active_column_index),
            Axis::Vertical => self
                .last_scrollable_row
                .and_then(|index| self.rows.get(index))
                .map(|row| row.subgrid_row_index),
        }
    }

    /// The scrollable items reach the far edge of the viewport.
    fn viewport_filled(&self, axis: Axis) -> bool {
        let overflow = match axis {
            Axis::Horizontal => self.unanchored_column_overflow,
            Axis::Vertical => self.last_scrollable_row_overflow,
        };
        overflow.is_some_and(|overflow| overflow >= 0)
    }

    fn view_unaffected_by(&self, axis: Axis, index: usize) -> bool {
        self.geometry_valid(axis)
            && self.viewport_filled(axis)
            && self
                .last_visible_scrollable_item(axis)
                .is_some_and(|last| index > last)
    }

    fn scope(axis: Axis) -> InvalidateScope {
        match axis {
            Axis::Horizontal => InvalidateScope::Horizontal,
            Axis::Vertical => InvalidateScope::Vertical,
        }
    }

    /// Invalidate `axis` for an item range change. Changes that leave the
    /// view alone only invalidate the scroll dimension.
    fn invalidate_range(&mut self, axis: Axis, action: InvalidateAction) {
        if action.is_view_not_affected() {
            self.dimension_mut(axis).invalidate();
            self.events.push(LayoutEvent::Invalidated(action));
        } else {
            self.invalidate(Self::scope(axis), action, true);
        }
    }

    /// `count` items were inserted at `index` on `axis`.
    ///
    /// Insertions after the last visible scrollable item of a filled viewport
    /// leave the geometry alone; only the scroll dimension is recomputed on
    /// next use.
    pub fn items_inserted(&mut self, axis: Axis, index: usize, count: usize) {
        let action = if self.view_unaffected_by(axis, index) {
            InvalidateAction::DataRangeInsertedButViewNotAffected { index, count }
        } else {
            self.dimension_mut(axis).adjust_for_inserted(index, count);
            InvalidateAction::DataRangeInserted { index, count }
        };
        self.invalidate_range(axis, action);
    }

    /// `count` items were deleted at `index` on `axis`.
    pub fn items_deleted(&mut self, axis: Axis, index: usize, count: usize) {
        let action = if self.view_unaffected_by(axis, index) {
            InvalidateAction::DataRangeDeletedButViewNotAffected { index, count }
        } else {
            self.dimension_mut(axis).adjust_for_deleted(index, count);
            match axis {
                Axis::Horizontal => InvalidateAction::ActiveRangeDeleted { index, count },
                Axis::Vertical => InvalidateAction::DataRangeDeleted { index, count },
            }
        };
        self.invalidate_range(axis, action);
    }

    pub fn items_moved(&mut self, axis: Axis, old_index: usize, new_index: usize, count: usize) {
        self.dimension_mut(axis).adjust_for_moved(old_index, new_index, count);
        self.invalidate(
            Self::scope(axis),
            InvalidateAction::DataRangeMoved {
                old_index,
                new_index,
                count,
            },
            true,
        );
    }

    pub fn all_items_deleted(&mut self, axis: Axis) {
        self.dimension_mut(axis).reset_anchor();
        self.invalidate(Self::scope(axis), InvalidateAction::AllDeleted, true);
    }

    pub fn all_items_changed(&mut self, axis: Axis) {
        self.invalidate(Self::scope(axis), InvalidateAction::AllChanged, true);
    }

    // ------------------------------------------------------------------
    // Computation
    // ------------------------------------------------------------------

    /// Bring both scroll dimensions and the geometry up to date.
    pub fn ensure_computed(&mut self, ctx: &LayoutContext<'_>) -> Result<()> {
        self.ensure_dimension(Axis::Horizontal, ctx);
        if !self.horizontal_valid {
            self.compute_horizontal(ctx)?;
        }
        self.ensure_dimension(Axis::Vertical, ctx);
        if !self.vertical_valid {
            self.compute_vertical(ctx)?;
        }
        Ok(())
    }

    /// Recompute the scroll dimension of `axis` if it is stale. Geometry is
    /// invalidated when the limited anchor moves.
    pub fn ensure_dimension(&mut self, axis: Axis, ctx: &LayoutContext<'_>) {
        match axis {
            Axis::Horizontal => {
                if self.horizontal_dimension.is_valid() {
                    return;
                }
                let width = |index: usize| ctx.columns.active_column_width(index).unwrap_or(0);
                let state = self.horizontal_dimension.compute(&ctx.horizontal_source(&width));
                self.events.push(LayoutEvent::ScrollerComputed(state));
                if self.horizontal_dimension.anchor() != self.horizontal_anchor_used {
                    self.horizontal_valid = false;
                }
            }
            Axis::Vertical => {
                if self.vertical_dimension.is_valid() {
                    return;
                }
                let regions = vertical_regions(ctx);
                let main = ctx.main_subgrid().map(|(_, subgrid)| Rc::clone(subgrid));
                let height = |row: usize| main.as_ref().map_or(0, |subgrid| subgrid.row_height(row));
                let source = AxisSource {
                    item_count: main.as_ref().map_or(0, |subgrid| subgrid.row_count()),
                    fixed_count: ctx.settings.fixed_row_count,
                    gridline_width: ctx.settings.horizontal_grid_lines_width,
                    fixed_line_width: ctx.settings.effective_horizontal_fixed_line_width(),
                    viewport_extent: regions.main_bottom - regions.main_top,
                    smooth: ctx.settings.scroll_vertically_smoothly,
                    end_aligned: false,
                    item_size: &height,
                };
                let state = self.vertical_dimension.compute(&source);
                self.events.push(LayoutEvent::ScrollerComputed(state));
                if self.vertical_dimension.anchor() != self.vertical_anchor_used {
                    self.vertical_valid = false;
                }
            }
        }
    }

    /// Apply a scroll request. Returns `true` if the anchor moved.
    pub fn scroll(&mut self, axis: Axis, ctx: &LayoutContext<'_>, request: ScrollRequest) -> Result<bool> {
        self.ensure_dimension(axis, ctx);
        let dimension = self.dimension_mut(axis);
        let changed = match request {
            ScrollRequest::To { index, offset } => dimension.scroll_to(index, offset)?,
            ScrollRequest::ByPixels(delta) => dimension.scroll_by_pixels(delta)?,
            ScrollRequest::ByItems(count) => dimension.scroll_by_items(count)?,
            ScrollRequest::Page { forward } => dimension.page(forward)?,
            ScrollRequest::EnsureFullyVisible(index) => dimension.ensure_fully_visible(index)?,
            ScrollRequest::ScrollerPosition(position) => dimension.set_scroller_position(position)?,
        };
        if changed {
            let state = dimension.scroller_state();
            self.invalidate_geometry(axis);
            self.events.push(LayoutEvent::ScrollerComputed(state));
        }
        Ok(changed)
    }

    fn compute_horizontal(&mut self, ctx: &LayoutContext<'_>) -> Result<()> {
        let settings = ctx.settings;
        let count = ctx.columns.active_column_count();
        let fixed_count = self.horizontal_dimension.fixed_count().min(count);
        let line = settings.vertical_grid_lines_width.max(0);
        let fixed_line = settings.effective_vertical_fixed_line_width().max(0);
        let surface = ctx.surface_width.max(0);
        let adjust = settings.visible_column_width_adjust;
        let anchor = self.horizontal_dimension.anchor();

        if let Some(anchor) = anchor {
            if anchor.index < fixed_count || anchor.index >= count {
                return Err(GridError::assert(
                    "VLCH10",
                    format!("column anchor {} outside [{fixed_count}, {count})", anchor.index),
                ));
            }
        }

        let width_of = |index: usize| ctx.columns.active_column_width(index).unwrap_or(0).max(0);
        let field_of = |index: usize| {
            ctx.columns
                .active_field_indices()
                .get(index)
                .copied()
                .unwrap_or_default()
        };
        let column = |position: usize, active_index: usize, left: i32, width: i32, fixed: bool| ViewLayoutColumn {
            index: position,
            active_column_index: active_index,
            field_index: field_of(active_index),
            left,
            width,
            right_plus_1: left + width,
            fixed,
        };

        let mut columns = std::mem::take(&mut self.columns);
        columns.clear();

        // Fixed columns, always from the left edge.
        let mut fixed_width = 0;
        let mut x = 0;
        for active_index in 0..fixed_count {
            let width = width_of(active_index);
            if x < surface {
                let visible = if adjust { width.min(surface - x) } else { width };
                columns.push(column(columns.len(), active_index, x, visible, true));
            }
            fixed_width = x + width;
            x = fixed_width + line;
        }
        let scrollable_start = if fixed_count > 0 {
            fixed_width + fixed_line
        } else {
            0
        };
        self.column_gap = (fixed_count > 0 && fixed_line > 0 && fixed_width < surface).then_some(ViewLayoutGap {
            start: fixed_width,
            end_plus_1: scrollable_start,
        });

        let first_scrollable = columns.len();
        let mut overflow = None;
        if let Some(anchor) = anchor {
            if self.horizontal_dimension.is_end_aligned() {
                // Walk right to left from the surface's right edge.
                let mut right = surface;
                let mut active_index = anchor.index;
                while right > scrollable_start {
                    let mut width = width_of(active_index);
                    if active_index == anchor.index {
                        width = (width - anchor.offset).max(0);
                    }
                    let left = right - width;
                    let cut = scrollable_start - left;
                    let (left, width) = if adjust && cut > 0 {
                        (scrollable_start, right - scrollable_start)
                    } else {
                        (left, width)
                    };
                    columns.push(column(0, active_index, left, width, false));
                    overflow = Some(cut);
                    right = left - line;
                    if active_index == fixed_count {
                        break;
                    }
                    active_index -= 1;
                }
                if let Some(scrollable) = columns.get_mut(first_scrollable..) {
                    scrollable.reverse();
                }
                for (position, column) in columns.iter_mut().enumerate().skip(first_scrollable) {
                    column.index = position;
                }
            } else {
                let mut x = scrollable_start;
                let mut active_index = anchor.index;
                while active_index < count && x < surface {
                    let mut width = width_of(active_index);
                    if active_index == anchor.index {
                        width = (width - anchor.offset).max(0);
                    }
                    let cut = x + width - surface;
                    let visible = if adjust && cut > 0 { surface - x } else { width };
                    columns.push(column(columns.len(), active_index, x, visible, false));
                    overflow = Some(cut);
                    x += width + line;
                    active_index += 1;
                }
            }
            if columns.len() == first_scrollable && scrollable_start < surface {
                self.columns = columns;
                return Err(GridError::assert(
                    "VLCH20",
                    "no scrollable column laid out for a valid anchor",
                ));
            }
        }

        let has_scrollable = columns.len() > first_scrollable;
        self.first_scrollable_column = has_scrollable.then_some(first_scrollable);
        self.last_scrollable_column = has_scrollable.then(|| columns.len() - 1);
        self.unanchored_column_overflow = if has_scrollable { overflow } else { None };

        let scrollable_width = match (columns.get(first_scrollable), columns.last()) {
            (Some(first), Some(last)) if has_scrollable => last.right_plus_1 - first.left,
            _ => 0,
        };
        let widths = ColumnsViewWidths {
            fixed: fixed_width,
            scrollable: scrollable_width,
            visible: fixed_width + scrollable_width,
        };
        let change = widths.diff(&self.columns_view_widths);
        self.columns_view_widths = widths;
        if change.any() {
            self.events.push(LayoutEvent::ColumnsViewWidthsChanged(change));
        }

        self.columns = columns;
        self.horizontal_anchor_used = anchor;
        self.horizontal_valid = true;
        self.computation_id += 1;
        tracing::debug!(
            computation_id = self.computation_id,
            visible = self.columns.len(),
            anchor = ?anchor,
            overflow = ?self.unanchored_column_overflow,
            "columns computed"
        );
        Ok(())
    }

    fn compute_vertical(&mut self, ctx: &LayoutContext<'_>) -> Result<()> {
        let settings = ctx.settings;
        let line = settings.horizontal_grid_lines_width.max(0);
        let fixed_line = settings.effective_horizontal_fixed_line_width().max(0);
        let surface = ctx.surface_height.max(0);
        let regions = vertical_regions(ctx);
        let main = ctx.main_subgrid();
        let pre_end = main.map_or(ctx.subgrids.len(), |(index, _)| index);

        let mut rows = std::mem::take(&mut self.rows);
        rows.clear();

        // Subgrids above the main one (all of them if there is no main).
        let mut y = 0;
        for (subgrid_index, subgrid) in ctx.subgrids.iter().enumerate().take(pre_end) {
            y = push_fixed_rows(&mut rows, subgrid_index, subgrid.as_ref(), y, surface, line);
        }

        self.first_scrollable_row = None;
        self.last_scrollable_row = None;
        self.last_scrollable_row_overflow = None;
        self.row_gap = None;
        let anchor = self.vertical_dimension.anchor();

        if let Some((main_index, subgrid)) = main {
            let row_count = subgrid.row_count();
            let fixed_count = self.vertical_dimension.fixed_count().min(row_count);
            let main_bottom = regions.main_bottom;
            let row = |position: usize, row_index: usize, top: i32, height: i32| ViewLayoutRow {
                index: position,
                subgrid_index: main_index,
                subgrid_role: subgrid.role(),
                subgrid_row_index: row_index,
                top,
                height,
                bottom_plus_1: top + height,
                fixed: subgrid.is_row_fixed(row_index, fixed_count),
            };

            // Fixed rows always show the top rows of the main subgrid.
            let mut y = regions.main_top;
            let mut fixed_bottom = y;
            for row_index in 0..fixed_count {
                let height = subgrid.row_height(row_index).max(0);
                if y < main_bottom {
                    rows.push(row(rows.len(), row_index, y, height));
                }
                fixed_bottom = y + height;
                y = fixed_bottom + line;
            }
            if fixed_count > 0 {
                y = fixed_bottom + fixed_line;
                if fixed_line > 0 && fixed_bottom < main_bottom {
                    self.row_gap = Some(ViewLayoutGap {
                        start: fixed_bottom,
                        end_plus_1: y,
                    });
                }
            }

            if let Some(anchor) = anchor {
                if anchor.index < fixed_count || anchor.index >= row_count {
                    self.rows = rows;
                    return Err(GridError::assert(
                        "VLCV10",
                        format!("row anchor {} outside [{fixed_count}, {row_count})", anchor.index),
                    ));
                }
                let first = rows.len();
                let mut row_index = anchor.index;
                while row_index < row_count && y < main_bottom {
                    let mut height = subgrid.row_height(row_index).max(0);
                    if row_index == anchor.index {
                        height = (height - anchor.offset).max(0);
                    }
                    rows.push(row(rows.len(), row_index, y, height));
                    self.last_scrollable_row_overflow = Some(y + height - main_bottom);
                    y += height + line;
                    row_index += 1;
                }
                if rows.len() > first {
                    self.first_scrollable_row = Some(first);
                    self.last_scrollable_row = Some(rows.len() - 1);
                }
            }

            // Subgrids below the main one hang from the bottom edge.
            let mut y = (surface - regions.post_block + line).max(regions.main_top);
            for (subgrid_index, subgrid) in ctx.subgrids.iter().enumerate().skip(main_index + 1) {
                y = push_fixed_rows(&mut rows, subgrid_index, subgrid.as_ref(), y, surface, line);
            }
        }

        self.rows = rows;
        self.vertical_anchor_used = anchor;
        self.vertical_valid = true;
        self.computation_id += 1;
        tracing::debug!(
            computation_id = self.computation_id,
            visible = self.rows.len(),
            anchor = ?anchor,
            "rows computed"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cell pools
    // ------------------------------------------------------------------

    /// Cell pool in the requested order, rebuilt if it is stale.
    pub fn cell_pool(&mut self, ctx: &LayoutContext<'_>, order: CellPoolOrder) -> Result<&mut [ViewCell]> {
        if self.pool_computing {
            return Err(GridError::RecursivePoolComputation);
        }
        self.ensure_computed(ctx)?;
        let computation_id = self.computation_id;
        let pool = match order {
            CellPoolOrder::RowColumn => &mut self.row_column_pool,
            CellPoolOrder::ColumnRow => &mut self.column_row_pool,
        };
        if !pool.is_current(computation_id) {
            self.pool_computing = true;
            let settings = |column: &ViewLayoutColumn| {
                ctx.columns
                    .field_column(column.field_index)
                    .map(|column| *column.settings())
                    .unwrap_or_else(|_| ColumnSettings::from_grid(ctx.settings))
            };
            pool.rebuild(&self.columns, &self.rows, &settings, computation_id);
            self.pool_computing = false;
            self.events.push(LayoutEvent::CellPoolComputed(order));
        }
        Ok(pool.cells_mut())
    }

    fn current_pool_order(&self) -> Option<CellPoolOrder> {
        if self.row_column_pool.is_current(self.computation_id) {
            Some(CellPoolOrder::RowColumn)
        } else if self.column_row_pool.is_current(self.computation_id) {
            Some(CellPoolOrder::ColumnRow)
        } else {
            None
        }
    }

    /// Cell at a position in the visible lists.
    ///
    /// Resolves against whichever pool is current. With `ctx` the layout and
    /// the row-major pool are computed if stale; without it a stale pool is an
    /// assertion failure.
    pub fn find_cell_at_viewport_index(
        &mut self,
        ctx: Option<&LayoutContext<'_>>,
        column_index: usize,
        row_index: usize,
    ) -> Result<Option<&ViewCell>> {
        let order = match (self.current_pool_order(), ctx) {
            (Some(order), _) => order,
            (None, Some(ctx)) => {
                self.cell_pool(ctx, CellPoolOrder::RowColumn)?;
                CellPoolOrder::RowColumn
            }
            (None, None) => {
                return Err(GridError::assert(
                    "VLFCAVI",
                    "cell pool is stale and recomputation is not allowed",
                ));
            }
        };
        if self.columns.is_empty() || self.rows.is_empty() {
            return Err(GridError::assert("VLFCAVE", "no visible cells"));
        }
        let (column_count, row_count) = (self.columns.len(), self.rows.len());
        let pool = match order {
            CellPoolOrder::RowColumn => &self.row_column_pool,
            CellPoolOrder::ColumnRow => &self.column_row_pool,
        };
        Ok(pool.cell(column_index, row_index, column_count, row_count))
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn find_column_at_x(&self, x: i32) -> Option<&ViewLayoutColumn> {
        let index = self.columns.partition_point(|column| column.right_plus_1 <= x);
        self.columns.get(index).filter(|column| column.contains_x(x))
    }

    /// Row containing `y`. Where a clipped main row and a bottom-anchored
    /// subgrid overlap, the later row wins.
    pub fn find_row_at_y(&self, y: i32) -> Option<&ViewLayoutRow> {
        let index = self.rows.partition_point(|row| row.bottom_plus_1 <= y);
        self.rows
            .get(index..)
            .unwrap_or(&[])
            .iter()
            .take_while(|row| row.top <= y)
            .filter(|row| row.contains_y(y))
            .last()
    }

    pub fn find_cell_at_point(&mut self, ctx: Option<&LayoutContext<'_>>, x: i32, y: i32) -> Result<Option<&ViewCell>> {
        let column = self.find_column_at_x(x).map(|column| column.index);
        let row = self.find_row_at_y(y).map(|row| row.index);
        match (column, row) {
            (Some(column), Some(row)) => self.find_cell_at_viewport_index(ctx, column, row),
            _ => Ok(None),
        }
    }

    pub fn find_column_with_active_index(&self, active_index: usize) -> Option<&ViewLayoutColumn> {
        self.columns
            .iter()
            .find(|column| column.active_column_index == active_index)
    }

    pub fn find_row_with_subgrid_row_index(&self, subgrid_index: usize, row_index: usize) -> Option<&ViewLayoutRow> {
        self.rows
            .iter()
            .find(|row| row.subgrid_index == subgrid_index && row.subgrid_row_index == row_index)
    }
}

fn vertical_regions(ctx: &LayoutContext<'_>) -> VerticalRegions {
    let line = ctx.settings.horizontal_grid_lines_width.max(0);
    let block = |subgrids: &[Rc<dyn Subgrid>]| {
        subgrids.iter().fold(0i32, |total, subgrid| {
            (0..subgrid.row_count()).fold(total, |total, row| {
                total.saturating_add(subgrid.row_height(row).max(0) + line)
            })
        })
    };
    let Some((main_index, _)) = ctx.main_subgrid() else {
        return VerticalRegions::default();
    };
    let main_top = block(ctx.subgrids.get(..main_index).unwrap_or(&[]));
    let post_block = block(ctx.subgrids.get(main_index + 1..).unwrap_or(&[]));
    VerticalRegions {
        main_top,
        main_bottom: (ctx.surface_height.max(0) - post_block).max(main_top),
        post_block,
    }
}

/// Lay out every row of a non-scrolling subgrid from `y` until the surface
/// bottom. Returns the next row's top.
fn push_fixed_rows(
    rows: &mut Vec<ViewLayoutRow>,
    subgrid_index: usize,
    subgrid: &dyn Subgrid,
    mut y: i32,
    surface: i32,
    line: i32,
) -> i32 {
    let role = subgrid.role();
    for row_index in 0..subgrid.row_count() {
        if y >= surface {
            break;
        }
        let height = subgrid.row_height(row_index).max(0);
        rows.push(ViewLayoutRow {
            index: rows.len(),
            subgrid_index,
            subgrid_role: role,
            subgrid_row_index: row_index,
            top: y,
            height,
            bottom_plus_1: y + height,
            fixed: true,
        });
        y += height + line;
    }
    y
}
