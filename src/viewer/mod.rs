//! Main `GridView` struct - the primary entry point of the grid.
//!
//! This module provides the `GridView` orchestrator that handles:
//! - Owning the settings, the columns manager and the view layout
//! - Funnelling schema, row and column notifications into layout invalidations
//! - Running the render tick and the deferred work that follows it
//! - Dispatching [`GridEvent`]s to subscribed listeners
//!
//! Every mutating entry point ends by flushing queued notifications, so
//! listeners observe a consistent grid.

mod events;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::fmt;
use std::rc::Rc;

pub use events::{EventHub, GridEvent, Listener, ListenerId};
#[cfg(target_arch = "wasm32")]
pub use wasm::WasmGridView;

use crate::columns::{ActiveListChange, ColumnSettingsFactory, ColumnsManager, ColumnsNotification};
use crate::error::Result;
use crate::host::{FrameContext, RenderingSurface, TickQueue};
use crate::layout::{
    CellPoolOrder, InvalidateAction, InvalidateScope, LayoutContext, LayoutEvent, ScrollerState, ViewCell,
    ViewLayout, ViewLayoutColumn, ViewLayoutRow,
};
use crate::render::{collect_preferred_widths, CellPainter};
use crate::settings::{ColumnSettingsPatch, GridSettings, GridSettingsPatch};
use crate::types::{Axis, SchemaServer, Subgrid};

pub struct GridView {
    settings: GridSettings,
    schema: Rc<dyn SchemaServer>,
    subgrids: Vec<Rc<dyn Subgrid>>,
    surface: Rc<dyn RenderingSurface>,
    columns: ColumnsManager,
    layout: ViewLayout,
    events: EventHub,
    frame: FrameContext,
    deferred: TickQueue<Axis, ScrollerState>,
}

impl fmt::Debug for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridView")
            .field("settings", &self.settings)
            .field("columns", &self.columns)
            .field("subgrids", &self.subgrids.len())
            .field("layout", &self.layout)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl GridView {
    /// Create a grid over `schema` and `subgrids`, creating one active column
    /// per field.
    ///
    /// # Errors
    /// Returns an error if the schema's field indices are inconsistent.
    pub fn new(
        settings: GridSettings,
        schema: Rc<dyn SchemaServer>,
        subgrids: Vec<Rc<dyn Subgrid>>,
        surface: Rc<dyn RenderingSurface>,
    ) -> Result<Self> {
        let columns = ColumnsManager::new(&settings);
        Self::with_columns(settings, columns, schema, subgrids, surface)
    }

    /// Like [`new`](Self::new), with per-field column settings from `factory`.
    ///
    /// # Errors
    /// Returns an error if the schema's field indices are inconsistent.
    pub fn with_settings_factory(
        settings: GridSettings,
        factory: ColumnSettingsFactory,
        schema: Rc<dyn SchemaServer>,
        subgrids: Vec<Rc<dyn Subgrid>>,
        surface: Rc<dyn RenderingSurface>,
    ) -> Result<Self> {
        let columns = ColumnsManager::with_settings_factory(&settings, factory);
        Self::with_columns(settings, columns, schema, subgrids, surface)
    }

    fn with_columns(
        settings: GridSettings,
        mut columns: ColumnsManager,
        schema: Rc<dyn SchemaServer>,
        subgrids: Vec<Rc<dyn Subgrid>>,
        surface: Rc<dyn RenderingSurface>,
    ) -> Result<Self> {
        columns.create_columns(&schema.fields())?;
        let mut grid = Self {
            settings,
            schema,
            subgrids,
            surface,
            columns,
            layout: ViewLayout::new(),
            events: EventHub::new(),
            frame: FrameContext::default(),
            deferred: TickQueue::new(),
        };
        grid.flush();
        Ok(grid)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn columns(&self) -> &ColumnsManager {
        &self.columns
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn subgrids(&self) -> &[Rc<dyn Subgrid>] {
        &self.subgrids
    }

    /// Visible columns as of the last compute.
    pub fn visible_columns(&self) -> &[ViewLayoutColumn] {
        self.layout.columns()
    }

    /// Visible rows as of the last compute.
    pub fn visible_rows(&self) -> &[ViewLayoutRow] {
        self.layout.rows()
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Run `update` against the columns manager, then apply whatever it
    /// changed to the layout.
    pub fn update_columns<R>(&mut self, update: impl FnOnce(&mut ColumnsManager) -> R) -> R {
        let result = update(&mut self.columns);
        self.flush();
        result
    }

    fn layout_parts(&mut self) -> (&mut ViewLayout, LayoutContext<'_>) {
        let ctx = LayoutContext {
            settings: &self.settings,
            columns: &self.columns,
            subgrids: &self.subgrids,
            surface_width: self.surface.width(),
            surface_height: self.surface.height(),
        };
        (&mut self.layout, ctx)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Merge a settings patch. Returns `true` if any setting changed.
    pub fn merge_settings(&mut self, patch: &GridSettingsPatch) -> bool {
        let changes = self.settings.merge(patch);
        if !changes.any() {
            return false;
        }
        self.columns.apply_grid_settings(&self.settings);
        if changes.column_settings {
            let column_patch = ColumnSettingsPatch::from(patch);
            if !column_patch.is_empty() {
                self.columns.merge_all_column_settings(&column_patch);
            }
        }
        if changes.horizontal {
            self.layout
                .invalidate(InvalidateScope::Horizontal, InvalidateAction::All, true);
        }
        if changes.vertical {
            self.layout
                .invalidate(InvalidateScope::Vertical, InvalidateAction::All, true);
        }
        tracing::debug!(?changes, "settings merged");
        self.flush();
        true
    }

    /// Merge settings from a JSON object. Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns an error if a known key holds a value of the wrong type.
    pub fn merge_settings_json(&mut self, value: &serde_json::Value) -> Result<bool> {
        let patch = GridSettingsPatch::from_json(value)?;
        Ok(self.merge_settings(&patch))
    }

    /// The surface changed size.
    pub fn surface_resized(&mut self) {
        self.layout.invalidate_all();
        self.flush();
    }

    /// Replace the subgrid stack.
    pub fn set_subgrids(&mut self, subgrids: Vec<Rc<dyn Subgrid>>) {
        self.subgrids = subgrids;
        self.layout.all_items_changed(Axis::Vertical);
        self.flush();
    }

    // ------------------------------------------------------------------
    // Schema notifications
    // ------------------------------------------------------------------

    pub fn begin_schema_change(&mut self) {
        self.columns.begin_schema_change();
    }

    /// # Errors
    /// Returns an error without a matching `begin_schema_change`.
    pub fn end_schema_change(&mut self) -> Result<()> {
        let result = self.columns.end_schema_change(&self.schema.fields());
        self.flush();
        result
    }

    /// `count` fields were inserted at field index `index`.
    ///
    /// # Errors
    /// Returns an error if the schema is inconsistent with the notification.
    pub fn fields_inserted(&mut self, index: usize, count: usize) -> Result<()> {
        let result = self.columns.fields_inserted(&self.schema.fields(), index, count);
        self.flush();
        result
    }

    /// `count` fields were deleted at field index `index`.
    ///
    /// # Errors
    /// Returns an error if the schema is inconsistent with the notification.
    pub fn fields_deleted(&mut self, index: usize, count: usize) -> Result<()> {
        let result = self.columns.fields_deleted(&self.schema.fields(), index, count);
        self.flush();
        result
    }

    /// # Errors
    /// Propagates column manager errors.
    pub fn all_fields_deleted(&mut self) -> Result<()> {
        let result = self.columns.all_fields_deleted();
        self.flush();
        result
    }

    /// The field list was replaced wholesale.
    ///
    /// # Errors
    /// Returns an error if the new field indices are inconsistent.
    pub fn schema_changed(&mut self) -> Result<()> {
        let result = self.columns.schema_changed(&self.schema.fields());
        self.flush();
        result
    }

    // ------------------------------------------------------------------
    // Row notifications
    // ------------------------------------------------------------------

    fn is_main_subgrid(&self, subgrid_index: usize) -> bool {
        self.subgrids
            .get(subgrid_index)
            .is_some_and(|subgrid| subgrid.role().is_main())
    }

    fn rows_notification(&mut self, subgrid_index: usize, action: InvalidateAction, main: impl FnOnce(&mut ViewLayout)) {
        if self.is_main_subgrid(subgrid_index) {
            main(&mut self.layout);
        } else {
            self.layout.invalidate(InvalidateScope::Vertical, action, true);
        }
        self.flush();
    }

    pub fn rows_inserted(&mut self, subgrid_index: usize, index: usize, count: usize) {
        self.rows_notification(
            subgrid_index,
            InvalidateAction::DataRangeInserted { index, count },
            |layout| layout.items_inserted(Axis::Vertical, index, count),
        );
    }

    pub fn rows_deleted(&mut self, subgrid_index: usize, index: usize, count: usize) {
        self.rows_notification(
            subgrid_index,
            InvalidateAction::DataRangeDeleted { index, count },
            |layout| layout.items_deleted(Axis::Vertical, index, count),
        );
    }

    pub fn rows_moved(&mut self, subgrid_index: usize, old_index: usize, new_index: usize, count: usize) {
        self.rows_notification(
            subgrid_index,
            InvalidateAction::DataRangeMoved {
                old_index,
                new_index,
                count,
            },
            |layout| layout.items_moved(Axis::Vertical, old_index, new_index, count),
        );
    }

    pub fn all_rows_deleted(&mut self, subgrid_index: usize) {
        self.rows_notification(subgrid_index, InvalidateAction::AllDeleted, |layout| {
            layout.all_items_deleted(Axis::Vertical);
        });
    }

    /// Row values or heights changed without a structural change.
    pub fn rows_changed(&mut self, subgrid_index: usize) {
        self.rows_notification(subgrid_index, InvalidateAction::AllChanged, |layout| {
            layout.all_items_changed(Axis::Vertical);
        });
    }

    // ------------------------------------------------------------------
    // Render tick
    // ------------------------------------------------------------------

    /// Whether geometry is stale and a frame should be requested.
    pub fn is_render_pending(&self) -> bool {
        !self.layout.is_valid()
    }

    /// Bring the layout up to date without painting.
    ///
    /// # Errors
    /// Returns an assertion error if the layout state is inconsistent.
    pub fn ensure_computed(&mut self) -> Result<()> {
        let (layout, ctx) = self.layout_parts();
        let result = layout.ensure_computed(&ctx);
        self.flush();
        result
    }

    /// One render tick: compute what is stale, then hand every visible cell
    /// to `painter`. Scroller updates raised during the tick are deferred to
    /// [`run_deferred`](Self::run_deferred).
    ///
    /// # Errors
    /// Returns an assertion error if the layout state is inconsistent.
    pub fn animation_frame(&mut self, painter: &mut dyn CellPainter) -> Result<()> {
        self.frame = FrameContext::InsideAnimationFrame;
        let result = self.paint_cells(painter);
        self.flush();
        self.frame = FrameContext::OutsideAnimationFrame;
        result
    }

    fn paint_cells(&mut self, painter: &mut dyn CellPainter) -> Result<()> {
        let (layout, ctx) = self.layout_parts();
        let cells = layout.cell_pool(&ctx, CellPoolOrder::RowColumn)?;
        let preferred = collect_preferred_widths(cells, painter);
        if !preferred.is_empty() {
            self.columns.set_preferred_widths_and_auto_size(&preferred, true);
        }
        Ok(())
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Run tasks deferred by the last render tick. Scroller states whose
    /// dimension has recomputed since are dropped; a state reported directly
    /// outside the tick has already cancelled its axis. Returns how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        for (axis, state) in self.deferred.take() {
            if state.compute_id != self.layout.dimension(axis).compute_id() {
                tracing::trace!(?axis, compute_id = state.compute_id, "dropping stale scroller update");
                continue;
            }
            tracing::trace!(?axis, compute_id = state.compute_id, "running deferred scroller update");
            self.events.dispatch(&GridEvent::ScrollerChanged(state));
            ran += 1;
        }
        ran
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    pub fn find_column_at_x(&self, x: i32) -> Option<ViewLayoutColumn> {
        self.layout.find_column_at_x(x).copied()
    }

    pub fn find_row_at_y(&self, y: i32) -> Option<ViewLayoutRow> {
        self.layout.find_row_at_y(y).copied()
    }

    /// Cell under a surface point, computing the layout if needed.
    ///
    /// # Errors
    /// Returns an assertion error if the layout state is inconsistent.
    pub fn find_cell_at_point(&mut self, x: i32, y: i32) -> Result<Option<ViewCell>> {
        let (layout, ctx) = self.layout_parts();
        let result = layout
            .ensure_computed(&ctx)
            .and_then(|()| layout.find_cell_at_point(Some(&ctx), x, y).map(|cell| cell.cloned()));
        self.flush();
        result
    }

    // ------------------------------------------------------------------
    // Notification plumbing
    // ------------------------------------------------------------------

    fn flush(&mut self) {
        for notification in self.columns.drain_notifications() {
            self.apply_columns_notification(notification);
        }
        for event in self.layout.drain_events() {
            let event = match event {
                LayoutEvent::ScrollerComputed(state) if self.frame.is_inside() => {
                    self.deferred.schedule(state.axis, state);
                    continue;
                }
                LayoutEvent::ScrollerComputed(state) => {
                    if self.deferred.cancel(&state.axis).is_some() {
                        tracing::trace!(axis = ?state.axis, "deferred scroller update superseded");
                    }
                    GridEvent::ScrollerChanged(state)
                }
                LayoutEvent::Invalidated(action) => GridEvent::LayoutInvalidated(action),
                LayoutEvent::ColumnsViewWidthsChanged(change) => GridEvent::ColumnsViewWidthsChanged(change),
                LayoutEvent::CellPoolComputed(order) => GridEvent::CellPoolComputed(order),
            };
            self.events.dispatch(&event);
        }
    }

    fn apply_columns_notification(&mut self, notification: ColumnsNotification) {
        match notification {
            ColumnsNotification::ActiveListChanged {
                change,
                index,
                count,
                target_index,
                ui,
            } => {
                match change {
                    ActiveListChange::Insert => self.layout.items_inserted(Axis::Horizontal, index, count),
                    ActiveListChange::Remove => self.layout.items_deleted(Axis::Horizontal, index, count),
                    ActiveListChange::Move => {
                        let new_index = target_index.unwrap_or(index);
                        self.layout.items_moved(Axis::Horizontal, index, new_index, count);
                    }
                    ActiveListChange::Swap | ActiveListChange::Set => {
                        self.layout.all_items_changed(Axis::Horizontal);
                    }
                    ActiveListChange::Clear => self.layout.all_items_deleted(Axis::Horizontal),
                }
                self.events.dispatch(&GridEvent::ActiveColumnListChanged {
                    change,
                    index,
                    count,
                    target_index,
                    ui,
                });
            }
            ColumnsNotification::WidthsChanged { field_indices, ui } => {
                self.events
                    .dispatch(&GridEvent::ColumnsWidthChanged { field_indices, ui });
            }
            ColumnsNotification::InvalidateLayout => {
                self.layout
                    .invalidate(InvalidateScope::Horizontal, InvalidateAction::All, true);
            }
        }
    }
}
