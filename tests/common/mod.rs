//! Common test utilities for building grids.
//!
//! `GridBuilder` wires a `GridView` to in-memory schema, subgrid and surface
//! implementations and records every dispatched event.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridview::columns::ColumnsManager;
use gridview::host::{FixedSurface, RenderingSurface};
use gridview::layout::{ViewLayoutColumn, ViewLayoutRow};
use gridview::settings::GridSettings;
use gridview::types::{Field, SchemaServer, StaticSchema, StaticSubgrid, Subgrid, SubgridRole};
use gridview::viewer::{GridEvent, GridView};

// ============================================================================
// Names and columns
// ============================================================================

/// `f0`, `f1`, ...
pub fn field_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("f{i}")).collect()
}

/// Manager with one column per width, all active, widths set explicitly.
pub fn manager_with_widths(settings: &GridSettings, widths: &[f64]) -> ColumnsManager {
    let mut manager = ColumnsManager::new(settings);
    manager
        .create_columns(&Field::from_names(field_names(widths.len())))
        .unwrap();
    let widths: Vec<(usize, f64)> = widths.iter().copied().enumerate().collect();
    manager.set_column_widths(&widths, false).unwrap();
    manager.drain_notifications();
    manager
}

/// `(active index, left, right_plus_1)` per visible column.
pub fn column_spans(columns: &[ViewLayoutColumn]) -> Vec<(usize, i32, i32)> {
    columns
        .iter()
        .map(|c| (c.active_column_index, c.left, c.right_plus_1))
        .collect()
}

/// `(subgrid index, row index, top, bottom_plus_1)` per visible row.
pub fn row_spans(rows: &[ViewLayoutRow]) -> Vec<(usize, usize, i32, i32)> {
    rows.iter()
        .map(|r| (r.subgrid_index, r.subgrid_row_index, r.top, r.bottom_plus_1))
        .collect()
}

// ============================================================================
// Grid builder
// ============================================================================

pub struct TestGrid {
    pub grid: GridView,
    pub schema: Rc<StaticSchema>,
    pub subgrids: Vec<Rc<StaticSubgrid>>,
    pub surface: Rc<FixedSurface>,
    pub events: Rc<RefCell<Vec<GridEvent>>>,
}

impl TestGrid {
    /// Index of the main subgrid in the stack.
    pub fn main_index(&self) -> usize {
        self.subgrids
            .iter()
            .position(|s| s.role().is_main())
            .unwrap()
    }

    pub fn main(&self) -> &Rc<StaticSubgrid> {
        &self.subgrids[self.main_index()]
    }

    pub fn take_events(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn compute(&mut self) {
        self.grid.ensure_computed().unwrap();
    }
}

pub struct GridBuilder {
    settings: GridSettings,
    widths: Vec<f64>,
    subgrids: Vec<(SubgridRole, usize, i32)>,
    size: (i32, i32),
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {
            settings: GridSettings::default(),
            widths: vec![100.0; 4],
            subgrids: Vec::new(),
            size: (200, 100),
        }
    }

    pub fn settings(mut self, update: impl FnOnce(&mut GridSettings)) -> Self {
        update(&mut self.settings);
        self
    }

    /// One field per width; widths are set explicitly after creation.
    pub fn widths(mut self, widths: &[f64]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    pub fn subgrid(mut self, role: SubgridRole, rows: usize, row_height: i32) -> Self {
        self.subgrids.push((role, rows, row_height));
        self
    }

    pub fn surface(mut self, width: i32, height: i32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn build(self) -> TestGrid {
        let schema = Rc::new(StaticSchema::new(field_names(self.widths.len())));
        let specs = if self.subgrids.is_empty() {
            vec![(SubgridRole::Main, 10, 20)]
        } else {
            self.subgrids
        };
        let subgrids: Vec<Rc<StaticSubgrid>> = specs
            .into_iter()
            .map(|(role, rows, height)| Rc::new(StaticSubgrid::new(role, rows, height)))
            .collect();
        let dyn_subgrids: Vec<Rc<dyn Subgrid>> = subgrids
            .iter()
            .map(|s| Rc::clone(s) as Rc<dyn Subgrid>)
            .collect();
        let surface = Rc::new(FixedSurface::new(self.size.0, self.size.1));

        let mut grid = GridView::new(
            self.settings,
            Rc::clone(&schema) as Rc<dyn SchemaServer>,
            dyn_subgrids,
            Rc::clone(&surface) as Rc<dyn RenderingSurface>,
        )
        .unwrap();
        let widths: Vec<(usize, f64)> = self.widths.iter().copied().enumerate().collect();
        grid.update_columns(|columns| columns.set_column_widths(&widths, false))
            .unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        grid.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        TestGrid {
            grid,
            schema,
            subgrids,
            surface,
            events,
        }
    }
}
