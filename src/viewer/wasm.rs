//! WASM-exported façade over a `<canvas>`.
//!
//! Grid events are queued while the grid is borrowed and handed to the JS
//! listener afterwards, so the listener may call back into the view.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::{GridEvent, GridView};
use crate::host::{floor_px, CanvasSurface};
use crate::layout::ViewCell;
use crate::settings::GridSettings;
use crate::types::{SchemaServer, StaticSchema, StaticSubgrid, Subgrid, SubgridRole};

/// Position of the main subgrid in the stack the façade builds.
const MAIN_SUBGRID: usize = 0;

struct Shared {
    grid: RefCell<GridView>,
    pending: RefCell<Vec<GridEvent>>,
    listener: RefCell<Option<Function>>,
    deferred_closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Shared {
    /// Hand queued events to the JS listener. No grid borrow may be held.
    fn deliver_events(&self) {
        let events = std::mem::take(&mut *self.pending.borrow_mut());
        let Some(listener) = self.listener.borrow().clone() else {
            return;
        };
        for event in events {
            match serde_wasm_bindgen::to_value(&event) {
                Ok(value) => {
                    if let Err(err) = listener.call1(&JsValue::NULL, &value) {
                        tracing::warn!(?err, "grid event listener threw");
                    }
                }
                Err(err) => tracing::warn!(%err, "failed to serialize grid event"),
            }
        }
    }

    fn schedule_deferred(self: &Rc<Self>) {
        if !self.grid.borrow().has_deferred() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut slot = self.deferred_closure.borrow_mut();
        if slot.is_none() {
            let weak: Weak<Self> = Rc::downgrade(self);
            *slot = Some(Closure::wrap(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.grid.borrow_mut().run_deferred();
                    shared.deliver_events();
                }
            }) as Box<dyn FnMut()>));
        }
        if let Some(callback) = slot.as_ref() {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), 0)
                .is_err()
            {
                tracing::warn!("failed to schedule deferred grid work");
            }
        }
    }
}

#[wasm_bindgen]
pub struct WasmGridView {
    shared: Rc<Shared>,
    schema: Rc<StaticSchema>,
    main: Rc<StaticSubgrid>,
}

#[wasm_bindgen]
impl WasmGridView {
    /// Create a grid on `canvas` with an empty schema and an empty main
    /// subgrid of `row_height` pixel rows.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, row_height: i32) -> Result<WasmGridView, JsValue> {
        console_error_panic_hook::set_once();

        let schema = Rc::new(StaticSchema::default());
        let main = Rc::new(StaticSubgrid::new(SubgridRole::Main, 0, row_height));
        let subgrids: Vec<Rc<dyn Subgrid>> = vec![Rc::clone(&main) as Rc<dyn Subgrid>];
        let surface = Rc::new(CanvasSurface::new(canvas));
        let mut grid = GridView::new(
            GridSettings::default(),
            Rc::clone(&schema) as Rc<dyn SchemaServer>,
            subgrids,
            surface,
        )?;

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            grid.subscribe(Box::new(move |event| {
                if let Some(shared) = weak.upgrade() {
                    shared.pending.borrow_mut().push(event.clone());
                }
            }));
            Shared {
                grid: RefCell::new(grid),
                pending: RefCell::new(Vec::new()),
                listener: RefCell::new(None),
                deferred_closure: RefCell::new(None),
            }
        });
        Ok(WasmGridView { shared, schema, main })
    }

    fn with_grid<R>(&self, f: impl FnOnce(&mut GridView) -> R) -> R {
        let result = f(&mut self.shared.grid.borrow_mut());
        self.shared.deliver_events();
        result
    }

    /// Listener receiving every grid event as a JS object.
    #[wasm_bindgen(js_name = "setEventListener")]
    pub fn set_event_listener(&mut self, listener: Option<Function>) {
        *self.shared.listener.borrow_mut() = listener;
    }

    /// Merge a settings object. Unknown keys are ignored.
    #[wasm_bindgen(js_name = "setSettings")]
    pub fn set_settings(&mut self, settings: JsValue) -> Result<bool, JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(settings)?;
        Ok(self.with_grid(|grid| grid.merge_settings_json(&value))?)
    }

    /// Replace the field list.
    #[wasm_bindgen(js_name = "setFields")]
    pub fn set_fields(&mut self, names: Vec<String>) -> Result<(), JsValue> {
        self.schema.set_field_names(names);
        Ok(self.with_grid(GridView::schema_changed)?)
    }

    #[wasm_bindgen(js_name = "setMainRowCount")]
    pub fn set_main_row_count(&mut self, count: usize) {
        self.main.set_row_count(count);
        self.with_grid(|grid| grid.rows_changed(MAIN_SUBGRID));
    }

    #[wasm_bindgen(js_name = "surfaceResized")]
    pub fn surface_resized(&mut self) {
        self.with_grid(GridView::surface_resized);
    }

    #[wasm_bindgen(js_name = "scrollColumnsTo")]
    pub fn scroll_columns_to(&mut self, index: usize, offset: i32) -> Result<bool, JsValue> {
        Ok(self.with_grid(|grid| grid.scroll_columns_to(index, offset))?)
    }

    #[wasm_bindgen(js_name = "scrollRowsTo")]
    pub fn scroll_rows_to(&mut self, index: usize, offset: i32) -> Result<bool, JsValue> {
        Ok(self.with_grid(|grid| grid.scroll_rows_to(index, offset))?)
    }

    #[wasm_bindgen(js_name = "isRenderPending")]
    pub fn is_render_pending(&self) -> bool {
        self.shared.grid.borrow().is_render_pending()
    }

    /// Run one render tick, calling `paint(cell)` for every visible cell.
    /// A numeric return value is taken as the cell's preferred width.
    #[wasm_bindgen(js_name = "animationFrame")]
    pub fn animation_frame(&mut self, paint: &Function) -> Result<(), JsValue> {
        let mut painter = |cell: &mut ViewCell| {
            let value = serde_wasm_bindgen::to_value(&*cell).ok()?;
            let width = paint.call1(&JsValue::NULL, &value).ok()?.as_f64()?;
            Some(floor_px(width))
        };
        self.with_grid(|grid| grid.animation_frame(&mut painter))?;
        self.shared.schedule_deferred();
        Ok(())
    }

    #[wasm_bindgen(js_name = "visibleColumns")]
    pub fn visible_columns(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.shared.grid.borrow().visible_columns())?)
    }

    #[wasm_bindgen(js_name = "visibleRows")]
    pub fn visible_rows(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.shared.grid.borrow().visible_rows())?)
    }

    /// Cell under a canvas point, or `undefined`.
    #[wasm_bindgen(js_name = "hitTest")]
    pub fn hit_test(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let cell = self.with_grid(|grid| grid.find_cell_at_point(floor_px(x), floor_px(y)))?;
        match cell {
            Some(cell) => Ok(serde_wasm_bindgen::to_value(&cell)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}
