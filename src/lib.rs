//! gridview - viewport virtualization and layout for canvas-rendered grids
//!
//! Computes which columns and rows of a large grid are visible on a drawing
//! surface, where each one is, and which cells a painter has to draw:
//! - Fixed columns and rows, with separator lines between the regions
//! - Smooth or snapping scrolling per axis, left- or right-aligned columns
//! - Header, main and footer subgrids stacked vertically
//! - Lazily recomputed geometry with reusable cell descriptors
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGridView } from 'gridview';
//! await init();
//! const grid = new WasmGridView(canvas, 20);
//! grid.setFields(['id', 'name', 'price']);
//! grid.setMainRowCount(100000);
//! grid.animationFrame((cell) => paintCell(ctx, cell));
//! ```

// Layout engine
pub mod columns;
pub mod error;
pub mod layout;
pub mod settings;
pub mod types;

// Host integration
pub mod host;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use columns::{ColumnsManager, ColumnsNotification, ShowHidePosition};
pub use error::{GridError, Result};
pub use layout::{ScrollAnchor, ScrollDimension, ViewCell, ViewLayout, ViewLayoutColumn, ViewLayoutRow};
pub use settings::{GridSettings, GridSettingsPatch};
pub use viewer::{GridEvent, GridView};

#[cfg(target_arch = "wasm32")]
pub use viewer::WasmGridView;

/// Default grid settings as a JS object.
///
/// # Errors
/// Returns an error if the settings cannot be converted.
#[wasm_bindgen(js_name = "defaultSettings")]
pub fn default_settings() -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&GridSettings::default())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
