use std::cell::Cell;

/// Drawing surface the grid lays itself out on.
///
/// Sizes are whole pixels; fractional host sizes are floored.
pub trait RenderingSurface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
}

/// Surface with a size set by its owner. Used natively and in tests.
#[derive(Debug, Default)]
pub struct FixedSurface {
    width: Cell<i32>,
    height: Cell<i32>,
}

impl FixedSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: Cell::new(width.max(0)),
            height: Cell::new(height.max(0)),
        }
    }

    /// Change the size. The owner must invalidate the grid afterwards.
    pub fn resize(&self, width: i32, height: i32) {
        self.width.set(width.max(0));
        self.height.set(height.max(0));
    }

    /// Size from fractional CSS pixels.
    pub fn resize_fractional(&self, width: f64, height: f64) {
        self.resize(floor_px(width), floor_px(height));
    }
}

impl RenderingSurface for FixedSurface {
    fn width(&self) -> i32 {
        self.width.get()
    }

    fn height(&self) -> i32 {
        self.height.get()
    }
}

/// Floor a fractional pixel size. NaN and negatives become 0.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn floor_px(value: f64) -> i32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        // `as` saturates at i32::MAX
        value.floor() as i32
    }
}

/// `<canvas>` surface sized by its CSS box.
#[cfg(target_arch = "wasm32")]
pub struct CanvasSurface {
    canvas: web_sys::HtmlCanvasElement,
}

#[cfg(target_arch = "wasm32")]
impl CanvasSurface {
    pub fn new(canvas: web_sys::HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &web_sys::HtmlCanvasElement {
        &self.canvas
    }
}

#[cfg(target_arch = "wasm32")]
impl RenderingSurface for CanvasSurface {
    fn width(&self) -> i32 {
        self.canvas.client_width().max(0)
    }

    fn height(&self) -> i32 {
        self.canvas.client_height().max(0)
    }
}
