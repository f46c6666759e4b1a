//! Rendering seam.
//!
//! This module provides:
//! - The cell painter trait implemented by the host
//! - Preferred-width collection for auto-sizing columns

mod painter;

pub use painter::CellPainter;
pub(crate) use painter::collect_preferred_widths;
