//! Viewport virtualization: which columns and rows are visible and where.
//!
//! This module handles:
//! - Mapping scroll positions to anchors per axis ([`ScrollDimension`])
//! - Computing visible column and row geometry ([`ViewLayout`])
//! - Reusable per-cell descriptors for painting (cell pools)
//! - Binary search for column, row and cell lookup at surface coordinates

mod cell_pool;
mod invalidate;
mod items;
mod scroll_dimension;
mod view_layout;

pub use cell_pool::{CellPoolOrder, ViewCell};
pub use invalidate::{InvalidateAction, InvalidateScope};
pub use items::{ColumnsViewWidths, ColumnsViewWidthsChange, ViewLayoutColumn, ViewLayoutGap, ViewLayoutRow};
pub use scroll_dimension::{
    AxisSource, DimensionState, ScrollAnchor, ScrollDimension, ScrollerState, ViewportCoverageExtent,
};
pub use view_layout::{LayoutContext, LayoutEvent, ScrollRequest, ViewLayout};
