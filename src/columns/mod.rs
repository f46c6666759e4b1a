//! Column identity, ordering and sizing.
//!
//! [`ColumnsManager`] keeps one [`Column`] per schema field plus the ordered
//! list of active (displayed) columns, and applies the width clamping and
//! auto-sizing policy. Changes are queued as [`ColumnsNotification`]s for the
//! owning view to turn into layout invalidations and outbound events.

mod column;
mod manager;

pub use column::{Column, WidthUpdate};
pub use manager::{
    ActiveListChange, ColumnSettingsFactory, ColumnsManager, ColumnsNotification, ShowHidePosition,
};
