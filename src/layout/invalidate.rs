use serde::Serialize;

/// Reason a part of the layout was invalidated.
///
/// The axis and whether the scroll dimension is also invalidated decide how
/// much work the next compute does; the action itself is reported to
/// listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum InvalidateAction {
    All,
    DataRangeInserted { index: usize, count: usize },
    DataRangeInsertedButViewNotAffected { index: usize, count: usize },
    DataRangeDeleted { index: usize, count: usize },
    DataRangeDeletedButViewNotAffected { index: usize, count: usize },
    ActiveRangeDeleted { index: usize, count: usize },
    AllDeleted,
    DataRangeMoved { old_index: usize, new_index: usize, count: usize },
    AllChanged,
}

impl InvalidateAction {
    /// Whether the visible geometry is unaffected.
    pub fn is_view_not_affected(&self) -> bool {
        matches!(
            self,
            Self::DataRangeInsertedButViewNotAffected { .. }
                | Self::DataRangeDeletedButViewNotAffected { .. }
        )
    }
}

/// Axes touched by an invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidateScope {
    Horizontal,
    Vertical,
    Both,
}

impl InvalidateScope {
    pub fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}
