//! Per-column settings.

use serde::{Deserialize, Serialize};

use super::{clamp_width, GridSettings, GridSettingsPatch};

/// Settings resolved for one column.
///
/// Created by the "new settings for field" factory handed to
/// [`ColumnsManager`](crate::columns::ColumnsManager); the default factory
/// copies the relevant grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSettings {
    pub minimum_width: i32,
    pub maximum_width: Option<i32>,
    pub auto_sizing_max: Option<i32>,
    pub default_width: i32,
    pub default_auto_sizing: bool,
}

impl ColumnSettings {
    /// Derive column settings from the grid settings.
    pub fn from_grid(settings: &GridSettings) -> Self {
        Self {
            minimum_width: settings.minimum_column_width,
            maximum_width: settings.maximum_column_width,
            auto_sizing_max: settings.column_auto_sizing_max,
            default_width: settings.default_column_width,
            default_auto_sizing: settings.default_column_auto_sizing,
        }
    }

    /// Clamp a width into `[minimum_width, maximum_width]`.
    pub fn clamp_width(&self, width: i32) -> i32 {
        clamp_width(width, self.minimum_width, self.maximum_width)
    }

    /// Apply a patch. Returns `true` if any field changed.
    pub fn merge(&mut self, patch: &ColumnSettingsPatch) -> bool {
        let before = *self;
        if let Some(value) = patch.minimum_width {
            self.minimum_width = value;
        }
        if let Some(value) = patch.maximum_width {
            self.maximum_width = value;
        }
        if let Some(value) = patch.auto_sizing_max {
            self.auto_sizing_max = value;
        }
        if let Some(value) = patch.default_width {
            self.default_width = value;
        }
        if let Some(value) = patch.default_auto_sizing {
            self.default_auto_sizing = value;
        }
        before != *self
    }
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self::from_grid(&GridSettings::default())
    }
}

/// Partial column settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSettingsPatch {
    pub minimum_width: Option<i32>,
    pub maximum_width: Option<Option<i32>>,
    pub auto_sizing_max: Option<Option<i32>>,
    pub default_width: Option<i32>,
    pub default_auto_sizing: Option<bool>,
}

impl ColumnSettingsPatch {
    /// Whether the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&GridSettingsPatch> for ColumnSettingsPatch {
    fn from(patch: &GridSettingsPatch) -> Self {
        Self {
            minimum_width: patch.minimum_column_width,
            maximum_width: patch.maximum_column_width,
            auto_sizing_max: patch.column_auto_sizing_max,
            default_width: patch.default_column_width,
            default_auto_sizing: patch.default_column_auto_sizing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports_change_only_when_value_differs() {
        let mut settings = ColumnSettings::default();
        let same = ColumnSettingsPatch {
            minimum_width: Some(settings.minimum_width),
            ..Default::default()
        };
        assert!(!settings.merge(&same));

        let wider = ColumnSettingsPatch {
            maximum_width: Some(Some(250)),
            ..Default::default()
        };
        assert!(settings.merge(&wider));
        assert_eq!(settings.maximum_width, Some(250));
        assert_eq!(settings.clamp_width(400), 250);
    }

    #[test]
    fn test_patch_from_grid_patch_ignores_non_column_fields() {
        let grid_patch = GridSettingsPatch {
            fixed_column_count: Some(3),
            ..Default::default()
        };
        assert!(ColumnSettingsPatch::from(&grid_patch).is_empty());
    }
}
