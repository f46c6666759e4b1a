//! Grid-wide settings consumed read-only by the layout engine.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::deserialize_present;
use crate::error::Result;

/// Grid-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    /// Number of leading active columns pinned to the start edge.
    pub fixed_column_count: usize,
    /// Number of leading main-subgrid rows pinned to the top.
    pub fixed_row_count: usize,
    /// Lower bound for every column width.
    pub minimum_column_width: i32,
    /// Upper bound for every column width (`None` = unbounded).
    pub maximum_column_width: Option<i32>,
    /// Upper bound applied when adopting a painter's preferred width.
    pub column_auto_sizing_max: Option<i32>,
    /// Width of the lines between columns.
    pub vertical_grid_lines_width: i32,
    /// Height of the lines between rows.
    pub horizontal_grid_lines_width: i32,
    /// Width of the line separating fixed and scrollable columns.
    /// Falls back to `vertical_grid_lines_width`.
    pub vertical_fixed_line_width: Option<i32>,
    /// Height of the line separating fixed and scrollable rows.
    /// Falls back to `horizontal_grid_lines_width`.
    pub horizontal_fixed_line_width: Option<i32>,
    /// Scrollable columns are aligned to the right edge of the surface.
    pub grid_right_aligned: bool,
    /// Allow partially scrolled leading columns.
    pub scroll_horizontally_smoothly: bool,
    /// Allow partially scrolled leading rows.
    pub scroll_vertically_smoothly: bool,
    /// Shrink the visible width of a boundary column cut by the surface edge.
    pub visible_column_width_adjust: bool,
    /// Width given to newly created columns.
    pub default_column_width: i32,
    /// Whether newly created columns auto-size.
    pub default_column_auto_sizing: bool,
    /// Showing an already visible column adds a second slot instead of moving it.
    pub allow_duplicate_columns: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            fixed_column_count: 0,
            fixed_row_count: 0,
            minimum_column_width: 5,
            maximum_column_width: None,
            column_auto_sizing_max: None,
            vertical_grid_lines_width: 1,
            horizontal_grid_lines_width: 1,
            vertical_fixed_line_width: None,
            horizontal_fixed_line_width: None,
            grid_right_aligned: false,
            scroll_horizontally_smoothly: true,
            scroll_vertically_smoothly: false,
            visible_column_width_adjust: true,
            default_column_width: 100,
            default_column_auto_sizing: true,
            allow_duplicate_columns: false,
        }
    }
}

impl GridSettings {
    /// Effective width of the line after the last fixed column.
    pub fn effective_vertical_fixed_line_width(&self) -> i32 {
        self.vertical_fixed_line_width
            .unwrap_or(self.vertical_grid_lines_width)
    }

    /// Effective height of the line after the last fixed row.
    pub fn effective_horizontal_fixed_line_width(&self) -> i32 {
        self.horizontal_fixed_line_width
            .unwrap_or(self.horizontal_grid_lines_width)
    }

    /// Apply a patch, touching only the fields it sets.
    ///
    /// Returns which parts of the layout are affected by the fields that
    /// actually changed value.
    pub fn merge(&mut self, patch: &GridSettingsPatch) -> SettingsChanges {
        let mut changes = SettingsChanges::default();

        macro_rules! merge {
            ($field:ident, $($flag:ident),+) => {
                if let Some(value) = patch.$field {
                    if self.$field != value {
                        self.$field = value;
                        $(changes.$flag = true;)+
                    }
                }
            };
        }

        merge!(fixed_column_count, horizontal);
        merge!(fixed_row_count, vertical);
        merge!(minimum_column_width, horizontal, column_settings);
        merge!(maximum_column_width, horizontal, column_settings);
        merge!(column_auto_sizing_max, horizontal, column_settings);
        merge!(vertical_grid_lines_width, horizontal);
        merge!(horizontal_grid_lines_width, vertical);
        merge!(vertical_fixed_line_width, horizontal);
        merge!(horizontal_fixed_line_width, vertical);
        merge!(grid_right_aligned, horizontal);
        merge!(scroll_horizontally_smoothly, horizontal);
        merge!(scroll_vertically_smoothly, vertical);
        merge!(visible_column_width_adjust, horizontal);
        merge!(default_column_width, column_settings);
        merge!(default_column_auto_sizing, column_settings);
        merge!(allow_duplicate_columns, other);

        changes
    }
}

/// Which parts of the layout a settings merge affected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChanges {
    /// Column geometry and the horizontal scroll dimension.
    pub horizontal: bool,
    /// Row geometry and the vertical scroll dimension.
    pub vertical: bool,
    /// Per-column settings derived from the grid settings.
    pub column_settings: bool,
    /// Settings with no geometric effect.
    pub other: bool,
}

impl SettingsChanges {
    /// Whether anything changed.
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical || self.column_settings || self.other
    }
}

/// Partial grid settings. Absent fields are left unchanged by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettingsPatch {
    pub fixed_column_count: Option<usize>,
    pub fixed_row_count: Option<usize>,
    pub minimum_column_width: Option<i32>,
    #[serde(deserialize_with = "deserialize_present")]
    pub maximum_column_width: Option<Option<i32>>,
    #[serde(deserialize_with = "deserialize_present")]
    pub column_auto_sizing_max: Option<Option<i32>>,
    pub vertical_grid_lines_width: Option<i32>,
    pub horizontal_grid_lines_width: Option<i32>,
    #[serde(deserialize_with = "deserialize_present")]
    pub vertical_fixed_line_width: Option<Option<i32>>,
    #[serde(deserialize_with = "deserialize_present")]
    pub horizontal_fixed_line_width: Option<Option<i32>>,
    pub grid_right_aligned: Option<bool>,
    pub scroll_horizontally_smoothly: Option<bool>,
    pub scroll_vertically_smoothly: Option<bool>,
    pub visible_column_width_adjust: Option<bool>,
    pub default_column_width: Option<i32>,
    pub default_column_auto_sizing: Option<bool>,
    pub allow_duplicate_columns: Option<bool>,
}

/// JSON keys understood by [`GridSettingsPatch`].
const KNOWN_KEYS: &[&str] = &[
    "fixedColumnCount",
    "fixedRowCount",
    "minimumColumnWidth",
    "maximumColumnWidth",
    "columnAutoSizingMax",
    "verticalGridLinesWidth",
    "horizontalGridLinesWidth",
    "verticalFixedLineWidth",
    "horizontalFixedLineWidth",
    "gridRightAligned",
    "scrollHorizontallySmoothly",
    "scrollVerticallySmoothly",
    "visibleColumnWidthAdjust",
    "defaultColumnWidth",
    "defaultColumnAutoSizing",
    "allowDuplicateColumns",
];

impl GridSettingsPatch {
    /// Build a patch from a JSON object.
    ///
    /// Unknown keys are ignored (and logged); they are never copied anywhere.
    ///
    /// # Errors
    /// Returns an error if a known key holds a value of the wrong type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if let Some(object) = value.as_object() {
            for key in object.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    warn!(key = key.as_str(), "ignoring unknown grid setting");
                }
            }
        }
        Ok(Self::deserialize(value)?)
    }
}
