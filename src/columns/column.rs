//! One column's width and auto-sizing state.

use crate::settings::{ColumnSettings, ColumnSettingsPatch};
use crate::types::Field;

/// Result of [`Column::set_width`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthUpdate {
    /// Width and auto-sizing were already in the requested state.
    Unchanged,
    /// Width changed. `notify` is `true` when listeners should receive a
    /// width-changed notification, `false` when only the layout needs to be
    /// invalidated.
    Changed { notify: bool },
}

impl WidthUpdate {
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Presentation of one schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    field: Field,
    settings: ColumnSettings,
    width: i32,
    auto_sizing: bool,
    preferred_width: Option<i32>,
}

impl Column {
    pub fn new(field: Field, settings: ColumnSettings) -> Self {
        let width = settings.clamp_width(settings.default_width);
        Self {
            field,
            settings,
            width,
            auto_sizing: settings.default_auto_sizing,
            preferred_width: None,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_index(&self) -> usize {
        self.field.index
    }

    pub fn field_name(&self) -> &str {
        &self.field.name
    }

    pub fn settings(&self) -> &ColumnSettings {
        &self.settings
    }

    /// Current width in pixels. Always `>= settings().minimum_width`.
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn auto_sizing(&self) -> bool {
        self.auto_sizing
    }

    /// Width last measured by a painter, if any.
    pub fn preferred_width(&self) -> Option<i32> {
        self.preferred_width
    }

    pub fn set_preferred_width(&mut self, preferred_width: Option<i32>) {
        self.preferred_width = preferred_width;
    }

    pub(crate) fn set_field_index(&mut self, index: usize) {
        self.field.index = index;
    }

    /// Set the width explicitly.
    ///
    /// The value is rounded up to a whole pixel and clamped to the column's
    /// width bounds. Auto-sizing is turned off.
    pub fn set_width(&mut self, width: f64, notify: bool) -> WidthUpdate {
        let width = self.settings.clamp_width(ceil_to_pixels(width));
        if !self.auto_sizing && width == self.width {
            return WidthUpdate::Unchanged;
        }
        self.width = width;
        self.auto_sizing = false;
        WidthUpdate::Changed { notify }
    }

    /// Toggle auto-sizing. Returns `true` if the flag changed.
    ///
    /// Turning it on drops the width to the minimum so the next auto-size pass
    /// grows it to the measured content.
    pub fn set_auto_sizing(&mut self, enabled: bool) -> bool {
        if self.auto_sizing == enabled {
            return false;
        }
        self.auto_sizing = enabled;
        if enabled {
            self.width = self.settings.minimum_width;
        }
        true
    }

    /// Adopt the preferred width. Returns `true` if the width changed.
    pub fn auto_size_width(&mut self, widen_only: bool) -> bool {
        let Some(preferred) = self.preferred_width else {
            return false;
        };
        if widen_only && self.width >= preferred {
            return false;
        }
        let limited = match self.settings.auto_sizing_max {
            Some(maximum) => preferred.min(maximum),
            None => preferred,
        };
        let width = self.settings.clamp_width(limited);
        if width == self.width {
            return false;
        }
        self.width = width;
        true
    }

    /// Merge a settings patch and re-clamp the width.
    ///
    /// Returns whether the settings changed and how the width moved. A
    /// re-clamp keeps auto-sizing and is not reported to width listeners.
    pub(crate) fn merge_settings(&mut self, patch: &ColumnSettingsPatch) -> (bool, WidthUpdate) {
        if !self.settings.merge(patch) {
            return (false, WidthUpdate::Unchanged);
        }
        let width = self.settings.clamp_width(self.width);
        if width == self.width {
            return (true, WidthUpdate::Unchanged);
        }
        self.width = width;
        (true, WidthUpdate::Changed { notify: false })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn ceil_to_pixels(width: f64) -> i32 {
    if width.is_nan() {
        return 0;
    }
    // `as` saturates at the i32 bounds.
    width.ceil() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> Column {
        let settings = ColumnSettings {
            minimum_width: 10,
            maximum_width: Some(300),
            auto_sizing_max: Some(200),
            default_width: 80,
            default_auto_sizing: false,
        };
        Column::new(Field::new("a", 0), settings)
    }

    #[test]
    fn test_set_width_rounds_up_and_clamps() {
        let mut col = column();
        assert_eq!(col.set_width(50.2, true), WidthUpdate::Changed { notify: true });
        assert_eq!(col.width(), 51);
        col.set_width(2.0, true);
        assert_eq!(col.width(), 10);
        col.set_width(1e12, false);
        assert_eq!(col.width(), 300);
    }

    #[test]
    fn test_set_width_twice_is_unchanged() {
        let mut col = column();
        assert!(col.set_width(120.0, true).is_changed());
        assert_eq!(col.set_width(120.0, true), WidthUpdate::Unchanged);
    }

    #[test]
    fn test_set_width_same_value_while_auto_sizing_turns_it_off() {
        let mut col = column();
        col.set_auto_sizing(true);
        assert!(col.set_width(10.0, false).is_changed());
        assert!(!col.auto_sizing());
    }

    #[test]
    fn test_auto_sizing_on_resets_to_minimum() {
        let mut col = column();
        assert!(col.set_auto_sizing(true));
        assert_eq!(col.width(), 10);
        assert!(!col.set_auto_sizing(true));
        assert!(col.set_auto_sizing(false));
        assert_eq!(col.width(), 10);
    }

    #[test]
    fn test_auto_size_widen_only_refuses_to_shrink() {
        let mut col = column();
        col.set_preferred_width(Some(60));
        assert!(!col.auto_size_width(true));
        assert_eq!(col.width(), 80);
        assert!(col.auto_size_width(false));
        assert_eq!(col.width(), 60);
    }

    #[test]
    fn test_auto_size_respects_auto_sizing_max() {
        let mut col = column();
        col.set_preferred_width(Some(260));
        assert!(col.auto_size_width(true));
        assert_eq!(col.width(), 200);
    }

    #[test]
    fn test_auto_size_without_preferred_width_is_noop() {
        let mut col = column();
        assert!(!col.auto_size_width(false));
    }

    #[test]
    fn test_merge_settings_reclamps() {
        let mut col = column();
        let patch = ColumnSettingsPatch {
            maximum_width: Some(Some(50)),
            ..Default::default()
        };
        assert_eq!(col.merge_settings(&patch), (true, WidthUpdate::Changed { notify: false }));
        assert_eq!(col.width(), 50);
        assert_eq!(col.merge_settings(&patch), (false, WidthUpdate::Unchanged));
    }
}
