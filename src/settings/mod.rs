//! Grid and column settings.
//!
//! Settings are explicit structs with one field per known option. Partial
//! updates arrive as patches (one `Option` per field) and are applied by a
//! typed `merge` that touches only the enumerated fields and reports what
//! changed, so the caller can invalidate exactly the affected layout axes.

mod column_settings;
mod grid_settings;

pub use column_settings::{ColumnSettings, ColumnSettingsPatch};
pub use grid_settings::{GridSettings, GridSettingsPatch, SettingsChanges};

use serde::{Deserialize, Deserializer};

/// Deserialize a present value (including `null`) as `Some(..)`.
///
/// Used with `#[serde(default)]` on `Option<Option<T>>` patch fields so that a
/// missing key means "leave unchanged" and an explicit `null` means "clear".
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Clamp `width` into `[minimum, maximum]`, letting `minimum` win when the
/// bounds are inverted.
pub(crate) fn clamp_width(width: i32, minimum: i32, maximum: Option<i32>) -> i32 {
    let clamped = match maximum {
        Some(maximum) => width.min(maximum),
        None => width,
    };
    clamped.max(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_width_within_bounds() {
        assert_eq!(clamp_width(50, 5, Some(100)), 50);
        assert_eq!(clamp_width(1, 5, Some(100)), 5);
        assert_eq!(clamp_width(500, 5, Some(100)), 100);
        assert_eq!(clamp_width(500, 5, None), 500);
    }

    #[test]
    fn test_clamp_width_inverted_bounds_prefers_minimum() {
        assert_eq!(clamp_width(50, 80, Some(60)), 80);
    }
}
