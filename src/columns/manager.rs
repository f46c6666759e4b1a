//! Ordered column lists and the width policy applied to them.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::{Column, WidthUpdate};
use crate::error::{check_index, GridError, Result};
use crate::settings::{ColumnSettings, ColumnSettingsPatch, GridSettings};
use crate::types::Field;

/// Factory producing the settings of a newly created column.
pub type ColumnSettingsFactory = Box<dyn Fn(&Field) -> ColumnSettings>;

/// Kind of change made to the active column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActiveListChange {
    Insert,
    Remove,
    Move,
    Swap,
    Clear,
    /// Whole list replaced.
    Set,
}

/// Notification queued by [`ColumnsManager`] for its owner to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnsNotification {
    ActiveListChanged {
        change: ActiveListChange,
        index: usize,
        count: usize,
        target_index: Option<usize>,
        ui: bool,
    },
    WidthsChanged {
        field_indices: Vec<usize>,
        ui: bool,
    },
    /// Column geometry changed without a structural change to the list.
    InvalidateLayout,
}

/// Where [`ColumnsManager::show_hide_columns`] puts the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowHidePosition {
    /// Insert before this active index.
    InsertAt(usize),
    /// Hide every occurrence.
    Remove,
    /// Replace the whole active list.
    ReplaceAll,
}

#[derive(Debug, Default, Clone, Copy)]
struct SchemaChangeFlags {
    fields_inserted: bool,
    fields_deleted: bool,
    reset: bool,
}

/// Owns the field columns (one per schema field, schema order) and the active
/// columns (the displayed, reorderable selection of them).
///
/// Active columns are stored as field indices, so an active entry always
/// refers to an existing field column.
pub struct ColumnsManager {
    field_columns: Vec<Column>,
    active_columns: Vec<usize>,
    settings_factory: Option<ColumnSettingsFactory>,
    default_settings: ColumnSettings,
    fixed_column_count: usize,
    grid_line_width: i32,
    allow_duplicate_columns: bool,
    schema_change_depth: usize,
    schema_change: SchemaChangeFlags,
    notifications: Vec<ColumnsNotification>,
}

impl fmt::Debug for ColumnsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnsManager")
            .field("field_columns", &self.field_columns)
            .field("active_columns", &self.active_columns)
            .field("fixed_column_count", &self.fixed_column_count)
            .field("schema_change_depth", &self.schema_change_depth)
            .finish_non_exhaustive()
    }
}

impl ColumnsManager {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            field_columns: Vec::new(),
            active_columns: Vec::new(),
            settings_factory: None,
            default_settings: ColumnSettings::from_grid(settings),
            fixed_column_count: settings.fixed_column_count,
            grid_line_width: settings.vertical_grid_lines_width,
            allow_duplicate_columns: settings.allow_duplicate_columns,
            schema_change_depth: 0,
            schema_change: SchemaChangeFlags::default(),
            notifications: Vec::new(),
        }
    }

    /// Create a manager whose columns get their settings from `factory`.
    pub fn with_settings_factory(settings: &GridSettings, factory: ColumnSettingsFactory) -> Self {
        Self {
            settings_factory: Some(factory),
            ..Self::new(settings)
        }
    }

    /// Pick up the grid-level settings the manager reads.
    pub fn apply_grid_settings(&mut self, settings: &GridSettings) {
        self.default_settings = ColumnSettings::from_grid(settings);
        self.fixed_column_count = settings.fixed_column_count;
        self.grid_line_width = settings.vertical_grid_lines_width;
        self.allow_duplicate_columns = settings.allow_duplicate_columns;
    }

    fn new_settings_for_field(&self, field: &Field) -> ColumnSettings {
        match &self.settings_factory {
            Some(factory) => factory(field),
            None => self.default_settings,
        }
    }

    /// Take the queued notifications.
    pub fn drain_notifications(&mut self) -> Vec<ColumnsNotification> {
        std::mem::take(&mut self.notifications)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn field_columns(&self) -> &[Column] {
        &self.field_columns
    }

    pub fn field_column_count(&self) -> usize {
        self.field_columns.len()
    }

    pub fn field_column(&self, field_index: usize) -> Result<&Column> {
        self.field_columns
            .get(field_index)
            .ok_or(GridError::IndexOutOfRange {
                code: "CMFC",
                index: field_index,
                len: self.field_columns.len(),
            })
    }

    pub fn field_index_by_name(&self, name: &str) -> Result<usize> {
        self.field_columns
            .iter()
            .position(|column| column.field_name() == name)
            .ok_or_else(|| GridError::FieldNotFound {
                code: "CMFIBN",
                name: name.to_string(),
            })
    }

    /// Field indices of the active columns, in display order.
    pub fn active_field_indices(&self) -> &[usize] {
        &self.active_columns
    }

    pub fn active_column_count(&self) -> usize {
        self.active_columns.len()
    }

    pub fn active_column(&self, active_index: usize) -> Result<&Column> {
        let field_index = self.active_field_index(active_index)?;
        self.field_column(field_index)
    }

    /// Width of an active column, `None` if out of range.
    pub fn active_column_width(&self, active_index: usize) -> Option<i32> {
        self.active_columns
            .get(active_index)
            .and_then(|&field_index| self.field_columns.get(field_index))
            .map(Column::width)
    }

    pub fn active_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.active_columns
            .iter()
            .filter_map(|&field_index| self.field_columns.get(field_index))
    }

    /// First active index showing `field_index`.
    pub fn active_index_of_field(&self, field_index: usize) -> Option<usize> {
        self.active_columns.iter().position(|&f| f == field_index)
    }

    fn active_field_index(&self, active_index: usize) -> Result<usize> {
        self.active_columns
            .get(active_index)
            .copied()
            .ok_or(GridError::IndexOutOfRange {
                code: "CMAC",
                index: active_index,
                len: self.active_columns.len(),
            })
    }

    /// Number of fixed columns actually present.
    pub fn fixed_column_count(&self) -> usize {
        self.fixed_column_count.min(self.active_columns.len())
    }

    /// Width of the fixed region: fixed column widths plus the grid lines
    /// between them.
    pub fn fixed_columns_width(&self) -> i32 {
        let count = self.fixed_column_count();
        if count == 0 {
            return 0;
        }
        let widths: i32 = self.active_columns().take(count).map(Column::width).sum();
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let lines = (count - 1) as i32 * self.grid_line_width;
        widths + lines
    }

    // ------------------------------------------------------------------
    // Schema changes
    // ------------------------------------------------------------------

    /// Open a (possibly nested) schema change span.
    pub fn begin_schema_change(&mut self) {
        self.schema_change_depth += 1;
    }

    /// Close a schema change span. When the outermost span closes, a pending
    /// reset rebuilds every column from `fields`.
    pub fn end_schema_change(&mut self, fields: &[Field]) -> Result<()> {
        if self.schema_change_depth == 0 {
            return Err(GridError::UnbalancedSchemaChange);
        }
        self.schema_change_depth -= 1;
        if self.schema_change_depth > 0 {
            return Ok(());
        }
        let flags = std::mem::take(&mut self.schema_change);
        if flags.reset || self.field_columns.len() != fields.len() {
            self.create_columns(fields)?;
        } else if flags.fields_inserted || flags.fields_deleted {
            tracing::debug!(
                fields = self.field_columns.len(),
                active = self.active_columns.len(),
                "columns adjusted for schema change"
            );
        }
        Ok(())
    }

    pub fn is_in_schema_change(&self) -> bool {
        self.schema_change_depth > 0
    }

    /// `count` fields were inserted at `index`. `fields` is the new schema.
    ///
    /// Existing columns keep their state; the new columns are activated at the
    /// position of the first active column that follows them.
    pub fn fields_inserted(&mut self, fields: &[Field], index: usize, count: usize) -> Result<()> {
        self.begin_schema_change();
        let result = self.insert_field_columns(fields, index, count);
        let ended = self.end_schema_change(fields);
        result.and(ended)
    }

    fn insert_field_columns(&mut self, fields: &[Field], index: usize, count: usize) -> Result<()> {
        check_index("CMFI", index, self.field_columns.len() + 1)?;
        let new_fields = fields.get(index..index + count).ok_or_else(|| {
            GridError::assert(
                "CMFIF",
                format!("inserted fields {index}..{} missing from schema", index + count),
            )
        })?;
        let new_columns: Vec<Column> = new_fields
            .iter()
            .zip(index..)
            .map(|(field, field_index)| {
                let mut column = Column::new(field.clone(), self.new_settings_for_field(field));
                column.set_field_index(field_index);
                column
            })
            .collect();

        for column in self.field_columns.iter_mut().skip(index) {
            column.set_field_index(column.field_index() + count);
        }
        for field_index in &mut self.active_columns {
            if *field_index >= index {
                *field_index += count;
            }
        }
        let tail = self.field_columns.split_off(index);
        self.field_columns.extend(new_columns);
        self.field_columns.extend(tail);

        let position = self
            .active_columns
            .iter()
            .position(|&field_index| field_index >= index + count)
            .unwrap_or(self.active_columns.len());
        let tail = self.active_columns.split_off(position);
        self.active_columns.extend(index..index + count);
        self.active_columns.extend(tail);
        self.schema_change.fields_inserted = true;
        self.notify_list_change(ActiveListChange::Insert, position, count, None, false);
        Ok(())
    }

    /// `count` fields were deleted at `index`. `fields` is the new schema.
    pub fn fields_deleted(&mut self, fields: &[Field], index: usize, count: usize) -> Result<()> {
        self.begin_schema_change();
        let result = self.delete_field_columns(index, count);
        let ended = self.end_schema_change(fields);
        result.and(ended)
    }

    fn delete_field_columns(&mut self, index: usize, count: usize) -> Result<()> {
        let end = index + count;
        if end > self.field_columns.len() {
            return Err(GridError::IndexOutOfRange {
                code: "CMFD",
                index: end,
                len: self.field_columns.len(),
            });
        }
        let deleted = index..end;
        self.remove_active_where(|field_index| deleted.contains(&field_index), false);
        let mut renumbered = false;
        for field_index in &mut self.active_columns {
            if *field_index >= end {
                *field_index -= count;
                renumbered = true;
            }
        }
        if renumbered {
            // Visible columns still carry the old field indices.
            self.notifications.push(ColumnsNotification::InvalidateLayout);
        }
        self.field_columns.drain(index..end);
        for column in self.field_columns.iter_mut().skip(index) {
            column.set_field_index(column.field_index() - count);
        }
        self.schema_change.fields_deleted = true;
        Ok(())
    }

    /// Every field was deleted.
    pub fn all_fields_deleted(&mut self) -> Result<()> {
        self.begin_schema_change();
        let active_count = self.active_columns.len();
        self.field_columns.clear();
        self.active_columns.clear();
        if active_count > 0 {
            self.notify_list_change(ActiveListChange::Clear, 0, active_count, None, false);
        }
        self.schema_change.fields_deleted = true;
        self.end_schema_change(&[])
    }

    /// The schema changed in a way that requires a full rebuild.
    pub fn schema_changed(&mut self, fields: &[Field]) -> Result<()> {
        self.begin_schema_change();
        self.schema_change.reset = true;
        self.end_schema_change(fields)
    }

    /// Rebuild every column from the schema. All fields become active.
    pub fn create_columns(&mut self, fields: &[Field]) -> Result<()> {
        let count = fields.len();
        let mut slots: Vec<Option<Column>> = (0..count).map(|_| None).collect();
        for field in fields {
            let slot = slots
                .get_mut(field.index)
                .ok_or(GridError::FieldIndexOutOfRange {
                    index: field.index,
                    count,
                })?;
            if slot.is_some() {
                return Err(GridError::DuplicateFieldIndex { index: field.index });
            }
            *slot = Some(Column::new(field.clone(), self.new_settings_for_field(field)));
        }
        // Every slot is filled: `count` fields, all in range, none repeated.
        self.field_columns = slots.into_iter().flatten().collect();
        self.active_columns = (0..count).collect();
        tracing::debug!(fields = count, "columns created");
        self.notify_list_change(ActiveListChange::Set, 0, count, None, false);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Widths
    // ------------------------------------------------------------------

    pub fn set_active_column_width(&mut self, active_index: usize, width: f64, ui: bool) -> Result<bool> {
        let field_index = self.active_field_index(active_index)?;
        Ok(self.set_widths(&[(field_index, width)], ui))
    }

    pub fn set_field_column_width(&mut self, field_index: usize, width: f64, ui: bool) -> Result<bool> {
        check_index("CMSFCW", field_index, self.field_columns.len())?;
        Ok(self.set_widths(&[(field_index, width)], ui))
    }

    /// Set several widths by field index, with one batched notification.
    pub fn set_column_widths(&mut self, widths: &[(usize, f64)], ui: bool) -> Result<bool> {
        for &(field_index, _) in widths {
            check_index("CMSCW", field_index, self.field_columns.len())?;
        }
        Ok(self.set_widths(widths, ui))
    }

    /// Set several widths by field name, with one batched notification.
    pub fn set_column_widths_by_field_name(&mut self, widths: &[(&str, f64)], ui: bool) -> Result<bool> {
        let resolved = widths
            .iter()
            .map(|&(name, width)| Ok((self.field_index_by_name(name)?, width)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.set_widths(&resolved, ui))
    }

    /// Replace the active list with the named fields, optionally setting
    /// their widths. Widths are batched into one notification.
    pub fn set_active_columns_and_widths(&mut self, columns: &[(&str, Option<f64>)], ui: bool) -> Result<bool> {
        let resolved = columns
            .iter()
            .map(|&(name, width)| Ok((self.field_index_by_name(name)?, width)))
            .collect::<Result<Vec<_>>>()?;
        let field_indices: Vec<usize> = resolved.iter().map(|&(index, _)| index).collect();
        let list_changed = self.replace_active_columns(&field_indices, ui);
        let widths: Vec<(usize, f64)> = resolved
            .into_iter()
            .filter_map(|(index, width)| width.map(|width| (index, width)))
            .collect();
        let widths_changed = self.set_widths(&widths, ui);
        Ok(list_changed || widths_changed)
    }

    fn set_widths(&mut self, widths: &[(usize, f64)], ui: bool) -> bool {
        let mut notified = Vec::new();
        let mut changed = false;
        for &(field_index, width) in widths {
            let Some(column) = self.field_columns.get_mut(field_index) else {
                continue;
            };
            match column.set_width(width, true) {
                WidthUpdate::Unchanged => {}
                WidthUpdate::Changed { notify } => {
                    changed = true;
                    if notify && !notified.contains(&field_index) {
                        notified.push(field_index);
                    }
                }
            }
        }
        self.finish_width_batch(changed, notified, ui);
        changed
    }

    fn finish_width_batch(&mut self, changed: bool, notified: Vec<usize>, ui: bool) {
        if !notified.is_empty() {
            self.notifications.push(ColumnsNotification::WidthsChanged {
                field_indices: notified,
                ui,
            });
        }
        if changed {
            self.notifications.push(ColumnsNotification::InvalidateLayout);
        }
    }

    pub fn set_column_auto_sizing(&mut self, field_index: usize, enabled: bool) -> Result<bool> {
        check_index("CMSCAS", field_index, self.field_columns.len())?;
        let changed = self
            .field_columns
            .get_mut(field_index)
            .is_some_and(|column| column.set_auto_sizing(enabled));
        if changed && enabled {
            self.notifications.push(ColumnsNotification::InvalidateLayout);
        }
        Ok(changed)
    }

    /// Auto-size every active column from its preferred width.
    pub fn auto_size_active_columns(&mut self, widen_only: bool) -> bool {
        let field_indices: HashSet<usize> = self.active_columns.iter().copied().collect();
        let mut changed = Vec::new();
        for field_index in field_indices {
            if let Some(column) = self.field_columns.get_mut(field_index) {
                if column.auto_size_width(widen_only) {
                    changed.push(field_index);
                }
            }
        }
        changed.sort_unstable();
        self.finish_auto_size(changed)
    }

    /// Record measured widths (by active index) and auto-size the columns
    /// that have auto-sizing on.
    pub fn set_preferred_widths_and_auto_size(&mut self, preferred: &[(usize, i32)], widen_only: bool) -> bool {
        let mut changed = Vec::new();
        for &(active_index, width) in preferred {
            let Some(&field_index) = self.active_columns.get(active_index) else {
                continue;
            };
            let Some(column) = self.field_columns.get_mut(field_index) else {
                continue;
            };
            column.set_preferred_width(Some(width));
            if column.auto_sizing() && column.auto_size_width(widen_only) && !changed.contains(&field_index) {
                changed.push(field_index);
            }
        }
        self.finish_auto_size(changed)
    }

    fn finish_auto_size(&mut self, changed: Vec<usize>) -> bool {
        let any = !changed.is_empty();
        self.finish_width_batch(any, changed, false);
        any
    }

    /// Merge a settings patch into every column and re-clamp widths.
    ///
    /// Widths moved by the re-clamp only invalidate the layout; no width
    /// notification is queued for them.
    pub fn merge_all_column_settings(&mut self, patch: &ColumnSettingsPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        self.default_settings.merge(patch);
        let mut settings_changed = false;
        let mut notified = Vec::new();
        for column in &mut self.field_columns {
            let (settings, width) = column.merge_settings(patch);
            settings_changed |= settings;
            if let WidthUpdate::Changed { notify: true } = width {
                notified.push(column.field_index());
            }
        }
        self.finish_width_batch(settings_changed, notified, false);
        settings_changed
    }

    // ------------------------------------------------------------------
    // Ordering and visibility
    // ------------------------------------------------------------------

    pub fn move_active_column(&mut self, from: usize, to: usize, ui: bool) -> Result<bool> {
        let len = self.active_columns.len();
        check_index("CMMACF", from, len)?;
        check_index("CMMACT", to, len)?;
        if from == to {
            return Ok(false);
        }
        let field_index = self.active_columns.remove(from);
        self.active_columns.insert(to, field_index);
        self.notify_list_change(ActiveListChange::Move, from, 1, Some(to), ui);
        Ok(true)
    }

    pub fn swap_active_columns(&mut self, a: usize, b: usize, ui: bool) -> Result<bool> {
        let len = self.active_columns.len();
        check_index("CMSACA", a, len)?;
        check_index("CMSACB", b, len)?;
        if a == b {
            return Ok(false);
        }
        self.active_columns.swap(a, b);
        self.notify_list_change(ActiveListChange::Swap, a, 1, Some(b), ui);
        Ok(true)
    }

    /// Show, hide or replace active columns by field index.
    ///
    /// With `InsertAt`, a field already active is relocated unless duplicate
    /// columns are allowed; removing it before the insertion point moves the
    /// insertion point down by one.
    pub fn show_hide_columns(&mut self, field_indices: &[usize], position: ShowHidePosition, ui: bool) -> Result<bool> {
        for &field_index in field_indices {
            check_index("CMSHC", field_index, self.field_columns.len())?;
        }
        match position {
            ShowHidePosition::Remove => Ok(self.hide_field_indices(field_indices, ui)),
            ShowHidePosition::ReplaceAll => Ok(self.replace_active_columns(field_indices, ui)),
            ShowHidePosition::InsertAt(insert_index) => {
                check_index("CMSHCI", insert_index, self.active_columns.len() + 1)?;
                Ok(self.insert_active_columns(field_indices, insert_index, ui))
            }
        }
    }

    /// Hide every occurrence of the given fields.
    pub fn hide_columns(&mut self, field_indices: &[usize], ui: bool) -> Result<bool> {
        self.show_hide_columns(field_indices, ShowHidePosition::Remove, ui)
    }

    fn insert_active_columns(&mut self, field_indices: &[usize], mut insert_index: usize, ui: bool) -> bool {
        let before = self.active_columns.clone();
        let queued = self.notifications.len();
        for &field_index in field_indices {
            if !self.allow_duplicate_columns {
                if let Some(existing) = self.active_index_of_field(field_index) {
                    self.active_columns.remove(existing);
                    self.notify_list_change(ActiveListChange::Remove, existing, 1, None, ui);
                    if existing < insert_index {
                        insert_index -= 1;
                    }
                }
            }
            self.active_columns.insert(insert_index, field_index);
            self.notify_list_change(ActiveListChange::Insert, insert_index, 1, None, ui);
            insert_index += 1;
        }
        if self.active_columns == before {
            self.notifications.truncate(queued);
            return false;
        }
        true
    }

    fn hide_field_indices(&mut self, field_indices: &[usize], ui: bool) -> bool {
        self.remove_active_where(|field_index| field_indices.contains(&field_index), ui)
    }

    fn remove_active_where(&mut self, predicate: impl Fn(usize) -> bool, ui: bool) -> bool {
        let mut removed = false;
        for position in (0..self.active_columns.len()).rev() {
            if self.active_columns.get(position).is_some_and(|&f| predicate(f)) {
                self.active_columns.remove(position);
                self.notify_list_change(ActiveListChange::Remove, position, 1, None, ui);
                removed = true;
            }
        }
        removed
    }

    fn replace_active_columns(&mut self, field_indices: &[usize], ui: bool) -> bool {
        let mut list = Vec::with_capacity(field_indices.len());
        for &field_index in field_indices {
            if self.allow_duplicate_columns || !list.contains(&field_index) {
                list.push(field_index);
            }
        }
        if list == self.active_columns {
            return false;
        }
        self.active_columns = list;
        let count = self.active_columns.len();
        self.notify_list_change(ActiveListChange::Set, 0, count, None, ui);
        true
    }

    fn notify_list_change(
        &mut self,
        change: ActiveListChange,
        index: usize,
        count: usize,
        target_index: Option<usize>,
        ui: bool,
    ) {
        self.notifications.push(ColumnsNotification::ActiveListChanged {
            change,
            index,
            count,
            target_index,
            ui,
        });
    }
}
