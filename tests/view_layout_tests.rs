//! View layout tests
//!
//! Visible column and row geometry of a `GridView` over in-memory subgrids,
//! lazy recomputation and hit testing.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::{column_spans, row_spans, GridBuilder};
use gridview::layout::{InvalidateAction, ViewLayoutGap};
use gridview::types::{Axis, SubgridRole};
use gridview::viewer::GridEvent;

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_fixed_column_and_partial_last_column() {
    let mut t = GridBuilder::new()
        .settings(|s| s.fixed_column_count = 1)
        .widths(&[50.0, 100.0, 100.0, 100.0])
        .build();
    t.compute();

    let layout = t.grid.layout();
    assert_eq!(
        column_spans(layout.columns()),
        vec![(0, 0, 50), (1, 51, 151), (2, 152, 200)]
    );
    assert!(layout.columns()[0].fixed);
    assert_eq!(layout.columns()[2].width, 48);
    assert_eq!(layout.unanchored_column_overflow(), Some(52));
    assert_eq!(layout.column_gap(), Some(ViewLayoutGap { start: 50, end_plus_1: 51 }));
    assert_eq!(layout.first_scrollable_visible_column_index(), Some(1));
    assert_eq!(layout.last_scrollable_visible_column_index(), Some(2));

    let widths = layout.columns_view_widths();
    assert_eq!(widths.fixed, 50);
    assert_eq!(widths.scrollable, 149);
    assert_eq!(widths.visible, 199);
}

#[test]
fn test_scrolled_to_end_shows_last_column_whole() {
    let mut t = GridBuilder::new()
        .settings(|s| s.fixed_column_count = 1)
        .widths(&[50.0, 100.0, 100.0, 100.0])
        .build();
    assert!(t.grid.scroll_columns_to(3, 0).unwrap());
    t.compute();

    let layout = t.grid.layout();
    assert_eq!(
        column_spans(layout.columns()),
        vec![(0, 0, 50), (2, 51, 99), (3, 100, 200)]
    );
    assert_eq!(layout.unanchored_column_overflow(), Some(0));
}

#[test]
fn test_right_aligned_columns_clip_on_the_left() {
    let mut t = GridBuilder::new()
        .settings(|s| s.grid_right_aligned = true)
        .surface(250, 100)
        .build();
    t.compute();

    let layout = t.grid.layout();
    assert_eq!(
        column_spans(layout.columns()),
        vec![(1, 0, 48), (2, 49, 149), (3, 150, 250)]
    );
    assert_eq!(layout.unanchored_column_overflow(), Some(52));
}

#[test]
fn test_no_width_adjust_keeps_full_width() {
    let mut t = GridBuilder::new()
        .settings(|s| s.visible_column_width_adjust = false)
        .build();
    t.compute();

    let last = t.grid.visible_columns().last().copied().unwrap();
    assert_eq!((last.left, last.width, last.right_plus_1), (101, 100, 201));
}

#[test]
fn test_hidden_column_is_skipped() {
    let mut t = GridBuilder::new().build();
    t.compute();
    t.grid
        .update_columns(|columns| columns.hide_columns(&[0], false))
        .unwrap();
    assert!(t.grid.is_render_pending());
    t.compute();

    let fields: Vec<usize> = t.grid.visible_columns().iter().map(|c| c.field_index).collect();
    assert_eq!(fields, vec![1, 2]);
    assert_eq!(column_spans(t.grid.visible_columns()), vec![(0, 0, 100), (1, 101, 200)]);
}

// ============================================================================
// Rows
// ============================================================================

#[test]
fn test_main_rows_fill_the_surface() {
    let mut t = GridBuilder::new().build();
    t.compute();

    let layout = t.grid.layout();
    assert_eq!(
        row_spans(layout.rows()),
        vec![
            (0, 0, 0, 20),
            (0, 1, 21, 41),
            (0, 2, 42, 62),
            (0, 3, 63, 83),
            (0, 4, 84, 104),
        ]
    );
    assert_eq!(layout.last_scrollable_row_bottom_overflow(), Some(4));
    assert_eq!(layout.row_gap(), None);
}

#[test]
fn test_header_fixed_rows_and_footer() {
    let mut t = GridBuilder::new()
        .settings(|s| s.fixed_row_count = 1)
        .subgrid(SubgridRole::Header, 1, 25)
        .subgrid(SubgridRole::Main, 10, 20)
        .subgrid(SubgridRole::Footer, 1, 30)
        .surface(200, 150)
        .build();
    t.compute();

    let layout = t.grid.layout();
    assert_eq!(
        row_spans(layout.rows()),
        vec![
            (0, 0, 0, 25),
            (1, 0, 26, 46),
            (1, 1, 47, 67),
            (1, 2, 68, 88),
            (1, 3, 89, 109),
            (1, 4, 110, 130),
            (2, 0, 120, 150),
        ]
    );
    assert!(layout.rows()[1].fixed);
    assert!(!layout.rows()[2].fixed);
    assert_eq!(layout.row_gap(), Some(ViewLayoutGap { start: 46, end_plus_1: 47 }));
    assert_eq!(layout.first_scrollable_visible_row_index(), Some(2));
    assert_eq!(layout.last_scrollable_visible_row_index(), Some(5));
    assert_eq!(layout.last_scrollable_row_bottom_overflow(), Some(11));

    // The footer is drawn over the clipped last main row.
    let row = t.grid.find_row_at_y(125).unwrap();
    assert_eq!(row.subgrid_role, SubgridRole::Footer);
    let row = t.grid.find_row_at_y(115).unwrap();
    assert_eq!((row.subgrid_index, row.subgrid_row_index), (1, 4));
}

#[test]
fn test_snapping_rows_scroll_whole_rows() {
    let mut t = GridBuilder::new().build();
    t.compute();
    assert!(t.grid.scroll_by_pixels(Axis::Vertical, 5).unwrap());
    t.compute();
    assert_eq!(t.grid.visible_rows()[0].subgrid_row_index, 1);
    assert_eq!(t.grid.visible_rows()[0].top, 0);

    assert!(t.grid.scroll_by_pixels(Axis::Vertical, 10_000).unwrap());
    t.compute();
    assert_eq!(t.grid.visible_rows()[0].subgrid_row_index, 6);
    assert_eq!(t.grid.visible_rows().last().unwrap().subgrid_row_index, 9);
}

// ============================================================================
// Row notifications
// ============================================================================

#[test]
fn test_rows_inserted_below_view_keep_geometry() {
    let mut t = GridBuilder::new().build();
    t.compute();
    let computation_id = t.grid.layout().computation_id();
    t.take_events();

    t.main().insert_rows(8, 2);
    t.grid.rows_inserted(t.main_index(), 8, 2);
    assert!(t.take_events().contains(&GridEvent::LayoutInvalidated(
        InvalidateAction::DataRangeInsertedButViewNotAffected { index: 8, count: 2 }
    )));
    assert!(t.grid.is_render_pending());

    t.compute();
    assert_eq!(t.grid.layout().computation_id(), computation_id);
    assert_eq!(t.grid.layout().dimension(Axis::Vertical).scrollable_count(), 12);
}

#[test]
fn test_rows_inserted_into_half_empty_view_appear() {
    let mut t = GridBuilder::new()
        .subgrid(SubgridRole::Main, 3, 20)
        .surface(200, 200)
        .build();
    t.compute();
    assert_eq!(t.grid.visible_rows().len(), 3);
    t.take_events();

    t.main().insert_rows(3, 2);
    t.grid.rows_inserted(t.main_index(), 3, 2);
    assert!(t.take_events().contains(&GridEvent::LayoutInvalidated(
        InvalidateAction::DataRangeInserted { index: 3, count: 2 }
    )));
    t.compute();
    let rows: Vec<usize> = t.grid.visible_rows().iter().map(|r| r.subgrid_row_index).collect();
    assert_eq!(rows, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_rows_inserted_above_anchor_keep_first_row() {
    let mut t = GridBuilder::new().build();
    t.compute();
    t.grid.scroll_rows_to(3, 0).unwrap();
    t.compute();
    assert_eq!(t.grid.visible_rows()[0].subgrid_row_index, 3);

    t.main().insert_rows(0, 1);
    t.grid.rows_inserted(t.main_index(), 0, 1);
    t.compute();
    assert_eq!(t.grid.visible_rows()[0].subgrid_row_index, 4);
}

#[test]
fn test_all_rows_deleted_empties_main() {
    let mut t = GridBuilder::new().build();
    t.compute();
    t.main().set_row_count(0);
    t.grid.all_rows_deleted(t.main_index());
    t.compute();

    assert!(t.grid.visible_rows().is_empty());
    assert_eq!(t.grid.scroll_anchor(Axis::Vertical), None);
    assert!(t.grid.find_cell_at_point(10, 10).unwrap().is_none());
}

#[test]
fn test_resize_recomputes_columns() {
    let mut t = GridBuilder::new().build();
    t.compute();
    t.surface.resize(300, 100);
    t.grid.surface_resized();
    assert!(t.grid.is_render_pending());
    t.compute();
    assert_eq!(
        column_spans(t.grid.visible_columns()),
        vec![(0, 0, 100), (1, 101, 201), (2, 202, 300)]
    );
}

#[test]
fn test_fields_inserted_into_half_empty_view_appear() {
    let mut t = GridBuilder::new().widths(&[50.0, 50.0]).surface(400, 100).build();
    t.compute();
    assert_eq!(t.grid.visible_columns().len(), 2);

    t.schema.insert_fields(2, ["f2"]);
    t.grid.fields_inserted(2, 1).unwrap();
    t.compute();
    assert_eq!(
        column_spans(t.grid.visible_columns()),
        vec![(0, 0, 50), (1, 51, 101), (2, 102, 202)]
    );
}

#[test]
fn test_deleting_hidden_field_renumbers_visible_columns() {
    let mut t = GridBuilder::new().build();
    t.grid
        .update_columns(|columns| columns.hide_columns(&[0], false))
        .unwrap();
    t.compute();
    let fields: Vec<usize> = t.grid.visible_columns().iter().map(|c| c.field_index).collect();
    assert_eq!(fields, vec![1, 2]);

    t.schema.delete_fields(0, 1);
    t.grid.fields_deleted(0, 1).unwrap();
    assert!(t.grid.is_render_pending());
    t.compute();

    let fields: Vec<usize> = t.grid.visible_columns().iter().map(|c| c.field_index).collect();
    assert_eq!(fields, vec![0, 1]);
    assert_eq!(t.grid.columns().active_field_indices(), &[0, 1, 2]);
    let cell = t.grid.find_cell_at_point(10, 10).unwrap().unwrap();
    assert_eq!(cell.view_column.field_index, 0);
}

// ============================================================================
// Hit testing
// ============================================================================

#[test]
fn test_find_cell_at_point() {
    let mut t = GridBuilder::new().build();
    let cell = t.grid.find_cell_at_point(120, 30).unwrap().unwrap();
    assert_eq!(cell.view_column.active_column_index, 1);
    assert_eq!(cell.view_row.subgrid_row_index, 1);
    assert_eq!(
        (cell.bounds.x, cell.bounds.y, cell.bounds.width, cell.bounds.height),
        (101, 21, 99, 20)
    );

    // Grid lines belong to no cell.
    assert!(t.grid.find_cell_at_point(100, 30).unwrap().is_none());
    assert!(t.grid.find_cell_at_point(120, 20).unwrap().is_none());
}

#[test]
fn test_lookup_by_model_index() {
    let mut t = GridBuilder::new().build();
    t.compute();
    let layout = t.grid.layout();
    assert_eq!(layout.find_column_with_active_index(1).unwrap().left, 101);
    assert!(layout.find_column_with_active_index(3).is_none());
    assert_eq!(layout.find_row_with_subgrid_row_index(0, 2).unwrap().top, 42);
    assert!(layout.find_row_with_subgrid_row_index(0, 7).is_none());
}

#[test]
fn test_hiding_anchor_column_reanchors() {
    let mut t = GridBuilder::new().build();
    assert!(t.grid.scroll_columns_to(2, 0).unwrap());
    t.compute();
    assert_eq!(t.grid.visible_columns()[0].field_index, 2);

    t.grid
        .update_columns(|columns| columns.hide_columns(&[2], false))
        .unwrap();
    t.compute();

    let anchor = t.grid.scroll_anchor(Axis::Horizontal).unwrap();
    assert_eq!((anchor.index, anchor.offset), (1, 1));
    let fields: Vec<usize> = t.grid.visible_columns().iter().map(|c| c.field_index).collect();
    assert_eq!(fields, vec![1, 3]);
    assert_eq!(t.grid.visible_columns()[0].width, 99);
}
