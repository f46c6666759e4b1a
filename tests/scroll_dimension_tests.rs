//! Scroll dimension tests
//!
//! Limits, snapping, alignment and the scroll operations of one axis, driven
//! directly through `AxisSource`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

use gridview::layout::{AxisSource, ScrollAnchor, ScrollDimension, ViewportCoverageExtent};
use gridview::types::Axis;
use test_case::test_case;

/// Dimension over `sizes` with 1px grid and fixed lines.
fn dimension(sizes: &[i32], fixed: usize, extent: i32, smooth: bool, end_aligned: bool) -> ScrollDimension {
    let mut dim = ScrollDimension::new(Axis::Horizontal);
    let size = |index: usize| sizes[index];
    dim.compute(&AxisSource {
        item_count: sizes.len(),
        fixed_count: fixed,
        gridline_width: 1,
        fixed_line_width: 1,
        viewport_extent: extent,
        smooth,
        end_aligned,
        item_size: &size,
    });
    dim
}

const SIZES: [i32; 4] = [50, 100, 100, 100];

fn anchor(index: usize, offset: i32) -> Option<ScrollAnchor> {
    Some(ScrollAnchor::new(index, offset))
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_smooth_left_aligned_limits() {
    let dim = dimension(&SIZES, 1, 200, true, false);
    assert_eq!(dim.start(), 51);
    assert_eq!(dim.viewport_size(), 149);
    assert_eq!(dim.content_size(), 302);
    assert_eq!(dim.scroll_size(), 302);
    assert_eq!(dim.start_limit(), anchor(1, 0));
    assert_eq!(dim.finish_limit(), anchor(2, 52));
    assert_eq!(dim.anchor(), anchor(1, 0));
    assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::Partial);
}

#[test]
fn test_snapping_finish_and_scroll_size() {
    let dim = dimension(&SIZES, 1, 200, false, false);
    assert_eq!(dim.finish_limit(), anchor(3, 0));
    // The last item starts at 202; the viewport still has to fit after it.
    assert_eq!(dim.scroll_size(), 351);
}

#[test]
fn test_right_aligned_limits_mirror() {
    let dim = dimension(&SIZES, 1, 200, true, true);
    assert_eq!(dim.start_limit(), anchor(3, 0));
    assert_eq!(dim.finish_limit(), anchor(2, 52));
    assert_eq!(dim.scroller_position(), 0);
}

#[test]
fn test_zero_viewport() {
    let dim = dimension(&SIZES, 1, 51, true, false);
    assert_eq!(dim.viewport_size(), 0);
    assert_eq!(dim.finish_limit(), anchor(3, 0));
    assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::None);
}

#[test]
fn test_content_fits_viewport() {
    let mut dim = dimension(&[50, 50], 0, 200, true, false);
    assert_eq!(dim.finish_limit(), dim.start_limit());
    assert_eq!(dim.viewport_coverage_extent(), ViewportCoverageExtent::Full);
    assert!(!dim.scroll_by_pixels(30).unwrap());
}

#[test]
fn test_no_scrollable_items() {
    let mut dim = dimension(&[50, 50], 2, 200, true, false);
    assert_eq!(dim.anchor(), None);
    assert_eq!(dim.calculate_limited_scroll_anchor(1, 0).unwrap(), None);
    assert!(!dim.scroll_to(0, 0).unwrap());
}

#[test]
fn test_operations_require_compute() {
    let mut dim = ScrollDimension::new(Axis::Vertical);
    assert_eq!(dim.scroll_to(0, 0).unwrap_err().code(), "SDCLSA");
    assert!(dim.scroll_by_pixels(1).is_err());
}

// ============================================================================
// Limited anchors
// ============================================================================

#[test_case(3, 0, 2, 52 ; "past finish clamps to finish")]
#[test_case(0, 0, 1, 0 ; "fixed index clamps to start")]
#[test_case(2, 10, 2, 10 ; "inside range is kept")]
#[test_case(1, 150, 2, 49 ; "offset past item continues into next")]
fn test_limited_anchor_smooth(index: usize, offset: i32, expected_index: usize, expected_offset: i32) {
    let dim = dimension(&SIZES, 1, 200, true, false);
    let limited = dim.calculate_limited_scroll_anchor(index, offset).unwrap();
    assert_eq!(limited, anchor(expected_index, expected_offset));
    let again = dim
        .calculate_limited_scroll_anchor(expected_index, expected_offset)
        .unwrap();
    assert_eq!(again, limited);
}

// ============================================================================
// Scroll operations
// ============================================================================

#[test]
fn test_snapping_scroll_by_pixels_both_directions() {
    let mut dim = dimension(&SIZES, 1, 200, false, false);
    assert!(dim.scroll_by_pixels(10).unwrap());
    assert_eq!(dim.anchor(), anchor(2, 0));
    assert!(dim.scroll_by_pixels(-10).unwrap());
    assert_eq!(dim.anchor(), anchor(1, 0));
}

#[test]
fn test_step_and_page() {
    let mut dim = dimension(&SIZES, 1, 200, false, false);
    assert!(dim.scroll_by_items(5).unwrap());
    assert_eq!(dim.anchor(), anchor(3, 0));
    assert!(dim.scroll_by_items(-1).unwrap());
    assert_eq!(dim.anchor(), anchor(2, 0));
    assert!(dim.page(false).unwrap());
    assert_eq!(dim.anchor(), anchor(1, 0));
    assert!(dim.page(true).unwrap());
    assert_eq!(dim.anchor(), anchor(3, 0));
}

#[test]
fn test_right_aligned_scroll_by_negative_pixels() {
    let mut dim = dimension(&SIZES, 1, 200, true, true);
    assert!(dim.scroll_by_pixels(-10).unwrap());
    assert_eq!(dim.anchor(), anchor(3, 10));
    assert_eq!(dim.scroller_position(), 10);
}

#[test]
fn test_ensure_fully_visible() {
    let mut dim = dimension(&SIZES, 1, 200, true, false);
    assert!(!dim.ensure_fully_visible(0).unwrap());
    assert!(!dim.ensure_fully_visible(1).unwrap());
    assert!(dim.ensure_fully_visible(3).unwrap());
    assert_eq!(dim.anchor(), anchor(2, 52));
    assert!(dim.ensure_fully_visible(1).unwrap());
    assert_eq!(dim.anchor(), anchor(1, 0));
}

#[test]
fn test_scroller_position_round_trip() {
    let mut dim = dimension(&SIZES, 1, 200, true, false);
    assert!(dim.set_scroller_position(130).unwrap());
    assert_eq!(dim.anchor(), anchor(2, 29));
    assert_eq!(dim.scroller_position(), 130);
    let state = dim.scroller_state();
    assert_eq!(state.position, 130);
    assert_eq!(state.viewport_size, 149);
}

#[test]
fn test_extreme_deltas_clamp_to_limits() {
    let mut dim = dimension(&SIZES, 1, 200, true, false);
    assert!(dim.scroll_by_pixels(10).unwrap());
    assert!(dim.scroll_by_pixels(i64::MAX).unwrap());
    assert_eq!(dim.anchor(), dim.finish_limit());
    assert!(dim.scroll_by_pixels(i64::MIN).unwrap());
    assert_eq!(dim.anchor(), dim.start_limit());

    assert!(dim.set_scroller_position(i64::MAX).unwrap());
    assert_eq!(dim.anchor(), anchor(2, 52));
    assert!(dim.set_scroller_position(i64::MIN).unwrap());
    assert_eq!(dim.anchor(), anchor(1, 0));
}

#[test]
fn test_right_aligned_extreme_scroller_positions() {
    let mut dim = dimension(&SIZES, 1, 200, true, true);
    assert!(dim.set_scroller_position(i64::MAX).unwrap());
    assert_eq!(dim.anchor(), dim.finish_limit());
    assert!(dim.set_scroller_position(i64::MIN).unwrap());
    assert_eq!(dim.anchor(), dim.start_limit());
}

#[test]
fn test_recompute_keeps_limited_anchor() {
    let mut dim = dimension(&SIZES, 1, 200, true, false);
    dim.scroll_to(2, 30).unwrap();
    dim.invalidate();
    // The viewport grows: the old anchor is now past the finish limit.
    let size = |index: usize| SIZES[index];
    let state = dim.compute(&AxisSource {
        item_count: SIZES.len(),
        fixed_count: 1,
        gridline_width: 1,
        fixed_line_width: 1,
        viewport_extent: 300,
        smooth: true,
        end_aligned: false,
        item_size: &size,
    });
    assert_eq!(dim.finish_limit(), anchor(1, 53));
    assert_eq!(dim.anchor(), anchor(1, 53));
    assert_eq!(state.compute_id, dim.compute_id());
}
