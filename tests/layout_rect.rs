// SPDX-License-Identifier: MIT OR Apache-2.0

use textframe::{
    Container, EdgeInsets, Layout, LayoutError, Rect, Size,
};

mod common;
use common::*;

#[test]
fn wraps_into_rows_top_to_bottom() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 1000.0));
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    assert_eq!(layout.lines().len(), 3);
    assert_eq!(layout.row_count(), 3);
    assert!(layout.truncated_line().is_none());

    let ranges: Vec<_> = layout.lines().iter().map(|line| line.range()).collect();
    assert_eq!(ranges, vec![0..19, 19..38, 38..56]);

    for (i, line) in layout.lines().iter().enumerate() {
        assert_eq!(line.index(), i);
        assert_eq!(line.row(), i);
        // Baselines sit ascent below each band head.
        assert_eq!(line.position().y, 8.0 + 10.0 * i as f32);
        assert_eq!(line.position().x, 0.0);
    }
    assert_eq!(layout.lines()[0].bounds(), Rect::new(0.0, 0.0, 190.0, 10.0));

    assert_range_coverage(&layout);
    assert_row_monotonicity(&layout);
    assert_eq!(layout.visible_range(), 0..56);
}

#[test]
fn bounding_rect_and_size_cover_all_lines() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 1000.0));
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    assert_eq!(layout.text_bounding_rect(), Rect::new(0.0, 0.0, 190.0, 30.0));
    assert_eq!(layout.text_bounding_size(), Size::new(190.0, 30.0));
}

#[test]
fn insets_offset_lines_and_pad_bounding_size() {
    let text = three_line_text();
    let container =
        Container::new(Size::new(220.0, 40.0)).insets(EdgeInsets::uniform(10.0));
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    // 20.0 of usable height holds two rows; the third is clipped.
    assert_eq!(layout.lines().len(), 2);
    assert_eq!(layout.lines()[0].bounds(), Rect::new(10.0, 10.0, 190.0, 10.0));
    assert_eq!(layout.visible_range(), 0..38);

    // Bounding size grows back by the insets on the leading edges.
    assert_eq!(layout.text_bounding_rect(), Rect::new(10.0, 10.0, 190.0, 20.0));
    assert_eq!(layout.text_bounding_size(), Size::new(210.0, 40.0));
}

#[test]
fn region_height_clips_overflowing_lines() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 25.0));
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    // Two full rows fit in 25.0; the third would cross the bottom edge.
    assert_eq!(layout.lines().len(), 2);
    assert_eq!(layout.row_count(), 2);
    assert!(layout.truncated_line().is_none());
    assert_eq!(layout.visible_range(), 0..38);
    assert_range_coverage(&layout);
}

#[test]
fn layout_is_idempotent() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 1000.0));
    let a = Layout::new(container.clone(), &text, &mut backend()).unwrap();
    let b = Layout::new(container, &text, &mut backend()).unwrap();

    assert_eq!(a.lines().len(), b.lines().len());
    for (la, lb) in a.lines().iter().zip(b.lines()) {
        assert_eq!(la.range(), lb.range());
        assert_eq!(la.position(), lb.position());
        assert_eq!(la.row(), lb.row());
        assert_eq!(la.bounds(), lb.bounds());
    }
    assert_eq!(a.text_bounding_size(), b.text_bounding_size());
    assert_eq!(a.visible_range(), b.visible_range());
}

#[test]
fn with_range_lays_out_a_suffix() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 1000.0));
    let layout = Layout::with_range(container, &text, 19..56, &mut backend()).unwrap();

    assert_eq!(layout.lines().len(), 2);
    assert_eq!(layout.lines()[0].range(), 19..38);
    assert_eq!(layout.visible_range(), 19..56);
    assert_range_coverage(&layout);
}

#[test]
fn empty_region_is_an_error() {
    let text = three_line_text();
    let container = Container::new(Size::ZERO);
    let result = Layout::new(container, &text, &mut backend());
    assert_eq!(result.unwrap_err(), LayoutError::EmptyRegion);
}

#[test]
fn empty_input_is_an_error() {
    let text = plain("");
    let container = Container::new(Size::new(200.0, 200.0));
    let result = Layout::new(container, &text, &mut backend());
    assert_eq!(result.unwrap_err(), LayoutError::EmptyInput);
}

#[test]
fn out_of_bounds_range_is_an_error() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 200.0));
    let result = Layout::with_range(container, &text, 0..100, &mut backend());
    assert!(matches!(
        result.unwrap_err(),
        LayoutError::RangeOutOfBounds { end: 100, len: 56, .. }
    ));
}

#[test]
fn non_char_boundary_range_is_an_error() {
    let text = plain("héllo");
    let container = Container::new(Size::new(200.0, 200.0));
    // Offset 2 lands inside the two-byte 'é'.
    let result = Layout::with_range(container, &text, 0..2, &mut backend());
    assert!(matches!(
        result.unwrap_err(),
        LayoutError::RangeOutOfBounds { .. }
    ));
}

#[test]
fn row_index_maps_coordinates_to_rows() {
    let text = three_line_text();
    let container = Container::new(Size::new(200.0, 1000.0));
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    let index = layout.row_index();
    assert_eq!(index.row_count(), 3);
    assert_eq!(index.edge(0).unwrap().head, 0.0);
    assert_eq!(index.edge(0).unwrap().foot, 10.0);
    assert_eq!(index.edge(2).unwrap().foot, 30.0);

    assert_eq!(index.row_at(5.0), Some(0));
    assert_eq!(index.row_at(15.0), Some(1));
    assert_eq!(index.row_at(25.0), Some(2));
    assert_eq!(index.row_at(35.0), None);
    assert_eq!(index.first_line(1), Some(1));
}

#[test]
fn spans_text_across_containers_in_sequence() {
    let text = three_line_text();
    let containers = vec![
        Container::new(Size::new(200.0, 25.0)),
        Container::new(Size::new(200.0, 25.0)),
        Container::new(Size::new(200.0, 25.0)),
    ];
    let layouts = Layout::in_containers(&containers, &text, &mut backend()).unwrap();

    // The third container is never reached; the text runs out before it.
    assert_eq!(layouts.len(), 2);
    assert_eq!(layouts[0].visible_range(), 0..38);
    assert_eq!(layouts[1].visible_range(), 38..56);
    assert_eq!(layouts[1].lines().len(), 1);
    assert_eq!(layouts[1].lines()[0].range(), 38..56);
    assert_eq!(layouts[1].lines()[0].row(), 0);
    for layout in &layouts {
        assert_range_coverage(layout);
    }
}
