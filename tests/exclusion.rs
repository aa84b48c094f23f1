// SPDX-License-Identifier: MIT OR Apache-2.0

use textframe::{ClosedPath, Container, Layout, Point, Rect, Size};

mod common;
use common::*;

#[test]
fn rect_exclusion_splits_every_row_into_two_lines() {
    let text = word_soup(30);
    let container = Container::new(Size::new(200.0, 100.0)).exclusion_paths(vec![
        ClosedPath::rect(Rect::new(80.0, 0.0, 40.0, 100.0)),
    ]);
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    // A full-height bar leaves an 80.0 column either side; each holds one
    // word per row.
    assert!(layout.lines().len() >= 4);
    assert_eq!(layout.lines()[0].row(), 0);
    assert_eq!(layout.lines()[1].row(), 0);
    assert_eq!(layout.lines()[2].row(), 1);
    assert_eq!(layout.lines()[3].row(), 1);

    assert_eq!(layout.lines()[0].position().x, 0.0);
    assert_eq!(layout.lines()[1].position().x, 120.0);

    // No line extends into the excluded bar.
    let bar = Rect::new(80.0, 0.0, 40.0, 100.0);
    for line in layout.lines() {
        let occupied = Rect::new(
            line.bounds().x,
            line.bounds().y,
            line.advance() - line.trailing_whitespace_width(),
            line.bounds().height,
        );
        assert!(!occupied.intersects(&bar), "line {} overlaps the bar", line.index());
    }

    assert_range_coverage(&layout);
    assert_row_monotonicity(&layout);
}

#[test]
fn circle_exclusion_shares_rows_beside_the_obstacle() {
    let text = word_soup(80);
    let container = Container::new(Size::new(200.0, 200.0)).exclusion_paths(vec![
        ClosedPath::circle(Point::new(100.0, 100.0), 40.0, 128),
    ]);
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    assert!(!layout.lines().is_empty());
    assert_range_coverage(&layout);
    assert_row_monotonicity(&layout);

    // At least one row is shared by two lines flowing around the circle.
    let shared = layout
        .lines()
        .windows(2)
        .any(|pair| pair[0].row() == pair[1].row() && pair[0].position().x != pair[1].position().x);
    assert!(shared, "no row flows around the exclusion");

    // Nothing lands inside the circle. The square inscribed in it is a
    // conservative stand-in for the curved boundary.
    let inner = Rect::new(85.0, 85.0, 30.0, 30.0);
    for line in layout.lines() {
        assert!(
            !line.bounds().intersects(&inner),
            "line {} intrudes on the exclusion",
            line.index()
        );
    }

    // Rows above the circle span the full width again.
    assert_eq!(layout.lines()[0].row(), 0);
    assert_eq!(layout.lines()[0].range().len(), 20);
}

#[test]
fn smoothed_row_edges_are_contiguous() {
    let text = word_soup(80);
    let container = Container::new(Size::new(200.0, 200.0)).exclusion_paths(vec![
        ClosedPath::circle(Point::new(100.0, 100.0), 40.0, 128),
    ]);
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    let index = layout.row_index();
    assert_eq!(index.row_count(), layout.row_count());
    let edges = index.edges();
    for pair in edges.windows(2) {
        assert_eq!(pair[0].foot, pair[1].head, "gap between adjacent rows");
        assert!(pair[0].head < pair[0].foot);
    }

    // Hit-testing a row's interior finds that row.
    for (row, edge) in edges.iter().enumerate() {
        let mid = (edge.head + edge.foot) * 0.5;
        assert_eq!(index.row_at(mid), Some(row));
    }
    assert_eq!(index.row_at(edges.last().unwrap().foot + 1.0), None);
}

#[test]
fn custom_path_container_keeps_text_inside_its_bounds() {
    let text = word_soup(40);
    let circle = ClosedPath::circle(Point::new(100.0, 100.0), 100.0, 128);
    let bounds = circle.bounding_box();
    let container = Container::with_path(circle);
    let layout = Layout::new(container, &text, &mut backend()).unwrap();

    assert!(!layout.lines().is_empty());
    assert_row_monotonicity(&layout);
    let slack = bounds.outset(0.5);
    for line in layout.lines() {
        let rect = line.bounds();
        assert!(rect.min_x() >= slack.min_x());
        assert!(rect.max_x() <= slack.max_x());
        assert!(rect.min_y() >= slack.min_y());
        assert!(rect.max_y() <= slack.max_y());
    }

    // The circle is widest at its vertical middle, so the line there holds
    // more text than the first line near the top.
    let mid_line = layout
        .lines()
        .iter()
        .find(|line| line.top() <= 100.0 && line.bottom() > 100.0)
        .expect("a line crosses the vertical middle");
    assert!(mid_line.advance() > layout.lines()[0].advance());
}
