// SPDX-License-Identifier: MIT OR Apache-2.0

// Not every test binary uses every helper.
#![allow(dead_code)]

use textframe::{AttrString, Attrs, Layout, Monospace};

/// Reference backend: every grapheme advances 10.0, lines are 10.0 tall
/// (ascent 8.0, descent 2.0, no leading).
pub fn backend() -> Monospace {
    let _ = env_logger::builder().is_test(true).try_init();
    Monospace::new()
}

pub fn plain(text: &str) -> AttrString {
    AttrString::new(text, Attrs::new())
}

/// Three 18-char words separated by single spaces; in a 200.0 wide
/// container this wraps to exactly three lines (0..19, 19..38, 38..56).
pub fn three_line_text() -> AttrString {
    plain("aaaaaaaaaaaaaaaaaa bbbbbbbbbbbbbbbbbb cccccccccccccccccc")
}

/// `count` copies of a 4-char word plus trailing space (5 graphemes, 50.0
/// wide each).
pub fn word_soup(count: usize) -> AttrString {
    plain(&"aaaa ".repeat(count))
}

/// Asserts range coverage: line ranges are non-empty, strictly increasing
/// and contiguous, and cover a prefix of the input.
#[allow(dead_code)]
pub fn assert_range_coverage(layout: &Layout) {
    let mut cursor = layout.range().start;
    for line in layout.lines() {
        let range = line.range();
        assert!(!range.is_empty(), "line {} has empty range", line.index());
        assert_eq!(
            range.start,
            cursor,
            "line {} does not continue the previous line",
            line.index()
        );
        cursor = range.end;
    }
    match layout.truncated_line() {
        Some(truncated) => assert_eq!(truncated.range().end, layout.visible_range().end),
        None => assert_eq!(cursor, layout.visible_range().end),
    }
}

/// Asserts row indices are non-decreasing and `row_count` matches.
#[allow(dead_code)]
pub fn assert_row_monotonicity(layout: &Layout) {
    let mut last_row = 0;
    for line in layout.lines() {
        assert!(line.row() >= last_row, "row index decreased");
        assert!(line.row() <= last_row + 1, "row index skipped");
        last_row = line.row();
    }
    if layout.lines().is_empty() {
        assert_eq!(layout.row_count(), 0);
    } else {
        assert_eq!(layout.row_count(), last_row + 1);
    }
}
