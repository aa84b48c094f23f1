// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use crate::{AttachmentEntry, Point, Rect, ShapedLine};

/// Measured geometry for one shaped line.
///
/// Computed once when the [`Line`] is constructed; a pure function of the
/// shaped line and its position, so lines can be shared across threads
/// without interior mutability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    pub advance: f32,
    pub trailing_whitespace_width: f32,
    pub first_glyph_offset: f32,
    pub bounds: Rect,
}

impl LineMetrics {
    fn compute(shaped: &ShapedLine, position: Point, vertical: bool) -> Self {
        let ascent = shaped.ascent.max(0.0);
        let descent = shaped.descent.max(0.0);
        let leading = shaped.leading.max(0.0);
        let bounds = if vertical {
            Rect::new(
                position.x - descent,
                position.y + shaped.first_glyph_offset,
                ascent + descent,
                shaped.advance,
            )
        } else {
            Rect::new(
                position.x + shaped.first_glyph_offset,
                position.y - ascent,
                shaped.advance,
                ascent + descent,
            )
        };
        Self {
            ascent,
            descent,
            leading,
            advance: shaped.advance,
            trailing_whitespace_width: shaped.trailing_whitespace_width,
            first_glyph_offset: shaped.first_glyph_offset,
            bounds,
        }
    }
}

/// A positioned, measured line within a layout.
///
/// Lines are owned by the [`Layout`](crate::Layout) that produced them and
/// are read-only afterward.
#[derive(Clone, Debug)]
pub struct Line {
    pub(crate) index: usize,
    pub(crate) row: usize,
    pub(crate) range: Range<usize>,
    position: Point,
    vertical: bool,
    metrics: LineMetrics,
    shaped: ShapedLine,
}

impl Line {
    pub(crate) fn new(shaped: ShapedLine, position: Point, vertical: bool) -> Self {
        Self {
            index: 0,
            row: 0,
            range: shaped.range.clone(),
            position,
            vertical,
            metrics: LineMetrics::compute(&shaped, position, vertical),
            shaped,
        }
    }

    /// Index of the line in output order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Row the line belongs to. Several lines may share a row on either
    /// side of an obstacle in a non-rectangular container.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Byte range of the source text this line covers.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Baseline origin in container space.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn metrics(&self) -> &LineMetrics {
        &self.metrics
    }

    pub fn bounds(&self) -> Rect {
        self.metrics.bounds
    }

    pub fn ascent(&self) -> f32 {
        self.metrics.ascent
    }

    pub fn descent(&self) -> f32 {
        self.metrics.descent
    }

    pub fn leading(&self) -> f32 {
        self.metrics.leading
    }

    pub fn advance(&self) -> f32 {
        self.metrics.advance
    }

    pub fn trailing_whitespace_width(&self) -> f32 {
        self.metrics.trailing_whitespace_width
    }

    pub fn width(&self) -> f32 {
        self.bounds().width
    }

    pub fn height(&self) -> f32 {
        self.bounds().height
    }

    pub fn top(&self) -> f32 {
        self.bounds().min_y()
    }

    pub fn bottom(&self) -> f32 {
        self.bounds().max_y()
    }

    pub fn left(&self) -> f32 {
        self.bounds().min_x()
    }

    pub fn right(&self) -> f32 {
        self.bounds().max_x()
    }

    /// The shaped line this line was built from.
    pub fn shaped(&self) -> &ShapedLine {
        &self.shaped
    }

    /// Attachments attributed to this line's runs, with rects derived from
    /// each run's typographic bounds.
    pub fn attachments(&self) -> Vec<AttachmentEntry> {
        let mut entries = Vec::new();
        for run in &self.shaped.runs {
            let Some(attachment) = &run.attachment else {
                continue;
            };
            let rect = if self.vertical {
                Rect::new(
                    self.position.x - self.metrics.descent,
                    self.position.y + run.offset,
                    self.metrics.ascent + self.metrics.descent,
                    run.advance,
                )
            } else {
                Rect::new(
                    self.position.x + run.offset,
                    self.position.y - self.metrics.ascent,
                    run.advance,
                    self.metrics.ascent + self.metrics.descent,
                )
            };
            entries.push(AttachmentEntry {
                attachment: attachment.clone(),
                range: run.range.clone(),
                rect,
            });
        }
        entries
    }
}
