// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Range;
use std::time::Instant;

use rustc_hash::FxHashSet;

use crate::container::FillGeometry;
use crate::{
    Attachment, AttachmentContent, AttachmentEntry, AttrString, Attrs, Container, EdgeInsets,
    LayoutError, Line, Point, Rect, ShapeBackend, Size, TruncateSide, Truncation,
};

bitflags::bitflags! {
    /// Which drawing passes a renderer needs for this layout.
    ///
    /// Set from the attribute keys present anywhere in the source text, so a
    /// renderer can skip whole passes without walking the runs itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DrawFlags: u16 {
        const TEXT = 1 << 0;
        const HIGHLIGHT = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
        const SHADOW = 1 << 4;
        const INNER_SHADOW = 1 << 5;
        const BORDER = 1 << 6;
        const BACKGROUND_BORDER = 1 << 7;
        const BLOCK_BORDER = 1 << 8;
        const ATTACHMENT = 1 << 9;
    }
}

/// Flow-axis extent of one row.
///
/// For horizontal text `head` is the top edge and `foot` the bottom; vertical
/// text flows right to left, so `head` is the right edge and `foot` the left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowEdge {
    pub head: f32,
    pub foot: f32,
}

/// Per-row extents along the flow axis, with adjacent boundaries smoothed to
/// the midpoint of the gap so hit-testing sees no gaps or overlaps.
#[derive(Clone, Debug, Default)]
pub struct RowIndex {
    edges: Vec<RowEdge>,
    first_lines: Vec<usize>,
}

impl RowIndex {
    pub fn row_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[RowEdge] {
        &self.edges
    }

    pub fn edge(&self, row: usize) -> Option<RowEdge> {
        self.edges.get(row).copied()
    }

    /// Index into `Layout::lines` of the first line of a row.
    pub fn first_line(&self, row: usize) -> Option<usize> {
        self.first_lines.get(row).copied()
    }

    /// Row containing a flow-axis coordinate, if any.
    pub fn row_at(&self, coordinate: f32) -> Option<usize> {
        self.edges.iter().position(|edge| {
            let (lo, hi) = if edge.head <= edge.foot {
                (edge.head, edge.foot)
            } else {
                (edge.foot, edge.head)
            };
            coordinate >= lo && coordinate < hi
        })
    }
}

/// An immutable text layout: positioned lines, row extents, attachments and
/// draw hints for one (container, text, range) input.
///
/// Example with a circular exclusion path:
///
/// ```text
///     ┌──────────────────────────┐  <------ container
///     │ [--------Line0--------]  │  <- Row0
///     │ [--------Line1--------]  │  <- Row1
///     │ [-Line2-]     [-Line3-]  │  <- Row2
///     │ [-Line4]       [Line5-]  │  <- Row3
///     │ [-Line6-]     [-Line7-]  │  <- Row4
///     │ [--------Line8--------]  │  <- Row5
///     │ [--------Line9--------]  │  <- Row6
///     └──────────────────────────┘
/// ```
#[derive(Clone, Debug)]
pub struct Layout {
    container: Container,
    text: AttrString,
    range: Range<usize>,
    lines: Vec<Line>,
    truncated_line: Option<Line>,
    row_count: usize,
    visible_range: Range<usize>,
    text_bounding_rect: Rect,
    text_bounding_size: Size,
    row_index: RowIndex,
    attachments: Vec<AttachmentEntry>,
    attachment_contents: FxHashSet<AttachmentContent>,
    flags: DrawFlags,
}

/// How far the band scan advances past a band where nothing fit.
const SCAN_STEP: f32 = 1.0;
const CLIP_EPSILON: f32 = 0.01;

impl Layout {
    /// Lays out the whole text in one container.
    pub fn new<B: ShapeBackend>(
        container: Container,
        text: &AttrString,
        backend: &mut B,
    ) -> Result<Self, LayoutError> {
        let range = 0..text.len();
        Self::with_range(container, text, range, backend)
    }

    /// Lays out a byte range of the text in one container.
    pub fn with_range<B: ShapeBackend>(
        container: Container,
        text: &AttrString,
        range: Range<usize>,
        backend: &mut B,
    ) -> Result<Self, LayoutError> {
        let instant = Instant::now();

        if text.is_empty() {
            return Err(LayoutError::EmptyInput);
        }
        if range.start > range.end
            || range.end > text.len()
            || !text.text().is_char_boundary(range.start)
            || !text.text().is_char_boundary(range.end)
        {
            return Err(LayoutError::range_out_of_bounds(&range, text.len()));
        }

        let geometry = container.resolve()?;
        let layout = Self::generate(container, text, range, geometry, backend)?;

        log::debug!(
            "layout {} lines in {} rows: {:?}",
            layout.lines.len(),
            layout.row_count,
            instant.elapsed()
        );
        Ok(layout)
    }

    /// Lays out one text across several containers in sequence.
    ///
    /// Each layout's input range starts where the previous layout's visible
    /// range ended. Stops early once the text is exhausted.
    pub fn in_containers<B: ShapeBackend>(
        containers: &[Container],
        text: &AttrString,
        backend: &mut B,
    ) -> Result<Vec<Self>, LayoutError> {
        Self::in_containers_with_range(containers, text, 0..text.len(), backend)
    }

    /// Range-limited variant of [`Layout::in_containers`].
    pub fn in_containers_with_range<B: ShapeBackend>(
        containers: &[Container],
        text: &AttrString,
        range: Range<usize>,
        backend: &mut B,
    ) -> Result<Vec<Self>, LayoutError> {
        if range.end > text.len() {
            return Err(LayoutError::range_out_of_bounds(&range, text.len()));
        }
        let mut current = range;
        let mut layouts = Vec::new();
        for container in containers {
            let layout = Self::with_range(container.clone(), text, current.clone(), backend)?;
            let consumed = layout.visible_range.len();
            current = (current.start + consumed)..current.end;
            layouts.push(layout);
            if current.is_empty() {
                break;
            }
        }
        Ok(layouts)
    }

    fn generate<B: ShapeBackend>(
        container: Container,
        text: &AttrString,
        range: Range<usize>,
        geometry: FillGeometry,
        backend: &mut B,
    ) -> Result<Self, LayoutError> {
        let vertical = geometry.vertical;
        let bounds = geometry.bounds;
        let max_rows = container.max_rows as usize;

        // True flow-axis limit for rect regions; lines crossing it are
        // discarded. Path regions are limited by their span query instead.
        let clip_limit = geometry.clip.map(|clip| {
            if vertical {
                clip.min_x()
            } else {
                clip.max_y()
            }
        });
        let rect_limit = if geometry.row_may_separate {
            None
        } else {
            Some(clip_limit.unwrap_or(if vertical {
                bounds.min_x()
            } else {
                bounds.max_y()
            }))
        };

        let mut lines: Vec<Line> = Vec::new();
        let mut text_bounding_rect = Rect::ZERO;
        let mut row: Option<usize> = None;
        let mut cursor = range.start;
        let mut band_head = if vertical {
            bounds.max_x()
        } else {
            bounds.min_y()
        };
        let mut last_height: Option<f32> = None;

        // Sentinels chosen so the first line always starts row 0.
        let mut last_rect = if vertical {
            Rect::new(f32::MAX, 0.0, 0.0, 0.0)
        } else {
            Rect::new(0.0, f32::MIN, 0.0, 0.0)
        };
        let mut last_position = if vertical {
            Point::new(f32::MAX, 0.0)
        } else {
            Point::new(0.0, f32::MIN)
        };

        'bands: while cursor < range.end {
            let in_region = if vertical {
                band_head > bounds.min_x() + CLIP_EPSILON
            } else {
                band_head < bounds.max_y() - CLIP_EPSILON
            };
            if !in_region {
                break;
            }

            let probe = last_height.unwrap_or(0.0);
            let (band_lo, band_hi) = if vertical {
                (band_head - probe, band_head)
            } else {
                (band_head, band_head + probe)
            };
            let spans = geometry.spans_for_band(band_lo, band_hi);

            let mut band_advance = 0.0_f32;
            let mut placed = false;
            for &(span_lo, span_hi) in &spans {
                if cursor >= range.end {
                    break;
                }
                let span_width = span_hi - span_lo;
                if span_width <= 0.0 {
                    continue;
                }
                let shaped = backend.shape_line(text, cursor..range.end, span_width)?;
                if shaped.range.is_empty() {
                    continue;
                }
                let line_height = shaped.height();

                if geometry.row_may_separate {
                    // The band was probed with the previous line's height;
                    // re-check the span against this line's real extent.
                    let (lo, hi) = if vertical {
                        (band_head - line_height, band_head)
                    } else {
                        (band_head, band_head + line_height)
                    };
                    let full = geometry.spans_for_band(lo, hi);
                    let line_end = span_lo + shaped.advance - shaped.trailing_whitespace_width;
                    let covered = full.iter().any(|&(l, h)| {
                        l <= span_lo + CLIP_EPSILON && line_end <= h + CLIP_EPSILON
                    });
                    if !covered {
                        continue;
                    }
                }

                let position = if vertical {
                    Point::new(band_head - shaped.ascent, span_lo)
                } else {
                    Point::new(span_lo, band_head + shaped.ascent)
                };
                let mut line = Line::new(shaped, position, vertical);
                let rect = line.bounds();

                if let Some(limit) = rect_limit {
                    let overflows = if vertical {
                        rect.min_x() < limit - CLIP_EPSILON
                    } else {
                        rect.max_y() > limit + CLIP_EPSILON
                    };
                    if overflows {
                        break 'bands;
                    }
                }

                let new_row = is_new_row(
                    geometry.row_may_separate,
                    vertical,
                    rect,
                    position,
                    last_rect,
                    last_position,
                );
                let row_idx = match (new_row, row) {
                    (true, None) => 0,
                    (true, Some(current)) => current + 1,
                    (false, current) => current.unwrap_or(0),
                };
                row = Some(row_idx);
                last_rect = rect;
                last_position = position;

                line.index = lines.len();
                line.row = row_idx;
                cursor = line.range.end;

                if lines.is_empty() {
                    text_bounding_rect = rect;
                } else if max_rows == 0 || row_idx < max_rows {
                    text_bounding_rect = text_bounding_rect.union(&rect);
                }
                log::trace!(
                    "line {} row {} range {:?} at ({}, {})",
                    line.index,
                    row_idx,
                    line.range,
                    position.x,
                    position.y
                );
                lines.push(line);
                band_advance = band_advance.max(line_height);
                placed = true;
            }

            if placed {
                last_height = Some(band_advance);
                band_head = if vertical {
                    band_head - band_advance
                } else {
                    band_head + band_advance
                };
            } else {
                if !geometry.row_may_separate {
                    // A rectangular region offers the same span at every
                    // band; if nothing fit here nothing ever will.
                    break;
                }
                let step = probe.max(SCAN_STEP);
                band_head = if vertical {
                    band_head - step
                } else {
                    band_head + step
                };
            }
        }

        let mut row_count = row.map_or(0, |r| r + 1);

        let mut need_truncation = false;
        if row_count > 0 {
            if max_rows > 0 && row_count > max_rows {
                need_truncation = true;
                row_count = max_rows;
                while lines.last().is_some_and(|line| line.row >= row_count) {
                    lines.pop();
                }
            }
            if let Some(last) = lines.last() {
                if last.range.end < range.end {
                    need_truncation = true;
                }
            }
        }

        let row_index = build_row_index(&lines, row_count, vertical);
        let text_bounding_size =
            bounding_size(&container, text_bounding_rect, vertical);

        let truncated_line = if need_truncation && container.truncation != Truncation::None {
            synthesize_truncated(&container, text, &range, &lines, backend)
        } else {
            None
        };

        // The truncated line stands in for the rest of the text, so it
        // extends the visible range to the end of the input.
        let visible_end = match &truncated_line {
            Some(line) => line.range.end,
            None => lines.last().map_or(range.start, |line| line.range.end),
        };
        let visible_range = range.start..visible_end;

        let (flags, attachments, attachment_contents) = scan_attributes(text, &lines);

        Ok(Self {
            container,
            text: text.clone(),
            range,
            lines,
            truncated_line,
            row_count,
            visible_range,
            text_bounding_rect,
            text_bounding_size,
            row_index,
            attachments,
            attachment_contents,
            flags,
        })
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn text(&self) -> &AttrString {
        &self.text
    }

    /// The requested input range.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Positioned lines, excluding the truncated one.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Replacement for the last line when the layout was truncated.
    ///
    /// The line array itself is never rewritten; a renderer substitutes this
    /// line for `lines[truncated_line.index()]` when present.
    pub fn truncated_line(&self) -> Option<&Line> {
        self.truncated_line.as_ref()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Prefix of the input range that is actually visible.
    pub fn visible_range(&self) -> Range<usize> {
        self.visible_range.clone()
    }

    /// Union of the line bounds.
    pub fn text_bounding_rect(&self) -> Rect {
        self.text_bounding_rect
    }

    /// Bounding rect extended by insets (or path stroke) and rounded up to
    /// an integral size.
    pub fn text_bounding_size(&self) -> Size {
        self.text_bounding_size
    }

    pub fn row_index(&self) -> &RowIndex {
        &self.row_index
    }

    /// Laid out attachments. Attachments whose text fell beyond the visible
    /// range are absent.
    pub fn attachments(&self) -> &[AttachmentEntry] {
        &self.attachments
    }

    /// Distinct contents of the laid out attachments.
    pub fn attachment_contents(&self) -> &FxHashSet<AttachmentContent> {
        &self.attachment_contents
    }

    pub fn flags(&self) -> DrawFlags {
        self.flags
    }

    pub fn contains_highlight(&self) -> bool {
        self.flags.contains(DrawFlags::HIGHLIGHT)
    }
}

/// Row-grouping heuristic: a line shares the previous row when the region
/// may separate rows, the cross-axis position changed, and the thicker of
/// the two lines' flow extents contains the thinner one's baseline.
fn is_new_row(
    row_may_separate: bool,
    vertical: bool,
    rect: Rect,
    position: Point,
    last_rect: Rect,
    last_position: Point,
) -> bool {
    if !row_may_separate {
        return true;
    }
    if vertical {
        if position.y == last_position.y {
            return true;
        }
        if rect.width > last_rect.width {
            !(rect.min_x() < last_position.x && last_position.x < rect.max_x())
        } else {
            !(last_rect.min_x() < position.x && position.x < last_rect.max_x())
        }
    } else {
        if position.x == last_position.x {
            return true;
        }
        if rect.height > last_rect.height {
            !(rect.min_y() < last_position.y && last_position.y < rect.max_y())
        } else {
            !(last_rect.min_y() < position.y && position.y < last_rect.max_y())
        }
    }
}

fn build_row_index(lines: &[Line], row_count: usize, vertical: bool) -> RowIndex {
    if row_count == 0 {
        return RowIndex::default();
    }
    let mut edges = vec![RowEdge::default(); row_count];
    let mut first_lines = vec![0; row_count];

    let mut last_row: Option<usize> = None;
    let mut head = 0.0;
    let mut foot = 0.0;
    for (i, line) in lines.iter().enumerate() {
        let rect = line.bounds();
        if last_row != Some(line.row) {
            if let Some(row) = last_row {
                edges[row] = RowEdge { head, foot };
            }
            last_row = Some(line.row);
            first_lines[line.row] = i;
            if vertical {
                head = rect.max_x();
                foot = rect.min_x();
            } else {
                head = rect.min_y();
                foot = rect.max_y();
            }
        } else if vertical {
            head = head.max(rect.max_x());
            foot = foot.min(rect.min_x());
        } else {
            head = head.min(rect.min_y());
            foot = foot.max(rect.max_y());
        }
    }
    if let Some(row) = last_row {
        edges[row] = RowEdge { head, foot };
    }

    // Smooth adjacent boundaries to the midpoint of the gap.
    for i in 1..row_count {
        let mid = (edges[i - 1].foot + edges[i].head) * 0.5;
        edges[i - 1].foot = mid;
        edges[i].head = mid;
    }

    RowIndex { edges, first_lines }
}

fn bounding_size(container: &Container, text_bounding_rect: Rect, vertical: bool) -> Size {
    let mut rect = text_bounding_rect;
    if container.path.is_some() {
        if container.path_line_width > 0.0 {
            rect = rect.outset(container.path_line_width / 2.0);
        }
    } else {
        let insets = container.insets;
        rect = rect.inset(EdgeInsets::new(
            -insets.top,
            -insets.left,
            -insets.bottom,
            -insets.right,
        ));
    }
    rect = rect.standardized();

    let mut size = rect.size();
    if vertical {
        size.width += container.size.width - rect.max_x();
    } else {
        size.width += rect.min_x();
    }
    size.height += rect.min_y();

    // Round up so descenders and trailing glyphs are never clipped.
    Size::new(size.width.ceil().max(0.0), size.height.ceil().max(0.0))
}

fn synthesize_truncated<B: ShapeBackend>(
    container: &Container,
    text: &AttrString,
    range: &Range<usize>,
    lines: &[Line],
    backend: &mut B,
) -> Option<Line> {
    let last = lines.last()?;
    if last.range.end >= range.end {
        return None;
    }
    let side = match container.truncation {
        Truncation::None => return None,
        Truncation::Start => TruncateSide::Start,
        Truncation::Middle => TruncateSide::Middle,
        Truncation::End => TruncateSide::End,
    };

    let default_token;
    let token = match &container.truncation_token {
        Some(token) => token,
        None => {
            default_token = AttrString::new("\u{2026}", Attrs::new());
            &default_token
        }
    };

    let max_advance = container.usable_advance();
    match backend.truncate(last.shaped(), text, max_advance, side, token) {
        Ok(shaped) => {
            let mut line = Line::new(shaped, last.position(), container.vertical);
            line.index = last.index;
            line.row = last.row;
            // The truncated line stands in for all remaining text.
            line.range = last.range.start..range.end;
            Some(line)
        }
        Err(err) => {
            // Degrade gracefully: keep the original last line untruncated.
            log::debug!("truncation synthesis failed: {err}");
            None
        }
    }
}

fn ranges_intersect(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn scan_attributes(
    text: &AttrString,
    lines: &[Line],
) -> (DrawFlags, Vec<AttachmentEntry>, FxHashSet<AttachmentContent>) {
    let mut flags = DrawFlags::TEXT;
    let mut pending: Vec<(Attachment, Range<usize>)> = Vec::new();

    for (run_range, attrs) in text.attr_runs(0..text.len()) {
        if attrs.highlight {
            flags |= DrawFlags::HIGHLIGHT;
        }
        if attrs.underline {
            flags |= DrawFlags::UNDERLINE;
        }
        if attrs.strikethrough {
            flags |= DrawFlags::STRIKETHROUGH;
        }
        if attrs.shadow {
            flags |= DrawFlags::SHADOW;
        }
        if attrs.inner_shadow {
            flags |= DrawFlags::INNER_SHADOW;
        }
        if attrs.border {
            flags |= DrawFlags::BORDER;
        }
        if attrs.background_border {
            flags |= DrawFlags::BACKGROUND_BORDER;
        }
        if attrs.block_border {
            flags |= DrawFlags::BLOCK_BORDER;
        }
        if let Some(attachment) = &attrs.attachment {
            flags |= DrawFlags::ATTACHMENT;
            pending.push((attachment.clone(), run_range));
        }
    }

    let mut attachments = Vec::new();
    let mut contents = FxHashSet::default();
    for (attachment, attachment_range) in pending {
        let owning_line = lines
            .iter()
            .find(|line| ranges_intersect(&line.range, &attachment_range));
        // Attachments in truncated or overflow text are dropped, not left
        // dangling.
        let Some(line) = owning_line else {
            continue;
        };
        // Attachments are placeholders whose visual box is assigned from the
        // owning line, not from shaping metrics.
        let rect = line.bounds().inset(attachment.content_insets);
        contents.insert(attachment.content);
        attachments.push(AttachmentEntry {
            attachment,
            range: attachment_range,
            rect,
        });
    }

    (flags, attachments, contents)
}
