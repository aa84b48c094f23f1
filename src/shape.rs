// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Attachment, AttrString, ShapeError};

/// Which side of a line a truncation token is inserted at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruncateSide {
    Start,
    Middle,
    End,
}

/// One run of a shaped line: a byte range with uniform attributes, its
/// advance, and its cross-axis offset from the line origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedRun {
    pub range: Range<usize>,
    pub advance: f32,
    pub offset: f32,
    pub attachment: Option<Attachment>,
}

/// A measured line produced by a [`ShapeBackend`].
///
/// The layout engine treats this as opaque typographic data: it reads the
/// metrics and the per-run attachment attribution, and never inspects
/// glyphs. All offsets are byte offsets into the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedLine {
    pub range: Range<usize>,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    pub advance: f32,
    pub trailing_whitespace_width: f32,
    pub first_glyph_offset: f32,
    pub runs: Vec<ShapedRun>,
}

impl ShapedLine {
    /// Typographic thickness of the line across the flow axis.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    pub(crate) fn empty(at: usize) -> Self {
        Self {
            range: at..at,
            ascent: 0.0,
            descent: 0.0,
            leading: 0.0,
            advance: 0.0,
            trailing_whitespace_width: 0.0,
            first_glyph_offset: 0.0,
            runs: Vec::new(),
        }
    }
}

/// External text shaping capability consumed by the layout engine.
///
/// Any shaper (HarfBuzz, CoreText, a test stub) can drive the engine by
/// satisfying this contract. Implementations must be deterministic for
/// identical inputs; the engine relies on that for idempotent layout.
pub trait ShapeBackend {
    /// Shapes the longest prefix of `range` that fits in `max_advance`,
    /// breaking at a line break opportunity where possible.
    ///
    /// Returns a line with an empty range when nothing fits.
    fn shape_line(
        &mut self,
        text: &AttrString,
        range: Range<usize>,
        max_advance: f32,
    ) -> Result<ShapedLine, ShapeError>;

    /// Produces a truncated variant of `line` constrained to `max_advance`
    /// with `token` inserted at `side`.
    fn truncate(
        &mut self,
        line: &ShapedLine,
        text: &AttrString,
        max_advance: f32,
        side: TruncateSide,
        token: &AttrString,
    ) -> Result<ShapedLine, ShapeError>;
}

const FIT_EPSILON: f32 = 0.001;

/// Deterministic fixed-advance reference backend.
///
/// Every grapheme cluster advances by the same amount, except attachment
/// spans which advance by their content width. Breaks follow UAX #14 line
/// break opportunities. This backend exists so the engine can be exercised
/// and benchmarked without a font stack; production callers plug in a real
/// shaper through [`ShapeBackend`].
#[derive(Clone, Debug)]
pub struct Monospace {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl Default for Monospace {
    fn default() -> Self {
        Self {
            advance: 10.0,
            ascent: 8.0,
            descent: 2.0,
            leading: 0.0,
        }
    }
}

impl Monospace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(advance: f32, ascent: f32, descent: f32, leading: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
            leading,
        }
    }

    fn grapheme_advance(&self, grapheme: &str, text: &AttrString, offset: usize) -> f32 {
        if grapheme == "\n" || grapheme == "\r\n" || grapheme == "\r" {
            return 0.0;
        }
        match &text.attrs_list().get_span(offset).attachment {
            Some(attachment) => attachment.content_size.width,
            None => self.advance,
        }
    }

    fn measure(&self, text: &AttrString, range: Range<usize>) -> f32 {
        let mut total = 0.0;
        for (off, grapheme) in text.text()[range.clone()].grapheme_indices(true) {
            total += self.grapheme_advance(grapheme, text, range.start + off);
        }
        total
    }

    fn trailing_whitespace(&self, text: &AttrString, range: Range<usize>) -> f32 {
        let slice = &text.text()[range.clone()];
        let mut width = 0.0;
        for (off, grapheme) in slice.grapheme_indices(true).rev() {
            if grapheme.chars().all(char::is_whitespace) {
                width += self.grapheme_advance(grapheme, text, range.start + off);
            } else {
                break;
            }
        }
        width
    }

    fn build_runs(&self, text: &AttrString, range: Range<usize>) -> (Vec<ShapedRun>, f32) {
        let mut runs = Vec::new();
        let mut offset = 0.0;
        for (run_range, attrs) in text.attr_runs(range) {
            let advance = self.measure(text, run_range.clone());
            runs.push(ShapedRun {
                range: run_range,
                advance,
                offset,
                attachment: attrs.attachment.clone(),
            });
            offset += advance;
        }
        (runs, offset)
    }

    fn line_over(&self, text: &AttrString, range: Range<usize>) -> ShapedLine {
        let (runs, advance) = self.build_runs(text, range.clone());
        ShapedLine {
            trailing_whitespace_width: self.trailing_whitespace(text, range.clone()),
            range,
            ascent: self.ascent,
            descent: self.descent,
            leading: self.leading,
            advance,
            first_glyph_offset: 0.0,
            runs,
        }
    }
}

impl ShapeBackend for Monospace {
    fn shape_line(
        &mut self,
        text: &AttrString,
        range: Range<usize>,
        max_advance: f32,
    ) -> Result<ShapedLine, ShapeError> {
        if range.is_empty() || max_advance <= 0.0 {
            return Ok(ShapedLine::empty(range.start));
        }
        let slice = &text.text()[range.clone()];

        let mut allowed: Vec<usize> = Vec::new();
        let mut mandatory: Vec<usize> = Vec::new();
        for (off, opportunity) in linebreaks(slice) {
            match opportunity {
                BreakOpportunity::Mandatory => {
                    if off < slice.len() {
                        mandatory.push(off);
                    }
                    allowed.push(off);
                }
                BreakOpportunity::Allowed => allowed.push(off),
            }
        }

        let mut fit_end = 0;
        let mut cum = 0.0;
        let mut hard_end = None;
        for (off, grapheme) in slice.grapheme_indices(true) {
            let end = off + grapheme.len();
            let advance = self.grapheme_advance(grapheme, text, range.start + off);
            if cum + advance > max_advance + FIT_EPSILON {
                break;
            }
            cum += advance;
            fit_end = end;
            if mandatory.contains(&end) {
                hard_end = Some(end);
                break;
            }
        }

        let cut = if let Some(hard) = hard_end {
            hard
        } else if fit_end == slice.len() {
            fit_end
        } else {
            // Overflow: back up to the last break opportunity, or break the
            // word when no opportunity fits.
            allowed
                .iter()
                .copied()
                .filter(|&b| b > 0 && b <= fit_end)
                .max()
                .unwrap_or(fit_end)
        };
        if cut == 0 {
            return Ok(ShapedLine::empty(range.start));
        }

        Ok(self.line_over(text, range.start..range.start + cut))
    }

    fn truncate(
        &mut self,
        line: &ShapedLine,
        text: &AttrString,
        max_advance: f32,
        side: TruncateSide,
        token: &AttrString,
    ) -> Result<ShapedLine, ShapeError> {
        let token_advance = {
            let mut total = 0.0;
            for (off, grapheme) in token.text().grapheme_indices(true) {
                total += self.grapheme_advance(grapheme, token, off);
            }
            total
        };
        if token_advance > max_advance + FIT_EPSILON {
            return Err(ShapeError::new("truncation token wider than line"));
        }
        let budget = max_advance - token_advance;

        let graphemes: Vec<(usize, f32)> = text.text()[line.range.clone()]
            .grapheme_indices(true)
            .map(|(off, g)| {
                (
                    line.range.start + off + g.len(),
                    self.grapheme_advance(g, text, line.range.start + off),
                )
            })
            .collect();

        let take_prefix = |limit: f32| {
            let mut end = line.range.start;
            let mut used = 0.0;
            for &(g_end, advance) in &graphemes {
                if used + advance > limit + FIT_EPSILON {
                    break;
                }
                used += advance;
                end = g_end;
            }
            (end, used)
        };
        let take_suffix = |limit: f32| {
            let mut start = line.range.end;
            let mut used = 0.0;
            for (i, &(_, advance)) in graphemes.iter().enumerate().rev() {
                if used + advance > limit + FIT_EPSILON {
                    break;
                }
                used += advance;
                start = if i == 0 {
                    line.range.start
                } else {
                    graphemes[i - 1].0
                };
            }
            (start, used)
        };

        let token_run = |at: usize, offset: f32| ShapedRun {
            range: at..at,
            advance: token_advance,
            offset,
            attachment: None,
        };

        let (runs, advance) = match side {
            TruncateSide::End => {
                let (end, used) = take_prefix(budget);
                let (mut runs, _) = self.build_runs(text, line.range.start..end);
                runs.push(token_run(end, used));
                (runs, used + token_advance)
            }
            TruncateSide::Start => {
                let (start, used) = take_suffix(budget);
                let mut runs = vec![token_run(start, 0.0)];
                let (tail, _) = self.build_runs(text, start..line.range.end);
                let shift = token_advance;
                runs.extend(tail.into_iter().map(|mut run| {
                    run.offset += shift;
                    run
                }));
                (runs, used + token_advance)
            }
            TruncateSide::Middle => {
                let (head_end, head_used) = take_prefix(budget * 0.5);
                let (tail_start, tail_used) = take_suffix(budget - head_used);
                let (mut runs, _) = self.build_runs(text, line.range.start..head_end);
                runs.push(token_run(head_end, head_used));
                let (tail, _) = self.build_runs(text, tail_start.max(head_end)..line.range.end);
                let shift = head_used + token_advance;
                runs.extend(tail.into_iter().map(|mut run| {
                    run.offset += shift;
                    run
                }));
                (runs, head_used + token_advance + tail_used)
            }
        };

        Ok(ShapedLine {
            range: line.range.clone(),
            ascent: self.ascent,
            descent: self.descent,
            leading: self.leading,
            advance,
            trailing_whitespace_width: 0.0,
            first_glyph_offset: 0.0,
            runs,
        })
    }
}
