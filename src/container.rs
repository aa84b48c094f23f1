// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::path::{intersect_spans, subtract_spans};
use crate::{AttrString, ClosedPath, EdgeInsets, FillRule, LayoutError, Rect, Size};

/// Containers larger than this are treated as unbounded along that axis.
pub const CONTAINER_MAX_SIZE: f32 = 100_000.0;

/// How an overflowing last line is truncated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Truncation {
    #[default]
    None,
    Start,
    Middle,
    End,
}

/// The region text is laid out within.
///
/// A container is either a simple inset rectangle (`size` and `insets`) or an
/// arbitrary closed region (`path`), optionally with exclusion paths that text
/// flows around:
///
/// ```text
///     ┌─────────────────────────────┐  <------- container
///     │                             │
///     │    asdfasdfasdfasdfasdfa   <------------ container insets
///     │    asdfasdfa   asdfasdfa    │
///     │    asdfas         asdasd    │
///     │    asdfa        <----------------------- container exclusion path
///     │    asdfas         adfasd    │
///     │    asdfasdfa   asdfasdfa    │
///     │    asdfasdfasdfasdfasdfa    │
///     │                             │
///     └─────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    /// Constraint size. Ignored when `path` is set.
    pub size: Size,
    /// Insets applied to `size`. Values should not be negative.
    pub insets: EdgeInsets,
    /// Custom region. Setting this ignores `size` and `insets`.
    pub path: Option<ClosedPath>,
    /// Regions text flows around.
    pub exclusion_paths: Vec<ClosedPath>,
    /// Stroke width of the path; half of it pads the bounding size.
    pub path_line_width: f32,
    /// Membership rule for `path`.
    pub path_fill_rule: FillRule,
    /// Vertical writing mode: lines are columns advancing right to left.
    pub vertical: bool,
    /// Maximum number of rows, 0 for unbounded.
    pub max_rows: u32,
    /// Truncation applied when text overflows `max_rows` or the region.
    pub truncation: Truncation,
    /// Token substituted into a truncated line; an ellipsis when `None`.
    pub truncation_token: Option<AttrString>,
}

impl Container {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            insets: EdgeInsets::ZERO,
            path: None,
            exclusion_paths: Vec::new(),
            path_line_width: 0.0,
            path_fill_rule: FillRule::default(),
            vertical: false,
            max_rows: 0,
            truncation: Truncation::None,
            truncation_token: None,
        }
    }

    pub fn with_path(path: ClosedPath) -> Self {
        let mut container = Self::new(path.bounding_box().size());
        container.path = Some(path);
        container
    }

    pub fn insets(mut self, insets: EdgeInsets) -> Self {
        self.insets = insets;
        self
    }

    pub fn exclusion_paths(mut self, exclusion_paths: Vec<ClosedPath>) -> Self {
        self.exclusion_paths = exclusion_paths;
        self
    }

    pub fn path_line_width(mut self, path_line_width: f32) -> Self {
        self.path_line_width = path_line_width;
        self
    }

    pub fn path_fill_rule(mut self, path_fill_rule: FillRule) -> Self {
        self.path_fill_rule = path_fill_rule;
        self
    }

    pub fn vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn truncation_token(mut self, token: AttrString) -> Self {
        self.truncation_token = Some(token);
        self
    }

    /// Width (height in vertical mode) usable by a line after insets.
    pub(crate) fn usable_advance(&self) -> f32 {
        if let Some(path) = &self.path {
            let bb = path.bounding_box();
            if self.vertical {
                bb.height
            } else {
                bb.width
            }
        } else if self.vertical {
            self.size.height - self.insets.top - self.insets.bottom
        } else {
            self.size.width - self.insets.left - self.insets.right
        }
    }

    /// Turns the declarative container into a concrete fill geometry.
    pub(crate) fn resolve(&self) -> Result<FillGeometry, LayoutError> {
        let has_exclusions = !self.exclusion_paths.is_empty();

        if self.path.is_none() && !has_exclusions {
            // Rectangular fast path. The flow axis is extended so the shaping
            // loop can produce one line past the true constraint, which is
            // then discarded; see `FillGeometry::clip`.
            if self.size.width <= 0.0 || self.size.height <= 0.0 {
                return Err(LayoutError::EmptyRegion);
            }
            let rect = Rect::from_size(self.size).inset(self.insets).standardized();
            if rect.is_empty() {
                return Err(LayoutError::EmptyRegion);
            }
            let mut bounds = rect;
            if self.vertical {
                bounds.x = rect.max_x() - CONTAINER_MAX_SIZE;
                bounds.width = CONTAINER_MAX_SIZE;
            } else {
                bounds.height = CONTAINER_MAX_SIZE;
            }
            return Ok(FillGeometry {
                bounds,
                clip: Some(rect),
                row_may_separate: false,
                vertical: self.vertical,
                region: RegionKind::Rect,
            });
        }

        if let (Some(path), false) = (&self.path, has_exclusions) {
            if let Some(rect) = path.as_rect() {
                // Rectangular path without exclusions behaves like a plain
                // rect, without the extension.
                let rect = rect.standardized();
                if rect.is_empty() {
                    return Err(LayoutError::EmptyRegion);
                }
                return Ok(FillGeometry {
                    bounds: rect,
                    clip: None,
                    row_may_separate: false,
                    vertical: self.vertical,
                    region: RegionKind::Rect,
                });
            }
        }

        let fill = match &self.path {
            Some(path) => path.clone(),
            None => ClosedPath::rect(Rect::from_size(self.size).inset(self.insets).standardized()),
        };
        let bounds = fill.bounding_box();
        if fill.is_empty() || bounds.is_empty() {
            return Err(LayoutError::EmptyRegion);
        }
        Ok(FillGeometry {
            bounds,
            clip: None,
            row_may_separate: true,
            vertical: self.vertical,
            region: RegionKind::Path {
                fill,
                exclusions: self.exclusion_paths.clone(),
                rule: self.path_fill_rule,
            },
        })
    }
}

#[derive(Clone, Debug)]
enum RegionKind {
    Rect,
    Path {
        fill: ClosedPath,
        exclusions: Vec<ClosedPath>,
        rule: FillRule,
    },
}

/// A resolved container: the box lines are generated within plus a span
/// query for the shaping loop.
#[derive(Clone, Debug)]
pub(crate) struct FillGeometry {
    /// Box lines are generated within. Extended along the flow axis for the
    /// rectangular fast path.
    pub bounds: Rect,
    /// True constraint when `bounds` was extended; lines whose bounds exceed
    /// it are discarded.
    pub clip: Option<Rect>,
    /// Two lines may share a row on either side of an obstacle.
    pub row_may_separate: bool,
    pub vertical: bool,
    region: RegionKind,
}

const BAND_EPSILON: f32 = 0.01;

impl FillGeometry {
    /// Cross-axis spans available to a line occupying the flow band
    /// `lo..hi`. For horizontal text the band is a y interval and spans are
    /// x intervals; vertical text swaps the axes.
    ///
    /// The band is sampled at its edges and midpoint and the samples are
    /// intersected, so a span is only reported where it holds across the
    /// whole band (up to path flattening).
    pub fn spans_for_band(&self, lo: f32, hi: f32) -> Vec<(f32, f32)> {
        match &self.region {
            RegionKind::Rect => {
                let (band_lo, band_hi, cross_lo, cross_hi) = if self.vertical {
                    (self.bounds.min_x(), self.bounds.max_x(), self.bounds.min_y(), self.bounds.max_y())
                } else {
                    (self.bounds.min_y(), self.bounds.max_y(), self.bounds.min_x(), self.bounds.max_x())
                };
                if hi < band_lo || lo > band_hi {
                    Vec::new()
                } else {
                    vec![(cross_lo, cross_hi)]
                }
            }
            RegionKind::Path {
                fill,
                exclusions,
                rule,
            } => {
                let mut samples = vec![lo + BAND_EPSILON];
                if hi - lo > 2.0 * BAND_EPSILON {
                    samples.push((lo + hi) * 0.5);
                    samples.push(hi - BAND_EPSILON);
                }
                let mut result: Option<Vec<(f32, f32)>> = None;
                for at in samples {
                    let mut spans = if self.vertical {
                        fill.spans_at_x(at, *rule)
                    } else {
                        fill.spans_at_y(at, *rule)
                    };
                    for exclusion in exclusions {
                        let cut = if self.vertical {
                            exclusion.spans_at_x(at, *rule)
                        } else {
                            exclusion.spans_at_y(at, *rule)
                        };
                        spans = subtract_spans(&spans, &cut);
                    }
                    result = Some(match result {
                        Some(prev) => intersect_spans(&prev, &spans),
                        None => spans,
                    });
                }
                result.unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn zero_size_is_empty_region() {
        let container = Container::new(Size::ZERO);
        assert_eq!(container.resolve().unwrap_err(), LayoutError::EmptyRegion);
    }

    #[test]
    fn insets_consuming_whole_size_are_empty_region() {
        let container =
            Container::new(Size::new(100.0, 40.0)).insets(EdgeInsets::uniform(20.0));
        assert_eq!(container.resolve().unwrap_err(), LayoutError::EmptyRegion);
    }

    #[test]
    fn rect_fast_path_is_extended() {
        let geometry = Container::new(Size::new(100.0, 50.0)).resolve().unwrap();
        assert!(!geometry.row_may_separate);
        assert_eq!(geometry.clip, Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert!(geometry.bounds.height >= CONTAINER_MAX_SIZE);
        assert_eq!(
            geometry.spans_for_band(0.0, 10.0),
            vec![(0.0, 100.0)]
        );
    }

    #[test]
    fn rect_path_is_not_extended() {
        let container =
            Container::with_path(ClosedPath::rect(Rect::new(0.0, 0.0, 100.0, 50.0)));
        let geometry = container.resolve().unwrap();
        assert!(!geometry.row_may_separate);
        assert_eq!(geometry.clip, None);
        assert_eq!(geometry.bounds, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn exclusions_split_bands() {
        let container = Container::new(Size::new(200.0, 200.0)).exclusion_paths(vec![
            ClosedPath::rect(Rect::new(80.0, 0.0, 40.0, 200.0)),
        ]);
        let geometry = container.resolve().unwrap();
        assert!(geometry.row_may_separate);
        let spans = geometry.spans_for_band(50.0, 60.0);
        assert_eq!(spans, vec![(0.0, 80.0), (120.0, 200.0)]);
    }

    #[test]
    fn circle_exclusion_narrows_midrows_only() {
        let container = Container::new(Size::new(200.0, 200.0)).exclusion_paths(vec![
            ClosedPath::circle(Point::new(100.0, 100.0), 40.0, 128),
        ]);
        let geometry = container.resolve().unwrap();
        assert_eq!(geometry.spans_for_band(10.0, 20.0).len(), 1);
        assert_eq!(geometry.spans_for_band(95.0, 105.0).len(), 2);
    }
}
