// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Point, Rect};

/// Rule deciding which points are inside a [`ClosedPath`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    #[default]
    EvenOdd,
    Winding,
}

/// A closed polygonal region, possibly made of several subpaths.
///
/// Curved shapes are represented by flattened polygons; [`ClosedPath::circle`]
/// produces one. The layout engine queries the region with axis-aligned
/// scanlines, so resolution is bounded by the flattening, not the query.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosedPath {
    subpaths: Vec<Vec<Point>>,
}

impl ClosedPath {
    /// A rectangular region.
    pub fn rect(rect: Rect) -> Self {
        let rect = rect.standardized();
        Self {
            subpaths: vec![vec![
                Point::new(rect.min_x(), rect.min_y()),
                Point::new(rect.max_x(), rect.min_y()),
                Point::new(rect.max_x(), rect.max_y()),
                Point::new(rect.min_x(), rect.max_y()),
            ]],
        }
    }

    /// A circular region flattened to `segments` edges.
    pub fn circle(center: Point, radius: f32, segments: usize) -> Self {
        let segments = segments.max(8);
        let mut points = Vec::with_capacity(segments);
        for i in 0..segments {
            let angle = (i as f32) / (segments as f32) * core::f32::consts::TAU;
            points.push(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        Self {
            subpaths: vec![points],
        }
    }

    /// A region from explicit subpaths. Subpaths with fewer than three points
    /// are discarded.
    pub fn from_subpaths(subpaths: Vec<Vec<Point>>) -> Self {
        Self {
            subpaths: subpaths.into_iter().filter(|s| s.len() >= 3).collect(),
        }
    }

    /// Appends another path's subpaths to this one.
    pub fn push_path(&mut self, other: &ClosedPath) {
        self.subpaths.extend(other.subpaths.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn bounding_box(&self) -> Rect {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for subpath in &self.subpaths {
            for p in subpath {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
        }
        if min_x > max_x || min_y > max_y {
            return Rect::ZERO;
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// If the path is a single axis-aligned rectangle, returns it.
    pub fn as_rect(&self) -> Option<Rect> {
        if self.subpaths.len() != 1 {
            return None;
        }
        let points = &self.subpaths[0];
        if points.len() != 4 {
            return None;
        }
        let bb = self.bounding_box();
        let on_corner = |p: &Point| {
            (p.x == bb.min_x() || p.x == bb.max_x()) && (p.y == bb.min_y() || p.y == bb.max_y())
        };
        if points.iter().all(on_corner) {
            Some(bb)
        } else {
            None
        }
    }

    /// Horizontal spans covered by the region at height `y`, sorted and
    /// disjoint.
    pub fn spans_at_y(&self, y: f32, rule: FillRule) -> Vec<(f32, f32)> {
        self.scan(rule, |p| (p.y, p.x), y)
    }

    /// Vertical spans covered by the region at `x`, sorted and disjoint.
    pub fn spans_at_x(&self, x: f32, rule: FillRule) -> Vec<(f32, f32)> {
        self.scan(rule, |p| (p.x, p.y), x)
    }

    pub fn contains(&self, point: Point, rule: FillRule) -> bool {
        self.spans_at_y(point.y, rule)
            .iter()
            .any(|&(lo, hi)| point.x >= lo && point.x < hi)
    }

    fn scan(&self, rule: FillRule, project: impl Fn(&Point) -> (f32, f32), at: f32) -> Vec<(f32, f32)> {
        // Crossing events: coordinate along the scanline plus edge direction.
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for subpath in &self.subpaths {
            let n = subpath.len();
            for i in 0..n {
                let (a_t, a_s) = project(&subpath[i]);
                let (b_t, b_s) = project(&subpath[(i + 1) % n]);
                if (a_t <= at && at < b_t) || (b_t <= at && at < a_t) {
                    let s = a_s + (at - a_t) * (b_s - a_s) / (b_t - a_t);
                    crossings.push((s, if b_t > a_t { 1 } else { -1 }));
                }
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut spans = Vec::new();
        match rule {
            FillRule::EvenOdd => {
                for pair in crossings.chunks_exact(2) {
                    push_span(&mut spans, pair[0].0, pair[1].0);
                }
            }
            FillRule::Winding => {
                let mut winding = 0;
                let mut start = 0.0;
                for (s, dir) in crossings {
                    if winding == 0 {
                        start = s;
                    }
                    winding += dir;
                    if winding == 0 {
                        push_span(&mut spans, start, s);
                    }
                }
            }
        }
        spans
    }
}

fn push_span(spans: &mut Vec<(f32, f32)>, lo: f32, hi: f32) {
    if hi <= lo {
        return;
    }
    // Coalesce with the previous span when touching.
    if let Some(last) = spans.last_mut() {
        if lo <= last.1 {
            last.1 = last.1.max(hi);
            return;
        }
    }
    spans.push((lo, hi));
}

/// Intersection of two sorted disjoint span lists.
pub(crate) fn intersect_spans(a: &[(f32, f32)], b: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].0.max(b[j].0);
        let hi = a[i].1.min(b[j].1);
        if hi > lo {
            out.push((lo, hi));
        }
        if a[i].1 < b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Removes `cut` from `base`; both sorted and disjoint.
pub(crate) fn subtract_spans(base: &[(f32, f32)], cut: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    for &(mut lo, hi) in base {
        for &(c_lo, c_hi) in cut {
            if c_hi <= lo || c_lo >= hi {
                continue;
            }
            if c_lo > lo {
                out.push((lo, c_lo));
            }
            lo = lo.max(c_hi);
            if lo >= hi {
                break;
            }
        }
        if lo < hi {
            out.push((lo, hi));
        }
    }
    out
}
