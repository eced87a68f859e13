//! Minimal 2D geometry contract: points, bounding boxes, and straight-line
//! subpaths.
//!
//! The planning core is written against a thin geometry contract rather than
//! a full vector-graphics algebra: callers are expected to hand in paths
//! already expressed as straight-line primitives (curves pre-flattened to a
//! polygonal approximation), already in absolute coordinates (any transform
//! has already been applied upstream). That is the full extent of what
//! [`Subpath`] and [`Drawing`] model here; a richer library (affine
//! transforms, Bezier sampling, SVG path commands) is assumed to sit above
//! this crate, not inside it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::{calc_distance, calc_sq_distance};

/// Source of stable identity for [`Subpath`], handed out once per
/// constructed subpath and preserved across in-place mutation (e.g.
/// `reverse()`). Used by the cut planner to tell subpath *values* apart
/// independent of where they currently sit in a `Vec<Subpath>`, since a
/// slot's address stays constant across `Vec::swap` while the value living
/// there does not.
static NEXT_SUBPATH_ID: AtomicU64 = AtomicU64::new(0);

fn next_subpath_id() -> u64 {
    NEXT_SUBPATH_ID.fetch_add(1, Ordering::Relaxed)
}

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        calc_distance(self.x, self.y, other.x, other.y)
    }

    /// Squared Euclidean distance to another point (avoids the `sqrt` when
    /// only relative ordering matters, as in `two_opt`'s scoring).
    pub fn distance_sq(&self, other: &Point) -> f64 {
        calc_sq_distance(self.x, self.y, other.x, other.y)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        BoundingBox {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    fn from_point(p: Point) -> Self {
        BoundingBox::new(p.x, p.y, p.x, p.y)
    }

    fn union_point(&mut self, p: Point) {
        if p.x < self.xmin {
            self.xmin = p.x;
        }
        if p.y < self.ymin {
            self.ymin = p.y;
        }
        if p.x > self.xmax {
            self.xmax = p.x;
        }
        if p.y > self.ymax {
            self.ymax = p.y;
        }
    }

    /// Union of two bounding boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.xmin.min(other.xmin),
            self.ymin.min(other.ymin),
            self.xmax.max(other.xmax),
            self.ymax.max(other.ymax),
        )
    }

    /// True iff `self` dominates `inner` on all four sides, i.e. `inner` is
    /// not excluded from being contained within `self` by a simple bbox
    /// comparison. This is the fast-reject step of `is_inside`, not a full
    /// containment test.
    pub fn dominates(&self, inner: &BoundingBox) -> bool {
        self.xmin <= inner.xmin
            && self.ymin <= inner.ymin
            && self.xmax >= inner.xmax
            && self.ymax >= inner.ymax
    }
}

/// One segment of a subpath: either non-contributing travel (`Move`) or a
/// contributing straight edge (`Line`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// A non-cutting jump. `start` is `None` only for the very first
    /// primitive of a `Drawing`.
    Move { start: Option<Point>, end: Point },
    /// A straight cutting edge.
    Line { start: Point, end: Point },
}

impl Primitive {
    pub fn end(&self) -> Point {
        match *self {
            Primitive::Move { end, .. } => end,
            Primitive::Line { end, .. } => end,
        }
    }

    pub fn start(&self) -> Option<Point> {
        match *self {
            Primitive::Move { start, .. } => start,
            Primitive::Line { start, .. } => Some(start),
        }
    }
}

/// A contiguous sequence of primitives: one leading `Move` (the entry jump)
/// followed by zero or more `Line`s.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    primitives: Vec<Primitive>,
    id: u64,
}

impl Subpath {
    /// Build a subpath from a polyline, closing it into a ring if `close`.
    /// `points` must contain at least one point; a single point produces a
    /// subpath holding only its entry `Move`.
    pub fn from_points(points: &[Point], close: bool) -> Subpath {
        assert!(!points.is_empty(), "subpath requires at least one point");
        let mut primitives = Vec::with_capacity(points.len());
        primitives.push(Primitive::Move {
            start: None,
            end: points[0],
        });
        for w in points.windows(2) {
            primitives.push(Primitive::Line {
                start: w[0],
                end: w[1],
            });
        }
        let mut subpath = Subpath { primitives, id: next_subpath_id() };
        if close && points.len() > 1 && points[0] != *points.last().unwrap() {
            subpath.direct_close();
        }
        subpath
    }

    /// Stable identity, assigned once at construction and preserved across
    /// in-place mutation (`direct_close`, `reverse`). Two `Subpath`s compare
    /// equal under this only if one was produced from the other by such
    /// mutation; a fresh `from_points` call always mints a new id, even for
    /// identical coordinates.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Like [`Self::from_points`], but rejects non-finite coordinates
    /// instead of silently propagating `NaN`/`inf` into every downstream
    /// distance and intercept calculation.
    pub fn from_points_checked(points: &[Point], close: bool) -> Result<Subpath, String> {
        if points.is_empty() {
            return Err("subpath requires at least one point".to_string());
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(format!("non-finite point in subpath: ({}, {})", p.x, p.y));
        }
        Ok(Subpath::from_points(points, close))
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn start_point(&self) -> Point {
        self.primitives[0].end()
    }

    pub fn end_point(&self) -> Point {
        self.primitives[self.primitives.len() - 1].end()
    }

    /// Whether the subpath's first and last points coincide exactly. No
    /// epsilon tolerance is applied, matching the source behavior this is
    /// derived from.
    pub fn is_closed(&self) -> bool {
        self.start_point() == self.end_point()
    }

    /// Appends a `Line` back to the start point if the subpath is not
    /// already closed. Makes ring closure explicit before a reversal, so
    /// reversing doesn't silently drop the closing edge.
    pub fn direct_close(&mut self) {
        if !self.is_closed() {
            let start = self.start_point();
            let end = self.end_point();
            self.primitives.push(Primitive::Line { start: end, end: start });
        }
    }

    /// Reverses traversal direction in place: the sequence of points
    /// visited is reversed, so a ring is walked the other way around and
    /// an open subpath swaps its start and end.
    pub fn reverse(&mut self) {
        if self.primitives.is_empty() {
            return;
        }
        let mut points: Vec<Point> = Vec::with_capacity(self.primitives.len());
        points.push(self.primitives[0].end());
        for p in &self.primitives[1..] {
            points.push(p.end());
        }
        points.reverse();
        let id = self.id;
        *self = Subpath::from_points(&points, false);
        self.id = id;
    }

    /// Bounding box over every endpoint in the subpath.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let mut iter = self.primitives.iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::from_point(first.end());
        if let Some(start) = first.start() {
            bbox.union_point(start);
        }
        for p in iter {
            bbox.union_point(p.end());
            if let Some(start) = p.start() {
                bbox.union_point(start);
            }
        }
        Some(bbox)
    }

    /// Samples the polyline formed by this subpath's `Line` primitives at
    /// parameter `t` in `[0, 1]`, proportional to cumulative arc length. A
    /// subpath with no `Line` primitives returns its single point for any
    /// `t`.
    pub fn point(&self, t: f64) -> Point {
        let lines: Vec<(Point, Point)> = self
            .primitives
            .iter()
            .filter_map(|p| match *p {
                Primitive::Line { start, end } => Some((start, end)),
                Primitive::Move { .. } => None,
            })
            .collect();
        if lines.is_empty() {
            return self.start_point();
        }
        let lengths: Vec<f64> = lines.iter().map(|(a, b)| a.distance(b)).collect();
        let total: f64 = lengths.iter().sum();
        if total <= 0.0 {
            return lines[0].0;
        }
        let target = t.clamp(0.0, 1.0) * total;
        let mut accum = 0.0;
        for ((a, b), len) in lines.iter().zip(lengths.iter()) {
            if target <= accum + len || *len == 0.0 {
                let local_t = if *len > 0.0 { (target - accum) / len } else { 0.0 };
                return Point::new(a.x + local_t * (b.x - a.x), a.y + local_t * (b.y - a.y));
            }
            accum += len;
        }
        lines.last().unwrap().1
    }

    /// Samples `n` equally spaced parametric points (`i / (n - 1)` for
    /// `i in 0..n`), forming the polygonal approximation used by
    /// containment tests and by fill tracing.
    pub fn sample_polygon(&self, n: usize) -> Vec<Point> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![self.point(0.0)];
        }
        (0..n).map(|i| self.point(i as f64 / (n - 1) as f64)).collect()
    }
}

/// A full (possibly multi-subpath) drawing: the result of exploding a
/// drawing into its subpaths is itself a `Vec<Subpath>`, matching the
/// external library's `as_subpaths()`.
pub type Drawing = Vec<Subpath>;

/// Splits a `Drawing` into its already-exploded subpaths. This is an
/// identity operation for our `Drawing` representation, kept as a named
/// function because the spec calls the conceptual step out explicitly.
pub fn as_subpaths(drawing: &Drawing) -> Vec<Subpath> {
    drawing.clone()
}

/// Union of the bounding boxes of every subpath, or `None` if `subpaths` is
/// empty or every subpath is degenerate.
pub fn bounding_box(subpaths: &[Subpath]) -> Option<BoundingBox> {
    subpaths.iter().filter_map(|p| p.bbox()).reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_bbox_and_closed() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let sp = Subpath::from_points(&pts, true);
        assert!(sp.is_closed());
        let bbox = sp.bbox().unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn open_subpath_direct_close_appends_edge() {
        let pts = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)];
        let mut sp = Subpath::from_points(&pts, false);
        assert!(!sp.is_closed());
        sp.direct_close();
        assert!(sp.is_closed());
    }

    #[test]
    fn reverse_flips_direction_and_keeps_ring() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let mut sp = Subpath::from_points(&pts, true);
        let forward_second = sp.primitives()[1].end();
        sp.reverse();
        assert!(sp.is_closed());
        assert_ne!(sp.primitives()[1].end(), forward_second);
    }

    #[test]
    fn point_samples_proportionally_along_length() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let sp = Subpath::from_points(&pts, false);
        let mid = sp.point(0.5);
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!((mid.y).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_of_empty_list_is_none() {
        assert!(bounding_box(&[]).is_none());
    }

    #[test]
    fn from_points_checked_rejects_non_finite_coordinates() {
        let pts = [Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        assert!(Subpath::from_points_checked(&pts, false).is_err());
    }

    #[test]
    fn from_points_checked_accepts_finite_coordinates() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(Subpath::from_points_checked(&pts, false).is_ok());
    }

    #[test]
    fn dominates_requires_all_four_sides() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
        assert!(outer.dominates(&inner));
        assert!(!inner.dominates(&outer));
    }
}
