//! Cut-order planning: nests inner outlines before outer ones, then runs a
//! 2-opt pass to shorten total travel between cuts.
//!
//! `is_inside` memoizes each path's bounding box and polygon monotonizer in
//! a side table keyed by `Subpath::id()`, rather than stamping attributes
//! onto the path object the way the system this is derived from does — the
//! memo lives only as long as the [`CutPlanner`] that built it, so there is
//! nothing to clean up once a planning call returns. Keying on `id()`
//! rather than on a `Subpath`'s address is load-bearing: `optimize_cut_inside`
//! and `optimize_general` reuse one `CutPlanner` across a whole `Vec<Subpath>`
//! reorder pass, and `Vec::swap` moves *values* between slots, not the other
//! way around — a cache keyed by slot address would keep returning the
//! previous occupant's bbox/monotonizer after a swap.

use std::collections::HashMap;

use crate::geometry::{self, BoundingBox, Primitive, Subpath};
use crate::monotonizer::VectorMonotonizer;

/// Samples taken along a path's arc length when approximating it as a
/// polygon for containment testing.
const CONTAINMENT_SAMPLES: usize = 101;

fn identity_key(p: &Subpath) -> u64 {
    p.id()
}

/// Bounding-box and containment memoization, scoped to a single planning
/// call.
#[derive(Default)]
pub struct CutPlanner {
    bbox_cache: HashMap<u64, BoundingBox>,
    vm_cache: HashMap<u64, VectorMonotonizer>,
}

impl CutPlanner {
    pub fn new() -> Self {
        CutPlanner::default()
    }

    fn bounding_box_of(&mut self, path: &Subpath) -> Option<BoundingBox> {
        let key = identity_key(path);
        if let Some(b) = self.bbox_cache.get(&key) {
            return Some(*b);
        }
        let b = path.bbox()?;
        self.bbox_cache.insert(key, b);
        Some(b)
    }

    /// Whether `inner` lies wholly inside `outer`: a bounding-box fast
    /// reject, an identity guard against a degenerate "path inside itself"
    /// claim when the two boxes coincide exactly, then a 101-sample
    /// point-in-polygon test of `inner` against `outer`.
    pub fn is_inside(&mut self, inner: &Subpath, outer: &Subpath) -> bool {
        let (inner_box, outer_box) = match (self.bounding_box_of(inner), self.bounding_box_of(outer)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if !outer_box.dominates(&inner_box) {
            return false;
        }
        if outer_box == inner_box && std::ptr::eq(inner, outer) {
            return false;
        }
        let key = identity_key(outer);
        if !self.vm_cache.contains_key(&key) {
            let mut vm = VectorMonotonizer::new(f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
            vm.add_cluster(&outer.sample_polygon(CONTAINMENT_SAMPLES));
            self.vm_cache.insert(key, vm);
        }
        let vm = self.vm_cache.get_mut(&key).unwrap();
        for p in inner.sample_polygon(CONTAINMENT_SAMPLES) {
            if !vm.is_point_inside(p.x, p.y) {
                return false;
            }
        }
        true
    }
}

/// Union bounding box of a set of subpaths.
pub fn bounding_box(subpaths: &[Subpath]) -> Option<BoundingBox> {
    geometry::bounding_box(subpaths)
}

/// Total length of non-cutting travel (`Move` primitives with a real
/// start, i.e. excluding each subpath's initial jump) across `subpaths`.
pub fn length_travel(subpaths: &[Subpath]) -> f64 {
    let mut distance = 0.0;
    for sp in subpaths {
        for p in sp.primitives() {
            if let Primitive::Move { start: Some(s), end } = p {
                distance += s.distance(end);
            }
        }
    }
    distance
}

/// Sum of the gaps between each subpath's end and the next subpath's
/// start, in the order given.
pub fn distance_path(subpaths: &[Subpath]) -> f64 {
    let mut distance = 0.0;
    for w in subpaths.windows(2) {
        distance += w[0].end_point().distance(&w[1].start_point());
    }
    distance
}

/// Reorders subpaths so that any path found inside another is moved ahead
/// of it, in a single O(n^2) pass.
///
/// This only swaps direct pairs found out of order in one sweep; it does
/// not repeat until the whole sequence is settled, so a path nested three
/// levels deep may still need another full pass to reach the front.
/// Preserved as in the planner this is derived from.
pub fn optimize_cut_inside(paths: &[Subpath]) -> Vec<Subpath> {
    let mut subpaths: Vec<Subpath> = paths.to_vec();
    let mut planner = CutPlanner::new();
    for j in 0..subpaths.len() {
        for k in (j + 1)..subpaths.len() {
            if planner.is_inside(&subpaths[k], &subpaths[j]) {
                subpaths.swap(j, k);
            }
        }
    }
    subpaths
}

/// Reverses (closing first) and flips the order of `subpaths[j..k]` in
/// place.
fn cross(subpaths: &mut [Subpath], j: usize, k: usize) {
    for q in j..k {
        subpaths[q].direct_close();
        subpaths[q].reverse();
    }
    subpaths[j..k].reverse();
}

/// Change in total travel distance if `cross(subpaths, j, k)` were applied:
/// negative means the crossing shortens total travel.
pub fn delta_distance(subpaths: &[Subpath], j: usize, k_exclusive: usize) -> f64 {
    let mut distance = 0.0;
    let k = k_exclusive - 1;
    let a1 = subpaths[j].start_point();
    let b0 = subpaths[k].end_point();
    if k < subpaths.len() - 1 {
        let b1 = subpaths[k + 1].start_point();
        distance -= b0.distance(&b1);
        distance += a1.distance(&b1);
    }
    if j > 0 {
        let a0 = subpaths[j - 1].end_point();
        distance -= a0.distance(&a1);
        distance += a0.distance(&b0);
    }
    distance
}

/// Whether reversing the order of `subpaths[j..k]` would violate one of
/// `constraints` (pairs `(before, after)` identified by [`Subpath::id`],
/// captured before any reordering took place).
fn is_order_constrained(subpaths: &[Subpath], constraints: &[(u64, u64)], j: usize, k: usize) -> bool {
    for q in j..k {
        let first_addr = identity_key(&subpaths[q]);
        for &(a, b) in constraints {
            if first_addr != a {
                continue;
            }
            for m in (q + 1)..k {
                if identity_key(&subpaths[m]) == b {
                    return true;
                }
            }
        }
    }
    false
}

/// 2-opt travel optimization with no ordering constraints: repeatedly
/// crosses any pair whose reversal shortens total travel, until no
/// crossing helps.
pub fn optimize_travel(paths: &[Subpath]) -> Vec<Subpath> {
    let mut subpaths: Vec<Subpath> = paths.to_vec();
    let mut improved = true;
    while improved {
        improved = false;
        for j in 0..subpaths.len() {
            for k in (j + 1)..subpaths.len() {
                if delta_distance(&subpaths, j, k) < 0.0 {
                    cross(&mut subpaths, j, k);
                    improved = true;
                }
            }
        }
    }
    subpaths
}

/// Combines nesting order (inner paths before the outlines they sit in)
/// with travel optimization, refusing any 2-opt crossing that would
/// violate a nesting constraint recorded up front.
pub fn optimize_general(paths: &[Subpath]) -> Vec<Subpath> {
    let mut subpaths: Vec<Subpath> = paths.to_vec();
    let mut planner = CutPlanner::new();

    let mut constraints: Vec<(u64, u64)> = Vec::new();
    for j in 0..subpaths.len() {
        for k in (j + 1)..subpaths.len() {
            if planner.is_inside(&subpaths[k], &subpaths[j]) {
                constraints.push((identity_key(&subpaths[k]), identity_key(&subpaths[j])));
            } else if planner.is_inside(&subpaths[j], &subpaths[k]) {
                constraints.push((identity_key(&subpaths[j]), identity_key(&subpaths[k])));
            }
        }
    }

    for j in 0..subpaths.len() {
        for k in (j + 1)..subpaths.len() {
            if planner.is_inside(&subpaths[k], &subpaths[j]) {
                subpaths.swap(j, k);
            }
        }
    }

    let mut improved = true;
    while improved {
        improved = false;
        for j in 0..subpaths.len() {
            for k in (j + 1)..subpaths.len() {
                if delta_distance(&subpaths, j, k) < 0.0 {
                    if is_order_constrained(&subpaths, &constraints, j, k) {
                        continue;
                    }
                    cross(&mut subpaths, j, k);
                    improved = true;
                }
            }
        }
    }
    subpaths
}
