//! Eulerian area fill: turns a single closed outline into a graph with
//! parallel horizontal rungs, fixes its odd-edge parity, walks it, and
//! hands back the resulting point sequence.

use crate::geometry::{Point, Subpath};
use crate::graph::Graph;
use crate::walker::GraphWalker;

/// Samples taken along the outline when approximating it as a polygon
/// before it is fed to the monotonizer scan. Matches the sampling density
/// `Subpath::sample_polygon` callers elsewhere in this crate converge on.
const FILL_OUTLINE_SAMPLES: usize = 101;

/// Builds an Eulerian-walkable fill graph for one closed outline, scanned
/// top-to-bottom at `pitch` spacing, walks it, and returns the resulting
/// point sequence with `None` marking a jump between disconnected runs.
///
/// Only `double_odd_edge` is applied to fix parity here, not `double` — the
/// outline's rungs and stitched bisector edges already leave the graph with
/// at most two odd-degree nodes once the odd-indexed outline edges are
/// doubled, matching the fill this is derived from.
pub fn get_fill(outline: &Subpath, pitch: f64) -> Vec<Option<Point>> {
    if pitch <= 0.0 {
        return Vec::new();
    }
    let bbox = match outline.bbox() {
        Some(b) => b,
        None => return Vec::new(),
    };

    let mut outline_graph = Graph::new();
    outline_graph.add_shape(&outline.sample_polygon(FILL_OUTLINE_SAMPLES), true);

    let mut graph = Graph::new();
    Graph::monotone_fill(
        &mut graph,
        std::slice::from_mut(&mut outline_graph),
        bbox.ymin,
        bbox.ymax,
        pitch,
    );
    graph.double_odd_edge();

    let mut raw = Vec::new();
    GraphWalker::walk(&mut graph, &mut raw);
    raw.into_iter().map(|n| n.map(|id| graph.nodes[id.0].point)).collect()
}

/// Convenience wrapper: fills `outline` at `pitch` and splits the resulting
/// point sequence into one [`Subpath`] per run between `None` separators,
/// matching `CutPlanner.eulerian_fill`'s per-path polyline assembly in the
/// system this crate grew out of.
pub fn fill_subpath(outline: &Subpath, pitch: f64) -> Vec<Subpath> {
    let mut result = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for entry in get_fill(outline, pitch) {
        match entry {
            Some(p) => current.push(p),
            None => {
                if current.len() > 1 {
                    result.push(Subpath::from_points(&current, false));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        result.push(Subpath::from_points(&current, false));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Subpath {
        Subpath::from_points(
            &[
                Point::new(0.0, 0.0),
                Point::new(side, 0.0),
                Point::new(side, side),
                Point::new(0.0, side),
            ],
            true,
        )
    }

    #[test]
    fn fill_of_degenerate_pitch_is_empty() {
        let outline = square(10.0);
        assert!(get_fill(&outline, 0.0).is_empty());
    }

    #[test]
    fn fill_of_square_produces_rungs() {
        let outline = square(10.0);
        let points = get_fill(&outline, 2.0);
        assert!(!points.is_empty());
        assert!(points.iter().any(|p| p.is_some()));
    }

    #[test]
    fn fill_subpath_produces_nonempty_traversal() {
        let outline = square(10.0);
        let paths = fill_subpath(&outline, 2.0);
        assert!(!paths.is_empty());
    }

    #[test]
    fn fill_subpath_stays_within_outline_bounds() {
        let outline = square(10.0);
        let paths = fill_subpath(&outline, 2.0);
        for sp in &paths {
            for p in sp.primitives() {
                let end = p.end();
                assert!(end.x >= -1e-6 && end.x <= 10.0 + 1e-6);
                assert!(end.y >= -1e-6 && end.y <= 10.0 + 1e-6);
            }
        }
    }
}
