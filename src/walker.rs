//! Hierholzer-style Eulerian walk construction, scaffold pruning, and a
//! 2-opt pass over the resulting walk.
//!
//! A walk is `[node, segment, node, segment, ..., node]`: even positions
//! are nodes, odd positions are segments, and a [`WalkEntry::Disconnect`]
//! at an odd position marks a jump between otherwise-unconnected graph
//! components (the Rust encoding of the source's `None` placeholder, since
//! Rust has no dynamically-typed list to mix `None` into a list of nodes
//! and segments).

use crate::graph::{Graph, NodeId, SegId, SegmentValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEntry {
    Node(NodeId),
    Segment(SegId),
    Disconnect,
}

/// Produces and refines an Eulerian walk over a [`Graph`].
pub struct GraphWalker<'g> {
    graph: &'g mut Graph,
    walk: Vec<WalkEntry>,
    flip_start: Option<usize>,
    flip_end: Option<usize>,
}

impl<'g> GraphWalker<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        GraphWalker {
            graph,
            walk: Vec::new(),
            flip_start: None,
            flip_end: None,
        }
    }

    fn other_node_for_segment(&self, current: NodeId, seg: SegId) -> NodeId {
        self.graph.links[seg.0].other(current)
    }

    /// First unused connection of `node`, preferring a `Rung` if any unused
    /// connection is one; `None` once every connection has been used.
    fn find_unused_connection(&self, node: NodeId) -> Option<usize> {
        let mut value = None;
        for (idx, &seg_id) in self.graph.nodes[node.0].connections.iter().enumerate() {
            let seg = &self.graph.links[seg_id.0];
            if seg.visited == 0 {
                if value.is_none() {
                    value = Some(idx);
                }
                if seg.value == SegmentValue::Rung {
                    return Some(idx);
                }
            }
        }
        value
    }

    /// Greedily follows unused connections from `node`, splicing
    /// `[segment, node]` pairs into the walk starting just after `index`.
    /// Returns the number of entries inserted.
    fn add_loop(&mut self, index: usize, mut node: NodeId) -> usize {
        let start = index + 1;
        let mut i = start;
        loop {
            let conn_idx = match self.find_unused_connection(node) {
                Some(v) => v,
                None => break,
            };
            let seg_id = self.graph.nodes[node.0].connections[conn_idx];
            self.walk.insert(i, WalkEntry::Segment(seg_id));
            i += 1;
            self.graph.nodes[node.0].visit_count += 1;
            self.graph.links[seg_id.0].visited += 1;
            node = self.other_node_for_segment(node, seg_id);
            self.walk.insert(i, WalkEntry::Node(node));
            i += 1;
        }
        i - start
    }

    fn make_walk_node(&mut self, g: NodeId) {
        let start = self.walk.len();
        self.walk.push(WalkEntry::Node(g));
        self.graph.nodes[g.0].visit_count += 1;
        self.add_loop(start, g);

        let mut i = start;
        while i < self.walk.len() {
            let node = match self.walk[i] {
                WalkEntry::Node(n) => n,
                _ => unreachable!("even walk positions are always nodes"),
            };
            if self.find_unused_connection(node).is_none() {
                i += 2;
                continue;
            }
            i += self.add_loop(i, node);
            i += 2;
        }
    }

    /// Builds a full Eulerian walk across every component of the graph,
    /// inserting a [`WalkEntry::Disconnect`] between components.
    pub fn make_walk(&mut self) {
        let node_ids: Vec<NodeId> = (0..self.graph.nodes.len()).map(NodeId).collect();
        let mut component = 0;
        for g in node_ids {
            if self.graph.nodes[g.0].visit_count == 0 {
                if component != 0 {
                    self.walk.push(WalkEntry::Disconnect);
                }
                self.make_walk_node(g);
                component += 1;
            }
        }
    }

    /// Appends the walk's nodes (with `None` in place of each
    /// [`WalkEntry::Disconnect`]) to `points`.
    pub fn add_walk(&self, points: &mut Vec<Option<NodeId>>) {
        let mut i = 0;
        while i < self.walk.len() {
            if i + 1 != self.walk.len() {
                if let WalkEntry::Disconnect = self.walk[i + 1] {
                    points.push(None);
                }
            }
            if let WalkEntry::Node(n) = self.walk[i] {
                points.push(Some(n));
            }
            i += 2;
        }
    }

    fn remove_loop(&mut self, from_pos: usize, to_pos: usize) -> usize {
        if from_pos == to_pos {
            return 0;
        }
        let min_pos = from_pos.min(to_pos);
        let max_pos = from_pos.max(to_pos);
        self.walk.drain(min_pos..max_pos);
        max_pos - min_pos
    }

    /// Within the node-position range `[start, end]`, finds the outermost
    /// loop (a node that recurs at two positions with nothing but
    /// skippable material between) and deletes its interior.
    fn remove_biggest_loop_in_range(&mut self, start: usize, end: usize) -> usize {
        let mut i = start;
        while i <= end {
            if let WalkEntry::Node(n) = self.walk[i] {
                self.graph.nodes[n.0].walk_marker = None;
            }
            i += 2;
        }
        let steps = (end - start) / 2;
        let mut i = 0;
        while i < steps {
            let left = start + i;
            let right = end - i;
            let left_node = match self.walk[left] {
                WalkEntry::Node(n) => n,
                _ => unreachable!(),
            };
            if let Some(marker) = self.graph.nodes[left_node.0].walk_marker {
                return self.remove_loop(left, marker as usize);
            }
            if left == right {
                break;
            }
            self.graph.nodes[left_node.0].walk_marker = Some(left as i64);
            let right_node = match self.walk[right] {
                WalkEntry::Node(n) => n,
                _ => unreachable!(),
            };
            if let Some(marker) = self.graph.nodes[right_node.0].walk_marker {
                return self.remove_loop(right, marker as usize);
            }
            self.graph.nodes[right_node.0].walk_marker = Some(right as i64);
            i += 2;
        }
        0
    }

    /// Removes loops built entirely of scaffolding. Within each maximal
    /// run delimited by `Rung` segments (or by walk boundaries),
    /// collapses the largest self-intersecting loop found.
    pub fn clip_scaffold_loops(&mut self) {
        let mut start = 0usize;
        let mut index = 0usize;
        let mut ie = self.walk.len();
        loop {
            if index >= ie {
                return;
            }
            let segment_pos = index + 1;
            if segment_pos >= self.walk.len() {
                self.remove_biggest_loop_in_range(start, index);
                return;
            }
            let essential = match self.walk[segment_pos] {
                WalkEntry::Disconnect => true,
                WalkEntry::Segment(s) => self.graph.links[s.0].value == SegmentValue::Rung,
                WalkEntry::Node(_) => unreachable!("odd positions are never nodes"),
            };
            if essential {
                if start != index {
                    ie -= self.remove_biggest_loop_in_range(start, index);
                }
                start = index + 2;
            }
            index += 2;
        }
    }

    /// Within `[start, end]`, deletes a leading and/or trailing run of
    /// non-`Rung` segments (pure scaffolding), stopping as soon as a
    /// `Rung` is reached from either outer edge.
    fn remove_scaffold_ends_in_range(&mut self, start: usize, end: usize) {
        let mut new_end = end;
        if start + 2 <= new_end {
            loop {
                let is_rung = matches!(
                    self.walk[new_end - 1],
                    WalkEntry::Segment(s) if self.graph.links[s.0].value == SegmentValue::Rung
                );
                if is_rung {
                    if new_end != end {
                        self.walk.drain(new_end + 1..=end);
                    }
                    break;
                }
                if new_end < start + 2 {
                    break;
                }
                new_end -= 2;
            }
        }
        let end = new_end;
        let mut new_start = start;
        if start + 2 <= end {
            loop {
                let is_rung = matches!(
                    self.walk[new_start + 1],
                    WalkEntry::Segment(s) if self.graph.links[s.0].value == SegmentValue::Rung
                );
                if is_rung {
                    if new_start != start {
                        self.walk.drain(start..new_start);
                    }
                    break;
                }
                new_start += 2;
                if new_start + 2 > end {
                    break;
                }
            }
        }
    }

    /// Finds each contiguous connected run (delimited by
    /// [`WalkEntry::Disconnect`]) and trims its leading/trailing
    /// scaffold-only stretches.
    pub fn clip_scaffold_ends(&mut self) {
        if self.walk.is_empty() {
            return;
        }
        let mut end = self.walk.len() - 1;
        let mut index = end;
        loop {
            if index == 0 {
                self.remove_scaffold_ends_in_range(0, end);
                return;
            }
            if let WalkEntry::Disconnect = self.walk[index - 1] {
                self.remove_scaffold_ends_in_range(index, end);
                end = index - 2;
            }
            if index < 2 {
                return;
            }
            index -= 2;
        }
    }

    fn effective_index(&self, index: usize) -> usize {
        match (self.flip_start, self.flip_end) {
            (Some(fs), Some(fe)) if fs <= index && index <= fe => fe - (index - fs),
            _ => index,
        }
    }

    fn get_node(&self, index: usize) -> Option<NodeId> {
        match self.walk.get(self.effective_index(index))? {
            WalkEntry::Node(n) => Some(*n),
            _ => None,
        }
    }

    fn get_segment(&self, index: usize) -> SegId {
        match self.walk[self.effective_index(index)] {
            WalkEntry::Segment(s) => s,
            _ => panic!("walker: expected a segment at walk position {index}"),
        }
    }

    fn seg_value(&self, s: SegId) -> SegmentValue {
        self.graph.links[s.0].value
    }

    fn seg_len_sq(&self, s: SegId) -> f64 {
        let seg = &self.graph.links[s.0];
        self.graph.nodes[seg.a.0].point.distance_sq(&self.graph.nodes[seg.b.0].point)
    }

    /// Scores the current (possibly lazily-flipped) walk: shorter
    /// `Scaffold`/`Rung` travel scores higher. A run of skippable
    /// (non-`Rung`) segments that loops back to a previously-seen node is
    /// rewarded rather than penalized per edge, matching the source's
    /// loop-detection bonus.
    fn get_value(&self) -> f64 {
        if self.walk.is_empty() {
            return 0.0;
        }
        let mut start = 0usize;
        let mut end = self.walk.len() - 1;
        while start < end {
            if self.seg_value(self.get_segment(start + 1)) == SegmentValue::Rung {
                break;
            }
            start += 2;
        }
        while end >= 2 {
            if self.seg_value(self.get_segment(end - 1)) == SegmentValue::Rung {
                break;
            }
            end -= 2;
        }

        let mut value = 0.0;
        let mut j = start;
        while j < end {
            let j_node = self.get_node(j).expect("even position holds a node");
            j += 1;
            let mut j_segment = self.get_segment(j);
            j += 1;
            if self.seg_value(j_segment) != SegmentValue::Rung {
                let mut k = j;
                while k < end {
                    let k_node = self.get_node(k).expect("even position holds a node");
                    k += 1;
                    let k_segment = self.get_segment(k);
                    k += 1;
                    if self.seg_value(k_segment) == SegmentValue::Rung {
                        break;
                    }
                    if k_node == j_node {
                        value += (k - j) as f64 * 10.0;
                        j = k;
                        j_segment = k_segment;
                        break;
                    }
                }
            }
            match self.seg_value(j_segment) {
                SegmentValue::Scaffold | SegmentValue::ScaffoldRung | SegmentValue::Rung => {
                    value -= self.seg_len_sq(j_segment);
                }
                SegmentValue::Edge => {}
            }
        }
        value
    }

    /// Iterated 2-opt improvement: repeatedly looks for a pair of walk
    /// positions holding the same node and tests (via the lazy flip
    /// indices, without physically touching the walk) whether reversing
    /// the slice between them improves [`Self::get_value`]; commits the
    /// reversal only if it does.
    ///
    /// Termination compares the new score to the old with `==`; if the
    /// score can plateau at different walks with equal value, this can
    /// exit at a non-optimum. Preserved as in the source this is derived
    /// from.
    pub fn two_opt(&mut self) {
        let mut v = self.get_value();
        loop {
            let new_value = self.two_opt_cycle(v);
            if v == new_value {
                break;
            }
            v = new_value;
        }
    }

    fn two_opt_cycle(&mut self, mut value: f64) -> f64 {
        if self.walk.is_empty() {
            return 0.0;
        }
        let mut swap_start = 0usize;
        let walk_end = self.walk.len();
        while swap_start < walk_end {
            let swap_node = match self.walk[swap_start] {
                WalkEntry::Node(n) => n,
                _ => unreachable!("even walk positions are always nodes"),
            };
            let mut m = self.graph.nodes[swap_node.0].visit_count;
            let mut swap_end = swap_start + 2;
            while swap_end < walk_end {
                let current_node = match self.walk[swap_end] {
                    WalkEntry::Node(n) => n,
                    _ => unreachable!("even walk positions are always nodes"),
                };
                if swap_node == current_node {
                    m = m.saturating_sub(1);
                    self.flip_start = Some(swap_start + 1);
                    self.flip_end = Some(swap_end - 1);
                    let new_value = self.get_value();
                    if new_value > value {
                        value = new_value;
                        self.walk[swap_start + 1..swap_end].reverse();
                    }
                    self.flip_start = None;
                    self.flip_end = None;
                    if m == 0 {
                        break;
                    }
                }
                swap_end += 2;
            }
            swap_start += 2;
        }
        value
    }

    /// Runs the full pipeline (`make_walk`, `clip_scaffold_ends`,
    /// `clip_scaffold_loops`) and appends the result to `points`.
    pub fn walk(graph: &'g mut Graph, points: &mut Vec<Option<NodeId>>) {
        if graph.nodes.is_empty() {
            return;
        }
        let mut walker = GraphWalker::new(graph);
        walker.make_walk();
        walker.clip_scaffold_ends();
        walker.clip_scaffold_loops();
        walker.add_walk(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn rect(w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    #[test]
    fn walk_of_empty_graph_is_empty() {
        let mut g = Graph::new();
        let mut points = Vec::new();
        GraphWalker::walk(&mut g, &mut points);
        assert!(points.is_empty());
    }

    #[test]
    fn walk_of_doubled_square_covers_every_segment_once() {
        let mut g = Graph::new();
        g.add_shape(&rect(10.0, 10.0), true);
        g.double();
        assert!(g.is_euloopian());
        let seg_count = g.links.len();
        let mut points = Vec::new();
        GraphWalker::walk(&mut g, &mut points);
        // Every edge is used exactly once; the walk has seg_count segment
        // slots, i.e. seg_count + 1 node slots for a single connected
        // Eulerian circuit (modulo any Disconnects, of which there are
        // none here since the doubled square is one component).
        let node_count = points.iter().filter(|p| p.is_some()).count();
        assert_eq!(node_count, seg_count + 1);
    }

    #[test]
    fn no_unused_connections_remain_after_a_full_walk() {
        let mut g = Graph::new();
        g.add_shape(&rect(10.0, 10.0), true);
        g.double();
        let mut points = Vec::new();
        GraphWalker::walk(&mut g, &mut points);
        assert!(g.links.iter().all(|s| s.visited > 0));
    }
}
