//! Structural edits used by the reduction rules.
//!
//! Every edit returns a fresh, re-validated diagram; inputs are never mutated, so a
//! canonical form computed for the input stays valid.

use crate::error::StructuralError;

use super::diagram::Diagram;
use super::types::{ArcId, ArcLabel, NodeId, NodeKind, NodeSpec, Smoothing};

impl<L: ArcLabel> Diagram<L> {
    /// Remove an arc. Strand points that lose an end become graph vertices.
    pub fn delete_arc(&self, arc: ArcId) -> Result<Self, StructuralError> {
        let [c0, c1] = self.endpoints(arc)?;
        for c in [c0, c1] {
            if self.nodes[c.node.0].kind == NodeKind::Crossing {
                return Err(StructuralError::WrongShape(c.node, "a vertex or strand"));
            }
        }
        let mut specs = self.to_specs();
        for node in dedup_nodes(c0.node, c1.node) {
            let n = &self.nodes[node.0];
            let spec = &mut specs[node.0];
            spec.kind = NodeKind::Vertex;
            spec.arcs = n
                .arcs
                .iter()
                .filter(|&&a| a != arc)
                .map(|a| self.labels[a.0].clone())
                .collect();
        }
        Diagram::new(specs)
    }

    /// Merge the two ends of a non-loop arc into one vertex.
    ///
    /// With `u = [e, a1..ak]` and `v = [e, b1..bl]` (rotated so the arc comes first) the
    /// merged rotation is `[a1..ak, b1..bl]`, which keeps a planar embedding planar.
    pub fn contract_arc(&self, arc: ArcId) -> Result<Self, StructuralError> {
        let [c0, c1] = self.endpoints(arc)?;
        if c0.node == c1.node {
            return Err(StructuralError::LoopContraction(arc.0));
        }
        for c in [c0, c1] {
            if self.nodes[c.node.0].kind == NodeKind::Crossing {
                return Err(StructuralError::WrongShape(c.node, "a vertex or strand"));
            }
        }
        let after = |node: NodeId, pos: usize| -> Vec<L> {
            let arcs = &self.nodes[node.0].arcs;
            let deg = arcs.len();
            (1..deg)
                .map(|k| self.labels[arcs[(pos + k) % deg].0].clone())
                .collect()
        };
        let mut merged = after(c0.node, c0.pos);
        merged.extend(after(c1.node, c1.pos));
        let (keep, drop) = if c0.node < c1.node {
            (c0.node, c1.node)
        } else {
            (c1.node, c0.node)
        };
        let mut specs = self.to_specs();
        specs[keep.0] = NodeSpec::vertex(merged);
        specs.remove(drop.0);
        Diagram::new(specs)
    }

    /// Remove a loop arc. A loop at a graph vertex leaves the vertex behind; a strand
    /// loop is a free circle and disappears together with its point.
    pub fn remove_loop(&self, arc: ArcId) -> Result<Self, StructuralError> {
        if !self.is_loop(arc)? {
            return Err(StructuralError::NotALoop(arc.0));
        }
        let node = self.ends[arc.0][0].node;
        let mut specs = self.to_specs();
        match self.nodes[node.0].kind {
            NodeKind::Strand => {
                specs.remove(node.0);
            }
            NodeKind::Vertex => {
                specs[node.0].arcs = self.nodes[node.0]
                    .arcs
                    .iter()
                    .filter(|&&a| a != arc)
                    .map(|a| self.labels[a.0].clone())
                    .collect();
            }
            NodeKind::Crossing => return Err(StructuralError::WrongShape(node, "a vertex or strand")),
        }
        Diagram::new(specs)
    }

    /// Remove an isolated node.
    pub fn remove_node(&self, node: NodeId) -> Result<Self, StructuralError> {
        if !self.is_isolated(node)? {
            return Err(StructuralError::WrongShape(node, "isolated"));
        }
        let mut specs = self.to_specs();
        specs.remove(node.0);
        Diagram::new(specs)
    }

    /// Replace a crossing `[a, b, c, d]` by two strand points.
    pub fn smooth(&self, node: NodeId, smoothing: Smoothing) -> Result<Self, StructuralError> {
        let [a, b, c, d] = self.crossing_labels(node)?;
        let (first, second) = match smoothing {
            Smoothing::A => (NodeSpec::strand(a, b), NodeSpec::strand(c, d)),
            Smoothing::B => (NodeSpec::strand(a, d), NodeSpec::strand(b, c)),
        };
        let mut specs = self.to_specs();
        specs[node.0] = first;
        specs.insert(node.0 + 1, second);
        Diagram::new(specs)
    }

    /// Replace a crossing by a degree-4 graph vertex with the same rotation.
    pub fn crossing_to_vertex(&self, node: NodeId) -> Result<Self, StructuralError> {
        let arcs = self.crossing_labels(node)?;
        let mut specs = self.to_specs();
        specs[node.0] = NodeSpec::vertex(arcs.into());
        Diagram::new(specs)
    }

    fn crossing_labels(&self, node: NodeId) -> Result<[L; 4], StructuralError> {
        let n = self.node(node)?;
        if n.kind != NodeKind::Crossing {
            return Err(StructuralError::WrongShape(node, "a crossing"));
        }
        let l = |i: usize| self.labels[n.arcs[i].0].clone();
        Ok([l(0), l(1), l(2), l(3)])
    }

    /// Merge arcs through strand points. Each maximal chain keeps the label of its
    /// smallest arc; a closed chain of strands collapses to one strand loop.
    pub fn dissolve_strands(&self) -> Result<Self, StructuralError> {
        let mut parent: Vec<usize> = (0..self.arc_count()).collect();
        for n in self.nodes.iter().filter(|n| n.kind == NodeKind::Strand) {
            let (x, y) = (n.arcs[0].0, n.arcs[1].0);
            let (rx, ry) = (find(&mut parent, x), find(&mut parent, y));
            if rx < ry {
                parent[ry] = rx;
            } else if ry < rx {
                parent[rx] = ry;
            }
        }
        let mut outer_ends = vec![0usize; self.arc_count()];
        let mut specs = Vec::with_capacity(self.nodes.len());
        for n in self.nodes.iter().filter(|n| n.kind != NodeKind::Strand) {
            let arcs = n
                .arcs
                .iter()
                .map(|a| {
                    let root = find(&mut parent, a.0);
                    outer_ends[root] += 1;
                    self.labels[root].clone()
                })
                .collect();
            specs.push(NodeSpec {
                kind: n.kind,
                arcs,
                dirs: n.dirs.clone(),
            });
        }
        for a in 0..self.arc_count() {
            if find(&mut parent, a) == a && outer_ends[a] == 0 {
                let label = self.labels[a].clone();
                specs.push(NodeSpec::strand(label.clone(), label));
            }
        }
        Diagram::new(specs)
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn dedup_nodes(a: NodeId, b: NodeId) -> Vec<NodeId> {
    if a == b {
        vec![a]
    } else {
        vec![a, b]
    }
}
