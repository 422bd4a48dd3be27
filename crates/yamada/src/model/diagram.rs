//! Validated diagram, structural queries, and face traversal.

use std::collections::{HashMap, VecDeque};

use crate::error::StructuralError;

use super::types::{ArcId, ArcLabel, Corner, Direction, Node, NodeId, NodeKind, NodeSpec};

/// A rotation system: nodes with cyclically ordered arc endpoints.
///
/// Invariants (checked by `Diagram::new`):
/// - every arc has exactly two endpoints (both may sit on one node);
/// - strands have degree 2, crossings degree 4;
/// - orientation is all-or-nothing over crossings and consistent along arcs.
#[derive(Clone, Debug)]
pub struct Diagram<L = usize> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) labels: Vec<L>,
    pub(crate) ends: Vec<[Corner; 2]>,
    /// Inverse of `labels`.
    index: HashMap<L, ArcId>,
}

impl<L: ArcLabel> Default for Diagram<L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            labels: Vec::new(),
            ends: Vec::new(),
            index: HashMap::new(),
        }
    }
}

// `index` follows from `labels`.
impl<L: PartialEq> PartialEq for Diagram<L> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.labels == other.labels && self.ends == other.ends
    }
}

impl<L: Eq> Eq for Diagram<L> {}

impl<L: ArcLabel> Diagram<L> {
    /// Build and validate a diagram; malformed input fails fast.
    pub fn new<I>(specs: I) -> Result<Self, StructuralError>
    where
        I: IntoIterator<Item = NodeSpec<L>>,
    {
        let mut index: HashMap<L, ArcId> = HashMap::new();
        let mut labels: Vec<L> = Vec::new();
        let mut seen: Vec<Vec<Corner>> = Vec::new();
        let mut nodes = Vec::new();
        for (n, spec) in specs.into_iter().enumerate() {
            spec.check(NodeId(n))?;
            let mut arcs = Vec::with_capacity(spec.arcs.len());
            for (pos, label) in spec.arcs.into_iter().enumerate() {
                let arc = match index.get(&label) {
                    Some(&a) => a,
                    None => {
                        let a = ArcId(labels.len());
                        index.insert(label.clone(), a);
                        labels.push(label);
                        seen.push(Vec::with_capacity(2));
                        a
                    }
                };
                seen[arc.0].push(Corner::new(n, pos));
                arcs.push(arc);
            }
            nodes.push(Node {
                kind: spec.kind,
                arcs,
                dirs: spec.dirs,
            });
        }
        let mut ends = Vec::with_capacity(seen.len());
        for (a, corners) in seen.into_iter().enumerate() {
            match corners.as_slice() {
                [c0, c1] => ends.push([*c0, *c1]),
                [_] => {
                    return Err(StructuralError::DanglingArc {
                        label: format!("{:?}", labels[a]),
                    })
                }
                other => {
                    return Err(StructuralError::OverusedArc {
                        label: format!("{:?}", labels[a]),
                        count: other.len(),
                    })
                }
            }
        }
        let d = Self {
            nodes,
            labels,
            ends,
            index,
        };
        d.check_orientation()?;
        Ok(d)
    }

    /// Convenience for plain graphs: every rotation becomes a vertex.
    pub fn from_rotations(rotations: Vec<Vec<L>>) -> Result<Self, StructuralError> {
        Self::new(rotations.into_iter().map(NodeSpec::vertex))
    }

    fn check_orientation(&self) -> Result<(), StructuralError> {
        let mut oriented = 0usize;
        let mut crossings = 0usize;
        for node in &self.nodes {
            if node.kind == NodeKind::Crossing {
                crossings += 1;
                if node.dirs.is_some() {
                    oriented += 1;
                }
            }
        }
        if oriented != 0 && oriented != crossings {
            return Err(StructuralError::MixedOrientation);
        }
        for [c0, c1] in &self.ends {
            if let (Some(d0), Some(d1)) = (self.dir_at(*c0), self.dir_at(*c1)) {
                if d0 == d1 {
                    return Err(StructuralError::BadOrientation {
                        node: c0.node,
                        reason: "arc must leave one end and enter the other",
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn dir_at(&self, c: Corner) -> Option<Direction> {
        self.nodes[c.node.0].dirs.as_ref().map(|d| d[c.pos])
    }

    /// Back to construction input (labels cloned).
    pub fn to_specs(&self) -> Vec<NodeSpec<L>> {
        self.nodes
            .iter()
            .map(|n| NodeSpec {
                kind: n.kind,
                arcs: n.arcs.iter().map(|a| self.labels[a.0].clone()).collect(),
                dirs: n.dirs.clone(),
            })
            .collect()
    }

    /// Relabel arcs through `f`; fails if `f` is not injective on the labels in use.
    pub fn relabel<M: ArcLabel, F>(&self, mut f: F) -> Result<Diagram<M>, StructuralError>
    where
        F: FnMut(&L) -> M,
    {
        let new_labels: Vec<M> = self.labels.iter().map(&mut f).collect();
        Diagram::new(self.nodes.iter().map(|n| NodeSpec {
            kind: n.kind,
            arcs: n.arcs.iter().map(|a| new_labels[a.0].clone()).collect(),
            dirs: n.dirs.clone(),
        }))
    }

    /// Same structure with arcs labeled by their dense index.
    pub fn to_indexed(&self) -> Diagram<usize> {
        Diagram {
            nodes: self.nodes.clone(),
            labels: (0..self.labels.len()).collect(),
            ends: self.ends.clone(),
            index: (0..self.labels.len()).map(|a| (a, ArcId(a))).collect(),
        }
    }

    /// Dense index of the arc carrying `label`.
    pub fn arc_of(&self, label: &L) -> Option<ArcId> {
        self.index.get(label).copied()
    }

    /// Drop all flow flags.
    pub fn unoriented(&self) -> Self {
        let mut d = self.clone();
        for n in d.nodes.iter_mut() {
            n.dirs = None;
        }
        d
    }
}

impl<L> Diagram<L> {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.ends.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &L)> + '_ {
        self.labels.iter().enumerate().map(|(i, l)| (ArcId(i), l))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, StructuralError> {
        self.nodes
            .get(id.0)
            .ok_or(StructuralError::NodeOutOfRange(id))
    }

    /// Length of the node's rotation.
    pub fn degree(&self, id: NodeId) -> Result<usize, StructuralError> {
        self.node(id).map(Node::degree)
    }

    pub fn label(&self, arc: ArcId) -> Result<&L, StructuralError> {
        self.labels
            .get(arc.0)
            .ok_or(StructuralError::ArcOutOfRange(arc.0))
    }

    pub fn endpoints(&self, arc: ArcId) -> Result<[Corner; 2], StructuralError> {
        self.ends
            .get(arc.0)
            .copied()
            .ok_or(StructuralError::ArcOutOfRange(arc.0))
    }

    pub fn arc_at(&self, c: Corner) -> Result<ArcId, StructuralError> {
        let node = self.node(c.node)?;
        node.arcs
            .get(c.pos)
            .copied()
            .ok_or(StructuralError::PositionOutOfRange {
                node: c.node,
                pos: c.pos,
            })
    }

    /// The endpoint across the arc at `c`.
    pub fn dual(&self, c: Corner) -> Result<Corner, StructuralError> {
        let arc = self.arc_at(c)?;
        Ok(self.opposite(arc, c))
    }

    /// Unchecked `dual` for internal traversals over validated corners.
    #[inline]
    pub(crate) fn opposite(&self, arc: ArcId, c: Corner) -> Corner {
        let [c0, c1] = self.ends[arc.0];
        if c0 == c {
            c1
        } else {
            c0
        }
    }

    pub fn is_loop(&self, arc: ArcId) -> Result<bool, StructuralError> {
        let [c0, c1] = self.endpoints(arc)?;
        Ok(c0.node == c1.node)
    }

    pub fn is_isolated(&self, id: NodeId) -> Result<bool, StructuralError> {
        Ok(self.degree(id)? == 0)
    }

    pub fn has_crossings(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == NodeKind::Crossing)
    }

    pub fn has_strands(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == NodeKind::Strand)
    }

    /// True when there is at least one crossing and every crossing carries flow flags.
    pub fn is_oriented(&self) -> bool {
        let mut crossings = self.nodes.iter().filter(|n| n.kind == NodeKind::Crossing).peekable();
        crossings.peek().is_some() && crossings.all(|n| n.dirs.is_some())
    }

    /// Sum of crossing signs; `None` when crossings are unoriented.
    pub fn writhe(&self) -> Option<i64> {
        let mut w = 0;
        for n in self.nodes.iter().filter(|n| n.kind == NodeKind::Crossing) {
            w += n.sign()?.value();
        }
        Some(w)
    }

    /// Whether removing `arc` disconnects its endpoints. Loops never do.
    pub fn is_bridge(&self, arc: ArcId) -> Result<bool, StructuralError> {
        let [c0, c1] = self.endpoints(arc)?;
        if c0.node == c1.node {
            return Ok(false);
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([c0.node.0]);
        seen[c0.node.0] = true;
        while let Some(v) = queue.pop_front() {
            for (pos, &a) in self.nodes[v].arcs.iter().enumerate() {
                if a == arc {
                    continue;
                }
                let w = self.opposite(a, Corner::new(v, pos)).node.0;
                if w == c1.node.0 {
                    return Ok(false);
                }
                if !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
        Ok(true)
    }

    /// All bridges in one lowpoint DFS, ascending by arc index.
    pub fn bridges(&self) -> Vec<ArcId> {
        const UNSEEN: usize = usize::MAX;
        let n = self.nodes.len();
        let mut disc = vec![UNSEEN; n];
        let mut low = vec![0usize; n];
        let mut timer = 0usize;
        let mut out = Vec::new();
        for root in 0..n {
            if disc[root] != UNSEEN {
                continue;
            }
            disc[root] = timer;
            low[root] = timer;
            timer += 1;
            // (node, arc used to enter it, next rotation position to scan)
            let mut stack: Vec<(usize, Option<ArcId>, usize)> = vec![(root, None, 0)];
            while let Some(top) = stack.last_mut() {
                let (v, parent) = (top.0, top.1);
                if top.2 < self.nodes[v].arcs.len() {
                    let pos = top.2;
                    top.2 += 1;
                    let arc = self.nodes[v].arcs[pos];
                    if Some(arc) == parent {
                        continue;
                    }
                    let w = self.opposite(arc, Corner::new(v, pos)).node.0;
                    if disc[w] == UNSEEN {
                        disc[w] = timer;
                        low[w] = timer;
                        timer += 1;
                        stack.push((w, Some(arc), 0));
                    } else {
                        low[v] = low[v].min(disc[w]);
                    }
                } else {
                    stack.pop();
                    if let (Some(arc), Some(up)) = (parent, stack.last()) {
                        let u = up.0;
                        low[u] = low[u].min(low[v]);
                        if low[v] > disc[u] {
                            out.push(arc);
                        }
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Connected components, each sorted, ordered by their smallest node.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut comp = vec![usize::MAX; self.nodes.len()];
        let mut out: Vec<Vec<NodeId>> = Vec::new();
        for start in 0..self.nodes.len() {
            if comp[start] != usize::MAX {
                continue;
            }
            let id = out.len();
            let mut members = vec![NodeId(start)];
            comp[start] = id;
            let mut queue = VecDeque::from([start]);
            while let Some(v) = queue.pop_front() {
                for (pos, &a) in self.nodes[v].arcs.iter().enumerate() {
                    let w = self.opposite(a, Corner::new(v, pos)).node.0;
                    if comp[w] == usize::MAX {
                        comp[w] = id;
                        members.push(NodeId(w));
                        queue.push_back(w);
                    }
                }
            }
            members.sort_unstable();
            out.push(members);
        }
        out
    }

    /// Face boundaries; each call starts a fresh walk.
    pub fn areas(&self) -> Areas<'_, L> {
        Areas {
            diagram: self,
            seen: self.nodes.iter().map(|n| vec![false; n.degree()]).collect(),
            node: 0,
            pos: 0,
        }
    }

    /// Euler characteristic 2 on every component that has arcs.
    pub fn is_planar(&self) -> bool {
        let comps = self.components();
        let mut comp_of = vec![0usize; self.nodes.len()];
        for (i, members) in comps.iter().enumerate() {
            for v in members {
                comp_of[v.0] = i;
            }
        }
        let mut faces = vec![0i64; comps.len()];
        for face in self.areas() {
            faces[comp_of[face[0].node.0]] += 1;
        }
        comps.iter().enumerate().all(|(i, members)| {
            let degree_sum: usize = members.iter().map(|v| self.nodes[v.0].degree()).sum();
            if degree_sum == 0 {
                return true;
            }
            let v = members.len() as i64;
            let e = (degree_sum / 2) as i64;
            v - e + faces[i] == 2
        })
    }
}

/// Lazy walk over the faces of a diagram.
///
/// Turning rule: from corner `(n, p)` cross the arc to `(m, q)` and continue at
/// `(m, q + 1 mod deg m)`. Isolated nodes have no corners and bound no face.
#[derive(Clone, Debug)]
pub struct Areas<'a, L> {
    diagram: &'a Diagram<L>,
    seen: Vec<Vec<bool>>,
    node: usize,
    pos: usize,
}

impl<L> Iterator for Areas<'_, L> {
    type Item = Vec<Corner>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.node < self.seen.len() {
            if self.pos >= self.seen[self.node].len() {
                self.node += 1;
                self.pos = 0;
                continue;
            }
            let start = Corner::new(self.node, self.pos);
            self.pos += 1;
            if self.seen[start.node.0][start.pos] {
                continue;
            }
            let d = self.diagram;
            let mut face = Vec::new();
            let mut c = start;
            loop {
                self.seen[c.node.0][c.pos] = true;
                face.push(c);
                let arc = d.nodes[c.node.0].arcs[c.pos];
                let across = d.opposite(arc, c);
                let deg = d.nodes[across.node.0].degree();
                c = Corner {
                    node: across.node,
                    pos: (across.pos + 1) % deg,
                };
                if c == start {
                    break;
                }
            }
            return Some(face);
        }
        None
    }
}
