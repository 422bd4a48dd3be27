//! Guided traversals from every maximum-degree corner with incremental pruning.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::{CanonError, StructuralError};
use crate::model::{ArcId, ArcLabel, Corner, Diagram, NodeId};

use super::types::{CanonNode, CanonStats, CanonicalForm, CanonicalLabeling, Family};

/// Canonical form with a throwaway search context.
pub fn canonical_form<L: ArcLabel>(d: &Diagram<L>) -> Result<CanonicalForm, StructuralError> {
    Canonicalizer::new().form(d)
}

/// Canonical form plus the label every input arc received.
pub fn canonical_labeling<L: ArcLabel>(
    d: &Diagram<L>,
) -> Result<CanonicalLabeling<L>, StructuralError> {
    Canonicalizer::new().labeling(d)
}

/// Order two diagrams by their canonical forms.
pub fn compare<L: ArcLabel, M: ArcLabel>(
    a: &Diagram<L>,
    b: &Diagram<M>,
) -> Result<Ordering, CanonError> {
    let fa = canonical_form(a)?;
    let fb = canonical_form(b)?;
    Ok(fa.try_cmp(&fb)?)
}

/// The unpruned record sequence of one traversal, covering the component of `start`.
pub fn candidate_from<L: ArcLabel>(
    d: &Diagram<L>,
    start: Corner,
) -> Result<CanonicalForm, StructuralError> {
    d.arc_at(start)?;
    let members = d
        .components()
        .into_iter()
        .find(|m| m.contains(&start.node))
        .ok_or(StructuralError::NodeOutOfRange(start.node))?;
    let Outcome::Smaller(best) = traverse(d, &members, start, None)? else {
        return Err(StructuralError::Unreachable { unlabeled: 0 });
    };
    Ok(CanonicalForm {
        family: family_of(d),
        arcs: best.arcs.len(),
        nodes: best.nodes,
    })
}

/// Search context; counters accumulate across calls.
#[derive(Clone, Debug, Default)]
pub struct Canonicalizer {
    stats: CanonStats,
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CanonStats {
        self.stats
    }

    pub fn form<L: ArcLabel>(&mut self, d: &Diagram<L>) -> Result<CanonicalForm, StructuralError> {
        self.run(d).map(|(form, _)| form)
    }

    pub fn labeling<L: ArcLabel>(
        &mut self,
        d: &Diagram<L>,
    ) -> Result<CanonicalLabeling<L>, StructuralError> {
        let (form, relabel) = self.run(d)?;
        let labels = d.arcs().map(|(a, l)| (l.clone(), relabel[a.0])).collect();
        Ok(CanonicalLabeling { form, labels })
    }

    /// Form and the new label of every arc index.
    fn run<L: ArcLabel>(
        &mut self,
        d: &Diagram<L>,
    ) -> Result<(CanonicalForm, Vec<usize>), StructuralError> {
        let mut comps = Vec::new();
        for members in d.components() {
            comps.push(self.component(d, &members)?);
        }
        // Stable: equal components are interchangeable anyway.
        comps.sort_by(|a, b| a.nodes.cmp(&b.nodes));

        let mut relabel = vec![0usize; d.arc_count()];
        let mut nodes = Vec::with_capacity(d.node_count());
        let mut offset = 0usize;
        for comp in comps {
            for (local, arc) in comp.arcs.iter().enumerate() {
                relabel[arc.0] = offset + local;
            }
            nodes.extend(comp.nodes.into_iter().map(|mut n| {
                n.ends.iter_mut().for_each(|e| *e += offset);
                n
            }));
            offset += comp.arcs.len();
        }
        let form = CanonicalForm {
            family: family_of(d),
            nodes,
            arcs: offset,
        };
        Ok((form, relabel))
    }

    fn component<L>(&mut self, d: &Diagram<L>, members: &[NodeId]) -> Result<Best, StructuralError> {
        let max = members
            .iter()
            .map(|v| d.nodes[v.0].degree())
            .max()
            .unwrap_or(0);
        if max == 0 {
            // A lone isolated node.
            let nodes = members
                .iter()
                .map(|v| CanonNode {
                    kind: d.nodes[v.0].kind,
                    ends: Vec::new(),
                    dirs: None,
                })
                .collect();
            return Ok(Best {
                nodes,
                arcs: Vec::new(),
            });
        }
        let before = self.stats;
        let mut best: Option<Best> = None;
        for &v in members.iter().filter(|v| d.nodes[v.0].degree() == max) {
            for pos in 0..max {
                self.stats.candidates += 1;
                let incumbent = best.as_ref().map(|b| b.nodes.as_slice());
                match traverse(d, members, Corner { node: v, pos }, incumbent)? {
                    Outcome::Pruned => self.stats.pruned += 1,
                    Outcome::Tied => self.stats.completed += 1,
                    Outcome::Smaller(cand) => {
                        self.stats.completed += 1;
                        self.stats.improved += 1;
                        best = Some(cand);
                    }
                }
            }
        }
        trace!(
            nodes = members.len(),
            candidates = self.stats.candidates - before.candidates,
            pruned = self.stats.pruned - before.pruned,
            "component canonicalized"
        );
        best.ok_or(StructuralError::Unreachable { unlabeled: 0 })
    }
}

fn family_of<L>(d: &Diagram<L>) -> Family {
    if d.is_oriented() {
        Family::Oriented
    } else {
        Family::Unoriented
    }
}

/// Winning traversal of one component: records in visit order and the arc behind each
/// new label.
struct Best {
    nodes: Vec<CanonNode>,
    arcs: Vec<ArcId>,
}

enum Outcome {
    Pruned,
    /// Completed and equal to the incumbent; the incumbent is kept.
    Tied,
    Smaller(Best),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Standing {
    Tied,
    Smaller,
}

/// One guided traversal. The frontier pops the corner whose arc got the smallest new
/// label (discovery order on ties); a node is entered at that corner and its unlabeled
/// arcs are numbered in rotation order from there.
fn traverse<L>(
    d: &Diagram<L>,
    members: &[NodeId],
    start: Corner,
    incumbent: Option<&[CanonNode]>,
) -> Result<Outcome, StructuralError> {
    let mut label: Vec<Option<usize>> = vec![None; d.arc_count()];
    let mut visited = vec![false; d.node_count()];
    let mut order: Vec<ArcId> = Vec::new();
    let mut records: Vec<CanonNode> = Vec::with_capacity(members.len());
    let mut frontier: BinaryHeap<Reverse<(usize, usize, Corner)>> = BinaryHeap::new();
    let mut seq = 0usize;
    let mut standing = if incumbent.is_some() {
        Standing::Tied
    } else {
        Standing::Smaller
    };

    let mut pending = Some(start);
    loop {
        let entry = match pending.take() {
            Some(c) => c,
            None => match frontier.pop() {
                Some(Reverse((_, _, c))) => c,
                None => break,
            },
        };
        if visited[entry.node.0] {
            continue;
        }
        visited[entry.node.0] = true;
        let node = &d.nodes[entry.node.0];
        let deg = node.degree();
        for k in 0..deg {
            let pos = (entry.pos + k) % deg;
            let arc = node.arcs[pos];
            if label[arc.0].is_some() {
                continue;
            }
            let l = order.len();
            label[arc.0] = Some(l);
            order.push(arc);
            let far = d.opposite(
                arc,
                Corner {
                    node: entry.node,
                    pos,
                },
            );
            if !visited[far.node.0] {
                frontier.push(Reverse((l, seq, far)));
                seq += 1;
            }
        }
        // Position 0 stays the structural origin so crossings keep their parity.
        let ends = node
            .arcs
            .iter()
            .map(|a| label[a.0].ok_or(StructuralError::Unreachable { unlabeled: 1 }))
            .collect::<Result<Vec<_>, _>>()?;
        let record = CanonNode::minimized(node.kind, ends, node.dirs.clone());
        if standing == Standing::Tied {
            if let Some(inc) = incumbent {
                match inc.get(records.len()).map(|r| record.cmp(r)) {
                    Some(Ordering::Less) => standing = Standing::Smaller,
                    Some(Ordering::Equal) => {}
                    Some(Ordering::Greater) | None => return Ok(Outcome::Pruned),
                }
            }
        }
        records.push(record);
    }

    let unlabeled = members
        .iter()
        .flat_map(|v| d.nodes[v.0].arcs.iter())
        .filter(|a| label[a.0].is_none())
        .count();
    if unlabeled > 0 || records.len() != members.len() {
        return Err(StructuralError::Unreachable { unlabeled });
    }
    let cand = Best {
        nodes: records,
        arcs: order,
    };
    Ok(match standing {
        Standing::Smaller => Outcome::Smaller(cand),
        Standing::Tied => Outcome::Tied,
    })
}
