//! Reduction-rule evaluator: ring-valued invariants by recursive local reduction.
//!
//! Purpose
//! - Compute a Yamada-style invariant of a diagram over any `Ring`, with the reduction
//!   weights supplied by a `RingContext`.
//!
//! Why this design
//! - One closed `Shape` enum, classified in a fixed priority order, decides the rule;
//!   `reduce` turns it into the sub-diagrams to recurse on. The sequential and parallel
//!   evaluators share both and differ only in how they recurse and cache.
//! - Every recursive call dissolves strand points, canonicalizes, and asks the cache
//!   before dispatching; rules run on the canonical diagram so the choice of crossing or
//!   arc is isomorphism-invariant.
//! - Orientation is dropped up front: the rules do not use it, and oriented and
//!   unoriented copies then share cache entries.
//!
//! Rules, by priority
//! - crossing: `w_A Y(A-smoothing) + w_B Y(B-smoothing) + Y(crossing as vertex)`
//! - bridge: zero
//! - loop: `loop_factor Y(loop removed)`; a free circle goes with its point
//! - isolated vertex: `isolated_factor Y(vertex removed)`
//! - ordinary arc: `Y(arc deleted) + Y(arc contracted)`
//! - empty: one

mod par;
mod seq;

pub use par::ParEvaluator;
pub use seq::Evaluator;

pub use crate::ring::RingContext;

use crate::cache::CacheCfg;
use crate::error::{EvalError, RingError, StructuralError};
use crate::model::{ArcId, ArcLabel, Diagram, NodeId, NodeKind, Smoothing};
use crate::ring::Ring;

/// Evaluator configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalCfg {
    /// Divide the top-level result by its lowest-degree monomial.
    pub normalize: bool,
    pub cache: CacheCfg,
}

/// Diagram shape that selects the reduction rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Crossing(NodeId),
    Bridge(ArcId),
    Loop(ArcId),
    Isolated(NodeId),
    Edge(ArcId),
    Empty,
}

/// First match in priority order; "first" means lowest index.
pub fn classify<L>(d: &Diagram<L>) -> Shape {
    if let Some((id, _)) = d.nodes().find(|(_, n)| n.kind() == NodeKind::Crossing) {
        return Shape::Crossing(id);
    }
    if let Some(&arc) = d.bridges().first() {
        return Shape::Bridge(arc);
    }
    if let Some((arc, _)) = d.arcs().find(|(a, _)| d.is_loop(*a) == Ok(true)) {
        return Shape::Loop(arc);
    }
    if let Some((id, _)) = d.nodes().find(|(_, n)| n.degree() == 0) {
        return Shape::Isolated(id);
    }
    if let Some((arc, _)) = d.arcs().next() {
        return Shape::Edge(arc);
    }
    Shape::Empty
}

/// Sub-problems of one reduction step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduction<L> {
    Zero,
    One,
    Loop(Diagram<L>),
    Isolated(Diagram<L>),
    DeletionContraction {
        deleted: Diagram<L>,
        contracted: Diagram<L>,
    },
    Crossing {
        a: Diagram<L>,
        b: Diagram<L>,
        vertex: Diagram<L>,
    },
}

/// Apply the rule `classify` picks.
pub fn reduce<L: ArcLabel>(d: &Diagram<L>) -> Result<Reduction<L>, StructuralError> {
    Ok(match classify(d) {
        Shape::Crossing(node) => Reduction::Crossing {
            a: d.smooth(node, Smoothing::A)?,
            b: d.smooth(node, Smoothing::B)?,
            vertex: d.crossing_to_vertex(node)?,
        },
        Shape::Bridge(_) => Reduction::Zero,
        Shape::Loop(arc) => Reduction::Loop(d.remove_loop(arc)?),
        Shape::Isolated(node) => Reduction::Isolated(d.remove_node(node)?),
        Shape::Edge(arc) => Reduction::DeletionContraction {
            deleted: d.delete_arc(arc)?,
            contracted: d.contract_arc(arc)?,
        },
        Shape::Empty => Reduction::One,
    })
}

/// `w_A a + w_B b + v`.
pub(crate) fn crossing_sum<R: Ring>(
    ctx: &RingContext<R>,
    a: &R,
    b: &R,
    v: &R,
) -> Result<R, RingError> {
    let wa = ctx.smoothing_weight_a.times(a)?;
    let wb = ctx.smoothing_weight_b.times(b)?;
    wa.plus(&wb)?.plus(v)
}

/// One-shot evaluation with a private cache and default configuration.
pub fn evaluate_invariant<L: ArcLabel, R: Ring>(
    d: &Diagram<L>,
    ctx: &RingContext<R>,
) -> Result<R, EvalError> {
    Evaluator::new(ctx.clone(), EvalCfg::default()).evaluate(d)
}

#[cfg(test)]
mod tests;
