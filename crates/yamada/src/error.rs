//! Error kinds shared by the model, canonicalizer and evaluator.
//!
//! - `StructuralError`: malformed diagram or out-of-range query; fatal to the call.
//! - `IncomparableError`: canonical forms from different families.
//! - `RingError`: ring arithmetic that has no answer (non-unit division, coefficient overflow).
//!
//! Nothing here is retried: every operation is deterministic.

use thiserror::Error;

use crate::model::NodeId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("arc {label} has a single endpoint")]
    DanglingArc { label: String },
    #[error("arc {label} has {count} endpoints (expected 2)")]
    OverusedArc { label: String, count: usize },
    #[error("node {0:?} does not exist")]
    NodeOutOfRange(NodeId),
    #[error("node {node:?} has no position {pos}")]
    PositionOutOfRange { node: NodeId, pos: usize },
    #[error("arc index {0} does not exist")]
    ArcOutOfRange(usize),
    #[error("node {node:?}: {kind} nodes need degree {expected}, got {degree}")]
    BadDegree {
        node: NodeId,
        kind: &'static str,
        expected: usize,
        degree: usize,
    },
    #[error("node {node:?}: {reason}")]
    BadOrientation { node: NodeId, reason: &'static str },
    #[error("diagram mixes oriented and unoriented crossings")]
    MixedOrientation,
    #[error("arc {0} is not a loop")]
    NotALoop(usize),
    #[error("arc {0} is a loop and cannot be contracted")]
    LoopContraction(usize),
    #[error("node {0:?} is not {1}")]
    WrongShape(NodeId, &'static str),
    #[error("traversal left {unlabeled} arcs unlabeled in a connected component")]
    Unreachable { unlabeled: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot compare a {left} canonical form with a {right} one")]
pub struct IncomparableError {
    pub left: &'static str,
    pub right: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("cannot divide by non-unit {0}")]
    NonUnit(String),
    #[error("coefficient overflow in {0}")]
    Overflow(&'static str),
}

/// Errors from comparing two diagrams through their canonical forms.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CanonError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Incomparable(#[from] IncomparableError),
}

/// Errors from invariant evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Ring(#[from] RingError),
}
