//! Data types for rotation-system diagrams.
//!
//! Kept small and explicit so `diagram`, `edit` and the canonicalizer stay readable.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;

/// Arc labels: anything hashable and printable.
pub trait ArcLabel: Clone + Eq + Hash + fmt::Debug {}
impl<T: Clone + Eq + Hash + fmt::Debug> ArcLabel for T {}

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArcId(pub usize);

/// A position in a node's rotation; also names the corner that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Corner {
    pub node: NodeId,
    pub pos: usize,
}

impl Corner {
    #[inline]
    pub fn new(node: usize, pos: usize) -> Self {
        Self {
            node: NodeId(node),
            pos,
        }
    }
}

/// Stored node kind. The declaration order is the order used by canonical forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Graph vertex of any degree.
    Vertex,
    /// Cosmetic degree-2 point on a strand.
    Strand,
    /// Degree 4; positions 0/2 carry the under strand, 1/3 the over strand.
    Crossing,
}

impl NodeKind {
    /// Rotation shifts that preserve the node's local structure come in multiples of this.
    #[inline]
    pub fn rotation_step(self) -> usize {
        match self {
            NodeKind::Crossing => 2,
            NodeKind::Vertex | NodeKind::Strand => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Vertex => "vertex",
            NodeKind::Strand => "strand",
            NodeKind::Crossing => "crossing",
        }
    }
}

/// Closed set of node shapes the evaluator dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// Vertex of degree 0.
    Isolated,
    /// Strand point (degree 2).
    Ordinary,
    /// Any other graph vertex; degree >= 3 once strands are dissolved and loops removed.
    Branch,
    Crossing,
}

/// Flow of a strand relative to the node it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    #[inline]
    pub fn value(self) -> i64 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }
}

/// Construction input: one node, its arc labels in rotation order, optional flow flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec<L> {
    pub kind: NodeKind,
    pub arcs: Vec<L>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirs: Option<Vec<Direction>>,
}

impl<L> NodeSpec<L> {
    pub fn vertex(arcs: Vec<L>) -> Self {
        Self {
            kind: NodeKind::Vertex,
            arcs,
            dirs: None,
        }
    }

    pub fn strand(a: L, b: L) -> Self {
        Self {
            kind: NodeKind::Strand,
            arcs: vec![a, b],
            dirs: None,
        }
    }

    pub fn crossing(arcs: [L; 4]) -> Self {
        Self {
            kind: NodeKind::Crossing,
            arcs: arcs.into(),
            dirs: None,
        }
    }

    pub fn with_dirs(mut self, dirs: Vec<Direction>) -> Self {
        self.dirs = Some(dirs);
        self
    }

    /// Local checks: degree per kind and well-formed flow flags.
    pub(crate) fn check(&self, node: NodeId) -> Result<(), StructuralError> {
        let degree = self.arcs.len();
        let expected = match self.kind {
            NodeKind::Vertex => None,
            NodeKind::Strand => Some(2),
            NodeKind::Crossing => Some(4),
        };
        if let Some(expected) = expected {
            if degree != expected {
                return Err(StructuralError::BadDegree {
                    node,
                    kind: self.kind.name(),
                    expected,
                    degree,
                });
            }
        }
        let Some(dirs) = &self.dirs else {
            return Ok(());
        };
        if self.kind != NodeKind::Crossing {
            return Err(StructuralError::BadOrientation {
                node,
                reason: "only crossings carry directions",
            });
        }
        if dirs.len() != degree {
            return Err(StructuralError::BadOrientation {
                node,
                reason: "one direction per endpoint required",
            });
        }
        if dirs[0] == dirs[2] || dirs[1] == dirs[3] {
            return Err(StructuralError::BadOrientation {
                node,
                reason: "each strand needs one incoming and one outgoing end",
            });
        }
        Ok(())
    }
}

/// Validated node: arcs are dense indices into the owning diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) arcs: Vec<ArcId>,
    pub(crate) dirs: Option<Vec<Direction>>,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
    #[inline]
    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }
    #[inline]
    pub fn dirs(&self) -> Option<&[Direction]> {
        self.dirs.as_deref()
    }
    #[inline]
    pub fn degree(&self) -> usize {
        self.arcs.len()
    }

    pub fn shape(&self) -> NodeShape {
        match self.kind {
            NodeKind::Crossing => NodeShape::Crossing,
            NodeKind::Strand => NodeShape::Ordinary,
            NodeKind::Vertex if self.arcs.is_empty() => NodeShape::Isolated,
            NodeKind::Vertex => NodeShape::Branch,
        }
    }

    /// Sign of an oriented crossing: positive when the over strand enters three
    /// positions after the under strand enters.
    pub fn sign(&self) -> Option<Sign> {
        if self.kind != NodeKind::Crossing {
            return None;
        }
        let dirs = self.dirs.as_ref()?;
        let under_in = if dirs[0] == Direction::In { 0 } else { 2 };
        let over_in = if dirs[1] == Direction::In { 1 } else { 3 };
        if over_in == (under_in + 3) % 4 {
            Some(Sign::Positive)
        } else {
            Some(Sign::Negative)
        }
    }
}

/// Which pair of corners a crossing smoothing joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Smoothing {
    /// Joins positions (0,1) and (2,3).
    A,
    /// Joins positions (0,3) and (1,2).
    B,
}
