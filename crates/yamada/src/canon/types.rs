//! Canonical-form records and their order.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{IncomparableError, StructuralError};
use crate::model::{Diagram, Direction, NodeKind, NodeSpec};

/// Which diagrams can be compared with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Unoriented,
    Oriented,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Unoriented => "unoriented",
            Family::Oriented => "oriented",
        }
    }
}

/// One node of a canonical form: kind tag, relabeled rotation and flow flags, rotated
/// to the smallest shift the kind allows.
///
/// Field order is the comparison order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonNode {
    pub kind: NodeKind,
    pub ends: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirs: Option<Vec<Direction>>,
}

impl CanonNode {
    /// Record for a node whose arcs already carry new labels, in rotation order.
    pub(crate) fn minimized(
        kind: NodeKind,
        ends: Vec<usize>,
        dirs: Option<Vec<Direction>>,
    ) -> Self {
        let deg = ends.len();
        let mut best = CanonNode {
            kind,
            ends: ends.clone(),
            dirs: dirs.clone(),
        };
        let step = kind.rotation_step();
        for shift in (step..deg).step_by(step) {
            let mut e = ends.clone();
            e.rotate_left(shift);
            let d = dirs.clone().map(|mut d| {
                d.rotate_left(shift);
                d
            });
            let cand = CanonNode {
                kind,
                ends: e,
                dirs: d,
            };
            if cand < best {
                best = cand;
            }
        }
        best
    }
}

/// Isomorphism-invariant description of a diagram. Equal forms mean equal diagrams for
/// every purpose of the evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalForm {
    pub family: Family,
    pub nodes: Vec<CanonNode>,
    pub arcs: usize,
}

impl CanonicalForm {
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total order within a family.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, IncomparableError> {
        if self.family != other.family {
            return Err(IncomparableError {
                left: self.family.name(),
                right: other.family.name(),
            });
        }
        Ok(self.nodes.cmp(&other.nodes))
    }

    /// Rebuild a diagram whose arcs are labeled by the canonical labels.
    pub fn to_diagram(&self) -> Result<Diagram, StructuralError> {
        Diagram::new(self.nodes.iter().map(|n| NodeSpec {
            kind: n.kind,
            arcs: n.ends.clone(),
            dirs: n.dirs.clone(),
        }))
    }
}

impl PartialOrd for CanonicalForm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

/// Canonical form together with the label each input arc received.
#[derive(Clone, Debug)]
pub struct CanonicalLabeling<L> {
    pub form: CanonicalForm,
    pub labels: HashMap<L, usize>,
}

/// Search counters, accumulated over every component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CanonStats {
    /// Starting corners tried.
    pub candidates: usize,
    /// Traversals abandoned because a prefix was already larger.
    pub pruned: usize,
    /// Traversals that ran to the end.
    pub completed: usize,
    /// Completed traversals that replaced the incumbent.
    pub improved: usize,
}
