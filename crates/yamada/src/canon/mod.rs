//! Canonicalizer: lexicographically minimal relabeling of a diagram.
//!
//! Purpose
//! - Produce an isomorphism-invariant key (`CanonicalForm`) so equal diagrams can be
//!   recognized and their invariants shared through the cache.
//!
//! Why this design
//! - Branch and bound over starting corners: only corners of maximum-degree nodes start
//!   a traversal, and each traversal is compared record by record against the incumbent
//!   while it grows, so most candidates die after a few nodes.
//! - Components are canonicalized independently, sorted, then numbered with running
//!   offsets. A lone isolated node has an empty rotation and sorts first.
//! - Crossing records are only rotated by even shifts; over/under is part of the key.
//! - Ties between starting corners: the scan is exhaustive and the first minimal
//!   traversal found is kept. Equal candidates give equal forms, so only the label map
//!   of `canonical_labeling` depends on this choice.
//!
//! Cost is (maximum-degree corners) x O(arcs + nodes log nodes) per component in the
//! worst case; highly symmetric diagrams (bouquets, cycles) hit it.

mod search;
mod types;

pub use search::{candidate_from, canonical_form, canonical_labeling, compare, Canonicalizer};
pub use types::{CanonNode, CanonStats, CanonicalForm, CanonicalLabeling, Family};
