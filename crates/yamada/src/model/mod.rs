//! Rotation-system model: nodes with cyclically ordered arc endpoints.
//!
//! Purpose
//! - Represent knot, link and spatial-graph diagrams as rotation systems and answer
//!   the structural queries the canonicalizer and evaluator need (`degree`, `dual`,
//!   faces, bridges, loops, isolated nodes).
//! - Provide the local edits used by the reduction rules (deletion, contraction,
//!   smoothing, strand dissolution).
//!
//! Layout
//! - `types.rs` (ids, kinds, construction specs), `diagram.rs` (validation and queries),
//!   `edit.rs` (edits). Public re-exports below.

mod diagram;
mod edit;
mod types;

pub use diagram::{Areas, Diagram};
pub use types::{
    ArcId, ArcLabel, Corner, Direction, Node, NodeId, NodeKind, NodeShape, NodeSpec, Sign,
    Smoothing,
};
