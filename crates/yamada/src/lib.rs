//! Canonical forms and memoized reduction-rule invariants of planar diagrams.
//!
//! A diagram is a rotation system: nodes (graph vertices, strand points, crossings)
//! with their arc endpoints in cyclic order. Knots, links and spatial graphs all fit.
//!
//! Data flow for one query
//! - `model` builds and validates the diagram;
//! - `canon` turns it into an isomorphism-invariant `CanonicalForm`;
//! - `cache` stores ring values under canonical forms;
//! - `eval` reduces the diagram recursively, re-entering `canon` and `cache` for every
//!   sub-diagram.
//!
//! API Policy
//! - Workspace-internal crate; the CLI is the only downstream user. Breaking changes are
//!   fine when they make the algorithms clearer.

pub mod cache;
pub mod canon;
pub mod error;
pub mod eval;
pub mod gen;
pub mod model;
pub mod ring;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use canon::{canonical_form, CanonicalForm};
pub use error::{CanonError, EvalError, IncomparableError, RingError, StructuralError};
pub use eval::evaluate_invariant;
pub use model::{Diagram, NodeSpec};

/// Common exports for callers.
pub mod prelude {
    pub use crate::cache::{CacheCfg, CacheStats, Capacity, MemoCache, SharedCache};
    pub use crate::canon::{canonical_form, canonical_labeling, CanonicalForm, Canonicalizer};
    pub use crate::error::{CanonError, EvalError, StructuralError};
    pub use crate::eval::{evaluate_invariant, EvalCfg, Evaluator, ParEvaluator, RingContext};
    pub use crate::model::{Corner, Diagram, Direction, NodeKind, NodeSpec};
    pub use crate::ring::{LaurentPoly, One, Ring, Zero};
}
