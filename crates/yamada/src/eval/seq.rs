//! Sequential evaluator owning its cache.

use tracing::debug;

use crate::cache::MemoCache;
use crate::canon::{CanonStats, CanonicalForm, Canonicalizer};
use crate::error::EvalError;
use crate::model::{ArcLabel, Diagram};
use crate::ring::{One, Ring, RingContext, Zero};

use super::{crossing_sum, reduce, EvalCfg, Reduction};

/// Depth-first evaluator. The cache lives as long as the evaluator, so repeated calls
/// reuse earlier sub-results.
#[derive(Debug)]
pub struct Evaluator<R: Ring> {
    ctx: RingContext<R>,
    cfg: EvalCfg,
    cache: MemoCache<CanonicalForm, R>,
    canon: Canonicalizer,
}

impl<R: Ring> Evaluator<R> {
    pub fn new(ctx: RingContext<R>, cfg: EvalCfg) -> Self {
        Self {
            ctx,
            cfg,
            cache: MemoCache::new(cfg.cache),
            canon: Canonicalizer::new(),
        }
    }

    pub fn ctx(&self) -> &RingContext<R> {
        &self.ctx
    }

    pub fn cache(&self) -> &MemoCache<CanonicalForm, R> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MemoCache<CanonicalForm, R> {
        &mut self.cache
    }

    pub fn canon_stats(&self) -> CanonStats {
        self.canon.stats()
    }

    /// Invariant of `d`, normalized when configured.
    pub fn evaluate<L: ArcLabel>(&mut self, d: &Diagram<L>) -> Result<R, EvalError> {
        let base = d.unoriented().to_indexed();
        let value = self.eval(&base)?;
        let stats = self.cache.stats();
        debug!(
            nodes = d.node_count(),
            arcs = d.arc_count(),
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "invariant evaluated"
        );
        if self.cfg.normalize {
            Ok(value.normalize()?)
        } else {
            Ok(value)
        }
    }

    fn eval(&mut self, d: &Diagram) -> Result<R, EvalError> {
        let d = d.dissolve_strands()?;
        let form = self.canon.form(&d)?;
        if let Some(v) = self.cache.get(&form) {
            return Ok(v.clone());
        }
        let canon = form.to_diagram()?;
        let value = match reduce(&canon)? {
            Reduction::Zero => R::zero(),
            Reduction::One => R::one(),
            Reduction::Loop(rest) => {
                let y = self.eval(&rest)?;
                self.ctx.loop_factor.times(&y)?
            }
            Reduction::Isolated(rest) => {
                let y = self.eval(&rest)?;
                self.ctx.isolated_factor.times(&y)?
            }
            Reduction::DeletionContraction {
                deleted,
                contracted,
            } => {
                let yd = self.eval(&deleted)?;
                let yc = self.eval(&contracted)?;
                yd.plus(&yc)?
            }
            Reduction::Crossing { a, b, vertex } => {
                let ya = self.eval(&a)?;
                let yb = self.eval(&b)?;
                let yv = self.eval(&vertex)?;
                crossing_sum(&self.ctx, &ya, &yb, &yv)?
            }
        };
        self.cache.put(form, value.clone());
        Ok(value)
    }
}
