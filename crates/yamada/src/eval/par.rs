//! Parallel evaluator: independent branches run under `rayon::join`.

use std::sync::Arc;

use tracing::debug;

use crate::cache::SharedCache;
use crate::canon::{canonical_form, CanonicalForm};
use crate::error::EvalError;
use crate::model::{ArcLabel, Diagram};
use crate::ring::{One, Ring, RingContext, Zero};

use super::{crossing_sum, reduce, EvalCfg, Reduction};

/// Fork-join evaluator over a `SharedCache`.
///
/// The three crossing terms and the deletion/contraction pair are independent and run
/// concurrently on the current rayon pool. Canonicalization needs no locking; only the
/// cache does.
pub struct ParEvaluator<R: Ring> {
    ctx: RingContext<R>,
    cfg: EvalCfg,
    cache: Arc<SharedCache<CanonicalForm, R>>,
}

impl<R: Ring> ParEvaluator<R> {
    pub fn new(ctx: RingContext<R>, cfg: EvalCfg) -> Self {
        let cache = Arc::new(SharedCache::new(cfg.cache));
        Self::with_cache(ctx, cfg, cache)
    }

    /// Share one cache between several evaluators (same weights expected).
    pub fn with_cache(
        ctx: RingContext<R>,
        cfg: EvalCfg,
        cache: Arc<SharedCache<CanonicalForm, R>>,
    ) -> Self {
        Self { ctx, cfg, cache }
    }

    pub fn cache(&self) -> &Arc<SharedCache<CanonicalForm, R>> {
        &self.cache
    }

    pub fn evaluate<L: ArcLabel>(&self, d: &Diagram<L>) -> Result<R, EvalError> {
        let base = d.unoriented().to_indexed();
        let value = self.eval(&base)?;
        let stats = self.cache.stats();
        debug!(
            nodes = d.node_count(),
            entries = stats.entries,
            duplicates = stats.duplicates,
            "invariant evaluated in parallel"
        );
        if self.cfg.normalize {
            Ok(value.normalize()?)
        } else {
            Ok(value)
        }
    }

    fn eval(&self, d: &Diagram) -> Result<R, EvalError> {
        let d = d.dissolve_strands()?;
        let form = canonical_form(&d)?;
        self.cache.get_or_compute(&form, || -> Result<R, EvalError> {
            let canon = form.to_diagram()?;
            Ok(match reduce(&canon)? {
                Reduction::Zero => R::zero(),
                Reduction::One => R::one(),
                Reduction::Loop(rest) => self.ctx.loop_factor.times(&self.eval(&rest)?)?,
                Reduction::Isolated(rest) => self.ctx.isolated_factor.times(&self.eval(&rest)?)?,
                Reduction::DeletionContraction {
                    deleted,
                    contracted,
                } => {
                    let (yd, yc) = rayon::join(|| self.eval(&deleted), || self.eval(&contracted));
                    yd?.plus(&yc?)?
                }
                Reduction::Crossing { a, b, vertex } => {
                    let (ya, (yb, yv)) = rayon::join(
                        || self.eval(&a),
                        || rayon::join(|| self.eval(&b), || self.eval(&vertex)),
                    );
                    crossing_sum(&self.ctx, &ya?, &yb?, &yv?)?
                }
            })
        })
    }
}
