//! Criterion benches for invariant evaluation.
//!
//! - sequential vs parallel evaluation of small knots;
//! - effect of cache capacity on a fixed diagram.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use yamada::cache::{CacheCfg, Capacity};
use yamada::eval::{EvalCfg, Evaluator, ParEvaluator, RingContext};
use yamada::gen;

fn bench_knots(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_knots");
    group.sample_size(20);
    for (name, d) in [
        ("trefoil", gen::trefoil().unwrap()),
        ("figure_eight", gen::figure_eight().unwrap()),
    ] {
        group.bench_function(BenchmarkId::new("sequential", name), |b| {
            b.iter(|| {
                Evaluator::new(RingContext::yamada(), EvalCfg::default())
                    .evaluate(&d)
                    .unwrap()
            })
        });
        group.bench_function(BenchmarkId::new("parallel", name), |b| {
            b.iter(|| {
                ParEvaluator::new(RingContext::yamada(), EvalCfg::default())
                    .evaluate(&d)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_capacity");
    group.sample_size(20);
    let d = gen::figure_eight().unwrap();
    for cap in [0usize, 16, 256] {
        let cfg = EvalCfg {
            normalize: false,
            cache: CacheCfg {
                capacity: Capacity::Bounded(cap),
                max_key_size: 64,
            },
        };
        group.bench_function(BenchmarkId::new("figure_eight", cap), |b| {
            b.iter(|| {
                Evaluator::new(RingContext::yamada(), cfg)
                    .evaluate(&d)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_knots, bench_capacity);
criterion_main!(benches);
