use super::*;
use crate::cache::{CacheCfg, Capacity};
use crate::error::{EvalError, RingError};
use crate::gen;
use crate::model::{ArcId, Diagram, NodeId, NodeSpec};
use crate::ring::{LaurentPoly, One, Zero};

fn yamada() -> RingContext<LaurentPoly> {
    RingContext::yamada()
}

/// Integer weights: loops count 3, isolated vertices -1.
fn counting() -> RingContext<i64> {
    RingContext::new(2, 5, 3, -1)
}

fn unbounded() -> EvalCfg {
    EvalCfg {
        normalize: false,
        cache: CacheCfg::unbounded(),
    }
}

#[test]
fn free_circle_is_the_loop_factor() {
    let y = evaluate_invariant(&gen::unknot().unwrap(), &yamada()).unwrap();
    assert_eq!(y, yamada().loop_factor);
    assert_eq!(y.to_string(), "-A - 1 - A^-1");
    // A closed chain of strand points is still one circle.
    let ring = Diagram::new([NodeSpec::strand(0, 1), NodeSpec::strand(1, 2), NodeSpec::strand(2, 0)])
        .unwrap();
    assert_eq!(evaluate_invariant(&ring, &yamada()).unwrap(), y);
}

#[test]
fn empty_diagram_is_one() {
    let y = evaluate_invariant(&Diagram::<usize>::default(), &yamada()).unwrap();
    assert_eq!(y, LaurentPoly::one());
}

#[test]
fn bridges_kill_the_invariant() {
    assert!(evaluate_invariant(&gen::handcuff().unwrap(), &yamada())
        .unwrap()
        .is_zero());
    // Trefoil with a pendant loop hung off one of its arcs.
    let knotted = Diagram::new([
        NodeSpec::crossing([1, 5, 2, 4]),
        NodeSpec::crossing([3, 7, 4, 6]),
        NodeSpec::crossing([5, 3, 6, 2]),
        NodeSpec::vertex(vec![1, 7, 8]),
        NodeSpec::vertex(vec![8, 9, 9]),
    ])
    .unwrap();
    assert!(evaluate_invariant(&knotted, &yamada()).unwrap().is_zero());
    assert_eq!(evaluate_invariant(&knotted, &counting()).unwrap(), 0);
}

#[test]
fn theta_by_hand() {
    // digon = 0 + lf * iso, theta = digon + lf^2 * iso
    assert_eq!(evaluate_invariant(&gen::theta().unwrap(), &counting()).unwrap(), -12);
    let ctx = yamada();
    let lf = &ctx.loop_factor;
    let expected = -(lf + &(lf * lf));
    assert_eq!(evaluate_invariant(&gen::theta().unwrap(), &ctx).unwrap(), expected);
}

#[test]
fn crossing_rule_on_curls() {
    let ctx = yamada();
    let lf = ctx.loop_factor.clone();
    let lf2 = &lf * &lf;
    let a = ctx.smoothing_weight_a.clone();
    let b = ctx.smoothing_weight_b.clone();
    // A-smoothing: two circles; B-smoothing: one; vertex: bouquet of two loops.
    let curl = Diagram::new([NodeSpec::crossing([0, 0, 1, 1])]).unwrap();
    let expected = &(&(&a * &lf2) + &(&b * &lf)) - &lf2;
    assert_eq!(evaluate_invariant(&curl, &ctx).unwrap(), expected);

    let other = Diagram::new([NodeSpec::crossing([0, 1, 1, 0])]).unwrap();
    let expected = &(&(&a * &lf) + &(&b * &lf2)) - &lf2;
    assert_eq!(evaluate_invariant(&other, &ctx).unwrap(), expected);
}

#[test]
fn deletion_contraction_holds_for_any_ordinary_arc() {
    for seed in 0..25 {
        let d = gen::random_graph(4, 6, seed).unwrap();
        let total = evaluate_invariant(&d, &counting()).unwrap();
        let total_poly = evaluate_invariant(&d, &yamada()).unwrap();
        for (arc, _) in d.arcs() {
            if d.is_loop(arc).unwrap() || d.is_bridge(arc).unwrap() {
                continue;
            }
            let del = d.delete_arc(arc).unwrap();
            let con = d.contract_arc(arc).unwrap();
            let split = evaluate_invariant(&del, &counting()).unwrap()
                + evaluate_invariant(&con, &counting()).unwrap();
            assert_eq!(total, split, "seed {seed} arc {arc:?}");
            let split_poly = &evaluate_invariant(&del, &yamada()).unwrap()
                + &evaluate_invariant(&con, &yamada()).unwrap();
            assert_eq!(total_poly, split_poly, "seed {seed} arc {arc:?}");
        }
    }
}

#[test]
fn graph_values_ignore_the_embedding() {
    let torus = Diagram::from_rotations(vec![vec![0, 1, 2], vec![0, 1, 2]]).unwrap();
    assert_eq!(
        evaluate_invariant(&torus, &yamada()).unwrap(),
        evaluate_invariant(&gen::theta().unwrap(), &yamada()).unwrap()
    );
}

#[test]
fn isomorphic_diagrams_share_cache_entries() {
    let mut ev = Evaluator::new(yamada(), unbounded());
    let d = gen::figure_eight().unwrap();
    let first = ev.evaluate(&d).unwrap();
    let entries = ev.cache().len();
    let hits = ev.cache().stats().hits;
    let copy = gen::shuffle(&d, 5).unwrap();
    assert_eq!(ev.evaluate(&copy).unwrap(), first);
    assert_eq!(ev.cache().len(), entries);
    assert_eq!(ev.cache().stats().hits, hits + 1);
    // Orientation is ignored.
    let oriented = gen::oriented_knot(&gen::FIGURE_EIGHT).unwrap();
    assert_eq!(ev.evaluate(&oriented).unwrap(), first);
    assert_eq!(ev.cache().len(), entries);
}

#[test]
fn small_caches_only_cost_time() {
    let d = gen::figure_eight().unwrap();
    let full = evaluate_invariant(&d, &yamada()).unwrap();
    for capacity in [Capacity::Bounded(0), Capacity::Bounded(3)] {
        let cfg = EvalCfg {
            normalize: false,
            cache: CacheCfg {
                capacity,
                max_key_size: 4,
            },
        };
        let mut ev = Evaluator::new(yamada(), cfg);
        assert_eq!(ev.evaluate(&d).unwrap(), full);
        assert!(ev.cache().len() <= 3);
    }
}

#[test]
fn classification_follows_priority() {
    assert_eq!(classify(&gen::trefoil().unwrap()), Shape::Crossing(NodeId(0)));
    // handcuff has loops too, the bridge wins
    assert_eq!(classify(&gen::handcuff().unwrap()), Shape::Bridge(ArcId(1)));
    assert_eq!(classify(&gen::bouquet(2).unwrap()), Shape::Loop(ArcId(0)));
    let with_point =
        Diagram::from_rotations(vec![vec![0, 1, 2], vec![2, 1, 0], vec![]]).unwrap();
    assert_eq!(classify(&with_point), Shape::Isolated(NodeId(2)));
    assert_eq!(classify(&gen::theta().unwrap()), Shape::Edge(ArcId(0)));
    assert_eq!(classify(&Diagram::<usize>::default()), Shape::Empty);
}

#[test]
fn reduce_matches_the_shape() {
    assert_eq!(reduce(&gen::handcuff().unwrap()), Ok(Reduction::Zero));
    assert_eq!(reduce(&Diagram::<usize>::default()), Ok(Reduction::One));
    match reduce(&gen::hopf().unwrap()).unwrap() {
        Reduction::Crossing { a, b, vertex } => {
            assert_eq!(a.node_count(), 3);
            assert_eq!(b.node_count(), 3);
            assert_eq!(vertex.node_count(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parallel_agrees_with_sequential() {
    for d in [
        gen::trefoil().unwrap(),
        gen::figure_eight().unwrap(),
        gen::hopf().unwrap(),
        gen::theta().unwrap(),
        gen::handcuff().unwrap(),
        gen::random_graph(5, 7, 1).unwrap(),
    ] {
        let seq = Evaluator::new(yamada(), unbounded()).evaluate(&d).unwrap();
        let par = ParEvaluator::new(yamada(), unbounded()).evaluate(&d).unwrap();
        assert_eq!(seq, par);
    }
    for seed in 0..10 {
        let d = gen::random_diagram(2, 3, 1, seed).unwrap();
        let seq = Evaluator::new(yamada(), unbounded()).evaluate(&d).unwrap();
        let par = ParEvaluator::new(yamada(), unbounded()).evaluate(&d).unwrap();
        assert_eq!(seq, par, "seed {seed}");
        let copy = gen::shuffle(&d, seed).unwrap();
        assert_eq!(evaluate_invariant(&copy, &yamada()).unwrap(), seq, "seed {seed}");
    }
    let par = ParEvaluator::new(counting(), EvalCfg::default());
    assert_eq!(par.evaluate(&gen::theta().unwrap()).unwrap(), -12);
    assert!(!par.cache().is_empty());
}

#[test]
fn normalization_fixes_the_unit_or_fails() {
    let cfg = EvalCfg {
        normalize: true,
        ..EvalCfg::default()
    };
    let mut ev = Evaluator::new(yamada(), cfg);
    let y = ev.evaluate(&gen::unknot().unwrap()).unwrap();
    assert_eq!(y, LaurentPoly::from_terms([(0, 1), (1, 1), (2, 1)]));

    let doubled = RingContext::new(
        LaurentPoly::var(),
        LaurentPoly::monomial(1, -1),
        LaurentPoly::monomial(2, 1),
        LaurentPoly::constant(-1),
    );
    let mut ev = Evaluator::new(doubled, cfg);
    assert!(matches!(
        ev.evaluate(&gen::unknot().unwrap()),
        Err(EvalError::Ring(RingError::NonUnit(_)))
    ));
}

#[test]
fn malformed_input_never_reaches_the_evaluator() {
    let bad = Diagram::from_rotations(vec![vec![0, 1], vec![0]]);
    assert!(bad.is_err());
}

#[test]
fn coefficient_overflow_surfaces_as_ring_error() {
    // bouquet(n) evaluates to -loop_factor^n; 3^n outgrows i64 around n = 40.
    let big = gen::bouquet(45).unwrap();
    assert!(matches!(
        evaluate_invariant(&big, &yamada()),
        Err(EvalError::Ring(RingError::Overflow(_)))
    ));
    assert!(matches!(
        ParEvaluator::new(yamada(), EvalCfg::default()).evaluate(&big),
        Err(EvalError::Ring(RingError::Overflow(_)))
    ));
    assert!(matches!(
        evaluate_invariant(&big, &counting()),
        Err(EvalError::Ring(RingError::Overflow(_)))
    ));

    let ctx = yamada();
    let mut expected = -LaurentPoly::one();
    for _ in 0..30 {
        expected = &expected * &ctx.loop_factor;
    }
    assert_eq!(evaluate_invariant(&gen::bouquet(30).unwrap(), &ctx).unwrap(), expected);
    assert_eq!(
        evaluate_invariant(&gen::bouquet(30).unwrap(), &counting()).unwrap(),
        -(3i64.pow(30))
    );
}
