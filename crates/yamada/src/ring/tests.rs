use super::*;
use crate::error::RingError;
use num_traits::{CheckedAdd, CheckedMul};

fn a() -> LaurentPoly {
    LaurentPoly::var()
}

#[test]
fn arithmetic_cancels_and_drops_zero_terms() {
    let p = LaurentPoly::from_terms([(1, 2), (0, -1), (-1, 1)]);
    let q = LaurentPoly::from_terms([(1, -2), (2, 1)]);
    let sum = &p + &q;
    assert_eq!(sum, LaurentPoly::from_terms([(2, 1), (0, -1), (-1, 1)]));
    assert_eq!(sum.coeff(1), 0);
    assert!((&p - &p).is_zero());
    assert_eq!(-(-p.clone()), p);
    assert_eq!(LaurentPoly::from_terms([(3, 2), (3, -2)]), LaurentPoly::zero());
}

#[test]
fn products_with_negative_powers() {
    let a_inv = LaurentPoly::monomial(1, -1);
    assert_eq!(&a() * &a_inv, LaurentPoly::one());
    // (A + A^-1)^2 = A^2 + 2 + A^-2
    let s = &a() + &a_inv;
    assert_eq!(
        &s * &s,
        LaurentPoly::from_terms([(2, 1), (0, 2), (-2, 1)])
    );
    assert_eq!(s.min_degree(), Some(-1));
    assert_eq!(s.max_degree(), Some(1));
    assert!((&s * &LaurentPoly::zero()).is_zero());
}

#[test]
fn display_reads_highest_power_first() {
    let ctx = RingContext::yamada();
    assert_eq!(ctx.loop_factor.to_string(), "-A - 1 - A^-1");
    assert_eq!(LaurentPoly::from_terms([(2, 3), (0, -1)]).to_string(), "3A^2 - 1");
    assert_eq!(LaurentPoly::zero().to_string(), "0");
    assert_eq!(ctx.smoothing_weight_b.to_string(), "A^-1");
}

#[test]
fn normalization_divides_by_lowest_monomial() {
    let p = LaurentPoly::from_terms([(-3, -1), (-1, 2), (0, 5)]);
    let n = p.normalized().unwrap();
    assert_eq!(n.min_degree(), Some(0));
    assert_eq!(n.coeff(0), 1);
    assert_eq!(n, LaurentPoly::from_terms([(0, 1), (2, -2), (3, -5)]));
    assert_eq!(LaurentPoly::zero().normalized(), Ok(LaurentPoly::zero()));
    assert!(matches!(
        LaurentPoly::from_terms([(1, 2), (2, 1)]).normalized(),
        Err(RingError::NonUnit(_))
    ));
}

#[test]
fn integer_ring_basics() {
    assert_eq!(<i64 as Zero>::zero(), 0);
    assert_eq!(3i64.plus(&4).and_then(|x| x.times(&2)), Ok(14));
    assert_eq!(5i64.scaled(-2), Ok(-10));
    assert_eq!(7i64.normalize(), Ok(7));
    assert!(<i64 as Zero>::zero().is_zero());
}

#[test]
fn yamada_weights_are_inverse_pair() {
    let ctx = RingContext::yamada();
    assert_eq!(
        ctx.smoothing_weight_a.times(&ctx.smoothing_weight_b),
        Ok(LaurentPoly::one())
    );
    assert_eq!(ctx.isolated_factor, LaurentPoly::constant(-1));
    assert_eq!(ctx.loop_factor.eval(1.0), -3.0);
}

#[test]
fn serde_uses_exponent_map() {
    let p = LaurentPoly::from_terms([(-1, 2), (3, -1)]);
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#"{"-1":2,"3":-1}"#);
    let back: LaurentPoly = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
}

#[test]
fn overflow_is_an_error_not_a_wrap() {
    let big = LaurentPoly::monomial(i64::MAX, 2);
    assert_eq!(big.plus(&LaurentPoly::monomial(1, 2)), Err(RingError::Overflow("sum")));
    assert_eq!(big.times(&LaurentPoly::constant(2)), Err(RingError::Overflow("product")));
    assert_eq!(big.scaled(-2), Err(RingError::Overflow("scaling")));
    assert!(big.checked_add(&LaurentPoly::monomial(1, 3)).is_some());
    assert!(LaurentPoly::monomial(1, i32::MAX).checked_mul(&LaurentPoly::var()).is_none());
    assert_eq!(i64::MAX.plus(&1), Err(RingError::Overflow("sum")));
    assert_eq!(i64::MIN.times(&-1), Err(RingError::Overflow("product")));
    // Cancelling at the edge of the range is fine.
    assert_eq!(big.plus(&LaurentPoly::monomial(-i64::MAX, 2)), Ok(LaurentPoly::zero()));
}

#[test]
fn powers_of_the_loop_factor_stay_exact_until_they_overflow() {
    let lf = RingContext::yamada().loop_factor;
    let mut p = LaurentPoly::one();
    let mut last_ok = 0;
    for n in 1..=60 {
        match p.times(&lf) {
            Ok(q) => {
                p = q;
                last_ok = n;
            }
            Err(e) => {
                assert_eq!(e, RingError::Overflow("product"));
                break;
            }
        }
    }
    assert!((30..45).contains(&last_ok), "{last_ok}");
    let sign = if last_ok % 2 == 0 { 1 } else { -1 };
    assert_eq!(p.max_degree(), Some(last_ok));
    assert!(p.terms().all(|(_, c)| c.signum() == sign));
}

#[test]
#[should_panic(expected = "coefficient overflow")]
fn operators_panic_on_overflow() {
    let _ = &LaurentPoly::constant(i64::MAX) + &LaurentPoly::one();
}
