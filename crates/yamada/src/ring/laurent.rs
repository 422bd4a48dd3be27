//! Laurent polynomials in one variable with integer coefficients.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::RingError;

use super::Ring;

/// Sparse `sum c_e A^e`; zero coefficients are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaurentPoly {
    terms: BTreeMap<i32, i64>,
}

impl LaurentPoly {
    pub fn constant(c: i64) -> Self {
        Self::monomial(c, 0)
    }

    /// The variable `A`.
    pub fn var() -> Self {
        Self::monomial(1, 1)
    }

    /// `coeff * A^exp`.
    pub fn monomial(coeff: i64, exp: i32) -> Self {
        let mut terms = BTreeMap::new();
        if coeff != 0 {
            terms.insert(exp, coeff);
        }
        Self { terms }
    }

    /// Sum of `(exp, coeff)` pairs; repeated exponents add up.
    ///
    /// # Panics
    /// If a summed coefficient overflows `i64`.
    pub fn from_terms<I: IntoIterator<Item = (i32, i64)>>(terms: I) -> Self {
        let mut p = Self::zero();
        for (e, c) in terms {
            if p.add_term(e, c).is_none() {
                panic!("LaurentPoly coefficient overflow in sum");
            }
        }
        p
    }

    fn add_term(&mut self, exp: i32, coeff: i64) -> Option<()> {
        if coeff == 0 {
            return Some(());
        }
        let c = self.terms.entry(exp).or_insert(0);
        *c = c.checked_add(coeff)?;
        if *c == 0 {
            self.terms.remove(&exp);
        }
        Some(())
    }

    pub fn coeff(&self, exp: i32) -> i64 {
        self.terms.get(&exp).copied().unwrap_or(0)
    }

    /// Nonzero terms by ascending exponent.
    pub fn terms(&self) -> impl Iterator<Item = (i32, i64)> + '_ {
        self.terms.iter().map(|(&e, &c)| (e, c))
    }

    pub fn min_degree(&self) -> Option<i32> {
        self.terms.keys().next().copied()
    }

    pub fn max_degree(&self) -> Option<i32> {
        self.terms.keys().next_back().copied()
    }

    /// Multiply by `A^k`; `None` if an exponent leaves `i32`.
    pub fn checked_shift(&self, k: i32) -> Option<Self> {
        let terms = self
            .terms
            .iter()
            .map(|(&e, &c)| Some((e.checked_add(k)?, c)))
            .collect::<Option<_>>()?;
        Some(Self { terms })
    }

    /// Multiply every coefficient by `k`; `None` on overflow.
    pub fn checked_scale(&self, k: i64) -> Option<Self> {
        if k == 0 {
            return Some(Self::zero());
        }
        let terms = self
            .terms
            .iter()
            .map(|(&e, &c)| Some((e, c.checked_mul(k)?)))
            .collect::<Option<_>>()?;
        Some(Self { terms })
    }

    /// Value at `A = x` for nonzero `x`, as a float since negative powers appear.
    pub fn eval(&self, x: f64) -> f64 {
        self.terms
            .iter()
            .map(|(&e, &c)| c as f64 * x.powi(e))
            .sum()
    }

    /// Divide by the lowest-degree monomial so the result starts with `+1 * A^0`.
    ///
    /// Only `±1` leading coefficients are units over the integers; anything else is an
    /// error rather than a silent rescale.
    pub fn normalized(&self) -> Result<Self, RingError> {
        let Some((&e, &c)) = self.terms.iter().next() else {
            return Ok(Self::zero());
        };
        if c != 1 && c != -1 {
            return Err(RingError::NonUnit(Self::monomial(c, e).to_string()));
        }
        e.checked_neg()
            .and_then(|k| self.checked_shift(k))
            .and_then(|p| p.checked_scale(c))
            .ok_or(RingError::Overflow("normalization"))
    }
}

fn overflowed(p: Option<LaurentPoly>, op: &str) -> LaurentPoly {
    match p {
        Some(p) => p,
        None => panic!("LaurentPoly coefficient overflow in {op}"),
    }
}

impl Zero for LaurentPoly {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for LaurentPoly {
    fn one() -> Self {
        Self::constant(1)
    }
}

impl CheckedAdd for LaurentPoly {
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        let mut out = self.clone();
        for (&e, &c) in &rhs.terms {
            out.add_term(e, c)?;
        }
        Some(out)
    }
}

impl CheckedSub for LaurentPoly {
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        let mut out = self.clone();
        for (&e, &c) in &rhs.terms {
            out.add_term(e, c.checked_neg()?)?;
        }
        Some(out)
    }
}

impl CheckedMul for LaurentPoly {
    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        let mut out = Self::zero();
        for (&e1, &c1) in &self.terms {
            for (&e2, &c2) in &rhs.terms {
                out.add_term(e1.checked_add(e2)?, c1.checked_mul(c2)?)?;
            }
        }
        Some(out)
    }
}

impl Ring for LaurentPoly {
    fn scaled(&self, k: i64) -> Result<Self, RingError> {
        self.checked_scale(k).ok_or(RingError::Overflow("scaling"))
    }

    fn normalize(&self) -> Result<Self, RingError> {
        self.normalized()
    }
}

// Operators panic on overflow like the integer ones; the evaluator goes through the
// checked traits instead.

impl Add<&LaurentPoly> for &LaurentPoly {
    type Output = LaurentPoly;
    fn add(self, rhs: &LaurentPoly) -> LaurentPoly {
        overflowed(self.checked_add(rhs), "sum")
    }
}

impl Sub<&LaurentPoly> for &LaurentPoly {
    type Output = LaurentPoly;
    fn sub(self, rhs: &LaurentPoly) -> LaurentPoly {
        overflowed(self.checked_sub(rhs), "difference")
    }
}

impl Mul<&LaurentPoly> for &LaurentPoly {
    type Output = LaurentPoly;
    fn mul(self, rhs: &LaurentPoly) -> LaurentPoly {
        overflowed(self.checked_mul(rhs), "product")
    }
}

impl Neg for &LaurentPoly {
    type Output = LaurentPoly;
    fn neg(self) -> LaurentPoly {
        overflowed(self.checked_scale(-1), "negation")
    }
}

impl Add for LaurentPoly {
    type Output = LaurentPoly;
    fn add(self, rhs: LaurentPoly) -> LaurentPoly {
        &self + &rhs
    }
}

impl Sub for LaurentPoly {
    type Output = LaurentPoly;
    fn sub(self, rhs: LaurentPoly) -> LaurentPoly {
        &self - &rhs
    }
}

impl Mul for LaurentPoly {
    type Output = LaurentPoly;
    fn mul(self, rhs: LaurentPoly) -> LaurentPoly {
        &self * &rhs
    }
}

impl Neg for LaurentPoly {
    type Output = LaurentPoly;
    fn neg(self) -> LaurentPoly {
        -&self
    }
}

/// Highest power first, e.g. `A^2 - 1 + 3A^-1`.
impl fmt::Display for LaurentPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (&e, &c)) in self.terms.iter().rev().enumerate() {
            let abs = c.unsigned_abs();
            match (i, c < 0) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if e == 0 {
                write!(f, "{abs}")?;
                continue;
            }
            if abs != 1 {
                write!(f, "{abs}")?;
            }
            if e == 1 {
                write!(f, "A")?;
            } else {
                write!(f, "A^{e}")?;
            }
        }
        Ok(())
    }
}
