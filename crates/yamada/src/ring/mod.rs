//! Ring elements the evaluator computes in.
//!
//! Purpose
//! - `Ring`: the few operations the reduction rules need (sum, product, integer scaling,
//!   normalization), all checked. Identities come from `num_traits::{Zero, One}`.
//!   Implemented for `i64` (counting checks) and `LaurentPoly` (the Yamada-style
//!   polynomial in one variable `A`).
//! - `RingContext`: the four reduction weights, passed in as configuration.
//!
//! Coefficients are fixed-width: a sum or product that leaves `i64` is a
//! `RingError::Overflow`, never a wrapped value.

mod laurent;

pub use laurent::LaurentPoly;
pub use num_traits::{One, Zero};

use std::fmt;

use num_traits::{CheckedAdd, CheckedMul};

use crate::error::RingError;

/// Commutative ring with unit and overflow-checked arithmetic.
pub trait Ring:
    Clone + PartialEq + fmt::Debug + Zero + One + CheckedAdd + CheckedMul + Send + Sync + 'static
{
    fn plus(&self, other: &Self) -> Result<Self, RingError> {
        self.checked_add(other).ok_or(RingError::Overflow("sum"))
    }

    fn times(&self, other: &Self) -> Result<Self, RingError> {
        self.checked_mul(other).ok_or(RingError::Overflow("product"))
    }

    fn scaled(&self, k: i64) -> Result<Self, RingError>;

    /// Fix the unit ambiguity of a result. Rings without one return the value unchanged.
    fn normalize(&self) -> Result<Self, RingError> {
        Ok(self.clone())
    }
}

impl Ring for i64 {
    #[inline]
    fn scaled(&self, k: i64) -> Result<Self, RingError> {
        CheckedMul::checked_mul(self, &k).ok_or(RingError::Overflow("scaling"))
    }
}

/// Reduction-rule weights.
#[derive(Clone, Debug, PartialEq)]
pub struct RingContext<R> {
    /// Weight of the A-smoothing of a crossing.
    pub smoothing_weight_a: R,
    /// Weight of the B-smoothing of a crossing.
    pub smoothing_weight_b: R,
    /// Factor per removed loop (and per free circle).
    pub loop_factor: R,
    /// Factor per removed isolated vertex.
    pub isolated_factor: R,
}

impl<R: Ring> RingContext<R> {
    pub fn new(smoothing_weight_a: R, smoothing_weight_b: R, loop_factor: R, isolated_factor: R) -> Self {
        Self {
            smoothing_weight_a,
            smoothing_weight_b,
            loop_factor,
            isolated_factor,
        }
    }
}

impl RingContext<LaurentPoly> {
    /// Weights `A`, `A^-1`, `-(A + 1 + A^-1)` and `-1`.
    pub fn yamada() -> Self {
        let a = LaurentPoly::var();
        let a_inv = LaurentPoly::monomial(1, -1);
        let loop_factor = -(&(&a + &LaurentPoly::one()) + &a_inv);
        Self::new(a, a_inv, loop_factor, LaurentPoly::constant(-1))
    }
}

impl Default for RingContext<LaurentPoly> {
    fn default() -> Self {
        Self::yamada()
    }
}

#[cfg(test)]
mod tests;
