//! Exact rational numbers.
//!
//! Every numeric literal in the AST is a [`Number`]: a signed big-integer
//! numerator over a strictly positive, coprime big-integer denominator.
//! There is no floating point anywhere in the core engine (spec.md §5:
//! "internal arithmetic is exact"); `precision` in [`crate::analyze`] is a
//! display-only hint.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An exact rational number, always kept in canonical (reduced, positive
/// denominator) form by [`BigRational`] itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Number(BigRational);

impl Number {
    /// Build a rational from a numerator and denominator. Panics only if
    /// `denominator` is zero, which the parser and simplifier never pass.
    pub fn new(numerator: BigInt, denominator: BigInt) -> Self {
        assert!(!denominator.is_zero(), "Number::new called with zero denominator");
        Self(BigRational::new(numerator, denominator))
    }

    pub fn from_ratio(value: BigRational) -> Self {
        Self(value)
    }

    pub fn integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Self(BigRational::from_integer(value))
    }

    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// The integer value, if this number is an integer and fits in `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        num_traits::cast::ToPrimitive::to_i64(self.0.numer())
    }

    /// The integer value as a `u32`, used for exponent bounds.
    pub fn to_u32(&self) -> Option<u32> {
        if !self.is_integer() || self.is_negative() {
            return None;
        }
        num_traits::cast::ToPrimitive::to_u32(self.0.numer())
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        self.is_integer().then(|| self.0.numer())
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn neg(&self) -> Self {
        Self(-self.0.clone())
    }

    /// Integer power. `spec.md` §4.4 only folds `x^n` for non-negative
    /// integer `n`; negative or fractional exponents are left to the
    /// exponential normalizer.
    pub fn pow_int(&self, exponent: u32) -> Self {
        Self(Pow::pow(self.0.clone(), exponent))
    }

    pub fn checked_add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn checked_sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    pub fn checked_mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    /// Division; returns `None` for division by zero (spec.md §3: a
    /// `Fraction`'s denominator is never the `Number` 0).
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            None
        } else {
            Some(Self(&self.0 / &other.0))
        }
    }

    /// Greatest common divisor of two integers; used by the common-factor
    /// and grouping factorization strategies. Returns `None` if either
    /// operand is not an integer.
    pub fn gcd(&self, other: &Self) -> Option<Self> {
        let a = self.as_bigint()?;
        let b = other.as_bigint()?;
        Some(Self::from_bigint(a.gcd(b)))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Add for &Number {
    type Output = Number;
    fn add(self, rhs: Self) -> Number {
        self.checked_add(rhs)
    }
}

impl Sub for &Number {
    type Output = Number;
    fn sub(self, rhs: Self) -> Number {
        self.checked_sub(rhs)
    }
}

impl Mul for &Number {
    type Output = Number;
    fn mul(self, rhs: Self) -> Number {
        self.checked_mul(rhs)
    }
}

impl Div for &Number {
    type Output = Option<Number>;
    fn div(self, rhs: Self) -> Option<Number> {
        self.checked_div(rhs)
    }
}

impl Neg for &Number {
    type Output = Number;
    fn neg(self) -> Number {
        Number::neg(self)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_on_construction() {
        let n = Number::new(BigInt::from(4), BigInt::from(6));
        assert_eq!(n.numer(), &BigInt::from(2));
        assert_eq!(n.denom(), &BigInt::from(3));
    }

    #[test]
    fn integer_arithmetic_is_exact() {
        let a = Number::integer(3);
        let b = Number::integer(4);
        assert_eq!((&a + &b).to_i64(), Some(7));
        assert_eq!((&a * &b).to_i64(), Some(12));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let a = Number::integer(1);
        let zero = Number::zero();
        assert!((&a / &zero).is_none());
    }

    #[test]
    fn gcd_of_integers() {
        let a = Number::integer(12);
        let b = Number::integer(18);
        assert_eq!(a.gcd(&b).unwrap().to_i64(), Some(6));
    }
}
