//! Dense univariate integer polynomials (spec.md §3 "Auxiliary model for
//! factorization") and the bridge between them and the general [`Expr`]
//! tree. The factorization engine works on [`Poly`] internally and
//! converts back to `Expr` only at its boundary.

pub mod finite_field;
pub mod hensel;
pub mod lll;

use crate::ast::{BinaryOp, Expr};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Coefficients ordered constant-term first, as spec.md §3 specifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<BigInt>,
}

impl Poly {
    pub fn new(mut coeffs: Vec<BigInt>) -> Self {
        while coeffs.len() > 1 && coeffs.last().map(Zero::is_zero).unwrap_or(false) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(BigInt::zero());
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self { coeffs: vec![BigInt::zero()] }
    }

    pub fn constant(value: BigInt) -> Self {
        Self::new(vec![value])
    }

    pub fn coeffs(&self) -> &[BigInt] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    pub fn leading(&self) -> &BigInt {
        self.coeffs.last().unwrap()
    }

    pub fn constant_term(&self) -> &BigInt {
        &self.coeffs[0]
    }

    /// gcd of every coefficient (the polynomial's "content"); factoring it
    /// out leaves a primitive polynomial.
    pub fn content(&self) -> BigInt {
        self.coeffs.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c))
    }

    pub fn scale(&self, factor: &BigInt) -> Poly {
        Poly::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    pub fn divide_exact(&self, divisor: &BigInt) -> Poly {
        Poly::new(self.coeffs.iter().map(|c| c / divisor).collect())
    }

    pub fn negate(&self) -> Poly {
        Poly::new(self.coeffs.iter().map(|c| -c).collect())
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut out = vec![BigInt::zero(); len];
        for (i, c) in self.coeffs.iter().enumerate() {
            out[i] += c;
        }
        for (i, c) in other.coeffs.iter().enumerate() {
            out[i] += c;
        }
        Poly::new(out)
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.negate())
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![BigInt::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Poly::new(out)
    }

    pub fn mul_many(factors: &[Poly]) -> Poly {
        factors.iter().fold(Poly::constant(BigInt::one()), |acc, f| acc.mul(f))
    }

    /// Evaluate at an integer point via Horner's method.
    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        for c in self.coeffs.iter().rev() {
            result = result * x + c;
        }
        result
    }

    /// Divides `self` by `divisor` exactly, returning `None` if the
    /// division has a non-zero remainder.
    pub fn exact_div(&self, divisor: &Poly) -> Option<Poly> {
        if divisor.is_zero() {
            return None;
        }
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![BigInt::zero(); remainder.len().saturating_sub(divisor.degree())];
        let d_deg = divisor.degree();
        let d_lead = divisor.leading();
        for i in (0..quotient.len()).rev() {
            let r_deg = i + d_deg;
            if r_deg >= remainder.len() {
                continue;
            }
            let (q, rem) = remainder[r_deg].div_rem(d_lead);
            if !rem.is_zero() {
                return None;
            }
            if q.is_zero() {
                continue;
            }
            quotient[i] = q.clone();
            for (k, c) in divisor.coeffs.iter().enumerate() {
                remainder[i + k] -= &q * c;
            }
        }
        if remainder.iter().any(|c| !c.is_zero()) {
            return None;
        }
        Some(Poly::new(quotient))
    }

    pub fn variable_substitution(&self, k: u32) -> Poly {
        // t = x^k: keep only coefficients at multiples of k, reindexed by i/k.
        let mut out = Vec::new();
        let mut i = 0;
        while i < self.coeffs.len() {
            out.push(self.coeffs[i].clone());
            i += k as usize;
        }
        Poly::new(out)
    }

    /// Inverse of [`Poly::variable_substitution`]: spread coefficients back
    /// out to multiples of `k`, filling the gaps with zero.
    pub fn expand_substitution(&self, k: u32) -> Poly {
        let mut out = vec![BigInt::zero(); self.degree() * k as usize + 1];
        for (i, c) in self.coeffs.iter().enumerate() {
            out[i * k as usize] = c.clone();
        }
        Poly::new(out)
    }

    /// Builds a [`Poly`] from an expanded (distributed) AST in a single
    /// variable, or `None` if `expr` is not a polynomial in `variable`
    /// (division by the variable, the variable under a function call,
    /// non-integer coefficients, …).
    pub fn from_expr(expr: &Expr, variable: &str) -> Option<Poly> {
        let mut leaves = Vec::new();
        collect_signed_terms(expr, 1, &mut leaves);
        let mut coeffs: Vec<BigInt> = vec![BigInt::zero()];
        for (term, sign) in leaves {
            let (degree, mut coefficient) = term_degree_and_coefficient(term, variable)?;
            if sign < 0 {
                coefficient = -coefficient;
            }
            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, BigInt::zero());
            }
            coeffs[degree] += coefficient;
        }
        Some(Poly::new(coeffs))
    }

    /// Renders this polynomial back as an `Expr` in `variable`, constant
    /// term first folded into a descending-degree sum (the conventional
    /// display order).
    pub fn to_expr(&self, variable: &str) -> Expr {
        let mut terms = Vec::new();
        for (degree, coeff) in self.coeffs.iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            terms.push((degree, monomial(degree, coeff, variable)));
        }
        if terms.is_empty() {
            return Expr::integer(0);
        }
        terms.sort_by(|a, b| b.0.cmp(&a.0));
        Expr::fold(BinaryOp::Add, terms.into_iter().map(|(_, e)| e).collect())
    }
}

fn monomial(degree: usize, coeff: &BigInt, variable: &str) -> Expr {
    let number = Expr::Number(crate::number::Number::from_bigint(coeff.clone()));
    if degree == 0 {
        return number;
    }
    let var_power = if degree == 1 { Expr::symbol(variable) } else { Expr::pow(Expr::symbol(variable), Expr::integer(degree as i64)) };
    if coeff.is_one() {
        var_power
    } else if *coeff == -BigInt::one() {
        Expr::neg(var_power)
    } else {
        Expr::mul(number, var_power)
    }
}

/// Splits an additive/subtractive/negated tree into signed leaves, mirroring
/// the commutative combiner's own term collection.
fn collect_signed_terms<'a>(expr: &'a Expr, sign: i8, out: &mut Vec<(&'a Expr, i8)>) {
    match expr {
        Expr::Binary { op: BinaryOp::Add, left, right } => {
            collect_signed_terms(left, sign, out);
            collect_signed_terms(right, sign, out);
        }
        Expr::Binary { op: BinaryOp::Sub, left, right } => {
            collect_signed_terms(left, sign, out);
            collect_signed_terms(right, -sign, out);
        }
        Expr::Unary { op: crate::ast::UnaryOp::Neg, operand } => collect_signed_terms(operand, -sign, out),
        other => out.push((other, sign)),
    }
}

/// Decomposes one additive term into `(degree in `variable`, integer
/// coefficient)`, or `None` if the term is not a monomial in `variable`
/// with an integer coefficient.
fn term_degree_and_coefficient(term: &Expr, variable: &str) -> Option<(usize, BigInt)> {
    match term {
        Expr::Number(n) => Some((0, n.as_bigint()?.clone())),
        Expr::Identifier(id) if id.name == variable => Some((1, BigInt::one())),
        Expr::Unary { op: crate::ast::UnaryOp::Neg, operand } => {
            let (d, c) = term_degree_and_coefficient(operand, variable)?;
            Some((d, -c))
        }
        Expr::Binary { op: BinaryOp::Pow, left, right } => {
            let Expr::Identifier(id) = left.as_ref() else { return None };
            if id.name != variable {
                return None;
            }
            let Expr::Number(exp) = right.as_ref() else { return None };
            let degree = exp.to_u32()? as usize;
            Some((degree, BigInt::one()))
        }
        Expr::Binary { op: BinaryOp::Mul, .. } => {
            let factors = term.flatten(BinaryOp::Mul);
            let mut degree = 0usize;
            let mut coefficient = BigInt::one();
            for factor in factors {
                let (d, c) = term_degree_and_coefficient(factor, variable)?;
                degree += d;
                coefficient *= c;
            }
            Some((degree, coefficient))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_expr() {
        let poly = Poly::new(vec![2.into(), 3.into(), 1.into()]); // x^2 + 3x + 2
        let expr = poly.to_expr("x");
        let back = Poly::from_expr(&expr, "x").unwrap();
        assert_eq!(poly, back);
    }

    #[test]
    fn multiplies_binomials() {
        let a = Poly::new(vec![1.into(), 1.into()]); // x + 1
        let b = Poly::new(vec![2.into(), 1.into()]); // x + 2
        let product = a.mul(&b);
        assert_eq!(product.coeffs(), &[BigInt::from(2), BigInt::from(3), BigInt::from(1)]);
    }

    #[test]
    fn exact_division_detects_non_divisors() {
        let p = Poly::new(vec![2.into(), 3.into(), 1.into()]); // x^2+3x+2
        let d = Poly::new(vec![1.into(), 1.into()]); // x+1
        let q = p.exact_div(&d).unwrap();
        assert_eq!(q.coeffs(), &[BigInt::from(2), BigInt::from(1)]); // x+2
        let bad = Poly::new(vec![5.into(), 1.into()]);
        assert!(p.exact_div(&bad).is_none());
    }

    #[test]
    fn content_is_gcd_of_coefficients() {
        let p = Poly::new(vec![9.into(), 6.into()]); // 6x + 9
        assert_eq!(p.content(), BigInt::from(3));
    }
}
