//! Quadratic factoring via the rational root theorem: for
//! `a x^2 + b x + c`, every candidate rational root `p/q` has `p | c` and
//! `q | a`; trying each exactly once and confirming with exact polynomial
//! division finds both roots whenever they are rational.

use super::sole_variable;
use crate::ast::Expr;
use crate::factor::{FactorOutcome, Strategy};
use crate::poly::Poly;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

pub struct QuadraticStrategy;

impl Strategy for QuadraticStrategy {
    fn name(&self) -> &'static str {
        "quadratic rational roots"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        sole_variable(expr).is_some()
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let variable = sole_variable(expr)?;
        let poly = Poly::from_expr(expr, &variable)?;
        if poly.degree() != 2 {
            return None;
        }
        let coeffs = poly.coeffs();
        let (c, b, a) = (coeffs[0].clone(), coeffs[1].clone(), coeffs[2].clone());

        let root = find_rational_root(&a, &b, &c)?;
        let linear = Poly::new(vec![-&root.0, root.1.clone()]); // q*x - p
        let quotient = poly.exact_div(&linear)?;

        Some(FactorOutcome {
            factors: vec![linear.to_expr(&variable), quotient.to_expr(&variable)],
            description: "found a rational root via the rational root theorem".to_string(),
        })
    }
}

/// Searches for a rational root `p/q` (returned as `(p, q)` in lowest terms
/// with `q > 0`) of `a x^2 + b x + c` among the divisors of `c` and `a`.
fn find_rational_root(a: &BigInt, b: &BigInt, c: &BigInt) -> Option<(BigInt, BigInt)> {
    if a.is_zero() {
        return None;
    }
    for p in divisors(c.abs()) {
        for q in divisors(a.abs()) {
            for sign in [BigInt::one(), -BigInt::one()] {
                let p_signed = &p * &sign;
                let g = p_signed.gcd(&q);
                let (p_reduced, q_reduced) = if g.is_zero() || g == BigInt::one() {
                    (p_signed.clone(), q.clone())
                } else {
                    (&p_signed / &g, &q / &g)
                };
                // a*p^2 + b*p*q + c*q^2 == 0  <=>  p/q is a root
                let value = a * &p_reduced * &p_reduced + b * &p_reduced * &q_reduced + c * &q_reduced * &q_reduced;
                if value.is_zero() {
                    return Some((p_reduced, q_reduced));
                }
            }
        }
    }
    None
}

fn divisors(n: BigInt) -> Vec<BigInt> {
    if n.is_zero() {
        return vec![BigInt::one()];
    }
    let mut out = Vec::new();
    let mut d = BigInt::one();
    while &d * &d <= n {
        if (&n % &d).is_zero() {
            out.push(d.clone());
            let pair = &n / &d;
            if pair != d {
                out.push(pair);
            }
        }
        d += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_x_squared_minus_5x_plus_6() {
        let x = Expr::symbol("x");
        let expr = Expr::add(
            Expr::sub(Expr::pow(x.clone(), Expr::integer(2)), Expr::mul(Expr::integer(5), x)),
            Expr::integer(6),
        );
        let outcome = QuadraticStrategy.apply(&expr).expect("x^2 - 5x + 6 has rational roots 2 and 3");
        assert_eq!(outcome.factors.len(), 2);
    }

    #[test]
    fn rejects_an_irreducible_quadratic() {
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::pow(x, Expr::integer(2)), Expr::integer(1));
        assert!(QuadraticStrategy.apply(&expr).is_none());
    }
}
