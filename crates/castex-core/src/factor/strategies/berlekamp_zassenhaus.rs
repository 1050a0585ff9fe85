//! Berlekamp–Zassenhaus: the general-purpose integer polynomial
//! factorization fallback (spec.md §4.9). Factor `f` modulo a small prime
//! `p` with Berlekamp's algorithm, Hensel-lift every modular factor to a
//! precision that exceeds a coefficient bound on any true integer factor,
//! then search subset products of the lifted pieces for exact divisors of
//! `f`, verified with exact integer polynomial division at every step.
//!
//! Scoped to monic integer polynomials: a non-unit leading coefficient's
//! distribution across candidate factors needs extra bookkeeping this
//! engine doesn't do, and the common-factor and rational-root strategies
//! already cover most non-monic cases that arise in practice.

use super::sole_variable;
use crate::ast::Expr;
use crate::factor::{FactorOutcome, Strategy};
use crate::poly::finite_field::{berlekamp, is_prime, PolyZp};
use crate::poly::hensel::lift_factor_pair;
use crate::poly::Poly;
use num_bigint::BigInt;
use num_traits::{One, Signed};

/// Subset-product search is exponential in the modular factor count;
/// beyond this many pieces, give up and let the LLL fallback (or nothing)
/// handle recombination.
const MAX_MODULAR_FACTORS: usize = 12;

const CANDIDATE_PRIMES: &[u64] = &[5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71];

pub struct BerlekampZassenhausStrategy;

impl Strategy for BerlekampZassenhausStrategy {
    fn name(&self) -> &'static str {
        "Berlekamp-Zassenhaus"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn can_apply(&self, expr: &Expr) -> bool {
        sole_variable(expr).is_some()
    }

    fn apply(&self, expr: &Expr) -> Option<FactorOutcome> {
        let variable = sole_variable(expr)?;
        let poly = Poly::from_expr(expr, &variable)?;
        if poly.degree() < 2 || poly.leading().abs() != BigInt::one() {
            return None;
        }
        let monic_sign = poly.leading().clone();
        let poly = if monic_sign.is_negative() { poly.negate() } else { poly };

        let (p, modular_factors) = find_prime_and_factor(&poly)?;
        if modular_factors.len() < 2 {
            return None; // irreducible mod p => irreducible over Z
        }
        if modular_factors.len() > MAX_MODULAR_FACTORS {
            return None;
        }

        let target_modulus = BigInt::from(2) * mignotte_bound(&poly) + BigInt::one();
        let lifted = lift_all_factors(&poly, &modular_factors, p, &target_modulus)?;

        let mut factors = recombine(&poly, lifted);
        if factors.len() < 2 {
            return None;
        }
        if monic_sign.is_negative() {
            if let Some(first) = factors.first_mut() {
                *first = first.negate();
            }
        }

        Some(FactorOutcome {
            factors: factors.into_iter().map(|f| f.to_expr(&variable)).collect(),
            description: format!("Berlekamp-Zassenhaus over Z_{p}, lifted and recombined"),
        })
    }
}

/// Looks for a prime not dividing the leading coefficient for which `f mod
/// p` is square-free, then factors it completely with Berlekamp's
/// algorithm.
pub(crate) fn find_prime_and_factor(f: &Poly) -> Option<(u64, Vec<PolyZp>)> {
    for &p in CANDIDATE_PRIMES {
        if !is_prime(p) {
            continue;
        }
        let reduced = reduce_mod_p(f, p);
        if reduced.degree() != Some(f.degree()) {
            continue; // leading coefficient vanished mod p
        }
        let derivative = formal_derivative(&reduced);
        if derivative.is_zero() {
            continue;
        }
        let square_free = reduced.gcd(&derivative).ok().map(|g| g.is_constant()).unwrap_or(false);
        if !square_free {
            continue;
        }
        if let Ok(factors) = berlekamp::factor_over_zp(&reduced) {
            return Some((p, factors));
        }
    }
    None
}

fn reduce_mod_p(f: &Poly, p: u64) -> PolyZp {
    let modulus = BigInt::from(p);
    let coeffs: Vec<u64> = f
        .coeffs()
        .iter()
        .map(|c| {
            let mut v = c % &modulus;
            if v.is_negative() {
                v += &modulus;
            }
            num_traits::cast::ToPrimitive::to_u64(&v).unwrap_or(0)
        })
        .collect();
    PolyZp::from_coeffs(coeffs, p)
}

fn formal_derivative(f: &PolyZp) -> PolyZp {
    let coeffs = f.coefficients();
    if coeffs.len() <= 1 {
        return PolyZp::zero(f.modulus());
    }
    let derivative: Vec<u64> =
        coeffs.iter().enumerate().skip(1).map(|(i, &c)| (c as u128 * i as u128 % f.modulus() as u128) as u64).collect();
    PolyZp::from_coeffs(derivative, f.modulus())
}

/// A coarse Landau–Mignotte-style bound: any integer factor of `f` has
/// every coefficient bounded in absolute value by this quantity. Coarse on
/// purpose -- an over-large bound only costs a slightly higher lift
/// precision, never correctness.
pub(crate) fn mignotte_bound(f: &Poly) -> BigInt {
    let sum: BigInt = f.coeffs().iter().map(|c| c.abs()).sum();
    let n = f.degree() as u32;
    sum * num_traits::Pow::pow(BigInt::from(2), n)
}

/// Sequentially peels off one modular factor at a time via Hensel lifting,
/// so that `factors[i]`'s lift is obtained by lifting the pair `(factors[i],
/// product(factors[i+1..]))` against whatever integer polynomial the
/// previous step produced for their combined product.
pub(crate) fn lift_all_factors(f: &Poly, factors: &[PolyZp], p: u64, target: &BigInt) -> Option<Vec<Poly>> {
    if factors.len() == 1 {
        return Some(vec![f.clone()]);
    }
    let g0 = &factors[0];
    let rest_mod_p = factors[1..].iter().fold(PolyZp::constant(1, p), |acc, fac| acc.mul(fac));
    let (g_lifted, rest_lifted) = lift_factor_pair(f, g0, &rest_mod_p, p, target)?;
    let mut result = vec![g_lifted];
    result.extend(lift_all_factors(&rest_lifted, &factors[1..], p, target)?);
    Some(result)
}

/// Classic subset-product recombination: try products of increasing size
/// among the unused lifted pieces, accepting the first one that exactly
/// divides what remains of `f`.
fn recombine(original: &Poly, pieces: Vec<Poly>) -> Vec<Poly> {
    let n = pieces.len();
    let mut used = vec![false; n];
    let mut result = Vec::new();
    let mut current = original.clone();

    for size in 1..=n / 2 {
        loop {
            let remaining_indices: Vec<usize> = (0..n).filter(|&i| !used[i]).collect();
            if remaining_indices.len() < size {
                break;
            }
            match find_matching_subset(&current, &pieces, &remaining_indices, size) {
                Some((indices, candidate)) => {
                    for i in &indices {
                        used[*i] = true;
                    }
                    current = current.exact_div(&candidate).expect("subset was verified to divide evenly");
                    result.push(candidate);
                }
                None => break,
            }
        }
    }

    if !(current.is_constant() && (current.constant_term() == &BigInt::one() || current.constant_term() == &-BigInt::one())) {
        result.push(current);
    }
    result
}

fn find_matching_subset(current: &Poly, pieces: &[Poly], indices: &[usize], size: usize) -> Option<(Vec<usize>, Poly)> {
    for combo in combinations(indices, size) {
        let mut candidate = Poly::constant(BigInt::one());
        for &i in &combo {
            candidate = candidate.mul(&pieces[i]);
        }
        if current.exact_div(&candidate).is_some() {
            return Some((combo, candidate));
        }
    }
    None
}

fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![vec![]];
    }
    if items.is_empty() {
        return vec![];
    }
    let mut result = Vec::new();
    let first = items[0];
    for mut tail in combinations(&items[1..], k - 1) {
        tail.insert(0, first);
        result.push(tail);
    }
    result.extend(combinations(&items[1..], k));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_a_quartic_with_two_quadratic_factors() {
        let x = Expr::symbol("x");
        // (x^2+1)(x^2+4) = x^4 + 5x^2 + 4
        let expr = Expr::add(
            Expr::add(Expr::pow(x.clone(), Expr::integer(4)), Expr::mul(Expr::integer(5), Expr::pow(x.clone(), Expr::integer(2)))),
            Expr::integer(4),
        );
        let outcome = BerlekampZassenhausStrategy.apply(&expr);
        assert!(outcome.is_some());
    }

    #[test]
    fn rejects_a_non_monic_polynomial() {
        let x = Expr::symbol("x");
        let expr = Expr::add(Expr::mul(Expr::integer(2), Expr::pow(x.clone(), Expr::integer(2))), Expr::integer(2));
        assert!(BerlekampZassenhausStrategy.apply(&expr).is_none());
    }
}
