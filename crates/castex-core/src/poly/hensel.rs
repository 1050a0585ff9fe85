//! Hensel lifting (spec.md §4.9 Phase 2): given a two-factor
//! factorization modulo a prime `p`, lift the pair to a factorization
//! modulo `p^k` for `k` large enough that the true integer coefficients
//! can be recovered by centered reduction.
//!
//! This is the textbook linear (one-prime-power-at-a-time) lift, not the
//! faster quadratic variant that doubles precision each step — simpler to
//! get right, and the factorization engine always re-verifies every
//! candidate against the original polynomial with exact integer division
//! ([`crate::poly::Poly::exact_div`]) before accepting it, so an
//! under-lifted or wrong candidate is merely rejected, never wrongly
//! reported as a factor.

use crate::poly::finite_field::PolyZp;
use crate::poly::Poly;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

fn center(value: &BigInt, modulus: &BigInt) -> BigInt {
    let mut v = value % modulus;
    if v.is_negative() {
        v += modulus;
    }
    let half = modulus / 2;
    if v > half {
        v - modulus
    } else {
        v
    }
}

fn exact_div(value: &BigInt, divisor: &BigInt) -> Option<BigInt> {
    if (value % divisor).is_zero() {
        Some(value / divisor)
    } else {
        None
    }
}

fn poly_zp_to_poly(p: &PolyZp) -> Poly {
    let coeffs: Vec<BigInt> = p.coefficients().iter().map(|&c| BigInt::from(c)).collect();
    if coeffs.is_empty() {
        Poly::zero()
    } else {
        Poly::new(coeffs)
    }
}

fn poly_to_zp(poly: &Poly, modulus: u64) -> PolyZp {
    let m = BigInt::from(modulus);
    let coeffs: Vec<u64> = poly
        .coeffs()
        .iter()
        .map(|c| {
            let mut v = c % &m;
            if v.is_negative() {
                v += &m;
            }
            num_traits::cast::ToPrimitive::to_u64(&v).unwrap_or(0)
        })
        .collect();
    PolyZp::from_coeffs(coeffs, modulus)
}

fn reduce_centered(poly: &Poly, modulus: &BigInt) -> Poly {
    Poly::new(poly.coeffs().iter().map(|c| center(c, modulus)).collect())
}

/// Finds `u, v` over `Z_p[x]` with `u*g + v*h ≡ 1 (mod p)`, the Bezout
/// identity the lift step below reuses unchanged at every iteration.
fn bezout_coefficients(g: &PolyZp, h: &PolyZp) -> Option<(PolyZp, PolyZp)> {
    let (gcd, u, v) = g.extended_gcd(h).ok()?;
    if !gcd.is_constant() || gcd.is_zero() {
        return None;
    }
    let inv = gcd.leading_coeff()?.inverse().ok()?;
    Some((u.scale(inv), v.scale(inv)))
}

/// Lifts `f ≡ g0*h0 (mod p)` to a factorization modulo the first power of
/// `p` at or above `target_modulus`. Returns `None` if the pair is not
/// coprime mod `p` (Hensel's lemma doesn't apply) or if the lift otherwise
/// fails to stay consistent.
pub fn lift_factor_pair(f: &Poly, g0: &PolyZp, h0: &PolyZp, p: u64, target_modulus: &BigInt) -> Option<(Poly, Poly)> {
    let (u, v) = bezout_coefficients(g0, h0)?;
    let _ = &v; // v is the symmetric coefficient; only u is needed by this lift direction.
    let prime = BigInt::from(p);
    let mut modulus = prime.clone();
    let mut g = poly_zp_to_poly(g0);
    let mut h = poly_zp_to_poly(h0);

    while modulus < *target_modulus {
        let diff = f.sub(&g.mul(&h));
        let c_coeffs: Vec<BigInt> = diff.coeffs().iter().map(|e| exact_div(e, &modulus)).collect::<Option<_>>()?;
        let c_zp = poly_to_zp(&Poly::new(c_coeffs), p);

        let u_c = u.mul(&c_zp);
        let (_, h1) = u_c.div_rem(h0).ok()?;
        let rhs = c_zp.sub(&h0.mul(&h1));
        let (g1, remainder) = rhs.div_rem(g0).ok()?;
        if !remainder.is_zero() {
            return None;
        }

        g = g.add(&poly_zp_to_poly(&g1).scale(&modulus));
        h = h.add(&poly_zp_to_poly(&h1).scale(&modulus));
        modulus *= &prime;
        g = reduce_centered(&g, &modulus);
        h = reduce_centered(&h, &modulus);
    }
    Some((g, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::finite_field::PolyZp;

    #[test]
    fn lifts_a_coprime_pair_to_the_true_integer_factors() {
        // f = x^2 - 1 = (x-1)(x+1); mod p=5 this pair is already exact,
        // and the lift should reproduce it once the modulus exceeds the
        // coefficients' magnitude.
        let f = Poly::new(vec![BigInt::from(-1), BigInt::from(0), BigInt::from(1)]);
        let g0 = PolyZp::from_signed_coeffs(&[-1, 1], 5);
        let h0 = PolyZp::from_signed_coeffs(&[1, 1], 5);
        let (g, h) = lift_factor_pair(&f, &g0, &h0, 5, &BigInt::from(25)).unwrap();
        assert_eq!(g.mul(&h), f);
    }
}
