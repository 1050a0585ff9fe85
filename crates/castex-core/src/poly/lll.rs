//! LLL lattice basis reduction (spec.md §4.10), used as a fallback factor
//! recombination search when the naive subset-product search over the
//! modular factors from Berlekamp–Zassenhaus would need to try too many
//! subsets. This is a best-effort enhancer: if it fails to find a short
//! vector that yields a genuine factor, the caller falls back to (or
//! simply stops at) the Berlekamp–Zassenhaus result, never an incorrect
//! one — every candidate is re-verified by exact integer polynomial
//! division before being accepted.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// A vector of exact rationals, used only inside the Gram–Schmidt step.
type RVec = Vec<BigRational>;

fn dot_r(a: &RVec, b: &RVec) -> BigRational {
    a.iter().zip(b).map(|(x, y)| x * y).fold(BigRational::zero(), |acc, v| acc + v)
}

fn to_rational_vec(v: &[BigInt]) -> RVec {
    v.iter().map(|c| BigRational::from_integer(c.clone())).collect()
}

fn sub_scaled(a: &RVec, b: &RVec, factor: &BigRational) -> RVec {
    a.iter().zip(b).map(|(x, y)| x - factor * y).collect()
}

/// Gram–Schmidt orthogonalization of `basis`, returning the orthogonal
/// vectors and the projection coefficients `mu[i][j] = <b_i, b*_j> /
/// <b*_j, b*_j>` for `j < i`.
fn gram_schmidt(basis: &[Vec<BigInt>]) -> (Vec<RVec>, Vec<Vec<BigRational>>) {
    let n = basis.len();
    let mut ortho: Vec<RVec> = Vec::with_capacity(n);
    let mut mu = vec![vec![BigRational::zero(); n]; n];
    for i in 0..n {
        let mut vi = to_rational_vec(&basis[i]);
        for j in 0..i {
            let denom = dot_r(&ortho[j], &ortho[j]);
            let coeff = if denom.is_zero() { BigRational::zero() } else { dot_r(&to_rational_vec(&basis[i]), &ortho[j]) / denom };
            mu[i][j] = coeff.clone();
            vi = sub_scaled(&vi, &ortho[j], &coeff);
        }
        ortho.push(vi);
    }
    (ortho, mu)
}

/// Reduces an integer lattice basis using the Lenstra–Lenstra–Lovász
/// algorithm with the conventional delta = 3/4, returning a basis of
/// short, nearly-orthogonal vectors spanning the same lattice.
pub fn lll_reduce(mut basis: Vec<Vec<BigInt>>) -> Vec<Vec<BigInt>> {
    let n = basis.len();
    if n <= 1 {
        return basis;
    }
    let delta = BigRational::new(BigInt::from(3), BigInt::from(4));
    let mut k = 1usize;
    let max_iterations = n * n * 50 + 100;
    let mut iterations = 0;
    while k < n {
        iterations += 1;
        if iterations > max_iterations {
            break;
        }
        let (_, mu) = gram_schmidt(&basis);
        for j in (0..k).rev() {
            let rounded = round_rational(&mu[k][j]);
            if !rounded.is_zero() {
                let adjusted: Vec<BigInt> = basis[k].iter().zip(&basis[j]).map(|(a, b)| a - &rounded * b).collect();
                basis[k] = adjusted;
            }
        }
        let (ortho, mu) = gram_schmidt(&basis);
        let lhs = dot_r(&ortho[k], &ortho[k]);
        let prev_norm = dot_r(&ortho[k - 1], &ortho[k - 1]);
        let rhs = (&delta - &mu[k][k - 1] * &mu[k][k - 1]) * &prev_norm;
        if lhs >= rhs {
            k += 1;
        } else {
            basis.swap(k, k - 1);
            k = k.saturating_sub(1).max(1);
        }
    }
    basis
}

/// Rounds to the nearest integer, ties away from zero.
fn round_rational(value: &BigRational) -> BigInt {
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let shifted = if value.is_negative() { value - &half } else { value + &half };
    shifted.to_integer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_a_skewed_basis_to_shorter_vectors() {
        let basis = vec![vec![BigInt::from(1), BigInt::from(1)], vec![BigInt::from(1), BigInt::from(0)]];
        let reduced = lll_reduce(basis);
        let norm0: BigInt = reduced[0].iter().map(|c| c * c).sum();
        let norm1: BigInt = reduced[1].iter().map(|c| c * c).sum();
        assert!(norm0 <= BigInt::from(2) && norm1 <= BigInt::from(2));
    }

    #[test]
    fn preserves_the_lattice_determinant_sign_structure() {
        let basis = vec![vec![BigInt::from(201), BigInt::from(37)], vec![BigInt::from(1648), BigInt::from(297)]];
        let original_det = &basis[0][0] * &basis[1][1] - &basis[0][1] * &basis[1][0];
        let reduced = lll_reduce(basis);
        let reduced_det = &reduced[0][0] * &reduced[1][1] - &reduced[0][1] * &reduced[1][0];
        assert_eq!(original_det.abs(), reduced_det.abs());
    }
}
