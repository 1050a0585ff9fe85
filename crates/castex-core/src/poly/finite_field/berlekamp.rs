//! Berlekamp's algorithm: complete factorization of a square-free monic
//! polynomial over `Z_p[x]` (spec.md §4.9 Phase 1, step 2). The Frobenius
//! endomorphism `a(x) -> a(x)^p mod f(x)` partitions `Z_p[x]/(f)` into one
//! subspace per irreducible factor; its matrix's null space yields the
//! splitting polynomials.

use super::element::Zp;
use super::poly::PolyZp;
use super::{FiniteFieldError, FiniteFieldResult};

fn frobenius_mod(f: &PolyZp, p: u64) -> FiniteFieldResult<PolyZp> {
    if f.is_zero() {
        return Err(FiniteFieldError::DivisionByZero);
    }
    let mut result = PolyZp::constant(1, f.modulus());
    let mut base = PolyZp::x(f.modulus());
    let mut exp = p;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.mul(&base);
            let (_, rem) = result.div_rem(f)?;
            result = rem;
        }
        if exp > 1 {
            base = base.mul(&base);
            let (_, rem) = base.div_rem(f)?;
            base = rem;
        }
        exp >>= 1;
    }
    Ok(result)
}

/// `Q[i][j]` = coefficient of `x^i` in `(x^p)^j mod f(x)`.
fn berlekamp_matrix(f: &PolyZp) -> FiniteFieldResult<Vec<Vec<u64>>> {
    let n = f.degree().ok_or(FiniteFieldError::EmptyPolynomial)?;
    if n == 0 {
        return Ok(vec![vec![1]]);
    }
    let p = f.modulus();
    let mut q = vec![vec![0u64; n]; n];
    let x_p = frobenius_mod(f, p)?;
    let mut current = PolyZp::constant(1, p);
    for j in 0..n {
        for i in 0..n {
            q[i][j] = current.coeff(i).value();
        }
        if j < n - 1 {
            current = current.mul(&x_p);
            let (_, rem) = current.div_rem(f)?;
            current = rem;
        }
    }
    Ok(q)
}

/// Null space of `Q - I` over Z_p via Gaussian elimination, as a list of
/// basis vectors.
fn null_space(q: &[Vec<u64>], p: u64) -> FiniteFieldResult<Vec<Vec<u64>>> {
    let n = q.len();
    if n == 0 {
        return Ok(vec![]);
    }
    let mut matrix = q.to_vec();
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = if row[i] == 0 { p - 1 } else { (row[i] + p - 1) % p };
    }
    let mut pivot_col = vec![None; n];
    let mut row = 0;
    for col in 0..n {
        let Some(pivot_row) = (row..n).find(|&r| matrix[r][col] % p != 0) else { continue };
        if pivot_row != row {
            matrix.swap(row, pivot_row);
        }
        pivot_col[row] = Some(col);
        let pivot = Zp::new(matrix[row][col], p);
        let pivot_inv = pivot.inverse()?;
        for j in 0..n {
            matrix[row][j] = (Zp::new(matrix[row][j], p) * pivot_inv).value();
        }
        for r in 0..n {
            if r == row {
                continue;
            }
            let factor = Zp::new(matrix[r][col], p);
            if factor.is_zero() {
                continue;
            }
            for j in 0..n {
                let row_val = Zp::new(matrix[row][j], p);
                let current = Zp::new(matrix[r][j], p);
                matrix[r][j] = (current - factor * row_val).value();
            }
        }
        row += 1;
    }
    let free_vars: Vec<usize> = (0..n).filter(|col| !pivot_col.contains(&Some(*col))).collect();
    let mut basis = Vec::new();
    for &free_var in &free_vars {
        let mut vec = vec![0u64; n];
        vec[free_var] = 1;
        for (r, pivot) in pivot_col.iter().enumerate() {
            if let Some(pivot_c) = pivot {
                vec[*pivot_c] = if matrix[r][free_var] == 0 { 0 } else { p - matrix[r][free_var] };
            }
        }
        basis.push(vec);
    }
    Ok(basis)
}

/// Factors a square-free monic polynomial over `Z_p[x]` into monic
/// irreducible factors.
pub fn berlekamp_factor(f: &PolyZp) -> FiniteFieldResult<Vec<PolyZp>> {
    let n = f.degree().ok_or(FiniteFieldError::EmptyPolynomial)?;
    if n <= 1 {
        return Ok(vec![f.make_monic()?]);
    }
    let p = f.modulus();
    let f_monic = f.make_monic()?;
    let q_matrix = berlekamp_matrix(&f_monic)?;
    let null_basis = null_space(&q_matrix, p)?;
    if null_basis.is_empty() {
        return Ok(vec![f_monic]);
    }
    let mut factors = vec![f_monic];
    for basis_vec in null_basis {
        let v = PolyZp::from_coeffs(basis_vec, p);
        let mut new_factors = Vec::new();
        for factor in factors {
            if factor.degree() == Some(1) {
                new_factors.push(factor);
                continue;
            }
            let mut found_split = false;
            for c in 0..p {
                let v_minus_c = v.sub(&PolyZp::constant(c, p));
                let g = factor.gcd(&v_minus_c)?;
                if !g.is_constant() && g.degree() != factor.degree() {
                    let (q, r) = factor.div_rem(&g)?;
                    if !r.is_zero() {
                        continue;
                    }
                    new_factors.push(g);
                    new_factors.push(q);
                    found_split = true;
                    break;
                }
            }
            if !found_split {
                new_factors.push(factor);
            }
        }
        factors = new_factors;
        if factors.iter().all(|f| f.degree() == Some(1)) {
            break;
        }
    }
    Ok(factors)
}

/// Entry point for a (not necessarily square-free) polynomial over
/// `Z_p[x]`; the caller is responsible for square-free decomposition
/// before reaching for Berlekamp (spec.md §4.9 treats repeated factors via
/// `gcd(f, f')` ahead of this call).
pub fn factor_over_zp(poly: &PolyZp) -> FiniteFieldResult<Vec<PolyZp>> {
    let n = poly.degree().ok_or(FiniteFieldError::EmptyPolynomial)?;
    if n <= 1 {
        return Ok(vec![poly.make_monic()?]);
    }
    berlekamp_factor(&poly.make_monic()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_difference_of_squares() {
        let f = PolyZp::from_signed_coeffs(&[-1, 0, 1], 7); // x^2 - 1
        let factors = factor_over_zp(&f).unwrap();
        assert_eq!(factors.len(), 2);
        for factor in &factors {
            assert_eq!(factor.degree(), Some(1));
        }
    }

    #[test]
    fn irreducible_polynomial_is_returned_unsplit() {
        let f = PolyZp::from_signed_coeffs(&[-1, 1], 7); // x - 1
        let factors = factor_over_zp(&f).unwrap();
        assert_eq!(factors.len(), 1);
    }

    #[test]
    fn factors_x_cubed_minus_x() {
        let f = PolyZp::from_signed_coeffs(&[0, -1, 0, 1], 7);
        let factors = factor_over_zp(&f).unwrap();
        assert!(factors.len() >= 2);
    }
}
