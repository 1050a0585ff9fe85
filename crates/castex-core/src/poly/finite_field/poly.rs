//! Dense polynomials over `Z_p[x]`: coefficient vector indexed constant-term
//! first, empty vector for the zero polynomial. Arithmetic, evaluation and
//! division-with-remainder, adapted from the teacher's modular-GCD layer
//! without its NTT fast path (out of scope for the degrees this engine
//! targets — spec.md §4.9's polynomials are small enough for the naive
//! O(n*m) convolution).

use super::element::Zp;
use super::{FiniteFieldError, FiniteFieldResult};

#[derive(Clone, PartialEq, Eq)]
pub struct PolyZp {
    coeffs: Vec<u64>,
    modulus: u64,
}

impl PolyZp {
    pub fn from_coeffs(mut coeffs: Vec<u64>, modulus: u64) -> Self {
        for c in coeffs.iter_mut() {
            *c %= modulus;
        }
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { coeffs, modulus }
    }

    pub fn from_signed_coeffs(coeffs: &[i64], modulus: u64) -> Self {
        let m = modulus as i64;
        let normalized: Vec<u64> = coeffs.iter().map(|&c| (((c % m) + m) % m) as u64).collect();
        Self::from_coeffs(normalized, modulus)
    }

    pub fn zero(modulus: u64) -> Self {
        Self { coeffs: Vec::new(), modulus }
    }

    pub fn constant(c: u64, modulus: u64) -> Self {
        if c % modulus == 0 {
            Self::zero(modulus)
        } else {
            Self { coeffs: vec![c % modulus], modulus }
        }
    }

    pub fn x(modulus: u64) -> Self {
        Self { coeffs: vec![0, 1], modulus }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn leading_coeff(&self) -> Option<Zp> {
        self.coeffs.last().map(|&c| Zp::new(c, self.modulus))
    }

    pub fn coeff(&self, i: usize) -> Zp {
        Zp::new(self.coeffs.get(i).copied().unwrap_or(0), self.modulus)
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn coefficients(&self) -> &[u64] {
        &self.coeffs
    }

    pub fn add(&self, other: &Self) -> Self {
        let max_len = self.coeffs.len().max(other.coeffs.len());
        let mut result = Vec::with_capacity(max_len);
        for i in 0..max_len {
            let a = self.coeffs.get(i).copied().unwrap_or(0);
            let b = other.coeffs.get(i).copied().unwrap_or(0);
            result.push((a + b) % self.modulus);
        }
        Self::from_coeffs(result, self.modulus)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let max_len = self.coeffs.len().max(other.coeffs.len());
        let mut result = Vec::with_capacity(max_len);
        for i in 0..max_len {
            let a = self.coeffs.get(i).copied().unwrap_or(0);
            let b = other.coeffs.get(i).copied().unwrap_or(0);
            result.push(if a >= b { a - b } else { self.modulus - (b - a) });
        }
        Self::from_coeffs(result, self.modulus)
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.modulus);
        }
        let result_len = self.coeffs.len() + other.coeffs.len() - 1;
        let mut result = vec![0u128; result_len];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                result[i + j] += a as u128 * b as u128;
            }
        }
        let modulus = self.modulus as u128;
        let reduced: Vec<u64> = result.iter().map(|&v| (v % modulus) as u64).collect();
        Self::from_coeffs(reduced, self.modulus)
    }

    pub fn scale(&self, c: Zp) -> Self {
        if c.is_zero() || self.is_zero() {
            return Self::zero(self.modulus);
        }
        let new_coeffs: Vec<u64> = self.coeffs.iter().map(|&a| (Zp::new(a, self.modulus) * c).value()).collect();
        Self::from_coeffs(new_coeffs, self.modulus)
    }

    pub fn div_rem(&self, divisor: &Self) -> FiniteFieldResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(FiniteFieldError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok((Self::zero(self.modulus), Self::zero(self.modulus)));
        }
        let div_degree = divisor.degree().unwrap();
        let self_degree = self.degree().unwrap();
        if self_degree < div_degree {
            return Ok((Self::zero(self.modulus), self.clone()));
        }
        let lc_inv = divisor.leading_coeff().unwrap().inverse()?;
        let mut remainder = self.coeffs.clone();
        let quotient_len = self_degree - div_degree + 1;
        let mut quotient = vec![0u64; quotient_len];
        for i in (0..quotient_len).rev() {
            let rem_idx = i + div_degree;
            if rem_idx >= remainder.len() {
                continue;
            }
            let coeff = Zp::new(remainder[rem_idx], self.modulus) * lc_inv;
            quotient[i] = coeff.value();
            if coeff.is_zero() {
                continue;
            }
            for (j, &div_coeff) in divisor.coeffs.iter().enumerate() {
                let term = Zp::new(div_coeff, self.modulus) * coeff;
                let rem_val = Zp::new(remainder[i + j], self.modulus);
                remainder[i + j] = (rem_val - term).value();
            }
        }
        Ok((Self::from_coeffs(quotient, self.modulus), Self::from_coeffs(remainder, self.modulus)))
    }

    pub fn evaluate(&self, x: u64) -> Zp {
        if self.is_zero() {
            return Zp::zero(self.modulus);
        }
        let x_field = Zp::new(x, self.modulus);
        let mut result = Zp::zero(self.modulus);
        for &coeff in self.coeffs.iter().rev() {
            result = result * x_field + Zp::new(coeff, self.modulus);
        }
        result
    }

    pub fn make_monic(&self) -> FiniteFieldResult<Self> {
        if self.is_zero() {
            return Err(FiniteFieldError::EmptyPolynomial);
        }
        let lc = self.leading_coeff().unwrap();
        if lc.is_one() {
            return Ok(self.clone());
        }
        let lc_inv = lc.inverse()?;
        let new_coeffs: Vec<u64> = self.coeffs.iter().map(|&c| (Zp::new(c, self.modulus) * lc_inv).value()).collect();
        Ok(Self::from_coeffs(new_coeffs, self.modulus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_binomials() {
        let a = PolyZp::from_coeffs(vec![1, 1], 7);
        let b = PolyZp::from_coeffs(vec![1, 1], 7);
        assert_eq!(a.mul(&b).coefficients(), &[1, 2, 1]);
    }

    #[test]
    fn division_with_remainder_reconstructs_the_dividend() {
        let dividend = PolyZp::from_coeffs(vec![1, 2, 1], 7);
        let divisor = PolyZp::from_coeffs(vec![1, 1], 7);
        let (q, r) = dividend.div_rem(&divisor).unwrap();
        assert_eq!(q.coefficients(), &[1, 1]);
        assert!(r.is_zero());
    }

    #[test]
    fn evaluate_matches_horner() {
        let p = PolyZp::from_coeffs(vec![3, 2, 1], 7);
        assert_eq!(p.evaluate(2).value(), 4);
    }
}
