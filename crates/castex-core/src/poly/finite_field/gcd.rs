//! Euclidean and extended Euclidean algorithm over `Z_p[x]`, used by
//! Berlekamp's algorithm's factor-splitting step.

use super::poly::PolyZp;
use super::FiniteFieldResult;

impl PolyZp {
    /// Monic GCD via repeated division.
    pub fn gcd(&self, other: &Self) -> FiniteFieldResult<Self> {
        if self.is_zero() {
            return if other.is_zero() { Ok(Self::zero(self.modulus())) } else { other.make_monic() };
        }
        if other.is_zero() {
            return self.make_monic();
        }
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b)?;
            a = b;
            b = r;
        }
        a.make_monic()
    }

    /// Extended Euclidean algorithm: returns `(gcd, s, t)` with
    /// `gcd == s*self + t*other`. Used by Hensel lifting to find the
    /// Bezout coefficients `u, v` with `u*g + v*h ≡ 1 (mod p)`.
    pub fn extended_gcd(&self, other: &Self) -> FiniteFieldResult<(Self, Self, Self)> {
        if self.is_zero() {
            return if other.is_zero() {
                Ok((Self::zero(self.modulus()), Self::zero(self.modulus()), Self::zero(self.modulus())))
            } else {
                let monic = other.make_monic()?;
                let lc_inv = other.leading_coeff().unwrap().inverse()?;
                Ok((monic, Self::zero(self.modulus()), Self::constant(lc_inv.value(), self.modulus())))
            };
        }
        if other.is_zero() {
            let monic = self.make_monic()?;
            let lc_inv = self.leading_coeff().unwrap().inverse()?;
            return Ok((monic, Self::constant(lc_inv.value(), self.modulus()), Self::zero(self.modulus())));
        }
        let mut old_r = self.clone();
        let mut r = other.clone();
        let mut old_s = Self::constant(1, self.modulus());
        let mut s = Self::zero(self.modulus());
        let mut old_t = Self::zero(self.modulus());
        let mut t = Self::constant(1, self.modulus());
        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r)?;
            old_r = r;
            r = rem;
            let new_s = old_s.sub(&q.mul(&s));
            old_s = s;
            s = new_s;
            let new_t = old_t.sub(&q.mul(&t));
            old_t = t;
            t = new_t;
        }
        if old_r.is_zero() {
            return Ok((Self::zero(self.modulus()), Self::zero(self.modulus()), Self::zero(self.modulus())));
        }
        let lc_inv = old_r.leading_coeff().unwrap().inverse()?;
        Ok((old_r.scale(lc_inv), old_s.scale(lc_inv), old_t.scale(lc_inv)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_of_difference_of_squares_and_a_factor() {
        let p1 = PolyZp::from_signed_coeffs(&[-1, 0, 1], 7); // x^2 - 1
        let p2 = PolyZp::from_signed_coeffs(&[-1, 1], 7); // x - 1
        let gcd = p1.gcd(&p2).unwrap();
        assert_eq!(gcd.degree(), Some(1));
        assert_eq!(gcd.leading_coeff().unwrap().value(), 1);
    }

    #[test]
    fn coprime_polynomials_have_constant_gcd() {
        let p1 = PolyZp::from_coeffs(vec![1, 0, 1], 7);
        let p2 = PolyZp::from_coeffs(vec![1, 1], 7);
        let gcd = p1.gcd(&p2).unwrap();
        assert!(gcd.is_constant());
    }

    #[test]
    fn extended_gcd_bezout_identity_holds() {
        let p1 = PolyZp::from_coeffs(vec![1, 2, 1], 7);
        let p2 = PolyZp::from_coeffs(vec![1, 1], 7);
        let (gcd, s, t) = p1.extended_gcd(&p2).unwrap();
        let check = s.mul(&p1).add(&t.mul(&p2));
        assert_eq!(gcd.coefficients(), check.coefficients());
    }
}
