//! Arithmetic over `Z_p[x]` for a fixed small prime `p`, used internally by
//! Berlekamp's algorithm (spec.md §4.9 Phase 1). Kept separate from the
//! exact-integer [`crate::poly::Poly`] type: reductions mod `p` only make
//! sense while searching for a factorization pattern, never in the final
//! answer.

pub mod berlekamp;
mod element;
mod gcd;
mod poly;

pub use element::{is_prime, Zp};
pub use poly::PolyZp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiniteFieldError {
    DivisionByZero,
    EmptyPolynomial,
    NoInverse { element: u64, modulus: u64 },
}

pub type FiniteFieldResult<T> = Result<T, FiniteFieldError>;
