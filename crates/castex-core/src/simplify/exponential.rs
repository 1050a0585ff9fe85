//! Exponential / root normalization (spec.md §4.6): roots become fractional
//! powers, then exponent arithmetic (`x^a * x^b`, `(x^a)^b`, distribution
//! over a non-negative integer power) is applied, plus perfect-root
//! consolidation for integer bases.

use crate::ast::{BinaryOp, Expr};
use crate::error::AnalysisError;
use crate::number::Number;
use crate::steps::StepLog;
use num_bigint::BigInt;
use num_traits::{One, Zero};

pub fn simplify_exponential(expr: &Expr, log: &mut StepLog) -> Result<Expr, AnalysisError> {
    let with_simplified_children = simplify_children(expr, log)?;
    let mut current = with_simplified_children;
    while let Some(next) = rewrite_once(&current)? {
        log.push(format!("{} -> {}", crate::render::to_latex(&current), crate::render::to_latex(&next)));
        current = next;
    }
    Ok(current)
}

fn simplify_children(expr: &Expr, log: &mut StepLog) -> Result<Expr, AnalysisError> {
    Ok(match expr {
        Expr::Number(_) | Expr::Identifier(_) => expr.clone(),
        Expr::Binary { op, left, right } => {
            Expr::binary(*op, simplify_exponential(left, log)?, simplify_exponential(right, log)?)
        }
        Expr::Unary { op, operand } => {
            Expr::Unary { op: *op, operand: Box::new(simplify_exponential(operand, log)?) }
        }
        Expr::Call { name, args, expected_arity } => {
            let mut simplified_args = Vec::with_capacity(args.len());
            for a in args {
                simplified_args.push(simplify_exponential(a, log)?);
            }
            Expr::Call { name: name.clone(), args: simplified_args, expected_arity: *expected_arity }
        }
        Expr::Fraction { numerator, denominator } => Expr::Fraction {
            numerator: Box::new(simplify_exponential(numerator, log)?),
            denominator: Box::new(simplify_exponential(denominator, log)?),
        },
        Expr::Integral { integrand, variable, lower, upper } => Expr::Integral {
            integrand: Box::new(simplify_exponential(integrand, log)?),
            variable: variable.clone(),
            lower: lower.as_ref().map(|b| simplify_exponential(b, log)).transpose()?.map(Box::new),
            upper: upper.as_ref().map(|b| simplify_exponential(b, log)).transpose()?.map(Box::new),
        },
        Expr::Sum { body, variable, lower, upper } => Expr::Sum {
            body: Box::new(simplify_exponential(body, log)?),
            variable: variable.clone(),
            lower: Box::new(simplify_exponential(lower, log)?),
            upper: Box::new(simplify_exponential(upper, log)?),
        },
        Expr::Product { body, variable, lower, upper } => Expr::Product {
            body: Box::new(simplify_exponential(body, log)?),
            variable: variable.clone(),
            lower: Box::new(simplify_exponential(lower, log)?),
            upper: Box::new(simplify_exponential(upper, log)?),
        },
    })
}

fn rewrite_once(expr: &Expr) -> Result<Option<Expr>, AnalysisError> {
    match expr {
        Expr::Call { name, args, .. } if name == "sqrt" => {
            reject_negative_radicand(&args[0])?;
            Ok(Some(Expr::pow(args[0].clone(), Expr::Number(Number::new(BigInt::one(), BigInt::from(2))))))
        }
        Expr::Call { name, args, .. } if name == "root" => {
            if let Expr::Number(n) = &args[1] {
                if let Some(degree) = n.to_u32() {
                    if degree >= 2 {
                        reject_negative_radicand(&args[0])?;
                        return Ok(Some(Expr::pow(
                            args[0].clone(),
                            Expr::Number(Number::new(BigInt::one(), BigInt::from(degree))),
                        )));
                    }
                }
            }
            Ok(None)
        }
        Expr::Binary { op: BinaryOp::Pow, left, right } => {
            if let Expr::Binary { op: BinaryOp::Pow, left: inner_base, right: inner_exp } = left.as_ref() {
                if let (Expr::Number(e1), Expr::Number(e2)) = (inner_exp.as_ref(), right.as_ref()) {
                    return Ok(Some(Expr::pow(
                        (**inner_base).clone(),
                        Expr::Number(e1.checked_mul(e2)),
                    )));
                }
            }
            if let Expr::Binary { op: BinaryOp::Mul, left: a, right: b } = left.as_ref() {
                if let Expr::Number(n) = right.as_ref() {
                    if n.is_integer() && !n.is_negative() {
                        return Ok(Some(Expr::mul(
                            Expr::pow((**a).clone(), Expr::Number(n.clone())),
                            Expr::pow((**b).clone(), Expr::Number(n.clone())),
                        )));
                    }
                }
            }
            if let Expr::Number(base) = left.as_ref() {
                if let Expr::Number(exponent) = right.as_ref() {
                    if let Some(folded) = perfect_root(base, exponent) {
                        return Ok(Some(Expr::Number(folded)));
                    }
                }
            }
            Ok(None)
        }
        Expr::Fraction { numerator, denominator } => {
            let (base_n, exp_n) = base_exponent(numerator);
            let (base_d, exp_d) = base_exponent(denominator);
            if base_n.structural_eq(&base_d) {
                let combined = exp_n.checked_sub(&exp_d);
                return Ok(Some(power_or_plain(base_n, combined)));
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn reject_negative_radicand(arg: &Expr) -> Result<(), AnalysisError> {
    if let Expr::Number(n) = arg {
        if n.is_negative() {
            return Err(AnalysisError::algorithmic(format!(
                "square/nth root of negative number {n} is rejected (no complex support)"
            )));
        }
    }
    Ok(())
}

fn base_exponent(expr: &Expr) -> (Expr, Number) {
    if let Expr::Binary { op: BinaryOp::Pow, left, right } = expr {
        if let Expr::Number(e) = right.as_ref() {
            return ((**left).clone(), e.clone());
        }
    }
    (expr.clone(), Number::one())
}

fn power_or_plain(base: Expr, exponent: Number) -> Expr {
    if exponent.is_zero() {
        Expr::integer(1)
    } else if exponent.is_one() {
        base
    } else {
        Expr::pow(base, Expr::Number(exponent))
    }
}

/// Folds `base^(1/n)` into an integer when `base` is a perfect `n`th power.
fn perfect_root(base: &Number, exponent: &Number) -> Option<Number> {
    if !base.is_integer() || base.is_negative() || base.is_zero() {
        return None;
    }
    if exponent.numer() != &BigInt::one() {
        return None;
    }
    let n = num_traits::cast::ToPrimitive::to_u32(exponent.denom())?;
    if n < 2 {
        return None;
    }
    let value = base.as_bigint()?.clone();
    let root = integer_nth_root(&value, n)?;
    if num_traits::Pow::pow(root.clone(), n) == value {
        Some(Number::from_bigint(root))
    } else {
        None
    }
}

fn integer_nth_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if value.is_zero() {
        return Some(BigInt::zero());
    }
    let mut low = BigInt::zero();
    let mut high = value.clone();
    while &low < &high {
        let mid = (&low + &high + BigInt::one()) / BigInt::from(2);
        let powered = num_traits::Pow::pow(mid.clone(), n);
        if powered <= *value {
            low = mid;
        } else {
            high = &mid - BigInt::one();
        }
    }
    Some(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepLog;

    fn simplify(expr: Expr) -> Expr {
        let mut log = StepLog::new();
        simplify_exponential(&expr, &mut log).unwrap()
    }

    #[test]
    fn sqrt_becomes_fractional_power() {
        let x = Expr::symbol("x");
        let result = simplify(Expr::call("sqrt", vec![x.clone()], crate::ast::Arity::exact(1)));
        assert!(matches!(result, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn perfect_square_root_folds_to_integer() {
        let result = simplify(Expr::call("sqrt", vec![Expr::integer(9)], crate::ast::Arity::exact(1)));
        assert_eq!(result, Expr::integer(3));
    }

    #[test]
    fn power_of_power_multiplies_exponents() {
        let x = Expr::symbol("x");
        let expr = Expr::pow(Expr::pow(x.clone(), Expr::integer(2)), Expr::integer(3));
        let result = simplify(expr);
        assert_eq!(result, Expr::pow(x, Expr::integer(6)));
    }

    #[test]
    fn negative_radicand_is_rejected() {
        let err = {
            let mut log = StepLog::new();
            simplify_exponential(&Expr::call("sqrt", vec![Expr::integer(-4)], crate::ast::Arity::exact(1)), &mut log)
                .unwrap_err()
        };
        assert!(matches!(err, AnalysisError::Algorithmic { .. }));
    }

    #[test]
    fn fraction_of_same_base_powers_subtracts_exponents() {
        let x = Expr::symbol("x");
        let expr = Expr::Fraction {
            numerator: Box::new(Expr::pow(x.clone(), Expr::integer(5))),
            denominator: Box::new(Expr::pow(x.clone(), Expr::integer(2))),
        };
        let result = simplify(expr);
        assert_eq!(result, Expr::pow(x, Expr::integer(3)));
    }
}
