//! Reserved-name tables (spec.md §4.2, §6). Consulted by the parser at
//! every point a name is *introduced* — a bound-variable declaration in an
//! `\int`/`\sum`/`\prod` — and by [`function_arity`] to validate call
//! argument counts.

use crate::ast::Arity;

const RESERVED_CONSTANTS: &[&str] = &["e", "pi", "i"];
const RESERVED_SYMBOLS: &[&str] = &["infty", "infinity", "emptyset"];

pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_CONSTANTS.contains(&name) || RESERVED_SYMBOLS.contains(&name) || function_arity(name).is_some()
}

/// Expected-argument-count for each reserved function name, or `None` if
/// `name` is not a reserved function at all.
pub fn function_arity(name: &str) -> Option<Arity> {
    match name {
        "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "sinh" | "cosh" | "tanh" | "ln" | "exp"
        | "abs" | "sqrt" => Some(Arity::exact(1)),
        // `\log{x}` defaults to base 10; `\log_{b}{x}` supplies an explicit base.
        "log" => Some(Arity { min: 1, max: 2 }),
        _ => None,
    }
}
