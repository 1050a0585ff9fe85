//! The table of LaTeX command words that drive structural parsing rather
//! than naming a value directly. Anything not in this table but still a
//! recognized command word (`pi`, `alpha`, `infty`, …) is lexed as a plain
//! [`super::TokenKind::Identifier`] instead.

const STRUCTURAL: &[&str] = &[
    "frac", "sqrt", "root",
    "int", "sum", "prod",
    "sin", "cos", "tan", "asin", "acos", "atan",
    "sinh", "cosh", "tanh",
    "ln", "log", "exp", "abs",
    "left", "right",
];

pub fn is_structural_command(word: &str) -> bool {
    STRUCTURAL.contains(&word)
}
