//! LaTeX pretty-printing (spec.md §6 "LaTeX rendering rules").

mod latex;

pub use latex::to_latex;
