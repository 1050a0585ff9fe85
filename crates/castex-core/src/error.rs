//! Error types for lexing, parsing, scoping, and analysis.
//!
//! Every error belongs to one of five kinds (see the module-level variants
//! below). Each carries a human-readable message and, when known, the
//! byte offset into the source LaTeX string where the problem was found.

use std::fmt;

/// A single error produced anywhere in the `castex-core` pipeline.
///
/// Propagation policy: an `AnalysisError` aborts the current `parse` or
/// `analyze` call. Rewrites never recover a partial result; callers see the
/// error and, for `analyze`, whatever step frames were recorded before the
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Unknown token, unterminated brace, or other tokenizer failure.
    Lexical { message: String, position: Option<usize> },

    /// Unexpected token, missing argument, or unmatched delimiter.
    Syntactic { message: String, position: Option<usize> },

    /// Reserved-name misuse or wrong function arity, caught during parsing.
    SemanticParse { message: String, position: Option<usize> },

    /// A free variable has no value binding, or an operation needs a
    /// variable that does not occur in the expression.
    Scope { message: String, position: Option<usize> },

    /// Iteration cap hit, degree bound exceeded, or an internal invariant
    /// was violated.
    Algorithmic { message: String, position: Option<usize> },
}

impl AnalysisError {
    pub fn lexical(message: impl Into<String>, position: Option<usize>) -> Self {
        Self::Lexical { message: message.into(), position }
    }

    pub fn syntactic(message: impl Into<String>, position: Option<usize>) -> Self {
        Self::Syntactic { message: message.into(), position }
    }

    pub fn semantic_parse(message: impl Into<String>, position: Option<usize>) -> Self {
        Self::SemanticParse { message: message.into(), position }
    }

    pub fn scope(message: impl Into<String>) -> Self {
        Self::Scope { message: message.into(), position: None }
    }

    pub fn algorithmic(message: impl Into<String>) -> Self {
        Self::Algorithmic { message: message.into(), position: None }
    }

    /// The byte offset into the source string this error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lexical { position, .. }
            | Self::Syntactic { position, .. }
            | Self::SemanticParse { position, .. }
            | Self::Scope { position, .. }
            | Self::Algorithmic { position, .. } => *position,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Self::Lexical { .. } => "lexical error",
            Self::Syntactic { .. } => "syntax error",
            Self::SemanticParse { .. } => "semantic error",
            Self::Scope { .. } => "scope error",
            Self::Algorithmic { .. } => "algorithmic error",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Lexical { message, .. }
            | Self::Syntactic { message, .. }
            | Self::SemanticParse { message, .. }
            | Self::Scope { message, .. }
            | Self::Algorithmic { message, .. } => message,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(pos) => write!(f, "{} at position {}: {}", self.kind_label(), pos, self.message()),
            None => write!(f, "{}: {}", self.kind_label(), self.message()),
        }
    }
}

impl std::error::Error for AnalysisError {}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
