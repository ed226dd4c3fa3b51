//! Non-fatal diagnostics written into the output log

use crate::pyit::parser::Keyword;

/// Broad class of a diagnostic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A keyword line that does not fit its statement's grammar
    Grammar,
    /// Well-formed statement that cannot run (undefined variable, unknown function)
    Semantic,
    /// No statement keyword at all
    Unrecognized,
}

/// A diagnostic line. `Display` gives the exact text appended to the output.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Syntax error: {0}")]
    UnknownStatement(String),

    #[error("Invalid variable declaration syntax.")]
    InvalidDeclaration,

    #[error("Invalid assignment syntax.")]
    InvalidAssignment,

    #[error("Invalid print syntax.")]
    InvalidPrint,

    /// Carries the offending line
    #[error("Invalid conditional syntax: {0}")]
    InvalidConditional(String),

    #[error("Invalid loop syntax.")]
    InvalidLoop,

    #[error("Invalid function definition syntax.")]
    InvalidFunction,

    #[error("Variable '{0}' is not defined.")]
    UndefinedVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

impl Diagnostic {
    /// The diagnostic for a line that starts with `keyword` but does not match its grammar
    pub fn grammar_mismatch(keyword: Keyword, line: &str) -> Self {
        match keyword {
            Keyword::Thatmat => Diagnostic::InvalidDeclaration,
            Keyword::Phyay => Diagnostic::InvalidAssignment,
            Keyword::Pya => Diagnostic::InvalidPrint,
            Keyword::Mahsaw => Diagnostic::InvalidConditional(line.to_string()),
            Keyword::Akyein => Diagnostic::InvalidLoop,
            Keyword::Lohp => Diagnostic::InvalidFunction,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::UnknownStatement(_) => DiagnosticKind::Unrecognized,
            Diagnostic::UndefinedVariable(_) | Diagnostic::UnknownFunction(_) => {
                DiagnosticKind::Semantic
            }
            _ => DiagnosticKind::Grammar,
        }
    }
}
