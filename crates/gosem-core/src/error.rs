use serde::{Deserialize, Serialize};

/// A message attached to a position in a named source buffer.
///
/// Displays as `file:line:column: message`, the format Go tooling uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct Diagnostic {
    pub file: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Unified error type for gosem.
#[derive(Debug, thiserror::Error)]
pub enum GosemError {
    #[error("Syntax error: {0}")]
    Syntax(Diagnostic),

    #[error("Resolution error: {first}{}", more_errors(.count))]
    Resolution { first: Diagnostic, count: usize },

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Language error: {0}")]
    Language(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GosemError {
    /// Fold a list of resolution diagnostics into a single error.
    ///
    /// Returns `None` for an empty list.
    pub fn resolution(diagnostics: &[Diagnostic]) -> Option<Self> {
        let first = diagnostics.first()?.clone();
        Some(Self::Resolution {
            first,
            count: diagnostics.len(),
        })
    }

    /// Whether this error prevents a category table from being produced.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Resolution { .. })
    }
}

fn more_errors(count: &usize) -> String {
    match count {
        0 | 1 => String::new(),
        2 => " (and 1 more error)".to_string(),
        n => format!(" (and {} more errors)", n - 1),
    }
}
