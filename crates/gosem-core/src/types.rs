use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::GosemError;

// ── Token Categories ────────────────────────────────────────────────────────

/// The five semantic categories a classified span can belong to.
///
/// The declaration order is the order categories appear in serialized tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Name of a function or method declaration.
    #[serde(rename = "FunctionDecl")]
    FunctionDeclaration,
    /// Callee name at a call site.
    #[serde(rename = "CallExpr")]
    CallExpression,
    /// Reference to (or declaration of) a user-visible named type.
    #[serde(rename = "TypeRef")]
    TypeReference,
    /// Reference to a constant of a non-basic type (enumerator-like).
    #[serde(rename = "EnumConstant")]
    ConstantReference,
    /// Label definition or labeled branch target.
    #[serde(rename = "LabelRef")]
    LabelReference,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 5] = [
        Self::FunctionDeclaration,
        Self::CallExpression,
        Self::TypeReference,
        Self::ConstantReference,
        Self::LabelReference,
    ];

    /// Name used as the key in serialized category tables.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::FunctionDeclaration => "FunctionDecl",
            Self::CallExpression => "CallExpr",
            Self::TypeReference => "TypeRef",
            Self::ConstantReference => "EnumConstant",
            Self::LabelReference => "LabelRef",
        }
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl std::str::FromStr for TokenCategory {
    type Err = GosemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.wire_name() == s)
            .ok_or_else(|| GosemError::Protocol(format!("Unknown token category: {s}")))
    }
}

// ── Spans ───────────────────────────────────────────────────────────────────

/// Position and extent of a token: 1-based line, 1-based byte column, and
/// length in bytes.
///
/// Serialized as a `[line, column, byte_length]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[usize; 3]", from = "[usize; 3]")]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub byte_length: usize,
}

impl From<Location> for [usize; 3] {
    fn from(loc: Location) -> Self {
        [loc.line, loc.column, loc.byte_length]
    }
}

impl From<[usize; 3]> for Location {
    fn from([line, column, byte_length]: [usize; 3]) -> Self {
        Self {
            line,
            column,
            byte_length,
        }
    }
}

/// A classified token produced by one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub category: TokenCategory,
    pub line: usize,
    pub column: usize,
    pub byte_length: usize,
}

impl Span {
    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            byte_length: self.byte_length,
        }
    }
}

// ── Category Table ──────────────────────────────────────────────────────────

/// Spans bucketed by category.
///
/// A category only has an entry once a span of that category was pushed, so
/// the table never holds an empty bucket. Within a bucket, locations keep
/// their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    buckets: BTreeMap<TokenCategory, Vec<Location>>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: &Span) {
        self.buckets
            .entry(span.category)
            .or_default()
            .push(span.location());
    }

    pub fn get(&self, category: TokenCategory) -> Option<&[Location]> {
        self.buckets.get(&category).map(Vec::as_slice)
    }

    /// Number of locations recorded for `category` (0 when absent).
    pub fn count(&self, category: TokenCategory) -> usize {
        self.get(category).map_or(0, <[Location]>::len)
    }

    /// Number of non-empty categories.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of locations across all categories.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Encode as a single-line JSON object.
    pub fn to_json(&self) -> Result<String, GosemError> {
        Ok(serde_json::to_string(self)?)
    }
}
