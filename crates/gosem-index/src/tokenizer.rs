//! Tokenizer trait, the Go tokenizer, and the buffer-type registry.

use crate::aggregator::aggregate;
use crate::binder::bind;
use crate::catalog::Catalog;
use crate::classifier::Classifier;
use crate::parser::GoParser;
use crate::resolver::resolve;
use gosem_core::{CategoryTable, Diagnostic, GosemError};
use std::borrow::Cow;

/// Result of tokenizing one buffer.
///
/// Resolution diagnostics do not prevent a table from being produced; they
/// are carried alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizeOutput {
    pub table: CategoryTable,
    pub resolution_errors: Vec<Diagnostic>,
}

impl TokenizeOutput {
    /// The resolution diagnostics folded into one non-fatal error.
    pub fn resolution_error(&self) -> Option<GosemError> {
        GosemError::resolution(&self.resolution_errors)
    }
}

/// Trait for producing semantic token tables from source buffers.
///
/// Each buffer type (editor file type) has one implementation registered in
/// [`all_tokenizers`].
pub trait SemanticTokenizer: Send + Sync {
    /// Editor buffer type handled by this tokenizer (e.g. "go").
    fn buffer_type(&self) -> &str;

    /// Tokenize `source`, reporting positions against the virtual file `name`.
    fn tokenize(&self, name: &str, source: &str) -> Result<TokenizeOutput, GosemError>;
}

/// Tokenizer for Go source buffers.
pub struct GoTokenizer {
    parser: GoParser,
    catalog: Cow<'static, Catalog>,
}

impl GoTokenizer {
    /// Tokenizer backed by the bundled package catalog.
    pub fn new() -> Self {
        Self {
            parser: GoParser::new(),
            catalog: Cow::Borrowed(Catalog::embedded()),
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            parser: GoParser::new(),
            catalog: Cow::Owned(catalog),
        }
    }
}

impl Default for GoTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticTokenizer for GoTokenizer {
    fn buffer_type(&self) -> &str {
        "go"
    }

    fn tokenize(&self, name: &str, source: &str) -> Result<TokenizeOutput, GosemError> {
        let tree = self.parser.parse(name, source)?;
        let bindings = bind(&tree);
        let (resolution, resolution_errors) = resolve(&tree, &bindings, &self.catalog);

        let spans = Classifier::new(&tree, &bindings, &resolution).classify();
        let table = aggregate(&spans);

        tracing::debug!(
            "Tokenized {}: {} objects, {} bindings, {} resolved uses, {} spans",
            name,
            bindings.object_count(),
            bindings.len(),
            resolution.len(),
            spans.len()
        );
        if let Some(first) = resolution_errors.first() {
            tracing::warn!(
                "{} resolution error(s) in {}, first: {}",
                resolution_errors.len(),
                name,
                first
            );
        }

        Ok(TokenizeOutput {
            table,
            resolution_errors,
        })
    }
}

/// Returns all available tokenizers.
pub fn all_tokenizers() -> Vec<Box<dyn SemanticTokenizer>> {
    vec![Box::new(GoTokenizer::new())]
}

/// Returns all available tokenizers, resolving imports against `catalog`.
pub fn tokenizers_with_catalog(catalog: Catalog) -> Vec<Box<dyn SemanticTokenizer>> {
    vec![Box::new(GoTokenizer::with_catalog(catalog))]
}

/// The tokenizer in `tokenizers` registered for `buffer_type`.
pub fn find_tokenizer<'a>(
    tokenizers: &'a [Box<dyn SemanticTokenizer>],
    buffer_type: &str,
) -> Option<&'a dyn SemanticTokenizer> {
    position_of(tokenizers, buffer_type).map(|i| &*tokenizers[i])
}

/// Find a tokenizer for an editor buffer type.
pub fn tokenizer_for_buffer_type(buffer_type: &str) -> Option<Box<dyn SemanticTokenizer>> {
    let mut tokenizers = all_tokenizers();
    let index = position_of(&tokenizers, buffer_type)?;
    Some(tokenizers.swap_remove(index))
}

fn position_of(tokenizers: &[Box<dyn SemanticTokenizer>], buffer_type: &str) -> Option<usize> {
    tokenizers
        .iter()
        .position(|tokenizer| tokenizer.buffer_type() == buffer_type)
}

/// Tokenize a Go buffer with the bundled catalog.
pub fn tokenize(name: &str, source: &str) -> Result<TokenizeOutput, GosemError> {
    GoTokenizer::new().tokenize(name, source)
}
