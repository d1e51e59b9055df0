//! gosem-index: semantic token classification for Go source.
//!
//! Parses a Go buffer with tree-sitter, binds identifiers to the declarations
//! visible in the file, resolves the rest against imports and the universe
//! scope, and classifies declaration names, call sites, type references,
//! enumerator-like constants and labels into a category table.
//!
//! # Architecture
//!
//! - **syntax**: tree wrapper and the closed set of node kinds inspected
//! - **parser**: tree-sitter parsing and syntax error detection
//! - **binder**: local declarations and Go block scoping
//! - **catalog**: exported types and constants of imported packages
//! - **universe**: predeclared identifiers
//! - **resolver**: imports, package members and universe lookups
//! - **classifier**: the pre-order classification walk
//! - **aggregator**: span grouping by category
//! - **tokenizer**: the `SemanticTokenizer` trait and buffer-type registry

pub mod aggregator;
pub mod binder;
pub mod catalog;
pub mod classifier;
pub mod parser;
pub mod resolver;
pub mod syntax;
pub mod tokenizer;
pub mod universe;

pub use aggregator::aggregate;
pub use binder::{bind, BindingKind, Bindings, ConstType, Object};
pub use catalog::{Catalog, CatalogFile, PackageExports};
pub use classifier::{classify, Classifier};
pub use parser::{decode_source, GoParser};
pub use resolver::{resolve, Declaration, ObjectKind, ResolutionMap};
pub use syntax::{NodeKind, SyntaxTree};
pub use tokenizer::{
    all_tokenizers, find_tokenizer, tokenize, tokenizer_for_buffer_type, tokenizers_with_catalog,
    GoTokenizer, SemanticTokenizer, TokenizeOutput,
};
