//! The semantic classification pass.
//!
//! One pre-order walk over the syntax tree. Each node is checked against the
//! rules below, first match wins, and the walk always continues into the
//! node's children:
//!
//! 1. `labeled_statement`: the label and its colon.
//! 2. labeled `break`/`continue`/`goto`: the label name.
//! 3. function and method declarations: the declared name.
//! 4. calls: the selected member name, or a bare callee bound to a local
//!    function.
//! 5. identifiers: local types, local constants of a declared type, and
//!    resolved non-basic type names and constants.

use crate::binder::{label_of, BindingKind, Bindings};
use crate::resolver::{ObjectKind, ResolutionMap};
use crate::syntax::{children, start_position, NodeKind, SyntaxTree};
use gosem_core::{Span, TokenCategory};
use tree_sitter::Node;

/// Classifies the nodes of one syntax tree.
pub struct Classifier<'a> {
    tree: &'a SyntaxTree,
    bindings: &'a Bindings,
    resolution: &'a ResolutionMap,
}

impl<'a> Classifier<'a> {
    pub fn new(tree: &'a SyntaxTree, bindings: &'a Bindings, resolution: &'a ResolutionMap) -> Self {
        Self {
            tree,
            bindings,
            resolution,
        }
    }

    /// All spans of the tree, in document (pre-order) order.
    pub fn classify(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        self.visit(Some(self.tree.root()), &mut spans);
        spans
    }

    fn visit(&self, node: Option<Node<'a>>, spans: &mut Vec<Span>) {
        let Some(node) = node else {
            return;
        };
        if let Some(span) = self.classify_node(node) {
            spans.push(span);
        }
        for child in children(node) {
            self.visit(Some(child), spans);
        }
    }

    /// The span a single node contributes, if any.
    pub fn classify_node(&self, node: Node<'a>) -> Option<Span> {
        match NodeKind::of(node) {
            NodeKind::LabeledStatement => {
                let label = label_of(node)?;
                let end = children(node)
                    .into_iter()
                    .find(|c| c.kind() == ":")
                    .map_or(label.end_byte(), |colon| colon.end_byte());
                let (line, column) = start_position(label);
                Some(Span {
                    category: TokenCategory::LabelReference,
                    line,
                    column,
                    byte_length: end - label.start_byte(),
                })
            }
            NodeKind::BreakStatement | NodeKind::ContinueStatement | NodeKind::GotoStatement => {
                label_of(node).map(|label| span_of(label, TokenCategory::LabelReference))
            }
            NodeKind::FunctionDeclaration | NodeKind::MethodDeclaration => node
                .child_by_field_name("name")
                .map(|name| span_of(name, TokenCategory::FunctionDeclaration)),
            NodeKind::CallExpression => self.classify_call(node),
            kind if kind.is_identifier() => self.classify_identifier(node),
            _ => None,
        }
    }

    fn classify_call(&self, call: Node<'a>) -> Option<Span> {
        let callee = call.child_by_field_name("function")?;
        match NodeKind::of(callee) {
            NodeKind::SelectorExpression => callee
                .child_by_field_name("field")
                .map(|field| span_of(field, TokenCategory::CallExpression)),
            NodeKind::Identifier => {
                let object = self.bindings.get(callee)?;
                (object.kind == BindingKind::Function)
                    .then(|| span_of(callee, TokenCategory::CallExpression))
            }
            _ => None,
        }
    }

    fn classify_identifier(&self, ident: Node<'a>) -> Option<Span> {
        if let Some(object) = self.bindings.get(ident) {
            let category = match object.kind {
                BindingKind::Type => TokenCategory::TypeReference,
                BindingKind::Constant
                    if object.const_type.as_ref().is_some_and(|t| t.is_named()) =>
                {
                    TokenCategory::ConstantReference
                }
                _ => return None,
            };
            return Some(span_of(ident, category));
        }

        let decl = self.resolution.get(ident)?;
        let category = match decl.kind {
            ObjectKind::TypeName if !decl.basic => TokenCategory::TypeReference,
            ObjectKind::Const if !decl.basic => TokenCategory::ConstantReference,
            _ => return None,
        };
        Some(span_of(ident, category))
    }
}

/// Classify a tree; an absent tree yields no spans.
pub fn classify(
    tree: Option<&SyntaxTree>,
    bindings: &Bindings,
    resolution: &ResolutionMap,
) -> Vec<Span> {
    match tree {
        Some(tree) => Classifier::new(tree, bindings, resolution).classify(),
        None => Vec::new(),
    }
}

fn span_of(node: Node<'_>, category: TokenCategory) -> Span {
    let (line, column) = start_position(node);
    Span {
        category,
        line,
        column,
        byte_length: node.end_byte() - node.start_byte(),
    }
}
