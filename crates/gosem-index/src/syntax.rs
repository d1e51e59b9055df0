//! Syntax tree wrapper and the closed set of Go node kinds gosem inspects.

use tree_sitter::{Node, Tree};

/// Go grammar node kinds relevant to binding, resolution, and classification.
///
/// Every other grammar kind maps to [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SourceFile,
    PackageClause,
    ImportDeclaration,
    ImportSpec,
    FunctionDeclaration,
    MethodDeclaration,
    FuncLiteral,
    TypeDeclaration,
    TypeSpec,
    TypeAlias,
    ConstDeclaration,
    ConstSpec,
    VarDeclaration,
    VarSpec,
    ParameterList,
    ParameterDeclaration,
    VariadicParameterDeclaration,
    TypeParameterList,
    TypeParameterDeclaration,
    Block,
    ShortVarDeclaration,
    ForStatement,
    RangeClause,
    IfStatement,
    ExpressionSwitchStatement,
    TypeSwitchStatement,
    ExpressionCase,
    TypeCase,
    DefaultCase,
    SelectStatement,
    CommunicationCase,
    ReceiveStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    GotoStatement,
    CallExpression,
    SelectorExpression,
    QualifiedType,
    GenericType,
    PointerType,
    KeyedElement,
    LiteralElement,
    StructType,
    InterfaceType,
    FieldDeclaration,
    MethodElem,
    FunctionType,
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    PackageIdentifier,
    LabelName,
    BlankIdentifier,
    Other,
}

impl NodeKind {
    pub fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "source_file" => Self::SourceFile,
            "package_clause" => Self::PackageClause,
            "import_declaration" => Self::ImportDeclaration,
            "import_spec" => Self::ImportSpec,
            "function_declaration" => Self::FunctionDeclaration,
            "method_declaration" => Self::MethodDeclaration,
            "func_literal" => Self::FuncLiteral,
            "type_declaration" => Self::TypeDeclaration,
            "type_spec" => Self::TypeSpec,
            "type_alias" => Self::TypeAlias,
            "const_declaration" => Self::ConstDeclaration,
            "const_spec" => Self::ConstSpec,
            "var_declaration" => Self::VarDeclaration,
            "var_spec" => Self::VarSpec,
            "parameter_list" => Self::ParameterList,
            "parameter_declaration" => Self::ParameterDeclaration,
            "variadic_parameter_declaration" => Self::VariadicParameterDeclaration,
            "type_parameter_list" => Self::TypeParameterList,
            "type_parameter_declaration" => Self::TypeParameterDeclaration,
            "block" => Self::Block,
            "short_var_declaration" => Self::ShortVarDeclaration,
            "for_statement" => Self::ForStatement,
            "range_clause" => Self::RangeClause,
            "if_statement" => Self::IfStatement,
            "expression_switch_statement" => Self::ExpressionSwitchStatement,
            "type_switch_statement" => Self::TypeSwitchStatement,
            "expression_case" => Self::ExpressionCase,
            "type_case" => Self::TypeCase,
            "default_case" => Self::DefaultCase,
            "select_statement" => Self::SelectStatement,
            "communication_case" => Self::CommunicationCase,
            "receive_statement" => Self::ReceiveStatement,
            "labeled_statement" => Self::LabeledStatement,
            "break_statement" => Self::BreakStatement,
            "continue_statement" => Self::ContinueStatement,
            "goto_statement" => Self::GotoStatement,
            "call_expression" => Self::CallExpression,
            "selector_expression" => Self::SelectorExpression,
            "qualified_type" => Self::QualifiedType,
            "generic_type" => Self::GenericType,
            "pointer_type" => Self::PointerType,
            "keyed_element" => Self::KeyedElement,
            "literal_element" => Self::LiteralElement,
            "struct_type" => Self::StructType,
            "interface_type" => Self::InterfaceType,
            "field_declaration" => Self::FieldDeclaration,
            // `method_spec` is the name older grammar releases used.
            "method_elem" | "method_spec" => Self::MethodElem,
            "function_type" => Self::FunctionType,
            "identifier" => Self::Identifier,
            "type_identifier" => Self::TypeIdentifier,
            "field_identifier" => Self::FieldIdentifier,
            "package_identifier" => Self::PackageIdentifier,
            "label_name" => Self::LabelName,
            "blank_identifier" => Self::BlankIdentifier,
            _ => Self::Other,
        }
    }

    /// Kinds that are a Go identifier occurrence (`*ast.Ident`) subject to
    /// semantic classification. Label names are handled by the label rules.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::TypeIdentifier | Self::FieldIdentifier | Self::PackageIdentifier
        )
    }
}

/// A parsed Go source buffer.
///
/// Owns the source bytes the tree was built from; all node text and positions
/// are taken relative to them.
pub struct SyntaxTree {
    name: String,
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    pub(crate) fn new(name: String, source: String, tree: Tree) -> Self {
        Self { name, source, tree }
    }

    /// Virtual file name the buffer was parsed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("name", &self.name)
            .field("root", &self.tree.root_node().to_sexp())
            .finish()
    }
}

// ── Node helpers ──────────────────────────────────────────────────────────

pub(crate) fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub(crate) fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Whether `node` is one of the nodes stored under `field` in its parent.
pub(crate) fn is_field_of_parent(node: Node<'_>, field: &str) -> bool {
    node.parent()
        .is_some_and(|parent| field_children(parent, field).iter().any(|c| c.id() == node.id()))
}

/// Identifier nodes below `node` (or `node` itself), in document order.
///
/// Used for declaration lists like `a, b` in `a, b := f()`.
pub(crate) fn identifiers_in<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    if NodeKind::of(node) == NodeKind::Identifier {
        return vec![node];
    }
    named_children(node)
        .into_iter()
        .filter(|c| NodeKind::of(*c) == NodeKind::Identifier)
        .collect()
}

/// 1-based line and byte column of a node's start, as Go reports them.
pub(crate) fn start_position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}
