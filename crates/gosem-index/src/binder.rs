//! Local declaration binding.
//!
//! Attaches identifier occurrences to the declarations visible at that point
//! in the same file, following Go's block scoping: package-level declarations
//! are visible everywhere in the file (forward references included), function
//! parameters and body share the function scope, and `if`/`for`/`switch`/case
//! clauses open nested scopes. Imports, universe names and selector fields are
//! left unbound; those are the resolver's job.
//!
//! Constants also get a coarse type so that the classifier can tell
//! enumerator-like constants (`const Monday Weekday = 1`) from plain untyped
//! ones (`const Pi = 3.14`).

use crate::syntax::{
    children, field_children, identifiers_in, named_children, NodeKind, SyntaxTree,
};
use crate::universe;
use std::collections::HashMap;
use tree_sitter::Node;

/// Upper bound on fixpoint passes over package-level constant types.
const MAX_CONST_PASSES: usize = 8;

/// What a locally declared object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Constant,
    Type,
    Variable,
    Function,
    Label,
}

/// Inferred type of a constant declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstType {
    /// Predeclared basic type or untyped constant.
    Basic,
    /// A declared (non-basic) type, by name.
    Named(String),
    /// Could not be decided from the file alone.
    Unknown,
}

impl ConstType {
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

/// A declaration found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub kind: BindingKind,
    /// Set for constants only.
    pub const_type: Option<ConstType>,
}

/// Identifier occurrences (by node id) mapped to the objects they denote.
#[derive(Debug, Default)]
pub struct Bindings {
    objects: Vec<Object>,
    uses: HashMap<usize, usize>,
}

impl Bindings {
    /// The object an identifier node is bound to, if any. Declaring
    /// occurrences are bound to the object they declare.
    pub fn get(&self, node: Node<'_>) -> Option<&Object> {
        self.uses
            .get(&node.id())
            .and_then(|&id| self.objects.get(id))
    }

    pub fn is_bound(&self, node: Node<'_>) -> bool {
        self.uses.contains_key(&node.id())
    }

    /// Number of declared objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of bound identifier occurrences.
    pub fn len(&self) -> usize {
        self.uses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }
}

/// Bind every identifier occurrence in `tree` to its local declaration.
pub fn bind(tree: &SyntaxTree) -> Bindings {
    let mut binder = Binder {
        tree,
        objects: Vec::new(),
        uses: HashMap::new(),
        scopes: vec![HashMap::new()],
        labels: Vec::new(),
    };
    binder.bind_file(tree.root());
    Bindings {
        objects: binder.objects,
        uses: binder.uses,
    }
}

struct Binder<'t> {
    tree: &'t SyntaxTree,
    objects: Vec<Object>,
    uses: HashMap<usize, usize>,
    /// Innermost scope last; `scopes[0]` is the file scope.
    scopes: Vec<HashMap<String, usize>>,
    /// One label scope per enclosing function body.
    labels: Vec<HashMap<String, usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ConstMode {
    /// Package level: names already declared, only refresh their types.
    Refresh,
    /// Function level: resolve the spec, then declare its names.
    Declare,
}

impl<'t> Binder<'t> {
    // ── File level ──────────────────────────────────────────────────────

    fn bind_file(&mut self, root: Node<'t>) {
        let decls = named_children(root);

        for &decl in &decls {
            self.declare_package_level(decl);
        }

        let const_decls: Vec<Node<'t>> = decls
            .iter()
            .copied()
            .filter(|d| NodeKind::of(*d) == NodeKind::ConstDeclaration)
            .collect();
        for _ in 0..MAX_CONST_PASSES {
            let mut changed = false;
            for &decl in &const_decls {
                changed |= self.bind_const_declaration(decl, ConstMode::Refresh);
            }
            if !changed {
                break;
            }
        }

        for decl in decls {
            self.walk_package_level(decl);
        }
    }

    fn declare_package_level(&mut self, decl: Node<'t>) {
        match NodeKind::of(decl) {
            NodeKind::FunctionDeclaration => {
                if let Some(name) = decl.child_by_field_name("name") {
                    // `init` functions cannot be referred to.
                    if self.tree.text(name) != "init" {
                        self.declare(name, BindingKind::Function, None);
                    }
                }
            }
            NodeKind::TypeDeclaration => {
                for spec in named_children(decl) {
                    if let Some(name) = spec.child_by_field_name("name") {
                        self.declare(name, BindingKind::Type, None);
                    }
                }
            }
            NodeKind::ConstDeclaration => {
                for spec in const_specs(decl) {
                    for name in field_children(spec, "name") {
                        self.declare(name, BindingKind::Constant, Some(ConstType::Unknown));
                    }
                }
            }
            NodeKind::VarDeclaration => {
                for spec in var_specs(decl) {
                    for name in field_children(spec, "name") {
                        self.declare(name, BindingKind::Variable, None);
                    }
                }
            }
            _ => {}
        }
    }

    fn walk_package_level(&mut self, decl: Node<'t>) {
        match NodeKind::of(decl) {
            NodeKind::PackageClause | NodeKind::ImportDeclaration => {}
            NodeKind::FunctionDeclaration | NodeKind::MethodDeclaration => {
                self.walk_function(decl)
            }
            NodeKind::TypeDeclaration => {
                for spec in named_children(decl) {
                    self.walk_type_spec(spec, false);
                }
            }
            NodeKind::ConstDeclaration => {
                for spec in const_specs(decl) {
                    self.walk_spec_expressions(spec);
                }
            }
            NodeKind::VarDeclaration => {
                for spec in var_specs(decl) {
                    self.walk_spec_expressions(spec);
                }
            }
            _ => self.walk(decl),
        }
    }

    // ── Scopes ──────────────────────────────────────────────────────────

    fn open_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn close_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(
        &mut self,
        ident: Node<'t>,
        kind: BindingKind,
        const_type: Option<ConstType>,
    ) -> Option<usize> {
        let name = self.tree.text(ident);
        if name.is_empty() || name == "_" {
            return None;
        }
        let id = self.objects.len();
        self.objects.push(Object {
            name: name.to_string(),
            kind,
            const_type,
        });
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), id);
        }
        self.uses.insert(ident.id(), id);
        Some(id)
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn lookup_object(&self, name: &str) -> Option<&Object> {
        self.lookup(name).and_then(|id| self.objects.get(id))
    }

    fn resolve(&mut self, ident: Node<'t>) {
        if let Some(id) = self.lookup(self.tree.text(ident)) {
            self.uses.insert(ident.id(), id);
        }
    }

    // ── Declarations ────────────────────────────────────────────────────

    /// Shared by function/method declarations and function literals.
    fn walk_function(&mut self, node: Node<'t>) {
        self.open_scope();
        if let Some(receiver) = node.child_by_field_name("receiver") {
            self.walk_receiver(receiver);
        }
        if let Some(type_params) = node.child_by_field_name("type_parameters") {
            self.walk_type_parameters(type_params);
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            self.walk_parameters(params);
        }
        if let Some(result) = node.child_by_field_name("result") {
            self.walk_result(result);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.labels.push(HashMap::new());
            self.collect_labels(body);
            for stmt in named_children(body) {
                self.walk(stmt);
            }
            self.labels.pop();
        }
        self.close_scope();
    }

    /// `(l *List[T])`: receiver type parameters are declared by the receiver.
    fn walk_receiver(&mut self, receiver: Node<'t>) {
        for param in named_children(receiver) {
            if NodeKind::of(param) != NodeKind::ParameterDeclaration {
                continue;
            }
            if let Some(ty) = param.child_by_field_name("type") {
                self.walk_receiver_type(ty);
            }
            for name in field_children(param, "name") {
                self.declare(name, BindingKind::Variable, None);
            }
        }
    }

    fn walk_receiver_type(&mut self, ty: Node<'t>) {
        match NodeKind::of(ty) {
            NodeKind::PointerType => {
                for inner in named_children(ty) {
                    self.walk_receiver_type(inner);
                }
            }
            NodeKind::GenericType => {
                if let Some(base) = ty.child_by_field_name("type") {
                    self.walk(base);
                }
                if let Some(args) = ty.child_by_field_name("type_arguments") {
                    for param in descendants_of_kind(args, NodeKind::TypeIdentifier) {
                        self.declare(param, BindingKind::Type, None);
                    }
                }
            }
            _ => self.walk(ty),
        }
    }

    fn walk_type_parameters(&mut self, list: Node<'t>) {
        let decls: Vec<Node<'t>> = named_children(list)
            .into_iter()
            .filter(|d| NodeKind::of(*d) == NodeKind::TypeParameterDeclaration)
            .collect();
        for &decl in &decls {
            for name in field_children(decl, "name") {
                self.declare(name, BindingKind::Type, None);
            }
        }
        for decl in decls {
            if let Some(constraint) = decl.child_by_field_name("type") {
                self.walk(constraint);
            }
        }
    }

    /// Parameter types are resolved before any parameter name is declared.
    fn walk_parameters(&mut self, list: Node<'t>) {
        let params: Vec<Node<'t>> = named_children(list)
            .into_iter()
            .filter(|p| {
                matches!(
                    NodeKind::of(*p),
                    NodeKind::ParameterDeclaration | NodeKind::VariadicParameterDeclaration
                )
            })
            .collect();
        for &param in &params {
            if let Some(ty) = param.child_by_field_name("type") {
                self.walk(ty);
            }
        }
        for param in params {
            for name in field_children(param, "name") {
                self.declare(name, BindingKind::Variable, None);
            }
        }
    }

    fn walk_result(&mut self, result: Node<'t>) {
        if NodeKind::of(result) == NodeKind::ParameterList {
            self.walk_parameters(result);
        } else {
            self.walk(result);
        }
    }

    /// `type_spec` / `type_alias`. The name is in scope inside its own
    /// definition so recursive types resolve.
    fn walk_type_spec(&mut self, spec: Node<'t>, declare_name: bool) {
        if !matches!(NodeKind::of(spec), NodeKind::TypeSpec | NodeKind::TypeAlias) {
            return;
        }
        if declare_name {
            if let Some(name) = spec.child_by_field_name("name") {
                self.declare(name, BindingKind::Type, None);
            }
        }
        self.open_scope();
        if let Some(type_params) = spec.child_by_field_name("type_parameters") {
            self.walk_type_parameters(type_params);
        }
        if let Some(ty) = spec.child_by_field_name("type") {
            self.walk(ty);
        }
        self.close_scope();
    }

    /// Walk the type and value expressions of a const/var spec, not its names.
    fn walk_spec_expressions(&mut self, spec: Node<'t>) {
        if let Some(ty) = spec.child_by_field_name("type") {
            self.walk(ty);
        }
        if let Some(value) = spec.child_by_field_name("value") {
            self.walk(value);
        }
    }

    fn walk_local_var_declaration(&mut self, decl: Node<'t>) {
        for spec in var_specs(decl) {
            self.walk_spec_expressions(spec);
            for name in field_children(spec, "name") {
                self.declare(name, BindingKind::Variable, None);
            }
        }
    }

    /// Bind the names of a const declaration with their inferred types.
    ///
    /// Specs without type and value repeat the previous spec of the group.
    /// Returns whether any package-level constant type changed.
    fn bind_const_declaration(&mut self, decl: Node<'t>, mode: ConstMode) -> bool {
        let mut inherited: (Option<Node<'t>>, Vec<Node<'t>>) = (None, Vec::new());
        let mut changed = false;

        for spec in const_specs(decl) {
            let explicit_type = spec.child_by_field_name("type");
            let values = spec
                .child_by_field_name("value")
                .map(named_children)
                .unwrap_or_default();

            if mode == ConstMode::Declare {
                self.walk_spec_expressions(spec);
            }
            if explicit_type.is_some() || !values.is_empty() {
                inherited = (explicit_type, values);
            }
            let (ty, values) = &inherited;

            for (i, name) in field_children(spec, "name").into_iter().enumerate() {
                let const_type = match ty {
                    Some(ty) => self.type_class(*ty),
                    None => values
                        .get(i)
                        .map_or(ConstType::Unknown, |v| self.infer_const(*v)),
                };
                match mode {
                    ConstMode::Declare => {
                        self.declare(name, BindingKind::Constant, Some(const_type));
                    }
                    ConstMode::Refresh => {
                        let Some(&id) = self.uses.get(&name.id()) else {
                            continue;
                        };
                        if let Some(object) = self.objects.get_mut(id) {
                            if object.const_type.as_ref() != Some(&const_type) {
                                object.const_type = Some(const_type);
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        changed
    }

    // ── Constant types ──────────────────────────────────────────────────

    fn type_class(&self, ty: Node<'t>) -> ConstType {
        match NodeKind::of(ty) {
            NodeKind::TypeIdentifier => {
                let name = self.tree.text(ty);
                match self.lookup_object(name) {
                    Some(obj) if obj.kind == BindingKind::Type => ConstType::Named(obj.name.clone()),
                    Some(_) => ConstType::Unknown,
                    None if universe::is_basic_type(name) => ConstType::Basic,
                    None => ConstType::Unknown,
                }
            }
            NodeKind::QualifiedType | NodeKind::GenericType => {
                ConstType::Named(self.tree.text(ty).to_string())
            }
            _ if ty.kind() == "parenthesized_type" => named_children(ty)
                .first()
                .map_or(ConstType::Unknown, |inner| self.type_class(*inner)),
            _ => ConstType::Unknown,
        }
    }

    fn infer_const(&self, expr: Node<'t>) -> ConstType {
        match expr.kind() {
            "int_literal" | "float_literal" | "imaginary_literal" | "rune_literal"
            | "interpreted_string_literal" | "raw_string_literal" | "true" | "false" | "iota" => {
                ConstType::Basic
            }
            "identifier" => {
                let name = self.tree.text(expr);
                match self.lookup_object(name) {
                    Some(obj) if obj.kind == BindingKind::Constant => {
                        obj.const_type.clone().unwrap_or(ConstType::Unknown)
                    }
                    Some(_) => ConstType::Unknown,
                    None if matches!(name, "true" | "false" | "iota") => ConstType::Basic,
                    None => ConstType::Unknown,
                }
            }
            "parenthesized_expression" => named_children(expr)
                .first()
                .map_or(ConstType::Unknown, |inner| self.infer_const(*inner)),
            "unary_expression" => expr
                .child_by_field_name("operand")
                .map_or(ConstType::Unknown, |operand| self.infer_const(operand)),
            "binary_expression" => self.infer_binary(expr),
            "call_expression" => self.infer_conversion(expr),
            "type_conversion_expression" => expr
                .child_by_field_name("type")
                .map_or(ConstType::Unknown, |ty| self.type_class(ty)),
            _ => ConstType::Unknown,
        }
    }

    fn infer_binary(&self, expr: Node<'t>) -> ConstType {
        let operator = expr
            .child_by_field_name("operator")
            .map(|op| self.tree.text(op))
            .unwrap_or("");
        let left = expr.child_by_field_name("left");
        let right = expr.child_by_field_name("right");

        match operator {
            "==" | "!=" | "<" | "<=" | ">" | ">=" => ConstType::Basic,
            "<<" | ">>" => left.map_or(ConstType::Unknown, |l| self.infer_const(l)),
            _ => {
                let left = left.map_or(ConstType::Unknown, |l| self.infer_const(l));
                let right = right.map_or(ConstType::Unknown, |r| self.infer_const(r));
                match (left, right) {
                    (named @ ConstType::Named(_), _) | (_, named @ ConstType::Named(_)) => named,
                    (ConstType::Basic, ConstType::Basic) => ConstType::Basic,
                    _ => ConstType::Unknown,
                }
            }
        }
    }

    /// `Weekday(3)` is a conversion when the callee is a type.
    fn infer_conversion(&self, call: Node<'t>) -> ConstType {
        let Some(function) = call.child_by_field_name("function") else {
            return ConstType::Unknown;
        };
        if NodeKind::of(function) != NodeKind::Identifier {
            return ConstType::Unknown;
        }
        let name = self.tree.text(function);
        match self.lookup_object(name) {
            Some(obj) if obj.kind == BindingKind::Type => ConstType::Named(obj.name.clone()),
            Some(_) => ConstType::Unknown,
            None if universe::is_basic_type(name) => ConstType::Basic,
            None => ConstType::Unknown,
        }
    }

    // ── Labels ──────────────────────────────────────────────────────────

    /// Labels are visible in the whole function body, so they are declared
    /// before the body is walked. Nested function literals have their own.
    fn collect_labels(&mut self, node: Node<'t>) {
        for child in named_children(node) {
            match NodeKind::of(child) {
                NodeKind::FuncLiteral => continue,
                NodeKind::LabeledStatement => {
                    if let Some(label) = label_of(child) {
                        self.declare_label(label);
                    }
                }
                _ => {}
            }
            self.collect_labels(child);
        }
    }

    fn declare_label(&mut self, label: Node<'t>) {
        let name = self.tree.text(label);
        let id = self.objects.len();
        self.objects.push(Object {
            name: name.to_string(),
            kind: BindingKind::Label,
            const_type: None,
        });
        if let Some(scope) = self.labels.last_mut() {
            scope.insert(name.to_string(), id);
        }
        self.uses.insert(label.id(), id);
    }

    fn resolve_label(&mut self, label: Node<'t>) {
        let name = self.tree.text(label);
        let id = self.labels.last().and_then(|scope| scope.get(name).copied());
        if let Some(id) = id {
            self.uses.insert(label.id(), id);
        }
    }

    // ── Statements and expressions ──────────────────────────────────────

    fn walk(&mut self, node: Node<'t>) {
        match NodeKind::of(node) {
            NodeKind::FunctionDeclaration
            | NodeKind::MethodDeclaration
            | NodeKind::FuncLiteral => self.walk_function(node),
            NodeKind::Block
            | NodeKind::ForStatement
            | NodeKind::IfStatement
            | NodeKind::ExpressionSwitchStatement
            | NodeKind::ExpressionCase
            | NodeKind::DefaultCase
            | NodeKind::CommunicationCase => {
                self.open_scope();
                self.walk_children(node);
                self.close_scope();
            }
            NodeKind::TypeDeclaration => {
                for spec in named_children(node) {
                    self.walk_type_spec(spec, true);
                }
            }
            NodeKind::ConstDeclaration => {
                self.bind_const_declaration(node, ConstMode::Declare);
            }
            NodeKind::VarDeclaration => self.walk_local_var_declaration(node),
            NodeKind::ShortVarDeclaration => self.walk_short_var_declaration(node),
            NodeKind::RangeClause | NodeKind::ReceiveStatement => {
                if has_define_token(node) {
                    self.walk_define(node);
                } else {
                    self.walk_children(node);
                }
            }
            NodeKind::TypeSwitchStatement => self.walk_type_switch(node),
            NodeKind::LabeledStatement => {
                for child in named_children(node) {
                    if NodeKind::of(child) != NodeKind::LabelName {
                        self.walk(child);
                    }
                }
            }
            NodeKind::BreakStatement | NodeKind::ContinueStatement | NodeKind::GotoStatement => {
                if let Some(label) = label_of(node) {
                    self.resolve_label(label);
                }
            }
            NodeKind::SelectorExpression => {
                // The selected field or method is never a local declaration.
                if let Some(operand) = node.child_by_field_name("operand") {
                    self.walk(operand);
                }
            }
            NodeKind::QualifiedType => {}
            NodeKind::StructType => {
                self.open_scope();
                self.walk_struct_fields(node);
                self.close_scope();
            }
            NodeKind::InterfaceType => {
                self.open_scope();
                self.walk_interface(node);
                self.close_scope();
            }
            NodeKind::FunctionType => {
                self.open_scope();
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.walk_parameters(params);
                }
                if let Some(result) = node.child_by_field_name("result") {
                    self.walk_result(result);
                }
                self.close_scope();
            }
            NodeKind::Identifier | NodeKind::TypeIdentifier => self.resolve(node),
            NodeKind::FieldIdentifier
            | NodeKind::PackageIdentifier
            | NodeKind::LabelName
            | NodeKind::BlankIdentifier
            | NodeKind::PackageClause
            | NodeKind::ImportDeclaration
            | NodeKind::ImportSpec => {}
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: Node<'t>) {
        for child in named_children(node) {
            self.walk(child);
        }
    }

    /// `a, b := x, y`: names already declared in the current scope are
    /// reassigned, the rest are new variables.
    fn walk_short_var_declaration(&mut self, node: Node<'t>) {
        if let Some(right) = node.child_by_field_name("right") {
            self.walk(right);
        }
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        for ident in identifiers_in(left) {
            let name = self.tree.text(ident);
            let existing = self.scopes.last().and_then(|s| s.get(name).copied());
            match existing {
                Some(id) => {
                    self.uses.insert(ident.id(), id);
                }
                None => {
                    self.declare(ident, BindingKind::Variable, None);
                }
            }
        }
    }

    /// `for k, v := range m` and `case v := <-ch`.
    fn walk_define(&mut self, node: Node<'t>) {
        if let Some(right) = node.child_by_field_name("right") {
            self.walk(right);
        }
        if let Some(left) = node.child_by_field_name("left") {
            for ident in identifiers_in(left) {
                self.declare(ident, BindingKind::Variable, None);
            }
        }
    }

    /// `switch v := x.(type) { ... }` declares `v` anew in every clause.
    fn walk_type_switch(&mut self, node: Node<'t>) {
        self.open_scope();
        if let Some(init) = node.child_by_field_name("initializer") {
            self.walk(init);
        }
        if let Some(value) = node.child_by_field_name("value") {
            self.walk(value);
        }
        let aliases: Vec<Node<'t>> = field_children(node, "alias")
            .into_iter()
            .flat_map(identifiers_in)
            .collect();

        for clause in named_children(node) {
            if !matches!(
                NodeKind::of(clause),
                NodeKind::TypeCase | NodeKind::DefaultCase
            ) {
                continue;
            }
            self.open_scope();
            for &alias in &aliases {
                self.declare(alias, BindingKind::Variable, None);
            }
            self.walk_children(clause);
            self.close_scope();
        }
        self.close_scope();
    }

    /// Field types are resolved before any field name is declared, so a
    /// field named like a type does not shadow it for later fields.
    fn walk_struct_fields(&mut self, node: Node<'t>) {
        let fields = descendants_of_kind(node, NodeKind::FieldDeclaration);
        for field in &fields {
            if let Some(ty) = field.child_by_field_name("type") {
                self.walk(ty);
            }
        }
        for field in &fields {
            for name in field_children(*field, "name") {
                self.declare(name, BindingKind::Variable, None);
            }
        }
    }

    /// Same order as struct fields: signatures and embedded types first,
    /// then method names.
    fn walk_interface(&mut self, node: Node<'t>) {
        let elems = named_children(node);
        for &elem in &elems {
            if NodeKind::of(elem) != NodeKind::MethodElem {
                self.walk(elem);
                continue;
            }
            self.open_scope();
            if let Some(params) = elem.child_by_field_name("parameters") {
                self.walk_parameters(params);
            }
            if let Some(result) = elem.child_by_field_name("result") {
                self.walk_result(result);
            }
            self.close_scope();
        }
        for &elem in &elems {
            if NodeKind::of(elem) != NodeKind::MethodElem {
                continue;
            }
            if let Some(name) = elem.child_by_field_name("name") {
                self.declare(name, BindingKind::Function, None);
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

fn const_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    named_children(decl)
        .into_iter()
        .filter(|s| NodeKind::of(*s) == NodeKind::ConstSpec)
        .collect()
}

/// `var_spec` nodes, also inside a parenthesized `var_spec_list`.
fn var_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut specs = Vec::new();
    for child in named_children(decl) {
        match NodeKind::of(child) {
            NodeKind::VarSpec => specs.push(child),
            _ if child.kind() == "var_spec_list" => specs.extend(
                named_children(child)
                    .into_iter()
                    .filter(|s| NodeKind::of(*s) == NodeKind::VarSpec),
            ),
            _ => {}
        }
    }
    specs
}

fn has_define_token(node: Node<'_>) -> bool {
    children(node).iter().any(|c| c.kind() == ":=")
}

/// The label name of a labeled statement or branch statement.
pub(crate) fn label_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("label").or_else(|| {
        named_children(node)
            .into_iter()
            .find(|c| NodeKind::of(*c) == NodeKind::LabelName)
    })
}

/// All descendants of the given kind, not descending into matches.
fn descendants_of_kind(node: Node<'_>, kind: NodeKind) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    for child in named_children(node) {
        if NodeKind::of(child) == kind {
            found.push(child);
        } else {
            found.extend(descendants_of_kind(child, kind));
        }
    }
    found
}
