//! Resolution of identifiers the binder could not attach to a local
//! declaration: import names, members of imported packages, dot-imported
//! names and the universe scope.
//!
//! Only uses are recorded. Declaring occurrences, `_`, labels and the package
//! clause never get an entry. Failures are collected as diagnostics and do not
//! stop resolution of the rest of the file.

use crate::binder::Bindings;
use crate::catalog::{Catalog, PackageExports};
use crate::syntax::{is_field_of_parent, named_children, start_position, NodeKind, SyntaxTree};
use crate::universe;
use gosem_core::Diagnostic;
use std::collections::HashMap;
use tree_sitter::Node;

/// Kind of object a used identifier denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    TypeName,
    Const,
    Var,
    Func,
    PackageName,
    Builtin,
    Nil,
}

/// The object an identifier use resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: ObjectKind,
    /// Whether the object's type is a predeclared basic type.
    pub basic: bool,
}

impl Declaration {
    fn package(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ObjectKind::PackageName,
            basic: false,
        }
    }

    fn named_type(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ObjectKind::TypeName,
            basic: false,
        }
    }
}

/// Identifier node id -> resolved declaration.
#[derive(Debug, Default)]
pub struct ResolutionMap {
    uses: HashMap<usize, Declaration>,
}

impl ResolutionMap {
    pub fn get(&self, node: Node<'_>) -> Option<&Declaration> {
        self.uses.get(&node.id())
    }

    pub fn len(&self) -> usize {
        self.uses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    fn insert(&mut self, node: Node<'_>, decl: Declaration) {
        self.uses.insert(node.id(), decl);
    }
}

/// Resolve every unbound identifier use in `tree`.
pub fn resolve(
    tree: &SyntaxTree,
    bindings: &Bindings,
    catalog: &Catalog,
) -> (ResolutionMap, Vec<Diagnostic>) {
    let mut resolver = Resolver {
        tree,
        bindings,
        catalog,
        imports: HashMap::new(),
        dot_imports: Vec::new(),
        opaque_dot_import: false,
        map: ResolutionMap::default(),
        diagnostics: Vec::new(),
    };
    let root = tree.root();
    resolver.collect_imports(root);
    resolver.visit(root);
    (resolver.map, resolver.diagnostics)
}

struct Resolver<'a> {
    tree: &'a SyntaxTree,
    bindings: &'a Bindings,
    catalog: &'a Catalog,
    /// Local import name -> catalog entry (`None` when the path is not listed).
    imports: HashMap<String, Option<&'a PackageExports>>,
    dot_imports: Vec<&'a PackageExports>,
    /// A dot import of an unlisted package may provide any name.
    opaque_dot_import: bool,
    map: ResolutionMap,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    // ── Imports ─────────────────────────────────────────────────────────

    fn collect_imports(&mut self, root: Node<'_>) {
        for decl in named_children(root) {
            if NodeKind::of(decl) != NodeKind::ImportDeclaration {
                continue;
            }
            for spec in import_specs(decl) {
                self.add_import(spec);
            }
        }
    }

    fn add_import(&mut self, spec: Node<'_>) {
        let Some(path_node) = spec.child_by_field_name("path") else {
            return;
        };
        let path = unquote(self.tree.text(path_node));
        let alias = spec.child_by_field_name("name");
        let alias_text = alias.map(|a| self.tree.text(a));

        // cgo pseudo-package.
        if path == "C" {
            self.imports.insert("C".to_string(), None);
            return;
        }

        let catalog: &'a Catalog = self.catalog;
        let package = catalog.package(path);
        if package.is_none() {
            self.report(path_node, format!("could not import {path}"));
        }

        match alias_text {
            Some("_") => {}
            Some(".") => match package {
                Some(package) => self.dot_imports.push(package),
                None => self.opaque_dot_import = true,
            },
            Some(name) => {
                self.imports.insert(name.to_string(), package);
            }
            None => {
                let name = package
                    .map(PackageExports::package_name)
                    .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path));
                self.imports.insert(name.to_string(), package);
            }
        }
    }

    // ── Traversal ───────────────────────────────────────────────────────

    fn visit(&mut self, node: Node<'_>) {
        match NodeKind::of(node) {
            NodeKind::PackageClause | NodeKind::ImportDeclaration => {}
            NodeKind::SelectorExpression => self.visit_selector(node),
            NodeKind::QualifiedType => self.visit_qualified_type(node),
            NodeKind::KeyedElement => self.visit_keyed_element(node),
            NodeKind::Identifier | NodeKind::TypeIdentifier => self.resolve_ident(node, true),
            NodeKind::FieldIdentifier
            | NodeKind::PackageIdentifier
            | NodeKind::LabelName
            | NodeKind::BlankIdentifier => {}
            _ => {
                for child in named_children(node) {
                    self.visit(child);
                }
            }
        }
    }

    /// `pkg.Member` resolves through the catalog; `value.field` only
    /// resolves the operand.
    fn visit_selector(&mut self, node: Node<'_>) {
        let Some(operand) = node.child_by_field_name("operand") else {
            return;
        };
        if let Some(package) = self.import_operand(operand) {
            self.map
                .insert(operand, Declaration::package(self.tree.text(operand)));
            let member = node.child_by_field_name("field");
            if let (Some(package), Some(member)) = (package, member) {
                if let Some(decl) = package.lookup(self.tree.text(member)) {
                    self.map.insert(member, decl);
                }
            }
            return;
        }
        self.visit(operand);
    }

    /// Catalog entry for an operand that names an import, if it does.
    fn import_operand(&self, operand: Node<'_>) -> Option<Option<&'a PackageExports>> {
        if NodeKind::of(operand) != NodeKind::Identifier || self.bindings.is_bound(operand) {
            return None;
        }
        self.imports.get(self.tree.text(operand)).copied()
    }

    fn visit_qualified_type(&mut self, node: Node<'_>) {
        let package_node = node.child_by_field_name("package");
        let name_node = node.child_by_field_name("name");
        let (Some(package_node), Some(name_node)) = (package_node, name_node) else {
            return;
        };
        let package_name = self.tree.text(package_node);
        let Some(&package) = self.imports.get(package_name) else {
            self.report(package_node, format!("undefined: {package_name}"));
            return;
        };
        self.map
            .insert(package_node, Declaration::package(package_name));

        let member = self.tree.text(name_node);
        let decl = package
            .and_then(|p| p.lookup(member))
            .filter(|d| d.kind == ObjectKind::TypeName)
            .unwrap_or_else(|| Declaration::named_type(member));
        self.map.insert(name_node, decl);
    }

    /// Composite literal keys may be struct field names, so an identifier
    /// key that does not resolve is not an error.
    fn visit_keyed_element(&mut self, node: Node<'_>) {
        let elements = named_children(node);
        let Some((&key, values)) = elements.split_first() else {
            return;
        };
        let key = if NodeKind::of(key) == NodeKind::LiteralElement {
            named_children(key).first().copied().unwrap_or(key)
        } else {
            key
        };
        if NodeKind::of(key) == NodeKind::Identifier {
            self.resolve_ident(key, false);
        } else {
            self.visit(key);
        }
        for &value in values {
            self.visit(value);
        }
    }

    fn resolve_ident(&mut self, ident: Node<'_>, report: bool) {
        let name = self.tree.text(ident);
        if name == "_" || self.bindings.is_bound(ident) || is_field_of_parent(ident, "name") {
            return;
        }
        match self.lookup(name) {
            Some(decl) => self.map.insert(ident, decl),
            None if report && !self.opaque_dot_import => {
                self.report(ident, format!("undefined: {name}"));
            }
            None => {}
        }
    }

    /// File scope (imports, dot-imported members), then universe.
    fn lookup(&self, name: &str) -> Option<Declaration> {
        if self.imports.contains_key(name) {
            return Some(Declaration::package(name));
        }
        self.dot_imports
            .iter()
            .find_map(|package| package.lookup(name))
            .or_else(|| universe::lookup(name))
    }

    fn report(&mut self, node: Node<'_>, message: String) {
        let (line, column) = start_position(node);
        self.diagnostics
            .push(Diagnostic::new(self.tree.name(), line, column, message));
    }
}

/// `import_spec` nodes of a declaration, also inside an `import_spec_list`.
fn import_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut specs = Vec::new();
    for child in named_children(decl) {
        match NodeKind::of(child) {
            NodeKind::ImportSpec => specs.push(child),
            _ if child.kind() == "import_spec_list" => specs.extend(
                named_children(child)
                    .into_iter()
                    .filter(|s| NodeKind::of(*s) == NodeKind::ImportSpec),
            ),
            _ => {}
        }
    }
    specs
}

/// Strip the quotes of an interpreted or raw string literal.
fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            literal
                .strip_prefix('`')
                .and_then(|s| s.strip_suffix('`'))
        })
        .unwrap_or(literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind;
    use crate::parser::GoParser;
    use crate::syntax::children;

    struct Resolved {
        tree: SyntaxTree,
        map: ResolutionMap,
        diagnostics: Vec<Diagnostic>,
    }

    fn resolve_source(source: &str) -> Resolved {
        let tree = GoParser::new().parse("test.go", source).expect("valid Go");
        let bindings = bind(&tree);
        let (map, diagnostics) = resolve(&tree, &bindings, Catalog::embedded());
        Resolved {
            tree,
            map,
            diagnostics,
        }
    }

    impl Resolved {
        fn find(&self, text: &str) -> Vec<Node<'_>> {
            fn collect<'t>(
                tree: &'t SyntaxTree,
                node: Node<'t>,
                text: &str,
                out: &mut Vec<Node<'t>>,
            ) {
                if NodeKind::of(node).is_identifier() && tree.text(node) == text {
                    out.push(node);
                }
                for child in children(node) {
                    collect(tree, child, text, out);
                }
            }
            let mut out = Vec::new();
            collect(&self.tree, self.tree.root(), text, &mut out);
            out
        }

        fn decls(&self, text: &str) -> Vec<Option<Declaration>> {
            self.find(text)
                .into_iter()
                .map(|n| self.map.get(n).cloned())
                .collect()
        }
    }

    #[test]
    fn imported_types_and_constants() {
        let r = resolve_source(
            r#"package main

import "time"

func wait(d time.Duration) time.Weekday {
	return time.Monday
}
"#,
        );
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);

        let duration = r.decls("Duration");
        assert_eq!(duration.len(), 1);
        let duration = duration[0].clone().unwrap();
        assert_eq!(duration.kind, ObjectKind::TypeName);
        assert!(!duration.basic);

        let monday = r.decls("Monday")[0].clone().unwrap();
        assert_eq!(monday.kind, ObjectKind::Const);
        assert!(!monday.basic);

        for time in r.decls("time") {
            assert_eq!(time.unwrap().kind, ObjectKind::PackageName);
        }
    }

    #[test]
    fn universe_names() {
        let r = resolve_source(
            r#"package main

func f(s string) error {
	n := len(s)
	_ = n > 0 && true
	return nil
}
"#,
        );
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);

        let string = r.decls("string")[0].clone().unwrap();
        assert_eq!(string.kind, ObjectKind::TypeName);
        assert!(string.basic);

        let error = r.decls("error")[0].clone().unwrap();
        assert_eq!(error.kind, ObjectKind::TypeName);
        assert!(!error.basic);

        assert_eq!(r.decls("len")[0].clone().unwrap().kind, ObjectKind::Builtin);
        assert_eq!(r.decls("nil")[0].clone().unwrap().kind, ObjectKind::Nil);
        assert_eq!(r.decls("true")[0].clone().unwrap().kind, ObjectKind::Const);
    }

    #[test]
    fn local_bindings_are_not_resolved() {
        let r = resolve_source(
            r#"package main

type Weekday int

func f() Weekday { var w Weekday; return w }
"#,
        );
        assert!(r.decls("Weekday").iter().all(Option::is_none));
        assert!(r.decls("w").iter().all(Option::is_none));
    }

    #[test]
    fn undefined_names_are_reported() {
        let r = resolve_source("package main\n\nfunc f() {\n\tmissing()\n}\n");
        assert_eq!(r.diagnostics.len(), 1);
        let diag = &r.diagnostics[0];
        assert_eq!(diag.message, "undefined: missing");
        assert_eq!((diag.line, diag.column), (4, 2));
        assert_eq!(diag.to_string(), "test.go:4:2: undefined: missing");
    }

    #[test]
    fn unknown_imports_are_reported_once() {
        let r = resolve_source(
            r#"package main

import "example.com/widgets"

func f() widgets.Button {
	return widgets.New()
}
"#,
        );
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(
            r.diagnostics[0].message,
            "could not import example.com/widgets"
        );
        // Still a type name in type position.
        let button = r.decls("Button")[0].clone().unwrap();
        assert_eq!(button.kind, ObjectKind::TypeName);
        assert!(!button.basic);
        assert!(r.decls("New")[0].is_none());
    }

    #[test]
    fn cgo_import_is_not_an_error() {
        let r = resolve_source("package main\n\nimport \"C\"\n\nfunc f() { C.free(nil) }\n");
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
    }

    #[test]
    fn aliased_and_dot_imports() {
        let r = resolve_source(
            r#"package main

import (
	t "time"
	. "net/http"
)

var d t.Duration
var c Client
"#,
        );
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
        assert_eq!(
            r.decls("t")[0].clone().unwrap().kind,
            ObjectKind::PackageName
        );
        let client = r.decls("Client")[0].clone().unwrap();
        assert_eq!(client.kind, ObjectKind::TypeName);
        assert!(!client.basic);
    }

    #[test]
    fn unsafe_pointer_is_basic() {
        let r = resolve_source(
            "package main\n\nimport \"unsafe\"\n\nvar p unsafe.Pointer\n",
        );
        let pointer = r.decls("Pointer")[0].clone().unwrap();
        assert_eq!(pointer.kind, ObjectKind::TypeName);
        assert!(pointer.basic);
    }

    #[test]
    fn struct_literal_keys_are_quiet() {
        let r = resolve_source(
            r#"package main

type Point struct{ X, Y int }

var p = Point{X: 1, Y: 2}
"#,
        );
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
    }

    #[test]
    fn declaration_names_are_skipped() {
        let r = resolve_source("package main\n\nfunc init() {}\n\nfunc (p *T) M() {}\n\ntype T struct{}\n");
        assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
        assert!(r.decls("init")[0].is_none());
    }

    #[test]
    fn unquote_handles_both_literal_forms() {
        assert_eq!(unquote("\"fmt\""), "fmt");
        assert_eq!(unquote("`net/http`"), "net/http");
        assert_eq!(unquote("bare"), "bare");
    }
}
