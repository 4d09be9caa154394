//! Scope tree and binding resolution over a tree-sitter syntax tree.
//!
//! Two preorder walks: the first opens scopes and records every declaration
//! (so hoisted names are known up front), the second resolves each remaining
//! identifier to the nearest visible binding or records it as a global.

use crate::language::Language;
use relabel_engine::{BindingId, Occurrence, ScopeId};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tree_sitter::{Node, Tree};

pub(crate) const ROOT_SCOPE: ScopeId = ScopeId(0);

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_static_block",
];

const TYPE_DECLARATION_KINDS: &[&str] = &[
    "interface_declaration",
    "type_alias_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "type_parameter",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Program,
    Function,
    Class,
    Catch,
    Block,
}

#[derive(Debug)]
pub(crate) struct ScopeData {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub span: Range<usize>,
    pub bindings: Vec<BindingId>,
}

/// How a site must be rewritten so the surrounding syntax keeps its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SiteForm {
    /// Bare identifier
    Plain,
    /// `{ a }` in an object literal or pattern; the key must survive
    Shorthand,
    /// `import { a }`; the imported name must survive
    ImportSpecifier,
    /// `export { a }`; the exported name must survive
    ExportSpecifier,
}

#[derive(Debug)]
pub(crate) struct Site {
    pub span: Range<usize>,
    /// Innermost scope enclosing the site
    pub scope: ScopeId,
    pub form: SiteForm,
}

#[derive(Debug)]
pub(crate) struct BindingData {
    pub name: String,
    pub original: String,
    pub scope: ScopeId,
    pub sites: Vec<Site>,
}

impl BindingData {
    pub fn is_renamed(&self) -> bool {
        self.name != self.original
    }
}

/// `export <declaration>` whose names must stay exported after a rename
#[derive(Debug)]
pub(crate) struct ExportGroup {
    /// From the `export` keyword up to the declaration
    pub keyword: Range<usize>,
    /// End of the export statement
    pub end: usize,
    pub bindings: Vec<BindingId>,
}

#[derive(Debug, Default)]
pub(crate) struct ScopeTable {
    pub scopes: Vec<ScopeData>,
    pub bindings: Vec<BindingData>,
    pub occurrences: Vec<Occurrence>,
    pub globals: HashSet<String>,
    pub exports: Vec<ExportGroup>,
}

impl ScopeTable {
    /// `scope` followed by its ancestors up to the root
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |s| self.scopes[s.0].parent)
    }

    /// Binding currently called `name` declared directly in `scope`
    pub fn binding_named(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.scopes[scope.0]
            .bindings
            .iter()
            .copied()
            .find(|b| self.bindings[b.0].name == name)
    }

    fn resolve(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.chain(scope).find_map(|s| self.binding_named(s, name))
    }
}

/// Build the scope table for a parsed program
pub(crate) fn analyze(tree: &Tree, source: &str, language: Language) -> ScopeTable {
    let root = tree.root_node();
    let mut analyzer = Analyzer::new(source, language);

    preorder(root, ROOT_SCOPE, |node, scope| analyzer.enter_declarations(node, scope));
    analyzer.finish_exports();
    preorder(root, ROOT_SCOPE, |node, scope| analyzer.enter_references(node, scope));

    let mut table = analyzer.table;
    table.occurrences.sort_by_key(|o| o.span.start);
    log::debug!(
        "Scope analysis: {} scopes, {} bindings, {} globals",
        table.scopes.len(),
        table.bindings.len(),
        table.globals.len()
    );
    table
}

/// Preorder walk that threads the innermost scope through the tree.
///
/// `enter` receives each node with the scope in effect for it and returns the
/// scope its children live in. Iterative, so deeply nested input cannot
/// exhaust the stack.
fn preorder<'t>(root: Node<'t>, root_scope: ScopeId, mut enter: impl FnMut(Node<'t>, ScopeId) -> ScopeId) {
    let mut cursor = root.walk();
    let mut scopes = vec![root_scope];
    loop {
        let current = scopes.last().copied().unwrap_or(root_scope);
        let inner = enter(cursor.node(), current);
        if cursor.goto_first_child() {
            scopes.push(inner);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            scopes.pop();
        }
    }
}

struct PendingExport {
    keyword: Range<usize>,
    end: usize,
    names: Vec<usize>,
}

struct Analyzer<'s> {
    source: &'s str,
    language: Language,
    table: ScopeTable,
    /// Scope opened by a node, keyed by node id
    scope_nodes: HashMap<usize, ScopeId>,
    /// Identifier nodes that declare a binding
    declared: HashMap<usize, BindingId>,
    /// Identifier nodes that are neither declarations nor references
    ignored: HashSet<usize>,
    /// References that need a non-plain rewrite
    forms: HashMap<usize, SiteForm>,
    /// Parameter lists owned by a function scope
    bound_parameters: HashSet<usize>,
    pending_exports: Vec<PendingExport>,
}

impl<'s> Analyzer<'s> {
    fn new(source: &'s str, language: Language) -> Self {
        let table = ScopeTable {
            scopes: vec![ScopeData {
                kind: ScopeKind::Program,
                parent: None,
                span: 0..source.len(),
                bindings: Vec::new(),
            }],
            ..Default::default()
        };
        Self {
            source,
            language,
            table,
            scope_nodes: HashMap::new(),
            declared: HashMap::new(),
            ignored: HashSet::new(),
            forms: HashMap::new(),
            bound_parameters: HashSet::new(),
            pending_exports: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn enter_declarations(&mut self, node: Node<'_>, scope: ScopeId) -> ScopeId {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, scope, scope, SiteForm::Plain, true);
                }
                let inner = self.open_scope(node, scope, ScopeKind::Function);
                self.declare_parameters(node, inner);
                inner
            }
            "function_expression" | "function" | "generator_function" => {
                let inner = self.open_scope(node, scope, ScopeKind::Function);
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, inner, inner, SiteForm::Plain, true);
                }
                self.declare_parameters(node, inner);
                inner
            }
            "arrow_function" => {
                let inner = self.open_scope(node, scope, ScopeKind::Function);
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare_pattern(param, inner, inner);
                }
                self.declare_parameters(node, inner);
                inner
            }
            "method_definition" | "class_static_block" => {
                let inner = self.open_scope(node, scope, ScopeKind::Function);
                self.declare_parameters(node, inner);
                inner
            }
            "class_declaration" | "abstract_class_declaration" => {
                if let Some(name) = class_name(node) {
                    self.declare(name, scope, scope, SiteForm::Plain, true);
                }
                self.open_scope(node, scope, ScopeKind::Class)
            }
            "class" => {
                let inner = self.open_scope(node, scope, ScopeKind::Class);
                if let Some(name) = class_name(node) {
                    self.declare(name, inner, inner, SiteForm::Plain, true);
                }
                inner
            }
            "catch_clause" => {
                let inner = self.open_scope(node, scope, ScopeKind::Catch);
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare_pattern(param, inner, inner);
                }
                inner
            }
            "for_statement" | "switch_body" => self.open_scope(node, scope, ScopeKind::Block),
            "for_in_statement" => {
                let inner = self.open_scope(node, scope, ScopeKind::Block);
                if let (Some(kind), Some(left)) = (
                    node.child_by_field_name("kind"),
                    node.child_by_field_name("left"),
                ) {
                    let target = if self.text(kind) == "var" {
                        self.hoist_target(scope)
                    } else {
                        inner
                    };
                    self.declare_pattern(left, inner, target);
                }
                inner
            }
            "statement_block" if !is_owned_body(node) => {
                self.open_scope(node, scope, ScopeKind::Block)
            }
            "variable_declaration" => {
                let target = self.hoist_target(scope);
                self.declare_declarators(node, scope, target);
                scope
            }
            "lexical_declaration" => {
                self.declare_declarators(node, scope, scope);
                scope
            }
            "import_statement" => {
                self.declare_imports(node, scope);
                scope
            }
            "export_statement" => {
                self.note_export(node);
                scope
            }
            "formal_parameters" if !self.bound_parameters.contains(&node.id()) => {
                // Parameter names of signatures and function types bind nothing
                let mut cursor = node.walk();
                for param in node.named_children(&mut cursor) {
                    for (ident, _) in pattern_identifiers(param) {
                        self.ignored.insert(ident.id());
                    }
                }
                scope
            }
            _ => scope,
        }
    }

    fn enter_references(&mut self, node: Node<'_>, scope: ScopeId) -> ScopeId {
        let scope = self.scope_nodes.get(&node.id()).copied().unwrap_or(scope);
        let id = node.id();
        if self.declared.contains_key(&id) || self.ignored.contains(&id) {
            return scope;
        }
        match node.kind() {
            "identifier" if is_intrinsic_jsx_tag(node, self.text(node)) => {}
            "identifier" => self.reference(node, scope, SiteForm::Plain, false),
            // Patterns left undeclared by pass 1 are assignment targets: `({ a } = obj)`
            "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                self.reference(node, scope, SiteForm::Shorthand, false);
            }
            "type_identifier" if self.language.is_typescript() && !is_type_declaration_name(node) => {
                self.reference(node, scope, SiteForm::Plain, true);
            }
            _ => {}
        }
        scope
    }

    fn open_scope(&mut self, node: Node<'_>, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.table.scopes.len());
        self.table.scopes.push(ScopeData {
            kind,
            parent: Some(parent),
            span: node.byte_range(),
            bindings: Vec::new(),
        });
        self.scope_nodes.insert(node.id(), id);
        id
    }

    /// Nearest function or program scope, where `var` declarations land
    fn hoist_target(&self, scope: ScopeId) -> ScopeId {
        self.table
            .chain(scope)
            .find(|s| {
                matches!(
                    self.table.scopes[s.0].kind,
                    ScopeKind::Function | ScopeKind::Program
                )
            })
            .unwrap_or(ROOT_SCOPE)
    }

    /// Record `ident` as a declaration of a binding in `target`.
    ///
    /// Redeclaring a name in the same scope extends the existing binding.
    /// Bindings declared with `renamable == false` resolve references but
    /// never reach the engine.
    fn declare(
        &mut self,
        ident: Node<'_>,
        enclosing: ScopeId,
        target: ScopeId,
        form: SiteForm,
        renamable: bool,
    ) {
        if self.declared.contains_key(&ident.id()) {
            return;
        }
        let name = self.text(ident);
        let binding = match self.table.binding_named(target, name) {
            Some(existing) => existing,
            None => {
                let id = BindingId(self.table.bindings.len());
                self.table.bindings.push(BindingData {
                    name: name.to_string(),
                    original: name.to_string(),
                    scope: target,
                    sites: Vec::new(),
                });
                self.table.scopes[target.0].bindings.push(id);
                id
            }
        };

        self.table.bindings[binding.0].sites.push(Site {
            span: ident.byte_range(),
            scope: enclosing,
            form,
        });
        self.declared.insert(ident.id(), binding);

        if renamable {
            self.table.occurrences.push(Occurrence {
                name: name.to_string(),
                span: ident.byte_range(),
                scope: enclosing,
                binding,
            });
        }
    }

    fn declare_pattern(&mut self, pattern: Node<'_>, enclosing: ScopeId, target: ScopeId) {
        for (ident, form) in pattern_identifiers(pattern) {
            self.declare(ident, enclosing, target, form, true);
        }
    }

    fn declare_parameters(&mut self, function: Node<'_>, scope: ScopeId) {
        let Some(params) = function.child_by_field_name("parameters") else {
            return;
        };
        self.bound_parameters.insert(params.id());

        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            // `constructor(private x)` also declares a property named `x`
            let renamable = !is_parameter_property(param);
            for (ident, form) in pattern_identifiers(param) {
                self.declare(ident, scope, scope, form, renamable);
            }
        }
    }

    fn declare_declarators(&mut self, declaration: Node<'_>, enclosing: ScopeId, target: ScopeId) {
        let mut cursor = declaration.walk();
        for declarator in declaration.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            if let Some(name) = declarator.child_by_field_name("name") {
                self.declare_pattern(name, enclosing, target);
            }
        }
    }

    fn declare_imports(&mut self, import: Node<'_>, scope: ScopeId) {
        // `import type` names live in the type namespace, which is never renamed
        let renamable = !has_token(import, "type");

        let mut cursor = import.walk();
        let Some(clause) = import
            .named_children(&mut cursor)
            .find(|c| c.kind() == "import_clause")
        else {
            return;
        };

        let mut clause_cursor = clause.walk();
        for child in clause.named_children(&mut clause_cursor) {
            match child.kind() {
                "identifier" => self.declare(child, scope, scope, SiteForm::Plain, renamable),
                "namespace_import" => {
                    if let Some(ident) = first_named_of_kind(child, "identifier") {
                        self.declare(ident, scope, scope, SiteForm::Plain, renamable);
                    }
                }
                "named_imports" => {
                    let mut spec_cursor = child.walk();
                    for spec in child.named_children(&mut spec_cursor) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let renamable = renamable && !has_token(spec, "type");
                        let name = spec.child_by_field_name("name");
                        match spec.child_by_field_name("alias") {
                            Some(alias) => {
                                if let Some(name) = name {
                                    self.ignored.insert(name.id());
                                }
                                self.declare(alias, scope, scope, SiteForm::Plain, renamable);
                            }
                            None => {
                                if let Some(name) = name.filter(|n| n.kind() == "identifier") {
                                    self.declare(
                                        name,
                                        scope,
                                        scope,
                                        SiteForm::ImportSpecifier,
                                        renamable,
                                    );
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn note_export(&mut self, export: Node<'_>) {
        let re_export = export.child_by_field_name("source").is_some();

        let mut cursor = export.walk();
        for child in export.named_children(&mut cursor) {
            match child.kind() {
                "export_clause" => {
                    let mut spec_cursor = child.walk();
                    for spec in child.named_children(&mut spec_cursor) {
                        if spec.kind() != "export_specifier" {
                            continue;
                        }
                        let name = spec.child_by_field_name("name");
                        let alias = spec.child_by_field_name("alias");
                        if re_export {
                            for node in [name, alias].into_iter().flatten() {
                                self.ignored.insert(node.id());
                            }
                        } else if let Some(alias) = alias {
                            self.ignored.insert(alias.id());
                        } else if let Some(name) = name {
                            self.forms.insert(name.id(), SiteForm::ExportSpecifier);
                        }
                    }
                }
                "namespace_export" => {
                    if let Some(ident) = first_named_of_kind(child, "identifier") {
                        self.ignored.insert(ident.id());
                    }
                }
                _ => {}
            }
        }

        if has_token(export, "default") {
            return;
        }
        let (Some(declaration), Some(keyword)) = (
            export.child_by_field_name("declaration"),
            first_child_of_kind(export, "export"),
        ) else {
            return;
        };

        let names: Vec<usize> = declared_names(declaration).iter().map(|n| n.id()).collect();
        if !names.is_empty() {
            self.pending_exports.push(PendingExport {
                keyword: keyword.start_byte()..declaration.start_byte(),
                end: export.end_byte(),
                names,
            });
        }
    }

    fn finish_exports(&mut self) {
        for pending in std::mem::take(&mut self.pending_exports) {
            let mut bindings: Vec<BindingId> = pending
                .names
                .iter()
                .filter_map(|id| self.declared.get(id).copied())
                .collect();
            bindings.dedup();
            if !bindings.is_empty() {
                self.table.exports.push(ExportGroup {
                    keyword: pending.keyword,
                    end: pending.end,
                    bindings,
                });
            }
        }
    }

    fn reference(&mut self, node: Node<'_>, scope: ScopeId, default_form: SiteForm, type_position: bool) {
        let name = self.text(node);
        let form = self.forms.get(&node.id()).copied().unwrap_or(default_form);
        match self.table.resolve(scope, name) {
            Some(binding) => self.table.bindings[binding.0].sites.push(Site {
                span: node.byte_range(),
                scope,
                form,
            }),
            None if !type_position => {
                self.table.globals.insert(name.to_string());
            }
            None => {}
        }
    }
}

/// Identifiers bound by a declaration pattern, with the rewrite form each needs
fn pattern_identifiers(pattern: Node<'_>) -> Vec<(Node<'_>, SiteForm)> {
    let mut out = Vec::new();
    collect_pattern(pattern, &mut out);
    out
}

fn collect_pattern<'t>(pattern: Node<'t>, out: &mut Vec<(Node<'t>, SiteForm)>) {
    match pattern.kind() {
        "identifier" => out.push((pattern, SiteForm::Plain)),
        "shorthand_property_identifier_pattern" => out.push((pattern, SiteForm::Shorthand)),
        "object_pattern" | "array_pattern" => {
            let mut cursor = pattern.walk();
            for child in pattern.named_children(&mut cursor) {
                collect_pattern(child, out);
            }
        }
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                collect_pattern(value, out);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                collect_pattern(left, out);
            }
        }
        "rest_pattern" => {
            if let Some(inner) = pattern.named_child(0) {
                collect_pattern(inner, out);
            }
        }
        "required_parameter" | "optional_parameter" => {
            if let Some(inner) = pattern.child_by_field_name("pattern") {
                collect_pattern(inner, out);
            }
        }
        _ => {}
    }
}

/// Names introduced by an exported declaration
fn declared_names(declaration: Node<'_>) -> Vec<Node<'_>> {
    match declaration.kind() {
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            declaration.child_by_field_name("name").into_iter().collect()
        }
        "class_declaration" | "abstract_class_declaration" => class_name(declaration).into_iter().collect(),
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            let mut cursor = declaration.walk();
            for declarator in declaration.named_children(&mut cursor) {
                if let Some(name) = declarator.child_by_field_name("name") {
                    names.extend(pattern_identifiers(name).into_iter().map(|(n, _)| n));
                }
            }
            names
        }
        _ => Vec::new(),
    }
}

/// Class names only bind a value when written as plain identifiers (TypeScript uses `type_identifier`)
fn class_name(class: Node<'_>) -> Option<Node<'_>> {
    class
        .child_by_field_name("name")
        .filter(|n| n.kind() == "identifier")
}

/// Whether `block` is the body of a node that already opened a scope for it
fn is_owned_body(block: Node<'_>) -> bool {
    let Some(parent) = block.parent() else {
        return false;
    };
    (FUNCTION_KINDS.contains(&parent.kind()) || parent.kind() == "catch_clause")
        && parent
            .child_by_field_name("body")
            .is_some_and(|body| body.id() == block.id())
}

fn is_type_declaration_name(node: Node<'_>) -> bool {
    node.parent().is_some_and(|parent| {
        TYPE_DECLARATION_KINDS.contains(&parent.kind())
            && parent
                .child_by_field_name("name")
                .is_some_and(|name| name.id() == node.id())
    })
}

/// Lowercase or dashed JSX tag names are intrinsic elements, not references
fn is_intrinsic_jsx_tag(node: Node<'_>, name: &str) -> bool {
    let in_tag = node.parent().is_some_and(|parent| {
        matches!(
            parent.kind(),
            "jsx_opening_element" | "jsx_closing_element" | "jsx_self_closing_element"
        ) && parent
            .child_by_field_name("name")
            .is_some_and(|tag| tag.id() == node.id())
    });
    in_tag && (name.starts_with(|c: char| c.is_ascii_lowercase()) || name.contains('-'))
}

fn is_parameter_property(param: Node<'_>) -> bool {
    let mut cursor = param.walk();
    let found = param.children(&mut cursor).any(|c| {
        matches!(
            c.kind(),
            "accessibility_modifier" | "override_modifier" | "readonly"
        )
    });
    found
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    first_child_of_kind(node, token).is_some()
}

fn first_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn first_named_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(code: &str) -> ScopeTable {
        table_for(code, Language::JavaScript)
    }

    fn table_for(code: &str, language: Language) -> ScopeTable {
        let mut parser = language.parser().unwrap();
        let tree = parser.parse(code, None).unwrap();
        assert!(!tree.root_node().has_error(), "fixture must parse: {code}");
        analyze(&tree, code, language)
    }

    fn binding<'a>(table: &'a ScopeTable, name: &str) -> Vec<&'a BindingData> {
        table.bindings.iter().filter(|b| b.name == name).collect()
    }

    fn occurrence_names(table: &ScopeTable) -> Vec<&str> {
        table.occurrences.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn function_name_and_parameter_resolve_uses() {
        let t = table("function f(a){ return a+1; } f(5);");

        assert_eq!(occurrence_names(&t), vec!["f", "a"]);
        let f = binding(&t, "f");
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].scope, ROOT_SCOPE);
        assert_eq!(f[0].sites.len(), 2);
        let a = binding(&t, "a");
        assert_eq!(a[0].sites.len(), 2);
        assert_ne!(a[0].scope, ROOT_SCOPE);
        assert!(t.globals.is_empty());
    }

    #[test]
    fn var_hoists_to_function_and_let_stays_in_block() {
        let t = table("function g(){ { var v = 1; let l = 2; } return v; }");

        let v = binding(&t, "v")[0];
        let l = binding(&t, "l")[0];
        assert_eq!(t.scopes[v.scope.0].kind, ScopeKind::Function);
        assert_eq!(t.scopes[l.scope.0].kind, ScopeKind::Block);
        assert_eq!(v.sites.len(), 2);
    }

    #[test]
    fn shadowed_names_are_distinct_bindings() {
        let t = table("let x = 1; function h(x){ return x; } x;");

        let xs = binding(&t, "x");
        assert_eq!(xs.len(), 2);
        assert!(xs.iter().all(|b| b.sites.len() == 2));
    }

    #[test]
    fn redeclaration_extends_one_binding() {
        let t = table("var a = 1; var a = 2; a;");

        let a = binding(&t, "a");
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].sites.len(), 3);
        assert_eq!(occurrence_names(&t), vec!["a", "a"]);
    }

    #[test]
    fn unresolved_names_become_globals() {
        let t = table("console.log(window.x, y);");

        assert!(t.globals.contains("console"));
        assert!(t.globals.contains("window"));
        assert!(t.globals.contains("y"));
        assert!(!t.globals.contains("log"));
        assert!(!t.globals.contains("x"));
    }

    #[test]
    fn destructuring_and_shorthand_sites_are_marked() {
        let t = table("const { a, b: c, d = 1, ...rest } = obj; const o = { a };");

        assert_eq!(occurrence_names(&t), vec!["a", "c", "d", "rest", "o"]);
        let a = binding(&t, "a")[0];
        assert!(a.sites.iter().all(|s| s.form == SiteForm::Shorthand));
        assert_eq!(a.sites.len(), 2);
        assert!(binding(&t, "b").is_empty());
    }

    #[test]
    fn catch_and_loop_heads_declare_in_their_own_scope() {
        let t = table("try { f(); } catch (err) { err; } for (const k of ks) { k; } for (var i in o) {}");

        let err = binding(&t, "err")[0];
        assert_eq!(t.scopes[err.scope.0].kind, ScopeKind::Catch);
        let k = binding(&t, "k")[0];
        assert_eq!(t.scopes[k.scope.0].kind, ScopeKind::Block);
        let i = binding(&t, "i")[0];
        assert_eq!(i.scope, ROOT_SCOPE);
    }

    #[test]
    fn imports_and_exports_get_specifier_forms() {
        let t = table("import d, { a, b as c } from 'm'; import * as ns from 'n'; export { a, c as e };");

        assert_eq!(occurrence_names(&t), vec!["d", "a", "c", "ns"]);
        let a = binding(&t, "a")[0];
        assert_eq!(a.sites[0].form, SiteForm::ImportSpecifier);
        assert_eq!(a.sites[1].form, SiteForm::ExportSpecifier);
        let c = binding(&t, "c")[0];
        assert_eq!(c.sites.len(), 2);
        assert!(c.sites.iter().all(|s| s.form == SiteForm::Plain));
        assert!(!t.globals.contains("b"));
        assert!(!t.globals.contains("e"));
    }

    #[test]
    fn exported_declarations_are_grouped() {
        let t = table("export const a = 1, b = 2; export function f() {} export default function g() {}");

        assert_eq!(t.exports.len(), 2);
        assert_eq!(t.exports[0].bindings.len(), 2);
        assert_eq!(t.exports[1].bindings.len(), 1);
    }

    #[test]
    fn named_function_expression_binds_inside_itself() {
        let t = table("const fn1 = function inner() { return inner; };");

        let inner = binding(&t, "inner")[0];
        assert_ne!(inner.scope, ROOT_SCOPE);
        assert_eq!(inner.sites.len(), 2);
    }

    #[test]
    fn occurrences_follow_source_order() {
        let t = table("var a = function(b){ return b; }, c = 1;");
        assert_eq!(occurrence_names(&t), vec!["a", "b", "c"]);
    }

    #[test]
    fn typescript_type_references_follow_imports() {
        let t = table_for(
            "import { Foo } from './foo';\nlet v: Foo = make();\nfunction id<T>(x: T): T { return x; }",
            Language::TypeScript,
        );

        let foo = binding(&t, "Foo")[0];
        assert_eq!(foo.sites.len(), 2);
        let x = binding(&t, "x")[0];
        assert_eq!(x.sites.len(), 2);
        assert!(!t.globals.contains("T"));
    }

    #[test]
    fn typescript_parameter_properties_are_pinned() {
        let t = table_for(
            "class P { constructor(private readonly x: number, y: number) { this.z = x + y; } }",
            Language::TypeScript,
        );

        let names = occurrence_names(&t);
        assert!(names.contains(&"y"));
        assert!(!names.contains(&"x"));
        assert_eq!(binding(&t, "x")[0].sites.len(), 2);
    }

    #[test]
    fn signature_parameters_bind_nothing() {
        let t = table_for("type Cb = (value: string) => void; let value = 1;", Language::TypeScript);

        assert_eq!(occurrence_names(&t), vec!["value"]);
        assert_eq!(binding(&t, "value")[0].sites.len(), 1);
        assert!(!t.globals.contains("value"));
    }

    #[test]
    fn destructuring_assignment_targets_are_shorthand_sites() {
        let t = table("let a; ({ a } = obj); [a] = arr;");

        let a = binding(&t, "a")[0];
        let forms: Vec<SiteForm> = a.sites.iter().map(|s| s.form).collect();
        assert_eq!(forms, vec![SiteForm::Plain, SiteForm::Shorthand, SiteForm::Plain]);
        assert_eq!(occurrence_names(&t), vec!["a"]);
    }

    #[test]
    fn intrinsic_jsx_tags_are_skipped() {
        let t = table("const div = 1; const Item = 2; <div><Item />{div}<x-y /></div>;");

        assert_eq!(binding(&t, "div")[0].sites.len(), 2);
        assert_eq!(binding(&t, "Item")[0].sites.len(), 2);
        assert!(!t.globals.contains("x-y"));
    }
}
