//! In-memory program used by the engine's unit tests.

use crate::error::{RenameError, Result};
use crate::program::ScopedProgram;
use crate::types::{BindingId, Occurrence, ScopeId, ScopeText};
use std::collections::HashSet;
use std::ops::Range;

struct FakeScope {
    parent: Option<ScopeId>,
    text: String,
}

struct FakeBinding {
    name: String,
    scope: ScopeId,
}

/// Flat scope tree with static scope text and identity-based renames
pub(crate) struct FakeProgram {
    scopes: Vec<FakeScope>,
    bindings: Vec<FakeBinding>,
    occurrences: Vec<Occurrence>,
    globals: HashSet<String>,
    pinned: Vec<String>,
    pub(crate) fail_render: bool,
}

impl FakeProgram {
    pub(crate) fn new(root_text: &str) -> Self {
        Self {
            scopes: vec![FakeScope {
                parent: None,
                text: root_text.to_string(),
            }],
            bindings: Vec::new(),
            occurrences: Vec::new(),
            globals: HashSet::new(),
            pinned: Vec::new(),
            fail_render: false,
        }
    }

    pub(crate) fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub(crate) fn add_scope(&mut self, parent: ScopeId, text: &str) -> ScopeId {
        self.scopes.push(FakeScope {
            parent: Some(parent),
            text: text.to_string(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// A binding that exists but is never offered for renaming
    pub(crate) fn pin(&mut self, name: &str) {
        self.pinned.push(name.to_string());
    }

    pub(crate) fn add_global(&mut self, name: &str) {
        self.globals.insert(name.to_string());
    }

    /// Declare a new binding with a zero-width span at the end of the occurrence list
    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str) -> BindingId {
        let at = self.occurrences.len();
        self.declare_at(scope, name, at..at + name.len())
    }

    pub(crate) fn declare_at(&mut self, scope: ScopeId, name: &str, span: Range<usize>) -> BindingId {
        self.bindings.push(FakeBinding {
            name: name.to_string(),
            scope,
        });
        let binding = BindingId(self.bindings.len() - 1);
        self.occurrences.push(Occurrence {
            name: name.to_string(),
            span,
            scope,
            binding,
        });
        binding
    }

    pub(crate) fn name_of(&self, binding: BindingId) -> &str {
        &self.bindings[binding.0].name
    }

    fn visible_from(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.scopes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl ScopedProgram for FakeProgram {
    fn binding_occurrences(&self) -> Vec<Occurrence> {
        self.occurrences.clone()
    }

    fn root_scope(&self) -> ScopeId {
        self.root()
    }

    fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    fn declared_names(&self, scope: ScopeId) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|b| b.scope == scope)
            .map(|b| b.name.clone())
            .collect()
    }

    fn scope_excerpt(&self, scope: ScopeId, focus: Range<usize>) -> ScopeText {
        let text = self.scopes[scope.0].text.clone();
        let focus = (scope == self.root()).then_some(focus);
        ScopeText { text, focus }
    }

    fn pinned_names(&self) -> Vec<String> {
        self.pinned.clone()
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && name != "class"
    }

    fn to_identifier(&self, name: &str) -> String {
        name.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    }

    fn is_name_taken(&self, binding: BindingId, name: &str) -> bool {
        if self.globals.contains(name) {
            return true;
        }
        let chain = self.visible_from(self.bindings[binding.0].scope);
        self.bindings.iter().enumerate().any(|(id, b)| {
            id != binding.0 && b.name == name && chain.contains(&b.scope)
        })
    }

    fn rename(&mut self, binding: BindingId, new_name: &str) {
        self.bindings[binding.0].name = new_name.to_string();
    }

    fn render(&self) -> Result<String> {
        if self.fail_render {
            return Err(RenameError::generation("render disabled"));
        }
        Ok(self
            .bindings
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }
}
