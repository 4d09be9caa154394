//! Adapter traits between the engine and a language front end.
//!
//! The engine never looks at syntax nodes. Everything it needs from a parsed
//! program (declaration sites, scope membership, scope text, naming rules and
//! the rename primitive itself) goes through [`ScopedProgram`].

use crate::error::Result;
use crate::types::{BindingId, Occurrence, ScopeId, ScopeText};
use std::ops::Range;

/// Parses source text into a renamable program
pub trait Frontend {
    type Program: ScopedProgram;

    /// Parse `code`; malformed input yields [`crate::RenameError::Parse`]
    fn parse(&self, code: &str) -> Result<Self::Program>;
}

/// A parsed program with resolved scopes and bindings
pub trait ScopedProgram {
    /// Every declaration site, in traversal order
    fn binding_occurrences(&self) -> Vec<Occurrence>;

    /// The program scope
    fn root_scope(&self) -> ScopeId;

    /// Parent of `scope`, `None` for the root
    fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId>;

    /// Names currently declared directly in `scope`
    fn declared_names(&self, scope: ScopeId) -> Vec<String>;

    /// Whether `scope` currently declares `name`
    fn declares(&self, scope: ScopeId, name: &str) -> bool {
        self.declared_names(scope).iter().any(|n| n == name)
    }

    /// Current source of `scope`, locating the original byte span `focus` inside it
    fn scope_excerpt(&self, scope: ScopeId, focus: Range<usize>) -> ScopeText;

    /// Names of bindings that exist but are never offered as occurrences.
    ///
    /// No other binding may be renamed to one of these.
    fn pinned_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether `name` is a syntactically valid binding name for this grammar
    fn is_valid_identifier(&self, name: &str) -> bool;

    /// Coerce arbitrary text into identifier characters.
    ///
    /// The result may still start with a character that cannot begin an
    /// identifier or spell a reserved word; prefixing it must fix both.
    fn to_identifier(&self, name: &str) -> String;

    /// Whether giving `binding` the name `name` would clash with another binding,
    /// capture a reference, or shadow a global
    fn is_name_taken(&self, binding: BindingId, name: &str) -> bool;

    /// Rename `binding` and every reference to it
    fn rename(&mut self, binding: BindingId, new_name: &str);

    /// Render the program back to source
    fn render(&self) -> Result<String>;
}
