use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Handle to a lexical scope inside a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub usize);

/// Handle to one declared binding inside a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub usize);

/// Snapshot of a single declaration site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Name of the binding at parse time
    pub name: String,

    /// Byte span of the declaring identifier in the original source
    pub span: Range<usize>,

    /// Innermost scope lexically enclosing the identifier
    pub scope: ScopeId,

    /// Binding this site declares
    pub binding: BindingId,
}

/// Rendered source of one scope
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeText {
    /// Current source text of the scope, with all renames applied
    pub text: String,

    /// Character range of the requested focus span inside `text`
    pub focus: Option<Range<usize>>,
}

/// One committed rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMapping {
    pub original: String,
    pub renamed: String,
}

/// Statistics for a finished pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameSummary {
    /// Declaration sites visited
    pub occurrences: usize,

    /// Oracle invocations issued
    pub oracle_calls: usize,

    /// Batches processed
    pub batches: usize,

    /// Committed names in commit order
    pub mappings: Vec<NameMapping>,
}

impl RenameSummary {
    /// Final name committed for `original`, if any
    pub fn renamed(&self, original: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.original == original)
            .map(|m| m.renamed.as_str())
    }
}
