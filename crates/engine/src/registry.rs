use crate::types::NameMapping;
use std::collections::{HashMap, HashSet};

/// Names committed during one rename pass.
///
/// Maps each original name to the single final name chosen for it and keeps
/// the set of final names already handed out.
#[derive(Debug, Default)]
pub struct Registry {
    committed: HashMap<String, usize>,
    taken: HashSet<String>,
    pinned: HashSet<String>,
    mappings: Vec<NameMapping>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final name committed for `original`
    pub fn final_name(&self, original: &str) -> Option<&str> {
        self.committed
            .get(original)
            .map(|&idx| self.mappings[idx].renamed.as_str())
    }

    /// Whether some original name was already committed to `name`
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Reserve `name` for a binding that is never renamed
    pub fn pin(&mut self, name: impl Into<String>) {
        self.pinned.insert(name.into());
    }

    /// Whether `name` belongs to a binding that is never renamed
    pub fn is_pinned(&self, name: &str) -> bool {
        self.pinned.contains(name)
    }

    /// Commit `original -> renamed`; the first commit for an original name wins.
    ///
    /// Returns the final name in effect for `original` afterwards.
    pub fn commit(&mut self, original: &str, renamed: &str) -> &str {
        if let Some(&idx) = self.committed.get(original) {
            return self.mappings[idx].renamed.as_str();
        }
        debug_assert!(
            !self.taken.contains(renamed),
            "final name '{renamed}' committed twice"
        );

        let idx = self.mappings.len();
        self.mappings.push(NameMapping {
            original: original.to_string(),
            renamed: renamed.to_string(),
        });
        self.committed.insert(original.to_string(), idx);
        self.taken.insert(renamed.to_string());
        self.mappings[idx].renamed.as_str()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Committed names in commit order
    pub fn into_mappings(self) -> Vec<NameMapping> {
        self.mappings
    }
}
