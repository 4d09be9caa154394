use crate::program::ScopedProgram;
use crate::registry::Registry;
use crate::types::Occurrence;

/// Turn an oracle proposal into a name that is valid and unused.
///
/// Invalid proposals are coerced into identifier characters first, then
/// `prefix` is prepended until the grammar accepts the name and it clashes
/// with no committed or pinned name and nothing visible to the binding.
pub fn escape_name<P: ScopedProgram + ?Sized>(
    program: &P,
    registry: &Registry,
    occurrence: &Occurrence,
    proposed: &str,
    prefix: &str,
) -> String {
    let mut candidate = if program.is_valid_identifier(proposed) {
        proposed.to_string()
    } else {
        program.to_identifier(proposed)
    };

    // A pinned name is only acceptable when the binding already carries it
    while !program.is_valid_identifier(&candidate)
        || registry.is_taken(&candidate)
        || (registry.is_pinned(&candidate) && candidate != occurrence.name)
        || program.is_name_taken(occurrence.binding, &candidate)
    {
        candidate.insert_str(0, prefix);
    }

    candidate
}

/// Apply the name already committed for this occurrence's original name, if any
pub fn reuse_committed<P: ScopedProgram + ?Sized>(
    program: &mut P,
    registry: &Registry,
    occurrence: &Occurrence,
) -> Option<String> {
    let final_name = registry.final_name(&occurrence.name)?.to_string();
    program.rename(occurrence.binding, &final_name);
    Some(final_name)
}

/// Settle the oracle's proposal for `occurrence`, commit it and rename the binding.
///
/// The registry entry is written before the program is touched, so every
/// later occurrence sharing the original name reuses it.
pub fn commit_and_apply<P: ScopedProgram + ?Sized>(
    program: &mut P,
    registry: &mut Registry,
    occurrence: &Occurrence,
    proposed: &str,
    prefix: &str,
) -> String {
    if let Some(existing) = reuse_committed(program, registry, occurrence) {
        return existing;
    }

    let settled = escape_name(&*program, registry, occurrence, proposed, prefix);
    if settled != proposed {
        log::debug!("Escaped proposal '{proposed}' for '{}' to '{settled}'", occurrence.name);
    }

    let final_name = registry.commit(&occurrence.name, &settled).to_string();
    log::debug!("Committed '{}' -> '{final_name}'", occurrence.name);
    program.rename(occurrence.binding, &final_name);
    final_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProgram;
    use crate::ScopedProgram;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    fn two_roots(a: &str, b: &str) -> (FakeProgram, Vec<Occurrence>) {
        let mut program = FakeProgram::new("root");
        let root = program.root();
        program.declare(root, a);
        program.declare(root, b);
        let occurrences = program.binding_occurrences();
        (program, occurrences)
    }

    #[test]
    fn colliding_proposal_is_prefixed() {
        let (mut program, occ) = two_roots("a", "b");
        let mut registry = Registry::new();

        assert_eq!(commit_and_apply(&mut program, &mut registry, &occ[0], "x", "_"), "x");
        assert_eq!(commit_and_apply(&mut program, &mut registry, &occ[1], "x", "_"), "_x");
        assert_eq!(program.name_of(occ[1].binding), "_x");
    }

    #[test]
    fn collision_escalates_past_taken_escapes() {
        let mut program = FakeProgram::new("root");
        let root = program.root();
        for name in ["a", "b", "c"] {
            program.declare(root, name);
        }
        let occ = program.binding_occurrences();
        let mut registry = Registry::new();

        commit_and_apply(&mut program, &mut registry, &occ[0], "x", "_");
        commit_and_apply(&mut program, &mut registry, &occ[1], "_x", "_");
        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[2], "x", "_"),
            "__x"
        );
    }

    #[test]
    fn invalid_proposal_is_escaped() {
        let (mut program, occ) = two_roots("a", "b");
        let mut registry = Registry::new();

        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[0], "123abc", "_"),
            "_123abc"
        );
        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[1], "class", "_"),
            "_class"
        );
    }

    #[test]
    fn unrepresentable_characters_are_dropped_before_escaping() {
        let (mut program, occ) = two_roots("a", "b");
        let mut registry = Registry::new();

        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[0], "user-id", "_"),
            "userid"
        );
        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[1], "", "_"),
            "_"
        );
    }

    #[test]
    fn committed_original_is_reused_without_new_commit() {
        let mut program = FakeProgram::new("root");
        let root = program.root();
        let f = program.add_scope(root, "f");
        let g = program.add_scope(root, "g");
        program.declare(f, "tmp");
        program.declare(g, "tmp");
        let occ = program.binding_occurrences();
        let mut registry = Registry::new();

        commit_and_apply(&mut program, &mut registry, &occ[0], "first", "_");
        let reused = commit_and_apply(&mut program, &mut registry, &occ[1], "second", "_");

        assert_eq!(reused, "first");
        assert_eq!(registry.len(), 1);
        assert_eq!(program.name_of(occ[1].binding), "first");
    }

    #[test]
    fn visible_bindings_and_globals_force_escape() {
        let mut program = FakeProgram::new("root");
        let root = program.root();
        program.add_global("console");
        program.declare(root, "outer");
        let inner = program.add_scope(root, "inner");
        program.declare(inner, "p");
        let occ = program.binding_occurrences();
        let mut registry = Registry::new();

        assert_eq!(
            commit_and_apply(&mut program, &mut registry, &occ[1], "outer", "_"),
            "_outer"
        );
        assert_eq!(
            escape_name(&program, &registry, &occ[0], "console", "_"),
            "_console"
        );
    }

    #[test]
    fn pinned_names_are_escaped_unless_already_held() {
        let mut program = FakeProgram::new("root");
        let root = program.root();
        program.declare(root, "tmp");
        let inner = program.add_scope(root, "inner");
        program.declare(inner, "q");
        let occ = program.binding_occurrences();
        let mut registry = Registry::new();
        registry.pin("q");

        assert_eq!(commit_and_apply(&mut program, &mut registry, &occ[0], "q", "_"), "_q");
        assert_eq!(escape_name(&program, &registry, &occ[1], "q", "_"), "q");
    }

    #[test]
    fn identity_proposal_keeps_the_name() {
        let (mut program, occ) = two_roots("a", "b");
        let mut registry = Registry::new();

        assert_eq!(commit_and_apply(&mut program, &mut registry, &occ[0], "a", "_"), "a");
        assert_eq!(commit_and_apply(&mut program, &mut registry, &occ[1], "b", "_"), "b");
    }

    proptest! {
        /// Every original name maps to one final name and no two originals share one
        #[test]
        fn commits_are_consistent_and_injective(
            decls in prop::collection::vec(("[a-e]", "[a-c_-]{0,3}"), 1..24)
        ) {
            let mut program = FakeProgram::new("root");
            let root = program.root();
            for (name, _) in &decls {
                program.declare(root, name);
            }
            let occurrences = program.binding_occurrences();
            let mut registry = Registry::new();

            let mut finals: HashMap<String, String> = HashMap::new();
            for (occ, (_, proposal)) in occurrences.iter().zip(&decls) {
                let settled = commit_and_apply(&mut program, &mut registry, occ, proposal, "_");
                prop_assert!(program.is_valid_identifier(&settled));
                let first = finals.entry(occ.name.clone()).or_insert_with(|| settled.clone());
                prop_assert_eq!(first.as_str(), settled.as_str());
            }

            let distinct: HashSet<_> = finals.values().collect();
            prop_assert_eq!(distinct.len(), finals.len());
        }
    }
}
