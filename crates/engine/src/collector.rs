use crate::program::ScopedProgram;
use crate::types::Occurrence;

/// Snapshot every declaration site before any rename happens.
///
/// Later renames change names in the live program, never this list.
pub fn collect_occurrences<P: ScopedProgram + ?Sized>(program: &P) -> Vec<Occurrence> {
    let occurrences = program.binding_occurrences();
    log::debug!("Collected {} binding occurrences", occurrences.len());
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProgram;
    use crate::ScopedProgram;

    #[test]
    fn snapshot_survives_renames() {
        let mut program = FakeProgram::new("a b");
        let root = program.root();
        program.declare(root, "a");
        program.declare(root, "b");

        let before = collect_occurrences(&program);
        program.rename(before[0].binding, "renamed");

        assert_eq!(before[0].name, "a");
        assert_eq!(before.len(), 2);
        let names: Vec<_> = before.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
