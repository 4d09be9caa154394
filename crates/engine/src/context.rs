use crate::program::ScopedProgram;
use crate::types::{Occurrence, ScopeId, ScopeText};
use std::ops::Range;

/// Nearest scope enclosing `occurrence` that is the root or declares its name
pub fn anchor_scope<P: ScopedProgram + ?Sized>(program: &P, occurrence: &Occurrence) -> ScopeId {
    let root = program.root_scope();
    let mut scope = occurrence.scope;
    loop {
        if scope == root || program.declares(scope, &occurrence.name) {
            return scope;
        }
        match program.parent_scope(scope) {
            Some(parent) => scope = parent,
            None => return scope,
        }
    }
}

/// Build the excerpt handed to the oracle for `occurrence`.
///
/// Small anchor scopes are returned whole. A large program scope is cut to a
/// `window`-character slice centred on the occurrence; any other large scope
/// is cut to its first `window` characters.
pub fn context_window<P: ScopedProgram + ?Sized>(
    program: &P,
    occurrence: &Occurrence,
    window: usize,
) -> String {
    let anchor = anchor_scope(program, occurrence);
    let ScopeText { text, focus } = program.scope_excerpt(anchor, occurrence.span.clone());
    let len = text.chars().count();

    if len < window {
        return text;
    }

    if anchor == program.root_scope() {
        if let Some(focus) = focus {
            return centered(&text, len, focus, window);
        }
    }

    char_slice(&text, 0, window)
}

fn centered(text: &str, len: usize, focus: Range<usize>, window: usize) -> String {
    let half = window / 2;
    if focus.end < half {
        char_slice(text, 0, window)
    } else if focus.start > len - half {
        char_slice(text, len - window, len)
    } else {
        char_slice(
            text,
            focus.start.saturating_sub(half),
            (focus.end + half).min(len),
        )
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}
