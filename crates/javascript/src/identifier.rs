//! ECMAScript binding-name rules.

/// Words that can never name a binding, plus globals whose shadowing changes meaning
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval", "undefined", "NaN", "Infinity",
];

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200c}' || c == '\u{200d}' || c.is_alphanumeric()
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Whether `name` can be used as a binding name
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_id_start(first) && chars.all(is_id_continue) && !is_reserved_word(name)
}

/// Keep identifier characters and camel-case across everything else.
///
/// `"user id"` becomes `"userId"`. Leading digits and reserved words are left
/// alone; the caller escapes those with a prefix.
pub fn to_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_break = false;
    for c in name.chars() {
        if !is_id_continue(c) {
            word_break = true;
            continue;
        }
        if word_break && !out.is_empty() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_break = false;
    }
    out
}
