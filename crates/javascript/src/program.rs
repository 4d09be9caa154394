use crate::error::{JsError, Result};
use crate::identifier;
use crate::language::Language;
use crate::scope::{self, BindingData, ScopeTable, SiteForm, ROOT_SCOPE};
use relabel_engine::{BindingId, Frontend, Occurrence, ScopeId, ScopeText, ScopedProgram};
use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;
use tree_sitter::Node;

/// Pending rewrite of the original source, applied at render time
#[derive(Debug, Clone, Copy)]
enum Edit {
    /// Replace one binding site with the binding's current name
    Site {
        end: usize,
        binding: BindingId,
        form: SiteForm,
    },
    /// Drop the `export` keyword of a group whose names changed
    ExportKeyword { end: usize, group: usize },
    /// Re-export a group's names under their original spelling
    ExportList { group: usize },
}

/// A parsed JavaScript or TypeScript program.
///
/// The original source is never mutated. Renames update the binding table and
/// [`ScopedProgram::render`] replays every binding site against it.
#[derive(Debug)]
pub struct JsProgram {
    source: String,
    language: Language,
    table: ScopeTable,
    /// Sorted by position, insertions before replacements at the same offset
    edits: Vec<(usize, u8, Edit)>,
}

impl JsProgram {
    /// Parse `source` and resolve its scopes
    pub fn parse(source: &str, language: Language) -> Result<Self> {
        let mut parser = language.parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| JsError::parse("Parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(JsError::parse(describe_error(root)));
        }

        let table = scope::analyze(&tree, source, language);
        let edits = plan_edits(&table);
        Ok(Self {
            source: source.to_string(),
            language,
            table,
            edits,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names referenced but declared nowhere in the program
    pub fn globals(&self) -> impl Iterator<Item = &str> {
        self.table.globals.iter().map(String::as_str)
    }

    /// Current name of `binding`
    pub fn binding_name(&self, binding: BindingId) -> &str {
        &self.binding(binding).name
    }

    fn binding(&self, binding: BindingId) -> &BindingData {
        &self.table.bindings[binding.0]
    }

    fn group_renamed(&self, group: usize) -> bool {
        self.table.exports[group]
            .bindings
            .iter()
            .any(|b| self.binding(*b).is_renamed())
    }

    /// Render `start..end` of the original source with all renames applied.
    ///
    /// Insertions sitting exactly at `end` are only emitted with `include_end`.
    fn render_range(&self, start: usize, end: usize, include_end: bool) -> String {
        let mut out = String::with_capacity(end.saturating_sub(start) + 16);
        let mut cursor = start;

        let first = self.edits.partition_point(|(at, _, _)| *at < start);
        for (at, _, edit) in &self.edits[first..] {
            let at = *at;
            if at > end || (at == end && !include_end) {
                break;
            }
            match *edit {
                Edit::Site { end: site_end, binding, form } => {
                    if site_end > end {
                        break;
                    }
                    out.push_str(&self.source[cursor..at]);
                    self.push_site(&mut out, at..site_end, binding, form);
                    cursor = site_end;
                }
                Edit::ExportKeyword { end: keyword_end, group } => {
                    if keyword_end > end {
                        break;
                    }
                    out.push_str(&self.source[cursor..at]);
                    if !self.group_renamed(group) {
                        out.push_str(&self.source[at..keyword_end]);
                    }
                    cursor = keyword_end;
                }
                Edit::ExportList { group } => {
                    out.push_str(&self.source[cursor..at]);
                    if self.group_renamed(group) {
                        self.push_export_list(&mut out, group);
                    }
                    cursor = at;
                }
            }
        }

        out.push_str(&self.source[cursor..end]);
        out
    }

    fn push_site(&self, out: &mut String, span: Range<usize>, binding: BindingId, form: SiteForm) {
        let data = self.binding(binding);
        if !data.is_renamed() {
            out.push_str(&self.source[span]);
            return;
        }
        let (name, original) = (data.name.as_str(), data.original.as_str());
        match form {
            SiteForm::Plain => out.push_str(name),
            SiteForm::Shorthand => {
                out.push_str(original);
                out.push_str(": ");
                out.push_str(name);
            }
            SiteForm::ImportSpecifier => {
                out.push_str(original);
                out.push_str(" as ");
                out.push_str(name);
            }
            SiteForm::ExportSpecifier => {
                out.push_str(name);
                out.push_str(" as ");
                out.push_str(original);
            }
        }
    }

    fn push_export_list(&self, out: &mut String, group: usize) {
        let specifiers: Vec<String> = self.table.exports[group]
            .bindings
            .iter()
            .map(|b| {
                let data = self.binding(*b);
                if data.is_renamed() {
                    format!("{} as {}", data.name, data.original)
                } else {
                    data.name.clone()
                }
            })
            .collect();
        out.push_str("\nexport { ");
        out.push_str(&specifiers.join(", "));
        out.push_str(" };");
    }
}

fn plan_edits(table: &ScopeTable) -> Vec<(usize, u8, Edit)> {
    let mut edits = Vec::new();
    for (index, binding) in table.bindings.iter().enumerate() {
        for site in &binding.sites {
            edits.push((
                site.span.start,
                1,
                Edit::Site {
                    end: site.span.end,
                    binding: BindingId(index),
                    form: site.form,
                },
            ));
        }
    }
    for (group, export) in table.exports.iter().enumerate() {
        edits.push((
            export.keyword.start,
            1,
            Edit::ExportKeyword {
                end: export.keyword.end,
                group,
            },
        ));
        edits.push((export.end, 0, Edit::ExportList { group }));
    }
    edits.sort_by_key(|(at, rank, _)| (*at, *rank));
    edits
}

/// Location of the first syntax error under `root`
fn describe_error(root: Node<'_>) -> String {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            let what = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                "unexpected input".to_string()
            };
            return format!("{what} at line {}, column {}", pos.row + 1, pos.column + 1);
        }
        // Descend only into subtrees that contain the error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return "syntax error".to_string();
            }
        }
    }
}

impl ScopedProgram for JsProgram {
    fn binding_occurrences(&self) -> Vec<Occurrence> {
        self.table.occurrences.clone()
    }

    fn root_scope(&self) -> ScopeId {
        ROOT_SCOPE
    }

    fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.table.scopes[scope.0].parent
    }

    fn declared_names(&self, scope: ScopeId) -> Vec<String> {
        self.table.scopes[scope.0]
            .bindings
            .iter()
            .map(|b| self.binding(*b).name.clone())
            .collect()
    }

    fn scope_excerpt(&self, scope: ScopeId, focus: Range<usize>) -> ScopeText {
        let span = self.table.scopes[scope.0].span.clone();
        if focus.start < span.start || focus.end > span.end || focus.start > focus.end {
            return ScopeText {
                text: self.render_range(span.start, span.end, true),
                focus: None,
            };
        }

        let prefix = self.render_range(span.start, focus.start, false);
        let middle = self.render_range(focus.start, focus.end, false);
        let suffix = self.render_range(focus.end, span.end, true);

        let start = prefix.chars().count();
        let end = start + middle.chars().count();
        ScopeText {
            text: prefix + &middle + &suffix,
            focus: Some(start..end),
        }
    }

    fn pinned_names(&self) -> Vec<String> {
        let offered: HashSet<BindingId> = self.table.occurrences.iter().map(|o| o.binding).collect();
        let mut names: Vec<String> = self
            .table
            .bindings
            .iter()
            .enumerate()
            .filter(|(index, _)| !offered.contains(&BindingId(*index)))
            .map(|(_, data)| data.original.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        identifier::is_valid_identifier(name)
    }

    fn to_identifier(&self, name: &str) -> String {
        identifier::to_identifier(name)
    }

    fn is_name_taken(&self, binding: BindingId, name: &str) -> bool {
        let data = self.binding(binding);
        if data.name == name {
            return false;
        }
        if self.table.globals.contains(name) {
            return true;
        }

        let clashes_in = |scope: ScopeId| {
            self.table.scopes[scope.0]
                .bindings
                .iter()
                .any(|b| *b != binding && self.binding(*b).name == name)
        };

        // Same scope or any enclosing scope
        if self.table.chain(data.scope).any(&clashes_in) {
            return true;
        }

        // A site nested under a scope declaring `name` would be captured by it
        data.sites.iter().any(|site| {
            self.table
                .chain(site.scope)
                .take_while(|s| *s != data.scope)
                .any(&clashes_in)
        })
    }

    fn rename(&mut self, binding: BindingId, new_name: &str) {
        let data = &mut self.table.bindings[binding.0];
        log::trace!("{} -> {new_name} ({} sites)", data.name, data.sites.len());
        data.name = new_name.to_string();
    }

    fn render(&self) -> relabel_engine::Result<String> {
        let code = self.render_range(0, self.source.len(), true);

        let mut parser = self.language.parser()?;
        let reparsed = parser
            .parse(&code, None)
            .ok_or_else(|| JsError::generation("Parser produced no tree"))?;
        if reparsed.root_node().has_error() {
            return Err(JsError::generation(describe_error(reparsed.root_node())).into());
        }
        Ok(code)
    }
}

/// [`Frontend`] for JavaScript, TypeScript and TSX sources
#[derive(Debug, Clone, Copy)]
pub struct JavaScriptFrontend {
    language: Language,
}

impl JavaScriptFrontend {
    pub fn new(language: Language) -> Result<Self> {
        if language == Language::Unknown {
            return Err(JsError::unsupported_language(language.as_str()));
        }
        Ok(Self { language })
    }

    /// Pick the dialect from a file name
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Language::from_path(path) {
            Language::Unknown => Err(JsError::unsupported_language(path.display().to_string())),
            language => Ok(Self { language }),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for JavaScriptFrontend {
    fn default() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }
}

impl Frontend for JavaScriptFrontend {
    type Program = JsProgram;

    fn parse(&self, code: &str) -> relabel_engine::Result<JsProgram> {
        Ok(JsProgram::parse(code, self.language)?)
    }
}
