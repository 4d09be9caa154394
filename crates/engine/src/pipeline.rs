use crate::error::Result;
use crate::program::{Frontend, ScopedProgram};
use crate::scheduler::RenamePass;
use crate::types::RenameSummary;

/// Renamed source plus pass statistics
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub code: String,
    pub summary: RenameSummary,
}

/// Parse `code`, rename every binding through `pass`, and render the result.
///
/// Any failure discards the partially renamed program; callers retry from the
/// original source.
pub async fn rename_source<F: Frontend>(
    frontend: &F,
    code: &str,
    pass: &mut RenamePass,
) -> Result<RenameOutcome> {
    let mut program = frontend.parse(code)?;
    let summary = pass.run(&mut program).await?;
    let code = program.render()?;
    Ok(RenameOutcome { code, summary })
}
