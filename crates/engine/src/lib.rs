//! # Relabel Engine
//!
//! Renames every binding of a program using names proposed by an external
//! oracle, keeping the result consistent, collision-free and deterministic.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Frontend::parse → ScopedProgram (scopes, bindings, sites)
//!     │
//!     ├──> Collector: snapshot of every declaration site
//!     │
//!     ├──> Scheduler (batches, strictly one after another)
//!     │    ├─> Context Window: bounded excerpt of the anchor scope
//!     │    ├─> NameOracle::propose (concurrent inside a batch)
//!     │    └─> Coordinator: escape, dedupe, commit to Registry, rename
//!     │
//!     └──> ScopedProgram::render → renamed source
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use relabel_engine::{rename_source, MappingOracle, RenameConfig, RenamePass};
//! use std::sync::Arc;
//!
//! let oracle = Arc::new(MappingOracle::new([("a", "count")]));
//! let mut pass = RenamePass::new(oracle).with_config(RenameConfig::batched());
//! let outcome = rename_source(&frontend, "let a = 1;", &mut pass).await?;
//! assert_eq!(outcome.code, "let count = 1;");
//! ```

mod collector;
mod config;
mod context;
mod coordinator;
mod error;
mod oracle;
mod pipeline;
mod program;
mod registry;
mod scheduler;
mod types;

#[cfg(test)]
mod testing;

pub use collector::collect_occurrences;
pub use config::{RenameConfig, Strategy};
pub use context::{anchor_scope, context_window};
pub use coordinator::{commit_and_apply, escape_name, reuse_committed};
pub use error::{RenameError, Result};
pub use oracle::{oracle_fn, FnOracle, MappingOracle, NameOracle};
pub use pipeline::{rename_source, RenameOutcome};
pub use program::{Frontend, ScopedProgram};
pub use registry::Registry;
pub use scheduler::{ProgressFn, RenamePass};
pub use types::{BindingId, NameMapping, Occurrence, RenameSummary, ScopeId, ScopeText};
