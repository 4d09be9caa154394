//! # Relabel JavaScript
//!
//! JavaScript, TypeScript and TSX front end for the relabel engine.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing → AST (rejected if it contains errors)
//!     │
//!     ├──> Scope Analysis
//!     │    ├─> Pass 1: open scopes, record declarations (var hoisting)
//!     │    └─> Pass 2: resolve references, collect globals
//!     │
//!     └──> JsProgram
//!          ├─> rename: update the binding table
//!          └─> render: replay binding sites over the original source,
//!              keeping shorthand keys and module interface names intact
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use relabel_engine::{rename_source, MappingOracle, RenamePass};
//! use relabel_javascript::JavaScriptFrontend;
//! use std::sync::Arc;
//!
//! let oracle = Arc::new(MappingOracle::new([("f", "increment"), ("a", "value")]));
//! let mut pass = RenamePass::new(oracle);
//! let outcome = rename_source(
//!     &JavaScriptFrontend::default(),
//!     "function f(a){ return a+1; } f(5);",
//!     &mut pass,
//! )
//! .await?;
//! assert_eq!(outcome.code, "function increment(value){ return value+1; } increment(5);");
//! ```

mod error;
mod identifier;
mod language;
mod program;
mod scope;

pub use error::{JsError, Result};
pub use identifier::{is_reserved_word, is_valid_identifier, to_identifier};
pub use language::Language;
pub use program::{JavaScriptFrontend, JsProgram};
