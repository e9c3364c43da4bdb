//! Visitor-pattern AST generator.
//!
//! Reads a tiny grammar (`Binary : Expr left, Token op, Expr right`, one node
//! type per line) and emits one source file per node type plus one visitor
//! interface with a dispatch method per node type, in grammar order.
//!
//! grammar text → `grammar::parse` → `ir::Grammar` → `codegen::Codegen` → `writer`
pub mod cli;
pub mod codegen;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod target;
pub mod writer;

use std::path::{Path, PathBuf};

pub use codegen::{Codegen, Settings, Unit};
pub use error::GenError;
pub use ir::{Field, Grammar, NodeType};
pub use target::Target;

/// Parse, render everything in memory, then write. Returns the written paths.
///
/// Any parse or render error aborts before the output directory is touched.
pub fn generate(source: &str, out_dir: &Path, codegen: &Codegen) -> error::Result<Vec<PathBuf>> {
    let grammar = grammar::parse(source)?;
    let units = codegen.render_all(&grammar)?;
    tracing::debug!(nodes = grammar.len(), units = units.len(), "rendered all units");
    writer::write_units(out_dir, &units)
}
