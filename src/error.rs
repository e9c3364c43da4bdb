use std::path::PathBuf;
use thiserror::Error;

/// Every way a generation run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum GenError {
    /// Grammar line that cannot be turned into a node type (1-based line number).
    #[error("grammar line {line}: {reason}")]
    MalformedGrammarLine { line: usize, reason: String },

    #[error("grammar declares no node types")]
    EmptyGrammar,

    /// Template compilation or rendering failed for one output unit.
    #[error("failed to render `{unit}`: {cause}")]
    Render { unit: String, cause: String },

    #[error("{}: {cause}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
}

impl GenError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        GenError::MalformedGrammarLine { line, reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        GenError::Io { path: path.into(), cause }
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
