//! Persist rendered units into the generated-code directory.
//!
//! The directory is assumed to hold generated artifacts only and to be owned by
//! a single run at a time.
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::codegen::Unit;
use crate::error::{GenError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    Missing(PathBuf),
    Changed(PathBuf),
}

/// `mkdir -p dir`, then write every unit to `dir/<unit.name>`, overwriting.
///
/// No rollback: a failure midway leaves a mix of old and new files, which is why
/// callers render everything first.
pub fn write_units(dir: &Path, units: &[Unit]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;
    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let path = dir.join(&unit.name);
        std::fs::write(&path, &unit.content).map_err(|e| GenError::io(&path, e))?;
        debug!(path = %path.display(), bytes = unit.content.len(), "wrote unit");
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "generated sources written");
    Ok(written)
}

/// Compare rendered units with what is on disk. Never writes.
pub fn check_units(dir: &Path, units: &[Unit]) -> Result<Vec<Drift>> {
    let mut drift = Vec::new();
    for unit in units {
        let path = dir.join(&unit.name);
        match std::fs::read_to_string(&path) {
            Ok(existing) if existing == unit.content => {}
            Ok(_) => drift.push(Drift::Changed(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => drift.push(Drift::Missing(path)),
            Err(e) => return Err(GenError::io(path, e)),
        }
    }
    Ok(drift)
}

/// Remove `*.<extension>` files in `dir` other than the just-written `keep`
/// (left behind when a node type is dropped from the grammar).
pub fn prune_stale(dir: &Path, keep: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let keep = keep.iter().filter_map(|p| p.file_name()).collect::<IndexSet<_>>();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(GenError::io(dir, e)),
    };

    let mut stale = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GenError::io(dir, e))?.path();
        let is_generated_kind = path.extension().is_some_and(|ext| ext == extension);
        let is_current = path.file_name().is_some_and(|n| keep.contains(n));
        if path.is_file() && is_generated_kind && !is_current {
            stale.push(path);
        }
    }
    stale.sort();

    for path in &stale {
        std::fs::remove_file(path).map_err(|e| GenError::io(path, e))?;
        info!(path = %path.display(), "removed stale generated file");
    }
    Ok(stale)
}
