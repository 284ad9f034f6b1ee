//! Timer definition loading
//!
//! Reads `[[timer]]` tables from a single TOML file or from every `*.toml`
//! file in a directory (sorted by file name, so load order is stable).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{TimerDefinition, TimerError, TimerFile};

/// Load definitions from a file, or from every `*.toml` in a directory.
pub fn load_definitions(path: &Path) -> Result<Vec<TimerDefinition>, TimerError> {
    if path.is_dir() {
        load_definitions_from_dir(path)
    } else {
        load_definitions_from_file(path)
    }
}

/// Load and validate all definitions in one TOML file
pub fn load_definitions_from_file(path: &Path) -> Result<Vec<TimerDefinition>, TimerError> {
    let content = fs::read_to_string(path).map_err(|source| TimerError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_definitions(&content, path)
}

/// Parse and validate definitions from TOML text. `path` is only used for
/// error context.
pub fn parse_definitions(content: &str, path: &Path) -> Result<Vec<TimerDefinition>, TimerError> {
    let file: TimerFile = toml::from_str(content).map_err(|source| TimerError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen: HashSet<&str> = HashSet::new();
    for def in &file.timers {
        def.validate()
            .map_err(|reason| TimerError::InvalidDefinition {
                path: path.to_path_buf(),
                reason,
            })?;

        if !seen.insert(def.id.as_str()) {
            return Err(TimerError::DuplicateId {
                id: def.id.clone(),
                path: path.to_path_buf(),
            });
        }

        if let Some(on_time) = def.on_time_ms.filter(|&on_time| on_time > def.preset_ms) {
            warn!(
                timer = %def.id,
                on_time,
                preset = def.preset_ms,
                "flasher on-time exceeds preset, flash output will cover the whole cycle"
            );
        }
    }
    drop(seen);

    debug!(path = %path.display(), count = file.timers.len(), "loaded timer definitions");
    Ok(file.timers)
}

/// Load all definitions from the `*.toml` files directly inside `dir`.
/// Ids must be unique across the whole directory.
pub fn load_definitions_from_dir(dir: &Path) -> Result<Vec<TimerDefinition>, TimerError> {
    let entries = fs::read_dir(dir).map_err(|source| TimerError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut definitions: Vec<TimerDefinition> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for file in files {
        for def in load_definitions_from_file(&file)? {
            if !seen.insert(def.id.clone()) {
                return Err(TimerError::DuplicateId { id: def.id, path: file });
            }
            definitions.push(def);
        }
    }

    Ok(definitions)
}
