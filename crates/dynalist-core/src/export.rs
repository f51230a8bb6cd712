//! JSON export of a document snapshot
//!
//! The export is the raw node list: UTF-8, four-space indentation, non-ASCII
//! characters written as-is. Files are written atomically (temp file, then
//! rename) so a reader never sees a partial export, and a failed export
//! leaves nothing behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::error::{DynalistError, Result};
use crate::models::Node;

const JSON_SUFFIX: &str = ".json";
const INDENT: &[u8] = b"    ";

/// File name for an export
///
/// Uses `file_name` when given and non-empty, otherwise `title`. `.json` is
/// appended unless the name already contains `.json` somewhere, in any
/// case: `report.JSON.bak` is kept as is, never rewritten.
pub fn export_file_name(file_name: Option<&str>, title: &str) -> String {
    let mut name = file_name
        .filter(|n| !n.is_empty())
        .unwrap_or(title)
        .to_string();

    if !name.to_ascii_lowercase().contains(JSON_SUFFIX) {
        name.push_str(JSON_SUFFIX);
    }
    name
}

/// Serialize nodes with four-space indentation
pub fn to_pretty_json(nodes: &[Node]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    nodes.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write nodes to `path`
pub fn write_export(path: &Path, nodes: &[Node]) -> Result<()> {
    let data = to_pretty_json(nodes).map_err(|e| DynalistError::InvalidExport {
        path: path.to_path_buf(),
        source: e,
    })?;

    atomic_write(path, &data).map_err(|e| DynalistError::Export {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a node list previously written by [`write_export`]
pub fn read_export(path: &Path) -> Result<Vec<Node>> {
    let content = fs::read_to_string(path).map_err(|e| DynalistError::Export {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| DynalistError::InvalidExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The parent directory must already exist. The temporary file is removed
/// on every failure path.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
