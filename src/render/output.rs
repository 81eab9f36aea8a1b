//! Writing the rendered asset to disk

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `contents` to `path` atomically
///
/// The file is staged next to its destination and renamed into place;
/// readers see either the previous contents or the new ones.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create output directory {:?}", parent))?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
    staged
        .write_all(contents.as_bytes())
        .context("Failed to write rendered config")?;
    staged
        .as_file()
        .sync_all()
        .context("Failed to flush rendered config")?;
    staged
        .persist(path)
        .with_context(|| format!("Failed to move rendered config into place at {:?}", path))?;

    info!(path = ?path, bytes = contents.len(), "Wrote dashboard config");
    Ok(())
}
