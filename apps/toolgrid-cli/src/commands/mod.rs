//! Subcommand implementations
//!
//! Each command returns a result that is both `Serialize` (for `--json`)
//! and `Display` (for humans); printing happens in [`crate::run`].

pub mod convert;
pub mod pdf;
pub mod tools;

use anyhow::Context;
use std::fs;
use std::path::Path;

pub(crate) fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write `bytes` to `path`, creating parent directories as needed
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "wrote output");
    Ok(())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
