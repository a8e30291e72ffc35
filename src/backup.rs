//! Numbered backup rotation for the active document file.
//!
//! Before each overwrite, `<file>.1` through `<file>.N` shift up by one and
//! the current file is copied to `<file>.1`; the oldest backup falls off.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn rotate_backups(path: &Path, keep: usize) -> Result<()> {
    if keep == 0 || !path.exists() {
        return Ok(());
    }

    let oldest = numbered(path, keep);
    if oldest.exists() {
        fs::remove_file(&oldest)
            .with_context(|| format!("Failed to drop oldest backup {}", oldest.display()))?;
    }
    for n in (1..keep).rev() {
        let from = numbered(path, n);
        if from.exists() {
            fs::rename(&from, numbered(path, n + 1))
                .with_context(|| format!("Failed to rotate backup {}", from.display()))?;
        }
    }
    fs::copy(path, numbered(path, 1))
        .with_context(|| format!("Failed to back up {}", path.display()))?;
    tracing::debug!("rotated backups of {} (keep {keep})", path.display());
    Ok(())
}

fn numbered(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}
