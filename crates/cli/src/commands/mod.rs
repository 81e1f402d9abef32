//! CLI command implementations

pub mod analyze;
pub mod collect;
pub mod suggest;

use anyhow::{Context, Result};
use optimizer_lib::inventory::snapshot_from_str;
use optimizer_lib::InventorySnapshot;
use std::fs;
use std::path::Path;

/// Read and normalize an inventory snapshot file
pub(crate) fn load_snapshot(path: &Path) -> Result<InventorySnapshot> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read inventory {}", path.display()))?;
    snapshot_from_str(&text).with_context(|| format!("Invalid inventory {}", path.display()))
}

/// Write `content` to `path`, creating parent directories
pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
