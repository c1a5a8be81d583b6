use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use memmap2::Mmap;

/// Memory-maps a tag file read-only.
pub fn map_file<P: AsRef<Path>>(path: P) -> Result<Mmap> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file '{}'", path.display()))?;
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap file '{}'", path.display()))?;
    Ok(map)
}
