//! Source validation and output directory layout.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{PanoError, PanoResult};

/// Extensions accepted for the source panorama, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// Check that `path` exists and carries an allowed extension, then resolve it.
///
/// The file contents are never read; a corrupt image surfaces later as a projection failure.
pub fn validate_input(path: &Path) -> PanoResult<PathBuf> {
    if !path.exists() {
        return Err(PanoError::invalid_input(format!(
            "file does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(PanoError::invalid_input(format!(
            "not a file: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(PanoError::invalid_input(format!(
            "unsupported file format '.{ext}' (expected one of: {})",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    path.canonicalize().map_err(|e| {
        PanoError::invalid_input(format!("cannot resolve '{}': {e}", path.display()))
    })
}

/// `<output_root>/<source stem>`.
pub fn output_dir_for(output_root: &Path, source: &Path) -> PanoResult<PathBuf> {
    let stem = source.file_stem().ok_or_else(|| {
        PanoError::invalid_input(format!("'{}' has no file name", source.display()))
    })?;
    Ok(output_root.join(stem))
}

/// Create the output directory for `source` if it is missing and return it.
///
/// Existing directories and the files in them are left untouched.
pub fn prepare_output_dir(output_root: &Path, source: &Path) -> PanoResult<PathBuf> {
    let dir = output_dir_for(output_root, source)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
#[path = "../tests/unit/input/input.rs"]
mod tests;
