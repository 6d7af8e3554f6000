use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::ScanRecord;

/// Fixed artifact name the export surface always uses.
pub const EXPORT_FILE_NAME: &str = "qr-codes.json";
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Pretty-printed JSON with every record field preserved. Lossless, so an
/// export can be re-loaded later with `parse_records`.
pub fn serialize_records(records: &[ScanRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(records).context("failed to serialize scan records")
}

/// Inverse of `serialize_records`; recovers payloads and order exactly.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<ScanRecord>> {
    serde_json::from_slice(bytes).context("failed to parse exported scan records")
}

/// Writes the export artifact under its conventional name into `dir`,
/// returning the full path written.
pub fn write_export(records: &[ScanRecord], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    let bytes = serialize_records(records)?;
    fs::write(&path, bytes)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    Ok(path)
}
