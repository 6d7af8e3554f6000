use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};

use super::IngestCoordinator;
use crate::models::{ScanOrigin, ScanRecord};
use crate::source::{load_pixels, SymbolDecoder};

/// What one upload batch did, for the user-facing summary.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files_scanned: usize,
    pub failures: Vec<FileFailure>,
    pub candidates_found: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// A file that could not be loaded as an image. Skipped, never fatal.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl BatchReport {
    /// True when no image in the batch yielded a code at all. Distinct from
    /// `failures`, which tracks files that could not even be read.
    pub fn found_nothing(&self) -> bool {
        self.candidates_found == 0
    }
}

/// Upload path of the pipeline: scan every file, collect the decoded
/// candidates, then hand the whole batch to the coordinator in one call.
///
/// Per-file problems are resolved before the coordinator is involved: an
/// unreadable file is recorded and skipped, an image with no code simply
/// contributes no candidate. Decoding runs on the blocking pool since it is
/// CPU-bound over raw pixels.
pub async fn scan_files(
    paths: &[PathBuf],
    decoder: Arc<dyn SymbolDecoder>,
    coordinator: &IngestCoordinator,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut candidates = Vec::new();

    for path in paths {
        report.files_scanned += 1;

        let frame = match load_pixels(path) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping {}: {err:#}", path.display());
                report.failures.push(FileFailure {
                    path: path.clone(),
                    reason: format!("{err:#}"),
                });
                continue;
            }
        };

        let decoder = Arc::clone(&decoder);
        let payload = tokio::task::spawn_blocking(move || {
            decoder.decode(&frame.pixels, frame.width, frame.height)
        })
        .await
        .context("decode worker join failed")?;

        // An empty decode is "no code found", not a candidate.
        if let Some(payload) = payload.filter(|p| !p.is_empty()) {
            candidates.push(ScanRecord::new(payload, ScanOrigin::Upload, Utc::now()));
        }
    }

    report.candidates_found = candidates.len();
    let outcome = coordinator.ingest_batch(candidates).await;
    report.accepted = outcome.accepted;
    report.rejected = outcome.rejected;

    info!(
        "batch scan: {} files, {} unreadable, {} candidates, {} accepted, {} rejected",
        report.files_scanned,
        report.failures.len(),
        report.candidates_found,
        report.accepted,
        report.rejected
    );

    Ok(report)
}
