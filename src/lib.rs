//! Session-scoped QR code collection pipeline.
//!
//! Two producers feed one deduplicated, insertion-ordered ledger: a batch
//! path that scans uploaded image files in one call, and a live path that
//! samples a camera source on a fixed period. Both funnel through the
//! [`IngestCoordinator`], which serializes every check-then-append sequence
//! and publishes snapshots to read-only consumers. [`export`] turns a
//! snapshot into the downloadable `qr-codes.json` artifact.
//!
//! Decoding itself is a collaborator: anything implementing
//! [`SymbolDecoder`] plugs into both paths.

pub mod export;
pub mod ingest;
pub mod ledger;
pub mod models;
pub mod source;

pub use export::{
    parse_records, serialize_records, write_export, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
};
pub use ingest::{
    scan_files, BatchIngest, BatchReport, CameraController, FileFailure, IngestCoordinator,
};
pub use ledger::ScanLedger;
pub use models::{ScanOrigin, ScanRecord};
pub use source::{load_pixels, FrameSource, PixelFrame, SymbolDecoder};
