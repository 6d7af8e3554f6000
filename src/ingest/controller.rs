use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::camera_loop;
use super::IngestCoordinator;
use crate::source::{FrameSource, SymbolDecoder};

/// Owns the live-producer task. Start acquires the capture device and spawns
/// the sampling loop; stop cancels the loop and waits for it to wind down.
pub struct CameraController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Capture acquisition failures surface here as the error; the loop is
    /// never spawned in that case and the ledger is untouched.
    pub fn start_scanning(
        &mut self,
        mut source: Box<dyn FrameSource>,
        decoder: Arc<dyn SymbolDecoder>,
        coordinator: IngestCoordinator,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("camera scanning already active");
        }

        source
            .start()
            .context("failed to acquire capture device")?;

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(camera_loop(source, decoder, coordinator, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("camera scanning started");
        Ok(())
    }

    /// Halts future ticks and releases the capture device. An ingestion call
    /// already in flight completes normally before the loop exits.
    pub async fn stop_scanning(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("camera loop task failed to join")?;
            info!("camera scanning stopped");
        }

        Ok(())
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
