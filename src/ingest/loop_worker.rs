use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::IngestCoordinator;
use crate::models::{ScanOrigin, ScanRecord};
use crate::source::{FrameSource, SymbolDecoder};

const SAMPLE_INTERVAL_MS: u64 = 200;
const SAMPLE_TIMEOUT_SECS: u64 = 5;

/// Periodic sampling loop for the live producer.
///
/// `Delay` tick behavior keeps at most one scan in flight: a scan that
/// outlives the period pushes the next tick back instead of stacking a
/// backlog. Cancellation stops future ticks; a sample already past its
/// ingest call finishes normally first.
pub(super) async fn camera_loop(
    mut source: Box<dyn FrameSource>,
    decoder: Arc<dyn SymbolDecoder>,
    coordinator: IngestCoordinator,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(SAMPLE_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = sample_frame(&mut source, &decoder, &coordinator);
                match tokio::time::timeout(Duration::from_secs(SAMPLE_TIMEOUT_SECS), fut).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => error!("camera sample failed: {err:?}"),
                    Err(_) => warn!("camera sample timeout (> {SAMPLE_TIMEOUT_SECS}s)"),
                }
            }
            _ = cancel_token.cancelled() => {
                info!("camera loop shutting down");
                break;
            }
        }
    }

    source.stop();
}

async fn sample_frame(
    source: &mut Box<dyn FrameSource>,
    decoder: &Arc<dyn SymbolDecoder>,
    coordinator: &IngestCoordinator,
) -> Result<()> {
    let Some(frame) = source.grab().context("frame grab failed")? else {
        return Ok(());
    };

    let decoder = Arc::clone(decoder);
    let payload = tokio::task::spawn_blocking(move || {
        decoder.decode(&frame.pixels, frame.width, frame.height)
    })
    .await
    .context("decode worker join failed")?;

    // Empty decode means the frame held no code; nothing to ingest.
    let Some(payload) = payload.filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    let record = ScanRecord::new(payload, ScanOrigin::Camera, Utc::now());
    if coordinator.ingest_one(record).await {
        info!("camera accepted new code");
    }

    Ok(())
}
