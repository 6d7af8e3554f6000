pub mod batch;
pub mod controller;
pub mod dedup;
mod loop_worker;

pub use batch::{scan_files, BatchReport, FileFailure};
pub use controller::CameraController;

use std::sync::Arc;

use log::info;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::ledger::ScanLedger;
use crate::models::ScanRecord;
use dedup::is_duplicate;

/// Outcome of one batch ingestion call.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchIngest {
    pub accepted: usize,
    pub rejected: usize,
}

/// Single serialization point for the session ledger.
///
/// Both producers funnel through here. The whole check-then-append-then-
/// publish sequence runs under one ledger lock, so two ingestion calls (or
/// an ingestion and a `clear`) never interleave mid-operation. Cloning
/// yields another handle to the same session.
#[derive(Clone)]
pub struct IngestCoordinator {
    ledger: Arc<Mutex<ScanLedger>>,
    snapshot_tx: Arc<watch::Sender<Vec<ScanRecord>>>,
}

impl IngestCoordinator {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            ledger: Arc::new(Mutex::new(ScanLedger::new())),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    /// Admits every non-duplicate candidate in order, then publishes one
    /// updated snapshot for the whole batch.
    ///
    /// Candidates are checked against the ledger as it stands, so a repeat
    /// later in the same batch is rejected along with repeats of already-
    /// accumulated payloads. This keeps the uniqueness invariant
    /// unconditional; the accepted prefix of a batch is part of "existing"
    /// for the candidates after it.
    pub async fn ingest_batch(&self, candidates: Vec<ScanRecord>) -> BatchIngest {
        let mut ledger = self.ledger.lock().await;
        let mut outcome = BatchIngest::default();

        for candidate in candidates {
            if is_duplicate(&candidate, &ledger) {
                info!(
                    "rejected duplicate payload from {}",
                    candidate.origin.as_str()
                );
                outcome.rejected += 1;
            } else {
                ledger.append(candidate);
                outcome.accepted += 1;
            }
        }

        self.publish(&ledger);
        outcome
    }

    /// Admits the candidate unless its payload is already held. Returns
    /// whether it was accepted; a duplicate is a no-op.
    pub async fn ingest_one(&self, candidate: ScanRecord) -> bool {
        let mut ledger = self.ledger.lock().await;
        if is_duplicate(&candidate, &ledger) {
            return false;
        }

        ledger.append(candidate);
        self.publish(&ledger);
        true
    }

    /// Empties the session. Runs under the same lock as ingestion, so a
    /// racing ingest call sees either the pre-clear or post-clear ledger,
    /// never a torn state. Consumers observe the empty snapshot.
    pub async fn clear(&self) {
        let mut ledger = self.ledger.lock().await;
        ledger.clear();
        self.publish(&ledger);
        info!("session ledger cleared");
    }

    /// Order-preserving copy of the current ledger contents.
    pub async fn snapshot(&self) -> Vec<ScanRecord> {
        self.ledger.lock().await.snapshot()
    }

    /// Presentation surface: receivers see a fresh snapshot after every
    /// ingestion call and after `clear`.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ScanRecord>> {
        self.snapshot_tx.subscribe()
    }

    fn publish(&self, ledger: &ScanLedger) {
        self.snapshot_tx.send_replace(ledger.snapshot());
    }
}

impl Default for IngestCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanOrigin;
    use chrono::Utc;

    fn candidate(payload: &str, origin: ScanOrigin) -> ScanRecord {
        ScanRecord::new(payload, origin, Utc::now())
    }

    async fn payloads(coordinator: &IngestCoordinator) -> Vec<String> {
        coordinator
            .snapshot()
            .await
            .into_iter()
            .map(|r| r.payload)
            .collect()
    }

    #[tokio::test]
    async fn repeated_ingest_one_is_idempotent() {
        let coordinator = IngestCoordinator::new();

        assert!(coordinator.ingest_one(candidate("X", ScanOrigin::Camera)).await);
        assert!(!coordinator.ingest_one(candidate("X", ScanOrigin::Camera)).await);

        assert_eq!(payloads(&coordinator).await, vec!["X"]);
    }

    #[tokio::test]
    async fn batch_filters_within_batch_repeats() {
        let coordinator = IngestCoordinator::new();

        let outcome = coordinator
            .ingest_batch(vec![
                candidate("A", ScanOrigin::Upload),
                candidate("B", ScanOrigin::Upload),
                candidate("A", ScanOrigin::Upload),
            ])
            .await;

        assert_eq!(outcome, BatchIngest { accepted: 2, rejected: 1 });
        assert_eq!(payloads(&coordinator).await, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn batch_filters_against_accumulated_state() {
        let coordinator = IngestCoordinator::new();
        coordinator.ingest_one(candidate("A", ScanOrigin::Camera)).await;

        let outcome = coordinator
            .ingest_batch(vec![
                candidate("A", ScanOrigin::Upload),
                candidate("C", ScanOrigin::Upload),
            ])
            .await;

        assert_eq!(outcome, BatchIngest { accepted: 1, rejected: 1 });
        assert_eq!(payloads(&coordinator).await, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn order_is_first_acceptance_order_across_origins() {
        let coordinator = IngestCoordinator::new();

        coordinator.ingest_one(candidate("cam-1", ScanOrigin::Camera)).await;
        coordinator
            .ingest_batch(vec![
                candidate("up-1", ScanOrigin::Upload),
                candidate("cam-1", ScanOrigin::Upload),
                candidate("up-2", ScanOrigin::Upload),
            ])
            .await;
        coordinator.ingest_one(candidate("cam-2", ScanOrigin::Camera)).await;

        assert_eq!(
            payloads(&coordinator).await,
            vec!["cam-1", "up-1", "up-2", "cam-2"]
        );
    }

    #[tokio::test]
    async fn clear_resets_dedup_state() {
        let coordinator = IngestCoordinator::new();

        coordinator.ingest_one(candidate("X", ScanOrigin::Camera)).await;
        coordinator.clear().await;
        assert!(payloads(&coordinator).await.is_empty());

        assert!(coordinator.ingest_one(candidate("X", ScanOrigin::Camera)).await);
        assert_eq!(payloads(&coordinator).await, vec!["X"]);
    }

    #[tokio::test]
    async fn subscribers_see_each_published_snapshot() {
        let coordinator = IngestCoordinator::new();
        let mut rx = coordinator.subscribe();

        coordinator.ingest_one(candidate("A", ScanOrigin::Camera)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        coordinator.ingest_batch(vec![candidate("B", ScanOrigin::Upload)]).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 2);

        coordinator.clear().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn concurrent_producers_never_break_uniqueness() {
        let coordinator = IngestCoordinator::new();

        let live = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    coordinator
                        .ingest_one(candidate(&format!("code-{}", i % 10), ScanOrigin::Camera))
                        .await;
                }
            })
        };

        let batch = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                for _ in 0..5 {
                    let candidates = (0..10)
                        .map(|i| candidate(&format!("code-{i}"), ScanOrigin::Upload))
                        .collect();
                    coordinator.ingest_batch(candidates).await;
                }
            })
        };

        live.await.unwrap();
        batch.await.unwrap();

        let seen = payloads(&coordinator).await;
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(seen.len(), unique.len(), "duplicate payloads in ledger");
        assert_eq!(seen.len(), 10);
    }
}
