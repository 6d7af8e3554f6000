use std::collections::HashSet;

use crate::models::ScanRecord;

/// Insertion-ordered, duplicate-free store of scan records for one session.
///
/// The payload index mirrors the sequence on every mutation, so membership
/// checks are O(1) while iteration order stays append order. The ledger is
/// the single authority for uniqueness; it holds no locks of its own and is
/// owned by whoever serializes access (see `IngestCoordinator`).
#[derive(Debug, Default)]
pub struct ScanLedger {
    records: Vec<ScanRecord>,
    payloads: HashSet<String>,
}

impl ScanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tail insert. Callers establish non-duplication first; the ledger
    /// asserts the invariant rather than silently re-filtering.
    pub fn append(&mut self, record: ScanRecord) {
        debug_assert!(
            !self.payloads.contains(&record.payload),
            "duplicate payload appended to ledger"
        );
        self.payloads.insert(record.payload.clone());
        self.records.push(record);
    }

    pub fn contains_payload(&self, payload: &str) -> bool {
        self.payloads.contains(payload)
    }

    /// Order-preserving copy, detached from any later mutation.
    pub fn snapshot(&self) -> Vec<ScanRecord> {
        self.records.clone()
    }

    /// Resets to the empty state. Irreversible; the payload index resets
    /// with the sequence, so previously-seen payloads are accepted again.
    pub fn clear(&mut self) {
        self.records.clear();
        self.payloads.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
