use crate::ledger::ScanLedger;
use crate::models::ScanRecord;

/// Duplicate iff the accumulated state already holds an equal payload.
///
/// Equality is exact byte equality on the payload; id, origin and timestamp
/// never participate. Kept separate from `ScanLedger::append` so the
/// coordinator can evaluate a batch's candidates against accumulated state
/// and against earlier acceptances from the same batch.
pub fn is_duplicate(candidate: &ScanRecord, existing: &ScanLedger) -> bool {
    existing.contains_payload(&candidate.payload)
}
