use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a record came from. Provenance only; never part of identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScanOrigin {
    Upload,
    Camera,
}

impl ScanOrigin {
    /// Same spelling as the serde representation, so log lines and the
    /// exported artifact agree on the provenance tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOrigin::Upload => "upload",
            ScanOrigin::Camera => "camera",
        }
    }
}

/// One decoded observation. Immutable after construction; two records are
/// duplicates iff their payloads are byte-for-byte equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub payload: String,
    pub observed_at: DateTime<Utc>,
    pub origin: ScanOrigin,
}

impl ScanRecord {
    /// Builds a record for one decoded observation with a fresh id.
    ///
    /// Producers never call this with an empty payload: an empty decode
    /// means "no code found" and yields no candidate at all.
    pub fn new(payload: impl Into<String>, origin: ScanOrigin, observed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payload: payload.into(),
            observed_at,
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let now = Utc::now();
        let a = ScanRecord::new("same", ScanOrigin::Upload, now);
        let b = ScanRecord::new("same", ScanOrigin::Camera, now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.payload, b.payload);
    }

    #[test]
    fn as_str_matches_serialized_spelling() {
        for origin in [ScanOrigin::Upload, ScanOrigin::Camera] {
            let json = serde_json::to_string(&origin).unwrap();
            assert_eq!(json, format!("\"{}\"", origin.as_str()));
        }
    }

    #[test]
    fn serde_uses_camel_case_fields() {
        let record = ScanRecord::new("hello", ScanOrigin::Camera, Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"observedAt\""));
        assert!(json.contains("\"origin\":\"camera\""));
    }
}
