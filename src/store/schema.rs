use serde::{Deserialize, Serialize};

use crate::history::TimingHistory;

pub const SCHEMA_VERSION: u32 = 1;

/// Versioned envelope around the persisted TimingHistory. The whole record
/// lives in one slot; a version bump invalidates it wholesale rather than
/// migrating field by field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub history: TimingHistory,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            history: TimingHistory::default(),
        }
    }
}

impl HistoryData {
    /// Loaded data from a different schema version is discarded, not
    /// migrated.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
