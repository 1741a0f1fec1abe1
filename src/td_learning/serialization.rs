//! Saved form of a learned value table.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    td_learning::{agent::TdAgent, value_map::ValueMap},
};

/// Metadata about how a value table was trained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained, summed over resumed sessions
    pub episodes_trained: usize,
    /// Opponent trained against
    pub opponent: Option<String>,
    /// Whether the expert was allowed to block
    pub blocking_expert: Option<bool>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Seconds since the Unix epoch when saved
    pub saved_at: Option<u64>,
}

/// Versioned envelope written by the value table repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValueMap {
    pub version: u32,
    pub value_map: ValueMap,
    pub metadata: TrainingMetadata,
}

impl SavedValueMap {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(value_map: ValueMap, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            value_map,
            metadata,
        }
    }

    pub fn from_agent(agent: &TdAgent, metadata: TrainingMetadata) -> Self {
        Self::new(agent.value_map().clone(), metadata)
    }

    /// Stamp the save time.
    pub fn with_saved_at_now(mut self) -> Self {
        self.metadata.saved_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs());
        self
    }

    /// Unwrap the table, checking the format version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for tables written by a
    /// different format version.
    pub fn into_value_map(self) -> Result<ValueMap> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(self.value_map)
    }
}
