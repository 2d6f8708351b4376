//! I/O deadline configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use kindred_application::timeouts::IoTimeouts;

use crate::constants::{
    ASTROLOGY_TIMEOUT_SECS, EMBEDDING_TIMEOUT_SECS, NARRATIVE_TIMEOUT_SECS,
    PERSISTENCE_TIMEOUT_SECS,
};

/// Deadlines of calls to external collaborators, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Embedding generator
    pub embedding_secs: u64,
    /// Astrological calculator
    pub astrology_secs: u64,
    /// Narrative generator
    pub narrative_secs: u64,
    /// Persistence layer
    pub persistence_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            embedding_secs: EMBEDDING_TIMEOUT_SECS,
            astrology_secs: ASTROLOGY_TIMEOUT_SECS,
            narrative_secs: NARRATIVE_TIMEOUT_SECS,
            persistence_secs: PERSISTENCE_TIMEOUT_SECS,
        }
    }
}

impl TimeoutsConfig {
    /// Deadlines as durations
    pub fn to_io_timeouts(self) -> IoTimeouts {
        IoTimeouts {
            embedding: Duration::from_secs(self.embedding_secs),
            astrology: Duration::from_secs(self.astrology_secs),
            narrative: Duration::from_secs(self.narrative_secs),
            persistence: Duration::from_secs(self.persistence_secs),
        }
    }
}
