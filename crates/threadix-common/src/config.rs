//! Configuration structures for Threadix.

use serde::{Deserialize, Serialize};

/// Configuration for a single index instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Number of node slots to reserve in the arena up front.
    /// The arena still grows on demand once the reservation is exhausted.
    pub initial_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256, // one allocation covers ~40 short keys
        }
    }
}
