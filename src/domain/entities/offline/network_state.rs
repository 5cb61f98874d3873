use crate::domain::value_objects::offline::{ConnectionType, SpeedTier};
use serde::{Deserialize, Serialize};

/// Single source of truth for connectivity. Mutated only by the
/// NetworkMonitor; read by the coordinator to gate sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    pub is_online: bool,
    pub connection_type: ConnectionType,
    pub effective_speed: SpeedTier,
    pub metered: bool,
}

impl NetworkState {
    pub fn offline() -> Self {
        Self {
            is_online: false,
            connection_type: ConnectionType::Unknown,
            effective_speed: SpeedTier::Unknown,
            metered: false,
        }
    }

    /// Whether the state meaningfully differs for event emission; speed and
    /// metering changes alone do not produce a transition.
    pub fn transitioned_from(&self, previous: &NetworkState) -> bool {
        self.is_online != previous.is_online || self.connection_type != previous.connection_type
    }
}

impl Default for NetworkState {
    /// Optimistic default when no platform signal is available: sync attempt
    /// failures correct the state instead of blocking sync indefinitely.
    fn default() -> Self {
        Self {
            is_online: true,
            connection_type: ConnectionType::Unknown,
            effective_speed: SpeedTier::Unknown,
            metered: false,
        }
    }
}
