//! Error types for the game core

use tablekick_config::ConfigError;
use tablekick_xr::host::{CapabilityError, HostError};

use crate::entity::EntityId;

/// Misuse of the physics bridge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhysicsError {
    #[error("entity {0} has no physics body")]
    NoBody(EntityId),

    #[error("entity {0} is not dynamic")]
    NotDynamic(EntityId),

    #[error("non-finite value supplied for entity {0}")]
    NonFinite(EntityId),
}

/// Session startup failures
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("XR host error: {0}")]
    Host(HostError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<HostError> for SessionError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Capability(e) => SessionError::Capability(e),
            other => SessionError::Host(other),
        }
    }
}
