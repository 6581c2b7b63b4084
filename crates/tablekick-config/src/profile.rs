//! Session profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which flavour of the table to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionProfile {
    /// Placement and physics only; no kicking
    #[serde(rename = "hit-test-only")]
    HitTestOnly,
    /// Placement plus pinch-to-kick
    #[default]
    #[serde(rename = "hit-test+hand-tracking")]
    HitTestHandTracking,
    /// Pinch-to-kick with mesh players instead of primitives
    #[serde(rename = "asset-driven-rig")]
    AssetDrivenRig,
}

impl SessionProfile {
    pub const ALL: [SessionProfile; 3] = [
        SessionProfile::HitTestOnly,
        SessionProfile::HitTestHandTracking,
        SessionProfile::AssetDrivenRig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionProfile::HitTestOnly => "hit-test-only",
            SessionProfile::HitTestHandTracking => "hit-test+hand-tracking",
            SessionProfile::AssetDrivenRig => "asset-driven-rig",
        }
    }

    pub fn requires_hand_tracking(&self) -> bool {
        !matches!(self, SessionProfile::HitTestOnly)
    }

    pub fn uses_mesh_players(&self) -> bool {
        matches!(self, SessionProfile::AssetDrivenRig)
    }
}

impl fmt::Display for SessionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profiles() {
        for profile in SessionProfile::ALL {
            assert_eq!(profile.as_str().parse::<SessionProfile>().unwrap(), profile);
        }
        assert!(matches!(
            "vr-only".parse::<SessionProfile>(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_capability_needs() {
        assert!(!SessionProfile::HitTestOnly.requires_hand_tracking());
        assert!(SessionProfile::AssetDrivenRig.requires_hand_tracking());
        assert!(SessionProfile::AssetDrivenRig.uses_mesh_players());
    }
}
