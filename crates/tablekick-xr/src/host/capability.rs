//! Host capabilities and the startup capability gate

use std::collections::BTreeSet;
use std::fmt;

/// A tracking feature the XR host may or may not provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Ray/surface hit-testing against the real world
    HitTest,
    /// Per-joint hand tracking (thumb tip, index tip, ...)
    HandTracking,
}

impl Capability {
    /// Feature name as XR runtimes spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::HitTest => "hit-test",
            Capability::HandTracking => "hand-tracking",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every capability this crate knows about
    pub fn all() -> Self {
        [Capability::HitTest, Capability::HandTracking]
            .into_iter()
            .collect()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Capabilities in `required` that this set lacks, in stable order
    pub fn missing(&self, required: &CapabilitySet) -> Vec<Capability> {
        required.0.difference(&self.0).copied().collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Capability::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// A required tracking feature is unavailable. Fatal at startup, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("host does not support required capabilities: {}", list(.missing))]
    Unsupported { missing: Vec<Capability> },

    #[error("host did not grant required capabilities: {}", list(.missing))]
    NotGranted { missing: Vec<Capability> },
}

fn list(caps: &[Capability]) -> String {
    caps.iter()
        .map(Capability::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fail fast if `supported` does not cover `required`
pub fn check_capabilities(
    supported: &CapabilitySet,
    required: &CapabilitySet,
) -> Result<(), CapabilityError> {
    let missing = supported.missing(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CapabilityError::Unsupported { missing })
    }
}
