//! The XR host seam: capability query, async session setup, frame pump

use async_trait::async_trait;

use super::{check_capabilities, CapabilityError, CapabilitySet, FrameInput};
use crate::input::HostEvent;

/// Reference space the host resolves poses in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceSpace {
    /// Origin near the viewer's starting position
    #[default]
    Local,
    /// Origin on the floor
    LocalFloor,
    /// Head-locked; used only for the hit-test ray
    Viewer,
}

/// Session setup failures reported by the host
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("failed to acquire {0:?} reference space")]
    ReferenceSpace(ReferenceSpace),

    #[error("hit-test source unavailable: {0}")]
    HitTestSource(String),

    #[error("session already started")]
    AlreadyStarted,

    #[error("session setup failed: {0}")]
    Setup(String),
}

/// What the host granted once setup completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub granted: CapabilitySet,
    pub reference_space: ReferenceSpace,
}

/// An AR runtime that feeds poses and events to the game loop.
///
/// Setup is the only suspension point; every per-frame call is synchronous.
#[async_trait]
pub trait XrHost: Send {
    /// Features the device can provide, known before any session exists
    fn supported_capabilities(&self) -> CapabilitySet;

    /// Acquire reference spaces and the hit-test source
    async fn start_session(&mut self, required: &CapabilitySet) -> Result<SessionGrant, HostError>;

    /// Next frame of input, or `None` once the host stops producing frames
    fn next_frame(&mut self) -> Option<FrameInput>;

    /// Discrete events queued since the last call
    fn drain_events(&mut self) -> Vec<HostEvent>;

    /// Release host resources; called once on teardown
    fn end_session(&mut self) {}
}

/// Capability gate followed by session setup.
///
/// Fails before `start_session` is awaited when the host cannot satisfy
/// `required`, and again if the grant comes back short.
pub async fn open_session<H>(host: &mut H, required: &CapabilitySet) -> Result<SessionGrant, HostError>
where
    H: XrHost + ?Sized,
{
    check_capabilities(&host.supported_capabilities(), required)?;

    let grant = host.start_session(required).await?;
    let missing = grant.granted.missing(required);
    if !missing.is_empty() {
        return Err(CapabilityError::NotGranted { missing }.into());
    }

    tracing::info!(
        "XR session started with {} in {:?} space",
        grant.granted,
        grant.reference_space
    );
    Ok(grant)
}
