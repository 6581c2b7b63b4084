//! XR host abstraction
//!
//! The host is the AR runtime: it reports which tracking features exist,
//! performs the one-time async session setup, and afterwards pumps one
//! [`FrameInput`] plus a batch of [`HostEvent`](crate::input::HostEvent)s
//! per display frame.

mod capability;
mod frame;
mod source;

pub use capability::{check_capabilities, Capability, CapabilityError, CapabilitySet};
pub use frame::{FrameInput, TrackingState};
pub use source::{open_session, HostError, ReferenceSpace, SessionGrant, XrHost};
