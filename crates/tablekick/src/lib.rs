pub use tablekick_config::{self as config, AppConfig, SessionProfile};
pub use tablekick_core::{anchor, kick, layout, physics, rig, session, Session, SessionError};
pub use tablekick_xr::{audio, display, host, input, spatial};
