//! Terminal display sink for development without AR hardware

mod keys;
mod projection;
mod sink;

pub use keys::{is_quit_key, poll_quit};
pub use projection::TopDownProjection;
pub use sink::TerminalDisplaySink;
