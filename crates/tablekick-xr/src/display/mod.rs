//! Display abstraction
//!
//! The game writes a [`Scene`] of visual nodes and hands it to a
//! [`DisplaySink`] once per frame:
//! - terminal sink for development/simulation
//! - logging, recording and null sinks for headless runs and tests

mod recording;
mod scene;
mod sink;
mod surface;
pub mod terminal;

pub use recording::{PresentedNode, RecordingDisplaySink};
pub use scene::{NodeId, Scene, Shape, VisualNode};
pub use sink::{DisplayError, DisplaySink, LogDisplaySink, NullDisplaySink};
pub use surface::{Color, SurfaceCapabilities};
