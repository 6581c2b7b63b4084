//! Audio cue output
//!
//! Cues are fire-and-forget: a failed cue is logged and the frame carries on.

mod backend;
mod cue;
mod recording;

pub use backend::{fire_cue, AudioError, CueSink, LogCueSink, NullCueSink};
pub use cue::{Cue, CueBank};
pub use recording::{FailingCueSink, RecordingCueSink};
