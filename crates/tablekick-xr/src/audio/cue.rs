//! Named audio cues

use std::path::{Path, PathBuf};

/// Short sound effects the game fires and forgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A pinch kicked the ball
    Kick,
    /// The ball crossed a goal line
    Goal,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Kick => "kick",
            Cue::Goal => "goal",
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset file per cue; a cue without a file cannot be played
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueBank {
    kick: Option<PathBuf>,
    goal: Option<PathBuf>,
}

impl CueBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, cue: Cue, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match cue {
            Cue::Kick => self.kick = path,
            Cue::Goal => self.goal = path,
        }
        self
    }

    pub fn asset(&self, cue: Cue) -> Option<&Path> {
        match cue {
            Cue::Kick => self.kick.as_deref(),
            Cue::Goal => self.goal.as_deref(),
        }
    }
}
