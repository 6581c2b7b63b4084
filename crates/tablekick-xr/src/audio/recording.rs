//! Cue sinks for tests and dry runs

use super::{AudioError, Cue, CueSink};

/// Records every cue it is asked to play
#[derive(Debug, Default, Clone)]
pub struct RecordingCueSink {
    played: Vec<Cue>,
}

impl RecordingCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[Cue] {
        &self.played
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.played.iter().filter(|c| **c == cue).count()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }
}

impl CueSink for RecordingCueSink {
    fn play_cue(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.played.push(cue);
        Ok(())
    }
}

/// Fails every request, counting attempts
#[derive(Debug, Clone)]
pub struct FailingCueSink {
    error: AudioError,
    attempts: usize,
}

impl FailingCueSink {
    pub fn new(error: AudioError) -> Self {
        Self { error, attempts: 0 }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl Default for FailingCueSink {
    fn default() -> Self {
        Self::new(AudioError::Unavailable("no output device".to_string()))
    }
}

impl CueSink for FailingCueSink {
    fn play_cue(&mut self, _cue: Cue) -> Result<(), AudioError> {
        self.attempts += 1;
        Err(self.error.clone())
    }

    fn is_available(&self) -> bool {
        false
    }
}
