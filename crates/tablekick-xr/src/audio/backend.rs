//! Cue sink trait and the built-in sinks

use super::{Cue, CueBank};

/// Audio playback failures. Never fatal to the game loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("no audio asset for cue '{0}'")]
    MissingAsset(Cue),

    #[error("audio asset not found: {0}")]
    AssetNotFound(String),

    #[error("audio device unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget audio output
pub trait CueSink: Send {
    /// Start playing `cue`; returns once playback is queued
    fn play_cue(&mut self, cue: Cue) -> Result<(), AudioError>;

    /// Set master volume (0.0 - 1.0)
    fn set_volume(&mut self, _volume: f32) {}

    /// Check if audio is available
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: CueSink + ?Sized> CueSink for Box<T> {
    fn play_cue(&mut self, cue: Cue) -> Result<(), AudioError> {
        (**self).play_cue(cue)
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Play `cue` on `sink`, logging failures instead of returning them
pub fn fire_cue(sink: &mut dyn CueSink, cue: Cue) -> bool {
    match sink.play_cue(cue) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("audio cue '{}' failed: {}", cue, e);
            false
        }
    }
}

/// Null cue sink (no-op)
#[derive(Debug, Default)]
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn play_cue(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Headless sink that resolves assets and logs what would play
#[derive(Debug)]
pub struct LogCueSink {
    bank: CueBank,
    volume: f32,
    check_files: bool,
}

impl LogCueSink {
    pub fn new(bank: CueBank) -> Self {
        Self {
            bank,
            volume: 1.0,
            check_files: true,
        }
    }

    /// Skip the on-disk existence check for asset paths
    pub fn without_file_check(mut self) -> Self {
        self.check_files = false;
        self
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl CueSink for LogCueSink {
    fn play_cue(&mut self, cue: Cue) -> Result<(), AudioError> {
        let path = self.bank.asset(cue).ok_or(AudioError::MissingAsset(cue))?;
        if self.check_files && !path.exists() {
            return Err(AudioError::AssetNotFound(path.display().to_string()));
        }
        tracing::info!("cue '{}' -> {} (volume {:.2})", cue, path.display(), self.volume);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset() {
        let mut sink = LogCueSink::new(CueBank::new());
        assert_eq!(sink.play_cue(Cue::Goal), Err(AudioError::MissingAsset(Cue::Goal)));
        assert!(!fire_cue(&mut sink, Cue::Goal));
    }

    #[test]
    fn test_asset_file_check() {
        let bank = CueBank::new().with_asset(Cue::Kick, "definitely/not/here/kick.mp3");
        let mut sink = LogCueSink::new(bank.clone());
        assert!(matches!(sink.play_cue(Cue::Kick), Err(AudioError::AssetNotFound(_))));

        let mut unchecked = LogCueSink::new(bank).without_file_check();
        assert!(fire_cue(&mut unchecked, Cue::Kick));
    }

    #[test]
    fn test_volume_clamped() {
        let mut sink = LogCueSink::new(CueBank::new());
        sink.set_volume(3.0);
        assert_eq!(sink.volume(), 1.0);
    }
}
