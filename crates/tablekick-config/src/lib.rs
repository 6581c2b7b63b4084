//! tablekick-config: configuration for the tablekick AR foosball table
//!
//! Configuration is read from TOML. Every key has a default, so an empty or
//! missing file yields a playable table. A few environment variables override
//! the file:
//! - `TABLEKICK_PROFILE`: session profile
//! - `TABLEKICK_LOG`: default log filter
//! - `TABLEKICK_PINCH_THRESHOLD`: pinch threshold in meters

mod error;
mod profile;
mod sections;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use profile::SessionProfile;
pub use sections::{
    AudioConfig, DisplayConfig, GestureConfig, KickConfig, LoggingConfig, PhysicsConfig, RigConfig,
};

pub const ENV_PROFILE: &str = "TABLEKICK_PROFILE";
pub const ENV_LOG: &str = "TABLEKICK_LOG";
pub const ENV_PINCH_THRESHOLD: &str = "TABLEKICK_PINCH_THRESHOLD";

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub profile: SessionProfile,
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub kick: KickConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Default config file location (`<config_dir>/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "geoffsee", "tablekick")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the default location, falling back to defaults, then apply
    /// environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Like [`AppConfig::load`] with an explicit path. A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                tracing::debug!("loading config from {}", p.display());
                Self::from_file(p)?
            }
            Some(p) => {
                tracing::debug!("no config at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rig.validate()?;
        self.physics.validate()?;
        self.gesture.validate()?;
        self.kick.validate()?;
        self.audio.validate()?;
        self.display.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Apply `TABLEKICK_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup(ENV_PROFILE) {
            self.profile = profile.parse()?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.logging.level = level;
        }
        if let Some(raw) = lookup(ENV_PINCH_THRESHOLD) {
            self.gesture.pinch_threshold = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: ENV_PINCH_THRESHOLD.to_string(),
                    message: format!("not a number: {}", raw),
                }
            })?;
        }
        Ok(())
    }

    pub fn with_profile(mut self, profile: SessionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_pinch_threshold(mut self, threshold: f32) -> Self {
        self.gesture.pinch_threshold = threshold;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.display.terminal = terminal;
        self
    }

    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.audio.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.rig.table_size, [1.2, 0.1, 0.7]);
        assert_eq!(config.rig.bar_count, 4);
        assert_eq!(config.kick.goal_line, 0.6);
        assert_eq!(config.profile, SessionProfile::HitTestHandTracking);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            profile = "hit-test-only"

            [rig]
            bar_count = 6

            [gesture]
            pinch_threshold = 0.025
            "#,
        )
        .unwrap();

        assert_eq!(config.profile, SessionProfile::HitTestOnly);
        assert_eq!(config.rig.bar_count, 6);
        assert_eq!(config.rig.middle_bar_players, 5);
        assert_eq!(config.gesture.pinch_threshold, 0.025);
        assert_eq!(config.physics.max_substeps, 3);
    }

    #[test]
    fn test_toml_round_trip_via_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let original = AppConfig::default()
            .with_profile(SessionProfile::AssetDrivenRig)
            .with_pinch_threshold(0.02);
        original.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml_str("[physics]\nmax_substeps = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "physics.max_substeps"));

        let err = AppConfig::from_toml_str("[rig]\ntable_size = [1.2, -0.1, 0.7]\n").unwrap_err();
        assert!(err.to_string().contains("rig.table_size[1]"));

        assert!(AppConfig::from_toml_str("[gesture]\npinch_threshold = 0.0\n").is_err());
        assert!(AppConfig::from_toml_str("profile = \"vr\"\n").is_err());
        assert!(matches!(
            AppConfig::from_toml_str("[rig\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_PROFILE, "asset-driven-rig"),
            (ENV_LOG, "debug"),
            (ENV_PINCH_THRESHOLD, " 0.04 "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.profile, SessionProfile::AssetDrivenRig);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.gesture.pinch_threshold, 0.04);
    }

    #[test]
    fn test_bad_threshold_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_PINCH_THRESHOLD).then(|| "close".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_load_from_missing_file_uses_env() {
        let dir = tempdir().unwrap();
        std::env::set_var(ENV_PROFILE, "hit-test-only");
        let result = AppConfig::load_from(Some(&dir.path().join("absent.toml")));
        std::env::remove_var(ENV_PROFILE);

        let config = result.unwrap();
        assert_eq!(config.profile, SessionProfile::HitTestOnly);
        assert_eq!(config.rig, RigConfig::default());
    }

    #[test]
    #[serial]
    fn test_env_override_is_validated() {
        std::env::set_var(ENV_PINCH_THRESHOLD, "-1");
        let result = AppConfig::load_from(None);
        std::env::remove_var(ENV_PINCH_THRESHOLD);
        assert!(result.is_err());
    }
}
