//! Configuration sections

use serde::{Deserialize, Serialize};

use crate::ConfigError;

// Serde default functions

const fn default_table_size() -> [f32; 3] {
    [1.2, 0.1, 0.7]
}
const fn default_bar_count() -> u32 {
    4
}
const fn default_bar_spacing() -> f32 {
    0.2
}
const fn default_bar_height() -> f32 {
    0.15
}
const fn default_bar_radius() -> f32 {
    0.02
}
const fn default_bar_length() -> f32 {
    1.2
}
const fn default_end_bar_players() -> u32 {
    3
}
const fn default_middle_bar_players() -> u32 {
    5
}
const fn default_player_half_span() -> f32 {
    0.4
}
const fn default_player_body_radius() -> f32 {
    0.015
}
const fn default_player_body_height() -> f32 {
    0.1
}
const fn default_player_head_size() -> f32 {
    0.03
}
fn default_player_mesh() -> String {
    "models/player.glb".into()
}
const fn default_ball_radius() -> f32 {
    0.03
}
const fn default_ball_mass() -> f32 {
    0.1
}
const fn default_ball_spawn() -> [f32; 3] {
    [0.0, 0.1, 0.0]
}
const fn default_reticle_radii() -> [f32; 2] {
    [0.05, 0.06]
}
fn default_fixed_timestep() -> f32 {
    1.0 / 60.0
}
const fn default_max_substeps() -> u32 {
    3
}
const fn default_pinch_threshold() -> f32 {
    0.03
}
const fn default_impulse() -> f32 {
    0.2
}
const fn default_goal_line() -> f32 {
    0.6
}
const fn default_floor_limit() -> f32 {
    -1.0
}
const fn default_activity_epsilon() -> f32 {
    0.01
}
const fn default_true() -> bool {
    true
}
fn default_kick_cue() -> String {
    "assets/kick.mp3".into()
}
fn default_goal_cue() -> String {
    "assets/goal.mp3".into()
}
const fn default_volume() -> f32 {
    1.0
}
const fn default_frame_rate() -> u32 {
    60
}
fn default_log_level() -> String {
    "info".into()
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a positive number, got {}", value)))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be zero or positive, got {}", value)))
    }
}

fn finite(field: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite"))
    }
}

/// Table, bar, player and ball geometry (meters, kilograms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Table length x height x width
    #[serde(default = "default_table_size")]
    pub table_size: [f32; 3],

    #[serde(default = "default_bar_count")]
    pub bar_count: u32,

    /// Distance between neighbouring bars along the table's long axis
    #[serde(default = "default_bar_spacing")]
    pub bar_spacing: f32,

    /// Bar height above the table center
    #[serde(default = "default_bar_height")]
    pub bar_height: f32,

    #[serde(default = "default_bar_radius")]
    pub bar_radius: f32,

    #[serde(default = "default_bar_length")]
    pub bar_length: f32,

    /// Players on the first and last bar
    #[serde(default = "default_end_bar_players")]
    pub end_bar_players: u32,

    /// Players on every other bar
    #[serde(default = "default_middle_bar_players")]
    pub middle_bar_players: u32,

    /// Distance from the bar midpoint to the outermost player
    #[serde(default = "default_player_half_span")]
    pub player_half_span: f32,

    #[serde(default = "default_player_body_radius")]
    pub player_body_radius: f32,

    #[serde(default = "default_player_body_height")]
    pub player_body_height: f32,

    #[serde(default = "default_player_head_size")]
    pub player_head_size: f32,

    /// Mesh asset key for the asset-driven rig
    #[serde(default = "default_player_mesh")]
    pub player_mesh: String,

    #[serde(default = "default_ball_radius")]
    pub ball_radius: f32,

    #[serde(default = "default_ball_mass")]
    pub ball_mass: f32,

    /// Ball spawn point in the rig frame
    #[serde(default = "default_ball_spawn")]
    pub ball_spawn: [f32; 3],

    /// Placement reticle inner and outer radius
    #[serde(default = "default_reticle_radii")]
    pub reticle_radii: [f32; 2],
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            table_size: default_table_size(),
            bar_count: default_bar_count(),
            bar_spacing: default_bar_spacing(),
            bar_height: default_bar_height(),
            bar_radius: default_bar_radius(),
            bar_length: default_bar_length(),
            end_bar_players: default_end_bar_players(),
            middle_bar_players: default_middle_bar_players(),
            player_half_span: default_player_half_span(),
            player_body_radius: default_player_body_radius(),
            player_body_height: default_player_body_height(),
            player_head_size: default_player_head_size(),
            player_mesh: default_player_mesh(),
            ball_radius: default_ball_radius(),
            ball_mass: default_ball_mass(),
            ball_spawn: default_ball_spawn(),
            reticle_radii: default_reticle_radii(),
        }
    }
}

impl RigConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, v) in self.table_size.iter().enumerate() {
            positive(&format!("rig.table_size[{}]", i), *v)?;
        }
        if self.bar_count == 0 {
            return Err(ConfigError::invalid("rig.bar_count", "must be at least 1"));
        }
        positive("rig.bar_spacing", self.bar_spacing)?;
        finite("rig.bar_height", &[self.bar_height])?;
        positive("rig.bar_radius", self.bar_radius)?;
        positive("rig.bar_length", self.bar_length)?;
        non_negative("rig.player_half_span", self.player_half_span)?;
        positive("rig.player_body_radius", self.player_body_radius)?;
        positive("rig.player_body_height", self.player_body_height)?;
        positive("rig.player_head_size", self.player_head_size)?;
        positive("rig.ball_radius", self.ball_radius)?;
        positive("rig.ball_mass", self.ball_mass)?;
        finite("rig.ball_spawn", &self.ball_spawn)?;

        let [inner, outer] = self.reticle_radii;
        positive("rig.reticle_radii", inner)?;
        if !outer.is_finite() || outer <= inner {
            return Err(ConfigError::invalid(
                "rig.reticle_radii",
                "outer radius must exceed inner radius",
            ));
        }
        Ok(())
    }
}

/// Fixed-step simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Seconds per sub-step
    #[serde(default = "default_fixed_timestep")]
    pub fixed_timestep: f32,

    /// Upper bound on sub-steps per frame; extra time is dropped
    #[serde(default = "default_max_substeps")]
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: default_fixed_timestep(),
            max_substeps: default_max_substeps(),
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("physics.fixed_timestep", self.fixed_timestep)?;
        if self.max_substeps == 0 {
            return Err(ConfigError::invalid("physics.max_substeps", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Thumb-index distance below which a hand is pinched (meters)
    #[serde(default = "default_pinch_threshold")]
    pub pinch_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: default_pinch_threshold(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gesture.pinch_threshold", self.pinch_threshold)
    }
}

/// Kick impulse and goal detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickConfig {
    /// Impulse magnitude along the play axis (N*s)
    #[serde(default = "default_impulse")]
    pub impulse: f32,

    /// |x| beyond which the ball has scored
    #[serde(default = "default_goal_line")]
    pub goal_line: f32,

    /// Rig-frame height below which the ball is out of bounds
    #[serde(default = "default_floor_limit")]
    pub floor_limit: f32,

    /// Horizontal speed that counts as the ball being in play (m/s)
    #[serde(default = "default_activity_epsilon")]
    pub activity_epsilon: f32,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            impulse: default_impulse(),
            goal_line: default_goal_line(),
            floor_limit: default_floor_limit(),
            activity_epsilon: default_activity_epsilon(),
        }
    }
}

impl KickConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("kick.impulse", self.impulse)?;
        positive("kick.goal_line", self.goal_line)?;
        finite("kick.floor_limit", &[self.floor_limit])?;
        non_negative("kick.activity_epsilon", self.activity_epsilon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_kick_cue")]
    pub kick_cue: String,

    #[serde(default = "default_goal_cue")]
    pub goal_cue: String,

    /// Master volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kick_cue: default_kick_cue(),
            goal_cue: default_goal_cue(),
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::invalid(
                "audio.volume",
                format!("must be between 0 and 1, got {}", self.volume),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Render to the terminal instead of logging
    #[serde(default)]
    pub terminal: bool,

    /// Host frame rate the simulator paces itself to
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            terminal: false,
            frame_rate: default_frame_rate(),
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::invalid("display.frame_rate", "must be at least 1"));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }
        Ok(())
    }
}
