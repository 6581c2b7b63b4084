//! Rig layout: where bars and players go
//!
//! Computed once from configuration and never mutated.

use tablekick_config::{RigConfig, SessionProfile};
use tablekick_xr::display::Color;
use tablekick_xr::spatial::{Point3D, Vector3D};

/// Side a bar plays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn color(&self) -> Color {
        match self {
            Team::A => Color::TEAM_A_BLUE,
            Team::B => Color::TEAM_B_RED,
        }
    }
}

/// How players are drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStyle {
    /// Cylinder body with a box head
    Primitive,
    /// Externally loaded mesh
    Mesh { asset: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub index: usize,
    /// Position along the table's long axis (rig X)
    pub x: f32,
    pub team: Team,
    /// Player offsets along the bar (rig Z)
    pub players: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigLayout {
    /// Table length (X), height (Y), width (Z)
    pub table_size: Vector3D,
    pub bar_height: f32,
    pub bar_radius: f32,
    pub bar_length: f32,
    pub bars: Vec<BarLayout>,
    pub player_style: PlayerStyle,
    pub player_body_radius: f32,
    pub player_body_height: f32,
    pub player_head_size: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_spawn: Point3D,
}

/// Offsets of `count` players spread evenly over `[-half_span, half_span]`.
///
/// One player sits at the midpoint; zero players yield an empty bar.
pub fn player_offsets(count: u32, half_span: f32) -> Vec<f32> {
    match count {
        0 => {
            tracing::debug!("bar configured with no players");
            Vec::new()
        }
        1 => vec![0.0],
        k => (0..k)
            .map(|j| half_span * ((2 * j) as f32 / (k - 1) as f32 - 1.0))
            .collect(),
    }
}

/// X position of bar `index` of `count`, centered on the table
pub fn bar_position(index: usize, count: usize, spacing: f32) -> f32 {
    (index as f32 - (count as f32 - 1.0) / 2.0) * spacing
}

impl RigLayout {
    pub fn from_config(rig: &RigConfig, profile: SessionProfile) -> Self {
        let count = rig.bar_count as usize;
        let bars = (0..count)
            .map(|index| {
                let is_end = index == 0 || index + 1 == count;
                let players = if is_end {
                    rig.end_bar_players
                } else {
                    rig.middle_bar_players
                };
                BarLayout {
                    index,
                    x: bar_position(index, count, rig.bar_spacing),
                    team: if index < count / 2 { Team::A } else { Team::B },
                    players: player_offsets(players, rig.player_half_span),
                }
            })
            .collect();

        let player_style = if profile.uses_mesh_players() {
            PlayerStyle::Mesh {
                asset: rig.player_mesh.clone(),
            }
        } else {
            PlayerStyle::Primitive
        };

        Self {
            table_size: Vector3D::from(rig.table_size),
            bar_height: rig.bar_height,
            bar_radius: rig.bar_radius,
            bar_length: rig.bar_length,
            bars,
            player_style,
            player_body_radius: rig.player_body_radius,
            player_body_height: rig.player_body_height,
            player_head_size: rig.player_head_size,
            ball_radius: rig.ball_radius,
            ball_mass: rig.ball_mass,
            ball_spawn: Point3D::from(rig.ball_spawn),
        }
    }

    pub fn player_count(&self) -> usize {
        self.bars.iter().map(|b| b.players.len()).sum()
    }

    /// Half extents of the table's fixed body
    pub fn table_half_extents(&self) -> Vector3D {
        self.table_size * 0.5
    }
}

impl Default for RigLayout {
    fn default() -> Self {
        Self::from_config(&RigConfig::default(), SessionProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric(offsets: &[f32]) {
        let n = offsets.len();
        for j in 0..n {
            assert!((offsets[j] + offsets[n - 1 - j]).abs() < 1e-6, "{:?}", offsets);
        }
    }

    #[test]
    fn test_player_offsets() {
        assert_eq!(player_offsets(1, 0.4), vec![0.0]);
        assert!(player_offsets(0, 0.4).is_empty());

        for k in [3, 5] {
            let offsets = player_offsets(k, 0.4);
            assert_eq!(offsets.len(), k as usize);
            assert_eq!(offsets[0], -0.4);
            assert_eq!(offsets[k as usize - 1], 0.4);
            assert_symmetric(&offsets);
        }

        let five = player_offsets(5, 0.4);
        assert!((five[1] + 0.2).abs() < 1e-6);
        assert_eq!(five[2], 0.0);
    }

    #[test]
    fn test_default_layout() {
        let layout = RigLayout::default();
        let xs: Vec<f32> = layout.bars.iter().map(|b| b.x).collect();
        let expected = [-0.3, -0.1, 0.1, 0.3];
        for (x, e) in xs.iter().zip(expected) {
            assert!((x - e).abs() < 1e-6);
        }

        let counts: Vec<usize> = layout.bars.iter().map(|b| b.players.len()).collect();
        assert_eq!(counts, vec![3, 5, 5, 3]);
        assert_eq!(layout.player_count(), 16);

        let teams: Vec<Team> = layout.bars.iter().map(|b| b.team).collect();
        assert_eq!(teams, vec![Team::A, Team::A, Team::B, Team::B]);
        assert!(layout.table_half_extents().approx_eq(&Vector3D::new(0.6, 0.05, 0.35), 1e-6));
        assert_eq!(layout.player_style, PlayerStyle::Primitive);
    }

    #[test]
    fn test_single_bar_is_an_end_bar() {
        let config = RigConfig {
            bar_count: 1,
            ..RigConfig::default()
        };
        let layout = RigLayout::from_config(&config, SessionProfile::AssetDrivenRig);
        assert_eq!(layout.bars[0].x, 0.0);
        assert_eq!(layout.bars[0].players.len(), 3);
        assert_eq!(layout.bars[0].team, Team::B);
        assert!(matches!(layout.player_style, PlayerStyle::Mesh { .. }));
    }
}
