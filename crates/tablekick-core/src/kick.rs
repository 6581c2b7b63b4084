//! Pinch-to-kick and goal detection
//!
//! The play axis is rig-frame X. A left-hand trigger pushes the ball toward
//! -X, a right-hand trigger toward +X. After every physics step the ball is
//! checked against the goal lines and the floor.

use std::fmt;

use tablekick_config::KickConfig;
use tablekick_xr::audio::{fire_cue, Cue, CueSink};
use tablekick_xr::display::Scene;
use tablekick_xr::input::HandSide;
use tablekick_xr::spatial::{Point3D, Vector3D};

use crate::entity::EntityId;
use crate::physics::PhysicsBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Ball at rest at the spawn point
    #[default]
    Idle,
    InPlay,
    /// Goal line crossed; left as soon as the ball is reset
    Scored,
}

/// End of the table along the play axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEnd {
    /// -X
    Negative,
    /// +X
    Positive,
}

impl TableEnd {
    fn of(x: f32) -> Self {
        if x < 0.0 {
            TableEnd::Negative
        } else {
            TableEnd::Positive
        }
    }
}

impl fmt::Display for TableEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableEnd::Negative => write!(f, "-x"),
            TableEnd::Positive => write!(f, "+x"),
        }
    }
}

/// Something that happened to the ball this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Kicked { side: HandSide },
    Goal { end: TableEnd },
    /// Ball left the table without crossing a goal line
    OutOfBounds,
}

#[derive(Debug, Clone)]
pub struct KickController {
    impulse: f32,
    goal_line: f32,
    floor_limit: f32,
    activity_epsilon: f32,
    spawn: Point3D,
    state: PlayState,
    kicks: u64,
    goals: u64,
}

impl KickController {
    pub fn new(config: &KickConfig, spawn: Point3D) -> Self {
        Self {
            impulse: config.impulse,
            goal_line: config.goal_line,
            floor_limit: config.floor_limit,
            activity_epsilon: config.activity_epsilon,
            spawn,
            state: PlayState::Idle,
            kicks: 0,
            goals: 0,
        }
    }

    /// Impulse for a trigger from `side`
    pub fn impulse_for(&self, side: HandSide) -> Vector3D {
        match side {
            HandSide::Left => Vector3D::new(-self.impulse, 0.0, 0.0),
            HandSide::Right => Vector3D::new(self.impulse, 0.0, 0.0),
        }
    }

    /// Kick the ball in response to a pinch
    pub fn on_trigger(
        &mut self,
        side: HandSide,
        ball: EntityId,
        physics: &mut PhysicsBridge,
        cues: &mut dyn CueSink,
    ) -> Option<GameEvent> {
        if let Err(e) = physics.apply_impulse(ball, self.impulse_for(side)) {
            tracing::warn!("kick from {} hand ignored: {}", side, e);
            return None;
        }

        self.kicks += 1;
        if self.state == PlayState::Idle {
            self.state = PlayState::InPlay;
        }
        tracing::debug!("{} kick #{}", side, self.kicks);
        fire_cue(cues, Cue::Kick);
        Some(GameEvent::Kicked { side })
    }

    /// Check the ball after a physics step; resets it on a goal or when it
    /// falls off the table
    pub fn after_step(
        &mut self,
        ball: EntityId,
        physics: &mut PhysicsBridge,
        scene: &mut Scene,
        cues: &mut dyn CueSink,
    ) -> Option<GameEvent> {
        let position = physics.body_position(ball)?;

        if position.x.abs() > self.goal_line {
            let end = TableEnd::of(position.x);
            self.state = PlayState::Scored;
            self.goals += 1;
            tracing::info!("goal at the {} end (x = {:.3})", end, position.x);
            fire_cue(cues, Cue::Goal);
            self.reset_ball(ball, physics, scene);
            return Some(GameEvent::Goal { end });
        }

        if position.y < self.floor_limit || !position.is_finite() {
            tracing::info!("ball out of bounds at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
            self.reset_ball(ball, physics, scene);
            return Some(GameEvent::OutOfBounds);
        }

        if self.state == PlayState::Idle {
            if let Some(v) = physics.body_velocity(ball) {
                if (v.x * v.x + v.z * v.z).sqrt() > self.activity_epsilon {
                    self.state = PlayState::InPlay;
                }
            }
        }
        None
    }

    fn reset_ball(&mut self, ball: EntityId, physics: &mut PhysicsBridge, scene: &mut Scene) {
        if let Err(e) = physics.reset_dynamic(ball, self.spawn, true, scene) {
            tracing::warn!("ball reset failed: {}", e);
        }
        self.state = PlayState::Idle;
    }

    /// Back to Idle (new rig); counters are kept
    pub fn reset(&mut self) {
        self.state = PlayState::Idle;
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn spawn(&self) -> Point3D {
        self.spawn
    }

    pub fn kicks(&self) -> u64 {
        self.kicks
    }

    pub fn goals(&self) -> u64 {
        self.goals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::layout::RigLayout;
    use crate::rig::{generate, Rig};
    use tablekick_config::PhysicsConfig;
    use tablekick_xr::audio::{FailingCueSink, RecordingCueSink};
    use tablekick_xr::spatial::Transform;

    const SPAWN: Point3D = Point3D::new(0.0, 0.1, 0.0);

    struct Table {
        rig: Rig,
        scene: Scene,
        physics: PhysicsBridge,
        kick: KickController,
        cues: RecordingCueSink,
    }

    impl Table {
        fn new() -> Self {
            let rig = generate(
                &Anchor {
                    pose: Transform::identity(),
                    generation: 1,
                },
                &RigLayout::default(),
            );
            let mut scene = Scene::new();
            let spawned = rig.spawn(&mut scene);
            let mut physics = PhysicsBridge::new(&PhysicsConfig::default());
            physics.register_rig(&rig, &spawned);
            Self {
                rig,
                scene,
                physics,
                kick: KickController::new(&KickConfig::default(), SPAWN),
                cues: RecordingCueSink::new(),
            }
        }

        fn ball(&self) -> EntityId {
            self.rig.ball().unwrap().id
        }

        fn step(&mut self) -> Option<GameEvent> {
            let dt = self.physics.fixed_timestep();
            self.physics.step(dt, &mut self.scene);
            let ball = self.ball();
            self.kick
                .after_step(ball, &mut self.physics, &mut self.scene, &mut self.cues)
        }
    }

    #[test]
    fn test_trigger_direction() {
        for (side, sign) in [(HandSide::Left, -1.0), (HandSide::Right, 1.0)] {
            let mut t = Table::new();
            let ball = t.ball();
            let event = t.kick.on_trigger(side, ball, &mut t.physics, &mut t.cues);
            assert_eq!(event, Some(GameEvent::Kicked { side }));
            t.step();

            let vx = t.physics.body_velocity(ball).unwrap().x;
            assert!(vx * sign > 0.0, "{side}: vx = {vx}");
            assert_eq!(t.cues.played(), &[Cue::Kick]);
            assert_eq!(t.kick.state(), PlayState::InPlay);
        }
    }

    #[test]
    fn test_goal_resets_ball() {
        let mut t = Table::new();
        let ball = t.ball();
        t.physics
            .reset_dynamic(ball, Point3D::new(0.61, 0.1, 0.0), true, &mut t.scene)
            .unwrap();

        assert_eq!(
            t.step(),
            Some(GameEvent::Goal {
                end: TableEnd::Positive
            })
        );
        assert_eq!(t.physics.body_position(ball), Some(SPAWN));
        assert_eq!(t.physics.body_velocity(ball), Some(Vector3D::ZERO));
        assert_eq!(t.cues.count(Cue::Goal), 1);
        assert_eq!(t.kick.state(), PlayState::Idle);
        assert_eq!(t.kick.goals(), 1);
    }

    #[test]
    fn test_goal_at_negative_end() {
        let mut t = Table::new();
        let ball = t.ball();
        t.physics
            .reset_dynamic(ball, Point3D::new(-0.7, 0.1, 0.0), true, &mut t.scene)
            .unwrap();
        assert_eq!(
            t.step(),
            Some(GameEvent::Goal {
                end: TableEnd::Negative
            })
        );
    }

    #[test]
    fn test_out_of_bounds_has_no_cue() {
        let mut t = Table::new();
        let ball = t.ball();
        t.physics
            .reset_dynamic(ball, Point3D::new(0.0, -2.0, 0.0), true, &mut t.scene)
            .unwrap();

        assert_eq!(t.step(), Some(GameEvent::OutOfBounds));
        assert_eq!(t.physics.body_position(ball), Some(SPAWN));
        assert!(t.cues.played().is_empty());
        assert_eq!(t.kick.goals(), 0);
    }

    #[test]
    fn test_ball_at_rest_stays_idle() {
        let mut t = Table::new();
        for _ in 0..10 {
            assert_eq!(t.step(), None);
        }
        assert_eq!(t.kick.state(), PlayState::Idle);
    }

    #[test]
    fn test_movement_without_trigger_counts_as_play() {
        let mut t = Table::new();
        let ball = t.ball();
        t.physics.apply_impulse(ball, Vector3D::new(0.0, 0.0, 0.1)).unwrap();
        t.step();
        assert_eq!(t.kick.state(), PlayState::InPlay);
    }

    #[test]
    fn test_cue_failure_is_swallowed() {
        let mut t = Table::new();
        let ball = t.ball();
        let mut failing = FailingCueSink::default();
        let event = t
            .kick
            .on_trigger(HandSide::Right, ball, &mut t.physics, &mut failing);
        assert!(event.is_some());
        assert_eq!(failing.attempts(), 1);
    }

    #[test]
    fn test_trigger_on_missing_ball_is_ignored() {
        let mut t = Table::new();
        let table = t.rig.table().unwrap().id;
        assert_eq!(
            t.kick.on_trigger(HandSide::Left, table, &mut t.physics, &mut t.cues),
            None
        );
        assert!(t.cues.played().is_empty());
        assert_eq!(t.kick.kicks(), 0);
    }
}
