//! Physics bridge: fixed-step simulation with one-way visual sync
//!
//! Bodies live in the rig frame. After every `step` the transform of each
//! dynamic body is copied onto its visual node; nothing else writes those
//! nodes.

use std::collections::BTreeMap;

use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::{RigidBodyHandle, Vector};

use tablekick_config::PhysicsConfig;
use tablekick_xr::display::{NodeId, Scene};
use tablekick_xr::spatial::{Point3D, Quaternion, Transform, Vector3D};

use super::context::{point_to_na, to_na, PhysicsContext};
use crate::entity::{BodySpec, EntityId, EntityKind};
use crate::error::PhysicsError;
use crate::rig::{Rig, SpawnedRig};

/// Gravity in the rig frame (m/s^2)
pub const GRAVITY: Vector3D = Vector3D::new(0.0, -9.82, 0.0);

#[derive(Debug, Clone, Copy)]
struct BodyBinding {
    handle: RigidBodyHandle,
    kind: EntityKind,
    node: NodeId,
}

pub struct PhysicsBridge {
    context: PhysicsContext,
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
    bodies: BTreeMap<EntityId, BodyBinding>,
    total_substeps: u64,
}

impl PhysicsBridge {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            context: PhysicsContext::new(GRAVITY, config.fixed_timestep),
            fixed_timestep: config.fixed_timestep,
            max_substeps: config.max_substeps,
            accumulator: 0.0,
            bodies: BTreeMap::new(),
            total_substeps: 0,
        }
    }

    /// Create bodies for every rig entity that has one; returns how many
    pub fn register_rig(&mut self, rig: &Rig, spawned: &SpawnedRig) -> usize {
        let mut created = 0;
        for entity in &rig.entities {
            let Some(body) = entity.body else {
                continue;
            };
            let (Some(node), Some(local)) = (spawned.node(entity.node), rig.local_transform(entity.node)) else {
                tracing::warn!("entity {} has no spawned node; skipping body", entity.id);
                continue;
            };

            let handle = match body {
                BodySpec::Fixed { half_extents } => {
                    self.context.insert_fixed_cuboid(local.position, half_extents)
                }
                BodySpec::Ball { radius, mass } => {
                    self.context.insert_dynamic_ball(local.position, radius, mass)
                }
            };
            self.bodies.insert(
                entity.id,
                BodyBinding {
                    handle,
                    kind: entity.kind,
                    node,
                },
            );
            created += 1;
        }

        tracing::info!("registered {} physics bodies for rig {}", created, rig.anchor.generation);
        created
    }

    /// Remove every body and collider
    pub fn release_all(&mut self) {
        let released = self.bodies.len();
        for binding in std::mem::take(&mut self.bodies).into_values() {
            self.context.remove_body(binding.handle);
        }
        self.accumulator = 0.0;
        if released > 0 {
            tracing::info!("released {} physics bodies", released);
        }
    }

    /// Advance by `dt` seconds of wall-clock time, then sync visuals.
    ///
    /// Runs whole fixed sub-steps up to the cap; time beyond the cap is
    /// dropped. Returns the number of sub-steps run.
    pub fn step(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            self.context.step();
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        if self.accumulator >= self.fixed_timestep {
            tracing::debug!(
                "dropping {:.3}s of simulation time after {} sub-steps",
                self.accumulator,
                steps
            );
            self.accumulator = 0.0;
        }

        self.total_substeps += u64::from(steps);
        self.sync_visuals(scene);
        steps as usize
    }

    /// Copy dynamic body transforms onto their visual nodes
    pub fn sync_visuals(&self, scene: &mut Scene) {
        for (id, binding) in &self.bodies {
            if binding.kind != EntityKind::Dynamic {
                continue;
            }
            if let Some(transform) = self.body_transform(*id) {
                scene.set_local_transform(binding.node, transform);
            }
        }
    }

    /// Instantaneous impulse at the body's center of mass
    pub fn apply_impulse(&mut self, entity: EntityId, impulse: Vector3D) -> Result<(), PhysicsError> {
        let binding = self.dynamic_binding(entity)?;
        if !(impulse.x.is_finite() && impulse.y.is_finite() && impulse.z.is_finite()) {
            return Err(PhysicsError::NonFinite(entity));
        }
        let body = self
            .context
            .rigid_body_set
            .get_mut(binding.handle)
            .ok_or(PhysicsError::NoBody(entity))?;
        body.apply_impulse(to_na(impulse), true);
        Ok(())
    }

    /// Move a dynamic body to `position` with identity orientation, optionally
    /// clearing its velocity, and re-sync its visual node
    pub fn reset_dynamic(
        &mut self,
        entity: EntityId,
        position: Point3D,
        zero_velocity: bool,
        scene: &mut Scene,
    ) -> Result<(), PhysicsError> {
        let binding = self.dynamic_binding(entity)?;
        if !position.is_finite() {
            return Err(PhysicsError::NonFinite(entity));
        }
        let body = self
            .context
            .rigid_body_set
            .get_mut(binding.handle)
            .ok_or(PhysicsError::NoBody(entity))?;

        body.set_translation(point_to_na(position), true);
        body.set_rotation(UnitQuaternion::identity(), true);
        if zero_velocity {
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(Vector::zeros(), true);
        }

        if let Some(transform) = self.body_transform(entity) {
            scene.set_local_transform(binding.node, transform);
        }
        Ok(())
    }

    /// Rig-frame transform of an entity's body
    pub fn body_transform(&self, entity: EntityId) -> Option<Transform> {
        let binding = self.bodies.get(&entity)?;
        let body = self.context.rigid_body_set.get(binding.handle)?;
        let t = body.translation();
        let q = body.rotation();
        Some(Transform::from_position_rotation(
            Point3D::new(t.x, t.y, t.z),
            Quaternion::new(q.i, q.j, q.k, q.w),
        ))
    }

    pub fn body_position(&self, entity: EntityId) -> Option<Point3D> {
        self.body_transform(entity).map(|t| t.position)
    }

    pub fn body_velocity(&self, entity: EntityId) -> Option<Vector3D> {
        let binding = self.bodies.get(&entity)?;
        let v = self.context.rigid_body_set.get(binding.handle)?.linvel();
        Some(Vector3D::new(v.x, v.y, v.z))
    }

    pub fn has_body(&self, entity: EntityId) -> bool {
        self.bodies.contains_key(&entity)
    }

    /// Bodies currently in the simulation
    pub fn body_count(&self) -> usize {
        self.context.body_count()
    }

    pub fn collider_count(&self) -> usize {
        self.context.collider_count()
    }

    pub fn total_substeps(&self) -> u64 {
        self.total_substeps
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    fn dynamic_binding(&self, entity: EntityId) -> Result<BodyBinding, PhysicsError> {
        let binding = self.bodies.get(&entity).ok_or(PhysicsError::NoBody(entity))?;
        if binding.kind != EntityKind::Dynamic {
            return Err(PhysicsError::NotDynamic(entity));
        }
        Ok(*binding)
    }
}

impl std::fmt::Debug for PhysicsBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBridge")
            .field("fixed_timestep", &self.fixed_timestep)
            .field("max_substeps", &self.max_substeps)
            .field("accumulator", &self.accumulator)
            .field("bodies", &self.bodies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::layout::RigLayout;
    use crate::rig::generate;

    fn setup() -> (PhysicsBridge, Rig, SpawnedRig, Scene) {
        let rig = generate(
            &Anchor {
                pose: Transform::identity(),
                generation: 1,
            },
            &RigLayout::default(),
        );
        let mut scene = Scene::new();
        let spawned = rig.spawn(&mut scene);
        let mut bridge = PhysicsBridge::new(&PhysicsConfig::default());
        assert_eq!(bridge.register_rig(&rig, &spawned), 2);
        (bridge, rig, spawned, scene)
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let (mut bridge, rig, _, mut scene) = setup();
        let ball = rig.ball().unwrap().id;
        let before = bridge.body_transform(ball).unwrap();

        assert_eq!(bridge.step(0.0, &mut scene), 0);
        assert_eq!(bridge.step(f32::NAN, &mut scene), 0);
        assert_eq!(bridge.step(-1.0, &mut scene), 0);
        assert_eq!(bridge.body_transform(ball).unwrap(), before);
    }

    #[test]
    fn test_substep_cap() {
        let (mut bridge, _, _, mut scene) = setup();
        assert_eq!(bridge.step(1.0, &mut scene), 3);
        // The dropped remainder is not carried into the next frame
        assert_eq!(bridge.step(0.0, &mut scene), 0);
    }

    #[test]
    fn test_accumulates_small_deltas() {
        let (mut bridge, _, _, mut scene) = setup();
        let half = bridge.fixed_timestep() / 2.0;
        assert_eq!(bridge.step(half, &mut scene), 0);
        assert_eq!(bridge.step(half, &mut scene), 1);
    }

    #[test]
    fn test_ball_falls_and_visual_follows() {
        let (mut bridge, rig, spawned, mut scene) = setup();
        let ball = rig.ball().unwrap();
        bridge.reset_dynamic(ball.id, Point3D::new(0.0, 0.5, 0.0), true, &mut scene).unwrap();
        bridge.step(bridge.fixed_timestep() * 2.0, &mut scene);

        let body = bridge.body_transform(ball.id).unwrap();
        assert!(body.position.y < 0.5);
        let node = spawned.node(ball.node).unwrap();
        assert_eq!(scene.get(node).unwrap().local, body);
    }

    #[test]
    fn test_impulse_rules() {
        let (mut bridge, rig, _, mut scene) = setup();
        let ball = rig.ball().unwrap().id;
        let table = rig.table().unwrap().id;
        let bar = rig.bars().next().unwrap().id;

        assert_eq!(
            bridge.apply_impulse(table, Vector3D::RIGHT),
            Err(PhysicsError::NotDynamic(table))
        );
        assert_eq!(
            bridge.apply_impulse(bar, Vector3D::RIGHT),
            Err(PhysicsError::NoBody(bar))
        );
        assert_eq!(
            bridge.apply_impulse(ball, Vector3D::new(f32::INFINITY, 0.0, 0.0)),
            Err(PhysicsError::NonFinite(ball))
        );

        bridge.apply_impulse(ball, Vector3D::new(0.2, 0.0, 0.0)).unwrap();
        bridge.step(bridge.fixed_timestep(), &mut scene);
        assert!(bridge.body_velocity(ball).unwrap().x > 0.0);
    }

    #[test]
    fn test_reset_clears_velocity() {
        let (mut bridge, rig, _, mut scene) = setup();
        let ball = rig.ball().unwrap().id;
        bridge.apply_impulse(ball, Vector3D::new(-0.2, 0.0, 0.0)).unwrap();
        bridge.step(bridge.fixed_timestep(), &mut scene);

        bridge.reset_dynamic(ball, Point3D::new(0.0, 0.1, 0.0), true, &mut scene).unwrap();
        assert_eq!(bridge.body_position(ball), Some(Point3D::new(0.0, 0.1, 0.0)));
        assert_eq!(bridge.body_velocity(ball), Some(Vector3D::ZERO));
    }

    #[test]
    fn test_release_all() {
        let (mut bridge, rig, _, _) = setup();
        assert_eq!(bridge.body_count(), 2);
        bridge.release_all();
        assert_eq!(bridge.body_count(), 0);
        assert_eq!(bridge.collider_count(), 0);
        assert!(!bridge.has_body(rig.ball().unwrap().id));
    }
}
