//! All rapier pipeline state in one place.
//!
//! `PhysicsPipeline::step()` needs mutable access to every set at once, so
//! they live together.

use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

use tablekick_xr::spatial::{Point3D, Vector3D};

pub struct PhysicsContext {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,

    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub ccd_solver: CCDSolver,

    pub integration_parameters: IntegrationParameters,
    pub gravity: Vector<Real>,
}

pub(crate) fn to_na(v: Vector3D) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub(crate) fn point_to_na(p: Point3D) -> Vector<Real> {
    Vector::new(p.x, p.y, p.z)
}

impl PhysicsContext {
    /// Create a context with the given gravity and sub-step length
    pub fn new(gravity: Vector3D, dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            integration_parameters,
            gravity: to_na(gravity),
        }
    }

    /// Immovable box centered at `center`
    pub fn insert_fixed_cuboid(&mut self, center: Point3D, half_extents: Vector3D) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(point_to_na(center))
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Dynamic sphere with continuous collision detection; never sleeps
    pub fn insert_dynamic_ball(&mut self, center: Point3D, radius: f32, mass: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(point_to_na(center))
            .ccd_enabled(true)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius).mass(mass).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
        handle
    }

    /// Remove a body and its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Run one physics sub-step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}
