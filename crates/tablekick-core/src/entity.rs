//! Rig entities: visual nodes with optional physics bodies

use std::fmt;

use tablekick_xr::spatial::Vector3D;

use crate::layout::Team;

/// Identifier of an entity within one rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// How an entity participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Immovable body (zero mass)
    Static,
    /// Visual only; never simulated
    KinematicVisual,
    /// Simulated body that drives its visual node
    Dynamic,
}

/// What the entity is on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Table,
    Bar { index: usize },
    Player { bar: usize, slot: usize, team: Team },
    Ball,
}

/// Physical representation of an entity, in rig-frame units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodySpec {
    /// Fixed cuboid
    Fixed { half_extents: Vector3D },
    /// Dynamic sphere
    Ball { radius: f32, mass: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub role: EntityRole,
    /// Index into [`Rig::nodes`](crate::rig::Rig::nodes)
    pub node: usize,
    pub body: Option<BodySpec>,
}
