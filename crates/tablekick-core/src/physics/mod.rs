//! Rigid-body simulation backed by rapier3d

mod bridge;
mod context;

pub use bridge::{PhysicsBridge, GRAVITY};
pub use context::PhysicsContext;
