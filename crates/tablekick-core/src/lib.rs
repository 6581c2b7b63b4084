//! tablekick-core: game logic for the AR foosball table
//!
//! This crate provides:
//! - Surface placement (candidate pose and committed anchor)
//! - Procedural rig layout and generation (table, bars, players, ball)
//! - A fixed-timestep rapier3d bridge that drives ball visuals
//! - Pinch-to-kick and goal detection
//! - The session context that runs all of the above once per frame

pub mod anchor;
pub mod entity;
pub mod error;
pub mod kick;
pub mod layout;
pub mod physics;
pub mod rig;
pub mod session;

pub use anchor::{Anchor, AnchorManager};
pub use entity::{BodySpec, Entity, EntityId, EntityKind, EntityRole};
pub use error::{PhysicsError, SessionError};
pub use kick::{GameEvent, KickController, PlayState, TableEnd};
pub use layout::{bar_position, player_offsets, BarLayout, PlayerStyle, RigLayout, Team};
pub use physics::{PhysicsBridge, GRAVITY};
pub use rig::{generate, Rig, RigNode, SpawnedRig};
pub use session::{required_capabilities, FrameReport, Session, SessionStats};
