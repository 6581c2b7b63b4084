//! Procedural rig generation
//!
//! [`generate`] is a pure function of the anchor and layout. Node transforms
//! are expressed in the rig frame (the anchor's local frame); only the root
//! node carries the anchor pose, so re-placing the table moves the rig
//! rigidly without changing its internal geometry.

use tablekick_xr::display::{Color, NodeId, Scene, Shape, VisualNode};
use tablekick_xr::spatial::{Axis, Point3D, Transform, Vector3D};

use crate::anchor::Anchor;
use crate::entity::{BodySpec, Entity, EntityId, EntityKind, EntityRole};
use crate::layout::{PlayerStyle, RigLayout};

/// A node of the rig tree; parents always precede their children
#[derive(Debug, Clone, PartialEq)]
pub struct RigNode {
    pub parent: Option<usize>,
    pub node: VisualNode,
}

/// Generated table, bars, players and ball
#[derive(Debug, Clone, PartialEq)]
pub struct Rig {
    pub anchor: Anchor,
    pub nodes: Vec<RigNode>,
    pub entities: Vec<Entity>,
}

/// Scene handles for a rig inserted into a [`Scene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedRig {
    pub root: NodeId,
    nodes: Vec<NodeId>,
}

impl SpawnedRig {
    /// Scene node for rig node `index`
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

struct RigBuilder {
    nodes: Vec<RigNode>,
    entities: Vec<Entity>,
}

impl RigBuilder {
    fn node(&mut self, parent: Option<usize>, node: VisualNode) -> usize {
        self.nodes.push(RigNode { parent, node });
        self.nodes.len() - 1
    }

    fn entity(&mut self, kind: EntityKind, role: EntityRole, node: usize, body: Option<BodySpec>) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity {
            id,
            kind,
            role,
            node,
            body,
        });
        id
    }
}

/// Build the rig for `anchor`
pub fn generate(anchor: &Anchor, layout: &RigLayout) -> Rig {
    let mut b = RigBuilder {
        nodes: Vec::new(),
        entities: Vec::new(),
    };

    let root = b.node(None, VisualNode::group("rig").with_local(anchor.pose));

    let table = b.node(
        Some(root),
        VisualNode::new(
            "table",
            Shape::Box {
                size: layout.table_size,
            },
        )
        .with_color(Color::TABLE_BROWN),
    );
    b.entity(
        EntityKind::Static,
        EntityRole::Table,
        table,
        Some(BodySpec::Fixed {
            half_extents: layout.table_half_extents(),
        }),
    );

    for bar in &layout.bars {
        let bar_node = b.node(
            Some(root),
            VisualNode::new(
                format!("bar-{}", bar.index),
                Shape::Cylinder {
                    radius: layout.bar_radius,
                    length: layout.bar_length,
                    axis: Axis::Z,
                },
            )
            .with_color(Color::BAR_GREY)
            .at(Point3D::new(bar.x, layout.bar_height, 0.0)),
        );
        b.entity(
            EntityKind::KinematicVisual,
            EntityRole::Bar { index: bar.index },
            bar_node,
            None,
        );

        for (slot, offset) in bar.players.iter().enumerate() {
            let player = b.node(
                Some(bar_node),
                VisualNode::group(format!("player-{}-{}", bar.index, slot))
                    .at(Point3D::new(0.0, 0.0, *offset)),
            );
            add_player_parts(&mut b, player, layout, bar.team.color());
            b.entity(
                EntityKind::KinematicVisual,
                EntityRole::Player {
                    bar: bar.index,
                    slot,
                    team: bar.team,
                },
                player,
                None,
            );
        }
    }

    let ball = b.node(
        Some(root),
        VisualNode::new(
            "ball",
            Shape::Sphere {
                radius: layout.ball_radius,
            },
        )
        .with_color(Color::BALL_WHITE)
        .at(layout.ball_spawn),
    );
    b.entity(
        EntityKind::Dynamic,
        EntityRole::Ball,
        ball,
        Some(BodySpec::Ball {
            radius: layout.ball_radius,
            mass: layout.ball_mass,
        }),
    );

    tracing::debug!(
        "generated rig {}: {} nodes, {} entities",
        anchor.generation,
        b.nodes.len(),
        b.entities.len()
    );

    Rig {
        anchor: *anchor,
        nodes: b.nodes,
        entities: b.entities,
    }
}

fn add_player_parts(b: &mut RigBuilder, player: usize, layout: &RigLayout, color: Color) {
    match &layout.player_style {
        PlayerStyle::Primitive => {
            b.node(
                Some(player),
                VisualNode::new(
                    "player-body",
                    Shape::Cylinder {
                        radius: layout.player_body_radius,
                        length: layout.player_body_height,
                        axis: Axis::Y,
                    },
                )
                .with_color(color)
                .at(Point3D::new(0.0, -layout.player_body_height / 2.0, 0.0)),
            );
            let head = layout.player_head_size;
            b.node(
                Some(player),
                VisualNode::new(
                    "player-head",
                    Shape::Box {
                        size: Vector3D::new(head, head, head),
                    },
                )
                .with_color(color)
                .at(Point3D::new(0.0, layout.bar_radius + head / 2.0, 0.0)),
            );
        }
        PlayerStyle::Mesh { asset } => {
            b.node(
                Some(player),
                VisualNode::new(
                    "player-mesh",
                    Shape::Mesh {
                        asset: asset.clone(),
                    },
                )
                .with_color(color),
            );
        }
    }
}

impl Rig {
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    fn first(&self, role: EntityRole) -> Option<&Entity> {
        self.entities.iter().find(|e| e.role == role)
    }

    pub fn ball(&self) -> Option<&Entity> {
        self.first(EntityRole::Ball)
    }

    pub fn table(&self) -> Option<&Entity> {
        self.first(EntityRole::Table)
    }

    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| matches!(e.role, EntityRole::Player { .. }))
    }

    pub fn bars(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| matches!(e.role, EntityRole::Bar { .. }))
    }

    /// Transform of node `index` relative to the rig root
    pub fn local_transform(&self, index: usize) -> Option<Transform> {
        let mut node = self.nodes.get(index)?;
        let mut transform = if node.parent.is_some() {
            node.node.local
        } else {
            Transform::identity()
        };
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            if node.parent.is_some() {
                transform = node.node.local.compose(&transform);
            }
        }
        Some(transform)
    }

    /// Transform of node `index` in the tracking frame
    pub fn world_transform(&self, index: usize) -> Option<Transform> {
        self.local_transform(index)
            .map(|local| self.anchor.pose.compose(&local))
    }

    /// Mesh asset keys referenced by the rig, with their node indices
    pub fn mesh_assets(&self) -> impl Iterator<Item = (usize, &str)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match &n.node.shape {
                Shape::Mesh { asset } => Some((i, asset.as_str())),
                _ => None,
            })
    }

    /// Insert the rig's nodes into `scene`
    pub fn spawn(&self, scene: &mut Scene) -> SpawnedRig {
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
        for rig_node in &self.nodes {
            let mut node = rig_node.node.clone();
            node.parent = rig_node.parent.and_then(|p| ids.get(p).copied());
            ids.push(scene.insert(node));
        }
        let root = match ids.first() {
            Some(id) => *id,
            None => scene.insert(VisualNode::group("rig")),
        };
        SpawnedRig { root, nodes: ids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekick_xr::spatial::Quaternion;

    fn anchor_at(pose: Transform) -> Anchor {
        Anchor {
            pose,
            generation: 1,
        }
    }

    #[test]
    fn test_default_rig_contents() {
        let rig = generate(&anchor_at(Transform::identity()), &RigLayout::default());

        assert_eq!(rig.bars().count(), 4);
        assert_eq!(rig.players().count(), 16);

        let ball = rig.ball().unwrap();
        assert_eq!(ball.kind, EntityKind::Dynamic);
        let spawn = rig.local_transform(ball.node).unwrap().position;
        assert!(spawn.approx_eq(&Point3D::new(0.0, 0.1, 0.0), 1e-6));

        let table = rig.table().unwrap();
        assert_eq!(
            table.body,
            Some(BodySpec::Fixed {
                half_extents: Vector3D::new(0.6, 0.05, 0.35)
            })
        );
    }

    #[test]
    fn test_player_positions_along_bar() {
        let rig = generate(&anchor_at(Transform::identity()), &RigLayout::default());
        let first_bar_players: Vec<Point3D> = rig
            .players()
            .filter(|p| matches!(p.role, EntityRole::Player { bar: 0, .. }))
            .map(|p| rig.local_transform(p.node).unwrap().position)
            .collect();

        assert_eq!(first_bar_players.len(), 3);
        assert!(first_bar_players[0].approx_eq(&Point3D::new(-0.3, 0.15, -0.4), 1e-6));
        assert!(first_bar_players[2].approx_eq(&Point3D::new(-0.3, 0.15, 0.4), 1e-6));
    }

    #[test]
    fn test_replacement_is_rigid() {
        let layout = RigLayout::default();
        let a = generate(&anchor_at(Transform::identity()), &layout);
        let moved = Transform::from_position_rotation(
            Point3D::new(0.4, -0.7, -1.3),
            Quaternion::from_axis_angle(Vector3D::UP, 1.1),
        );
        let b = generate(&anchor_at(moved), &layout);

        assert_eq!(a.nodes.len(), b.nodes.len());
        for i in 0..a.nodes.len() {
            let la = a.local_transform(i).unwrap();
            let lb = b.local_transform(i).unwrap();
            assert!(la.approx_eq(&lb, 1e-6));

            let wb = b.world_transform(i).unwrap();
            assert!(wb.approx_eq(&moved.compose(&la), 1e-5));
        }
    }

    #[test]
    fn test_spawn_matches_world_transforms() {
        let pose = Transform::from_position(Point3D::new(1.0, 0.0, -2.0));
        let rig = generate(&anchor_at(pose), &RigLayout::default());
        let mut scene = Scene::new();
        let spawned = rig.spawn(&mut scene);

        assert_eq!(scene.len(), rig.nodes.len());
        let ball = rig.ball().unwrap();
        let node = spawned.node(ball.node).unwrap();
        let world = scene.world_transform(node).unwrap();
        assert!(world.position.approx_eq(&Point3D::new(1.0, 0.1, -2.0), 1e-6));
        assert_eq!(scene.remove_subtree(spawned.root), rig.nodes.len());
    }

    #[test]
    fn test_mesh_style_references_assets() {
        let layout = RigLayout {
            player_style: PlayerStyle::Mesh {
                asset: "models/player.glb".into(),
            },
            ..RigLayout::default()
        };
        let rig = generate(&anchor_at(Transform::identity()), &layout);
        assert_eq!(rig.mesh_assets().count(), 16);
        assert!(rig.nodes.iter().all(|n| n.node.name != "player-head"));
    }
}
