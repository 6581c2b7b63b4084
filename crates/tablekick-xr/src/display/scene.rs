//! Visual scene graph handed to display sinks
//!
//! Nodes carry a transform relative to their parent. World transforms are
//! resolved on demand by walking the parent chain. A parent always has a
//! smaller id than its children, so the chain is acyclic.

use std::collections::BTreeMap;

use super::Color;
use crate::spatial::{Axis, Point3D, Transform, Vector3D};

/// Stable handle to a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry of a visual node, in its local frame
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Transform-only node
    Group,
    /// Axis-aligned box with full extents
    Box { size: Vector3D },
    /// Cylinder centered on the origin, lying along `axis`
    Cylinder { radius: f32, length: f32, axis: Axis },
    Sphere { radius: f32 },
    /// Flat ring in the local XZ plane
    Ring { inner: f32, outer: f32 },
    /// Externally loaded mesh, referenced by asset key
    Mesh { asset: String },
}

impl Shape {
    /// Points spanning the shape's footprint in its local frame
    pub fn extent_points(&self) -> Vec<Point3D> {
        match self {
            Shape::Group | Shape::Mesh { .. } => vec![Point3D::ORIGIN],
            Shape::Box { size } => {
                let (hx, hz) = (size.x / 2.0, size.z / 2.0);
                vec![
                    Point3D::new(-hx, 0.0, -hz),
                    Point3D::new(hx, 0.0, -hz),
                    Point3D::new(hx, 0.0, hz),
                    Point3D::new(-hx, 0.0, hz),
                ]
            }
            Shape::Cylinder { length, axis, .. } => {
                let half = axis.unit() * (length / 2.0);
                vec![(-half).to_point(), half.to_point()]
            }
            Shape::Sphere { radius } => vec![
                Point3D::new(-radius, 0.0, 0.0),
                Point3D::new(*radius, 0.0, 0.0),
            ],
            Shape::Ring { outer, .. } => vec![
                Point3D::new(-outer, 0.0, 0.0),
                Point3D::new(*outer, 0.0, 0.0),
            ],
        }
    }
}

/// One node of the scene tree
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub local: Transform,
    pub shape: Shape,
    pub color: Color,
    pub visible: bool,
}

impl VisualNode {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local: Transform::identity(),
            shape,
            color: Color::White,
            visible: true,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Group)
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_local(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    pub fn at(self, position: Point3D) -> Self {
        self.with_local(Transform::from_position(position))
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, VisualNode>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A parent that does not exist is dropped and the node
    /// becomes a root.
    pub fn insert(&mut self, mut node: VisualNode) -> NodeId {
        if let Some(parent) = node.parent {
            if !self.nodes.contains_key(&parent) {
                tracing::warn!("node '{}' references missing parent {}", node.name, parent);
                node.parent = None;
            }
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&VisualNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut VisualNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns false if the node does not exist
    pub fn set_local_transform(&mut self, id: NodeId, local: Transform) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Node transform composed with every ancestor
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.nodes.get(&id)?;
        let mut world = node.local;
        let mut parent = node.parent;
        while let Some(pid) = parent {
            let p = self.nodes.get(&pid)?;
            world = p.local.compose(&world);
            parent = p.parent;
        }
        Some(world)
    }

    /// Visible only if the node and all its ancestors are visible
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.nodes.get(&cid) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.parent == Some(id))
            .map(|(cid, _)| *cid)
    }

    /// Remove a node and all of its descendants; returns how many were removed
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if !self.nodes.contains_key(&id) {
            return 0;
        }
        let mut doomed = vec![id];
        // Children always sort after their parent, so one ordered pass finds
        // every descendant.
        for (cid, node) in self.nodes.range(id..) {
            if let Some(parent) = node.parent {
                if doomed.contains(&parent) {
                    doomed.push(*cid);
                }
            }
        }
        for did in &doomed {
            self.nodes.remove(did);
        }
        doomed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &VisualNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, node)| node.name == name).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Quaternion;
    use std::f32::consts::PI;

    #[test]
    fn test_world_transform_chain() {
        let mut scene = Scene::new();
        let root = scene.insert(VisualNode::group("root").with_local(
            Transform::from_position_rotation(
                Point3D::new(1.0, 0.0, 0.0),
                Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0),
            ),
        ));
        let child = scene.insert(
            VisualNode::new("ball", Shape::Sphere { radius: 0.03 })
                .with_parent(root)
                .at(Point3D::new(0.0, 0.0, 1.0)),
        );

        let world = scene.world_transform(child).unwrap();
        assert!(world.position.approx_eq(&Point3D::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_remove_subtree() {
        let mut scene = Scene::new();
        let keep = scene.insert(VisualNode::group("reticle"));
        let root = scene.insert(VisualNode::group("rig"));
        let bar = scene.insert(VisualNode::group("bar").with_parent(root));
        scene.insert(VisualNode::group("player").with_parent(bar));
        scene.insert(VisualNode::group("table").with_parent(root));

        assert_eq!(scene.remove_subtree(root), 4);
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(keep));
        assert_eq!(scene.remove_subtree(root), 0);
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let mut scene = Scene::new();
        let ghost = scene.insert(VisualNode::group("ghost"));
        scene.remove_subtree(ghost);
        let id = scene.insert(VisualNode::group("orphan").with_parent(ghost));
        assert_eq!(scene.get(id).unwrap().parent, None);
    }

    #[test]
    fn test_hidden_ancestor_hides_child() {
        let mut scene = Scene::new();
        let root = scene.insert(VisualNode::group("rig").hidden());
        let child = scene.insert(VisualNode::group("bar").with_parent(root));
        assert!(!scene.is_effectively_visible(child));
        scene.set_visible(root, true);
        assert!(scene.is_effectively_visible(child));
    }
}
