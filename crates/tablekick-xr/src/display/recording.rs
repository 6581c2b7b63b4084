//! Display sink that records what it was shown

use std::collections::BTreeSet;

use super::{DisplayError, DisplaySink, NodeId, Scene, SurfaceCapabilities};
use crate::spatial::Transform;

/// One visible node as it was presented
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedNode {
    pub id: NodeId,
    pub name: String,
    pub world: Transform,
}

#[derive(Debug, Default)]
pub struct RecordingDisplaySink {
    frames: usize,
    last_frame: Vec<PresentedNode>,
    resizes: Vec<(u32, u32)>,
    loaded: Vec<String>,
    failing_assets: BTreeSet<String>,
}

impl RecordingDisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `load_asset` fail for `key`
    pub fn with_failing_asset(mut self, key: impl Into<String>) -> Self {
        self.failing_assets.insert(key.into());
        self
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> &[PresentedNode] {
        &self.last_frame
    }

    /// World transform of the first presented node called `name`
    pub fn last_world(&self, name: &str) -> Option<Transform> {
        self.last_frame
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.world)
    }

    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    pub fn loaded_assets(&self) -> &[String] {
        &self.loaded
    }
}

impl DisplaySink for RecordingDisplaySink {
    fn capabilities(&self) -> SurfaceCapabilities {
        let (width, height) = self.resizes.last().copied().unwrap_or((0, 0));
        SurfaceCapabilities {
            width,
            height,
            supports_meshes: true,
            ..Default::default()
        }
    }

    fn load_asset(&mut self, key: &str) -> Result<(), DisplayError> {
        if self.failing_assets.contains(key) {
            return Err(DisplayError::AssetLoad {
                key: key.to_string(),
                reason: "not found".to_string(),
            });
        }
        self.loaded.push(key.to_string());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        self.resizes.push((width, height));
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> Result<(), DisplayError> {
        self.frames += 1;
        self.last_frame = scene
            .iter()
            .filter(|(id, _)| scene.is_effectively_visible(*id))
            .filter_map(|(id, node)| {
                scene.world_transform(id).map(|world| PresentedNode {
                    id,
                    name: node.name.clone(),
                    world,
                })
            })
            .collect();
        Ok(())
    }
}
