//! Display sink trait definition

use super::{Scene, SurfaceCapabilities};

/// Error type for display operations
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to load asset '{key}': {reason}")]
    AssetLoad { key: String, reason: String },

    #[error("display init failed: {0}")]
    Init(String),

    #[error("frame presentation failed: {0}")]
    Frame(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Receives the scene once per frame. Sinks never write back into the scene.
pub trait DisplaySink: Send {
    /// Get surface capabilities
    fn capabilities(&self) -> SurfaceCapabilities;

    /// Prepare a mesh asset referenced by a `Shape::Mesh` node
    fn load_asset(&mut self, key: &str) -> Result<(), DisplayError>;

    /// Viewport size changed
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError>;

    /// Draw the scene and present the frame
    fn present(&mut self, scene: &Scene) -> Result<(), DisplayError>;

    /// Release the surface
    fn shutdown(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn capabilities(&self) -> SurfaceCapabilities {
        (**self).capabilities()
    }

    fn load_asset(&mut self, key: &str) -> Result<(), DisplayError> {
        (**self).load_asset(key)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        (**self).resize(width, height)
    }

    fn present(&mut self, scene: &Scene) -> Result<(), DisplayError> {
        (**self).present(scene)
    }

    fn shutdown(&mut self) -> Result<(), DisplayError> {
        (**self).shutdown()
    }
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullDisplaySink {
    size: (u32, u32),
}

impl NullDisplaySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for NullDisplaySink {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.size.0,
            height: self.size.1,
            ..Default::default()
        }
    }

    fn load_asset(&mut self, _key: &str) -> Result<(), DisplayError> {
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        self.size = (width, height);
        Ok(())
    }

    fn present(&mut self, _scene: &Scene) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Logs a summary of each presented frame through `tracing`
#[derive(Debug, Default)]
pub struct LogDisplaySink {
    size: (u32, u32),
    frames: u64,
}

impl LogDisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySink for LogDisplaySink {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.size.0,
            height: self.size.1,
            supports_depth: true,
            supports_meshes: true,
            fov_horizontal: None,
        }
    }

    fn load_asset(&mut self, key: &str) -> Result<(), DisplayError> {
        tracing::info!("loading mesh asset '{}'", key);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        tracing::info!("viewport resized to {}x{}", width, height);
        self.size = (width, height);
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> Result<(), DisplayError> {
        self.frames += 1;
        let visible = scene
            .iter()
            .filter(|(id, _)| scene.is_effectively_visible(*id))
            .count();
        tracing::trace!(
            "frame {}: {} nodes ({} visible)",
            self.frames,
            scene.len(),
            visible
        );
        Ok(())
    }
}
