//! Renderable model: mesh + shader (+ optional texture) handles

use super::{Handle, MeshData, ResourceError, ShaderData, TextureData};

/// References the resources needed to draw something
///
/// A model never owns its resources; the [`ResourceManager`](super::ResourceManager)
/// does. Cloning a model clones the handles.
#[derive(Debug, Clone)]
pub struct Model {
    /// Geometry
    pub mesh: Handle<MeshData>,
    /// Shader program
    pub shader: Handle<ShaderData>,
    /// Optional surface texture
    pub texture: Option<Handle<TextureData>>,
}

impl Model {
    /// Model without a texture
    pub fn new(mesh: Handle<MeshData>, shader: Handle<ShaderData>) -> Self {
        Self { mesh, shader, texture: None }
    }

    /// Attach a texture
    pub fn with_texture(mut self, texture: Handle<TextureData>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// `Ok` when every referenced resource is loaded
    pub fn ensure_ready(&self) -> Result<(), ResourceError> {
        let names_pending = [
            (!self.mesh.is_loaded()).then(|| self.mesh.name()),
            (!self.shader.is_loaded()).then(|| self.shader.name()),
            self.texture.as_ref().filter(|t| !t.is_loaded()).map(|t| t.name()),
        ];
        match names_pending.into_iter().flatten().next() {
            Some(name) => Err(ResourceError::NotReady(name.to_string())),
            None => Ok(()),
        }
    }

    /// Whether the model can be drawn this frame
    pub fn is_ready(&self) -> bool {
        self.ensure_ready().is_ok()
    }
}
