//! Resource payloads
//!
//! Decoding of on-disk mesh and image formats is left to the host
//! application; these types hold the decoded data.

use std::path::Path;

use super::ResourceError;
use crate::foundation::math::Vec3;
use crate::physics::collision::CollisionMesh;

/// Triangle mesh geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in model space
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals (may be empty)
    pub normals: Vec<Vec3>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create mesh data from positions and indices
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, normals: Vec::new(), indices }
    }

    /// Attach per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Collision mesh built from the same triangles
    pub fn collision_mesh(&self) -> CollisionMesh {
        CollisionMesh::from_vertices(&self.vertices, &self.indices)
    }
}

/// Shader program sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderData {
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
}

impl ShaderData {
    /// Shader from in-memory sources
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        }
    }

    /// Read both stages from disk
    pub fn from_files(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        Ok(Self {
            vertex_source: std::fs::read_to_string(vertex_path)?,
            fragment_source: std::fs::read_to_string(fragment_path)?,
        })
    }
}

/// RGBA8 texture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Texture of a single colour
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.iter().copied().cycle().take(count * 4).collect(),
        }
    }

    /// Two-colour checkerboard with square cells of `cell` pixels
    pub fn checker(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let pixels = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .flat_map(|(x, y)| if (x / cell + y / cell) % 2 == 0 { a } else { b })
            .collect();
        Self { width: size, height: size, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_texture_size() {
        let texture = TextureData::solid(4, 2, [255, 0, 0, 255]);
        assert_eq!(texture.pixels.len(), 32);
        assert_eq!(&texture.pixels[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_checker_alternates() {
        let texture = TextureData::checker(4, 2, [0; 4], [255; 4]);
        assert_eq!(texture.pixels.len(), 64);
        assert_eq!(texture.pixels[0], 0);
        // Pixel (2, 0) starts the second cell
        assert_eq!(texture.pixels[8], 255);
    }

    #[test]
    fn test_missing_shader_file_is_io_error() {
        let result = ShaderData::from_files("/nonexistent/shader.vert", "/nonexistent/shader.frag");
        assert!(matches!(result, Err(ResourceError::Io(_))));
    }
}
