//! Procedural primitive meshes
//!
//! Used for collider debug proxies and for placeholder geometry. Y is up,
//! triangles wind counter-clockwise when seen from outside.

use crate::foundation::math::{constants, Vec3};
use super::MeshData;

/// Axis-aligned box with the given half extents
pub fn cube(half_extents: Vec3) -> MeshData {
    let h = half_extents.abs();
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let vertices = vec![
        // Front
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
        // Back
        corner(-1.0, -1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(1.0, -1.0, -1.0),
    ];

    let indices = vec![
        // Front
        0, 1, 2, 2, 3, 0,
        // Back
        4, 5, 6, 6, 7, 4,
        // Left
        4, 0, 3, 3, 5, 4,
        // Right
        1, 7, 6, 6, 2, 1,
        // Top
        3, 2, 6, 6, 5, 3,
        // Bottom
        4, 7, 1, 1, 0, 4,
    ];

    let normals = vertices.iter().map(|v| v.try_normalize(1.0e-6).unwrap_or_else(Vec3::y)).collect();
    MeshData::new(vertices, indices).with_normals(normals)
}

/// UV sphere centered at the origin
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    capsule_rings(radius, 0.0, sectors, stacks)
}

/// Capsule standing on Y with the given end-to-end height
pub fn capsule(radius: f32, height: f32, sectors: u32, stacks: u32) -> MeshData {
    let half_segment = (height * 0.5 - radius).max(0.0);
    capsule_rings(radius, half_segment, sectors, stacks)
}

/// Sphere split at the equator with the halves pushed `half_segment` apart
fn capsule_rings(radius: f32, half_segment: f32, sectors: u32, stacks: u32) -> MeshData {
    let sectors = sectors.max(3);
    // Even stack count so one ring sits exactly on the equator
    let stacks = (stacks.max(2) + 1) & !1;
    let radius = radius.max(0.0);

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    // The equator ring is emitted twice, once per hemisphere
    for stack in 0..=stacks + 1 {
        let (ring, offset) = if stack <= stacks / 2 {
            (stack, half_segment)
        } else {
            (stack - 1, -half_segment)
        };
        let phi = constants::PI * 0.5 - constants::PI * ring as f32 / stacks as f32;
        for sector in 0..=sectors {
            let theta = constants::TAU * sector as f32 / sectors as f32;
            let normal = Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
            vertices.push(normal * radius + Vec3::new(0.0, offset, 0.0));
            normals.push(normal);
        }
    }

    let row = sectors + 1;
    let mut indices = Vec::new();
    for stack in 0..=stacks {
        for sector in 0..sectors {
            let top = stack * row + sector;
            let bottom = top + row;
            indices.extend_from_slice(&[top, top + 1, bottom, top + 1, bottom + 1, bottom]);
        }
    }

    MeshData::new(vertices, indices).with_normals(normals)
}
