//! Triangle soup colliders
//!
//! Meshes are stored in model space and transformed to world space only
//! for the duration of a test.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};
use super::primitives::{Aabb, BoundingSphere, Triangle, EPSILON};

/// A triangle mesh in model space
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh {
    /// Triangles in model space (never modified)
    pub local_triangles: Vec<Triangle>,
    /// Bounding sphere radius around the model origin
    pub local_bounding_radius: f32,
}

impl CollisionMesh {
    /// Build a mesh from model-space vertices and triangle indices
    ///
    /// Trailing indices that do not form a full triangle and indices that
    /// point past the vertex list are skipped.
    pub fn from_vertices(vertices: &[Vec3], indices: &[u32]) -> Self {
        let vertex = |i: u32| vertices.get(i as usize).copied();
        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .filter_map(|chunk| {
                Some(Triangle::new(vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?))
            })
            .collect();

        let radius = triangles
            .iter()
            .flat_map(Triangle::vertices)
            .map(|v| v.magnitude_squared())
            .fold(0.0f32, f32::max)
            .sqrt();

        Self {
            local_triangles: triangles,
            local_bounding_radius: radius,
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.local_triangles.len()
    }

    /// Transform this mesh to world space
    pub fn to_world(&self, matrix: &Mat4) -> WorldMesh {
        let transform = |v: Vec3| matrix.transform_point(&Point3::from(v)).coords;
        let triangles = self
            .local_triangles
            .iter()
            .map(|tri| Triangle::new(transform(tri.v0), transform(tri.v1), transform(tri.v2)))
            .collect();

        let scale = utils::max_abs_component(&utils::extract_scale(matrix));
        WorldMesh {
            triangles,
            center: utils::extract_translation(matrix),
            bounding_radius: self.local_bounding_radius * scale,
        }
    }
}

/// World-space collision mesh, rebuilt for every test
#[derive(Debug, Clone)]
pub struct WorldMesh {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// Model origin in world space
    pub center: Vec3,
    /// Bounding sphere radius in world space
    pub bounding_radius: f32,
}

impl WorldMesh {
    /// Bounding sphere around the model origin
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.bounding_radius)
    }

    /// Axis-aligned bounds of the transformed triangles
    pub fn bounds(&self) -> Aabb {
        let vertices: Vec<Vec3> = self.triangles.iter().flat_map(Triangle::vertices).collect();
        Aabb::from_points(&vertices).unwrap_or_else(|| Aabb::new(self.center, self.center))
    }

    /// Deepest contact between a sphere and the mesh surface
    ///
    /// Returns `(closest_point, normal, penetration)` where the normal points
    /// from the mesh toward the sphere center.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<(Vec3, Vec3, f32)> {
        if !self.bounding_sphere().intersects(sphere) {
            return None;
        }

        let radius_squared = sphere.radius * sphere.radius;
        let mut deepest: Option<(Vec3, Vec3, f32)> = None;

        for triangle in &self.triangles {
            if triangle.distance_to_point(sphere.center).abs() > sphere.radius {
                continue;
            }

            let closest = triangle.closest_point(sphere.center);
            let offset = sphere.center - closest;
            let distance_squared = offset.magnitude_squared();
            if distance_squared > radius_squared {
                continue;
            }

            let distance = distance_squared.sqrt();
            let normal = if distance > EPSILON {
                offset / distance
            } else {
                triangle.normal()
            };
            let penetration = sphere.radius - distance;
            if deepest.map_or(true, |(_, _, depth)| penetration > depth) {
                deepest = Some((closest, normal, penetration));
            }
        }

        deepest
    }

    /// Any face of `self` crossing any face of `other`
    pub fn intersects_mesh(&self, other: &WorldMesh) -> bool {
        if !self.bounding_sphere().intersects(&other.bounding_sphere()) {
            return false;
        }

        self.triangles
            .iter()
            .any(|a| other.triangles.iter().any(|b| a.intersects_triangle(b)))
    }
}
