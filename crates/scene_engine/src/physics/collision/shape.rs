//! Collider shapes
//!
//! [`ColliderShape`] is the model-space description stored on a collider.
//! [`ColliderShape::to_world`] places it using the owner's world matrix and
//! yields a [`WorldShape`] that exists only for the duration of a query.
//!
//! Shape tests treat every primitive as axis-aligned in world space: centers
//! follow the full world matrix, sizes follow its scale, rotation is ignored.

use std::fmt;

use crate::foundation::math::{utils, Mat4, Point3, Vec3};
use super::mesh::{CollisionMesh, WorldMesh};
use super::primitives::{Aabb, BoundingSphere, Segment, EPSILON};
use crate::physics::PhysicsError;

/// Shape family, used for diagnostics and default construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Sphere
    Sphere,
    /// Axis-aligned box
    Box,
    /// Vertical capsule
    Capsule,
    /// Triangle mesh
    Mesh,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Capsule => "capsule",
            Self::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

/// Collider geometry in the owner's local space
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Sphere around `center`
    Sphere {
        /// Local center offset
        center: Vec3,
        /// Radius (non-negative)
        radius: f32,
    },
    /// Box around `center`
    Box {
        /// Local center offset
        center: Vec3,
        /// Half size per axis (non-negative)
        half_extents: Vec3,
    },
    /// Capsule standing along local Y
    Capsule {
        /// Local center offset
        center: Vec3,
        /// Cap radius (non-negative)
        radius: f32,
        /// End-to-end height including both caps (non-negative)
        height: f32,
    },
    /// Triangle mesh in model space
    Mesh(CollisionMesh),
}

impl Default for ColliderShape {
    fn default() -> Self {
        ShapeKind::Sphere.into()
    }
}

impl From<ShapeKind> for ColliderShape {
    /// Default-sized primitive; a mesh kind yields an empty mesh
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Sphere => Self::sphere(Vec3::zeros(), 1.0),
            ShapeKind::Box => Self::cuboid(Vec3::zeros(), Vec3::repeat(1.0)),
            ShapeKind::Capsule => Self::capsule(Vec3::zeros(), 0.5, 2.0),
            ShapeKind::Mesh => Self::Mesh(CollisionMesh::from_vertices(&[], &[])),
        }
    }
}

impl ColliderShape {
    /// Sphere collider (negative radius clamps to zero)
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius: radius.max(0.0) }
    }

    /// Box collider (half extents are taken by absolute value)
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        Self::Box { center, half_extents: half_extents.abs() }
    }

    /// Capsule collider (negative sizes clamp to zero)
    pub fn capsule(center: Vec3, radius: f32, height: f32) -> Self {
        Self::Capsule {
            center,
            radius: radius.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Mesh collider from model-space vertices and indices
    pub fn mesh(vertices: &[Vec3], indices: &[u32]) -> Self {
        Self::Mesh(CollisionMesh::from_vertices(vertices, indices))
    }

    /// Shape family
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Mesh(_) => ShapeKind::Mesh,
        }
    }

    /// Local center offset (the model origin for meshes)
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere { center, .. } | Self::Box { center, .. } | Self::Capsule { center, .. } => *center,
            Self::Mesh(_) => Vec3::zeros(),
        }
    }

    /// Place the shape in world space using the owner's world matrix
    pub fn to_world(&self, world: &Mat4) -> WorldShape {
        let scale = utils::extract_scale(world);
        let max_scale = utils::max_abs_component(&scale);
        let place = |center: &Vec3| world.transform_point(&Point3::from(*center)).coords;

        match self {
            Self::Sphere { center, radius } => {
                WorldShape::Sphere(BoundingSphere::new(place(center), radius * max_scale))
            }
            Self::Box { center, half_extents } => WorldShape::Box(Aabb::from_center_extents(
                place(center),
                half_extents.component_mul(&scale),
            )),
            Self::Capsule { center, radius, height } => {
                let radius = radius * max_scale;
                let height = height * scale.y.abs();
                WorldShape::Capsule(WorldCapsule::new(place(center), radius, height))
            }
            Self::Mesh(mesh) => WorldShape::Mesh(mesh.to_world(world)),
        }
    }
}

/// A vertical capsule in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCapsule {
    /// Core segment between the cap centers
    pub segment: Segment,
    /// Cap radius
    pub radius: f32,
}

impl WorldCapsule {
    /// Capsule centered at `center` with the given end-to-end height
    pub fn new(center: Vec3, radius: f32, height: f32) -> Self {
        let half = (height * 0.5 - radius).max(0.0);
        let offset = Vec3::new(0.0, half, 0.0);
        Self {
            segment: Segment::new(center - offset, center + offset),
            radius,
        }
    }

    /// Sphere at the point of the core closest to `point`
    fn sphere_toward(&self, point: Vec3) -> BoundingSphere {
        BoundingSphere::new(self.segment.closest_point(point), self.radius)
    }

    /// Sphere at the point of the core closest to a box
    fn sphere_toward_box(&self, aabb: &Aabb) -> BoundingSphere {
        let y = self.segment.closest_height_to_range(aabb.min.y, aabb.max.y);
        BoundingSphere::new(Vec3::new(self.segment.start.x, y, self.segment.start.z), self.radius)
    }

    /// Sphere at the point of the core closest to another capsule core
    fn sphere_toward_capsule(&self, other: &WorldCapsule) -> BoundingSphere {
        let low = other.segment.start.y.min(other.segment.end.y);
        let high = other.segment.start.y.max(other.segment.end.y);
        let y = self.segment.closest_height_to_range(low, high);
        BoundingSphere::new(Vec3::new(self.segment.start.x, y, self.segment.start.z), self.radius)
    }

    fn bounds(&self) -> Aabb {
        let r = Vec3::repeat(self.radius);
        Aabb::new(
            self.segment.start.inf(&self.segment.end) - r,
            self.segment.start.sup(&self.segment.end) + r,
        )
    }
}

/// Separation data for an intersecting pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the other shape toward this one
    pub normal: Vec3,
    /// Penetration depth along `normal` (0 when merely touching)
    pub depth: f32,
}

impl Contact {
    fn flipped(self) -> Self {
        Self { normal: -self.normal, depth: self.depth }
    }
}

/// A collider shape placed in world space
#[derive(Debug, Clone)]
pub enum WorldShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space axis-aligned box
    Box(Aabb),
    /// World-space vertical capsule
    Capsule(WorldCapsule),
    /// World-space mesh
    Mesh(WorldMesh),
}

impl WorldShape {
    /// Shape family
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Box(_) => ShapeKind::Box,
            Self::Capsule(_) => ShapeKind::Capsule,
            Self::Mesh(_) => ShapeKind::Mesh,
        }
    }

    /// Axis-aligned bounds for the broad phase
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Sphere(sphere) => sphere.bounds(),
            Self::Box(aabb) => *aabb,
            Self::Capsule(capsule) => capsule.bounds(),
            Self::Mesh(mesh) => mesh.bounds(),
        }
    }

    /// Whether the two shapes overlap; touching counts as overlapping
    pub fn intersects(&self, other: &WorldShape) -> Result<bool, PhysicsError> {
        match (self, other) {
            // No square root on the hot path
            (Self::Sphere(a), Self::Sphere(b)) => Ok(a.intersects(b)),
            (Self::Box(a), Self::Box(b)) => Ok(a.intersects(b)),
            (Self::Mesh(a), Self::Mesh(b)) => Ok(a.intersects_mesh(b)),
            _ => self.contact(other).map(|contact| contact.is_some()),
        }
    }

    /// Contact normal and depth if the shapes overlap
    ///
    /// The normal points from `other` toward `self`, so moving `self` by
    /// `normal * depth` separates the pair.
    pub fn contact(&self, other: &WorldShape) -> Result<Option<Contact>, PhysicsError> {
        use WorldShape::{Box, Capsule, Mesh, Sphere};

        let contact = match (self, other) {
            (Sphere(a), Sphere(b)) => sphere_sphere(a, b),
            (Sphere(s), Box(b)) => sphere_box(s, b),
            (Box(b), Sphere(s)) => sphere_box(s, b).map(Contact::flipped),
            (Box(a), Box(b)) => box_box(a, b),

            (Capsule(c), Sphere(s)) => sphere_sphere(&c.sphere_toward(s.center), s),
            (Sphere(s), Capsule(c)) => sphere_sphere(s, &c.sphere_toward(s.center)),
            (Capsule(c), Box(b)) => sphere_box(&c.sphere_toward_box(b), b),
            (Box(b), Capsule(c)) => sphere_box(&c.sphere_toward_box(b), b).map(Contact::flipped),
            (Capsule(a), Capsule(b)) => {
                sphere_sphere(&a.sphere_toward_capsule(b), &b.sphere_toward_capsule(a))
            }

            (Sphere(s), Mesh(m)) => sphere_mesh(s, m),
            (Mesh(m), Sphere(s)) => sphere_mesh(s, m).map(Contact::flipped),
            (Mesh(a), Mesh(b)) => mesh_mesh(a, b),

            (Box(_) | Capsule(_), Mesh(_)) | (Mesh(_), Box(_) | Capsule(_)) => {
                return Err(PhysicsError::UnsupportedShapePair {
                    a: self.kind(),
                    b: other.kind(),
                });
            }
        };

        Ok(contact)
    }
}

fn sphere_sphere(a: &BoundingSphere, b: &BoundingSphere) -> Option<Contact> {
    if !a.intersects(b) {
        return None;
    }
    let offset = a.center - b.center;
    let distance = offset.magnitude();
    let normal = if distance > EPSILON { offset / distance } else { Vec3::y() };
    Some(Contact {
        normal,
        depth: (a.radius + b.radius - distance).max(0.0),
    })
}

fn sphere_box(sphere: &BoundingSphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let offset = sphere.center - closest;
    let distance_squared = offset.magnitude_squared();
    if distance_squared > sphere.radius * sphere.radius {
        return None;
    }

    let distance = distance_squared.sqrt();
    if distance > EPSILON {
        return Some(Contact {
            normal: offset / distance,
            depth: (sphere.radius - distance).max(0.0),
        });
    }

    // Center inside the box: leave through the nearest face
    let (normal, face_distance) = nearest_face(aabb, sphere.center);
    Some(Contact {
        normal,
        depth: sphere.radius + face_distance,
    })
}

/// Outward normal of the face nearest to an interior point and the distance to it
fn nearest_face(aabb: &Aabb, point: Vec3) -> (Vec3, f32) {
    let mut best = (Vec3::y(), f32::MAX);
    for axis in [1, 0, 2] {
        let to_max = aabb.max[axis] - point[axis];
        let to_min = point[axis] - aabb.min[axis];
        let (distance, sign) = if to_max <= to_min { (to_max, 1.0) } else { (to_min, -1.0) };
        if distance < best.1 {
            let mut normal = Vec3::zeros();
            normal[axis] = sign;
            best = (normal, distance);
        }
    }
    best
}

fn box_box(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if !a.intersects(b) {
        return None;
    }

    let overlap = a.max.inf(&b.max) - a.min.sup(&b.min);
    let delta = a.center() - b.center();
    let mut axis = 1;
    for candidate in [0, 2] {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let mut normal = Vec3::zeros();
    normal[axis] = if delta[axis] < 0.0 { -1.0 } else { 1.0 };
    Some(Contact {
        normal,
        depth: overlap[axis].max(0.0),
    })
}

fn sphere_mesh(sphere: &BoundingSphere, mesh: &WorldMesh) -> Option<Contact> {
    mesh.intersect_sphere(sphere)
        .map(|(_, normal, depth)| Contact { normal, depth: depth.max(0.0) })
}

fn mesh_mesh(a: &WorldMesh, b: &WorldMesh) -> Option<Contact> {
    if !a.intersects_mesh(b) {
        return None;
    }
    // Triangle soups carry no volume; separate along the smallest bounds overlap
    box_box(&a.bounds(), &b.bounds()).or(Some(Contact { normal: Vec3::y(), depth: 0.0 }))
}
