//! World-space geometry the collider shapes resolve to
//!
//! Spheres, boxes, vertical segments and triangles, plus the closest-point
//! queries the pairwise contact tests in `shape` are written against.

use crate::foundation::math::Vec3;

/// Below this length a direction is treated as zero
pub(crate) const EPSILON: f32 = 1.0e-6;

/// Sphere placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// World position of the middle
    pub center: Vec3,
    /// Non-negative radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Negative radii clamp to zero
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    /// Overlap test; spheres that just touch overlap
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        (other.center - self.center).magnitude_squared() <= reach * reach
    }

    /// Box enclosing the sphere
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_extents(self.center, Vec3::repeat(self.radius))
    }
}

/// Box aligned with the world axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lowest corner
    pub min: Vec3,
    /// Highest corner
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning two corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box around `center` reaching `extents` along each axis; signs are ignored
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let half = extents.abs();
        Self::new(center - half, center + half)
    }

    /// Tightest box around a point cloud, `None` when there are no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let seed = *points.next()?;
        Some(points.fold(Self::new(seed, seed), |bounds, p| {
            Self::new(bounds.min.inf(p), bounds.max.sup(p))
        }))
    }

    /// Midpoint
    pub fn center(&self) -> Vec3 {
        self.min.lerp(&self.max, 0.5)
    }

    /// Half the size on each axis
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) / 2.0
    }

    /// Inclusive overlap test on all three axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// `point` clamped into the box
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.sup(&self.min).inf(&self.max)
    }
}

/// Line segment, used as the spine of a capsule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Lower end
    pub start: Vec3,
    /// Upper end
    pub end: Vec3,
}

impl Segment {
    /// Segment from `start` to `end`
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Projection of `point` onto the segment, clamped to its ends
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let span = self.end - self.start;
        let span_sq = span.magnitude_squared();
        if span_sq < EPSILON {
            return self.start;
        }
        let t = (point - self.start).dot(&span) / span_sq;
        self.start + span * t.clamp(0.0, 1.0)
    }

    /// Height on the segment nearest to the vertical interval `[min, max]`
    ///
    /// Capsule spines are always upright, so matching them against another
    /// upright feature reduces to a 1D interval problem. Overlapping
    /// intervals meet in the middle of the shared part.
    pub fn closest_height_to_range(&self, min: f32, max: f32) -> f32 {
        let (bottom, top) = if self.start.y <= self.end.y {
            (self.start.y, self.end.y)
        } else {
            (self.end.y, self.start.y)
        };
        let shared_bottom = bottom.max(min);
        let shared_top = top.min(max);
        if shared_bottom <= shared_top {
            0.5 * (shared_bottom + shared_top)
        } else if top < min {
            top
        } else {
            bottom
        }
    }
}

/// Three corners of a mesh face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner
    pub v0: Vec3,
    /// Second corner
    pub v1: Vec3,
    /// Third corner
    pub v2: Vec3,
}

impl Triangle {
    /// Triangle through three corners, wound counter-clockwise for an outward normal
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit face normal, zero for a degenerate face
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0)
            .cross(&(self.v2 - self.v0))
            .try_normalize(EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Corners in winding order
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Nearest point of the face to `p`
    ///
    /// Classifies `p` against the Voronoi regions of the corners, then the
    /// edges, and falls back to the barycentric projection onto the face.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let (ab_ap, ac_ap) = (ab.dot(&ap), ac.dot(&ap));
        if ab_ap <= 0.0 && ac_ap <= 0.0 {
            return a;
        }

        let bp = p - b;
        let (ab_bp, ac_bp) = (ab.dot(&bp), ac.dot(&bp));
        if ab_bp >= 0.0 && ac_bp <= ab_bp {
            return b;
        }

        let cp = p - c;
        let (ab_cp, ac_cp) = (ab.dot(&cp), ac.dot(&cp));
        if ac_cp >= 0.0 && ab_cp <= ac_cp {
            return c;
        }

        let area_c = ab_ap * ac_bp - ab_bp * ac_ap;
        if area_c <= 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
            return a + ab * (ab_ap / (ab_ap - ab_bp));
        }

        let area_b = ab_cp * ac_ap - ab_ap * ac_cp;
        if area_b <= 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
            return a + ac * (ac_ap / (ac_ap - ac_cp));
        }

        let area_a = ab_bp * ac_cp - ab_cp * ac_bp;
        let toward_c = ac_bp - ab_bp;
        let toward_b = ab_cp - ac_cp;
        if area_a <= 0.0 && toward_c >= 0.0 && toward_b >= 0.0 {
            return b + (c - b) * (toward_c / (toward_c + toward_b));
        }

        let total = area_a + area_b + area_c;
        a + ab * (area_b / total) + ac * (area_c / total)
    }

    /// Signed distance of `point` from the face plane, positive on the normal side
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        (point - self.v0).dot(&self.normal())
    }

    /// Separating-axis overlap test against another face
    ///
    /// Candidate axes are the two face normals and the nine pairwise edge
    /// cross products; parallel edges yield no axis and are skipped.
    pub fn intersects_triangle(&self, other: &Triangle) -> bool {
        let interval = |tri: &Triangle, axis: &Vec3| {
            tri.vertices()
                .iter()
                .map(|v| axis.dot(v))
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)))
        };
        let separates = |axis: Vec3| match axis.try_normalize(EPSILON) {
            Some(axis) => {
                let (lo_a, hi_a) = interval(self, &axis);
                let (lo_b, hi_b) = interval(other, &axis);
                hi_a < lo_b || hi_b < lo_a
            }
            None => false,
        };

        if separates(self.normal()) || separates(other.normal()) {
            return false;
        }

        let ours = [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2];
        let theirs = [other.v1 - other.v0, other.v2 - other.v1, other.v0 - other.v2];
        !ours
            .iter()
            .any(|e| theirs.iter().any(|f| separates(e.cross(f))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner_triangle() -> Triangle {
        Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y())
    }

    #[test]
    fn test_spheres_that_touch_overlap() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let b = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Vec3::new(2.1, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(BoundingSphere::new(Vec3::zeros(), -3.0).radius, 0.0);
    }

    #[test]
    fn test_aabb_closest_point_clamps() {
        let aabb = Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(-1.0));
        assert_eq!(aabb.closest_point(Vec3::new(3.0, 0.5, -4.0)), Vec3::new(1.0, 0.5, -1.0));
        assert_eq!(aabb.closest_point(Vec3::new(0.2, 0.1, 0.0)), Vec3::new(0.2, 0.1, 0.0));
    }

    #[test]
    fn test_aabb_from_points() {
        let points = [Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert_relative_eq!(aabb.center(), Vec3::new(0.0, 0.5, 0.25));
        assert!(Aabb::from_points(&[] as &[Vec3]).is_none());
    }

    #[test]
    fn test_aabb_intersects_on_shared_face() {
        let a = Aabb::new(Vec3::zeros(), Vec3::repeat(1.0));
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_segment_closest_point() {
        let segment = Segment::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(segment.closest_point(Vec3::new(2.0, 0.5, 0.0)), Vec3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(segment.closest_point(Vec3::new(0.0, 5.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_segment_closest_height_to_range() {
        let segment = Segment::new(Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(segment.closest_height_to_range(1.0, 3.0), 1.5);
        assert_eq!(segment.closest_height_to_range(4.0, 5.0), 2.0);
        assert_eq!(segment.closest_height_to_range(-3.0, -1.0), 0.0);
    }

    #[test]
    fn test_triangle_closest_point_regions() {
        let tri = corner_triangle();
        assert_relative_eq!(tri.closest_point(Vec3::new(0.2, 0.2, 5.0)), Vec3::new(0.2, 0.2, 0.0));
        assert_relative_eq!(tri.closest_point(Vec3::new(-1.0, -1.0, 0.0)), Vec3::zeros());
        assert_relative_eq!(tri.closest_point(Vec3::new(0.5, -1.0, 0.0)), Vec3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(tri.closest_point(Vec3::new(1.0, 1.0, 0.0)), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_triangle_plane_distance_is_signed() {
        let tri = corner_triangle();
        assert_relative_eq!(tri.distance_to_point(Vec3::new(0.3, 0.3, 2.0)), 2.0);
        assert_relative_eq!(tri.distance_to_point(Vec3::new(0.3, 0.3, -1.0)), -1.0);
    }

    #[test]
    fn test_triangle_triangle_sat() {
        let floor = Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let crossing = Triangle::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
        );
        let lifted = Triangle::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::new(0.0, 5.0, 1.0),
        );
        assert!(floor.intersects_triangle(&crossing));
        assert!(!floor.intersects_triangle(&lifted));
    }
}
