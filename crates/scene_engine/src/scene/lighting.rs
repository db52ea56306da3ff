//! Scene lights
//!
//! Plain data handed to the renderer once per frame. Colours are RGBA with
//! separate ambient, diffuse and specular terms, positions and directions
//! are world space.

use crate::foundation::math::{utils, Vec3, Vec4};

/// Ambient, diffuse and specular colour of a light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    /// Ambient term
    pub ambient: Vec4,
    /// Diffuse term
    pub diffuse: Vec4,
    /// Specular term
    pub specular: Vec4,
}

impl Default for LightColors {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl LightColors {
    /// Create a colour set
    pub fn new(ambient: Vec4, diffuse: Vec4, specular: Vec4) -> Self {
        Self { ambient, diffuse, specular }
    }
}

/// Light with parallel rays
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Normalized direction the light travels in
    pub direction: Vec3,
    /// Colours
    pub colors: LightColors,
}

/// Light radiating from a point with distance attenuation
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    /// World position
    pub position: Vec3,
    /// Colours
    pub colors: LightColors,
    /// Constant attenuation term
    pub constant: f32,
    /// Linear attenuation term
    pub linear: f32,
    /// Quadratic attenuation term
    pub quadratic: f32,
}

impl PointLight {
    /// Attenuation factor at `distance`: 1 / (c + l*d + q*d^2)
    pub fn attenuation(&self, distance: f32) -> f32 {
        let denominator = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denominator > 0.0 {
            1.0 / denominator
        } else {
            1.0
        }
    }
}

/// Cone light
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// World position
    pub position: Vec3,
    /// Normalized cone axis
    pub direction: Vec3,
    /// Colours
    pub colors: LightColors,
    /// Full-intensity cone half angle in degrees
    pub inner_cone: f32,
    /// Falloff cone half angle in degrees
    pub outer_cone: f32,
}

impl SpotLight {
    /// Intensity factor in [0, 1] for a world point
    ///
    /// 1 inside the inner cone, 0 outside the outer cone, linear in the
    /// cosine of the angle between them.
    pub fn cone_factor(&self, point: &Vec3) -> f32 {
        let Some(to_point) = (point - self.position).try_normalize(1.0e-6) else {
            return 1.0;
        };
        let cos_angle = to_point.dot(&self.direction);
        let cos_inner = utils::deg_to_rad(self.inner_cone).cos();
        let cos_outer = utils::deg_to_rad(self.outer_cone).cos();
        let span = cos_inner - cos_outer;
        if span <= 0.0 {
            return if cos_angle >= cos_inner { 1.0 } else { 0.0 };
        }
        ((cos_angle - cos_outer) / span).clamp(0.0, 1.0)
    }
}

/// Constructors for the three light types
pub struct LightFactory;

impl LightFactory {
    /// Directional light; `direction` is normalized
    pub fn directional(direction: Vec3, colors: LightColors) -> DirectionalLight {
        DirectionalLight {
            direction: direction.try_normalize(1.0e-6).unwrap_or_else(|| -Vec3::y()),
            colors,
        }
    }

    /// Point light with constant/linear/quadratic attenuation
    pub fn point(position: Vec3, colors: LightColors, constant: f32, linear: f32, quadratic: f32) -> PointLight {
        PointLight { position, colors, constant, linear, quadratic }
    }

    /// Spot light; cone angles in degrees, outer is never below inner
    pub fn spot(position: Vec3, direction: Vec3, colors: LightColors, inner_cone: f32, outer_cone: f32) -> SpotLight {
        let inner_cone = inner_cone.max(0.0);
        SpotLight {
            position,
            direction: direction.try_normalize(1.0e-6).unwrap_or_else(|| -Vec3::y()),
            colors,
            inner_cone,
            outer_cone: outer_cone.max(inner_cone),
        }
    }
}

/// Every light of a scene, grouped by type
#[derive(Debug, Clone, Default)]
pub struct Lights {
    /// Directional lights
    pub directional: Vec<DirectionalLight>,
    /// Point lights
    pub point: Vec<PointLight>,
    /// Spot lights
    pub spot: Vec<SpotLight>,
}

impl Lights {
    /// Total number of lights
    pub fn len(&self) -> usize {
        self.directional.len() + self.point.len() + self.spot.len()
    }

    /// Whether there are no lights
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_directional_is_normalized() {
        let light = LightFactory::directional(Vec3::new(0.0, 0.0, 2.0), LightColors::default());
        assert_relative_eq!(light.direction, Vec3::new(0.0, 0.0, 1.0));

        let degenerate = LightFactory::directional(Vec3::zeros(), LightColors::default());
        assert_relative_eq!(degenerate.direction, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_point_attenuation() {
        let light = LightFactory::point(Vec3::zeros(), LightColors::default(), 1.0, 0.09, 0.032);
        assert_relative_eq!(light.attenuation(0.0), 1.0);
        assert_relative_eq!(light.attenuation(10.0), 1.0 / (1.0 + 0.9 + 3.2), epsilon = 1e-6);
    }

    #[test]
    fn test_spot_cone_factor() {
        let light = LightFactory::spot(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            LightColors::default(),
            12.5,
            17.5,
        );
        assert_relative_eq!(light.cone_factor(&Vec3::zeros()), 1.0);
        // 45 degrees off axis is well outside the cone
        assert_relative_eq!(light.cone_factor(&Vec3::new(10.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_spot_outer_never_below_inner() {
        let light = LightFactory::spot(Vec3::zeros(), Vec3::z(), LightColors::default(), 20.0, 5.0);
        assert_eq!(light.outer_cone, 20.0);
    }
}
