//! # Engine Configuration
//!
//! Settings for the simulation core, grouped by subsystem. Every section
//! has sensible defaults, so a config file only needs to name the values it
//! overrides.
//!
//! ```toml
//! [physics]
//! gravity = [0.0, -9.81, 0.0]
//!
//! [loader]
//! worker_count = 5
//! multithread = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;

/// Rigid-body integration and contact response settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration applied to bodies with `use_gravity`
    pub gravity: Vec3,
    /// Minimum contact normal Y component that counts as standing on ground
    pub ground_normal_threshold: f32,
    /// Upper bound on the frame delta handed to the simulation (seconds)
    pub max_delta_time: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ground_normal_threshold: 0.7,
            max_delta_time: 0.1,
        }
    }
}

/// Background resource loading settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of worker threads in the loader pool
    pub worker_count: usize,
    /// Load on worker threads; when false every job runs on the caller
    pub multithread: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            multithread: true,
        }
    }
}

/// First-person player controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed in units per second
    pub move_speed: f32,
    /// Upward velocity applied on jump
    pub jump_speed: f32,
    /// Degrees of yaw per unit of look delta
    pub look_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_speed: 5.0,
            look_sensitivity: 0.1,
        }
    }
}

/// Window parameters handed to the platform layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sandbox".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Debug features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Submit collider proxies to the renderer
    pub draw_colliders: bool,
    /// Log every overlap event at debug level
    pub log_overlap_events: bool,
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Physics settings
    pub physics: PhysicsConfig,
    /// Resource loader settings
    pub loader: LoaderConfig,
    /// Player controller settings
    pub player: PlayerConfig,
    /// Window settings
    pub window: WindowConfig,
    /// Debug settings
    pub debug: DebugConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.physics.gravity = gravity;
        self
    }

    /// Set the number of loader workers
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.loader.worker_count = count;
        self
    }

    /// Enable or disable threaded loading
    pub fn with_multithread(mut self, enabled: bool) -> Self {
        self.loader.multithread = enabled;
        self
    }

    /// Enable or disable collider debug drawing
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug.draw_colliders = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.physics.gravity.iter().all(|c| c.is_finite()) {
            return Err("Gravity must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.physics.ground_normal_threshold) {
            return Err(format!(
                "Ground normal threshold must be in [0, 1], got {}",
                self.physics.ground_normal_threshold
            ));
        }
        if self.physics.max_delta_time <= 0.0 {
            return Err("Max delta time must be positive".to_string());
        }
        if self.loader.worker_count == 0 {
            return Err("Loader needs at least one worker".to_string());
        }
        if self.player.move_speed < 0.0 || self.player.jump_speed < 0.0 {
            return Err("Player speeds must be non-negative".to_string());
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window dimensions must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load from file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene_engine_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.loader.worker_count, 5);
        assert_eq!(config.physics.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let config = EngineConfig::new().with_worker_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("round_trip.toml");
        let config = EngineConfig::new()
            .with_gravity(Vec3::new(0.0, -3.0, 0.0))
            .with_multithread(false)
            .with_debug_draw(true);

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("round_trip.ron");
        let config = EngineConfig::new().with_worker_count(2);

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("[loader]\nworker_count = 2\n").unwrap();
        assert_eq!(config.loader.worker_count, 2);
        assert!(config.loader.multithread);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::default().save_to_file(temp_path("config.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
