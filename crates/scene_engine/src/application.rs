//! Application state and the seams the shell plugs into

use thiserror::Error;

use crate::assets::{LoaderPool, ResourceError, ResourceManager};
use crate::config::{ConfigError, EngineConfig};
use crate::input::InputSnapshot;
use crate::scene::{RenderSink, Scene, SceneError, SceneType};

/// Scene the application should be showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextScene {
    /// Registered scene name (or the level name for gameplay)
    pub name: String,
    /// Scene type
    pub scene_type: SceneType,
}

impl NextScene {
    /// Create a request
    pub fn new(name: impl Into<String>, scene_type: SceneType) -> Self {
        Self { name: name.into(), scene_type }
    }
}

/// Mutable state shared between the frame loop and whoever drives it
///
/// Menus and input handlers write requests here; the application reads
/// them once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Requested scene
    pub next_scene: NextScene,
    /// Leave the frame loop after the current frame
    pub stop_requested: bool,
}

impl AppState {
    /// Start with `initial` requested
    pub fn new(initial: NextScene) -> Self {
        Self { next_scene: initial, stop_requested: false }
    }

    /// Request a scene change
    pub fn request_scene(&mut self, name: impl Into<String>, scene_type: SceneType) {
        self.next_scene = NextScene::new(name, scene_type);
    }

    /// Request shutdown
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }
}

/// Process-level settings the shell needs at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Load resources on worker threads
    pub multithread: bool,
    /// Loader worker count
    pub worker_count: usize,
}

impl AppContext {
    /// Pull the window and loader settings out of the config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            multithread: config.loader.multithread,
            worker_count: config.loader.worker_count,
        }
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested scene was never registered
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Resource error
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Window, input and presentation provided by the shell
pub trait Platform {
    /// Sample input for this frame; may also write scene or stop requests
    fn poll_input(&mut self, state: &mut AppState) -> InputSnapshot;

    /// Where the current scene draws to
    fn render_sink(&mut self) -> &mut dyn RenderSink;

    /// Show the finished frame
    fn present(&mut self);

    /// Whether the window was closed
    fn should_close(&self) -> bool;
}

/// Authors the gameplay level
pub trait LevelFactory {
    /// Register and queue every resource the level needs
    fn create_resources(&mut self, resources: &mut ResourceManager, loader: &LoaderPool) -> Result<(), AppError>;

    /// Build the level scene; resources may still be loading
    fn build_scene(&mut self, name: &str, resources: &ResourceManager, config: &EngineConfig)
        -> Result<Scene, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_requests() {
        let mut state = AppState::new(NextScene::new("Menu", SceneType::Menu));
        state.request_scene("Scene1", SceneType::Game);
        assert_eq!(state.next_scene, NextScene::new("Scene1", SceneType::Game));
        assert!(!state.stop_requested);
        state.request_stop();
        assert!(state.stop_requested);
    }

    #[test]
    fn test_context_from_config() {
        let config = EngineConfig::default().with_worker_count(3).with_multithread(false);
        let context = AppContext::from_config(&config);
        assert_eq!(context.worker_count, 3);
        assert!(!context.multithread);
        assert_eq!((context.width, context.height), (1280, 720));
    }
}
