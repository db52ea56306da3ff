//! Scene switching and the frame loop
//!
//! The application shows one scene at a time. Menu, Setting and Credit
//! scenes are registered once and kept; the gameplay scene is built by a
//! [`LevelFactory`] when it is entered and torn down, together with its
//! resources, when the player goes back to the menu.

use std::collections::HashMap;

use crate::application::{AppContext, AppError, AppState, LevelFactory, NextScene, Platform};
use crate::assets::{LoaderPool, ResourceManager};
use crate::config::EngineConfig;
use crate::foundation::time::{LoadTimer, Timer};
use crate::input::InputSnapshot;
use crate::scene::{RenderSink, Scene, SceneType};

/// Outcome of a scene switch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSwitch {
    /// Already showing the requested scene
    Unchanged,
    /// Now showing the requested scene
    Switched,
    /// Waiting for in-flight loads before leaving the gameplay scene
    Deferred,
    /// The request is not allowed from the current scene and was dropped
    Rejected,
}

/// Owns the scenes, the resources and the loader
pub struct App<L: LevelFactory> {
    config: EngineConfig,
    context: AppContext,
    level: L,
    scenes: HashMap<String, Scene>,
    game_scene: Option<Scene>,
    current: Option<NextScene>,
    resources: ResourceManager,
    loader: Option<LoaderPool>,
    timer: Timer,
    load_timer: LoadTimer,
    waiting_for_loads: bool,
}

impl<L: LevelFactory> App<L> {
    /// Create an application showing nothing yet
    pub fn new(config: EngineConfig, level: L) -> Self {
        let context = AppContext::from_config(&config);
        let timer = Timer::new().with_max_delta(config.physics.max_delta_time);
        Self {
            config,
            context,
            level,
            scenes: HashMap::new(),
            game_scene: None,
            current: None,
            resources: ResourceManager::new(),
            loader: None,
            timer,
            load_timer: LoadTimer::new(),
            waiting_for_loads: false,
        }
    }

    /// Register a menu-like scene under its own name
    pub fn register_scene(&mut self, scene: Scene) {
        if scene.scene_type() == SceneType::Game {
            log::warn!("Registering gameplay scene {} directly; it is never rebuilt", scene.name());
        }
        log::debug!("Registered scene {} ({})", scene.name(), scene.scene_type());
        self.scenes.insert(scene.name().to_string(), scene);
    }

    /// Engine settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Window and loader settings
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Resources of the gameplay scene
    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Load time measurements
    pub fn load_timer(&self) -> &LoadTimer {
        &self.load_timer
    }

    /// Name and type of the scene being shown
    pub fn current(&self) -> Option<&NextScene> {
        self.current.as_ref()
    }

    /// Type of the scene being shown
    pub fn current_type(&self) -> Option<SceneType> {
        self.current.as_ref().map(|current| current.scene_type)
    }

    /// Whether a switch to the menu is waiting for loads to finish
    pub fn is_waiting_for_loads(&self) -> bool {
        self.waiting_for_loads
    }

    /// Scene being shown
    pub fn current_scene(&self) -> Option<&Scene> {
        let current = self.current.as_ref()?;
        match current.scene_type {
            SceneType::Game => self.game_scene.as_ref(),
            _ => self.scenes.get(&current.name),
        }
    }

    /// Scene being shown, mutably
    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        let current = self.current.as_ref()?;
        match current.scene_type {
            SceneType::Game => self.game_scene.as_mut(),
            _ => self.scenes.get_mut(&current.name),
        }
    }

    /// Act on the scene requested in `state`
    pub fn change_scene(&mut self, state: &mut AppState) -> Result<SceneSwitch, AppError> {
        let next = state.next_scene.clone();
        if self.current.as_ref().is_some_and(|current| current.name == next.name) {
            self.waiting_for_loads = false;
            return Ok(SceneSwitch::Unchanged);
        }

        match next.scene_type {
            SceneType::Game => {
                if self.current_type() != Some(SceneType::Menu) {
                    log::warn!("Gameplay can only be entered from the menu, ignoring request for {}", next.name);
                    if let Some(current) = &self.current {
                        state.next_scene = current.clone();
                    }
                    return Ok(SceneSwitch::Rejected);
                }
                self.enter_game(&next.name)?;
            }
            SceneType::Menu => {
                if let Some(loader) = &self.loader {
                    loader.cancel();
                }
                if self.current_type() == Some(SceneType::Game) && self.resources.has_pending_loads() {
                    if !self.waiting_for_loads {
                        log::info!("Waiting for running loads before returning to {}", next.name);
                    }
                    self.waiting_for_loads = true;
                    return Ok(SceneSwitch::Deferred);
                }
                self.ensure_registered(&next.name)?;
                self.leave_game();
            }
            SceneType::Setting | SceneType::Credit => self.ensure_registered(&next.name)?,
        }

        log::info!("Switched to scene {} ({})", next.name, next.scene_type);
        self.waiting_for_loads = false;
        self.current = Some(next);
        Ok(SceneSwitch::Switched)
    }

    fn ensure_registered(&self, name: &str) -> Result<(), AppError> {
        if self.scenes.contains_key(name) {
            Ok(())
        } else {
            log::warn!("Unknown scene requested: {name}");
            Err(AppError::UnknownScene(name.to_string()))
        }
    }

    fn enter_game(&mut self, name: &str) -> Result<(), AppError> {
        self.load_timer.begin();
        let loader = LoaderPool::from_config(&self.config.loader)?;
        self.level.create_resources(&mut self.resources, &loader)?;
        let scene = self.level.build_scene(name, &self.resources, &self.config)?;
        log::debug!(
            "Scene {name} built with {} objects, {} resources",
            scene.game_object_count(),
            self.resources.len()
        );
        self.loader = Some(loader);
        self.game_scene = Some(scene);
        Ok(())
    }

    fn leave_game(&mut self) {
        if self.game_scene.take().is_some() {
            log::debug!("Dropping gameplay scene and {} resources", self.resources.len());
        }
        // Dropping the pool joins its idle workers
        self.loader = None;
        self.resources.clear();
        self.load_timer.reset();
    }

    /// One frame with an explicit time step
    ///
    /// Handles the pending scene request, updates and draws the current
    /// scene, then records the load time once the level is fully loaded.
    pub fn tick(
        &mut self,
        state: &mut AppState,
        input: &InputSnapshot,
        dt: f32,
        sink: &mut dyn RenderSink,
    ) -> Result<SceneSwitch, AppError> {
        let switch = self.change_scene(state)?;
        if let Some(scene) = self.current_scene_mut() {
            scene.update(input, dt);
            scene.draw(sink);
        }
        self.finish_load_timer();
        Ok(switch)
    }

    fn finish_load_timer(&mut self) {
        if !self.load_timer.is_pending() || self.current_type() != Some(SceneType::Game) {
            return;
        }
        let summary = self.resources.summary();
        if summary.loading > 0 || summary.unloaded > 0 {
            return;
        }
        if let Some(elapsed) = self.load_timer.finish(self.context.multithread) {
            let mode = if self.context.multithread { "threaded" } else { "inline" };
            log::info!("Level loaded in {elapsed:?} ({mode}, {} resources)", summary.total());
            if summary.failed > 0 {
                log::warn!("{} resources failed to load", summary.failed);
            }
        }
    }

    /// Run frames until a stop is requested or the platform closes
    pub fn run(&mut self, state: &mut AppState, platform: &mut dyn Platform) -> Result<(), AppError> {
        log::info!("Starting frame loop");
        while !state.stop_requested && !platform.should_close() {
            let input = platform.poll_input(state);
            self.timer.update();
            let dt = self.timer.delta_time();
            self.tick(state, &input, dt, platform.render_sink())?;
            platform.present();
        }
        log::info!("Frame loop finished after {} frames", self.timer.frame_count());
        Ok(())
    }
}
