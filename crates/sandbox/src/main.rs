//! Sandbox shell
//!
//! Loads the engine config (first argument, `sandbox.toml` next to the
//! working directory, or defaults), registers the menu scenes and runs the
//! scripted headless loop through Scene1 and back.

mod level;
mod platform;

use std::path::Path;

use scene_engine::config::ConfigError;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

use level::Scene1Level;
use platform::{HeadlessPlatform, Script};

const DEFAULT_CONFIG: &str = "sandbox.toml";
const LEVEL_NAME: &str = "Scene1";

/// Sandbox errors
#[derive(Error, Debug)]
enum SandboxError {
    /// Engine error
    #[error(transparent)]
    App(#[from] AppError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn load_config() -> Result<EngineConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => EngineConfig::load(DEFAULT_CONFIG),
        None => {
            log::info!("No {DEFAULT_CONFIG} found, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

fn build_app(config: EngineConfig) -> App<Scene1Level> {
    let mut app = App::new(config, Scene1Level);
    for (name, scene_type) in [
        ("Menu", SceneType::Menu),
        ("Setting", SceneType::Setting),
        ("Credit", SceneType::Credit),
    ] {
        let scene = Scene::new(name, scene_type, app.config());
        app.register_scene(scene);
    }
    app
}

fn main() -> Result<(), SandboxError> {
    logging::init("info");

    let config = load_config()?;
    let mut app = build_app(config);
    let context = app.context();
    log::info!(
        "{} ({}x{}), {} loader workers, multithread {}",
        context.title,
        context.width,
        context.height,
        context.worker_count,
        context.multithread
    );

    let mut state = AppState::new(NextScene::new("Menu", SceneType::Menu));
    let mut platform = HeadlessPlatform::new(Script::default(), LEVEL_NAME);
    app.run(&mut state, &mut platform)?;
    log::info!("Ran {} frames", platform.frame());

    let timer = app.load_timer();
    if let Some(elapsed) = timer.elapsed_threaded.or(timer.elapsed_inline) {
        log::info!("Level load took {elapsed:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_run_returns_to_menu() {
        let config = EngineConfig::default().with_multithread(false);
        let mut app = build_app(config);
        let mut state = AppState::new(NextScene::new("Menu", SceneType::Menu));
        let script = Script { menu_frames: 2, game_frames: 20, outro_frames: 2 };
        let mut platform = HeadlessPlatform::new(script, LEVEL_NAME).unpaced();

        app.run(&mut state, &mut platform).unwrap();

        assert!(state.stop_requested);
        assert_eq!(app.current_type(), Some(SceneType::Menu));
        assert!(app.resources().is_empty());
        assert!(app.load_timer().elapsed_inline.is_some());
        assert!(platform.frame() >= 24);
    }
}
