//! Headless platform
//!
//! Stands in for a window: plays a fixed script of scene requests and
//! input, paces frames at roughly 60 Hz and records what would be drawn.

use std::thread;
use std::time::Duration;

use scene_engine::prelude::*;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Frames spent in each phase of the script
#[derive(Debug, Clone, Copy)]
pub struct Script {
    /// Frames on the menu before starting the level
    pub menu_frames: u64,
    /// Frames of gameplay
    pub game_frames: u64,
    /// Frames on the menu after leaving the level
    pub outro_frames: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self { menu_frames: 30, game_frames: 300, outro_frames: 30 }
    }
}

/// Scripted, windowless platform
pub struct HeadlessPlatform {
    script: Script,
    level: String,
    frame: u64,
    frame_time: Duration,
    draw_list: DrawList,
}

impl HeadlessPlatform {
    /// Play `script`, entering the level called `level`
    pub fn new(script: Script, level: impl Into<String>) -> Self {
        Self {
            script,
            level: level.into(),
            frame: 0,
            frame_time: FRAME_TIME,
            draw_list: DrawList::new(),
        }
    }

    /// Run frames back to back (tests)
    pub fn unpaced(mut self) -> Self {
        self.frame_time = Duration::ZERO;
        self
    }

    /// Frames presented so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn gameplay_input(&self, game_frame: u64) -> InputSnapshot {
        // Walk forward, turning slowly, with a hop every two seconds
        let mut input = InputSnapshot::new().with_move(0.0, 1.0).with_look(2.0, 0.0);
        if game_frame % 120 == 60 {
            input = input.with_buttons(InputButtons::JUMP);
        }
        input
    }
}

impl Platform for HeadlessPlatform {
    fn poll_input(&mut self, state: &mut AppState) -> InputSnapshot {
        let Script { menu_frames, game_frames, outro_frames } = self.script;
        let game_start = menu_frames;
        let game_end = game_start + game_frames;

        if self.frame == game_start {
            state.request_scene(self.level.clone(), SceneType::Game);
        } else if self.frame == game_end {
            state.request_scene("Menu", SceneType::Menu);
        } else if self.frame >= game_end + outro_frames {
            state.request_stop();
        }

        if (game_start..game_end).contains(&self.frame) {
            self.gameplay_input(self.frame - game_start)
        } else {
            InputSnapshot::new()
        }
    }

    fn render_sink(&mut self) -> &mut dyn RenderSink {
        &mut self.draw_list
    }

    fn present(&mut self) {
        if self.frame % 60 == 0 {
            log::debug!(
                "Frame {}: {} objects, {} collider proxies, {} lights",
                self.frame,
                self.draw_list.objects().count(),
                self.draw_list.colliders().count(),
                self.draw_list.light_count
            );
        }
        self.frame += 1;
        if !self.frame_time.is_zero() {
            thread::sleep(self.frame_time);
        }
    }

    fn should_close(&self) -> bool {
        false
    }
}
