//! Per-frame input
//!
//! The platform layer samples devices once per frame and hands the scene an
//! [`InputSnapshot`]. Nothing here talks to a window system.

use bitflags::bitflags;

use crate::foundation::math::Vec2;

bitflags! {
    /// Digital buttons held this frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputButtons: u32 {
        /// Jump
        const JUMP = 1 << 0;
        /// Primary action (left mouse)
        const PRIMARY = 1 << 1;
        /// Secondary action (right mouse)
        const SECONDARY = 1 << 2;
        /// Open or close the pause menu
        const MENU = 1 << 3;
        /// Toggle collider debug drawing
        const DEBUG_DRAW = 1 << 4;
    }
}

/// Input state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Movement axes: x strafes right, y moves forward; each in [-1, 1]
    pub move_axes: Vec2,
    /// Mouse movement since the previous frame, in pixels
    pub look_delta: Vec2,
    /// Buttons held
    pub buttons: InputButtons,
}

impl InputSnapshot {
    /// Snapshot with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement axes (clamped to [-1, 1])
    pub fn with_move(mut self, strafe: f32, forward: f32) -> Self {
        self.move_axes = Vec2::new(strafe.clamp(-1.0, 1.0), forward.clamp(-1.0, 1.0));
        self
    }

    /// Set the look delta
    pub fn with_look(mut self, dx: f32, dy: f32) -> Self {
        self.look_delta = Vec2::new(dx, dy);
        self
    }

    /// Press buttons
    pub fn with_buttons(mut self, buttons: InputButtons) -> Self {
        self.buttons |= buttons;
        self
    }

    /// Whether every button in `buttons` is held
    pub fn pressed(&self, buttons: InputButtons) -> bool {
        self.buttons.contains(buttons)
    }

    /// Whether jump is held
    pub fn jump(&self) -> bool {
        self.pressed(InputButtons::JUMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_axes_are_clamped() {
        let input = InputSnapshot::new().with_move(3.0, -0.5);
        assert_eq!(input.move_axes, Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_buttons_accumulate() {
        let input = InputSnapshot::new()
            .with_buttons(InputButtons::JUMP)
            .with_buttons(InputButtons::MENU);
        assert!(input.jump());
        assert!(input.pressed(InputButtons::JUMP | InputButtons::MENU));
        assert!(!input.pressed(InputButtons::PRIMARY));
    }
}
