//! Renderer boundary
//!
//! The scene never talks to a graphics API. Each frame it pushes its lights
//! and a flat list of draw items into a [`RenderSink`].

use crate::assets::Model;
use crate::foundation::math::Mat4;
use super::Lights;

/// What a draw item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawLayer {
    /// A game object's model
    Object,
    /// Collider debug proxy
    Collider {
        /// The collider touched something this tick
        colliding: bool,
    },
}

/// One model to draw
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    /// Owning game object name
    pub name: &'a str,
    /// Model to world
    pub world_matrix: Mat4,
    /// Mesh, shader and optional texture
    pub model: &'a Model,
    /// Object or collider proxy
    pub layer: DrawLayer,
}

/// Receives a frame's worth of draw data
pub trait RenderSink {
    /// Called once per frame before any item
    fn submit_lights(&mut self, lights: &Lights);

    /// Called once per visible item
    fn submit(&mut self, item: DrawItem<'_>);
}

/// Owned copy of a draw item
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Owning game object name
    pub name: String,
    /// Model to world
    pub world_matrix: Mat4,
    /// Object or collider proxy
    pub layer: DrawLayer,
}

/// Sink that records what it is given
///
/// Used by headless runs and tests.
#[derive(Debug, Default)]
pub struct DrawList {
    /// Items of the last frame, in submit order
    pub items: Vec<DrawRecord>,
    /// Light count of the last frame
    pub light_count: usize,
}

impl DrawList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the recorded frame
    pub fn clear(&mut self) {
        self.items.clear();
        self.light_count = 0;
    }

    /// Items drawn for game object models
    pub fn objects(&self) -> impl Iterator<Item = &DrawRecord> {
        self.items.iter().filter(|item| item.layer == DrawLayer::Object)
    }

    /// Items drawn for collider proxies
    pub fn colliders(&self) -> impl Iterator<Item = &DrawRecord> {
        self.items.iter().filter(|item| matches!(item.layer, DrawLayer::Collider { .. }))
    }
}

impl RenderSink for DrawList {
    fn submit_lights(&mut self, lights: &Lights) {
        self.clear();
        self.light_count = lights.len();
    }

    fn submit(&mut self, item: DrawItem<'_>) {
        self.items.push(DrawRecord {
            name: item.name.to_string(),
            world_matrix: item.world_matrix,
            layer: item.layer,
        });
    }
}
