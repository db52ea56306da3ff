//! Resource management
//!
//! Meshes, shaders and textures are shared through reference-counted
//! [`Handle`]s keyed by a stable name. Each resource carries an atomic
//! [`LoadState`], which is the only point where the loader threads and the
//! main thread synchronise.

pub mod resource;
pub mod data;
pub mod model;
pub mod resource_manager;
pub mod loader_pool;
pub mod primitives;

pub use resource::{Handle, LoadState, Resource};
pub use data::{MeshData, ShaderData, TextureData};
pub use model::Model;
pub use resource_manager::{LoadSummary, ResourceManager};
pub use loader_pool::LoaderPool;

/// Resource errors
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    /// No resource registered under this name
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource exists but has not finished loading
    #[error("Resource not ready: {0}")]
    NotReady(String),

    /// The loader reported a failure
    #[error("Failed to load {name}: {reason}")]
    LoadFailed {
        /// Resource name
        name: String,
        /// Loader message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
