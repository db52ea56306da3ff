//! Resource Manager - name-keyed resource tracking
//!
//! Owns every mesh, shader and texture slot by name. Lookups hand out
//! shared [`Handle`]s; the data behind a handle appears once its loader
//! finishes. Scenes and models only ever hold handles.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Handle, LoadState, MeshData, Resource, ResourceError, ShaderData, TextureData};

/// Name-keyed table of one resource type
struct ResourceTable<T> {
    entries: HashMap<String, Handle<T>>,
}

impl<T> Default for ResourceTable<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T> ResourceTable<T> {
    fn register(&mut self, name: &str) -> Handle<T> {
        Arc::clone(
            self.entries
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Resource::new(name))),
        )
    }

    fn insert_loaded(&mut self, name: &str, data: T) -> Handle<T> {
        match self.entries.get(name) {
            Some(existing) => {
                existing.complete(data);
                Arc::clone(existing)
            }
            None => {
                let handle = Arc::new(Resource::loaded(name, data));
                self.entries.insert(name.to_string(), Arc::clone(&handle));
                handle
            }
        }
    }

    fn get(&self, name: &str) -> Result<Handle<T>, ResourceError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }

    fn states(&self) -> impl Iterator<Item = LoadState> + '_ {
        self.entries.values().map(|r| r.state())
    }
}

/// Per-state resource counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Registered but not requested
    pub unloaded: usize,
    /// Queued or running
    pub loading: usize,
    /// Ready
    pub loaded: usize,
    /// Failed
    pub failed: usize,
}

impl LoadSummary {
    /// Total number of resources
    pub fn total(&self) -> usize {
        self.unloaded + self.loading + self.loaded + self.failed
    }
}

/// Tracks every named resource the running scene may reference
#[derive(Default)]
pub struct ResourceManager {
    meshes: ResourceTable<MeshData>,
    shaders: ResourceTable<ShaderData>,
    textures: ResourceTable<TextureData>,
}

impl ResourceManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the mesh slot for `name`
    pub fn register_mesh(&mut self, name: &str) -> Handle<MeshData> {
        self.meshes.register(name)
    }

    /// Get or create the shader slot for `name`
    pub fn register_shader(&mut self, name: &str) -> Handle<ShaderData> {
        self.shaders.register(name)
    }

    /// Get or create the texture slot for `name`
    pub fn register_texture(&mut self, name: &str) -> Handle<TextureData> {
        self.textures.register(name)
    }

    /// Store already-built mesh data (procedural geometry)
    pub fn insert_loaded_mesh(&mut self, name: &str, data: MeshData) -> Handle<MeshData> {
        self.meshes.insert_loaded(name, data)
    }

    /// Store already-built shader sources
    pub fn insert_loaded_shader(&mut self, name: &str, data: ShaderData) -> Handle<ShaderData> {
        self.shaders.insert_loaded(name, data)
    }

    /// Store already-built texture data
    pub fn insert_loaded_texture(&mut self, name: &str, data: TextureData) -> Handle<TextureData> {
        self.textures.insert_loaded(name, data)
    }

    /// Look up a mesh by name
    pub fn mesh(&self, name: &str) -> Result<Handle<MeshData>, ResourceError> {
        self.meshes.get(name)
    }

    /// Look up a shader by name
    pub fn shader(&self, name: &str) -> Result<Handle<ShaderData>, ResourceError> {
        self.shaders.get(name)
    }

    /// Look up a texture by name
    pub fn texture(&self, name: &str) -> Result<Handle<TextureData>, ResourceError> {
        self.textures.get(name)
    }

    fn states(&self) -> impl Iterator<Item = LoadState> + '_ {
        self.meshes
            .states()
            .chain(self.shaders.states())
            .chain(self.textures.states())
    }

    /// Count resources per load state
    pub fn summary(&self) -> LoadSummary {
        self.states().fold(LoadSummary::default(), |mut summary, state| {
            match state {
                LoadState::Unloaded => summary.unloaded += 1,
                LoadState::Loading => summary.loading += 1,
                LoadState::Loaded => summary.loaded += 1,
                LoadState::Failed => summary.failed += 1,
            }
            summary
        })
    }

    /// Whether every registered resource is loaded
    pub fn all_loaded(&self) -> bool {
        self.states().all(|state| state == LoadState::Loaded)
    }

    /// Whether any resource is still queued or loading
    pub fn has_pending_loads(&self) -> bool {
        self.states().any(|state| state == LoadState::Loading)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.meshes.entries.len() + self.shaders.entries.len() + self.textures.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every resource
    ///
    /// Outstanding handles stay valid; the manager just stops tracking them.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} resources", self.len());
        self.meshes.entries.clear();
        self.shaders.entries.clear();
        self.textures.entries.clear();
    }
}
