//! Shared resource slots with an atomic load state

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::ResourceError;

/// Load status of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LoadState {
    /// Registered, nothing requested yet (or a queued load was cancelled)
    Unloaded = 0,
    /// Queued on or running in the loader
    Loading = 1,
    /// Data available
    Loaded = 2,
    /// The loader gave up
    Failed = 3,
}

impl LoadState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Loaded,
            3 => Self::Failed,
            _ => Self::Unloaded,
        }
    }
}

/// Shared handle to a resource
pub type Handle<T> = Arc<Resource<T>>;

/// A named resource slot
///
/// The state is published with release ordering after the data is written,
/// so a reader that observes [`LoadState::Loaded`] also observes the data.
pub struct Resource<T> {
    name: String,
    state: AtomicU8,
    data: RwLock<Option<Arc<T>>>,
    failure: RwLock<Option<String>>,
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

impl<T> Resource<T> {
    /// Create an unloaded resource
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: AtomicU8::new(LoadState::Unloaded as u8),
            data: RwLock::new(None),
            failure: RwLock::new(None),
        }
    }

    /// Create a resource that is already loaded
    pub fn loaded(name: impl Into<String>, data: T) -> Self {
        let resource = Self::new(name);
        resource.complete(data);
        resource
    }

    /// Stable resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current load state
    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the data is available
    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    /// Shared access to the data
    pub fn data(&self) -> Result<Arc<T>, ResourceError> {
        match self.state() {
            LoadState::Loaded => self
                .data
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .ok_or_else(|| ResourceError::NotReady(self.name.clone())),
            LoadState::Failed => Err(ResourceError::LoadFailed {
                name: self.name.clone(),
                reason: self.failure().unwrap_or_default(),
            }),
            LoadState::Unloaded | LoadState::Loading => Err(ResourceError::NotReady(self.name.clone())),
        }
    }

    /// Loader message of the last failure
    pub fn failure(&self) -> Option<String> {
        self.failure.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Move to `Loading` unless a load is already queued or finished
    pub(crate) fn try_begin_loading(&self) -> bool {
        [LoadState::Unloaded, LoadState::Failed].into_iter().any(|from| {
            self.state
                .compare_exchange(from as u8, LoadState::Loading as u8, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }

    /// Store the data and publish `Loaded`
    pub(crate) fn complete(&self, data: T) {
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(data));
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.state.store(LoadState::Loaded as u8, Ordering::Release);
    }

    /// Record a failure and publish `Failed`
    pub(crate) fn fail(&self, reason: impl Into<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
        self.state.store(LoadState::Failed as u8, Ordering::Release);
    }

    /// Drop a queued load that never started
    pub(crate) fn reset(&self) {
        let _ = self.state.compare_exchange(
            LoadState::Loading as u8,
            LoadState::Unloaded as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let resource: Resource<u32> = Resource::new("numbers");
        assert_eq!(resource.state(), LoadState::Unloaded);
        assert!(matches!(resource.data(), Err(ResourceError::NotReady(_))));

        assert!(resource.try_begin_loading());
        assert!(!resource.try_begin_loading());
        assert_eq!(resource.state(), LoadState::Loading);

        resource.complete(7);
        assert!(resource.is_loaded());
        assert_eq!(*resource.data().unwrap(), 7);
        assert!(!resource.try_begin_loading());
    }

    #[test]
    fn test_failure_can_retry() {
        let resource: Resource<u32> = Resource::new("broken");
        assert!(resource.try_begin_loading());
        resource.fail("file missing");

        match resource.data() {
            Err(ResourceError::LoadFailed { name, reason }) => {
                assert_eq!(name, "broken");
                assert_eq!(reason, "file missing");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(resource.try_begin_loading());
    }

    #[test]
    fn test_reset_only_affects_loading() {
        let resource = Resource::loaded("ready", 1u8);
        resource.reset();
        assert!(resource.is_loaded());

        let queued: Resource<u8> = Resource::new("queued");
        queued.try_begin_loading();
        queued.reset();
        assert_eq!(queued.state(), LoadState::Unloaded);
    }
}
