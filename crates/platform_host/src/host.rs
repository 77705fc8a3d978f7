//! Host service bundle injected into the desktop runtime.

use std::rc::Rc;

use crate::{
    FullscreenService, KeyValueStore, MemoryFullscreenService, MemoryKeyValueStore,
    NoopFullscreenService, NoopKeyValueStore,
};

/// Stable host strategy selected for the current build/runtime composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed runtime composition.
    Browser,
    /// In-memory composition used by tests and headless tooling.
    Memory,
    /// Composition with no-op adapters.
    Noop,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
            Self::Noop => "noop",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific adapter selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime decoupled from browser APIs.
#[derive(Clone)]
pub struct HostServices {
    /// Persistent string blob store (filesystem tree, icon positions).
    pub storage: Rc<dyn KeyValueStore>,
    /// Native fullscreen service.
    pub fullscreen: Rc<dyn FullscreenService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds a bundle from explicit adapters.
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        fullscreen: Rc<dyn FullscreenService>,
        host_strategy: HostStrategy,
    ) -> Self {
        Self {
            storage,
            fullscreen,
            host_strategy,
        }
    }

    /// Builds an in-memory bundle. The returned store handle shares state with the bundle.
    pub fn in_memory(storage: MemoryKeyValueStore) -> Self {
        Self::new(
            Rc::new(storage),
            Rc::new(MemoryFullscreenService::default()),
            HostStrategy::Memory,
        )
    }

    /// Builds a bundle where persistence and fullscreen are no-ops.
    pub fn noop() -> Self {
        Self::new(
            Rc::new(NoopKeyValueStore),
            Rc::new(NoopFullscreenService),
            HostStrategy::Noop,
        )
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
