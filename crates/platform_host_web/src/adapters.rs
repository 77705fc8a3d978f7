//! Concrete adapter factories for runtime wiring.

use std::rc::Rc;

use platform_host::{HostServices, HostStrategy};

use crate::{WebFullscreenService, WebKeyValueStore};

/// Returns the browser `localStorage` store adapter.
pub fn key_value_store() -> WebKeyValueStore {
    WebKeyValueStore
}

/// Returns the browser fullscreen adapter.
pub fn fullscreen_service() -> WebFullscreenService {
    WebFullscreenService
}

/// Builds the browser host service bundle consumed by `desktop_runtime`.
pub fn build_host_services() -> HostServices {
    HostServices::new(
        Rc::new(key_value_store()),
        Rc::new(fullscreen_service()),
        HostStrategy::Browser,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_bundle_reports_browser_strategy() {
        let host = build_host_services();
        assert_eq!(host.host_strategy, HostStrategy::Browser);
        assert_eq!(host.host_strategy.as_str(), "browser");
    }
}
