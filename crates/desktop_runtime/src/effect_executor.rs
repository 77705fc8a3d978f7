//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use leptos::*;
use platform_host::HostServices;

use crate::{model::WindowKey, reducer::RuntimeEffect, runtime_context::DesktopRuntimeContext};

/// Runs the host-facing part of `effect`.
///
/// Returns the window whose first input should take keyboard focus, which the view layer owns.
/// Native fullscreen is best-effort: the window is already sized to the work area, so a rejected
/// request only logs.
pub fn run_host_effect(host: &HostServices, effect: RuntimeEffect) -> Option<WindowKey> {
    match effect {
        RuntimeEffect::FocusWindowInput(window) => Some(window),
        RuntimeEffect::RequestNativeFullscreen(window) => {
            if let Err(err) = host.fullscreen.request_fullscreen() {
                logging::warn!("native fullscreen unavailable for `{window}`: {err}");
            }
            None
        }
        RuntimeEffect::ExitNativeFullscreen(window) => {
            if host.fullscreen.is_fullscreen() {
                if let Err(err) = host.fullscreen.exit_fullscreen() {
                    logging::warn!("leaving native fullscreen for `{window}` failed: {err}");
                }
            }
            None
        }
    }
}

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before processing so effects queued while draining land in a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let host = runtime.desktop.with_untracked(|desktop| desktop.host().clone());
        for effect in queued {
            if let Some(window) = run_host_effect(&host, effect) {
                runtime.input_focus.set(Some(window));
            }
        }
    });
}
