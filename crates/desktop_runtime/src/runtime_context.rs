//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived [`Desktop`] aggregate inside a signal, the runtime effect queue,
//! and the dispatch callback that routes window actions through the reducer. Views read state with
//! `runtime.desktop.with(..)` and mutate icons or files through
//! [`DesktopRuntimeContext::update_desktop`].
#![allow(clippy::clone_on_copy)]

use leptos::*;
use platform_host::HostServices;

use crate::{
    config::DesktopConfig,
    desktop::{Desktop, DesktopShortcut, ExplorerLayout},
    effect_executor,
    model::{WindowKey, WindowRect},
    reducer::{DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// The desktop aggregate: filesystem, windows, icons, selection, clipboard.
    pub desktop: RwSignal<Desktop>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Window whose first input should receive keyboard focus next.
    pub input_focus: RwSignal<Option<WindowKey>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Runs `f` against the desktop and notifies subscribers.
    pub fn update_desktop<O>(&self, f: impl FnOnce(&mut Desktop) -> O) -> Option<O> {
        self.desktop.try_update(f)
    }

    /// Advances the deferred-task clock by `elapsed_ms` and runs the pending animation frame.
    pub fn tick(&self, elapsed_ms: u64) -> Vec<ExplorerLayout> {
        self.update_desktop(|desktop| {
            let mut layouts = desktop.advance_clock(elapsed_ms);
            layouts.extend(desktop.run_animation_frame());
            layouts
        })
        .unwrap_or_default()
    }
}

/// Builds the desktop, places the startup shortcuts, and wires the dispatch callback.
///
/// Must run inside a reactive owner.
pub fn build_runtime(
    host_services: HostServices,
    config: DesktopConfig,
    viewport: WindowRect,
    shortcuts: &[DesktopShortcut],
) -> DesktopRuntimeContext {
    let mut initial = Desktop::new(config, host_services, viewport);
    if let Err(err) = initial.initialize(shortcuts) {
        logging::warn!("desktop initialization incomplete: {err}");
    }

    let desktop = create_rw_signal(initial);
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let input_focus = create_rw_signal(None::<WindowKey>);

    let dispatch = Callback::new(move |action: DesktopAction| {
        match desktop.try_update(|desktop| desktop.dispatch(action)) {
            Some(Ok(new_effects)) => {
                if !new_effects.is_empty() {
                    effects.update(|queue| queue.extend(new_effects));
                }
            }
            Some(Err(err)) => logging::warn!("desktop reducer error: {err}"),
            None => logging::warn!("desktop runtime disposed; action dropped"),
        }
    });

    DesktopRuntimeContext {
        desktop,
        effects,
        input_focus,
        dispatch,
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Injected browser or in-memory host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Browser viewport at mount time.
    viewport: WindowRect,
    /// App shortcuts placed on the desktop at startup.
    #[prop(optional)]
    shortcuts: Vec<DesktopShortcut>,
    #[prop(optional)] config: Option<DesktopConfig>,
    children: Children,
) -> impl IntoView {
    let runtime = build_runtime(
        host_services,
        config.unwrap_or_default(),
        viewport,
        &shortcuts,
    );

    provide_context(runtime.clone());

    effect_executor::install(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
