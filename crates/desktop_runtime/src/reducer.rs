//! Reducer actions, side-effect intents, and transition logic for the window manager.

use thiserror::Error;

use crate::{
    model::{
        DesktopState, DragSession, HeaderHit, InteractionState, OpenWindowRequest,
        PointerPosition, ResizeSession, SizeSpec, WindowKey, WindowRect,
    },
    window_manager::{self, FullscreenTransition},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or bring the existing window with the same key to front.
    OpenWindow(OpenWindowRequest),
    /// Close a window and drop its taskbar entry.
    CloseWindow {
        /// Window to close.
        window: WindowKey,
    },
    /// Raise a window to the top of the stack.
    FocusWindow {
        /// Window to focus.
        window: WindowKey,
    },
    /// Hide a window and dim its taskbar entry.
    MinimizeWindow {
        /// Window to minimize.
        window: WindowKey,
    },
    /// Taskbar click: show a hidden window, otherwise bring it to front.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar entry.
        window: WindowKey,
    },
    /// Enter or leave fullscreen.
    ToggleFullscreen {
        /// Window to toggle.
        window: WindowKey,
        /// Area a fullscreen window fills (viewport minus taskbar).
        work_area: WindowRect,
    },
    /// Pointer-down anywhere inside a window.
    WindowPointerDown {
        /// Window that received the pointer.
        window: WindowKey,
    },
    /// Pointer-down on a window header.
    BeginMove {
        /// Window being dragged.
        window: WindowKey,
        /// Pointer position at drag start.
        pointer: PointerPosition,
        /// Part of the header under the pointer; control buttons never start a drag.
        hit: HeaderHit,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Release the active window drag.
    EndMove,
    /// Pointer-down on the bottom-right resize handle.
    BeginResize {
        /// Window being resized.
        window: WindowKey,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Release the active resize.
    EndResize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host layer to execute.
pub enum RuntimeEffect {
    /// Move keyboard focus into the window's primary input.
    FocusWindowInput(WindowKey),
    /// Best-effort native fullscreen request; CSS sizing is already applied.
    RequestNativeFullscreen(WindowKey),
    /// Leave native fullscreen if it is active.
    ExitNativeFullscreen(WindowKey),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// The target window is not registered.
    #[error("window not found")]
    WindowNotFound,
    /// A requested window dimension resolved to a non-positive pixel size.
    #[error("invalid window size: {0}")]
    InvalidWindowSize(String),
}

/// Applies a [`DesktopAction`] to the window manager state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not
/// registered, and [`ReducerError::InvalidWindowSize`] when an open request resolves to an empty
/// window.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            if window_manager::bring_to_front(state, &req.key) {
                effects.push(RuntimeEffect::FocusWindowInput(req.key));
                return Ok(effects);
            }
            let w = resolve_dimension(req.width, req.viewport)?;
            let h = resolve_dimension(req.height, req.viewport)?;
            let rect = window_manager::centered_rect(req.viewport, w, h);
            window_manager::insert_window(state, req.key.clone(), req.title, rect);
            effects.push(RuntimeEffect::FocusWindowInput(req.key));
        }
        DesktopAction::CloseWindow { window } => {
            if !window_manager::close_window(state, &window) {
                return Err(ReducerError::WindowNotFound);
            }
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|session| session.window == window)
            {
                interaction.dragging = None;
            }
            if interaction
                .resizing
                .as_ref()
                .is_some_and(|session| session.window == window)
            {
                interaction.resizing = None;
            }
        }
        DesktopAction::FocusWindow { window } | DesktopAction::WindowPointerDown { window } => {
            if !window_manager::bring_to_front(state, &window) {
                return Err(ReducerError::WindowNotFound);
            }
            effects.push(RuntimeEffect::FocusWindowInput(window));
        }
        DesktopAction::MinimizeWindow { window } => {
            if !window_manager::minimize_window(state, &window) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::ToggleTaskbarWindow { window } => {
            let visible = state
                .window(&window)
                .map(|w| w.visible)
                .ok_or(ReducerError::WindowNotFound)?;
            if visible {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::FocusWindow { window },
                )?);
            } else {
                window_manager::show_window(state, &window);
            }
        }
        DesktopAction::ToggleFullscreen { window, work_area } => {
            match window_manager::toggle_fullscreen(state, &window, work_area)
                .ok_or(ReducerError::WindowNotFound)?
            {
                FullscreenTransition::Entered => {
                    effects.push(RuntimeEffect::RequestNativeFullscreen(window));
                }
                FullscreenTransition::Exited => {
                    effects.push(RuntimeEffect::ExitNativeFullscreen(window));
                }
            }
        }
        DesktopAction::BeginMove {
            window,
            pointer,
            hit,
        } => {
            let rect_start = state
                .window(&window)
                .map(|w| w.rect)
                .ok_or(ReducerError::WindowNotFound)?;
            window_manager::bring_to_front(state, &window);
            if hit == HeaderHit::Title {
                interaction.dragging = Some(DragSession {
                    window,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, &session.window)?;
                window.rect = session.rect_start.offset(dx, dy);
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize { window, pointer } => {
            let rect_start = state
                .window(&window)
                .map(|w| w.rect)
                .ok_or(ReducerError::WindowNotFound)?;
            interaction.resizing = Some(ResizeSession {
                window,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, &session.window)?;
                window.rect = window_manager::resize_rect(session.rect_start, dx, dy);
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
    }

    Ok(effects)
}

/// `auto` must be replaced with a concrete default before the request reaches the reducer.
fn resolve_dimension(spec: SizeSpec, viewport: WindowRect) -> Result<i32, ReducerError> {
    match spec.resolve(viewport) {
        Some(px) if px > 0 => Ok(px),
        _ => Err(ReducerError::InvalidWindowSize(spec.to_string())),
    }
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    key: &WindowKey,
) -> Result<&'a mut crate::model::WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.key == key)
        .ok_or(ReducerError::WindowNotFound)
}
