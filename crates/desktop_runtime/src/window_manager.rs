//! Shared window-manager transition helpers used by the desktop reducer.
//!
//! Stacking uses a single monotonically increasing counter: every focus takes `next_z_index` and
//! bumps it, so the most recently focused window always has the strictly highest z-index and no
//! other window needs re-ranking.

use crate::model::{DesktopState, TaskbarEntry, WindowKey, WindowRect, WindowRecord};

/// Hands out the next z-index and advances the counter.
pub fn next_z_index(state: &mut DesktopState) -> u64 {
    let z = state.next_z_index;
    state.next_z_index += 1;
    z
}

/// Centers a `w` x `h` window inside `viewport`.
pub fn centered_rect(viewport: WindowRect, w: i32, h: i32) -> WindowRect {
    WindowRect {
        x: viewport.x + (viewport.w - w) / 2,
        y: viewport.y + (viewport.h - h) / 2,
        w,
        h,
    }
}

/// Registers a new visible window on top of the stack together with its taskbar entry.
pub fn insert_window(state: &mut DesktopState, key: WindowKey, title: String, rect: WindowRect) {
    let z_index = next_z_index(state);
    add_to_taskbar(state, &key, &title);
    state.windows.push(WindowRecord {
        key,
        title,
        rect,
        restore_rect: None,
        z_index,
        visible: true,
        fullscreen: false,
    });
}

/// Raises `key` above every other window.
///
/// Returns `false` when the window is not registered.
pub fn bring_to_front(state: &mut DesktopState, key: &WindowKey) -> bool {
    if state.window(key).is_none() {
        return false;
    }
    let z_index = next_z_index(state);
    if let Some(window) = state.windows.iter_mut().find(|w| &w.key == key) {
        window.z_index = z_index;
    }
    true
}

/// Hides the window and dims its taskbar entry. The record stays registered.
pub fn minimize_window(state: &mut DesktopState, key: &WindowKey) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| &w.key == key) else {
        return false;
    };
    window.visible = false;
    set_taskbar_dimmed(state, key, true);
    true
}

/// Shows a hidden window and undims its taskbar entry without changing the stack.
pub fn show_window(state: &mut DesktopState, key: &WindowKey) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| &w.key == key) else {
        return false;
    };
    window.visible = true;
    set_taskbar_dimmed(state, key, false);
    true
}

/// Removes the window record and its taskbar entry together.
pub fn close_window(state: &mut DesktopState, key: &WindowKey) -> bool {
    let before = state.windows.len();
    state.windows.retain(|w| &w.key != key);
    if state.windows.len() == before {
        return false;
    }
    remove_from_taskbar(state, key);
    true
}

/// Adds a taskbar entry for `key`. No-op when one already exists.
pub fn add_to_taskbar(state: &mut DesktopState, key: &WindowKey, title: &str) {
    if state.taskbar_entry(key).is_some() {
        return;
    }
    state.taskbar.push(TaskbarEntry {
        key: key.clone(),
        title: title.to_string(),
        dimmed: false,
    });
}

pub fn remove_from_taskbar(state: &mut DesktopState, key: &WindowKey) {
    state.taskbar.retain(|entry| &entry.key != key);
}

fn set_taskbar_dimmed(state: &mut DesktopState, key: &WindowKey, dimmed: bool) {
    if let Some(entry) = state.taskbar.iter_mut().find(|entry| &entry.key == key) {
        entry.dimmed = dimmed;
    }
}

/// Fullscreen state reached by [`toggle_fullscreen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenTransition {
    Entered,
    Exited,
}

/// Flips a window between normal and fullscreen geometry.
///
/// Entering snapshots the current rect and fills `work_area`; exiting restores the snapshot.
pub fn toggle_fullscreen(
    state: &mut DesktopState,
    key: &WindowKey,
    work_area: WindowRect,
) -> Option<FullscreenTransition> {
    let window = state.windows.iter_mut().find(|w| &w.key == key)?;
    if window.fullscreen {
        if let Some(restore_rect) = window.restore_rect.take() {
            window.rect = restore_rect;
        }
        window.fullscreen = false;
        Some(FullscreenTransition::Exited)
    } else {
        window.restore_rect = Some(window.rect);
        window.rect = work_area;
        window.fullscreen = true;
        Some(FullscreenTransition::Entered)
    }
}

/// Applies a bottom-right resize-handle delta. There is no minimum size.
pub fn resize_rect(start: WindowRect, dx: i32, dy: i32) -> WindowRect {
    WindowRect {
        w: start.w.saturating_add(dx),
        h: start.h.saturating_add(dy),
        ..start
    }
}
