//! Native fullscreen service contracts.

use std::{cell::Cell, rc::Rc};

/// Host service for the platform's native (document-level) fullscreen mode.
///
/// Requests are best-effort: callers must already have applied their own fullscreen sizing and
/// treat an error as "native fullscreen unavailable", never as a failed state transition.
pub trait FullscreenService {
    /// Requests native fullscreen.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform call is unavailable or rejected.
    fn request_fullscreen(&self) -> Result<(), String>;

    /// Exits native fullscreen if it is currently active.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform call is unavailable.
    fn exit_fullscreen(&self) -> Result<(), String>;

    /// Returns whether native fullscreen is currently active.
    fn is_fullscreen(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
/// Fullscreen service for hosts without a native fullscreen API.
pub struct NoopFullscreenService;

impl FullscreenService for NoopFullscreenService {
    fn request_fullscreen(&self) -> Result<(), String> {
        Err("native fullscreen unavailable".to_string())
    }

    fn exit_fullscreen(&self) -> Result<(), String> {
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory fullscreen service that tracks the requested mode.
pub struct MemoryFullscreenService {
    active: Rc<Cell<bool>>,
}

impl FullscreenService for MemoryFullscreenService {
    fn request_fullscreen(&self) -> Result<(), String> {
        self.active.set(true);
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), String> {
        self.active.set(false);
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.active.get()
    }
}
