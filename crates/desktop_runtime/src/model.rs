use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Applications that own managed windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppKind {
    Explorer,
    Terminal,
    Notepad,
    Calculator,
    Browser,
    Music,
    Python,
    Node,
    Settings,
    About,
    Game,
    ImageViewer,
    Properties,
}

impl AppKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Terminal => "terminal",
            Self::Notepad => "notepad",
            Self::Calculator => "calculator",
            Self::Browser => "browser",
            Self::Music => "music",
            Self::Python => "python",
            Self::Node => "node",
            Self::Settings => "settings",
            Self::About => "about",
            Self::Game => "game",
            Self::ImageViewer => "image-viewer",
            Self::Properties => "properties",
        }
    }
}

/// Typed window identity.
///
/// Single-instance apps use `instance: None`; multi-instance apps (a notepad per file, a game
/// per title) distinguish their windows by instance name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowKey {
    pub app: AppKind,
    pub instance: Option<String>,
}

impl WindowKey {
    pub fn app(app: AppKind) -> Self {
        Self {
            app,
            instance: None,
        }
    }

    pub fn instance(app: AppKind, instance: impl Into<String>) -> Self {
        Self {
            app,
            instance: Some(instance.into()),
        }
    }
}

impl PartialOrd for AppKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AppKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}:{instance}", self.app.as_str()),
            None => f.write_str(self.app.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Viewport-sized rectangle anchored at the origin.
    pub fn viewport(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// A window dimension as requested by an application.
///
/// Parsed from the strings apps pass (`"80vw"`, `"70vh"`, `"600px"`, `"600"`, `"auto"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizeSpec {
    Pixels(f64),
    ViewportWidth(f64),
    ViewportHeight(f64),
    Auto,
}

impl SizeSpec {
    /// Resolves to pixels against `viewport`; `None` for [`SizeSpec::Auto`].
    pub fn resolve(self, viewport: WindowRect) -> Option<i32> {
        let px = match self {
            Self::Pixels(px) => px,
            Self::ViewportWidth(pct) => f64::from(viewport.w) * pct / 100.0,
            Self::ViewportHeight(pct) => f64::from(viewport.h) * pct / 100.0,
            Self::Auto => return None,
        };
        Some(px.round() as i32)
    }
}

impl FromStr for SizeSpec {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        let (number, ctor): (&str, fn(f64) -> Self) = if let Some(n) = trimmed.strip_suffix("vw")
        {
            (n, Self::ViewportWidth)
        } else if let Some(n) = trimmed.strip_suffix("vh") {
            (n, Self::ViewportHeight)
        } else if let Some(n) = trimmed.strip_suffix("px") {
            (n, Self::Pixels)
        } else {
            (trimmed, Self::Pixels)
        };

        match number.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(ctor(value)),
            _ => Err(format!("invalid window size `{raw}`")),
        }
    }
}

impl TryFrom<String> for SizeSpec {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<SizeSpec> for String {
    fn from(spec: SizeSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::ViewportWidth(pct) => write!(f, "{pct}vw"),
            Self::ViewportHeight(pct) => write!(f, "{pct}vh"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub key: WindowKey,
    pub title: String,
    pub rect: WindowRect,
    /// Geometry captured when entering fullscreen; restored on exit.
    pub restore_rect: Option<WindowRect>,
    pub z_index: u64,
    pub visible: bool,
    pub fullscreen: bool,
}

/// Taskbar projection of a [`WindowRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskbarEntry {
    pub key: WindowKey,
    pub title: String,
    /// Set while the window is minimized.
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    /// Next z-index to hand out. Never decreases.
    pub next_z_index: u64,
    /// Managed windows in creation order (stacking order is by `z_index`).
    pub windows: Vec<WindowRecord>,
    pub taskbar: Vec<TaskbarEntry>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_z_index_base(1000)
    }
}

impl DesktopState {
    pub fn with_z_index_base(base: u64) -> Self {
        Self {
            next_z_index: base,
            windows: Vec::new(),
            taskbar: Vec::new(),
        }
    }

    pub fn window(&self, key: &WindowKey) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.key == key)
    }

    pub fn taskbar_entry(&self, key: &WindowKey) -> Option<&TaskbarEntry> {
        self.taskbar.iter().find(|t| &t.key == key)
    }

    /// Topmost visible window, if any.
    pub fn focused_window(&self) -> Option<&WindowKey> {
        self.windows
            .iter()
            .filter(|w| w.visible)
            .max_by_key(|w| w.z_index)
            .map(|w| &w.key)
    }

    /// Window keys ordered bottom to top.
    pub fn stacking_order(&self) -> Vec<WindowKey> {
        let mut ordered = self.windows.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|w| w.z_index);
        ordered.into_iter().map(|w| w.key.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub key: WindowKey,
    pub title: String,
    pub width: SizeSpec,
    pub height: SizeSpec,
    /// Viewport the window is sized against and centered in.
    pub viewport: WindowRect,
}

impl OpenWindowRequest {
    pub fn new(key: WindowKey, title: impl Into<String>, viewport: WindowRect) -> Self {
        Self {
            key,
            title: title.into(),
            width: SizeSpec::Auto,
            height: SizeSpec::Auto,
            viewport,
        }
    }

    pub fn with_size(mut self, width: SizeSpec, height: SizeSpec) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replaces `auto` dimensions with the given defaults.
    pub fn with_default_size(mut self, width: SizeSpec, height: SizeSpec) -> Self {
        if self.width == SizeSpec::Auto {
            self.width = width;
        }
        if self.height == SizeSpec::Auto {
            self.height = height;
        }
        self
    }
}

/// Where on a window header a pointer-down landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderHit {
    Title,
    ControlButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window: WindowKey,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window: WindowKey,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

impl InteractionState {
    pub fn is_dragging_window(&self) -> bool {
        self.dragging.is_some()
    }
}
