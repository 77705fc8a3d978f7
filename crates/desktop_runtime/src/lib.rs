pub mod config;
pub mod desktop;
pub mod desktop_icons;
pub mod effect_executor;
pub mod model;
pub mod persistence;
pub mod position;
pub mod reducer;
pub mod runtime_context;
pub mod scheduler;
pub mod selection;
pub mod vfs;
pub mod window_manager;

pub use config::{ConfigError, DesktopConfig, GridSize};
pub use desktop::{
    Desktop, DesktopError, DesktopShortcut, DropOutcome, ExplorerLayout, FolderMove,
    IconActivation,
};
pub use desktop_icons::{
    ClipboardAction, ClipboardPayload, IconBinding, IconBoard, IconId, IconRecord,
};
pub use model::*;
pub use position::{IconPosition, PercentPosition, PositionHelper};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use selection::{BoxSelection, SelectionManager};
pub use vfs::{FsError, FsNode, VirtualFileSystem};
