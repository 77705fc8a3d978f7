//! The long-lived desktop aggregate.
//!
//! [`Desktop`] is the single owner of every piece of mutable core state: the filesystem, the
//! window stack and taskbar, desktop icons, the selection set, the clipboard, and the deferred-task
//! queue. All mutation goes through `&mut Desktop`, so one owner serializes every change.

use leptos::logging;
use platform_host::HostServices;
use thiserror::Error;

use crate::{
    config::DesktopConfig,
    desktop_icons::{
        ClipboardAction, ClipboardIcon, ClipboardPayload, IconBinding, IconBoard, IconId,
        IconRecord,
    },
    model::{DesktopState, InteractionState, OpenWindowRequest, SizeSpec, WindowKey, WindowRect},
    persistence::{
        desktop_file_name, folder_meta_file_name, icon_storage_key, load_saved_position,
        save_app_icon, save_folder_icon, AppIconRecord, FolderIconRecord,
    },
    position::{IconPosition, PositionHelper, SnapOutcome},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    scheduler::Scheduler,
    selection::{BoxSelection, Bounds, SelectionManager},
    vfs::{FsError, FsNode, VirtualFileSystem},
};

const RESIZE_DEBOUNCE_KEY: &str = "viewport-resize";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Desktop icon operation errors.
pub enum DesktopError {
    /// No icon with this id is on the desktop.
    #[error("icon `{0}` not found")]
    IconNotFound(IconId),
    /// A folder operation targeted an app icon.
    #[error("icon `{0}` is not a folder")]
    NotAFolderIcon(IconId),
    /// The backing filesystem operation failed.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// Saving an icon position failed.
    #[error("icon position storage failed: {0}")]
    Storage(String),
}

/// App shortcut shown on the desktop at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopShortcut {
    pub app: String,
    pub name: String,
}

impl DesktopShortcut {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
        }
    }
}

/// Work deferred to the next animation frame or a timer.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Place icons column by column.
    Layout { icons: Vec<IconId>, explorer: bool },
    /// Re-derive every icon's pixels from its percentages, then snap it.
    RepositionIcons,
}

/// Positions computed by a deferred layout for icons the desktop does not own (explorer views).
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerLayout {
    pub positions: Vec<(IconId, IconPosition)>,
}

/// What double-clicking an icon asks the shell to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconActivation {
    LaunchApp(String),
    OpenFolder(Vec<String>),
}

/// Result of releasing an icon drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No icon drag was active.
    Ignored,
    /// No folder under the pointer: the selected icons were snapped and their positions saved.
    Snapped { icons: Vec<IconId> },
    /// Released over a folder icon.
    MovedToFolder {
        folder: String,
        /// Icons whose backing files now live in the folder; their desktop icons are gone.
        moved: Vec<IconId>,
        /// Icons left on the desktop (still selected) with the reason.
        rejected: Vec<(IconId, DesktopError)>,
        /// Set when the re-snapped positions of icons left on the desktop could not be saved.
        unsaved: Option<DesktopError>,
    },
}

/// Per-icon result of [`Desktop::move_icons_to_folder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FolderMove {
    pub moved: Vec<IconId>,
    pub rejected: Vec<(IconId, DesktopError)>,
    pub unsaved: Option<DesktopError>,
}

#[derive(Debug, Clone, PartialEq)]
struct IconDrag {
    last_pointer: (f64, f64),
    target: Option<IconId>,
}

pub struct Desktop {
    config: DesktopConfig,
    host: HostServices,
    vfs: VirtualFileSystem,
    state: DesktopState,
    interaction: InteractionState,
    icons: IconBoard,
    selection: SelectionManager,
    positions: PositionHelper,
    scheduler: Scheduler<DeferredTask>,
    clipboard: Option<ClipboardPayload>,
    icon_drag: Option<IconDrag>,
    box_selection: Option<BoxSelection>,
    viewport: WindowRect,
    paste_counter: u64,
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("host", &self.host)
            .field("viewport", &self.viewport)
            .field("windows", &self.state.windows.len())
            .field("icons", &self.icons.len())
            .finish_non_exhaustive()
    }
}

impl Desktop {
    /// Loads the filesystem from the host store and sizes the icon grid for `viewport`.
    pub fn new(config: DesktopConfig, host: HostServices, viewport: WindowRect) -> Self {
        let vfs = VirtualFileSystem::load(host.storage.clone(), config.fs_storage_key.clone());
        let desktop_height = f64::from(viewport.h - config.taskbar_height).max(0.0);
        let positions = PositionHelper::new(
            config.grid,
            config.explorer_gap_multiplier,
            f64::from(viewport.w),
            desktop_height,
        );
        Self {
            state: DesktopState::with_z_index_base(config.z_index_base),
            config,
            host,
            vfs,
            interaction: InteractionState::default(),
            icons: IconBoard::default(),
            selection: SelectionManager::default(),
            positions,
            scheduler: Scheduler::default(),
            clipboard: None,
            icon_drag: None,
            box_selection: None,
            viewport,
            paste_counter: 0,
        }
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn vfs(&self) -> &VirtualFileSystem {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut VirtualFileSystem {
        &mut self.vfs
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn icons(&self) -> &IconBoard {
        &self.icons
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&ClipboardPayload> {
        self.clipboard.as_ref()
    }

    pub fn position_helper(&self) -> &PositionHelper {
        &self.positions
    }

    pub fn viewport(&self) -> WindowRect {
        self.viewport
    }

    pub fn box_selection(&self) -> Option<Bounds> {
        self.box_selection.map(|rubber_band| rubber_band.bounds())
    }

    /// Viewport area left for windows once the taskbar is reserved.
    pub fn work_area(&self) -> WindowRect {
        WindowRect {
            h: self.viewport.h - self.config.taskbar_height,
            ..self.viewport
        }
    }

    fn desktop_path(&self) -> [String; 1] {
        [self.config.desktop_folder.clone()]
    }

    // Windows

    /// Applies a window-manager action. `auto` sizes in open requests take the configured default.
    ///
    /// # Errors
    ///
    /// Propagates [`ReducerError`] from [`reduce_desktop`].
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let action = match action {
            DesktopAction::OpenWindow(request) => DesktopAction::OpenWindow(
                request.with_default_size(
                    self.config.default_window_width,
                    self.config.default_window_height,
                ),
            ),
            other => other,
        };
        reduce_desktop(&mut self.state, &mut self.interaction, action)
    }

    /// Opens `key` centered in the viewport, or brings the existing window to front.
    ///
    /// `auto` dimensions fall back to the configured default size.
    ///
    /// # Errors
    ///
    /// Fails with [`ReducerError::InvalidWindowSize`] when a dimension resolves to zero pixels.
    pub fn open_window(
        &mut self,
        key: WindowKey,
        title: impl Into<String>,
        width: SizeSpec,
        height: SizeSpec,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let request =
            OpenWindowRequest::new(key, title, self.viewport).with_size(width, height);
        self.dispatch(DesktopAction::OpenWindow(request))
    }

    /// # Errors
    ///
    /// Fails with [`ReducerError::WindowNotFound`] for unknown windows.
    pub fn toggle_fullscreen(&mut self, key: WindowKey) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let work_area = self.work_area();
        self.dispatch(DesktopAction::ToggleFullscreen {
            window: key,
            work_area,
        })
    }

    // Startup

    /// Ensures the desktop folder, places app shortcuts, and creates an icon for every folder
    /// inside the desktop folder.
    ///
    /// Shortcuts with a saved position are restored there; the rest get a `<name>.desktop` backing
    /// file and are laid out on the next animation frame.
    ///
    /// # Errors
    ///
    /// Fails when the desktop folder cannot be created or a backing file cannot be written.
    pub fn initialize(&mut self, shortcuts: &[DesktopShortcut]) -> Result<(), DesktopError> {
        let desktop_path = self.desktop_path();
        self.vfs.ensure_folder(&[] as &[&str], &self.config.desktop_folder)?;

        let mut unplaced = Vec::new();
        for shortcut in shortcuts {
            let file_name = desktop_file_name(&shortcut.name);
            let key = icon_storage_key(&desktop_path, &file_name);
            let id = IconId::for_app(&shortcut.name);
            let binding = IconBinding::App {
                app: shortcut.app.clone(),
                name: shortcut.name.clone(),
            };

            let position = match load_saved_position(self.host.storage.as_ref(), &key) {
                Some(saved) => self.positions.from_percent(saved),
                None => {
                    let record = AppIconRecord::new(&shortcut.app, &shortcut.name, None);
                    let content = serde_json::to_string(&record)
                        .map_err(|e| DesktopError::Storage(e.to_string()))?;
                    self.vfs.create_file(&desktop_path, &file_name, &content)?;
                    unplaced.push(id.clone());
                    IconPosition::default()
                }
            };
            self.icons.insert(IconRecord::new(id, binding, position));
        }

        let folders = self
            .vfs
            .get_folder(&desktop_path)?
            .children
            .iter()
            .filter(|(_, node)| matches!(node, FsNode::Folder(_)))
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        for folder in folders {
            self.create_folder_icon(&folder);
        }

        if !unplaced.is_empty() {
            self.request_layout(unplaced, false);
        }
        Ok(())
    }

    /// Adds the icon for desktop folder `name` (saved position, else snapped). Existing icons are
    /// returned unchanged.
    pub fn create_folder_icon(&mut self, name: &str) -> IconId {
        let id = IconId::for_folder(name);
        if self.icons.contains(&id) {
            return id;
        }
        let key = icon_storage_key(&self.desktop_path(), &folder_meta_file_name(name));
        let binding = IconBinding::Folder {
            name: name.to_string(),
        };
        match load_saved_position(self.host.storage.as_ref(), &key) {
            Some(saved) => {
                let position = self.positions.from_percent(saved);
                self.icons.insert(IconRecord::new(id.clone(), binding, position));
            }
            None => {
                self.icons
                    .insert(IconRecord::new(id.clone(), binding, IconPosition::default()));
                self.snap_icon(&id);
            }
        }
        id
    }

    // Deferred work

    /// Queues a column-by-column layout of `icons` for the next animation frame.
    pub fn request_layout(&mut self, icons: Vec<IconId>, explorer: bool) {
        self.scheduler
            .request_animation_frame(DeferredTask::Layout { icons, explorer });
    }

    /// Runs everything queued for this animation frame.
    ///
    /// Desktop icons are placed in place (and snapped clear of restored icons); layouts requested
    /// for explorer views are returned to the caller.
    pub fn run_animation_frame(&mut self) -> Vec<ExplorerLayout> {
        self.scheduler
            .run_frame()
            .into_iter()
            .filter_map(|task| self.run_deferred(task))
            .collect()
    }

    /// Advances the deferred-task clock and runs timers that came due.
    pub fn advance_clock(&mut self, elapsed_ms: u64) -> Vec<ExplorerLayout> {
        self.scheduler
            .advance(elapsed_ms)
            .into_iter()
            .filter_map(|task| self.run_deferred(task))
            .collect()
    }

    fn run_deferred(&mut self, task: DeferredTask) -> Option<ExplorerLayout> {
        match task {
            DeferredTask::Layout {
                icons,
                explorer: true,
            } => {
                let cells = self.positions.layout(icons.len(), true);
                Some(ExplorerLayout {
                    positions: icons.into_iter().zip(cells).collect(),
                })
            }
            DeferredTask::Layout {
                icons,
                explorer: false,
            } => {
                let cells = self.positions.layout(icons.len(), false);
                for (id, cell) in icons.iter().zip(cells) {
                    if let Some(icon) = self.icons.get_mut(id) {
                        icon.position = cell;
                    }
                }
                for id in &icons {
                    self.snap_icon(id);
                }
                None
            }
            DeferredTask::RepositionIcons => {
                self.reposition_all_icons();
                None
            }
        }
    }

    pub fn has_pending_work(&self) -> bool {
        self.scheduler.has_pending_frame() || self.scheduler.pending_timers() > 0
    }

    /// Records the new viewport and schedules icon repositioning once resizing goes quiet.
    pub fn viewport_resized(&mut self, viewport: WindowRect) {
        self.viewport = viewport;
        let desktop_height = f64::from(viewport.h - self.config.taskbar_height).max(0.0);
        self.positions
            .set_desktop_size(f64::from(viewport.w), desktop_height);
        self.scheduler.debounce(
            RESIZE_DEBOUNCE_KEY,
            DeferredTask::RepositionIcons,
            self.config.resize_debounce_ms,
        );
    }

    fn reposition_all_icons(&mut self) {
        for id in self.icons.ids() {
            if let Some(icon) = self.icons.get_mut(&id) {
                icon.position = self.positions.from_percent(icon.position.percent());
            }
            self.snap_icon(&id);
        }
    }

    fn snap_icon(&mut self, id: &IconId) -> Option<SnapOutcome> {
        let current = self.icons.get(id)?.position;
        let others = self.icons.positions_except(id);
        let snapped = self
            .positions
            .snap(current.left_px, current.top_px, &others);
        if snapped.outcome == SnapOutcome::DesktopFull {
            logging::warn!("no free desktop cell for icon `{id}`");
        }
        if let Some(icon) = self.icons.get_mut(id) {
            icon.position = snapped.position;
        }
        Some(snapped.outcome)
    }

    // Selection

    /// Pointer-down on an icon: a plain press selects only this icon unless it is already
    /// selected; a ctrl press toggles it.
    ///
    /// # Errors
    ///
    /// Fails with [`DesktopError::IconNotFound`] for unknown icons.
    pub fn icon_pointer_down(&mut self, id: &IconId, ctrl: bool) -> Result<(), DesktopError> {
        if !self.icons.contains(id) {
            return Err(DesktopError::IconNotFound(id.clone()));
        }
        if ctrl {
            self.selection.toggle(&mut self.icons, id);
        } else if !self.selection.has(id) {
            self.selection.clear(&mut self.icons);
            self.selection.add(&mut self.icons, id);
        }
        Ok(())
    }

    /// Starts a rubber-band selection. Only presses on empty desktop start one, and never while a
    /// window is being dragged. Returns whether a selection started.
    pub fn begin_box_select(&mut self, x: f64, y: f64, on_empty_desktop: bool) -> bool {
        if !on_empty_desktop || self.interaction.is_dragging_window() {
            return false;
        }
        self.box_selection = Some(BoxSelection::start(x, y));
        self.selection.clear(&mut self.icons);
        true
    }

    pub fn update_box_select(&mut self, x: f64, y: f64) {
        let Some(rubber_band) = self.box_selection.as_mut() else {
            return;
        };
        rubber_band.update(x, y);
        let rubber_band = *rubber_band;
        let grid = self.positions.grid();
        let bounds = self
            .icons
            .iter()
            .map(|icon| (icon.id.clone(), icon.bounds(grid)))
            .collect::<Vec<_>>();
        rubber_band.apply(
            &mut self.selection,
            &mut self.icons,
            bounds.iter().map(|(id, b)| (id, *b)),
        );
    }

    pub fn end_box_select(&mut self) {
        self.box_selection = None;
    }

    // Icon drag

    /// Starts dragging the current selection from the pointer position.
    ///
    /// # Errors
    ///
    /// Fails with [`DesktopError::IconNotFound`] when `grabbed` is not on the desktop.
    pub fn begin_icon_drag(&mut self, grabbed: &IconId, x: f64, y: f64) -> Result<(), DesktopError> {
        if !self.icons.contains(grabbed) {
            return Err(DesktopError::IconNotFound(grabbed.clone()));
        }
        self.icon_drag = Some(IconDrag {
            last_pointer: (x, y),
            target: None,
        });
        Ok(())
    }

    /// Moves every selected icon by the pointer delta (never past the desktop's top-left edge)
    /// and re-targets the folder under the pointer.
    pub fn update_icon_drag(&mut self, x: f64, y: f64) {
        let Some(drag) = self.icon_drag.as_mut() else {
            return;
        };
        let dx = x - drag.last_pointer.0;
        let dy = y - drag.last_pointer.1;
        drag.last_pointer = (x, y);

        for id in self.selection.to_array() {
            if let Some(icon) = self.icons.get_mut(&id) {
                let left = (icon.position.left_px + dx).max(0.0);
                let top = (icon.position.top_px + dy).max(0.0);
                icon.position = self.positions.from_pixels(left, top);
            }
        }

        let previous = self.icon_drag.as_mut().and_then(|drag| drag.target.take());
        if let Some(icon) = previous.and_then(|id| self.icons.get_mut(&id)) {
            icon.highlighted = false;
        }
        let found = self
            .icons
            .folder_at(x, y, self.positions.grid())
            .map(|icon| icon.id.clone())
            .filter(|id| !self.selection.has(id));
        if let Some(icon) = found.as_ref().and_then(|id| self.icons.get_mut(id)) {
            icon.highlighted = true;
        }
        if let Some(drag) = self.icon_drag.as_mut() {
            drag.target = found;
        }
    }

    /// Folder icon currently highlighted as the drop target.
    pub fn drag_target(&self) -> Option<&IconId> {
        self.icon_drag.as_ref().and_then(|drag| drag.target.as_ref())
    }

    /// Releases the icon drag.
    ///
    /// Over a folder, the backing file of every selected app icon moves into that folder; each
    /// icon succeeds or stays put on its own. Otherwise the selected icons snap to the grid and
    /// their positions are saved.
    ///
    /// # Errors
    ///
    /// Fails with [`DesktopError::Storage`] when saving snapped positions fails.
    pub fn end_icon_drag(&mut self) -> Result<DropOutcome, DesktopError> {
        let Some(drag) = self.icon_drag.take() else {
            return Ok(DropOutcome::Ignored);
        };

        let folder = drag.target.and_then(|id| {
            let icon = self.icons.get_mut(&id)?;
            icon.highlighted = false;
            match &icon.binding {
                IconBinding::Folder { name } => Some(name.clone()),
                IconBinding::App { .. } => None,
            }
        });

        match folder {
            Some(folder) => {
                let selected = self.selection.to_array();
                let FolderMove {
                    moved,
                    rejected,
                    unsaved,
                } = self.move_icons_to_folder(&selected, &folder);
                Ok(DropOutcome::MovedToFolder {
                    folder,
                    moved,
                    rejected,
                    unsaved,
                })
            }
            None => {
                let icons = self.selection.to_array();
                for id in &icons {
                    self.snap_icon(id);
                }
                self.save_icon_positions(&icons)?;
                Ok(DropOutcome::Snapped { icons })
            }
        }
    }

    /// Moves the backing files of `icons` from the desktop folder into `folder`.
    ///
    /// Moved icons leave the desktop and the selection. Folder icons are not moved. Icons that
    /// stay are snapped back onto the grid, their new positions saved, and remain selected when
    /// the move itself failed.
    pub fn move_icons_to_folder(&mut self, icons: &[IconId], folder: &str) -> FolderMove {
        let desktop_path = self.desktop_path();
        let destination = [self.config.desktop_folder.clone(), folder.to_string()];
        let mut moved = Vec::new();
        let mut rejected = Vec::new();
        let mut left_behind = Vec::new();

        for id in icons {
            let Some(icon) = self.icons.get(id) else {
                rejected.push((id.clone(), DesktopError::IconNotFound(id.clone())));
                continue;
            };
            let name = match &icon.binding {
                IconBinding::App { name, .. } => name.clone(),
                IconBinding::Folder { .. } => {
                    left_behind.push(id.clone());
                    continue;
                }
            };

            let file_name = desktop_file_name(&name);
            match self.vfs.move_item(&desktop_path, &file_name, &destination) {
                Ok(()) | Err(FsError::Persist(_)) => {
                    self.icons.remove(id);
                    self.selection.forget(id);
                    let key = icon_storage_key(&desktop_path, &file_name);
                    if let Err(err) = self.host.storage.delete(&key) {
                        logging::warn!("stale icon position `{key}` not removed: {err}");
                    }
                    moved.push(id.clone());
                }
                Err(err) => {
                    logging::warn!("moving `{file_name}` into `{folder}` failed: {err}");
                    rejected.push((id.clone(), DesktopError::Fs(err)));
                }
            }
        }

        self.selection.clear(&mut self.icons);
        for (id, _) in &rejected {
            if self.icons.contains(id) {
                self.selection.add(&mut self.icons, id);
                left_behind.push(id.clone());
            }
        }
        for id in &left_behind {
            self.snap_icon(id);
        }
        let unsaved = self.save_icon_positions(&left_behind).err();
        FolderMove {
            moved,
            rejected,
            unsaved,
        }
    }

    /// Saves the current position of each icon under its storage key.
    ///
    /// # Errors
    ///
    /// Returns the last storage failure after attempting every icon.
    pub fn save_icon_positions(&self, icons: &[IconId]) -> Result<(), DesktopError> {
        let desktop_path = self.desktop_path();
        let store = self.host.storage.as_ref();
        let mut failure = None;
        for id in icons {
            let Some(icon) = self.icons.get(id) else {
                continue;
            };
            let position = icon.position.percent();
            let result = match &icon.binding {
                IconBinding::App { app, name } => save_app_icon(
                    store,
                    &icon_storage_key(&desktop_path, &desktop_file_name(name)),
                    &AppIconRecord::new(app, name, Some(position)),
                ),
                IconBinding::Folder { name } => save_folder_icon(
                    store,
                    &icon_storage_key(&desktop_path, &folder_meta_file_name(name)),
                    &FolderIconRecord::new(name, position),
                ),
            };
            if let Err(err) = result {
                logging::warn!("saving position of `{id}` failed: {err}");
                failure = Some(DesktopError::Storage(err));
            }
        }
        failure.map_or(Ok(()), Err)
    }

    // Folders

    /// Creates a folder in the desktop folder and its icon.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::AlreadyExists`] (wrapped) when the name is taken.
    pub fn new_folder(&mut self, name: &str) -> Result<IconId, DesktopError> {
        let desktop_path = self.desktop_path();
        self.vfs.create_folder(&desktop_path, name)?;
        Ok(self.create_folder_icon(name))
    }

    /// Deletes a desktop folder, its icon, and its saved position; clears the selection.
    ///
    /// # Errors
    ///
    /// Fails when `id` is not a folder icon or the filesystem delete fails.
    pub fn delete_folder(&mut self, id: &IconId) -> Result<(), DesktopError> {
        let name = self.folder_name(id)?;
        let desktop_path = self.desktop_path();
        self.vfs.delete_item(&desktop_path, &name)?;
        self.icons.remove(id);
        self.selection.forget(id);
        self.selection.clear(&mut self.icons);
        let key = icon_storage_key(&desktop_path, &folder_meta_file_name(&name));
        if let Err(err) = self.host.storage.delete(&key) {
            logging::warn!("folder position `{key}` not removed: {err}");
        }
        Ok(())
    }

    /// Renames a desktop folder and relabels its icon. Empty or unchanged names are ignored.
    ///
    /// # Errors
    ///
    /// Fails when `id` is not a folder icon or the filesystem rename fails.
    pub fn rename_folder(&mut self, id: &IconId, new_name: &str) -> Result<IconId, DesktopError> {
        let old_name = self.folder_name(id)?;
        if new_name.is_empty() || new_name == old_name {
            return Ok(id.clone());
        }
        let desktop_path = self.desktop_path();
        self.vfs.rename_item(&desktop_path, &old_name, new_name)?;

        let new_id = IconId::for_folder(new_name);
        let was_selected = self.selection.has(id);
        let Some(mut icon) = self.icons.remove(id) else {
            return Err(DesktopError::IconNotFound(id.clone()));
        };
        self.selection.forget(id);
        if self.icons.remove(&new_id).is_some() {
            self.selection.forget(&new_id);
        }
        icon.id = new_id.clone();
        icon.binding = IconBinding::Folder {
            name: new_name.to_string(),
        };
        icon.selected = false;
        self.icons.insert(icon);
        if was_selected {
            self.selection.add(&mut self.icons, &new_id);
        }

        let old_key = icon_storage_key(&desktop_path, &folder_meta_file_name(&old_name));
        if let Err(err) = self.host.storage.delete(&old_key) {
            logging::warn!("folder position `{old_key}` not removed: {err}");
        }
        self.save_icon_positions(std::slice::from_ref(&new_id))?;
        Ok(new_id)
    }

    fn folder_name(&self, id: &IconId) -> Result<String, DesktopError> {
        match self.icons.get(id).map(|icon| &icon.binding) {
            Some(IconBinding::Folder { name }) => Ok(name.clone()),
            Some(IconBinding::App { .. }) => Err(DesktopError::NotAFolderIcon(id.clone())),
            None => Err(DesktopError::IconNotFound(id.clone())),
        }
    }

    /// Shell action for a double-clicked icon.
    ///
    /// # Errors
    ///
    /// Fails with [`DesktopError::IconNotFound`] for unknown icons.
    pub fn activate_icon(&self, id: &IconId) -> Result<IconActivation, DesktopError> {
        match self.icons.get(id).map(|icon| &icon.binding) {
            Some(IconBinding::App { app, .. }) => Ok(IconActivation::LaunchApp(app.clone())),
            Some(IconBinding::Folder { name }) => Ok(IconActivation::OpenFolder(vec![
                self.config.desktop_folder.clone(),
                name.clone(),
            ])),
            None => Err(DesktopError::IconNotFound(id.clone())),
        }
    }

    // Clipboard

    pub fn cut_selected(&mut self) {
        self.clipboard = Some(self.snapshot_selection(ClipboardAction::Cut));
    }

    pub fn copy_selected(&mut self) {
        self.clipboard = Some(self.snapshot_selection(ClipboardAction::Copy));
    }

    fn snapshot_selection(&self, action: ClipboardAction) -> ClipboardPayload {
        let icons = self
            .selection
            .to_array()
            .into_iter()
            .filter_map(|id| {
                self.icons.get(&id).map(|icon| ClipboardIcon {
                    source: id.clone(),
                    binding: icon.binding.clone(),
                })
            })
            .collect();
        ClipboardPayload { action, icons }
    }

    /// Pastes the clipboard at `(x, y)`, cascading each further icon by the configured offset and
    /// snapping it. Cut originals are removed and a cut payload is consumed; copy payloads stay.
    pub fn paste_at(&mut self, x: f64, y: f64) -> Vec<IconId> {
        let Some(payload) = self.clipboard.clone() else {
            return Vec::new();
        };
        let cascade = self.config.paste_cascade_px;
        let mut pasted = Vec::new();

        for (index, entry) in payload.icons.into_iter().enumerate() {
            let id = match payload.action {
                ClipboardAction::Cut => {
                    self.icons.remove(&entry.source);
                    self.selection.forget(&entry.source);
                    entry.source
                }
                ClipboardAction::Copy => {
                    self.paste_counter += 1;
                    IconId::new(format!("{}#{}", entry.source, self.paste_counter))
                }
            };
            let offset = index as f64 * cascade;
            let position = self.positions.from_pixels(x + offset, y + offset);
            self.icons
                .insert(IconRecord::new(id.clone(), entry.binding, position));
            self.snap_icon(&id);
            pasted.push(id);
        }

        if payload.action == ClipboardAction::Cut {
            self.clipboard = None;
        }
        pasted
    }

    /// Removes every selected icon from the desktop.
    pub fn delete_selected(&mut self) -> Vec<IconId> {
        let selected = self.selection.to_array();
        for id in &selected {
            self.selection.remove(&mut self.icons, id);
            self.icons.remove(id);
        }
        selected
    }
}
