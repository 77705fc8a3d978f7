//! Desktop icon records and the board that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::GridSize,
    persistence::{icon_image_path, GENERIC_ICON_IMAGE},
    position::IconPosition,
    selection::{Bounds, SelectionSurface},
};

/// Stable handle of one desktop icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IconId(String);

impl IconId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn for_app(name: &str) -> Self {
        Self(format!("app:{name}"))
    }

    pub fn for_folder(name: &str) -> Self {
        Self(format!("folder:{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What double-clicking an icon opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconBinding {
    /// App shortcut backed by `<name>.desktop` in the desktop folder.
    App { app: String, name: String },
    /// Folder directly under the desktop folder.
    Folder { name: String },
}

impl IconBinding {
    pub fn label(&self) -> &str {
        match self {
            Self::App { name, .. } | Self::Folder { name } => name,
        }
    }

    pub fn image_path(&self) -> &'static str {
        match self {
            Self::App { app, .. } => icon_image_path(app),
            Self::Folder { .. } => GENERIC_ICON_IMAGE,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconRecord {
    pub id: IconId,
    pub binding: IconBinding,
    pub position: IconPosition,
    pub selected: bool,
    /// Drop-target outline while a drag hovers this folder.
    pub highlighted: bool,
}

impl IconRecord {
    pub fn new(id: IconId, binding: IconBinding, position: IconPosition) -> Self {
        Self {
            id,
            binding,
            position,
            selected: false,
            highlighted: false,
        }
    }

    pub fn bounds(&self, grid: GridSize) -> Bounds {
        Bounds::from_origin(
            self.position.left_px,
            self.position.top_px,
            grid.width,
            grid.height,
        )
    }
}

/// Icons on the desktop surface, in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconBoard {
    icons: Vec<IconRecord>,
}

impl IconBoard {
    pub fn iter(&self) -> impl Iterator<Item = &IconRecord> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn get(&self, id: &IconId) -> Option<&IconRecord> {
        self.icons.iter().find(|icon| &icon.id == id)
    }

    pub fn get_mut(&mut self, id: &IconId) -> Option<&mut IconRecord> {
        self.icons.iter_mut().find(|icon| &icon.id == id)
    }

    pub fn contains(&self, id: &IconId) -> bool {
        self.get(id).is_some()
    }

    /// Adds `icon`, replacing any icon with the same id.
    pub fn insert(&mut self, icon: IconRecord) {
        match self.get_mut(&icon.id) {
            Some(existing) => *existing = icon,
            None => self.icons.push(icon),
        }
    }

    pub fn remove(&mut self, id: &IconId) -> Option<IconRecord> {
        let index = self.icons.iter().position(|icon| &icon.id == id)?;
        Some(self.icons.remove(index))
    }

    /// Pixel positions of every icon except `id`.
    pub fn positions_except(&self, id: &IconId) -> Vec<(f64, f64)> {
        self.icons
            .iter()
            .filter(|icon| &icon.id != id)
            .map(|icon| (icon.position.left_px, icon.position.top_px))
            .collect()
    }

    /// Last folder icon whose bounds contain the point.
    pub fn folder_at(&self, x: f64, y: f64, grid: GridSize) -> Option<&IconRecord> {
        self.icons
            .iter()
            .rev()
            .find(|icon| icon.binding.is_folder() && icon.bounds(grid).contains(x, y))
    }

    pub fn ids(&self) -> Vec<IconId> {
        self.icons.iter().map(|icon| icon.id.clone()).collect()
    }
}

impl SelectionSurface for IconBoard {
    fn set_selected(&mut self, id: &IconId, selected: bool) {
        if let Some(icon) = self.get_mut(id) {
            icon.selected = selected;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardAction {
    Cut,
    Copy,
}

/// Snapshot of one icon taken at cut/copy time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardIcon {
    pub source: IconId,
    pub binding: IconBinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub action: ClipboardAction,
    pub icons: Vec<ClipboardIcon>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn icon(id: IconId, binding: IconBinding, x: f64, y: f64) -> IconRecord {
        IconRecord::new(
            id,
            binding,
            IconPosition {
                left_px: x,
                top_px: y,
                ..IconPosition::default()
            },
        )
    }

    #[test]
    fn folder_hit_test_uses_icon_bounds() {
        let mut board = IconBoard::default();
        board.insert(icon(
            IconId::for_folder("Games"),
            IconBinding::Folder {
                name: "Games".into(),
            },
            100.0,
            100.0,
        ));
        board.insert(icon(
            IconId::for_app("Notepad"),
            IconBinding::App {
                app: "notepad".into(),
                name: "Notepad".into(),
            },
            5.0,
            5.0,
        ));

        let grid = GridSize::default();
        assert_eq!(
            board.folder_at(180.0, 200.0, grid).map(|i| i.id.clone()),
            Some(IconId::for_folder("Games"))
        );
        assert!(board.folder_at(181.0, 150.0, grid).is_none());
        assert!(board.folder_at(10.0, 10.0, grid).is_none());
    }

    #[test]
    fn insert_replaces_by_id_and_surface_marks_selection() {
        let mut board = IconBoard::default();
        let id = IconId::for_app("Explorer");
        let binding = IconBinding::App {
            app: "explorer".into(),
            name: "Explorer".into(),
        };
        board.insert(icon(id.clone(), binding.clone(), 0.0, 0.0));
        board.insert(icon(id.clone(), binding, 90.0, 0.0));
        assert_eq!(board.len(), 1);
        assert_eq!(board.get(&id).unwrap().position.left_px, 90.0);
        assert_eq!(board.get(&id).unwrap().binding.image_path(), "/static/icons/pc.webp");
        assert_eq!(board.get(&id).unwrap().binding.label(), "Explorer");

        board.set_selected(&id, true);
        assert!(board.get(&id).unwrap().selected);
        assert_eq!(board.positions_except(&id), Vec::<(f64, f64)>::new());
    }
}
