//! Desktop icon persistence: backing-file records and saved icon positions.
//!
//! Positions live in the key-value store under the icon's virtual path joined with `/`
//! (`Desktop/Notepad.desktop`, `Desktop/.Photos.folder`), independent of the filesystem tree.

use leptos::logging;
use platform_host::{load_json_with, save_json_with, KeyValueStore};
use serde::{Deserialize, Serialize};

use crate::position::PercentPosition;

/// Image used for app icons without a dedicated picture, and for folders.
pub const GENERIC_ICON_IMAGE: &str = "/static/icons/file.webp";

/// Backing-file and position record of an app shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppIconRecord {
    pub app: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PercentPosition>,
}

impl AppIconRecord {
    pub fn new(app: &str, name: &str, position: Option<PercentPosition>) -> Self {
        Self {
            app: app.to_string(),
            name: name.to_string(),
            path: icon_image_path(app).to_string(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FolderTag {
    #[default]
    Folder,
}

/// Position record of a desktop folder icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderIconRecord {
    #[serde(rename = "type")]
    tag: FolderTag,
    pub name: String,
    pub position: PercentPosition,
}

impl FolderIconRecord {
    pub fn new(name: &str, position: PercentPosition) -> Self {
        Self {
            tag: FolderTag::Folder,
            name: name.to_string(),
            position,
        }
    }
}

#[derive(Deserialize)]
struct StoredPosition {
    position: Option<PercentPosition>,
}

pub fn icon_image_path(app: &str) -> &'static str {
    match app {
        "explorer" => "/static/icons/pc.webp",
        "notepad" => "/static/icons/notepad.webp",
        "flash" => "/static/icons/flash.webp",
        _ => GENERIC_ICON_IMAGE,
    }
}

pub fn desktop_file_name(icon_name: &str) -> String {
    format!("{icon_name}.desktop")
}

pub fn folder_meta_file_name(folder_name: &str) -> String {
    format!(".{folder_name}.folder")
}

pub fn icon_storage_key<S: AsRef<str>>(path: &[S], file_name: &str) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .chain(std::iter::once(file_name))
        .collect::<Vec<_>>()
        .join("/")
}

/// Loads the saved percent position under `key`.
///
/// Missing, unreadable, and corrupt records all yield `None`; corrupt ones are logged.
pub fn load_saved_position(store: &dyn KeyValueStore, key: &str) -> Option<PercentPosition> {
    match load_json_with::<_, StoredPosition>(store, key) {
        Ok(record) => record.and_then(|record| record.position),
        Err(err) => {
            logging::warn!("icon position `{key}` unreadable: {err}");
            None
        }
    }
}

/// # Errors
///
/// Returns the store's error when the write is rejected.
pub fn save_app_icon(
    store: &dyn KeyValueStore,
    key: &str,
    record: &AppIconRecord,
) -> Result<(), String> {
    save_json_with(store, key, record)
}

/// # Errors
///
/// Returns the store's error when the write is rejected.
pub fn save_folder_icon(
    store: &dyn KeyValueStore,
    key: &str,
    record: &FolderIconRecord,
) -> Result<(), String> {
    save_json_with(store, key, record)
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn storage_keys_join_path_and_file_name() {
        assert_eq!(
            icon_storage_key(&["Desktop"], &desktop_file_name("Notepad")),
            "Desktop/Notepad.desktop"
        );
        assert_eq!(
            icon_storage_key(&["Desktop"], &folder_meta_file_name("Photos")),
            "Desktop/.Photos.folder"
        );
    }

    #[test]
    fn records_use_stored_json_shape() {
        let app = AppIconRecord::new(
            "explorer",
            "This PC",
            Some(PercentPosition {
                left_percent: 1.5,
                top_percent: 2.0,
            }),
        );
        assert_eq!(
            serde_json::to_value(&app).unwrap(),
            json!({
                "app": "explorer",
                "name": "This PC",
                "path": "/static/icons/pc.webp",
                "position": {"leftPercent": 1.5, "topPercent": 2.0}
            })
        );
        assert_eq!(
            serde_json::to_value(AppIconRecord::new("solitaire", "Cards", None)).unwrap(),
            json!({"app": "solitaire", "name": "Cards", "path": "/static/icons/file.webp"})
        );

        let folder = FolderIconRecord::new("Photos", PercentPosition::default());
        assert_eq!(
            serde_json::to_value(&folder).unwrap(),
            json!({
                "type": "folder",
                "name": "Photos",
                "position": {"leftPercent": 0.0, "topPercent": 0.0}
            })
        );
    }

    #[test]
    fn saved_positions_load_back_and_corrupt_records_are_ignored() {
        let store = MemoryKeyValueStore::default();
        let position = PercentPosition {
            left_percent: 40.0,
            top_percent: 12.5,
        };
        save_folder_icon(&store, "Desktop/.A.folder", &FolderIconRecord::new("A", position))
            .unwrap();
        assert_eq!(load_saved_position(&store, "Desktop/.A.folder"), Some(position));

        store.save("Desktop/B.desktop", "{oops").unwrap();
        assert_eq!(load_saved_position(&store, "Desktop/B.desktop"), None);
        assert_eq!(load_saved_position(&store, "Desktop/C.desktop"), None);

        save_app_icon(
            &store,
            "Desktop/D.desktop",
            &AppIconRecord::new("notepad", "D", None),
        )
        .unwrap();
        assert_eq!(load_saved_position(&store, "Desktop/D.desktop"), None);
    }
}
