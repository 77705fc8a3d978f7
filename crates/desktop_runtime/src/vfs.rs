//! Path-addressed virtual filesystem persisted as a single JSON blob.
//!
//! The whole tree is loaded once at construction and written back after every successful
//! mutation. A write failure keeps the in-memory change and surfaces [`FsError::Persist`].

pub mod node;

use std::rc::Rc;

use leptos::logging;
use platform_host::{resolve_virtual_path, KeyValueStore};
use thiserror::Error;

pub use node::{default_tree, FileKind, FileNode, Folder, FsNode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Filesystem operation errors.
pub enum FsError {
    /// A path segment is missing or names a file.
    #[error("invalid path: cannot access {segment}")]
    PathResolution {
        /// Segment that could not be traversed.
        segment: String,
    },
    /// The named item does not exist in its folder.
    #[error("{name}: not found")]
    NotFound {
        /// Missing item name.
        name: String,
    },
    /// A file operation targeted a folder.
    #[error("{name}: not a file")]
    NotAFile {
        /// Offending item name.
        name: String,
    },
    /// A folder operation targeted a file.
    #[error("{name}: not a folder")]
    NotAFolder {
        /// Offending item name.
        name: String,
    },
    /// An item with this name already exists.
    #[error("{name}: already exists")]
    AlreadyExists {
        /// Conflicting item name.
        name: String,
    },
    /// A folder cannot be moved into itself or one of its descendants.
    #[error("{name}: cannot move a folder into itself")]
    MoveIntoSelf {
        /// Folder being moved.
        name: String,
    },
    /// The mutation applied in memory but could not be written to storage.
    #[error("failed to persist filesystem: {0}")]
    Persist(String),
}

impl FsError {
    /// Short message suitable for a terminal or explorer status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PathResolution { .. } | Self::NotFound { .. } => "No such file or directory",
            Self::NotAFile { .. } => "Is a directory",
            Self::NotAFolder { .. } => "Not a directory",
            Self::AlreadyExists { .. } => "File exists",
            Self::MoveIntoSelf { .. } => "Cannot move a folder into itself",
            Self::Persist(_) => "Changes could not be saved",
        }
    }
}

/// One row of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_file: bool,
}

/// The persisted filesystem tree.
pub struct VirtualFileSystem {
    root: Folder,
    storage: Rc<dyn KeyValueStore>,
    storage_key: String,
}

impl std::fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileSystem")
            .field("storage_key", &self.storage_key)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl VirtualFileSystem {
    /// Loads the tree stored under `storage_key`, falling back to [`default_tree`] when the value
    /// is missing, unreadable, or corrupt.
    pub fn load(storage: Rc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let root = match storage.load(&storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Folder>(&raw) {
                Ok(root) => root,
                Err(err) => {
                    logging::warn!("stored filesystem `{storage_key}` is corrupt, resetting: {err}");
                    default_tree()
                }
            },
            Ok(None) => default_tree(),
            Err(err) => {
                logging::warn!("filesystem load failed: {err}");
                default_tree()
            }
        };
        Self {
            root,
            storage,
            storage_key,
        }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Resolves `input` against `current` (see [`resolve_virtual_path`]).
    pub fn resolve_path<S: AsRef<str>>(&self, input: &str, current: &[S]) -> Vec<String> {
        resolve_virtual_path(input, current)
    }

    /// Returns the folder at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::PathResolution`] when a segment is missing or names a file.
    pub fn get_folder<S: AsRef<str>>(&self, path: &[S]) -> Result<&Folder, FsError> {
        let mut folder = &self.root;
        for segment in path {
            let segment = segment.as_ref();
            folder = folder
                .get(segment)
                .and_then(FsNode::as_folder)
                .ok_or_else(|| FsError::PathResolution {
                    segment: segment.to_string(),
                })?;
        }
        Ok(folder)
    }

    fn get_folder_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Result<&mut Folder, FsError> {
        let mut folder = &mut self.root;
        for segment in path {
            let segment = segment.as_ref();
            folder = folder
                .children
                .get_mut(segment)
                .and_then(FsNode::as_folder_mut)
                .ok_or_else(|| FsError::PathResolution {
                    segment: segment.to_string(),
                })?;
        }
        Ok(folder)
    }

    /// Creates or overwrites a file; the kind is inferred from `name`.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not resolve, when a folder occupies `name`, or when persisting
    /// fails.
    pub fn create_file<S: AsRef<str>>(
        &mut self,
        path: &[S],
        name: &str,
        content: &str,
    ) -> Result<(), FsError> {
        let folder = self.get_folder_mut(path)?;
        if matches!(folder.get(name), Some(FsNode::Folder(_))) {
            return Err(FsError::NotAFile {
                name: name.to_string(),
            });
        }
        folder
            .children
            .insert(name.to_string(), FileNode::named(name, content).into());
        self.persist()
    }

    /// Creates an empty folder.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::AlreadyExists`] when any item already uses `name`.
    pub fn create_folder<S: AsRef<str>>(&mut self, path: &[S], name: &str) -> Result<(), FsError> {
        let folder = self.get_folder_mut(path)?;
        if folder.children.contains_key(name) {
            return Err(FsError::AlreadyExists {
                name: name.to_string(),
            });
        }
        folder
            .children
            .insert(name.to_string(), Folder::default().into());
        self.persist()
    }

    /// Creates `name` under `path` unless a folder already exists there.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::NotAFolder`] when a file occupies `name`.
    pub fn ensure_folder<S: AsRef<str>>(&mut self, path: &[S], name: &str) -> Result<(), FsError> {
        match self.get_folder(path)?.get(name) {
            Some(FsNode::Folder(_)) => Ok(()),
            Some(FsNode::File(_)) => Err(FsError::NotAFolder {
                name: name.to_string(),
            }),
            None => self.create_folder(path, name),
        }
    }

    /// Removes `name` of any node type. Removing a missing item is not an error.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not resolve or persisting fails.
    pub fn delete_item<S: AsRef<str>>(&mut self, path: &[S], name: &str) -> Result<(), FsError> {
        let folder = self.get_folder_mut(path)?;
        if folder.children.remove(name).is_none() {
            return Ok(());
        }
        self.persist()
    }

    /// Renames `old` to `new`, overwriting any existing `new`.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::NotFound`] when `old` does not exist.
    pub fn rename_item<S: AsRef<str>>(
        &mut self,
        path: &[S],
        old: &str,
        new: &str,
    ) -> Result<(), FsError> {
        let folder = self.get_folder_mut(path)?;
        if old == new {
            return match folder.get(old) {
                Some(_) => Ok(()),
                None => Err(FsError::NotFound {
                    name: old.to_string(),
                }),
            };
        }
        let node = folder.children.remove(old).ok_or_else(|| FsError::NotFound {
            name: old.to_string(),
        })?;
        folder.children.insert(new.to_string(), node);
        self.persist()
    }

    /// Replaces a file's content, keeping its kind; creates the file when it does not exist.
    ///
    /// # Errors
    ///
    /// Fails when a folder occupies `name`.
    pub fn update_file<S: AsRef<str>>(
        &mut self,
        path: &[S],
        name: &str,
        content: &str,
    ) -> Result<(), FsError> {
        let folder = self.get_folder_mut(path)?;
        match folder.children.get_mut(name) {
            Some(FsNode::File(file)) => {
                file.content = content.to_string();
                self.persist()
            }
            Some(FsNode::Folder(_)) => Err(FsError::NotAFile {
                name: name.to_string(),
            }),
            None => self.create_file(path, name, content),
        }
    }

    fn file<S: AsRef<str>>(&self, path: &[S], name: &str) -> Result<&FileNode, FsError> {
        match self.get_folder(path)?.get(name) {
            Some(FsNode::File(file)) => Ok(file),
            Some(FsNode::Folder(_)) => Err(FsError::NotAFile {
                name: name.to_string(),
            }),
            None => Err(FsError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Fails when the item is missing or is a folder.
    pub fn get_file_content<S: AsRef<str>>(&self, path: &[S], name: &str) -> Result<&str, FsError> {
        self.file(path, name).map(|file| file.content.as_str())
    }

    /// # Errors
    ///
    /// Fails when the item is missing or is a folder.
    pub fn get_file_kind<S: AsRef<str>>(&self, path: &[S], name: &str) -> Result<FileKind, FsError> {
        self.file(path, name).map(|file| file.kind)
    }

    pub fn is_file<S: AsRef<str>>(&self, path: &[S], name: &str) -> bool {
        self.file(path, name).is_ok()
    }

    /// Lists a folder's children sorted by name.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not resolve.
    pub fn list_entries<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<DirEntry>, FsError> {
        Ok(self
            .get_folder(path)?
            .children
            .iter()
            .map(|(name, node)| DirEntry {
                name: name.clone(),
                is_file: node.is_file(),
            })
            .collect())
    }

    /// Moves `name` from folder `from` into folder `to` as one in-memory step.
    ///
    /// Nothing changes unless the source exists, the destination resolves, and the destination
    /// has no item named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`], [`FsError::PathResolution`], [`FsError::AlreadyExists`], or
    /// [`FsError::MoveIntoSelf`] before mutating; [`FsError::Persist`] after.
    pub fn move_item<S: AsRef<str>, T: AsRef<str>>(
        &mut self,
        from: &[S],
        name: &str,
        to: &[T],
    ) -> Result<(), FsError> {
        let source = self.get_folder(from)?;
        if source.get(name).is_none() {
            return Err(FsError::NotFound {
                name: name.to_string(),
            });
        }
        let moves_into_self = to.len() > from.len()
            && from
                .iter()
                .zip(to.iter())
                .all(|(a, b)| a.as_ref() == b.as_ref())
            && to[from.len()].as_ref() == name;
        if moves_into_self {
            return Err(FsError::MoveIntoSelf {
                name: name.to_string(),
            });
        }
        if self.get_folder(to)?.get(name).is_some() {
            return Err(FsError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let node = self
            .get_folder_mut(from)?
            .children
            .remove(name)
            .ok_or_else(|| FsError::NotFound {
                name: name.to_string(),
            })?;
        self.get_folder_mut(to)?
            .children
            .insert(name.to_string(), node);
        self.persist()
    }

    fn persist(&self) -> Result<(), FsError> {
        let raw = serde_json::to_string(&self.root).map_err(|e| FsError::Persist(e.to_string()))?;
        self.storage.save(&self.storage_key, &raw).map_err(|err| {
            logging::warn!("filesystem persist failed: {err}");
            FsError::Persist(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{MemoryKeyValueStore, NoopKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;

    const KEY: &str = "desktopOS_fileSystem";
    const DOCUMENTS: [&str; 3] = ["home", "reeyuki", "Documents"];

    fn fresh() -> (VirtualFileSystem, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::default();
        (VirtualFileSystem::load(Rc::new(store.clone()), KEY), store)
    }

    #[test]
    fn missing_storage_synthesizes_default_tree() {
        let (fs, _) = fresh();
        let pictures = fs.list_entries(&["home", "reeyuki", "Pictures"]).unwrap();
        assert_eq!(pictures.len(), 3);
        assert!(pictures.iter().all(|entry| entry.is_file));
        assert_eq!(
            fs.get_file_kind(&["home", "reeyuki", "Pictures"], "wallpaper1.webp"),
            Ok(FileKind::Image)
        );
    }

    #[test]
    fn corrupt_storage_falls_back_to_default_tree() {
        let store = MemoryKeyValueStore::default();
        store.save(KEY, "{not json").unwrap();
        let fs = VirtualFileSystem::load(Rc::new(store), KEY);
        assert_eq!(fs.root(), &default_tree());
    }

    #[test]
    fn nested_folder_and_file_scenario() {
        let (mut fs, _) = fresh();
        fs.create_folder(&DOCUMENTS, "Projects").unwrap();
        let projects = ["home", "reeyuki", "Documents", "Projects"];
        assert!(fs.get_folder(&projects).unwrap().is_empty());

        fs.create_file(&projects, "notes.txt", "hello").unwrap();
        assert_eq!(fs.get_file_content(&projects, "notes.txt"), Ok("hello"));
        assert_eq!(fs.get_file_kind(&projects, "notes.txt"), Ok(FileKind::Text));
    }

    #[test]
    fn every_mutation_is_persisted_and_reloads_identically() {
        let (mut fs, store) = fresh();
        fs.create_file(&DOCUMENTS, "a.md", "# a").unwrap();
        fs.update_file(&DOCUMENTS, "a.md", "# b").unwrap();
        fs.rename_item(&DOCUMENTS, "a.md", "b.md").unwrap();

        let reloaded = VirtualFileSystem::load(Rc::new(store), KEY);
        assert_eq!(reloaded.root(), fs.root());
        assert_eq!(reloaded.get_file_content(&DOCUMENTS, "b.md"), Ok("# b"));
        assert!(!reloaded.is_file(&DOCUMENTS, "a.md"));
    }

    #[test]
    fn traversing_through_a_file_or_missing_name_is_a_path_error() {
        let (mut fs, _) = fresh();
        fs.create_file(&DOCUMENTS, "plain.txt", "").unwrap();

        let err = fs
            .get_folder(&["home", "reeyuki", "Documents", "plain.txt"])
            .unwrap_err();
        assert_eq!(
            err,
            FsError::PathResolution {
                segment: "plain.txt".to_string()
            }
        );
        assert_eq!(err.user_message(), "No such file or directory");
        assert!(fs.get_folder(&["nowhere"]).is_err());
    }

    #[test]
    fn create_conflicts_follow_node_type() {
        let (mut fs, _) = fresh();
        fs.create_folder(&DOCUMENTS, "Work").unwrap();
        assert_eq!(
            fs.create_folder(&DOCUMENTS, "Work"),
            Err(FsError::AlreadyExists {
                name: "Work".to_string()
            })
        );
        assert_eq!(
            fs.create_file(&DOCUMENTS, "Work", "x"),
            Err(FsError::NotAFile {
                name: "Work".to_string()
            })
        );
        fs.ensure_folder(&DOCUMENTS, "Work").unwrap();

        fs.create_file(&DOCUMENTS, "todo.txt", "one").unwrap();
        fs.create_file(&DOCUMENTS, "todo.txt", "two").unwrap();
        assert_eq!(fs.get_file_content(&DOCUMENTS, "todo.txt"), Ok("two"));
        assert_eq!(
            fs.ensure_folder(&DOCUMENTS, "todo.txt"),
            Err(FsError::NotAFolder {
                name: "todo.txt".to_string()
            })
        );
    }

    #[test]
    fn rename_preserves_content_and_overwrites_target() {
        let (mut fs, _) = fresh();
        fs.create_file(&DOCUMENTS, "a.txt", "alpha").unwrap();
        fs.create_file(&DOCUMENTS, "b.txt", "beta").unwrap();

        fs.rename_item(&DOCUMENTS, "a.txt", "b.txt").unwrap();
        assert_eq!(fs.get_file_content(&DOCUMENTS, "b.txt"), Ok("alpha"));
        assert!(!fs.is_file(&DOCUMENTS, "a.txt"));

        fs.rename_item(&DOCUMENTS, "b.txt", "b.txt").unwrap();
        assert_eq!(
            fs.rename_item(&DOCUMENTS, "ghost", "g"),
            Err(FsError::NotFound {
                name: "ghost".to_string()
            })
        );
    }

    #[test]
    fn delete_is_silent_for_missing_items() {
        let (mut fs, _) = fresh();
        fs.delete_item(&DOCUMENTS, "ghost").unwrap();
        fs.delete_item(&["home", "reeyuki"], "Music").unwrap();
        assert!(fs.get_folder(&["home", "reeyuki", "Music"]).is_err());
    }

    #[test]
    fn reading_a_folder_as_a_file_fails() {
        let (fs, _) = fresh();
        assert_eq!(
            fs.get_file_content(&["home", "reeyuki"], "Music"),
            Err(FsError::NotAFile {
                name: "Music".to_string()
            })
        );
        assert_eq!(
            fs.get_file_kind(&["home", "reeyuki"], "nothing"),
            Err(FsError::NotFound {
                name: "nothing".to_string()
            })
        );
    }

    #[test]
    fn move_item_checks_before_mutating() {
        let (mut fs, _) = fresh();
        let user = ["home", "reeyuki"];
        fs.create_file(&DOCUMENTS, "cv.txt", "me").unwrap();
        fs.create_file(&["home", "reeyuki", "Music"], "cv.txt", "song").unwrap();

        assert_eq!(
            fs.move_item(&DOCUMENTS, "cv.txt", &["home", "reeyuki", "Music"]),
            Err(FsError::AlreadyExists {
                name: "cv.txt".to_string()
            })
        );
        assert_eq!(fs.get_file_content(&DOCUMENTS, "cv.txt"), Ok("me"));

        assert_eq!(
            fs.move_item(&user, "Documents", &DOCUMENTS),
            Err(FsError::MoveIntoSelf {
                name: "Documents".to_string()
            })
        );

        fs.move_item(&DOCUMENTS, "cv.txt", &["home", "reeyuki", "Pictures"])
            .unwrap();
        assert!(!fs.is_file(&DOCUMENTS, "cv.txt"));
        assert!(fs.is_file(&["home", "reeyuki", "Pictures"], "cv.txt"));
    }

    #[test]
    fn resolve_path_handles_relative_parent_segments() {
        let (fs, _) = fresh();
        assert_eq!(
            fs.resolve_path("../Pictures", &DOCUMENTS),
            vec!["home", "reeyuki", "Pictures"]
        );
        assert_eq!(fs.resolve_path("/../../etc", &DOCUMENTS), vec!["etc"]);
    }

    #[test]
    fn quota_failure_keeps_change_in_memory() {
        let store = MemoryKeyValueStore::with_quota(64);
        let mut fs = VirtualFileSystem::load(Rc::new(store), KEY);
        let err = fs
            .create_file(&DOCUMENTS, "big.txt", &"x".repeat(256))
            .unwrap_err();
        assert!(matches!(err, FsError::Persist(ref msg) if msg.contains("quota")));
        assert!(fs.is_file(&DOCUMENTS, "big.txt"));
    }

    #[test]
    fn noop_storage_still_serves_the_in_memory_tree() {
        let mut fs = VirtualFileSystem::load(Rc::new(NoopKeyValueStore), KEY);
        fs.create_file(&[] as &[&str], "root.txt", "r").unwrap();
        assert_eq!(fs.get_file_content(&[] as &[&str], "root.txt"), Ok("r"));
    }
}
