//! Filesystem tree nodes and their on-disk JSON shape.
//!
//! A folder serializes as a plain JSON object of its children; a file serializes as
//! `{"type":"file","content":"...","kind":"text"}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Content category inferred from a file name's extension.
pub enum FileKind {
    Image,
    Text,
    #[default]
    Generic,
}

impl FileKind {
    /// Infers the kind from the text after the last `.` (case-insensitive).
    pub fn infer(file_name: &str) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" => Self::Image,
            "txt" | "js" | "json" | "md" | "html" | "css" => Self::Text,
            _ => Self::Generic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FileTag {
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    #[serde(rename = "type")]
    tag: FileTag,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub kind: FileKind,
}

impl FileNode {
    pub fn new(content: impl Into<String>, kind: FileKind) -> Self {
        Self {
            tag: FileTag::File,
            content: content.into(),
            kind,
        }
    }

    /// Builds a file whose kind is inferred from `name`.
    pub fn named(name: &str, content: impl Into<String>) -> Self {
        Self::new(content, FileKind::infer(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Folder {
    pub children: BTreeMap<String, FsNode>,
}

impl Folder {
    pub fn get(&self, name: &str) -> Option<&FsNode> {
        self.children.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn with(mut self, name: &str, node: FsNode) -> Self {
        self.children.insert(name.to_string(), node);
        self
    }
}

/// A node in the virtual filesystem tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FsNode {
    File(FileNode),
    Folder(Folder),
}

impl FsNode {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    pub(crate) fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }
}

impl From<FileNode> for FsNode {
    fn from(file: FileNode) -> Self {
        Self::File(file)
    }
}

impl From<Folder> for FsNode {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

/// Tree synthesized when storage holds nothing usable.
pub fn default_tree() -> Folder {
    let pictures = (1..=3).fold(Folder::default(), |folder, n| {
        folder.with(
            &format!("wallpaper{n}.webp"),
            FileNode::new(format!("/static/wallpapers/wallpaper{n}.webp"), FileKind::Image).into(),
        )
    });
    let user = Folder::default()
        .with("Documents", Folder::default().into())
        .with("Pictures", pictures.into())
        .with("Music", Folder::default().into());
    Folder::default().with("home", Folder::default().with("reeyuki", user.into()).into())
}
