//! Typed host-domain contracts shared by the desktop runtime and its platform adapters.
//!
//! This crate is the API-first boundary for platform services: persistent key-value storage,
//! native fullscreen, and virtual-path resolution. Concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod fullscreen;
pub mod host;
pub mod storage;

pub use fs::path::{
    join_virtual_path, normalize_virtual_path, resolve_virtual_path, virtual_path_segments,
};
pub use fullscreen::{FullscreenService, MemoryFullscreenService, NoopFullscreenService};
pub use host::{HostServices, HostStrategy};
pub use storage::kv::{
    load_json_with, save_json_with, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
};
