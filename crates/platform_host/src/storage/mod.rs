//! Persistent storage contracts.

pub mod kv;
