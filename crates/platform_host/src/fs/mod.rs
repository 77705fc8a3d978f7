//! Virtual filesystem path contracts.

pub mod path;
