//! Data models for the application
//!
//! Request and response bodies of the photo endpoints plus the per-output
//! metadata kept by the download gate.

mod cleanup;
mod compression;
mod metadata;
mod upload;

pub use cleanup::*;
pub use compression::*;
pub use metadata::*;
pub use upload::*;
