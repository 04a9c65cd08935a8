//! Pixpress Storage Library
//!
//! The storage workspace: one directory per process holding uploaded originals,
//! compressed outputs and converter scratch files side by side.
//!
//! # Naming
//!
//! - Uploads: `temp_{unix_seconds}_{8 hex}_{client basename}`
//! - Outputs: `{stem}_compressed{ext}`, then `{stem}_compressed_{n}{ext}` on collision
//!
//! Names handed to the workspace must be bare file names. Paths coming back from
//! clients are accepted only when they resolve inside the workspace root.

pub mod error;
pub mod workspace;

pub use error::{StorageError, StorageResult};
pub use workspace::{sanitize_filename, StoredFile, Workspace};
