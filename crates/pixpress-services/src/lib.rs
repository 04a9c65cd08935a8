//! Pixpress Services Library
//!
//! State shared between request handlers and the background expiry sweeper.

pub mod cleanup;
pub mod registry;

pub use cleanup::{ExpirySweeper, SweepSummary};
pub use registry::FileRegistry;
