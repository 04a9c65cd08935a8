//! Request orchestration on top of the workspace, registry and compressor

pub mod cleanup;
pub mod compression;
