pub mod cleanup;
pub mod compress;
pub mod download;
pub mod index;
pub mod upload;
