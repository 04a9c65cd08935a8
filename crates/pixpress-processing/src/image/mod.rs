//! Image operations used by the compression pipeline

pub mod heif;
pub mod resize;

pub use heif::HeifConverter;
pub use resize::ImageResize;
